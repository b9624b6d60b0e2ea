//! In-process store for tests and database-less runs

use super::{Store, StoreError, StoreResult};
use async_trait::async_trait;
use biz_core::{Analysis, Idea, Page, Report, User};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    ideas: HashMap<Uuid, Idea>,
    /// keyed by idea id
    analyses: HashMap<Uuid, Analysis>,
    reports: HashMap<Uuid, Report>,
}

impl Tables {
    /// Compare-and-set; stores `idea` with its version bumped.
    fn write_idea(&mut self, idea: &Idea) -> bool {
        match self.ideas.get_mut(&idea.id) {
            Some(stored) if !stored.is_deleted() && stored.version == idea.version => {
                *stored = idea.clone();
                stored.version += 1;
                true
            }
            _ => false,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        let taken = tables
            .users
            .values()
            .any(|u| !u.is_deleted() && u.email == user.email);
        if taken {
            return Err(StoreError::Duplicate("email"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|u| !u.is_deleted() && u.email == email)
            .cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        match tables.users.get_mut(&id) {
            Some(user) if !user.is_deleted() => {
                user.soft_delete();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_idea(&self, idea: &Idea) -> StoreResult<()> {
        let mut tables = self.tables.lock().await;
        if tables.ideas.contains_key(&idea.id) {
            return Err(StoreError::Duplicate("idea"));
        }
        tables.ideas.insert(idea.id, idea.clone());
        Ok(())
    }

    async fn idea_by_id(&self, id: Uuid) -> StoreResult<Option<Idea>> {
        let tables = self.tables.lock().await;
        Ok(tables.ideas.get(&id).filter(|i| !i.is_deleted()).cloned())
    }

    async fn ideas_by_owner(&self, owner_id: Uuid, page: Page) -> StoreResult<(Vec<Idea>, i64)> {
        let tables = self.tables.lock().await;
        let mut owned: Vec<&Idea> = tables
            .ideas
            .values()
            .filter(|i| i.owner_id == owner_id && !i.is_deleted())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = owned.len() as i64;
        let ideas = owned
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok((ideas, total))
    }

    async fn save_idea(&self, idea: &Idea) -> StoreResult<bool> {
        Ok(self.tables.lock().await.write_idea(idea))
    }

    async fn analysis_for_idea(&self, idea_id: Uuid) -> StoreResult<Option<Analysis>> {
        let tables = self.tables.lock().await;
        Ok(tables.analyses.get(&idea_id).cloned())
    }

    async fn save_analysis_stage(&self, idea: &Idea, analysis: &Analysis) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if !tables.write_idea(idea) {
            return Ok(false);
        }
        tables.analyses.insert(analysis.idea_id, analysis.clone());
        Ok(true)
    }

    async fn report_by_id(&self, id: Uuid) -> StoreResult<Option<Report>> {
        let tables = self.tables.lock().await;
        Ok(tables.reports.get(&id).cloned())
    }

    async fn reports_for_idea(&self, idea_id: Uuid) -> StoreResult<Vec<Report>> {
        let tables = self.tables.lock().await;
        let mut reports: Vec<Report> = tables
            .reports
            .values()
            .filter(|r| r.idea_id == idea_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn save_report_stage(&self, idea: &Idea, report: &Report) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        if !tables.write_idea(idea) {
            return Ok(false);
        }
        tables.reports.insert(report.id, report.clone());
        Ok(true)
    }
}
