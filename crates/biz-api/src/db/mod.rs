//! Persistence
//!
//! Idea writes are compare-and-set on [`Idea::version`]: a write succeeds only
//! when the stored version equals the one the caller read, and the stored
//! version is then incremented. Methods that return `bool` report whether the
//! compare-and-set won; on `false` nothing was written.

pub mod memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use biz_core::{Analysis, Idea, Page, Report, User};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lookups never return soft-deleted users or ideas.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `Duplicate` if a non-deleted user has the same email.
    async fn create_user(&self, user: &User) -> StoreResult<()>;

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Returns `false` if the user was already gone.
    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool>;

    async fn create_idea(&self, idea: &Idea) -> StoreResult<()>;

    async fn idea_by_id(&self, id: Uuid) -> StoreResult<Option<Idea>>;

    /// One page of the owner's ideas, newest first, plus the total count.
    async fn ideas_by_owner(&self, owner_id: Uuid, page: Page) -> StoreResult<(Vec<Idea>, i64)>;

    async fn save_idea(&self, idea: &Idea) -> StoreResult<bool>;

    async fn analysis_for_idea(&self, idea_id: Uuid) -> StoreResult<Option<Analysis>>;

    /// Upsert the idea's analysis and save the idea, atomically.
    async fn save_analysis_stage(&self, idea: &Idea, analysis: &Analysis) -> StoreResult<bool>;

    async fn report_by_id(&self, id: Uuid) -> StoreResult<Option<Report>>;

    /// Newest first
    async fn reports_for_idea(&self, idea_id: Uuid) -> StoreResult<Vec<Report>>;

    /// Upsert the report and save the idea, atomically.
    async fn save_report_stage(&self, idea: &Idea, report: &Report) -> StoreResult<bool>;
}
