//! Business ideas

use crate::collection::CollectedData;
use crate::lifecycle::{IdeaStatus, Trigger};
use crate::{check_len, CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

text_enum! {
    pub enum IndustryType as "industry" {
        Tech => "tech",
        Healthcare => "healthcare",
        Fintech => "fintech",
        Ecommerce => "ecommerce",
        Education => "education",
        Food => "food",
        Entertainment => "entertainment",
        RealEstate => "real_estate",
        Manufacturing => "manufacturing",
        Other => "other",
    }
}

text_enum! {
    pub enum RevenueModel as "revenue model" {
        Subscription => "subscription",
        Transaction => "transaction",
        Advertising => "advertising",
        Freemium => "freemium",
        Licensing => "licensing",
        Saas => "saas",
        Marketplace => "marketplace",
        Other => "other",
    }
}

const MAX_TITLE_LEN: usize = 500;

/// A business idea owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub problem: String,
    pub target_customer: String,
    pub value_proposition: Option<String>,
    pub differentiation: Option<String>,
    pub constraints: Option<String>,
    pub industry: Option<IndustryType>,
    pub revenue_model: Option<RevenueModel>,
    pub status: IdeaStatus,
    pub collected_data: Option<CollectedData>,
    /// Optimistic concurrency token, bumped by every persisted write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Idea {
    pub fn new(owner_id: Uuid, draft: IdeaDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: draft.title,
            description: draft.description,
            problem: draft.problem,
            target_customer: draft.target_customer,
            value_proposition: draft.value_proposition,
            differentiation: draft.differentiation,
            constraints: draft.constraints,
            industry: draft.industry,
            revenue_model: draft.revenue_model,
            status: IdeaStatus::Created,
            collected_data: None,
            version: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Move the idea along the lifecycle table. The idea is left untouched
    /// when the edge does not exist.
    pub fn transition(&mut self, trigger: Trigger) -> CoreResult<IdeaStatus> {
        let from = self.status;
        let to = from.apply(trigger)?;
        self.status = to;
        self.updated_at = Utc::now();
        tracing::debug!(idea_id = %self.id, %from, %to, %trigger, "idea transition");
        Ok(to)
    }

    /// Apply a content edit; only legal while the status is editable.
    pub fn edit(&mut self, patch: IdeaPatch) -> CoreResult<()> {
        if !self.status.is_editable() {
            return Err(CoreError::validation(format!(
                "idea cannot be edited while {}",
                self.status
            )));
        }
        patch.validate()?;

        let IdeaPatch {
            title,
            description,
            problem,
            target_customer,
            value_proposition,
            differentiation,
            constraints,
            industry,
            revenue_model,
        } = patch;

        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = problem {
            self.problem = v;
        }
        if let Some(v) = target_customer {
            self.target_customer = v;
        }
        if value_proposition.is_some() {
            self.value_proposition = value_proposition;
        }
        if differentiation.is_some() {
            self.differentiation = differentiation;
        }
        if constraints.is_some() {
            self.constraints = constraints;
        }
        if industry.is_some() {
            self.industry = industry;
        }
        if revenue_model.is_some() {
            self.revenue_model = revenue_model;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

/// Input for a new idea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
    pub problem: String,
    pub target_customer: String,
    #[serde(default)]
    pub value_proposition: Option<String>,
    #[serde(default)]
    pub differentiation: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub industry: Option<IndustryType>,
    #[serde(default)]
    pub revenue_model: Option<RevenueModel>,
}

impl IdeaDraft {
    pub fn validate(&self) -> CoreResult<()> {
        check_len("title", &self.title, 1, Some(MAX_TITLE_LEN))?;
        check_len("description", &self.description, 3, None)?;
        check_len("problem", &self.problem, 3, None)?;
        check_len("target_customer", &self.target_customer, 1, None)?;
        Ok(())
    }
}

/// Partial update of an idea's content. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub target_customer: Option<String>,
    #[serde(default)]
    pub value_proposition: Option<String>,
    #[serde(default)]
    pub differentiation: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub industry: Option<IndustryType>,
    #[serde(default)]
    pub revenue_model: Option<RevenueModel>,
}

impl IdeaPatch {
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(title) = &self.title {
            check_len("title", title, 1, Some(MAX_TITLE_LEN))?;
        }
        if let Some(description) = &self.description {
            check_len("description", description, 3, None)?;
        }
        if let Some(problem) = &self.problem {
            check_len("problem", problem, 3, None)?;
        }
        if let Some(target_customer) = &self.target_customer {
            check_len("target_customer", target_customer, 1, None)?;
        }
        Ok(())
    }
}
