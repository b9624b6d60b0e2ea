//! BizAnalyzer Core
//!
//! Domain model for business-idea feasibility analysis: the idea lifecycle
//! state machine, collection/analysis providers, scoring and report
//! synthesis, and the stateless market search.

#[macro_use]
mod macros;

pub mod analysis;
pub mod collection;
pub mod idea;
pub mod lifecycle;
pub mod page;
pub mod report;
pub mod search;
pub mod user;

use thiserror::Error;

pub use analysis::{Analysis, AnalysisOutcome, AnalysisProvider, AnalysisStatus, Score, ScoreCard};
pub use collection::{CollectedData, CollectionProgress, CollectionProvider, CollectionTask};
pub use idea::{Idea, IdeaDraft, IdeaPatch, IndustryType, RevenueModel};
pub use lifecycle::{IdeaStatus, Trigger};
pub use page::Page;
pub use report::{Recommendation, Report, ReportStatus, ReportType};
pub use search::{SearchKind, SearchProvider, SearchQuery, SearchResponse};
pub use user::{Registration, User};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("cannot {trigger} while idea is {from}")]
    IllegalTransition { from: IdeaStatus, trigger: Trigger },

    #[error("{0}")]
    Validation(String),

    #[error("{provider} failed: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Checks that `value` has between `min` and `max` characters (inclusive).
pub(crate) fn check_len(field: &str, value: &str, min: usize, max: Option<usize>) -> CoreResult<()> {
    let len = value.chars().count();
    if len < min {
        return Err(CoreError::validation(format!(
            "{field} must be at least {min} characters"
        )));
    }
    if let Some(max) = max {
        if len > max {
            return Err(CoreError::validation(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}
