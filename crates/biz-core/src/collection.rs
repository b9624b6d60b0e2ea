//! External data collection stage

use crate::idea::Idea;
use crate::lifecycle::IdeaStatus;
use crate::CoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    /// Units of work performed while collecting data for an idea
    pub enum CollectionTask as "collection task" {
        MarketData => "market_data",
        CompetitorData => "competitor_data",
        CustomerInsights => "customer_insights",
        RegulationData => "regulation_data",
        TechnologyTrend => "technology_trend",
        ProfitabilityBenchmark => "profitability_benchmark",
    }
}

/// Data gathered for one idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedData {
    pub source: String,
    pub collected_at: DateTime<Utc>,
    pub items: Vec<CollectedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedItem {
    pub task: CollectionTask,
    pub summary: String,
}

/// Progress of the collection stage as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionProgress {
    pub status: String,
    /// 0-100
    pub progress: u8,
    pub completed_tasks: Vec<CollectionTask>,
    pub pending_tasks: Vec<CollectionTask>,
    pub failed_tasks: Vec<CollectionTask>,
}

impl CollectionProgress {
    pub fn finished(tasks: &[CollectionTask]) -> Self {
        Self {
            status: "completed".to_string(),
            progress: 100,
            completed_tasks: tasks.to_vec(),
            pending_tasks: Vec::new(),
            failed_tasks: Vec::new(),
        }
    }

    pub fn not_started(status: IdeaStatus, tasks: &[CollectionTask]) -> Self {
        Self {
            status: status.to_string(),
            progress: 0,
            completed_tasks: Vec::new(),
            pending_tasks: tasks.to_vec(),
            failed_tasks: Vec::new(),
        }
    }
}

/// Source of external market data for an idea.
///
/// The shipped implementation completes synchronously; a queued
/// implementation reports partial progress through `in_flight_progress`.
#[async_trait]
pub trait CollectionProvider: Send + Sync {
    /// Provider name for logs and errors
    fn name(&self) -> &'static str;

    /// Tasks this provider runs for every idea
    fn tasks(&self) -> &[CollectionTask] {
        CollectionTask::ALL
    }

    /// Gather data for `idea`
    async fn collect(&self, idea: &Idea) -> CoreResult<CollectedData>;

    /// Progress of a collection that is still running
    async fn in_flight_progress(&self, idea: &Idea) -> CollectionProgress;
}

/// Progress for any idea, delegating to the provider only while collecting.
pub async fn progress_for(provider: &dyn CollectionProvider, idea: &Idea) -> CollectionProgress {
    match idea.status {
        IdeaStatus::Collected => CollectionProgress::finished(provider.tasks()),
        IdeaStatus::Collecting => provider.in_flight_progress(idea).await,
        other => CollectionProgress::not_started(other, provider.tasks()),
    }
}

/// Collector that fabricates one summary line per task
pub struct SimulatedCollector;

impl SimulatedCollector {
    pub fn new() -> Self {
        Self
    }

    fn summarize(task: CollectionTask, idea: &Idea) -> String {
        let subject = &idea.title;
        match task {
            CollectionTask::MarketData => format!("Market sizing reports referencing \"{subject}\""),
            CollectionTask::CompetitorData => format!("Competitor listings similar to \"{subject}\""),
            CollectionTask::CustomerInsights => {
                format!("Customer reviews mentioning {}", idea.target_customer)
            }
            CollectionTask::RegulationData => match idea.industry {
                Some(industry) => format!("Regulations applicable to the {industry} industry"),
                None => "General commercial regulations".to_string(),
            },
            CollectionTask::TechnologyTrend => format!("Technology trends relevant to \"{subject}\""),
            CollectionTask::ProfitabilityBenchmark => match idea.revenue_model {
                Some(model) => format!("Margin benchmarks for {model} businesses"),
                None => "Cross-industry margin benchmarks".to_string(),
            },
        }
    }
}

impl Default for SimulatedCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionProvider for SimulatedCollector {
    fn name(&self) -> &'static str {
        "simulated-collector"
    }

    async fn collect(&self, idea: &Idea) -> CoreResult<CollectedData> {
        let items = self
            .tasks()
            .iter()
            .map(|&task| CollectedItem {
                task,
                summary: Self::summarize(task, idea),
            })
            .collect();

        Ok(CollectedData {
            source: self.name().to_string(),
            collected_at: Utc::now(),
            items,
        })
    }

    async fn in_flight_progress(&self, _idea: &Idea) -> CollectionProgress {
        let tasks = self.tasks();
        let (done, pending) = tasks.split_at(tasks.len() / 2);
        CollectionProgress {
            status: IdeaStatus::Collecting.to_string(),
            progress: 50,
            completed_tasks: done.to_vec(),
            pending_tasks: pending.to_vec(),
            failed_tasks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idea::tests::draft;
    use crate::lifecycle::Trigger;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_collect_covers_every_task() {
        let idea = Idea::new(Uuid::new_v4(), draft("Night kitchen"));
        let data = SimulatedCollector::new().collect(&idea).await.unwrap();
        let tasks: Vec<_> = data.items.iter().map(|i| i.task).collect();
        assert_eq!(tasks, CollectionTask::ALL);
        assert!(data.items[0].summary.contains("Night kitchen"));
    }

    #[tokio::test]
    async fn test_progress_by_status() {
        let collector = SimulatedCollector::new();
        let mut idea = Idea::new(Uuid::new_v4(), draft("Night kitchen"));

        let progress = progress_for(&collector, &idea).await;
        assert_eq!(progress.status, "created");
        assert_eq!(progress.progress, 0);
        assert_eq!(progress.pending_tasks.len(), 6);

        idea.transition(Trigger::StartCollection).unwrap();
        let progress = progress_for(&collector, &idea).await;
        assert_eq!(progress.progress, 50);
        assert_eq!(
            progress.completed_tasks,
            vec![
                CollectionTask::MarketData,
                CollectionTask::CompetitorData,
                CollectionTask::CustomerInsights
            ]
        );

        idea.transition(Trigger::CollectionFinished).unwrap();
        let progress = progress_for(&collector, &idea).await;
        assert_eq!(progress.status, "completed");
        assert_eq!(progress.progress, 100);
        assert!(progress.pending_tasks.is_empty());
    }
}
