//! Idea lifecycle state machine
//!
//! Every status change of an idea goes through [`IdeaStatus::apply`], which
//! consults the single transition table below. The collection, analysis and
//! report stages never compare statuses themselves.

use crate::{CoreError, CoreResult};

text_enum! {
    /// Pipeline status of an idea
    pub enum IdeaStatus as "idea status" {
        Created => "created",
        Collecting => "collecting",
        Collected => "collected",
        Analyzing => "analyzing",
        Analyzed => "analyzed",
        ReportGenerating => "report_generating",
        Completed => "completed",
        Failed => "failed",
    }
}

text_enum! {
    /// Events that move an idea between statuses
    pub enum Trigger as "trigger" {
        StartCollection => "start_collection",
        CollectionFinished => "finish_collection",
        StartAnalysis => "start_analysis",
        AnalysisFinished => "finish_analysis",
        StartReport => "create_report",
        ReportFinished => "finish_report",
        /// A provider failed (or was cancelled) while a stage was in flight
        StageFailed => "fail_stage",
    }
}

use IdeaStatus::*;

/// (trigger, legal source statuses, target status)
const TRANSITIONS: &[(Trigger, &[IdeaStatus], IdeaStatus)] = &[
    (Trigger::StartCollection, &[Created, Failed], Collecting),
    (Trigger::CollectionFinished, &[Collecting], Collected),
    // Analysis may skip collection entirely.
    (Trigger::StartAnalysis, &[Created, Collected, Failed], Analyzing),
    (Trigger::AnalysisFinished, &[Analyzing], Analyzed),
    // The completed-analysis guard lives in the report stage, so any settled
    // status that can carry an analysis may report.
    (Trigger::StartReport, &[Collected, Analyzed, Completed, Failed], ReportGenerating),
    (Trigger::ReportFinished, &[ReportGenerating], Completed),
    (Trigger::StageFailed, &[Collecting, Analyzing, ReportGenerating], Failed),
];

impl IdeaStatus {
    /// Target status for `trigger`, or `None` if the table has no such edge.
    pub fn next(self, trigger: Trigger) -> Option<IdeaStatus> {
        TRANSITIONS
            .iter()
            .find(|(t, from, _)| *t == trigger && from.contains(&self))
            .map(|(_, _, to)| *to)
    }

    /// Resolve `trigger` against the transition table.
    pub fn apply(self, trigger: Trigger) -> CoreResult<IdeaStatus> {
        self.next(trigger)
            .ok_or(CoreError::IllegalTransition { from: self, trigger })
    }

    /// Content fields may only change before any stage is in flight or
    /// has produced artifacts.
    pub fn is_editable(self) -> bool {
        matches!(self, Created | Failed)
    }

    /// A provider is working on the idea.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Collecting | Analyzing | ReportGenerating)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Completed | Failed)
    }
}

impl Default for IdeaStatus {
    fn default() -> Self {
        Created
    }
}
