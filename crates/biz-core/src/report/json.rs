//! JSON report rendering

use super::Report;
use crate::{CoreError, CoreResult};

pub fn generate(report: &Report) -> CoreResult<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| CoreError::Render(format!("JSON serialization failed: {}", e)))
}
