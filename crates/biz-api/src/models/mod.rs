//! API request and response models

pub mod auth;
pub mod common;
pub mod idea;
pub mod report;

pub use auth::*;
pub use common::*;
pub use idea::*;
pub use report::*;
