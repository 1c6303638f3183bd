pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod git;
pub mod lines;
pub mod orchestration;
pub mod patterns;
pub mod project;
pub mod rewrite;
pub mod scanner;
pub mod ui;

pub use domain::{TagName, Version, VersionBump, VersionOccurrence};
pub use error::{Result, VersionSyncError};
pub use orchestration::{
    apply_plan, bump, current_version, plan_bump, tag, verify, BumpPlan, TagOptions,
};
pub use project::{Project, ProjectMetadata};
