pub mod actions;
pub mod boundary;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod ui;

pub use error::{Result, SemverReleaseError};
pub use orchestrator::{ReleaseOutcome, SemverRelease};
