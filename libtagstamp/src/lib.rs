//! tagstamp - last-updated times for container image tags
//!
//! The library talks to a container registry's distribution API, lists the
//! tags of one repository and derives each tag's last build time from the
//! `created` fields of its schema 1 manifest history.
//!
//! # Quick Start
//!
//! ```no_run
//! use libtagstamp::{Config, Tagstamp};
//! use std::ops::ControlFlow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_yaml_str("registry:\n  repository: team/app")?;
//!     let mut tagstamp = Tagstamp::from_config(&config)?;
//!
//!     tagstamp
//!         .scan(|report| {
//!             println!("{}", report);
//!             ControlFlow::Continue(())
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`Tagstamp`] - Runs the authenticate / list / reduce pipeline
//! - [`TagstampBuilder`] - Builder for advanced configuration
//! - [`TagReport`] - One tag and its last-updated timestamp
//! - [`Config`] - File-backed configuration
//! - [`Credentials`] - Authentication credentials
//!
//! The lower-level modules ([`client`], [`registry`], [`auth`], [`manifest`])
//! expose each step on its own.

#![warn(clippy::all)]

/// Returns the libtagstamp crate version.
///
/// # Examples
///
/// ```
/// let version = libtagstamp::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

mod tagstamp;
pub use tagstamp::{Tagstamp, TagstampBuilder};

pub use auth::Credentials;
pub use config::{Config, OnError};
pub use error::{Result, TagstampError};
pub use manifest::ManifestV1;
pub use report::{ScanSummary, SkippedTag, TagReport};

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod timestamp;
