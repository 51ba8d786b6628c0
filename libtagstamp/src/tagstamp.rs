//! High-level API for the tagstamp library.
//!
//! [`Tagstamp`] runs the whole report: authenticate, list tags, and reduce
//! each tag's manifest history to a last-updated timestamp.
//!
//! # Examples
//!
//! ```no_run
//! use libtagstamp::Tagstamp;
//! use std::ops::ControlFlow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tagstamp = Tagstamp::builder()
//!         .registry_url("https://gcr.io")
//!         .repository("kubeflow-images-public/admission-webhook")
//!         .build()?;
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

use crate::auth::Credentials;
use crate::client::{Client, ClientConfig};
use crate::config::{Config, OnError};
use crate::error::{Result, TagstampError};
use crate::registry::Registry;
use crate::report::{ScanSummary, SkippedTag, TagReport};
use std::ops::ControlFlow;

/// Reports the last-updated time of every tag in a repository.
pub struct Tagstamp {
    registry: Registry,
    on_error: OnError,
}

impl Tagstamp {
    /// Create a builder for configuring a scan.
    pub fn builder() -> TagstampBuilder {
        TagstampBuilder::new()
    }

    /// Creates a scanner from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::builder()
            .registry_url(&config.registry.url)
            .repository(&config.registry.repository)
            .client_config(config.client_config())
            .on_error(config.scan.on_error);

        if let Some(username) = &config.registry.username {
            let password = config.registry.password.clone().unwrap_or_default();
            builder = builder.login(Credentials::basic(username, password));
        }

        builder.build()
    }

    pub fn repository(&self) -> &str {
        self.registry.repository()
    }

    /// Runs the scan, calling `emit` with each tag's report in list order.
    ///
    /// Returning [`ControlFlow::Break`] from `emit` ends the scan before the
    /// next manifest is fetched; the summary then has `stopped` set.
    ///
    /// Authentication and tag listing failures always abort. A failure on a
    /// single tag aborts under [`OnError::Abort`]; under [`OnError::Skip`] it
    /// is logged, recorded in the returned summary, and the scan moves on.
    /// Reports emitted before an abort are not retracted.
    pub async fn scan<F>(&mut self, mut emit: F) -> Result<ScanSummary>
    where
        F: FnMut(&TagReport) -> ControlFlow<()>,
    {
        self.registry.login().await?;
        let tags = self.registry.list_tags().await?;

        let mut summary = ScanSummary::default();
        for tag in tags {
            match self.registry.last_updated(&tag).await {
                Ok(report) => {
                    summary.reported += 1;
                    if emit(&report).is_break() {
                        tracing::info!(tag = %tag, "scan stopped by caller");
                        summary.stopped = true;
                        break;
                    }
                }
                Err(error) => match self.on_error {
                    OnError::Abort => return Err(error),
                    OnError::Skip => {
                        tracing::warn!(tag = %tag, error = %error, "skipping tag");
                        summary.skipped.push(SkippedTag { tag, error });
                    }
                },
            }
        }

        tracing::info!(
            reported = summary.reported,
            skipped = summary.skipped.len(),
            "scan finished"
        );
        Ok(summary)
    }

    /// Runs the scan and collects every report.
    pub async fn collect(&mut self) -> Result<(Vec<TagReport>, ScanSummary)> {
        let mut reports = Vec::new();
        let summary = self
            .scan(|report| {
                reports.push(report.clone());
                ControlFlow::Continue(())
            })
            .await?;
        Ok((reports, summary))
    }
}

/// Builder for [`Tagstamp`].
#[derive(Debug, Default)]
pub struct TagstampBuilder {
    registry_url: Option<String>,
    repository: Option<String>,
    login: Option<Credentials>,
    client_config: Option<ClientConfig>,
    on_error: OnError,
}

impl TagstampBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the registry base URL (required).
    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = Some(url.into());
        self
    }

    /// Sets the repository to scan (required).
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Credentials presented to the token endpoint.
    pub fn login(mut self, credentials: Credentials) -> Self {
        self.login = Some(credentials);
        self
    }

    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = Some(config);
        self
    }

    pub fn on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Builds the scanner.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the registry URL or repository is
    /// missing or empty, or the URL is invalid.
    pub fn build(self) -> Result<Tagstamp> {
        let registry_url = self
            .registry_url
            .ok_or_else(|| TagstampError::validation("Registry URL is required"))?;
        let repository = self
            .repository
            .map(|r| r.trim().trim_matches('/').to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| TagstampError::validation("Repository name is required"))?;

        let client = Client::with_config(&registry_url, self.client_config.unwrap_or_default())?;
        let registry = Registry::new(
            client,
            repository,
            self.login.unwrap_or(Credentials::Anonymous),
        );

        Ok(Tagstamp {
            registry,
            on_error: self.on_error,
        })
    }
}
