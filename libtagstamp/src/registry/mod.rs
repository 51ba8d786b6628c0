//! Registry session for a single repository.
//!
//! [`Registry`] ties the HTTP client to one repository and the credentials
//! obtained for it, so the later steps of a scan do not have to thread the
//! token around.

use crate::auth::Credentials;
use crate::client::Client;
use crate::error::Result;
use crate::manifest::ManifestV1;
use crate::report::TagReport;


/// Authenticated view of one repository.
pub struct Registry {
    /// HTTP client for registry communication.
    client: Client,
    /// Repository name, e.g. `namespace/image`.
    repository: String,
    /// Credentials sent to the token endpoint during login.
    login: Credentials,
    /// Credentials attached to registry requests.
    credentials: Credentials,
}

impl Registry {
    /// Creates a session; requests are anonymous until [`Registry::login`].
    ///
    /// `login` is only presented to the token endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use libtagstamp::auth::Credentials;
    /// use libtagstamp::client::Client;
    /// use libtagstamp::registry::Registry;
    ///
    /// let client = Client::new("https://gcr.io").unwrap();
    /// let registry = Registry::new(client, "team/app", Credentials::Anonymous);
    /// assert_eq!(registry.repository(), "team/app");
    /// ```
    pub fn new(client: Client, repository: impl Into<String>, login: Credentials) -> Self {
        Self {
            client,
            repository: repository.into(),
            login,
            credentials: Credentials::Anonymous,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the credentials currently attached to registry requests.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Obtains pull credentials for the repository.
    pub async fn login(&mut self) -> Result<()> {
        self.credentials = self
            .client
            .authenticate(&self.repository, &self.login)
            .await?;
        tracing::info!(
            registry = self.client.registry_url(),
            repository = %self.repository,
            authenticated = self.credentials != Credentials::Anonymous,
            "logged in"
        );
        Ok(())
    }

    /// Lists the repository's tags in registry order.
    pub async fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self
            .client
            .fetch_tags(&self.repository, &self.credentials)
            .await?;
        tracing::info!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    /// Fetches the schema 1 manifest of a tag.
    pub async fn get_manifest(&self, tag: &str) -> Result<ManifestV1> {
        self.client
            .fetch_manifest(&self.repository, tag, &self.credentials)
            .await
    }

    /// Computes a tag's last-updated timestamp from its manifest history.
    pub async fn last_updated(&self, tag: &str) -> Result<TagReport> {
        let manifest = self.get_manifest(tag).await?;
        let last_updated = manifest.last_updated();
        tracing::debug!(
            tag,
            history = manifest.history.len(),
            last_updated = ?last_updated,
            "reduced manifest history"
        );
        Ok(TagReport::new(tag, last_updated))
    }
}
