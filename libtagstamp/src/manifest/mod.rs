//! Docker image manifest, schema version 1.
//!
//! Schema 1 is the only manifest format that embeds per-layer build metadata
//! in a `history` array. Each entry holds a `v1Compatibility` string, itself a
//! JSON document whose `created` field records when the layer was built.
//! Registries only serve this format when asked for it explicitly through the
//! [`MANIFEST_V1_MEDIA_TYPE`] `Accept` header.

use crate::error::{Result, TagstampError};
use crate::timestamp::parse_created;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};


/// Media type of a signed schema 1 manifest.
pub const MANIFEST_V1_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v1+prettyjws";

/// A schema 1 image manifest, reduced to the fields tagstamp reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestV1 {
    /// Always 1 for this format; assumed when the registry omits it.
    #[serde(rename = "schemaVersion", default = "default_schema_version")]
    pub schema_version: u32,

    /// Repository name as recorded by the registry.
    #[serde(default)]
    pub name: Option<String>,

    /// Tag the manifest was pushed under.
    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub architecture: Option<String>,

    /// One entry per layer, newest first.
    pub history: Vec<HistoryEntry>,
}

fn default_schema_version() -> u32 {
    1
}

/// A single layer's entry in the manifest history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// JSON-encoded [`V1Compatibility`] document.
    #[serde(rename = "v1Compatibility", default)]
    pub v1_compatibility: Option<String>,
}

/// The decoded `v1Compatibility` document of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct V1Compatibility {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub parent: Option<String>,

    /// Layer creation time, e.g. `2021-05-01T10:00:00.123456Z`.
    #[serde(default)]
    pub created: Option<String>,
}

/// Just enough of any manifest to say what the registry actually served.
#[derive(Debug, Deserialize)]
struct ManifestProbe {
    #[serde(rename = "schemaVersion")]
    schema_version: Option<u32>,
    #[serde(rename = "mediaType")]
    media_type: Option<String>,
    history: Option<serde_json::Value>,
}

impl ManifestV1 {
    /// Parses a manifest body, failing with
    /// [`TagstampError::UnsupportedSchema`] when it has no `history`.
    ///
    /// `content_type` is the response's `Content-Type`, used only to describe
    /// an unexpected manifest in the error.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self> {
        let probe: ManifestProbe = serde_json::from_slice(bytes).map_err(|e| {
            TagstampError::validation_with_source("Failed to parse manifest JSON", e)
        })?;

        if probe.history.is_none() || probe.schema_version.is_some_and(|v| v != 1) {
            let version = probe
                .schema_version
                .map(|v| format!("schema version {}", v))
                .unwrap_or_else(|| "a manifest without schemaVersion".to_string());
            let media_type = probe.media_type.as_deref().or(content_type);
            let served = match media_type {
                Some(media_type) => format!("{} ({})", version, media_type),
                None => version,
            };
            return Err(TagstampError::unsupported_schema(served));
        }

        serde_json::from_slice(bytes).map_err(|e| {
            TagstampError::validation_with_source("Failed to parse schema 1 manifest", e)
        })
    }

    /// Latest layer creation time recorded in the history.
    ///
    /// See [`last_updated`].
    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        last_updated(&self.history)
    }
}

impl HistoryEntry {
    /// Creates an entry wrapping an already encoded `v1Compatibility` string.
    pub fn new(v1_compatibility: impl Into<String>) -> Self {
        Self {
            v1_compatibility: Some(v1_compatibility.into()),
        }
    }

    /// Decodes the embedded `v1Compatibility` document.
    pub fn compatibility(&self) -> Result<V1Compatibility> {
        let raw = self
            .v1_compatibility
            .as_deref()
            .ok_or_else(|| TagstampError::validation("History entry has no v1Compatibility"))?;
        serde_json::from_str(raw).map_err(|e| {
            TagstampError::validation_with_source("Failed to parse v1Compatibility", e)
        })
    }

    /// The entry's creation time, or `None` if it is missing or unparseable.
    pub fn created(&self) -> Option<NaiveDateTime> {
        let compat = match self.compatibility() {
            Ok(compat) => compat,
            Err(e) => {
                tracing::debug!(error = %e, "skipping history entry");
                return None;
            }
        };
        let Some(created) = compat.created else {
            tracing::debug!(id = ?compat.id, "history entry has no created field");
            return None;
        };
        let parsed = parse_created(&created);
        if parsed.is_none() {
            tracing::debug!(created = %created, "unparseable created timestamp");
        }
        parsed
    }
}

/// Reduces a history to its most recent creation time.
///
/// Entries without a usable `created` value are ignored. Returns `None` for
/// an empty history or when no entry parses.
///
/// # Examples
///
/// ```
/// use libtagstamp::manifest::{HistoryEntry, last_updated};
///
/// let history = vec![
///     HistoryEntry::new(r#"{"created":"2020-06-01T00:00:00"}"#),
///     HistoryEntry::new(r#"{"created":"2021-01-01T00:00:00"}"#),
///     HistoryEntry::new(r#"{"created":"not-a-date"}"#),
/// ];
/// let latest = last_updated(&history).unwrap();
/// assert_eq!(latest.to_string(), "2021-01-01 00:00:00");
/// ```
pub fn last_updated(history: &[HistoryEntry]) -> Option<NaiveDateTime> {
    history.iter().filter_map(HistoryEntry::created).max()
}
