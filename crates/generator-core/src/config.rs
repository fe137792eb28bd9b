//! Project configuration collected once per run
//!
//! An [`AppConfig`] is constructed a single time - interactively through the
//! TUI prompts or programmatically from a structured value - and then passed
//! by reference to every component. It is never mutated after collection.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration fields that every template generation requires
pub const BASE_REQUIRED_FIELDS: &[&str] = &[
    "projectName",
    "description",
    "githubAccount",
    "authorName",
    "authorEmail",
];

/// Feature selection as supplied by the user
///
/// Two input shapes are accepted: a positive-selection list of feature
/// identifiers (the newer prompt flow) and named booleans (the older one).
/// Both resolve to the same internal feature set, see
/// [`crate::features::resolve_active_features`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureSelection {
    /// Names of features to include, e.g. `["searchBar", "bpmTaskPage"]`
    List(Vec<String>),
    /// One boolean per feature
    Flags(FeatureFlags),
}

impl Default for FeatureSelection {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Named boolean shape of a feature selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureFlags {
    pub navigation_bar: bool,
    pub drawer_bar: bool,
    pub search_bar: bool,
    pub content_page: bool,
    pub bpm_task_page: bool,
    pub user_info: bool,
}

/// Immutable per-run configuration record
///
/// All string fields default to empty; presence is validated against the
/// selected template's required field list before materialization starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Output directory name; substituted into README, manifest and markup
    pub project_name: String,
    pub description: String,
    pub github_account: String,
    pub author_name: String,
    pub author_email: String,
    pub author_url: String,
    /// Ordered list embedded into the generated package manifest
    pub keywords: Vec<String>,
    /// Content services endpoint, substituted into runtime config files
    pub alfresco_server_host: Option<String>,
    /// Process services endpoint, required when `bpmTaskPage` is active
    pub activiti_server_host: Option<String>,
    pub license: String,
    pub features: FeatureSelection,
}

impl AppConfig {
    /// Whether a field (by its wire name) carries a usable value
    ///
    /// Returns `None` for field names this configuration does not know,
    /// which lets a manifest typo surface as a manifest error instead of
    /// silently passing validation.
    pub fn field_is_present(&self, field: &str) -> Option<bool> {
        let present = match field {
            "projectName" => !self.project_name.is_empty(),
            "description" => !self.description.is_empty(),
            "githubAccount" => !self.github_account.is_empty(),
            "authorName" => !self.author_name.is_empty(),
            "authorEmail" => !self.author_email.is_empty(),
            "authorUrl" => !self.author_url.is_empty(),
            "keywords" => !self.keywords.is_empty(),
            "alfrescoServerHost" => non_empty(self.alfresco_server_host.as_deref()),
            "activitiServerHost" => non_empty(self.activiti_server_host.as_deref()),
            "license" => !self.license.is_empty(),
            _ => return None,
        };
        Some(present)
    }

    /// Fail fast on the first absent field, before anything is written
    pub fn ensure_fields(&self, fields: &[&str]) -> Result<()> {
        for field in fields {
            match self.field_is_present(field) {
                Some(true) => {}
                Some(false) => {
                    return Err(Error::MissingField {
                        field: (*field).to_string(),
                    })
                }
                None => {
                    return Err(Error::Manifest(format!(
                        "unknown required field '{}'",
                        field
                    )))
                }
            }
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}
