//! Template manifest types and parsing

use crate::error::{Error, Result};
use crate::features::Feature;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Path patterns gated behind each feature
///
/// Patterns match the full path relative to the template root, with three
/// forms: exact (`app/main.ts`), prefix (`app/components/search/*`) and
/// suffix (`*.spec.ts`). A candidate matching no list at all is untagged
/// and always materializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureFiles {
    /// Always materialized, checked before any feature list
    #[serde(default)]
    pub common: Vec<String>,

    /// Files that require the navigation bar feature
    #[serde(default)]
    pub navigation_bar: Vec<String>,

    /// Files that require the drawer bar feature
    #[serde(default)]
    pub drawer_bar: Vec<String>,

    /// Files that require the search bar feature
    #[serde(default)]
    pub search_bar: Vec<String>,

    /// Files that require the content page feature
    #[serde(default)]
    pub content_page: Vec<String>,

    /// Files that require the process task page feature
    #[serde(default)]
    pub bpm_task_page: Vec<String>,

    /// Files that require the user info feature
    #[serde(default)]
    pub user_info: Vec<String>,
}

/// Gate resolved for a single candidate path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileGate {
    /// Listed in `common`: always materialized
    Common,
    /// Listed under a feature: materialized only when that feature is active
    Feature(Feature),
    /// In no list: always materialized
    Untagged,
}

impl FeatureFiles {
    /// Merge another table into this one (other extends, never replaces)
    pub fn merge(&mut self, other: &FeatureFiles) {
        self.common.extend(other.common.iter().cloned());
        self.navigation_bar
            .extend(other.navigation_bar.iter().cloned());
        self.drawer_bar.extend(other.drawer_bar.iter().cloned());
        self.search_bar.extend(other.search_bar.iter().cloned());
        self.content_page.extend(other.content_page.iter().cloned());
        self.bpm_task_page
            .extend(other.bpm_task_page.iter().cloned());
        self.user_info.extend(other.user_info.iter().cloned());
    }

    fn feature_lists(&self) -> [(Feature, &[String]); 6] {
        [
            (Feature::NavigationBar, self.navigation_bar.as_slice()),
            (Feature::DrawerBar, self.drawer_bar.as_slice()),
            (Feature::SearchBar, self.search_bar.as_slice()),
            (Feature::ContentPage, self.content_page.as_slice()),
            (Feature::BpmTaskPage, self.bpm_task_page.as_slice()),
            (Feature::UserInfo, self.user_info.as_slice()),
        ]
    }

    /// Resolve the gate for a candidate path
    ///
    /// `common` wins over feature lists, so a shared file inside an otherwise
    /// gated directory can be forced in.
    pub fn gate_for_path(&self, path: &str) -> FileGate {
        if matches_any(path, &self.common) {
            return FileGate::Common;
        }
        for (feature, patterns) in self.feature_lists() {
            if matches_any(path, patterns) {
                return FileGate::Feature(feature);
            }
        }
        FileGate::Untagged
    }
}

/// Check if a path matches any pattern in a list
pub(crate) fn matches_any(path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('*') {
            path.ends_with(suffix)
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            path.starts_with(prefix)
        } else {
            path == pattern
        }
    })
}

/// A shared file from the root templates directory bundled into every generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedFile {
    /// Source path relative to templates/ directory
    pub source: String,

    /// Destination path in each generation (defaults to source if not specified)
    #[serde(default)]
    pub dest: Option<String>,
}

impl SharedFile {
    /// Get the destination path (falls back to source if dest not specified)
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }
}

/// Root manifest (templates/template.yaml)
///
/// Lists the available template generations plus global gates and shared files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// Generation directory names, e.g. `["classic", "webpack"]`
    pub templates: Vec<String>,

    /// Global feature gates applied to every generation
    #[serde(default)]
    pub feature_files: FeatureFiles,

    /// Files from the root templates/ directory bundled into every generation,
    /// with optional renaming via source/dest mapping
    #[serde(default)]
    pub shared_files: Vec<SharedFile>,
}

/// Per-generation manifest (templates/<name>/template.yaml)
///
/// The `files` list is the candidate manifest: the full enumerated set of
/// output paths this generation can produce, in materialization order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the generation
    pub name: String,

    /// Description of what the generation provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Feature identifiers this generation offers for selection
    #[serde(default)]
    pub supported: Vec<String>,

    /// Configuration fields required beyond the base set (wire names)
    #[serde(default)]
    pub required_fields: Vec<String>,

    /// Candidate output paths, in declaration order; paths are unique keys
    pub files: Vec<String>,

    /// Patterns for files that pass through the renderer instead of a raw copy
    #[serde(default)]
    pub rendered: Vec<String>,

    /// Generation-specific feature gates (merged with root)
    #[serde(default)]
    pub feature_files: FeatureFiles,
}

impl TemplateManifest {
    /// Check if a feature is offered by this generation
    pub fn supports(&self, feature: Feature) -> bool {
        self.supported.iter().any(|s| s == feature.id())
    }

    /// Whether a candidate path is rendered rather than copied verbatim
    pub fn is_rendered(&self, path: &str) -> bool {
        matches_any(path, &self.rendered)
    }

    /// Reject malformed candidate lists before anything is written
    ///
    /// Paths are unique keys; a duplicate would mean one candidate silently
    /// overwrites another. Unknown identifiers in `supported` are rejected
    /// for the same reason selection typos are.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for path in &self.files {
            if !seen.insert(path.as_str()) {
                return Err(Error::Manifest(format!(
                    "duplicate candidate path '{}'",
                    path
                )));
            }
        }
        for id in &self.supported {
            if Feature::parse(id).is_none() {
                return Err(Error::Manifest(format!(
                    "unknown feature '{}' in supported list",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_feature_files() -> FeatureFiles {
        FeatureFiles {
            common: vec![".gitignore".to_string(), ".editorconfig".to_string()],
            search_bar: vec!["app/components/search/*".to_string()],
            content_page: vec!["app/components/files/*".to_string()],
            bpm_task_page: vec![
                "app/components/activiti/*".to_string(),
                "app/services/in-memory-form.service.ts".to_string(),
            ],
            ..FeatureFiles::default()
        }
    }

    #[test]
    fn test_prefix_pattern_gates_a_directory() {
        let ff = test_feature_files();
        assert_eq!(
            ff.gate_for_path("app/components/search/search.component.ts"),
            FileGate::Feature(Feature::SearchBar)
        );
        assert_eq!(
            ff.gate_for_path("app/components/activiti/apps.view.ts"),
            FileGate::Feature(Feature::BpmTaskPage)
        );
    }

    #[test]
    fn test_exact_pattern_gates_a_single_file() {
        let ff = test_feature_files();
        assert_eq!(
            ff.gate_for_path("app/services/in-memory-form.service.ts"),
            FileGate::Feature(Feature::BpmTaskPage)
        );
        // Sibling service is untagged
        assert_eq!(
            ff.gate_for_path("app/services/debug-app-config.service.ts"),
            FileGate::Untagged
        );
    }

    #[test]
    fn test_common_wins_over_feature_lists() {
        let mut ff = test_feature_files();
        ff.common.push("app/components/search/index.ts".to_string());
        assert_eq!(
            ff.gate_for_path("app/components/search/index.ts"),
            FileGate::Common
        );
    }

    #[test]
    fn test_unlisted_path_is_untagged() {
        let ff = test_feature_files();
        assert_eq!(ff.gate_for_path("app/main.ts"), FileGate::Untagged);
        assert_eq!(ff.gate_for_path("README.md"), FileGate::Untagged);
    }

    #[test]
    fn test_merge_extends_lists() {
        let mut root = FeatureFiles {
            common: vec![".gitignore".to_string()],
            ..FeatureFiles::default()
        };
        root.merge(&test_feature_files());
        assert_eq!(root.common.len(), 3);
        assert_eq!(root.search_bar.len(), 1);
    }

    #[test]
    fn test_suffix_pattern() {
        let patterns = vec!["*.spec.ts".to_string()];
        assert!(matches_any("app/components/home/home.component.spec.ts", &patterns));
        assert!(!matches_any("app/components/home/home.component.ts", &patterns));
    }

    fn minimal_manifest(files: Vec<String>) -> TemplateManifest {
        TemplateManifest {
            name: "Test".to_string(),
            description: "test".to_string(),
            version: "0.1.0".to_string(),
            supported: vec!["searchBar".to_string()],
            required_fields: Vec::new(),
            files,
            rendered: vec!["*.md".to_string(), "package.json".to_string()],
            feature_files: FeatureFiles::default(),
        }
    }

    #[test]
    fn test_duplicate_candidate_path_is_rejected() {
        let manifest = minimal_manifest(vec![
            "README.md".to_string(),
            "app/main.ts".to_string(),
            "README.md".to_string(),
        ]);
        assert!(matches!(manifest.validate(), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_unknown_supported_feature_is_rejected() {
        let mut manifest = minimal_manifest(vec!["README.md".to_string()]);
        manifest.supported.push("uploadBtn".to_string());
        assert!(matches!(manifest.validate(), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_rendered_patterns() {
        let manifest = minimal_manifest(vec![]);
        assert!(manifest.is_rendered("README.md"));
        assert!(manifest.is_rendered("package.json"));
        assert!(!manifest.is_rendered("app/fonts/Muli-Regular.ttf"));
    }
}
