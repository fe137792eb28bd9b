//! Generator Core - Shared library for feature-gated application scaffolding
//!
//! This library materializes application projects from template trees: a
//! configuration record plus a set of feature selections decide which
//! candidate files appear in the output and what gets substituted into them.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - configuration, feature registry, manifests,
//!   fetching, rendering, materialization
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and
//!   `GenerationRun` for custom frontends
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use generator_core::{AppConfig, FeatureSelection, GenerationRun, TemplateFetcher};
//!
//! let config = AppConfig {
//!     project_name: "my-app".into(),
//!     features: FeatureSelection::List(vec!["searchBar".into()]),
//!     ..AppConfig::default()
//! };
//!
//! let mut fetcher = TemplateFetcher::from_local("templates".into(), "my-generator");
//! let mut run = GenerationRun::new();
//! run.execute(&mut fetcher, "webpack", &config, "out".as_ref()).await?;
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod orchestrator;
pub mod product;
pub mod runtime;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{AppConfig, FeatureFlags, FeatureSelection};
pub use error::{Error, Result};
pub use features::{resolve_active_features, Feature, FeatureSet};
pub use orchestrator::{GenerationRun, Phase};
pub use product::ProductConfig;
pub use templates::{
    materialize_template, FeatureFiles, RootManifest, TemplateFetcher, TemplateManifest,
    TemplateSource,
};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for template compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.2.0";
