//! Error types for the scaffolding engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving a configuration or materializing a project
#[derive(Error, Debug)]
pub enum Error {
    /// A feature identifier in the configuration is not known to the registry.
    /// Raised before any file is written so a typo never produces a partial tree.
    #[error("unknown feature '{name}'")]
    UnknownFeature { name: String },

    /// A configuration field required by the selected template is absent or empty
    #[error("missing required configuration field '{field}'")]
    MissingField { field: String },

    /// A write or mkdir failed; the run aborts, earlier writes remain
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template manifest is malformed (duplicate paths, unknown field names, ...)
    #[error("invalid template manifest: {0}")]
    Manifest(String),

    /// Rendering a template file failed for a reason other than a missing field
    #[error("failed to render '{path}': {source}")]
    Render {
        path: String,
        #[source]
        source: handlebars::RenderError,
    },

    /// Template acquisition (fetch, zip extraction) failed
    #[error(transparent)]
    Template(#[from] anyhow::Error),
}
