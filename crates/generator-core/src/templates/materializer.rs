//! Candidate materialization with feature gating
//!
//! Walks the candidate manifest in declaration order and, for each path that
//! survives its feature gate, renders or copies the file into the
//! destination tree. Filesystem writes are the only side effect here; no
//! network, no process spawning.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::features::FeatureSet;
use crate::templates::fetcher::TemplateFetcher;
use crate::templates::manifest::{FeatureFiles, FileGate, TemplateManifest};
use crate::templates::renderer::{RenderContext, Renderer};
use std::path::Path;
use tokio::fs;

/// Materialize every active candidate of a generation into `dest`
///
/// Returns the written paths in materialization order. A failure mid-run
/// aborts the remaining candidates; earlier writes are not rolled back.
/// Callers that need atomicity stage into a temporary directory and swap
/// it in on success.
pub async fn materialize_template(
    fetcher: &mut TemplateFetcher,
    generation: &str,
    manifest: &TemplateManifest,
    dest: &Path,
    config: &AppConfig,
    features: &FeatureSet,
    feature_files: &FeatureFiles,
) -> Result<Vec<String>> {
    fs::create_dir_all(dest).await.map_err(|source| Error::Filesystem {
        path: dest.to_path_buf(),
        source,
    })?;

    let renderer = Renderer::new();
    let ctx = RenderContext::new(config, features);
    let mut written = Vec::new();

    for file_path in &manifest.files {
        if !should_materialize(file_path, features, feature_files) {
            continue;
        }

        let target = dest.join(file_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| Error::Filesystem {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let bytes = fetcher.fetch_file_bytes(generation, file_path).await?;
        let output = if manifest.is_rendered(file_path) {
            let text = String::from_utf8(bytes).map_err(|_| {
                Error::Manifest(format!("rendered file '{}' is not valid UTF-8", file_path))
            })?;
            renderer.render(file_path, &text, &ctx)?.into_bytes()
        } else {
            bytes
        };

        fs::write(&target, &output)
            .await
            .map_err(|source| Error::Filesystem {
                path: target.clone(),
                source,
            })?;

        written.push(file_path.clone());
    }

    Ok(written)
}

/// Decide whether a candidate path materializes under the active feature set
pub fn should_materialize(path: &str, features: &FeatureSet, feature_files: &FeatureFiles) -> bool {
    match feature_files.gate_for_path(path) {
        FileGate::Common | FileGate::Untagged => true,
        FileGate::Feature(feature) => features.contains(&feature),
    }
}
