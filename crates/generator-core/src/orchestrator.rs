//! Run orchestration
//!
//! Sequences a full generation run: resolve the active feature set, validate
//! the configuration against the selected generation's requirements, then
//! materialize the candidate manifest in declaration order.

use crate::config::{AppConfig, BASE_REQUIRED_FIELDS};
use crate::error::{Error, Result};
use crate::features::{resolve_active_features, Feature, FeatureSet};
use crate::templates::fetcher::TemplateFetcher;
use crate::templates::materializer::materialize_template;
use std::path::Path;

/// Lifecycle of a generation run
///
/// `Failed` is reachable from any state. A failure during `Resolving` writes
/// nothing; a failure during `Materializing` stops the remaining candidates
/// but leaves earlier writes in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Resolving,
    Materializing,
    Done,
    Failed,
}

/// A single run of the generator, from collected configuration to output tree
///
/// Created per run; the destination directory must not be shared with a
/// concurrent run (not enforced here, documented precondition).
pub struct GenerationRun {
    phase: Phase,
    written: Vec<String>,
    features: FeatureSet,
}

impl GenerationRun {
    /// A fresh run; configuration collection is in progress or done elsewhere
    pub fn new() -> Self {
        Self {
            phase: Phase::Collecting,
            written: Vec::new(),
            features: FeatureSet::new(),
        }
    }

    /// The phase the run is in, `Done` or `Failed` once `execute` returns
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Paths written so far, in materialization order
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// The feature set resolved for this run (empty until `Resolving` passed)
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Drive the run to completion for one generation
    pub async fn execute(
        &mut self,
        fetcher: &mut TemplateFetcher,
        generation: &str,
        config: &AppConfig,
        dest: &Path,
    ) -> Result<()> {
        match self.drive(fetcher, generation, config, dest).await {
            Ok(()) => {
                self.phase = Phase::Done;
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::Failed;
                Err(err)
            }
        }
    }

    async fn drive(
        &mut self,
        fetcher: &mut TemplateFetcher,
        generation: &str,
        config: &AppConfig,
        dest: &Path,
    ) -> Result<()> {
        self.phase = Phase::Resolving;

        let root = fetcher.fetch_root_manifest().await?;
        if !root.templates.iter().any(|t| t == generation) {
            return Err(Error::Manifest(format!(
                "unknown template generation '{}', available: {}",
                generation,
                root.templates.join(", ")
            )));
        }

        let manifest = fetcher.fetch_template_manifest(generation).await?;
        manifest.validate()?;

        self.features = resolve_active_features(config)?;

        let mut required: Vec<&str> = BASE_REQUIRED_FIELDS.to_vec();
        required.extend(manifest.required_fields.iter().map(String::as_str));
        // The process task page renders the process services endpoint
        if self.features.contains(&Feature::BpmTaskPage) {
            required.push("activitiServerHost");
        }
        config.ensure_fields(&required)?;

        let mut feature_files = root.feature_files.clone();
        feature_files.merge(&manifest.feature_files);

        self.phase = Phase::Materializing;
        self.written = materialize_template(
            fetcher,
            generation,
            &manifest,
            dest,
            config,
            &self.features,
            &feature_files,
        )
        .await?;

        Ok(())
    }
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::new()
    }
}
