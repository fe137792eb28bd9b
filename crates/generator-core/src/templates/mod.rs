//! Template manifests, acquisition, rendering and materialization
//!
//! This module provides:
//! - Manifest types (RootManifest, TemplateManifest, FeatureFiles)
//! - Template fetching from remote URLs or local directories
//! - Handlebars rendering with the per-run context
//! - Candidate materialization with feature gating
//! - Version compatibility checking

pub mod fetcher;
pub mod manifest;
pub mod materializer;
pub mod renderer;
pub mod version;

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

pub use fetcher::{TemplateFetcher, TemplateSource};
pub use manifest::{FeatureFiles, FileGate, RootManifest, SharedFile, TemplateManifest};
pub use materializer::{materialize_template, should_materialize};
pub use renderer::{RenderContext, Renderer};
pub use version::check_compatibility;

/// Build zip files for all generations in a template directory
///
/// Development command behind `pack-zips`: the produced archives are what the
/// remote template source serves. Files present on disk but absent from a
/// generation's candidate list are reported, since they would silently never
/// ship.
pub async fn pack_zips<C: ProductConfig>(config: &C, template_dir: &Option<PathBuf>) -> Result<()> {
    let dir = template_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("templates"));

    if !dir.exists() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }

    let manifest_path = dir.join("template.yaml");
    if !manifest_path.exists() {
        anyhow::bail!("Root template.yaml not found in {}", dir.display());
    }

    let manifest_content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let root_manifest: manifest::RootManifest =
        serde_yaml::from_str(&manifest_content).context("Failed to parse root template.yaml")?;

    println!(
        "{}",
        format!("Building {} template zips...", config.display_name())
            .cyan()
            .bold()
    );
    println!();

    let mut built = 0;
    for generation in &root_manifest.templates {
        let generation_path = dir.join(generation);
        if !generation_path.exists() {
            eprintln!(
                "{} Generation directory not found: {}",
                "Warning:".yellow(),
                generation_path.display()
            );
            continue;
        }

        print!("  {} {}...", "->".blue(), generation);

        match fetcher::TemplateFetcher::build_local_zip(
            &dir,
            generation,
            &root_manifest.shared_files,
        ) {
            Ok(zip_bytes) => {
                let zip_path = dir.join(format!("{}.zip", generation));
                std::fs::write(&zip_path, &zip_bytes)
                    .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                println!(" {} ({} bytes)", "done".green(), zip_bytes.len());
                built += 1;

                report_unlisted_files(&dir, generation)?;
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {}", e);
            }
        }
    }

    println!();
    println!(
        "{} {} template zip(s) in {}",
        "Built".green().bold(),
        built,
        dir.display()
    );

    Ok(())
}

/// Warn about template files on disk that no candidate entry covers
fn report_unlisted_files(dir: &PathBuf, generation: &str) -> Result<()> {
    let generation_path = dir.join(generation);
    let manifest_path = generation_path.join("template.yaml");
    let manifest_content = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest: manifest::TemplateManifest = serde_yaml::from_str(&manifest_content)
        .with_context(|| format!("Failed to parse generation '{}' manifest", generation))?;

    let listed: HashSet<&str> = manifest.files.iter().map(String::as_str).collect();

    for entry in WalkDir::new(&generation_path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry
            .path()
            .strip_prefix(&generation_path)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        if relative == "template.yaml" {
            continue;
        }
        if !listed.contains(relative.as_str()) {
            eprintln!(
                "    {} '{}' is on disk but not in the candidate list",
                "Unlisted:".yellow(),
                relative
            );
        }
    }

    Ok(())
}
