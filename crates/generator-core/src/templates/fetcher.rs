//! Template acquisition from a remote URL or a local directory
//!
//! Both sources hand the engine the same thing: a zip per generation.
//! Remote fetches pre-built zips (see `pack_zips`); local builds the zip in
//! memory from the template folder. Identical behavior between development
//! and production.

use super::manifest::{RootManifest, SharedFile, TemplateManifest};
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use tokio::fs;
use url::Url;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Template source - either remote URL or local directory
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a remote template source from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let url_str = std::env::var(config.template_url_env())
            .unwrap_or_else(|_| config.default_template_url().to_string());
        let url =
            Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::Remote(url))
    }

    /// Create a local template source from a path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Extracted generation data held in memory for the duration of a run
#[derive(Debug, Clone)]
struct GenerationCache {
    manifest: TemplateManifest,
    files: HashMap<String, Vec<u8>>,
}

/// Retrieves template generations and serves their files to the materializer
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    cache: HashMap<String, GenerationCache>,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            cache: HashMap::new(),
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self> {
        let source = TemplateSource::from_config(config)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Create a fetcher for local templates
    pub fn from_local(path: PathBuf, user_agent: &str) -> Self {
        Self::new(TemplateSource::local(path), user_agent)
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    /// Fetch the root manifest listing available generations
    pub async fn fetch_root_manifest(&self) -> Result<RootManifest> {
        match &self.source {
            TemplateSource::Remote(base_url) => {
                let url = Self::build_url(base_url, "template.yaml")?;
                let response =
                    self.client.get(url.clone()).send().await.with_context(|| {
                        format!("Failed to fetch root template manifest from {}", url)
                    })?;

                if !response.status().is_success() {
                    anyhow::bail!(
                        "Failed to fetch root manifest from {}: HTTP {}",
                        url,
                        response.status()
                    );
                }

                let content = response.text().await?;
                serde_yaml::from_str(&content).context("Failed to parse root manifest")
            }
            TemplateSource::Local(path) => {
                let manifest_path = path.join("template.yaml");
                let content = fs::read_to_string(&manifest_path)
                    .await
                    .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
                serde_yaml::from_str(&content).context("Failed to parse root manifest")
            }
        }
    }

    /// Build a zip for a local generation (reads the files list from template.yaml)
    ///
    /// Shared files from the root templates directory are bundled in with
    /// optional renaming and appended to the manifest's candidate list so
    /// they materialize like any other untagged file.
    pub fn build_local_zip(
        template_dir: &PathBuf,
        generation: &str,
        shared_files: &[SharedFile],
    ) -> Result<Vec<u8>> {
        let generation_path = template_dir.join(generation);
        let manifest_path = generation_path.join("template.yaml");

        let manifest_content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let mut manifest: TemplateManifest = serde_yaml::from_str(&manifest_content)
            .with_context(|| format!("Failed to parse generation '{}' manifest", generation))?;

        // Shared file destinations join the candidate list
        for shared in shared_files {
            let dest = shared.destination().to_string();
            if !manifest.files.contains(&dest) {
                manifest.files.push(dest);
            }
        }

        let manifest_content =
            serde_yaml::to_string(&manifest).context("Failed to serialize updated manifest")?;

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            // template.yaml first, with the updated candidate list
            let manifest_zip_path = format!("{}/template.yaml", generation);
            zip.start_file(&manifest_zip_path, options)?;
            zip.write_all(manifest_content.as_bytes())?;

            for shared in shared_files {
                let source_path = template_dir.join(&shared.source);
                let dest_name = shared.destination();

                if source_path.exists() {
                    let content = std::fs::read(&source_path).with_context(|| {
                        format!("Failed to read shared file {}", source_path.display())
                    })?;
                    let zip_path = format!("{}/{}", generation, dest_name);
                    zip.start_file(&zip_path, options)?;
                    zip.write_all(&content)?;
                } else {
                    eprintln!(
                        "Warning: Shared file '{}' not found in {}",
                        shared.source,
                        template_dir.display()
                    );
                }
            }

            let shared_dests: HashSet<_> =
                shared_files.iter().map(|s| s.destination()).collect();

            for file_path in &manifest.files {
                // Already added above
                if shared_dests.contains(file_path.as_str()) {
                    continue;
                }

                let full_path = generation_path.join(file_path);
                if full_path.exists() {
                    let content = std::fs::read(&full_path)
                        .with_context(|| format!("Failed to read {}", full_path.display()))?;
                    let zip_path = format!("{}/{}", generation, file_path);
                    zip.start_file(&zip_path, options)?;
                    zip.write_all(&content)?;
                } else {
                    // Warn but don't fail - the candidate may be gated off anyway
                    eprintln!(
                        "Warning: File '{}' not found (specified in {})",
                        full_path.display(),
                        manifest_path.display()
                    );
                }
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    /// Extract a zip into the generation cache
    fn extract_zip_to_cache(zip_bytes: &[u8], generation: &str) -> Result<GenerationCache> {
        let cursor = Cursor::new(zip_bytes);
        let mut archive = ZipArchive::new(cursor)
            .with_context(|| format!("Failed to read zip archive for generation '{}'", generation))?;

        let mut files: HashMap<String, Vec<u8>> = HashMap::new();
        let mut manifest: Option<TemplateManifest> = None;

        // Zip entries are prefixed with the generation name; strip it
        let prefix = format!("{}/", generation);

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let full_path = file.name().to_string();

            if file.is_dir() {
                continue;
            }

            let relative_path = if full_path.starts_with(&prefix) {
                full_path[prefix.len()..].to_string()
            } else {
                full_path.clone()
            };

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            if relative_path == "template.yaml" {
                let content_str = String::from_utf8_lossy(&contents);
                manifest = Some(serde_yaml::from_str(&content_str).with_context(|| {
                    format!("Failed to parse generation '{}' manifest", generation)
                })?);
            }

            files.insert(relative_path, contents);
        }

        let manifest = manifest.ok_or_else(|| {
            anyhow::anyhow!("Generation '{}' zip missing template.yaml", generation)
        })?;

        Ok(GenerationCache { manifest, files })
    }

    /// Fetch/build and cache a generation's zip
    async fn fetch_and_cache(&mut self, generation: &str) -> Result<()> {
        if self.cache.contains_key(generation) {
            return Ok(());
        }

        let zip_bytes = match &self.source {
            TemplateSource::Remote(base_url) => {
                let zip_url = Self::build_url(base_url, &format!("{}.zip", generation))?;
                let response = self
                    .client
                    .get(zip_url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch generation zip: {}", generation))?;

                if !response.status().is_success() {
                    anyhow::bail!(
                        "Failed to fetch generation '{}' zip from {}: HTTP {}",
                        generation,
                        zip_url,
                        response.status()
                    );
                }

                response.bytes().await?.to_vec()
            }
            TemplateSource::Local(path) => {
                // The root manifest supplies the shared file list
                let root_manifest_path = path.join("template.yaml");
                let root_content = std::fs::read_to_string(&root_manifest_path)
                    .with_context(|| format!("Failed to read {}", root_manifest_path.display()))?;
                let root_manifest: RootManifest = serde_yaml::from_str(&root_content)
                    .context("Failed to parse root template.yaml")?;

                Self::build_local_zip(path, generation, &root_manifest.shared_files)?
            }
        };

        let cache = Self::extract_zip_to_cache(&zip_bytes, generation)?;
        self.cache.insert(generation.to_string(), cache);

        Ok(())
    }

    /// Fetch a specific generation's manifest
    pub async fn fetch_template_manifest(&mut self, generation: &str) -> Result<TemplateManifest> {
        self.fetch_and_cache(generation).await?;
        let cache = self
            .cache
            .get(generation)
            .ok_or_else(|| anyhow::anyhow!("Generation '{}' not found in cache", generation))?;
        Ok(cache.manifest.clone())
    }

    /// Fetch a template file as bytes
    pub async fn fetch_file_bytes(&mut self, generation: &str, file_path: &str) -> Result<Vec<u8>> {
        self.fetch_and_cache(generation).await?;
        let cache = self
            .cache
            .get(generation)
            .ok_or_else(|| anyhow::anyhow!("Generation '{}' not found in cache", generation))?;
        cache.files.get(file_path).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "File '{}' not found in generation '{}'",
                file_path,
                generation
            )
        })
    }

    /// Fetch a template file as text
    pub async fn fetch_file(&mut self, generation: &str, file_path: &str) -> Result<String> {
        let bytes = self.fetch_file_bytes(generation, file_path).await?;
        String::from_utf8(bytes).context("File is not valid UTF-8")
    }
}
