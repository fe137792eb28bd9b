//! Shared helpers for the generation acceptance tests

use generator_core::{AppConfig, GenerationRun, TemplateFetcher};
use std::path::{Path, PathBuf};

/// The template directory shipped at the workspace root
pub fn template_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// Configuration mirroring a typical interactive session
pub fn base_config() -> AppConfig {
    AppConfig {
        project_name: "app-fake".to_string(),
        description: "A awesome alfresco APP".to_string(),
        github_account: "componentCreatorAccount".to_string(),
        author_name: "Alfresco Team".to_string(),
        author_email: "Sonikku.Hejjihoggu@alfresco.com".to_string(),
        author_url: "http://Hejjihoggu.io".to_string(),
        keywords: vec!["app-keyword".to_string(), "angular2-keyword".to_string()],
        alfresco_server_host: Some("http://servertTest:8080/share".to_string()),
        activiti_server_host: Some("http://servertTest:9999/share".to_string()),
        license: "MIT".to_string(),
        ..AppConfig::default()
    }
}

/// Run one full generation against the shipped templates
pub async fn generate(
    generation: &str,
    config: &AppConfig,
    dest: &Path,
) -> generator_core::Result<GenerationRun> {
    let mut fetcher = TemplateFetcher::from_local(template_dir(), "adf-tools-tests");
    let mut run = GenerationRun::new();
    run.execute(&mut fetcher, generation, config, dest).await?;
    Ok(run)
}

pub fn read(dest: &Path, rel: &str) -> String {
    std::fs::read_to_string(dest.join(rel))
        .unwrap_or_else(|e| panic!("expected file '{}' to be readable: {}", rel, e))
}

pub fn assert_files(dest: &Path, expected: &[&str]) {
    for rel in expected {
        assert!(dest.join(rel).is_file(), "expected file '{}' to exist", rel);
    }
}

pub fn assert_no_files(dest: &Path, not_expected: &[&str]) {
    for rel in not_expected {
        assert!(
            !dest.join(rel).exists(),
            "expected file '{}' to be absent",
            rel
        );
    }
}
