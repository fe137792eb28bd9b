//! Acceptance tests for the webpack generation

mod common;

use common::{assert_files, assert_no_files, base_config, generate, read, template_dir};
use generator_core::{
    AppConfig, Error, FeatureSelection, GenerationRun, Phase, TemplateFetcher,
};
use std::path::Path;

fn with_features(names: &[&str]) -> AppConfig {
    let mut config = base_config();
    config.features =
        FeatureSelection::List(names.iter().map(|n| n.to_string()).collect());
    config
}

const ALL_FEATURES: &[&str] = &["userInfo", "searchBar", "contentPage", "bpmTaskPage"];

#[tokio::test]
async fn empty_selection_yields_minimal_tree() {
    let dest = tempfile::tempdir().unwrap();
    let config = with_features(&[]);

    let run = generate("webpack", &config, dest.path()).await.unwrap();
    assert_eq!(run.phase(), Phase::Done);

    assert_no_files(
        dest.path(),
        &[
            "app/components/activiti/activiti-demo.component.html",
            "app/components/activiti/activiti-demo.component.ts",
            "app/components/activiti/form-node-viewer.component.ts",
            "app/components/activiti/form-viewer.component.ts",
            "app/components/files/files.component.html",
            "app/components/files/files.component.ts",
            "app/components/search/search.component.ts",
            "app/services/in-memory-form.service.ts",
        ],
    );

    let shell = read(dest.path(), "app/app.component.html");
    assert!(!shell.contains(r#"id="navigation-bar""#));

    let routes = read(dest.path(), "app/app.routes.ts");
    assert!(!routes.contains("UploadButtonComponent"));

    let main = read(dest.path(), "app/main.ts");
    assert!(!main.contains("UploadService"));
    assert!(!main.contains("ng2-alfresco-upload"));

    let app_config = read(dest.path(), "app.config-prod.json");
    assert!(app_config.contains("http://servertTest:8080/share"));
    assert!(!app_config.contains("bpmHost"));
}

#[tokio::test]
async fn all_optional_features() {
    let dest = tempfile::tempdir().unwrap();
    let config = with_features(ALL_FEATURES);

    let run = generate("webpack", &config, dest.path()).await.unwrap();
    assert_eq!(run.phase(), Phase::Done);

    assert_files(
        dest.path(),
        &[
            "tslint.json",
            "tsconfig.json",
            "README.md",
            "package.json",
            "index.html",
            ".gitignore",
            ".editorconfig",
            "app.config-dev.json",
            "app.config-prod.json",
            "karma.conf.js",
            "webpack.config.js",
            "app/main.ts",
            "app/vendor.ts",
            "app/polyfills.ts",
            "app/app.routes.ts",
            "app/app.component.ts",
            "app/app.component.html",
            "app/components/index.ts",
            "app/services/debug-app-config.service.ts",
            "app/services/in-memory-form.service.ts",
            "app/components/setting/settings.component.ts",
            "app/components/setting/settings.component.html",
            "app/components/login/login-demo.component.ts",
            "app/components/login/login-demo.component.html",
            "app/components/home/home.component.ts",
            "app/components/home/home.component.html",
            "app/components/about/about.component.ts",
            "app/components/files/files.component.html",
            "app/components/files/files.component.ts",
            "app/components/search/search.component.html",
            "app/components/search/search.component.ts",
            "app/components/search/search-bar.component.html",
            "app/components/search/search-bar.component.ts",
            "app/components/activiti/activiti-demo.component.html",
            "app/components/activiti/activiti-demo.component.ts",
            "app/components/activiti/form-viewer.component.ts",
            "app/components/activiti/form-node-viewer.component.ts",
            "app/components/activiti/apps.view.ts",
            "app/components/activiti/demo-field-validator.ts",
            "resources/i18n/en.json",
            "config/webpack.common.js",
            "config/webpack.dev.js",
            "config/webpack.prod.js",
        ],
    );

    let readme = read(dest.path(), "README.md");
    assert!(readme.contains("app-fake"));
    assert!(readme.contains("A awesome alfresco APP"));
    assert!(readme.contains("https://github.com/componentCreatorAccount/app-fake/releases"));

    let app_config = read(dest.path(), "app.config-prod.json");
    assert!(app_config.contains("http://servertTest:8080/share"));
    assert!(app_config.contains("http://servertTest:9999/share"));

    let index = read(dest.path(), "index.html");
    assert!(index.contains("app-fake"));

    let package = read(dest.path(), "package.json");
    assert!(package.contains(r#""name": "app-fake""#));
    assert!(package.contains(r#""author": "Alfresco Team <Sonikku.Hejjihoggu@alfresco.com>""#));
    assert!(package.contains(r#""description": "A awesome alfresco APP""#));
    assert!(package.contains(r#""url": "https://github.com/componentCreatorAccount/app-fake/issues""#));

    let routes = read(dest.path(), "app/app.routes.ts");
    assert!(routes.contains("FilesComponent"));
    assert!(routes.contains("component: ActivitiDemoComponent"));

    let vendor = read(dest.path(), "app/vendor.ts");
    assert!(vendor.contains("pdfjs-dist"));
    assert!(vendor.contains("pdf.worker.js"));
    assert!(vendor.contains("pdf_viewer.js"));

    let shell = read(dest.path(), "app/app.component.html");
    assert!(shell.contains("ng2-alfresco-userinfo"));
}

#[tokio::test]
async fn process_service_only() {
    let dest = tempfile::tempdir().unwrap();
    let config = with_features(&["bpmTaskPage"]);

    generate("webpack", &config, dest.path()).await.unwrap();

    assert_files(
        dest.path(),
        &[
            "README.md",
            "index.html",
            "app/main.ts",
            "app/components/index.ts",
            "app/app.routes.ts",
            "app/app.component.ts",
            "app/app.component.html",
            "app/components/activiti/activiti-demo.component.html",
            "app/components/activiti/activiti-demo.component.ts",
            "app/components/activiti/form-viewer.component.ts",
            "app/components/activiti/form-node-viewer.component.ts",
            "app/components/activiti/apps.view.ts",
            "app/components/activiti/demo-field-validator.ts",
            "app/services/in-memory-form.service.ts",
        ],
    );

    assert_no_files(
        dest.path(),
        &[
            "app/components/files/files.component.html",
            "app/components/files/files.component.ts",
            "app/components/search/search.component.ts",
        ],
    );

    // Document preview ships with the content page, not with processes
    let vendor = read(dest.path(), "app/vendor.ts");
    assert!(!vendor.contains("pdfjs-dist"));
}

#[tokio::test]
async fn generation_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let config = with_features(ALL_FEATURES);

    generate("webpack", &config, first.path()).await.unwrap();
    generate("webpack", &config, second.path()).await.unwrap();

    let mut paths = Vec::new();
    for entry in walkdir::WalkDir::new(first.path())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        paths.push(entry.path().strip_prefix(first.path()).unwrap().to_path_buf());
    }
    assert!(!paths.is_empty());

    for rel in paths {
        let a = std::fs::read(first.path().join(&rel)).unwrap();
        let b = std::fs::read(second.path().join(&rel)).unwrap();
        assert_eq!(a, b, "trees differ at {}", rel.display());
    }
}

#[tokio::test]
async fn unknown_feature_fails_before_any_write() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("app-fake");
    let config = with_features(&["serachBar"]);

    let err = run_to_error("webpack", &config, &dest).await;
    match err {
        Error::UnknownFeature { name } => assert_eq!(name, "serachBar"),
        other => panic!("expected UnknownFeature, got {:?}", other),
    }
    assert!(!dest.exists(), "no output directory may be created");
}

#[tokio::test]
async fn missing_field_fails_before_any_write() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("app-fake");
    let mut config = with_features(&[]);
    config.description.clear();

    let err = run_to_error("webpack", &config, &dest).await;
    match err {
        Error::MissingField { field } => assert_eq!(field, "description"),
        other => panic!("expected MissingField, got {:?}", other),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn webpack_requires_content_services_host() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("app-fake");
    let mut config = with_features(&[]);
    config.alfresco_server_host = None;

    let err = run_to_error("webpack", &config, &dest).await;
    match err {
        Error::MissingField { field } => assert_eq!(field, "alfrescoServerHost"),
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[tokio::test]
async fn bpm_task_page_requires_process_services_host() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("app-fake");
    let mut config = with_features(&["bpmTaskPage"]);
    config.activiti_server_host = None;

    let err = run_to_error("webpack", &config, &dest).await;
    match err {
        Error::MissingField { field } => assert_eq!(field, "activitiServerHost"),
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_run_reports_failed_phase() {
    let tmp = tempfile::tempdir().unwrap();
    let config = with_features(&["serachBar"]);

    let mut fetcher = TemplateFetcher::from_local(template_dir(), "adf-tools-tests");
    let mut run = GenerationRun::new();
    let result = run
        .execute(&mut fetcher, "webpack", &config, &tmp.path().join("out"))
        .await;

    assert!(result.is_err());
    assert_eq!(run.phase(), Phase::Failed);
    assert!(run.written().is_empty());
}

#[tokio::test]
async fn unknown_generation_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let config = with_features(&[]);

    let err = run_to_error("angular-cli", &config, &tmp.path().join("out")).await;
    assert!(matches!(err, Error::Manifest(_)));
}

async fn run_to_error(generation: &str, config: &AppConfig, dest: &Path) -> Error {
    let mut fetcher = TemplateFetcher::from_local(template_dir(), "adf-tools-tests");
    let mut run = GenerationRun::new();
    run.execute(&mut fetcher, generation, config, dest)
        .await
        .expect_err("run was expected to fail")
}
