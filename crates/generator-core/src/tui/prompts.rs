//! Charm-style CLI prompts using cliclack

use crate::config::{AppConfig, FeatureSelection};
use crate::features::Feature;
use crate::orchestrator::GenerationRun;
use crate::product::ProductConfig;
use crate::runtime;
use crate::templates::manifest::TemplateManifest;
use crate::templates::{fetcher::TemplateFetcher, version};
use anyhow::Result;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Template generation to use
    pub template: Option<String>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Features to include
    pub features: Option<Vec<String>>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(product: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(product.display_name())?;

    // Step 1: Setup template fetcher
    let mut fetcher = setup_fetcher(product, &args.template_dir)?;

    // Step 2: Select generation
    let (generation, manifest) = select_generation(&mut fetcher, args.template.as_deref()).await?;

    // Check version compatibility
    if let Some(warning) =
        version::check_compatibility(cli_version, &manifest.version, product.upgrade_command())
    {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(&warning)
        ))?;
    }

    // Step 3: Collect the configuration record
    let config = collect_config(&manifest, &args)?;

    // Step 4: Select directory
    let project_dir = select_directory(&args, &config.project_name)?;

    // Step 5: Advisory runtime summary (generated project is a Node app)
    report_runtimes()?;

    // Step 6: Create project
    let run = create_project(&mut fetcher, &generation, &config, &project_dir).await?;

    // Step 7: Show next steps
    print_next_steps(product, &project_dir, &run)?;

    Ok(())
}

fn setup_fetcher<C: ProductConfig>(
    product: &C,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), product.user_agent())
        }
        None => {
            cliclack::log::info("Using remote templates")?;
            TemplateFetcher::from_config(product)?
        }
    };

    Ok(fetcher)
}

async fn select_generation(
    fetcher: &mut TemplateFetcher,
    specified: Option<&str>,
) -> Result<(String, TemplateManifest)> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let root_manifest = fetcher.fetch_root_manifest().await?;

    // If a generation was specified via --template flag, use it directly
    if let Some(generation) = specified {
        if !root_manifest.templates.iter().any(|t| t == generation) {
            spinner.stop("Failed to load templates");
            let available = root_manifest.templates.join(", ");
            anyhow::bail!(
                "Template '{}' not found. Available templates: {}",
                generation,
                available
            );
        }

        let manifest = fetcher.fetch_template_manifest(generation).await?;
        spinner.stop(format!("Template: {} - {}", manifest.name, manifest.description));
        return Ok((generation.to_string(), manifest));
    }

    let mut generations: Vec<(String, TemplateManifest)> = Vec::new();
    for generation in &root_manifest.templates {
        let manifest = fetcher.fetch_template_manifest(generation).await?;
        generations.push((generation.clone(), manifest));
    }

    spinner.stop("Templates loaded");

    if generations.is_empty() {
        anyhow::bail!("No templates found.");
    }

    // If only one generation, use it automatically
    if generations.len() == 1 {
        let (name, manifest) = generations.into_iter().next().unwrap();
        cliclack::log::info(format!(
            "Using template: {} - {}",
            manifest.name, manifest.description
        ))?;
        return Ok((name, manifest));
    }

    // Build select prompt - use indices to avoid borrow issues
    let mut select = cliclack::select("Select a template generation");
    for (idx, (_, manifest)) in generations.iter().enumerate() {
        select = select.item(idx, &manifest.name, &manifest.description);
    }

    let selected_idx: usize = select.interact()?;
    let (name, manifest) = generations.into_iter().nth(selected_idx).unwrap();

    Ok((name, manifest))
}

/// Collect the immutable configuration record for this run
fn collect_config(manifest: &TemplateManifest, args: &CreateArgs) -> Result<AppConfig> {
    if args.yes {
        return Ok(default_config(manifest, args));
    }

    let project_name: String = cliclack::input("Project name")
        .placeholder("my-adf-app")
        .default_input("my-adf-app")
        .interact()?;

    let description: String = cliclack::input("Description")
        .default_input("An Alfresco application")
        .interact()?;

    let github_account: String = cliclack::input("GitHub account")
        .placeholder("your-github-account")
        .default_input("alfresco")
        .interact()?;

    let author_name: String = cliclack::input("Author name")
        .default_input("Alfresco Team")
        .interact()?;

    let author_email: String = cliclack::input("Author email")
        .default_input("devtools@alfresco.com")
        .interact()?;

    let author_url: String = cliclack::input("Author URL")
        .default_input("https://www.alfresco.com")
        .interact()?;

    let keywords_raw: String = cliclack::input("Keywords (comma separated)")
        .default_input("alfresco,angular")
        .interact()?;
    let keywords = split_keywords(&keywords_raw);

    let license: &str = cliclack::select("License")
        .item("MIT", "MIT", "")
        .item("Apache-2.0", "Apache-2.0", "")
        .item("GPL-3.0", "GPL-3.0", "")
        .item("UNLICENSED", "UNLICENSED", "proprietary")
        .interact()?;

    let features = select_features(manifest, args)?;

    // Server endpoints, only where the generation or selection needs them
    let alfresco_server_host = if manifest
        .required_fields
        .iter()
        .any(|f| f == "alfrescoServerHost")
    {
        let host: String = cliclack::input("Content services host")
            .default_input("http://localhost:8080/share")
            .interact()?;
        Some(host)
    } else {
        None
    };

    let activiti_server_host = if features.contains(&"bpmTaskPage".to_string()) {
        let host: String = cliclack::input("Process services host")
            .default_input("http://localhost:9999/activiti")
            .interact()?;
        Some(host)
    } else {
        None
    };

    Ok(AppConfig {
        project_name,
        description,
        github_account,
        author_name,
        author_email,
        author_url,
        keywords,
        alfresco_server_host,
        activiti_server_host,
        license: license.to_string(),
        features: FeatureSelection::List(features),
    })
}

/// Non-interactive defaults for --yes mode
fn default_config(manifest: &TemplateManifest, args: &CreateArgs) -> AppConfig {
    let features = args.features.clone().unwrap_or_default();
    let needs_alfresco_host = manifest
        .required_fields
        .iter()
        .any(|f| f == "alfrescoServerHost");
    let needs_activiti_host = features.iter().any(|f| f == "bpmTaskPage");

    AppConfig {
        project_name: "my-adf-app".to_string(),
        description: "An Alfresco application".to_string(),
        github_account: "alfresco".to_string(),
        author_name: "Alfresco Team".to_string(),
        author_email: "devtools@alfresco.com".to_string(),
        author_url: "https://www.alfresco.com".to_string(),
        keywords: vec!["alfresco".to_string(), "angular".to_string()],
        alfresco_server_host: needs_alfresco_host
            .then(|| "http://localhost:8080/share".to_string()),
        activiti_server_host: needs_activiti_host
            .then(|| "http://localhost:9999/activiti".to_string()),
        license: "MIT".to_string(),
        features: FeatureSelection::List(features),
    }
}

/// Pick optional features from what the generation supports
///
/// Identifiers from --features are passed through verbatim; a typo is caught
/// by the registry before anything is written.
fn select_features(manifest: &TemplateManifest, args: &CreateArgs) -> Result<Vec<String>> {
    if let Some(requested) = &args.features {
        return Ok(requested.clone());
    }

    let selectable: Vec<Feature> = Feature::ALL
        .into_iter()
        .filter(|f| manifest.supports(*f))
        .collect();

    if selectable.is_empty() {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect("Select optional features");
    for feature in &selectable {
        multi = multi.item(*feature, feature.title(), feature.hint());
    }

    let selected: Vec<Feature> = multi.required(false).interact()?;

    if selected.is_empty() {
        cliclack::log::info("No optional features selected")?;
    } else {
        let names: Vec<&str> = selected.iter().map(|f| f.title()).collect();
        cliclack::log::success(format!("Features: {}", names.join(", ")))?;
    }

    Ok(selected.iter().map(|f| f.id().to_string()).collect())
}

fn select_directory(args: &CreateArgs, project_name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Use --directory flag if provided
    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir.join(project_name)
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(project_name)
            .default_input(project_name)
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != std::path::Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files
    if path.exists() && path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                // Auto-confirm with --yes flag
                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn report_runtimes() -> Result<()> {
    for info in runtime::project_runtimes() {
        if info.available {
            cliclack::log::success(format!(
                "{} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown")
            ))?;
        } else {
            cliclack::log::warning(format!(
                "{} not detected - install it before running the generated app",
                info.name
            ))?;
        }
    }
    Ok(())
}

async fn create_project(
    fetcher: &mut TemplateFetcher,
    generation: &str,
    config: &AppConfig,
    project_dir: &PathBuf,
) -> Result<GenerationRun> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let mut run = GenerationRun::new();
    match run.execute(fetcher, generation, config, project_dir).await {
        Ok(()) => {
            spinner.stop(format!(
                "Created {} files in {}",
                run.written().len(),
                project_dir.display()
            ));
            Ok(run)
        }
        Err(err) => {
            spinner.stop("Project creation failed");
            Err(err.into())
        }
    }
}

fn print_next_steps<C: ProductConfig>(
    product: &C,
    project_dir: &PathBuf,
    run: &GenerationRun,
) -> Result<()> {
    let steps = product.next_steps(project_dir, run.features());

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
