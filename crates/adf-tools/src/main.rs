//! ADF CLI - Project scaffolding for Alfresco ADF applications

use anyhow::Result;
use clap::{Parser, Subcommand};
use generator_core::tui::CreateArgs;
use generator_core::{Feature, FeatureSet, ProductConfig};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Alfresco ADF product configuration
#[derive(Clone)]
pub struct AdfConfig;

impl ProductConfig for AdfConfig {
    fn name(&self) -> &'static str {
        "adf-app"
    }

    fn display_name(&self) -> &'static str {
        "Alfresco ADF App"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/AlfrescoLabs/adf-app-generator/main/templates"
    }

    fn template_url_env(&self) -> &'static str {
        "ADF_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://www.alfresco.com/abn/adf/docs"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding Alfresco ADF applications"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install adf-tools --force"
    }

    fn next_steps(&self, dir: &Path, features: &FeatureSet) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_ref() != Some(&dir.to_path_buf()) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install dependencies (delegated to the user)
        steps.push("npm install".to_string());

        // Step 3: Point the app at your servers
        if features.contains(&Feature::BpmTaskPage) {
            steps.push(
                "Review the content and process endpoints in app.config-dev.json".to_string(),
            );
        }

        // Step 4: Start dev server
        steps.push("npm start".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "adf-tools")]
#[command(about = "CLI for scaffolding Alfresco ADF applications")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new ADF application project
    Create(CliCreateArgs),
    /// Build zip files for all template generations (for development use)
    PackZips(PackZipsArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Local directory to use for templates instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Template generation to use (e.g. classic, webpack)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Features to include (comma-separated: searchBar,contentPage,bpmTaskPage,...)
    #[arg(short, long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            template: args.template,
            directory: args.directory,
            features: args.features,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct PackZipsArgs {
    /// Local directory containing templates to build zips from (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let product = AdfConfig;

    match args.command {
        Some(Command::Create(create_args)) => {
            let result = generator_core::run(&product, create_args.into(), CLI_VERSION).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::PackZips(pack_args)) => {
            generator_core::templates::pack_zips(&product, &pack_args.template_dir).await
        }
        None => {
            // No subcommand provided, default to create behavior (interactive mode)
            let create_args = CreateArgs::default();
            let result = generator_core::run(&product, create_args, CLI_VERSION).await;

            let _ = console::Term::stderr().show_cursor();

            result
        }
    }
}
