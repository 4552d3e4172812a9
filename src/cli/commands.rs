use super::prompt::{PromptOutcome, ServicePrompt};
use super::table::render_services;
use crate::domain::{ComposeRuntime, Service};
use crate::infra::{ComposeAdapter, ConfigStore, Settings, SettingsOverrides, Workdir};
use crate::services::Orchestrator;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "composer",
    version,
    about = "Manage a directory of compose overlay files and their dependencies"
)]
pub struct Cli {
    /// Directory holding compose.yml, services/ and debug/ (default: .)
    #[arg(long, global = true, env = "COMPOSER_WORKDIR")]
    pub workdir: Option<PathBuf>,

    /// Service config file (default: <workdir>/composer.yml)
    #[arg(long, global = true, env = "COMPOSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Orchestration command, e.g. "docker compose" (default: docker-compose)
    #[arg(long, global = true, env = "COMPOSER_COMPOSE_CMD")]
    pub compose_cmd: Option<String>,

    /// Debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create the working directory layout and an empty config file
    Init,
    /// Show every configured service
    List,
    /// Interactively define a new service
    Add,
    /// Validate the config and show the start order
    Check,
    /// Start services together with their dependencies
    Up {
        #[arg(required = true)]
        services: Vec<String>,
        /// Also pass existing debug overlays
        #[arg(short, long)]
        debug: bool,
        /// Run containers in the background
        #[arg(short = 'D', long)]
        detach: bool,
    },
    /// Start every configured service
    UpAll {
        #[arg(short, long)]
        debug: bool,
        #[arg(short = 'D', long)]
        detach: bool,
    },
    /// Stop services together with their dependencies
    Down {
        #[arg(required = true)]
        services: Vec<String>,
        /// Stop without waiting (timeout 0)
        #[arg(short, long)]
        force: bool,
        /// Remove volumes as well
        #[arg(short, long)]
        volume: bool,
    },
    /// Stop every configured service
    DownAll {
        #[arg(short, long)]
        force: bool,
        #[arg(short, long)]
        volume: bool,
    },
    /// Build services together with their dependencies
    Build {
        #[arg(required = true)]
        services: Vec<String>,
    },
    /// Build every configured service
    BuildAll,
}

struct App {
    settings: Settings,
}

impl App {
    fn workdir(&self) -> Workdir {
        Workdir::new(&self.settings.workdir)
    }

    fn store(&self) -> Result<ConfigStore> {
        Ok(ConfigStore::open(&self.settings.config_path)?)
    }

    fn runtime(&self) -> Result<Arc<ComposeAdapter>> {
        let adapter = ComposeAdapter::from_command(&self.settings.compose_command)
            .context("compose command is empty")?;
        Ok(Arc::new(adapter))
    }

    fn orchestrator(&self) -> Result<Orchestrator> {
        Ok(Orchestrator::new(
            self.store()?,
            self.workdir(),
            self.runtime()?,
        ))
    }

    fn init(&self) -> Result<i32> {
        let workdir = self.workdir();
        workdir.ensure_layout()?;
        let store = ConfigStore::open_or_create(&self.settings.config_path)?;

        println!("✅ Working directory ready at {:?}", workdir.root());
        println!("✅ Config file: {:?}", store.path());
        Ok(0)
    }

    fn list(&self) -> Result<i32> {
        let services = listed_services(&self.store()?)?;
        println!("{}", render_services(&services));
        Ok(0)
    }

    fn add(&self) -> Result<i32> {
        let orchestrator = self.orchestrator()?;
        let existing = listed_services(orchestrator.store())?;

        println!("Let's create new service. List of existing services:");
        println!("{}", render_services(&existing));

        let outcome = ServicePrompt::new(io::stdin().lock(), io::stdout().lock())
            .run()
            .context("reading service definition")?;

        match outcome {
            PromptOutcome::Cancel => println!("Aborting..."),
            PromptOutcome::Submit(service) => {
                let name = service.short_name.clone();
                orchestrator
                    .add_service(service)
                    .with_context(|| format!("adding service '{name}'"))?;
                println!("✅ Success!");
            }
        }
        Ok(0)
    }

    fn check(&self) -> Result<i32> {
        let store = self.store()?;
        let ordered = store.load_and_validate()?;

        println!(
            "✅ {:?} is valid ({} service(s))",
            store.path(),
            ordered.len()
        );
        if !ordered.is_empty() {
            let order: Vec<&str> = ordered.iter().map(|s| s.short_name.as_str()).collect();
            println!("Start order: {}", order.join(" -> "));
        }

        let command = self.settings.compose_command.join(" ");
        if self.runtime()?.is_available() {
            println!("✅ {command} available");
        } else {
            println!("⚠️  {command} not found in PATH");
        }
        Ok(0)
    }
}

/// Services as shown to the user: validated, dependencies first.
fn listed_services(store: &ConfigStore) -> Result<Vec<Service>> {
    Ok(store.load_and_validate()?)
}

/// Executes the parsed command. The returned value is the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let settings = Settings::resolve(SettingsOverrides {
        workdir: cli.workdir,
        config: cli.config,
        compose_cmd: cli.compose_cmd,
    })?;
    let app = App { settings };

    let code = match cli.command {
        Commands::Init => app.init()?,
        Commands::List => app.list()?,
        Commands::Add => app.add()?,
        Commands::Check => app.check()?,
        Commands::Up {
            services,
            debug,
            detach,
        } => app.orchestrator()?.up(&services, debug, detach)?,
        Commands::UpAll { debug, detach } => app.orchestrator()?.up_all(debug, detach)?,
        Commands::Down {
            services,
            force,
            volume,
        } => app.orchestrator()?.down(&services, force, volume)?,
        Commands::DownAll { force, volume } => app.orchestrator()?.down_all(force, volume)?,
        Commands::Build { services } => app.orchestrator()?.build(&services)?,
        Commands::BuildAll => app.orchestrator()?.build_all()?,
    };

    Ok(code)
}
