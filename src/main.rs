use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strata_config::builtin::{INSTANCE_CONFIG_NAME, PREFIX, builtin_registry, default_instance_root};
use strata_config::config::{ConfigManager, render_json, render_override_template, render_text};

#[derive(Parser)]
#[command(name = "strata")]
#[command(
	author,
	version,
	about = "Inspect a layered, dependency-ordered instance configuration"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Instance root holding the override files (default: ~/.strata)
	#[arg(long, global = true, env = "STRATA_INSTANCE_ROOT", value_name = "DIR")]
	instance_root: Option<PathBuf>,

	/// Skip a configuration module (repeatable)
	#[arg(long, global = true, value_name = "MODULE")]
	exclude: Vec<String>,

	/// Enable debug logging
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Log level used when RUST_LOG is not set
	#[arg(long, global = true, default_value = "warn")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Print every resolved value in publication order
	Show,
	/// Print a single resolved value
	Get {
		/// Configuration name
		name: String,
	},
	/// Print documentation for every configuration element
	Docs {
		/// Emit JSON instead of text
		#[arg(long)]
		json: bool,
	},
	/// List loaded modules and modules that failed to load
	Modules,
	/// Write a commented instance_config.toml template into the instance root
	Init {
		/// Overwrite an existing instance_config.toml
		#[arg(long)]
		force: bool,
	},
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose, &cli.log_level);

	let instance_root = match cli.instance_root {
		Some(root) => root,
		None => default_instance_root().context("Failed to resolve home directory")?,
	};

	// init only needs the documentation, and must work when the file it
	// replaces no longer parses.
	let load_overrides = !matches!(cli.command, Commands::Init { .. });
	let manager = load_manager(&instance_root, &cli.exclude, load_overrides)?;

	match cli.command {
		Commands::Show => handle_show(&manager),
		Commands::Get { name } => handle_get(&manager, &name),
		Commands::Docs { json } => handle_docs(&manager, json),
		Commands::Modules => handle_modules(&manager),
		Commands::Init { force } => handle_init(&manager, &instance_root, force),
	}
}

fn init_tracing(verbose: bool, log_level: &str) {
	let log_level = if verbose { "debug" } else { log_level };

	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false)
				.with_level(true),
		)
		.with(env_filter)
		.init();
}

fn load_manager(instance_root: &Path, exclude: &[String], load_overrides: bool) -> Result<ConfigManager> {
	let registry = builtin_registry(instance_root, load_overrides).context("Failed to register built-in modules")?;
	ConfigManager::new(PREFIX, None, exclude.iter().cloned(), &registry)
		.with_context(|| format!("Failed to load configuration for {}", instance_root.display()))
}

fn handle_show(manager: &ConfigManager) -> Result<ExitCode> {
	for (name, value) in manager.namespace().iter() {
		println!("{} = {}", name, value);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_get(manager: &ConfigManager, name: &str) -> Result<ExitCode> {
	match manager.get(name) {
		Some(value) => {
			println!("{}", value);
			Ok(ExitCode::SUCCESS)
		}
		None => {
			eprintln!("Unknown configuration name: {}", name);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_docs(manager: &ConfigManager, json: bool) -> Result<ExitCode> {
	if json {
		let rendered = render_json(manager.doc_render()).context("Failed to render documentation")?;
		println!("{}", rendered);
	} else {
		print!("{}", render_text(manager.doc_render()));
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_modules(manager: &ConfigManager) -> Result<ExitCode> {
	println!("Loaded modules (in load order):");
	for name in manager.modules_loaded() {
		println!("  {}", name);
	}

	if !manager.failed_modules().is_empty() {
		println!("Failed modules (missing dependency):");
		for name in manager.failed_modules() {
			println!("  {}", name);
		}
		return Ok(ExitCode::FAILURE);
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_init(manager: &ConfigManager, instance_root: &Path, force: bool) -> Result<ExitCode> {
	let config_path = instance_root.join(INSTANCE_CONFIG_NAME);

	if config_path.exists() && !force {
		anyhow::bail!(
			"{} already exists. Use --force to overwrite.",
			config_path.display()
		);
	}

	std::fs::create_dir_all(instance_root)
		.with_context(|| format!("Failed to create {}", instance_root.display()))?;
	let template = render_override_template(manager.doc_render());
	std::fs::write(&config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {}", config_path.display());
	Ok(ExitCode::SUCCESS)
}
