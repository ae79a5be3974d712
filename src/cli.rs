use crate::builder::Mix;
use crate::capability::CapabilityRegistry;
use crate::compiler::{CommandCompiler, Compiler, DryRunCompiler};
use crate::config::Config;
use crate::config::constants::MIX_FILE;
use crate::error::{MixError, Result};
use crate::graph::assemble;
use crate::mixfile::MixFile;
use crate::resolver::{Installer, NpmInstaller};
use crate::session::Finalized;
use crate::watch::watch_and_rebuild;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Set on the re-executed process after dependencies were installed
const RESTART_ENV: &str = "MIXR_RESTARTED";

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Resolve dependencies, assemble the build graph and compile
    Build {
        /// Mix file
        #[clap(short, long, default_value = MIX_FILE)]
        file: PathBuf,
        /// Production build
        #[clap(short, long)]
        production: bool,
        /// Watch
        #[clap(short, long)]
        watch: bool,
        /// Assemble and run tasks without invoking the compiler
        #[clap(long)]
        dry_run: bool,
        /// Compiler command; the graph file path is appended
        #[clap(short, long, default_value = "webpack --config")]
        compiler: String,
    },

    /// Print the assembled build graph as JSON
    Graph {
        /// Mix file
        #[clap(short, long, default_value = MIX_FILE)]
        file: PathBuf,
        /// Production build
        #[clap(short, long)]
        production: bool,
    },

    /// List active capabilities and their dependencies
    Deps {
        /// Mix file
        #[clap(short, long, default_value = MIX_FILE)]
        file: PathBuf,
        /// Production build
        #[clap(short, long)]
        production: bool,
    },
}

/// mixr Command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Load the mix file and replay it on a fresh builder
pub fn load_mix(root: &Path, file: &Path, production: bool) -> Result<Mix> {
    let mut config = Config::from_env();
    config.production |= production;

    let mut mix = Mix::with_config(root, config);
    MixFile::load(&root.join(file))?.apply(&mut mix)?;
    debug!("Loaded {:?}, production: {}", file, mix.in_production());
    Ok(mix)
}

pub async fn build_command(
    file: PathBuf,
    production: bool,
    watch: bool,
    dry_run: bool,
    compiler: String,
) -> Result<()> {
    let root = std::env::current_dir()?;
    let mix = load_mix(&root, &file, production)?;
    let registry = CapabilityRegistry::with_defaults();
    let installer = NpmInstaller::new(&root);

    let mut session = match mix.finalize(&registry, &installer).await? {
        Finalized::Ready(session) => session,
        Finalized::RestartRequired { installed } => return restart(&installed).await,
    };

    let compiler: Box<dyn Compiler> = if dry_run {
        Box::new(DryRunCompiler)
    } else {
        Box::new(CommandCompiler::from_command_line(&root, &compiler)?)
    };

    let report = session.run(compiler.as_ref()).await?;
    info!("Build completed: {} assets", report.assets.len());

    if watch {
        watch_and_rebuild(&mut session, compiler.as_ref()).await?;
    }

    Ok(())
}

pub fn graph_command(file: PathBuf, production: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let mix = load_mix(&root, &file, production)?;
    let registry = CapabilityRegistry::with_defaults();

    let assembly = assemble(mix.root(), mix.config(), &registry)?;
    println!("{}", serde_json::to_string_pretty(&assembly.graph.to_json())?);
    Ok(())
}

pub async fn deps_command(file: PathBuf, production: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let mix = load_mix(&root, &file, production)?;
    let registry = CapabilityRegistry::with_defaults();
    let installer = NpmInstaller::new(&root);

    for capability in registry.active(mix.config()) {
        let dependencies = capability.dependencies(mix.config());
        if dependencies.is_empty() {
            println!("{}", capability.name());
            continue;
        }

        let mut listed = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let marker = if installer.is_present(&dependency).await? {
                ""
            } else {
                " (missing)"
            };
            listed.push(format!("{dependency}{marker}"));
        }
        println!("{}: {}", capability.name(), listed.join(", "));
    }
    Ok(())
}

/// Re-run the current command once newly installed packages are available
async fn restart(installed: &[String]) -> Result<()> {
    if std::env::var_os(RESTART_ENV).is_some() {
        return Err(MixError::resolution(format!(
            "still missing after restart: {}",
            installed.join(", ")
        )));
    }

    warn!("Installed {}; restarting", installed.join(", "));
    let status = tokio::process::Command::new(std::env::current_exe()?)
        .args(std::env::args_os().skip(1))
        .env(RESTART_ENV, "1")
        .status()
        .await?;

    if status.success() {
        Ok(())
    } else {
        Err(MixError::other(format!("restarted build exited with {status}")))
    }
}
