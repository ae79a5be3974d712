use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use mixr::cli::{Cli, Commands, build_command, deps_command, graph_command};
use mixr::logging;

#[tokio::main]
async fn main() {
    let console = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    // A missing log file only costs the debug trace
    let file = std::env::current_dir()
        .ok()
        .and_then(|dir| logging::create_log_file(&dir).ok())
        .map(|log_file| {
            fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_filter(EnvFilter::new("debug"))
        });

    tracing_subscriber::registry().with(console).with(file).init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> mixr::Result<()> {
    let args = Cli::parse();
    match args.cmd {
        Commands::Build {
            file,
            production,
            watch,
            dry_run,
            compiler,
        } => {
            build_command(file, production, watch, dry_run, compiler).await?;
        }
        Commands::Graph { file, production } => {
            graph_command(file, production)?;
        }
        Commands::Deps { file, production } => {
            deps_command(file, production).await?;
        }
    }
    Ok(())
}
