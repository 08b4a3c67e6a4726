use clap::Parser;
use crossterm::tty::IsTty;
use repostat::git::{GitStatusRunner, StatusRunner};
use repostat::{AppResult, Config, Renderer};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "repostat",
    version,
    about = "Show which git repositories under a directory have uncommitted changes",
    long_about = "Recursively looks for git repositories under ROOT_PATH, runs `git status` \
    in each one and prints one line per repository: clean repositories plainly, dirty \
    ones with the kinds of changes found."
)]
struct Cli {
    #[arg(
        index = 1,
        help = "The top directory to recursively look for git repositories in (abs or rel)"
    )]
    root_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_tty())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::load()?;
    let renderer = Renderer::from_mode(config.report.color);

    let runner: Arc<dyn StatusRunner> = Arc::new(GitStatusRunner::from_config(&config.git));

    let report = repostat::collect(&cli.root_path, &config, runner).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", renderer.header(&report.root))?;
    renderer.write_report(&mut out, &report.repositories)?;

    if report.is_incomplete() {
        for line in report.summary() {
            eprintln!("{}", line);
        }
    }

    Ok(())
}
