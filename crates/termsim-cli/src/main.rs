use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "termsim")]
#[command(about = "termsim - simulated kubectl and git terminal for practice sessions", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.config/termsim/config.toml
    #[arg(long, global = true, env = "TERMSIM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal bound to one session
    Repl {
        /// Continue an existing session
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Run a single command and print the response
    Exec {
        #[arg(long)]
        session: Option<String>,
        #[arg(long)]
        user: Option<String>,
        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Print a session's stored state
    Show { session_id: String },
    /// Restore a session's default environment
    Reset { session_id: String },
    /// Create a session without running a command
    Create {
        #[arg(long)]
        user: Option<String>,
    },
    /// List stored session ids
    List,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(
            std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "termsim=info".to_string()),
        );

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Repl { session, user } => {
            let app = bootstrap::App::load(cli.config, true).await?;
            commands::repl::run(&app, session, user).await?
        }
        Commands::Exec {
            session,
            user,
            json,
            command,
        } => {
            let app = bootstrap::App::load(cli.config, true).await?;
            commands::exec::run(&app, command.join(" "), session, user, json).await?
        }
        Commands::Show { session_id } => {
            let app = bootstrap::App::load(cli.config, false).await?;
            commands::session::show(&app, &session_id).await?
        }
        Commands::Reset { session_id } => {
            let app = bootstrap::App::load(cli.config, false).await?;
            commands::session::reset(&app, &session_id).await?
        }
        Commands::Create { user } => {
            let app = bootstrap::App::load(cli.config, false).await?;
            commands::session::create(&app, user).await?
        }
        Commands::List => {
            let app = bootstrap::App::load(cli.config, false).await?;
            commands::session::list(&app).await?
        }
    }

    Ok(())
}
