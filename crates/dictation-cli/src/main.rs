//! CLI entry point - the composition root.
//!
//! Infrastructure is wired together only via [`bootstrap`]. Command dispatch
//! routes to handlers, which reach stores and audio through `CliContext`.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use dictation_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before parsing so `env` fallbacks see them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::with_defaults().with_data_dir(cli.data_dir);
    let ctx = bootstrap(config).await?;

    match command {
        Commands::Register { user_id, password } => {
            handlers::account::register(&ctx, &user_id, password).await?;
        }
        Commands::Login { user_id, password } => {
            handlers::account::login(&ctx, &user_id, password).await?;
        }
        Commands::Logout => handlers::account::logout(&ctx).await?,
        Commands::Whoami => handlers::account::whoami(&ctx),
        Commands::Add { words, audio } => {
            handlers::add::execute(&ctx, &words, audio.as_deref()).await?;
        }
        Commands::Import { file } => handlers::import::execute(&ctx, &file).await?,
        Commands::List => handlers::list::execute(&ctx).await?,
        Commands::Remove { position, force } => {
            handlers::remove::execute(&ctx, position, force).await?;
        }
        Commands::Clear { force } => handlers::clear::execute(&ctx, force).await?,
        Commands::Export { output } => {
            handlers::export::execute(&ctx, output.as_deref()).await?;
        }
        Commands::Settings { command } => handlers::settings::execute(&ctx, command).await?,
        Commands::Voices => handlers::voices::execute(&ctx).await?,
        Commands::Play {
            from,
            interactive,
            preload,
        } => {
            handlers::play::execute(&ctx, from, interactive, preload).await?;
        }
    }

    Ok(())
}
