//! loopstudio CLI: browse and export remote workspace tables.
//!
//! # Commands
//!
//! - `tables`: List every `workspace/table` the credential can see.
//! - `schema`: Show the field schema the reporting host would receive for a table.
//! - `data`: Fetch every row of a table, optionally restricted to some field ids.
//! - `auth`: Run the OAuth authorization-code flow and inspect the stored credential.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use loopstudio_common::telemetry;
use loopstudio_error::StudioError;
use owo_colors::OwoColorize;
use secrecy::SecretString;

mod commands;
mod config;
mod exit_codes;
mod output;

use loopstudio_common::AppConfig;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "loopstudio")]
#[command(about = "Browse and export remote workspace tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (human, json, yaml)
    #[arg(long, global = true, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Bearer token, overriding auth.token
    #[arg(long, global = true, env = "LOOPSTUDIO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Configuration file
    #[arg(long, global = true, env = "LOOPSTUDIO_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all workspace/table pairs
    Tables,
    /// Show the field schema of a table
    Schema {
        /// Table as workspace/table
        table: String,
    },
    /// Fetch all rows of a table
    Data {
        /// Table as workspace/table
        table: String,
        /// Field ids to return, in order (default: all fields)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Manage authorization
    Auth {
        #[command(subcommand)]
        subcommand: AuthCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Print the URL that starts the authorization flow
    Url {
        /// Opaque value echoed back by the identity provider
        #[arg(long, default_value = "loopstudio")]
        state: String,
    },
    /// Exchange an authorization code for a refresh token
    Login {
        /// The `code` parameter from the authorization callback
        #[arg(long)]
        code: String,
    },
    /// Check whether the configured credential grants access
    Status,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        let exit_code = exit_codes::for_error(&e);
        let hint = e.downcast_ref::<StudioError>().and_then(|s| s.hint.clone());

        if cli.output.is_machine_readable() {
            let message = match e.downcast_ref::<StudioError>() {
                Some(s) => s.message.clone(),
                None => e.to_string(),
            };
            output::print_error(cli.output, &message, hint.as_deref(), exit_code).ok();
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<(), anyhow::Error> {
    let mut config = config::load(cli.config.as_deref())?;

    // Override token from CLI args if present
    if let Some(token) = &cli.token {
        config.auth.token = Some(SecretString::from(token.clone()));
    }

    if let Err(e) = telemetry::init_logging(&config.logging) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    run_command(cli, &config).await
}

async fn run_command(cli: &Cli, config: &AppConfig) -> Result<(), anyhow::Error> {
    match &cli.command {
        Commands::Tables => {
            let connector = commands::connect(config).await?;
            commands::tables(&connector, cli.output).await?;
        }
        Commands::Schema { table } => {
            let connector = commands::connect(config).await?;
            commands::schema(&connector, table, cli.output).await?;
        }
        Commands::Data { table, fields } => {
            let connector = commands::connect(config).await?;
            commands::data(&connector, table, fields, cli.output).await?;
        }
        Commands::Auth { subcommand } => match subcommand {
            AuthCommands::Url { state } => {
                commands::auth_url(config, state, cli.output).await?;
            }
            AuthCommands::Login { code } => {
                commands::auth_login(config, code, cli.output).await?;
            }
            AuthCommands::Status => {
                commands::auth_status(config, cli.output).await?;
            }
        },
    }
    Ok(())
}
