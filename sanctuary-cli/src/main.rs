mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use sanctuary_license::SigningSecret;
use sanctuary_link::LinkSettings;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::{cmd_assets, cmd_open, cmd_package, cmd_sign, cmd_verify, resolve_settings};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries links and JSON only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Command::Package { config } => {
            let settings = link_settings(cli.origin.as_deref(), cli.kdf_iterations)?;
            cmd_package(&config, &settings)?
        }
        Command::Open { url, passcode } => {
            let settings = link_settings(cli.origin.as_deref(), cli.kdf_iterations)?;
            cmd_open(&url, passcode.as_deref(), &settings).await?
        }
        Command::Assets { url, passcode } => {
            let settings = link_settings(cli.origin.as_deref(), cli.kdf_iterations)?;
            cmd_assets(&url, passcode.as_deref(), &settings).await?
        }
        Command::Sign { plan, name_a, name_b } => {
            cmd_sign(plan, &name_a, &name_b, &SigningSecret::from_env()?)?
        }
        Command::Verify { plan, name_a, name_b, signature } => {
            cmd_verify(plan, &name_a, &name_b, &signature, &SigningSecret::from_env()?)
        }
    };

    println!("{output}");
    Ok(())
}

fn link_settings(origin: Option<&str>, kdf_iterations: Option<u32>) -> Result<LinkSettings> {
    resolve_settings(LinkSettings::from_env()?, origin, kdf_iterations)
}
