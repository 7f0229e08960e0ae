// ABOUTME: Main entry point for the way2enjoy CLI application
// ABOUTME: Loads config, builds the client and runs the requested compression chain

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use secrecy::SecretString;
use std::env;
use std::process::ExitCode;
use way2enjoy_cli::cli::{Cli, Settings};
use way2enjoy_cli::cli_output::CliOutput;
use way2enjoy_cli::config::Config;
use way2enjoy_sdk::{Source, Step, StoreResult, Way2enjoyClient};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    // Determine if color should be used
    let use_color = !cli.no_color
        && env::var("NO_COLOR").is_err()
        && env::var("TERM").unwrap_or_default() != "dumb";
    let output = if use_color {
        CliOutput::new()
    } else {
        CliOutput::with_color(false)
    };

    match run(&cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, output: &CliOutput) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };
    let client = build_client(&cli.settings(&config))?;

    if cli.validate {
        client.validate().await?;
        output.success("API key is valid");
        output.compression_count(client.compression_count());
        return Ok(());
    }

    let commands = cli.commands(&config)?;
    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("No input given"))?;

    let mut source = if cli.url {
        Source::from_url(&client, input).await?
    } else {
        Source::from_file(&client, input).await?
    };
    log::info!("Uploaded {} to {}", input, source.location());

    for command in commands {
        log::debug!("Applying {}", command.key());
        match source.apply(command).await? {
            Step::Source(next) => source = next,
            Step::Stored(stored) => {
                finish_store(cli, output, stored).await?;
                output.compression_count(client.compression_count());
                return Ok(());
            }
        }
    }

    let result = source.result().await?;
    let path = cli.output_path(result.extension());
    result
        .to_file(&path)
        .await
        .with_context(|| format!("Failed to save result for {}", input))?;
    output.saved(&path, &result);
    output.compression_count(client.compression_count());
    Ok(())
}

async fn finish_store(cli: &Cli, output: &CliOutput, stored: StoreResult) -> Result<()> {
    match stored {
        StoreResult::Meta(meta) => output.stored(&meta),
        StoreResult::Image(image) => {
            // No location came back; keep the bytes the service returned
            let path = cli.output_path(image.extension());
            image.to_file(&path).await?;
            output.saved(&path, &image);
        }
    }
    Ok(())
}

fn build_client(settings: &Settings) -> Result<Way2enjoyClient> {
    let api_key = settings.api_key.clone().ok_or_else(|| {
        anyhow!("No API key configured. Pass --key or set api_key in way2enjoy.toml")
    })?;

    let client = Way2enjoyClient::builder()
        .api_key(SecretString::new(api_key.into_boxed_str()))
        .app_identifier(settings.app_identifier.clone())
        .proxy(settings.proxy.clone())
        .base_url(settings.api_url.clone())
        .build()?;
    Ok(client)
}
