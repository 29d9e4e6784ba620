use anyhow::{Context, Result};
use caphub_cli::{App, Cli, SessionFile, execute_offline, render};
use caphub_logger::{LevelFilter, Logger};
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _logger = if cli.verbose {
        Some(Logger::builder("caphub-cli").level(LevelFilter::DEBUG).init()?)
    } else {
        None
    };

    let mut stdout = std::io::stdout().lock();
    let outcome = match execute_offline(&cli.command, &mut stdout) {
        Some(outcome) => outcome,
        None => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to build Tokio runtime")?;

            let session_file =
                SessionFile::new(cli.session_file.unwrap_or_else(SessionFile::default_path));

            runtime.block_on(async {
                let mut app = App::connect(&cli.server, session_file).await?;
                app.execute(cli.command, &mut stdout).await
            })
        }
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            writeln!(std::io::stderr(), "{}", render::banner(&e))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
