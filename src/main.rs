mod cli;
mod config;
mod engine;
mod options;
mod utils;

use crate::cli::{Cli, USAGE};
use crate::config::{ConfigDocument, config_path, truncated_values};
use crate::engine::{Cancelled, check_downloader, downloader_path, run_downloader};
use crate::options::{ArgError, Request};
use crate::utils::{describe_time_span, path_separator};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use tokio::signal;

fn log_info(msg: &str) {
    println!("{} {}", "[INFO]".cyan(), msg);
}

fn log_success(msg: &str) {
    println!("{} {}", "[SUCCESS]".green(), msg);
}

fn log_warning(msg: &str) {
    println!("{} {}", "[WARNING]".yellow(), msg);
}

fn log_error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red(), msg);
}

/// Argument problems go to stdout and end the run with status 0.
fn log_diagnostic(msg: &str) {
    println!("{} {}\n", "*** ERROR:".red(), msg);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if options::wants_help(&cli.tokens) {
        print!("{}", USAGE);
        return;
    }

    let request = match options::parse(&cli.tokens) {
        Ok(r) => r,
        Err(e) => {
            log_diagnostic(&e.to_string());
            if let ArgError::IncompleteGroup { flag, .. } = e {
                println!("Run with -h to see what {} expects.", flag);
            }
            return;
        }
    };

    let cancel_token = tokio_util::sync::CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();

    tokio::spawn(async move {
        if let Ok(()) = signal::ctrl_c().await {
            eprintln!(
                "\n{} Received interrupt signal, stopping the downloader...",
                "[WARNING]".yellow()
            );
            cancel_token_clone.cancel();
        }
    });

    match run(&cli, &request, cancel_token).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if e.is::<Cancelled>() {
                log_warning("Download cancelled.");
            } else {
                log_error(&format!("{:?}", e));
            }
            std::process::exit(failure_code(&e));
        }
    }
}

fn failure_code(e: &anyhow::Error) -> i32 {
    if e.is::<Cancelled>() { 130 } else { 1 }
}

/// Writes the configuration and runs the downloader, returning the exit
/// status to hand back to the caller.
async fn run(
    cli: &Cli,
    request: &Request,
    cancel_token: tokio_util::sync::CancellationToken,
) -> anyhow::Result<i32> {
    let os = std::env::consts::OS;
    let sep = path_separator(os);

    match &request.time {
        Some(time) => {
            if !cli.quiet {
                if let Some(span) = describe_time_span(&time.year, &time.doy, &time.ndays) {
                    log_info(&format!("Processing period: {}", span));
                }
            }
        }
        None => log_warning("No -time setting given; procTime is left out of the configuration."),
    }

    if request.selection("-ftp").is_none() && !request.selections.is_empty() {
        log_warning("No -ftp archive given; the downloader skips every download option without it.");
    }

    for value in truncated_values(request) {
        log_warning(&format!(
            "'{}' contains '%' or '='; the downloader will read a shortened value.",
            value
        ));
    }

    let cfg_file = config_path(&request.main_dir, sep);
    ConfigDocument::render(request, sep).write(Path::new(&cfg_file))?;

    if !cli.quiet {
        log_info(&format!("Configuration written to {}", cfg_file));
    }

    if cli.dry_run {
        if !cli.quiet {
            log_success("Dry run: the downloader was not started.");
        }
        return Ok(0);
    }

    let program = downloader_path(&request.main_dir, sep, os);
    check_downloader(&program)?;

    if !cli.quiet {
        log_info(&format!("Starting {} {}", program, cfg_file));
    }

    let summary = run_downloader(&program, &cfg_file, cli.quiet, cancel_token).await?;

    if summary.warnings > 0 || summary.errors > 0 {
        log_warning(&format!(
            "The downloader reported {} error(s) and {} warning(s).",
            summary.errors, summary.warnings
        ));
    }

    if summary.success() {
        if !cli.quiet {
            log_success("Downloader finished.");
        }
        return Ok(0);
    }

    match summary.exit_code {
        Some(code) => {
            log_warning(&format!("The downloader exited with status {}.", code));
            Ok(code)
        }
        None => anyhow::bail!("{} terminated by signal", program),
    }
}
