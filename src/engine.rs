use crate::utils::{LineKind, classify_line, executable_suffix, join_under};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

pub const DOWNLOADER_NAME: &str = "run_GAMP_GOOD";

/// Location of the GOOD downloader executable under the main directory.
pub fn downloader_path(main_dir: &str, sep: char, os: &str) -> String {
    join_under(
        main_dir,
        sep,
        &format!("{}{}", DOWNLOADER_NAME, executable_suffix(os)),
    )
}

pub fn check_downloader(program: &str) -> Result<()> {
    match std::fs::metadata(program) {
        Ok(m) if m.is_file() => Ok(()),
        Ok(_) => anyhow::bail!("{} is not a file", program),
        Err(_) => anyhow::bail!(
            "{} not found. Please place the GOOD downloader in the main directory.",
            program
        ),
    }
}

/// What the downloader printed, and how it exited.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub errors: usize,
    pub warnings: usize,
    pub exit_code: Option<i32>,
}

impl RunSummary {
    fn record(&mut self, kind: LineKind) {
        match kind {
            LineKind::Error => self.errors += 1,
            LineKind::Warning => self.warnings += 1,
            LineKind::Plain => {}
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The downloader was interrupted before it finished.
#[derive(Debug, Error)]
#[error("cancelled")]
pub struct Cancelled;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

fn relay_line(line: &str, kind: LineKind, stream: Stream, quiet: bool, pb: Option<&ProgressBar>) {
    let rendered = match kind {
        LineKind::Error => line.red().to_string(),
        LineKind::Warning => line.yellow().to_string(),
        LineKind::Plain if quiet => return,
        LineKind::Plain => line.to_string(),
    };

    match (pb, stream) {
        (Some(pb), _) => pb.println(rendered),
        (None, Stream::Stdout) => println!("{}", rendered),
        (None, Stream::Stderr) => eprintln!("{}", rendered),
    }
}

/// Reads one line as raw bytes. Invalid UTF-8 is replaced, not treated as
/// the end of the stream. `Ok(None)` at end of stream or for a closed reader.
///
/// `buf` keeps bytes from a read interrupted by another `select!` branch;
/// it is only cleared once a whole line has been returned.
async fn next_line<R: AsyncBufRead + Unpin>(
    reader: Option<&mut R>,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    let Some(reader) = reader else {
        return Ok(None);
    };

    let n = reader.read_until(b'\n', buf).await?;
    if n == 0 && buf.is_empty() {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf.as_slice())
        .trim_end_matches(['\n', '\r'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

async fn interrupt(child: &mut Child) {
    #[cfg(unix)]
    unsafe {
        if let Some(id) = child.id() {
            // The downloader spawns wget/gzip; signal the whole group.
            let pid = id as i32;
            let _ = libc::kill(-pid, libc::SIGINT);
            let _ = libc::kill(pid, libc::SIGINT);
        }
    }

    #[cfg(not(unix))]
    let _ = child.start_kill();

    let _ = child.wait().await;
}

/// Runs the downloader with the configuration file as its only argument,
/// relaying its stdout and stderr until it exits or `cancel_token` fires.
pub async fn run_downloader(
    program: &str,
    config_file: &str,
    quiet: bool,
    cancel_token: CancellationToken,
) -> Result<RunSummary> {
    let pb = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise:.yellow}] {msg}",
        )?);
        let name = Path::new(program)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string());
        pb.set_message(format!("{} running", name));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let mut cmd = Command::new(program);
    cmd.arg(config_file);

    #[cfg(unix)]
    {
        cmd.process_group(0);
    }

    // Both streams go through the spinner so wget progress never draws over it.
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to spawn {}", program))?;
    let mut stdout = Some(BufReader::new(
        child
            .stdout
            .take()
            .context("Failed to capture downloader stdout")?,
    ));
    let mut stderr = Some(BufReader::new(
        child
            .stderr
            .take()
            .context("Failed to capture downloader stderr")?,
    ));
    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();
    let mut summary = RunSummary::default();

    // A reader is dropped at end of stream or on a read error, closing the
    // pipe so the child can never block on it.
    while stdout.is_some() || stderr.is_some() {
        tokio::select! {
            res = next_line(stdout.as_mut(), &mut out_buf), if stdout.is_some() => {
                match res {
                    Ok(Some(line)) => {
                        let kind = classify_line(&line);
                        summary.record(kind);
                        relay_line(&line, kind, Stream::Stdout, quiet, pb.as_ref());
                    }
                    Ok(None) | Err(_) => stdout = None,
                }
            }
            res = next_line(stderr.as_mut(), &mut err_buf), if stderr.is_some() => {
                match res {
                    Ok(Some(line)) => {
                        let kind = classify_line(&line);
                        summary.record(kind);
                        relay_line(&line, kind, Stream::Stderr, quiet, pb.as_ref());
                    }
                    Ok(None) | Err(_) => stderr = None,
                }
            }
            _ = cancel_token.cancelled() => {
                interrupt(&mut child).await;
                if let Some(bar) = pb {
                    bar.finish_and_clear();
                }
                return Err(Cancelled.into());
            }
        }
    }

    let status = tokio::select! {
        status = child.wait() => status?,
        _ = cancel_token.cancelled() => {
            interrupt(&mut child).await;
            if let Some(bar) = pb {
                bar.finish_and_clear();
            }
            return Err(Cancelled.into());
        }
    };
    summary.exit_code = status.code();

    if let Some(bar) = pb {
        bar.finish_and_clear();
    }

    Ok(summary)
}
