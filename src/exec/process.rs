// src/exec/process.rs

//! Run a single command to completion.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::PrepError;
use crate::log_sink::LogSink;
use crate::types::Shell;

/// Run `cmd` under `shell` in `dir`, streaming output to `log` as it is
/// produced.
///
/// - Spawn or wait failures are `PrepError::Launch` and carry no output.
/// - A non-zero exit is `PrepError::Process` with the captured stderr; it is
///   shouted to the log before being returned.
/// - On success a `>> done (<elapsed>)` notice is emitted.
///
/// Returns only after both output streams are drained and the exit status is
/// known.
pub async fn run_proc(cmd: &str, shell: Shell, dir: &Path, log: &dyn LogSink) -> Result<(), PrepError> {
    log.header(&format!("prep: {cmd}"));

    let mut command = Command::new(shell.program());
    command
        .arg(shell.command_flag())
        .arg(cmd)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| PrepError::Launch {
        message: format!("spawning '{}' in {:?}: {e}", shell, dir),
    })?;

    debug!(cmd = %cmd, shell = %shell, pid = ?child.id(), "started prep process");

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (_, captured, status) = tokio::join!(
        forward_lines(stdout, log, false),
        forward_lines(stderr, log, true),
        child.wait(),
    );

    let status = status.map_err(|e| PrepError::Launch {
        message: format!("waiting for '{cmd}': {e}"),
    })?;

    if !status.success() {
        let summary = status.to_string();
        log.shout(&summary);
        return Err(PrepError::Process {
            summary,
            output: captured,
        });
    }

    let elapsed = start.elapsed();
    info!(cmd = %cmd, ?elapsed, "prep finished");
    log.notice(&format!(">> done ({elapsed:?})"));
    Ok(())
}

/// Forward every line of `stream` to the log; return the text when
/// `capture` is set.
///
/// Always reads to EOF. Invalid UTF-8 is replaced, not treated as the end.
async fn forward_lines<R>(stream: Option<R>, log: &dyn LogSink, capture: bool) -> String
where
    R: AsyncRead + Unpin,
{
    let mut captured = String::new();
    let Some(stream) = stream else {
        return captured;
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let raw = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
                let line = String::from_utf8_lossy(raw);
                log.output(&line);
                if capture {
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            Err(e) => {
                warn!(error = %e, "reading command output failed");
                break;
            }
        }
    }
    captured
}
