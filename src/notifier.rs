// src/notifier.rs

//! Failure notifications.
//!
//! Notifiers are fire-and-forget: `push` never blocks the dispatch loop and
//! never reports failure back to it.

use std::fmt::Debug;
use std::io::Write;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, warn};

pub trait Notifier: Send + Sync + Debug {
    fn push(&self, title: &str, body: &str, icon: &str);
}

/// Shared list of notifiers handed to the prep sequencer.
#[derive(Debug, Clone, Default)]
pub struct Notifiers {
    inner: Vec<Arc<dyn Notifier>>,
}

impl Notifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.inner.push(notifier);
        self
    }

    pub fn add(&mut self, notifier: Arc<dyn Notifier>) {
        self.inner.push(notifier);
    }

    pub fn push_all(&self, title: &str, body: &str, icon: &str) {
        for n in &self.inner {
            n.push(title, body, icon);
        }
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn push(&self, _title: &str, _body: &str, _icon: &str) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

/// Desktop notification through an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandNotifier {
    /// `notify-send <title> <body>` (Linux / BSD desktops).
    NotifySend,
    /// `osascript -e 'display notification ...'` (macOS).
    Osascript,
}

impl CommandNotifier {
    /// Pick the notifier available on this machine, if any.
    pub fn detect() -> Option<Self> {
        if cfg!(target_os = "macos") && which::which("osascript").is_ok() {
            return Some(CommandNotifier::Osascript);
        }
        if which::which("notify-send").is_ok() {
            return Some(CommandNotifier::NotifySend);
        }
        None
    }

    fn command(&self, title: &str, body: &str, icon: &str) -> Command {
        match self {
            CommandNotifier::NotifySend => {
                let mut cmd = Command::new("notify-send");
                if !icon.is_empty() {
                    cmd.arg("--icon").arg(icon);
                }
                cmd.arg(title).arg(body);
                cmd
            }
            CommandNotifier::Osascript => {
                let script = format!(
                    "display notification {} with title {}",
                    applescript_string(body),
                    applescript_string(title)
                );
                let mut cmd = Command::new("osascript");
                cmd.arg("-e").arg(script);
                cmd
            }
        }
    }
}

impl Notifier for CommandNotifier {
    fn push(&self, title: &str, body: &str, icon: &str) {
        if tokio::runtime::Handle::try_current().is_err() {
            warn!("no async runtime; dropping desktop notification");
            return;
        }

        let mut cmd = self.command(title, body, icon);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match cmd.spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        debug!(error = %e, "desktop notifier did not exit cleanly");
                    }
                });
            }
            Err(e) => warn!(error = %e, "failed to start desktop notifier"),
        }
    }
}

fn applescript_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
