use std::path::Path;
use std::sync::{Arc, Mutex};

use prepwatch::errors::PrepError;
use prepwatch::exec::{ExecFuture, Executor};
use prepwatch::log_sink::LogSink;
use prepwatch::types::Shell;

/// How a scripted command should fail.
#[derive(Debug, Clone)]
pub enum FakeFailure {
    Process { output: String },
    Launch,
}

/// A fake executor that:
/// - records every command it is asked to run, with its working dir
/// - echoes the command as output and succeeds, unless the command
///   contains a substring registered with `fail_process` / `fail_launch`.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<String>>>,
    dirs: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<Vec<(String, FakeFailure)>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_process(self, needle: &str, output: &str) -> Self {
        self.failures.lock().unwrap().push((
            needle.to_string(),
            FakeFailure::Process {
                output: output.to_string(),
            },
        ));
        self
    }

    pub fn fail_launch(self, needle: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push((needle.to_string(), FakeFailure::Launch));
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn dirs(&self) -> Vec<String> {
        self.dirs.lock().unwrap().clone()
    }

    fn failure_for(&self, cmd: &str) -> Option<FakeFailure> {
        self.failures
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| cmd.contains(needle.as_str()))
            .map(|(_, f)| f.clone())
    }
}

impl Executor for FakeExecutor {
    fn run<'a>(
        &'a self,
        cmd: &'a str,
        _shell: Shell,
        dir: &'a Path,
        log: &'a dyn LogSink,
    ) -> ExecFuture<'a> {
        Box::pin(async move {
            log.header(&format!("prep: {cmd}"));
            self.executed.lock().unwrap().push(cmd.to_string());
            self.dirs
                .lock()
                .unwrap()
                .push(dir.to_string_lossy().replace('\\', "/"));

            match self.failure_for(cmd) {
                Some(FakeFailure::Process { output }) => {
                    let summary = "exit status: 1".to_string();
                    log.shout(&summary);
                    Err(PrepError::Process { summary, output })
                }
                Some(FakeFailure::Launch) => Err(PrepError::Launch {
                    message: format!("cannot start '{cmd}'"),
                }),
                None => {
                    log.output(cmd);
                    log.notice(">> done (0ns)");
                    Ok(())
                }
            }
        })
    }
}
