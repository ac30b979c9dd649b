// tests/prep_sequencer.rs

mod common;
use crate::common::builders::{BlockBuilder, ConfigBuilder};
use crate::common::init_tracing;

use std::collections::BTreeMap;
use std::sync::Arc;

use prepwatch::engine::{DispatchContext, PrepSequencer, NOTIFY_TITLE};
use prepwatch::errors::{PrepError, RenderError};
use prepwatch::log_sink::{LogEntry, MemoryLog};
use prepwatch::notifier::Notifiers;
use prepwatch::watch::ChangeBatch;
use prepwatch_test_utils::fake_executor::FakeExecutor;
use prepwatch_test_utils::recording_notifier::RecordingNotifier;

struct Harness {
    sequencer: PrepSequencer,
    exec: FakeExecutor,
    log: MemoryLog,
    notifier: RecordingNotifier,
}

fn harness(exec: FakeExecutor) -> Harness {
    let log = MemoryLog::new();
    let notifier = RecordingNotifier::new();
    let ctx = DispatchContext::new(
        "/work",
        Arc::new(log.clone()),
        Notifiers::new().with(Arc::new(notifier.clone())),
    );
    let sequencer = PrepSequencer::new(ctx, Arc::new(exec.clone()), "/work/conf");
    Harness {
        sequencer,
        exec,
        log,
        notifier,
    }
}

fn batch(paths: &[&str]) -> ChangeBatch {
    ChangeBatch::new(paths.iter().copied(), Vec::<String>::new(), Vec::<String>::new())
}

#[tokio::test]
async fn preps_run_in_order_with_rendered_templates() {
    init_tracing();

    let cfg = ConfigBuilder::new()
        .with_var("target", "release")
        .with_block(
            BlockBuilder::new("**")
                .prep("cargo build --@target")
                .prep("echo @dirmods in @confdir")
                .prep("mail me@@example.com")
                .build(),
        )
        .build()
        .with_config_dir("/work/conf");
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    let res = h
        .sequencer
        .run_preps(block, &cfg.vars_for(block), Some(&batch(&["src/a.rs", "src/b.rs", "top"])), false)
        .await;

    assert_eq!(res, Ok(()));
    assert_eq!(
        h.exec.executed(),
        vec![
            "cargo build --release".to_string(),
            r#"echo "." "./src" in "/work/conf""#.to_string(),
            "mail me@example.com".to_string(),
        ]
    );
}

#[tokio::test]
async fn block_vars_override_global_vars() {
    let cfg = ConfigBuilder::new()
        .with_var("mode", "global")
        .with_block(BlockBuilder::new("**").var("mode", "local").prep("run @mode").build())
        .build();
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    h.sequencer
        .run_preps(block, &cfg.vars_for(block), None, false)
        .await
        .unwrap();

    assert_eq!(h.exec.executed(), vec!["run local".to_string()]);
}

#[tokio::test]
async fn missing_batch_renders_empty_mods() {
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").prep("touch @mods").build())
        .build();
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    h.sequencer
        .run_preps(block, &cfg.vars_for(block), None, false)
        .await
        .unwrap();

    assert_eq!(h.exec.executed(), vec!["touch ".to_string()]);
}

#[tokio::test]
async fn initial_run_logs_skipped_onchange_preps() {
    let cfg = ConfigBuilder::new()
        .with_block(
            BlockBuilder::new("**")
                .onchange("slow @mods")
                .prep("fast")
                .onchange("slower")
                .build(),
        )
        .build();
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    let res = h
        .sequencer
        .run_preps(block, &cfg.vars_for(block), Some(&batch(&["a"])), true)
        .await;

    assert_eq!(res, Ok(()));
    assert_eq!(h.exec.executed(), vec!["fast".to_string()]);

    let says: Vec<LogEntry> = h
        .log
        .entries()
        .into_iter()
        .filter(|e| matches!(e, LogEntry::Say(_)))
        .collect();
    assert_eq!(
        says,
        vec![
            LogEntry::Say(r#"skipping prep: slow "./a""#.to_string()),
            LogEntry::Say("skipping prep: slower".to_string()),
        ]
    );
}

#[tokio::test]
async fn unknown_variable_stops_the_block_before_running_it() {
    let cfg = ConfigBuilder::new()
        .with_block(
            BlockBuilder::new("**")
                .prep("first")
                .prep("second @nope")
                .prep("third")
                .build(),
        )
        .build();
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    let res = h
        .sequencer
        .run_preps(block, &cfg.vars_for(block), None, false)
        .await;

    assert_eq!(
        res,
        Err(PrepError::Render(RenderError::UnknownVariable("nope".to_string())))
    );
    assert_eq!(h.exec.executed(), vec!["first".to_string()]);
    assert!(h.notifier.pushed().is_empty());
}

#[tokio::test]
async fn render_errors_apply_to_skipped_onchange_preps_too() {
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").onchange("lint @missing").prep("build").build())
        .build();
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    let res = h
        .sequencer
        .run_preps(block, &cfg.vars_for(block), None, true)
        .await;

    assert!(matches!(res, Err(PrepError::Render(_))));
    assert!(h.exec.executed().is_empty());
}

#[tokio::test]
async fn unknown_shell_fails_before_any_command() {
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").prep("build").build())
        .build();
    let h = harness(FakeExecutor::new());
    let block = &cfg.blocks[0];

    let mut vars = BTreeMap::new();
    vars.insert("shell".to_string(), "fish-but-not-really".to_string());

    let res = h.sequencer.run_preps(block, &vars, None, false).await;

    assert!(matches!(res, Err(PrepError::Config { .. })));
    assert!(h.exec.executed().is_empty());
    assert!(h.notifier.pushed().is_empty());
}

#[tokio::test]
async fn process_failure_notifies_with_captured_output() {
    let cfg = ConfigBuilder::new()
        .with_block(
            BlockBuilder::new("**")
                .prep("compile")
                .prep("package")
                .build(),
        )
        .build();
    let h = harness(FakeExecutor::new().fail_process("compile", "error[E0308]: mismatched types\n"));
    let block = &cfg.blocks[0];

    let res = h
        .sequencer
        .run_preps(block, &cfg.vars_for(block), None, false)
        .await;

    let err = res.unwrap_err();
    assert_eq!(err.output(), Some("error[E0308]: mismatched types\n"));
    assert_eq!(h.exec.executed(), vec!["compile".to_string()]);

    let pushed = h.notifier.pushed();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].title, NOTIFY_TITLE);
    assert_eq!(pushed[0].body, "error[E0308]: mismatched types\n");
    assert_eq!(pushed[0].icon, "");
}

#[tokio::test]
async fn launch_failure_does_not_notify() {
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").prep("ghost").prep("after").build())
        .build();
    let h = harness(FakeExecutor::new().fail_launch("ghost"));
    let block = &cfg.blocks[0];

    let res = h
        .sequencer
        .run_preps(block, &cfg.vars_for(block), None, false)
        .await;

    assert!(matches!(res, Err(PrepError::Launch { .. })));
    assert_eq!(h.exec.executed(), vec!["ghost".to_string()]);
    assert!(h.notifier.pushed().is_empty());
}

#[tokio::test]
async fn in_dir_is_resolved_against_the_watch_root() {
    let cfg = ConfigBuilder::new()
        .with_block(BlockBuilder::new("**").in_dir("frontend").prep("npm run build").build())
        .with_block(BlockBuilder::new("**").prep("make").build())
        .build();
    let h = harness(FakeExecutor::new());

    for block in &cfg.blocks {
        h.sequencer
            .run_preps(block, &cfg.vars_for(block), None, false)
            .await
            .unwrap();
    }

    assert_eq!(
        h.exec.dirs(),
        vec!["/work/frontend".to_string(), "/work".to_string()]
    );
}
