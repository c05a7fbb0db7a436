//! # Event Consumer Integration Tests / 事件消费者集成测试
//!
//! The select loop shared by `render` and `run`: draining a channel into a
//! run, refresh ticks, and cancellation.
//! `render` 和 `run` 共用的选择循环：将通道中的事件应用到运行、刷新计时以及取消。

use std::time::Duration;
use suite_tally::cli::commands::{StreamEnd, consume_events};
use suite_tally::core::column::ResultsColumn;
use suite_tally::core::events::{TestEvent, TestRun};
use suite_tally::infra::source::EventLine;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn line(line_no: usize, text: &str) -> EventLine {
    (line_no, text.to_string())
}

#[tokio::test]
async fn test_consumes_until_channel_closes() {
    let (tx, rx) = mpsc::channel(8);
    tx.send(line(1, r#"{"event":"test_started","name":"a"}"#)).await.unwrap();
    tx.send(line(2, "not json")).await.unwrap();
    tx.send(line(3, r#"{"event":"test_finished","name":"a"}"#)).await.unwrap();
    drop(tx);

    let mut run = TestRun::new("run");
    let end = consume_events(&mut run, rx, None, CancellationToken::new(), "en").await;

    assert_eq!(end, StreamEnd::Exhausted);
    let a = run.lookup("a").unwrap();
    assert!(run.tree()[a].is_finished());
}

/// A token that already fired wins over pending lines; terminating the run
/// afterwards marks what was running as terminated.
///
/// 已触发的令牌优先于待处理的行；随后终止运行会将正在运行的部分标记为已终止。
#[tokio::test]
async fn test_cancelled_token_stops_before_pending_lines() {
    let mut run = TestRun::new("run");
    run.apply(TestEvent::TestStarted {
        name: "slow".to_string(),
        parent: None,
    })
    .unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(line(1, r#"{"event":"test_finished","name":"slow"}"#)).await.unwrap();
    let stop = CancellationToken::new();
    stop.cancel();

    let end = consume_events(&mut run, rx, None, stop, "en").await;
    assert_eq!(end, StreamEnd::Cancelled);

    run.apply(TestEvent::Terminated { name: None }).unwrap();
    run.close();

    let tree = run.tree();
    let slow = run.lookup("slow").unwrap();
    assert!(tree[slow].is_terminated());
    assert!(!tree[slow].is_finished());
    assert_eq!(ResultsColumn.plain_text(tree, slow), "Terminated");
    assert_eq!(ResultsColumn.plain_text(tree, tree.root()), "");
    drop(tx);
}

#[tokio::test]
async fn test_progress_ticks_do_not_disturb_consumption() {
    let (tx, rx) = mpsc::channel(8);
    let producer = tokio::spawn(async move {
        tx.send(line(1, r#"{"event":"test_started","name":"a"}"#)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(line(2, r#"{"event":"test_finished","name":"a"}"#)).await.unwrap();
    });

    let mut run = TestRun::new("run");
    let end = consume_events(
        &mut run,
        rx,
        Some(Duration::from_millis(5)),
        CancellationToken::new(),
        "en",
    )
    .await;
    producer.await.unwrap();

    assert_eq!(end, StreamEnd::Exhausted);
    let tree = run.tree();
    assert_eq!(ResultsColumn.plain_text(tree, run.lookup("a").unwrap()), "Passed");
}
