mod common;

use common::{MisbehavingTransport, StubTransport};
use herald_core::models::{Message, MessageKind};
use herald_core::transport::{FailoverTransport, RoundRobinTransport, Transport};
use herald_core::{NotifierError, TransportError};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn sms() -> Message {
    Message::sms("+33611223344", "hello")
}

#[tokio::test]
async fn failover_stops_at_first_success() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, b_calls) = StubTransport::ok("b");
    let (c, c_calls) = StubTransport::ok("c");
    let failover =
        FailoverTransport::new(vec![a.boxed(), b.boxed(), c.boxed()]).expect("non-empty");

    let sent = failover.send(&sms()).await.expect("b delivers");

    assert_eq!(sent.transport(), "b://stub");
    assert_eq!(sent.message_id(), Some("b"));
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failover_restarts_from_first_child_on_every_call() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, b_calls) = StubTransport::ok("b");
    let failover = FailoverTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");

    for _ in 0..3 {
        failover.send(&sms()).await.expect("b delivers");
    }

    assert_eq!(a_calls.load(Ordering::SeqCst), 3);
    assert_eq!(b_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn failover_aggregates_every_failure() {
    let (a, _) = StubTransport::failing("a");
    let (b, _) = StubTransport::failing("b");
    let failover = FailoverTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");

    let err = failover.send(&sms()).await.err().expect("all children fail");

    match &err {
        NotifierError::Transport(TransportError::AllFailed(failures)) => {
            assert_eq!(failures.len(), 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let text = err.to_string();
    assert!(text.contains("a is down"), "{text}");
    assert!(text.contains("b is down"), "{text}");
}

#[tokio::test]
async fn failover_skips_children_that_do_not_support_the_message() {
    let (chat_only, chat_calls) = StubTransport::ok("chat");
    let (sms_only, sms_calls) = StubTransport::ok("sms");
    let failover = FailoverTransport::new(vec![
        chat_only.only(MessageKind::Chat).boxed(),
        sms_only.only(MessageKind::Sms).boxed(),
    ])
    .expect("non-empty");

    let sent = failover.send(&sms()).await.expect("sms child delivers");

    assert_eq!(sent.transport(), "sms://stub");
    assert_eq!(chat_calls.load(Ordering::SeqCst), 0);
    assert_eq!(sms_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn composite_without_supporting_child_rejects_message_type() {
    let (chat_only, calls) = StubTransport::ok("chat");
    let failover =
        FailoverTransport::new(vec![chat_only.only(MessageKind::Chat).boxed()]).expect("non-empty");

    assert!(!failover.supports(&sms()));
    let err = failover.send(&sms()).await.err().expect("sms is unsupported");

    assert!(matches!(
        err,
        NotifierError::UnsupportedMessageType {
            kind: MessageKind::Sms,
            ..
        }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_delivery_errors_propagate_without_failover() {
    let (b, b_calls) = StubTransport::ok("b");
    let failover =
        FailoverTransport::new(vec![Box::new(MisbehavingTransport), b.boxed()]).expect("non-empty");

    let err = failover.send(&sms()).await.err().expect("error propagates");

    assert!(matches!(err, NotifierError::UnsupportedMessageType { .. }));
    assert_eq!(b_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_composites_are_rejected() {
    assert!(matches!(
        FailoverTransport::new(Vec::new()),
        Err(NotifierError::NoTransports { composite: "failover" })
    ));
    assert!(matches!(
        RoundRobinTransport::new(Vec::new()),
        Err(NotifierError::NoTransports {
            composite: "round-robin"
        })
    ));
}

#[tokio::test]
async fn round_robin_alternates_between_children() {
    let (a, a_calls) = StubTransport::ok("a");
    let (b, b_calls) = StubTransport::ok("b");
    let round_robin = RoundRobinTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");

    let mut used = Vec::new();
    for _ in 0..3 {
        let sent = round_robin.send(&sms()).await.expect("delivers");
        used.push(sent.message_id().map(str::to_string));
    }

    assert_eq!(
        used,
        vec![Some("a".to_string()), Some("b".to_string()), Some("a".to_string())]
    );
    assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn round_robin_moves_past_a_failing_child() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, b_calls) = StubTransport::ok("b");
    let round_robin = RoundRobinTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");

    let sent = round_robin.send(&sms()).await.expect("b delivers");
    assert_eq!(sent.transport(), "b://stub");
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);

    // The cursor now sits after b, so the next call starts from a again
    assert_eq!(round_robin.cursor(), 0);
    round_robin.send(&sms()).await.expect("b delivers again");
    assert_eq!(a_calls.load(Ordering::SeqCst), 2);
    assert_eq!(b_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn round_robin_fails_when_every_child_fails() {
    let (a, _) = StubTransport::failing("a");
    let (b, _) = StubTransport::failing("b");
    let round_robin = RoundRobinTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");

    let err = round_robin.send(&sms()).await.err().expect("all fail");
    assert!(matches!(
        err,
        NotifierError::Transport(TransportError::AllFailed(ref failures)) if failures.len() == 2
    ));
}

#[tokio::test]
async fn retry_period_skips_recently_failed_child() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, b_calls) = StubTransport::ok("b");
    let failover = FailoverTransport::new(vec![a.boxed(), b.boxed()])
        .expect("non-empty")
        .with_retry_period(Duration::from_secs(60));

    for _ in 0..3 {
        failover.send(&sms()).await.expect("b delivers");
    }

    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_period_expires() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, _) = StubTransport::ok("b");
    let failover = FailoverTransport::new(vec![a.boxed(), b.boxed()])
        .expect("non-empty")
        .with_retry_period(Duration::from_millis(20));

    failover.send(&sms()).await.expect("b delivers");
    tokio::time::sleep(Duration::from_millis(40)).await;
    failover.send(&sms()).await.expect("b delivers");

    assert_eq!(a_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn every_child_resting_reports_all_failed() {
    let (a, a_calls) = StubTransport::failing("a");
    let failover = FailoverTransport::new(vec![a.boxed()])
        .expect("non-empty")
        .with_retry_period(Duration::from_secs(60));

    failover.send(&sms()).await.err().expect("a fails");
    let err = failover.send(&sms()).await.err().expect("a is resting");

    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert!(err.to_string().contains("retry period"), "{err}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn round_robin_is_safe_under_concurrent_sends() {
    let mut children = Vec::new();
    let mut counters = Vec::new();
    for name in ["a", "b", "c"] {
        let (stub, calls) = StubTransport::ok(name);
        children.push(stub.boxed());
        counters.push(calls);
    }
    let round_robin = Arc::new(RoundRobinTransport::new(children).expect("non-empty"));

    let mut handles = Vec::new();
    for _ in 0..60 {
        let round_robin = Arc::clone(&round_robin);
        handles.push(tokio::spawn(async move {
            round_robin
                .send(&Message::chat("hello"))
                .await
                .map(|sent| sent.message_id().map(str::to_string))
        }));
    }

    let mut per_child: HashMap<String, usize> = HashMap::new();
    for handle in handles {
        let id = handle
            .await
            .expect("task completes")
            .expect("delivers")
            .expect("stub sets an id");
        *per_child.entry(id).or_default() += 1;
    }

    let total: usize = counters.iter().map(|c| c.load(Ordering::SeqCst)).sum();
    assert_eq!(total, 60);
    assert_eq!(per_child.values().sum::<usize>(), 60);
    assert!(round_robin.cursor() < 3);
}

#[test]
fn nested_graphs_describe_differently() {
    let (a, _) = StubTransport::ok("a");
    let (b, _) = StubTransport::ok("b");
    let (c, _) = StubTransport::ok("c");
    let inner = FailoverTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");
    let left = RoundRobinTransport::new(vec![Box::new(inner), c.boxed()]).expect("non-empty");

    let (a, _) = StubTransport::ok("a");
    let (b, _) = StubTransport::ok("b");
    let (c, _) = StubTransport::ok("c");
    let inner = RoundRobinTransport::new(vec![b.boxed(), c.boxed()]).expect("non-empty");
    let right = FailoverTransport::new(vec![a.boxed(), Box::new(inner)]).expect("non-empty");

    assert_eq!(left.describe(), "((a://stub || b://stub) && c://stub)");
    assert_eq!(right.describe(), "(a://stub || (b://stub && c://stub))");
    assert_ne!(left.describe(), right.describe());
}

#[tokio::test]
async fn round_robin_recovers_from_exhausted_inner_failover() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, b_calls) = StubTransport::failing("b");
    let (c, c_calls) = StubTransport::ok("c");
    let inner = FailoverTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");
    let round_robin =
        RoundRobinTransport::new(vec![Box::new(inner), c.boxed()]).expect("non-empty");

    let sent = round_robin.send(&sms()).await.expect("c delivers");

    assert_eq!(sent.transport(), "c://stub");
    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c_calls.load(Ordering::SeqCst), 1);
    assert_eq!(round_robin.cursor(), 0);
}

#[tokio::test]
async fn nested_failure_is_reported_inside_outer_aggregate() {
    let (a, _) = StubTransport::failing("a");
    let (b, _) = StubTransport::failing("b");
    let inner = FailoverTransport::new(vec![a.boxed(), b.boxed()]).expect("non-empty");
    let (c, _) = StubTransport::failing("c");
    let outer = FailoverTransport::new(vec![Box::new(inner), c.boxed()]).expect("non-empty");

    let err = outer.send(&sms()).await.err().expect("every child fails");

    match &err {
        NotifierError::Transport(TransportError::AllFailed(failures)) => {
            assert_eq!(failures.len(), 2);
            assert!(matches!(
                failures[0],
                NotifierError::Transport(TransportError::AllFailed(_))
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let text = err.to_string();
    for name in ["a is down", "b is down", "c is down"] {
        assert!(text.contains(name), "{text}");
    }
}

#[tokio::test]
async fn round_robin_retry_period_skips_recently_failed_child() {
    let (a, a_calls) = StubTransport::failing("a");
    let (b, b_calls) = StubTransport::ok("b");
    let round_robin = RoundRobinTransport::new(vec![a.boxed(), b.boxed()])
        .expect("non-empty")
        .with_retry_period(Duration::from_secs(60));

    for _ in 0..4 {
        let sent = round_robin.send(&sms()).await.expect("b delivers");
        assert_eq!(sent.transport(), "b://stub");
    }

    assert_eq!(a_calls.load(Ordering::SeqCst), 1);
    assert_eq!(b_calls.load(Ordering::SeqCst), 4);
}
