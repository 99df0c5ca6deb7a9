// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::backends::direct::DirectDriver;
use crate::backends::stub::{CallLog, Collector, FailingPublisher, RecordingSubscriber, UnscheduledDriver};
use crate::config::{DelayFallback, ExecutionOptions, Runtime};
use crate::driver::{Context, DriverHandle};
use crate::errors::ProactiveError;
use crate::statement::{Statement, StatementExt};
use crate::streams::reactive;

fn runtime() -> Runtime {
    Runtime::new(DriverHandle::new(DirectDriver::new()))
}

fn run<O, S>(runtime: &Runtime, statement: &S) -> Collector<O>
where
    O: Clone + Send + 'static,
    S: Statement<O> + ?Sized,
{
    let collector = Collector::new();
    statement.now_in(runtime, collector.callbacks()).unwrap();
    collector
}

/// A statement that always builds its context on one specific driver.
struct Pinned(DriverHandle);

impl Statement<i32> for Pinned {
    fn get(&self, _driver: &DriverHandle) -> Result<Context<i32>, ProactiveError> {
        Ok(self.0.just(Some(1)))
    }

    fn name(&self) -> &'static str {
        "pinned"
    }
}

#[test]
fn test_check_is_then_otherwise() {
    let runtime = runtime();
    let test_cases = vec![(5, vec!["yes"]), (4, vec!["no"])];

    for (input, expected) in test_cases {
        let statement = Check::that(The::value(input))
            .is(5)
            .then(The::value("yes"))
            .otherwise(The::value("no"));

        let collector = run(&runtime, &statement);
        assert_eq!(collector.values(), expected, "input: {}", input);
        assert!(collector.completed(), "input: {}", input);
    }
}

#[test]
fn test_check_without_otherwise_produces_nothing_on_mismatch() {
    let runtime = runtime();
    let statement = Check::that(The::value(4)).is(5).then(The::value("yes"));

    let collector = run(&runtime, &statement);

    assert!(collector.values().is_empty());
    assert!(collector.completed());
    assert_eq!(collector.terminations(), 1);
}

#[test]
fn test_check_defaults_to_truthiness() {
    let runtime = runtime();

    let flags = Check::that(The::series(vec![true, false, true])).then(The::value("hit"));
    assert_eq!(run(&runtime, &flags).values(), vec!["hit", "hit"]);

    let options = Check::that(The::series(vec![Some(1), None, Some(0)]))
        .then_with(|v: Option<i32>| The::maybe(v));
    assert_eq!(run(&runtime, &options).values(), vec![1, 0]);
}

#[test]
fn test_check_refinements() {
    let runtime = runtime();

    let is_not = Check::that(The::series(vec![1, 2, 3]))
        .is_not(2)
        .then_with(|v: i32| The::value(v * 100));
    assert_eq!(run(&runtime, &is_not).values(), vec![100, 300]);

    let matches = Check::that(The::series(vec![1, 2, 3, 4]))
        .matches(|v: &i32| v % 2 == 0)
        .then_with(|v: i32| The::value(format!("even {}", v)))
        .otherwise_with(|v: i32| The::value(format!("odd {}", v)));
    assert_eq!(
        run(&runtime, &matches).values(),
        vec!["odd 1", "even 2", "odd 3", "even 4"]
    );
}

#[test]
fn test_check_branch_can_emit_many_values() {
    let runtime = runtime();
    let statement = Check::that(The::value(true)).then(The::series(vec![1, 2, 3]));

    assert_eq!(run(&runtime, &statement).values(), vec![1, 2, 3]);
}

#[test]
fn test_wait() {
    let runtime = runtime();

    let test_cases: Vec<(&str, Box<dyn Statement<i32>>, Vec<i32>)> = vec![
        (
            "first above two",
            Box::new(Wait::until(The::series(vec![1, 2, 3, 4])).matches(|v: &i32| *v > 2)),
            vec![3],
        ),
        (
            "never above five",
            Box::new(Wait::until(The::series(vec![1, 2])).matches(|v: &i32| *v > 5)),
            vec![],
        ),
        ("is", Box::new(Wait::until(The::series(vec![1, 3, 3])).is(3)), vec![3]),
        ("is_not", Box::new(Wait::until(The::series(vec![1, 1, 2])).is_not(1)), vec![2]),
        ("empty", Box::new(Wait::until(The::series(Vec::<i32>::new())).is(1)), vec![]),
    ];

    for (name, statement, expected) in test_cases {
        let collector = run(&runtime, statement.as_ref());
        assert_eq!(collector.values(), expected, "case: {}", name);
        assert!(collector.completed(), "case: {}", name);
    }
}

#[test]
fn test_wait_defaults_to_truthiness() {
    let runtime = runtime();
    let statement = Wait::until(The::series(vec![false, false, true, false]));

    assert_eq!(run(&runtime, &statement).values(), vec![true]);
}

#[test]
fn test_try_then() {
    let runtime = runtime();

    let tens = Try::resolving(The::series(vec![1, 2, 3])).then_with(|v: i32| The::value(v * 10));
    assert_eq!(run(&runtime, &tens).values(), vec![10, 20, 30]);

    let chained = Try::resolving(The::series(vec![1, 2]))
        .then_with(|v: i32| The::series(vec![v, v]))
        .then_with(|v: i32| The::value(v.to_string()));
    assert_eq!(run(&runtime, &chained).values(), vec!["1", "1", "2", "2"]);

    let constant = Try::resolving(The::series(vec![1, 2])).then(The::value("tick"));
    assert_eq!(run(&runtime, &constant).values(), vec!["tick", "tick"]);

    let passthrough = Try::resolving(The::series(vec![4, 5]));
    assert_eq!(run(&runtime, &passthrough).values(), vec![4, 5]);
}

#[test]
fn test_first() {
    let runtime = runtime();

    let test_cases: Vec<(&str, First<i32>, Vec<i32>)> = vec![
        ("series", First::of(The::series(vec![7, 8, 9])), vec![7]),
        ("value", First::of(The::value(3)), vec![3]),
        ("empty", First::of(The::series(Vec::new())), vec![]),
        ("absent", First::of(The::maybe(None)), vec![]),
    ];

    for (name, statement, expected) in test_cases {
        let collector = run(&runtime, &statement);
        assert_eq!(collector.values(), expected, "case: {}", name);
        assert!(collector.completed(), "case: {}", name);
    }
}

#[test]
fn test_the_sources() {
    let runtime = runtime();

    assert_eq!(run(&runtime, &The::value("a")).values(), vec!["a"]);
    assert_eq!(run(&runtime, &The::maybe(Some(2))).values(), vec![2]);
    assert!(run(&runtime, &The::<i32>::maybe(None)).values().is_empty());
    assert_eq!(run(&runtime, &The::series(1..=3)).values(), vec![1, 2, 3]);
}

#[test]
fn test_the_lifts_publishers_of_both_protocols() {
    let runtime = runtime();
    let reactive_source: Arc<dyn reactive::Publisher<i32>> =
        Arc::new(FailingPublisher::new(vec![1, 2], "reactive done"));
    let flow_source: Arc<dyn crate::streams::flow::Publisher<i32>> =
        Arc::new(FailingPublisher::new(vec![3], "flow done"));

    let reactive_run = run(&runtime, &The::publisher(reactive_source));
    assert_eq!(reactive_run.values(), vec![1, 2]);
    assert_eq!(reactive_run.error().unwrap().to_string(), "reactive done");

    let flow_run = run(&runtime, &The::flow_publisher(flow_source));
    assert_eq!(flow_run.values(), vec![3]);
    assert_eq!(flow_run.error().unwrap().to_string(), "flow done");
}

#[test]
fn test_errors_propagate_unchanged_through_every_combinator() {
    let runtime = runtime();
    let failing = Arc::new(FailingPublisher::new(Vec::<i32>::new(), "boom"));
    let source = || The::publisher(failing.clone() as Arc<dyn reactive::Publisher<i32>>);

    let test_cases: Vec<(&str, Box<dyn Statement<i32>>)> = vec![
        (
            "check",
            Box::new(Check::that(source()).is(1).then(The::value(1)).otherwise(The::value(0))),
        ),
        ("wait", Box::new(Wait::until(source()).is(1))),
        ("try", Box::new(Try::resolving(source()).then_with(|v: i32| The::value(v)))),
        ("first", Box::new(First::of(source()))),
        ("logged", Box::new(source().logged("errors"))),
    ];

    for (name, statement) in test_cases {
        let collector = run(&runtime, statement.as_ref());
        let received = collector.error().expect("error should be delivered");
        assert!(Arc::ptr_eq(&received, &failing.error()), "case: {}", name);
        assert!(collector.values().is_empty(), "case: {}", name);
        assert!(!collector.completed(), "case: {}", name);
        assert_eq!(collector.terminations(), 1, "case: {}", name);
    }
}

#[test]
fn test_error_in_branch_stops_later_values() {
    let runtime = runtime();
    let failing = Arc::new(FailingPublisher::new(Vec::<i32>::new(), "branch failed"));
    let branch = failing.clone();

    let statement = Try::resolving(The::series(vec![1, 2, 3])).then_with(move |v: i32| {
        if v == 2 {
            The::publisher(branch.clone() as Arc<dyn reactive::Publisher<i32>>)
        } else {
            The::value(v)
        }
    });
    let collector = run(&runtime, &statement);

    assert_eq!(collector.values(), vec![1]);
    assert!(Arc::ptr_eq(&collector.error().unwrap(), &failing.error()));
    assert!(!collector.completed());
}

#[test]
fn test_statements_re_execute_independently() {
    let runtime = runtime();
    let statement = Check::that(The::series(vec![1, 2, 3]))
        .matches(|v: &i32| *v > 1)
        .then_with(|v: i32| The::value(v * 2));

    let first = run(&runtime, &statement);
    let second = run(&runtime, &statement);

    assert_eq!(first.values(), vec![4, 6]);
    assert_eq!(second.values(), first.values());
    assert_eq!(first.terminations(), 1);
    assert_eq!(second.terminations(), 1);
}

#[test]
fn test_shared_statement_executes_concurrently() {
    let runtime = runtime();
    let statement: Arc<dyn Statement<i32>> = Try::resolving(The::series(1..=50))
        .then_with(|v: i32| Check::that(The::value(v)).matches(|v: &i32| v % 5 == 0).then_with(|v: i32| The::value(v * 2)))
        .shared();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let statement = statement.clone();
            let runtime = runtime.clone();
            std::thread::spawn(move || run(&runtime, &statement))
        })
        .collect();
    let collectors: Vec<Collector<i32>> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    let expected: Vec<i32> = (1..=10).map(|v| v * 10).collect();
    for (index, collector) in collectors.iter().enumerate() {
        assert_eq!(collector.values(), expected, "worker: {}", index);
        assert!(collector.completed(), "worker: {}", index);
        assert_eq!(collector.terminations(), 1, "worker: {}", index);
    }
}

#[test]
fn test_statement_runs_unchanged_under_another_driver() {
    let statement = Try::resolving(The::series(vec![1, 2])).then_with(|v: i32| The::value(v + 1));
    let direct = runtime();
    let other = Runtime::new(DriverHandle::new(UnscheduledDriver::new()));

    assert_eq!(run(&direct, &statement).values(), vec![2, 3]);
    assert_eq!(run(&other, &statement).values(), vec![2, 3]);
}

#[test]
fn test_foreign_contexts_are_rejected() {
    let runtime = runtime();
    let other = DriverHandle::new(DirectDriver::new());

    let direct = First::of(Pinned(other.clone()));
    let error = direct
        .now_in(&runtime, Collector::<i32>::new().callbacks())
        .unwrap_err();
    assert!(matches!(error, ProactiveError::UnsupportedContext { operation: "first", .. }));

    let nested = Try::resolving(The::value(1)).then(Pinned(other));
    let collector = run(&runtime, &nested);
    assert!(collector
        .error()
        .unwrap()
        .to_string()
        .starts_with("Unsupported context in flat_map"));
}

#[test]
fn test_shared_and_boxed_statements_execute() {
    let runtime = runtime();
    let shared: Arc<dyn Statement<i32>> = The::series(vec![1, 2]).shared();
    let boxed: Box<dyn Statement<i32>> = Box::new(First::of(shared.clone()));

    assert_eq!(run(&runtime, &shared).values(), vec![1, 2]);
    assert_eq!(run(&runtime, &boxed).values(), vec![1]);
}

#[test]
fn test_subscribe_handler_runs_once_per_execution() {
    let runtime = runtime();
    let statement = The::series(vec![1, 2, 3]);

    let collector = run(&runtime, &statement);

    assert_eq!(collector.subscriptions(), 1);
}

#[test]
fn test_after_without_scheduler_falls_back_to_immediate() {
    let runtime = runtime();
    let collector = Collector::new();

    The::value(9)
        .after_in(&runtime, Duration::from_secs(60), collector.callbacks())
        .unwrap();

    assert_eq!(collector.values(), vec![9]);
}

#[test]
fn test_after_without_scheduler_can_reject() {
    let runtime = runtime().with_options(ExecutionOptions {
        delay_fallback: DelayFallback::Reject,
        ..ExecutionOptions::default()
    });
    let collector = Collector::<i32>::new();

    let error = The::value(9)
        .after_in(&runtime, Duration::from_secs(60), collector.callbacks())
        .unwrap_err();

    assert_eq!(
        error,
        ProactiveError::SchedulingUnsupported {
            driver: "direct".to_string()
        }
    );
    assert!(collector.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_after_defers_until_delay_elapses() {
    let runtime = runtime();
    let collector = Collector::new();

    Try::resolving(The::series(vec![1, 2]))
        .then_with(|v: i32| The::value(v * 10))
        .after_in(&runtime, Duration::from_secs(5), collector.callbacks())
        .unwrap();

    assert!(collector.events().is_empty());
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(collector.events().is_empty());
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(collector.values(), vec![10, 20]);
    assert!(collector.completed());
}

#[test]
fn test_after_reports_abandoned_when_runtime_shuts_down() {
    let runtime = runtime();
    let collector = Collector::new();
    let tokio_runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    tokio_runtime
        .block_on(async {
            The::value(1).after_in(&runtime, Duration::from_secs(60), collector.callbacks())
        })
        .unwrap();
    assert!(collector.events().is_empty());

    drop(tokio_runtime);

    assert!(collector.values().is_empty());
    assert!(!collector.completed());
    assert_eq!(collector.terminations(), 1);
    assert_eq!(
        collector.error().unwrap().to_string(),
        ProactiveError::Abandoned.to_string()
    );
}

#[tokio::test]
async fn test_after_on_unscheduled_driver_inside_runtime() {
    let driver = DriverHandle::new(UnscheduledDriver::new());
    let immediate = Runtime::new(driver.clone());
    let rejecting = Runtime::new(driver).with_options(ExecutionOptions {
        delay_fallback: DelayFallback::Reject,
        ..ExecutionOptions::default()
    });

    let collector = Collector::new();
    The::value(1)
        .after_in(&immediate, Duration::from_secs(1), collector.callbacks())
        .unwrap();
    assert_eq!(collector.values(), vec![1]);

    let rejected = The::value(1).after_in(&rejecting, Duration::from_secs(1), Collector::new().callbacks());
    assert!(matches!(
        rejected,
        Err(ProactiveError::SchedulingUnsupported { .. })
    ));
}

#[tokio::test]
async fn test_resolve_collects_values() {
    let runtime = runtime();
    let statement = Check::that(The::value(5))
        .is(5)
        .then(The::value("yes"))
        .otherwise(The::value("no"));

    assert_eq!(statement.resolve_in(&runtime).await.unwrap(), vec!["yes"]);
}

#[tokio::test]
async fn test_resolve_returns_the_stream_error() {
    let runtime = runtime();
    let failing = Arc::new(FailingPublisher::new(Vec::<i32>::new(), "resolve failed"));
    let statement = First::of(The::publisher(failing.clone() as Arc<dyn reactive::Publisher<i32>>));

    let error = statement.resolve_in(&runtime).await.unwrap_err();

    assert!(Arc::ptr_eq(&error, &failing.error()));
}

#[tokio::test]
async fn test_resolve_on_the_active_driver() {
    let values = Wait::until(The::series(vec![0, 7, 8])).is_not(0).resolve().await.unwrap();

    assert_eq!(values, vec![7]);
}

#[test]
fn test_subscribe_external_subscriber_through_statement_context() {
    let runtime = runtime();
    let log = CallLog::default();
    let recording = Arc::new(RecordingSubscriber::<i32>::new(log.clone()));
    let driver = runtime.driver();

    let context = First::of(The::series(vec![4, 5])).get(driver).unwrap();
    driver.subscribe_with(context, recording.clone()).unwrap();
    recording.reactive_subscription().unwrap().request(1);

    assert_eq!(log.entries(), vec!["on_subscribe", "on_next(4)", "on_complete"]);
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_category_instruments_every_execution() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let runtime = runtime().with_options(ExecutionOptions {
        log_category: Some("pipeline".to_string()),
        ..ExecutionOptions::default()
    });

    let values = tracing::subscriber::with_default(subscriber, || {
        run(&runtime, &The::series(vec![1, 2]).logged("inner")).values()
    });

    let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert_eq!(values, vec![1, 2]);
    assert!(output.contains("[pipeline] on_subscribe"));
    assert!(output.contains("[pipeline] request: unbounded"));
    assert!(output.contains("[inner] on_next"));
    assert!(output.contains("[pipeline] on_complete"));
    assert!(output.contains("Dispatching the statement on driver 'direct'"));
}
