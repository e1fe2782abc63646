use crumbtrail_core::{EmitterOptions, Event, EventEmitter, HandlerPanic, HandlerResult};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug)]
struct Navigate(String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NavigateKind;

impl fmt::Display for NavigateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "navigate")
    }
}

impl Event for Navigate {
    type Kind = NavigateKind;

    fn kind(&self) -> NavigateKind {
        NavigateKind
    }
}

async fn reject(_: Navigate) -> HandlerResult {
    Err(anyhow::anyhow!("route not found"))
}

async fn explode(_: Navigate) -> HandlerResult {
    panic!("lost route")
}

#[tokio::test]
async fn test_emit_async_runs_handlers_sequentially() {
    let emitter = EventEmitter::<Navigate>::default();
    let log = Rc::new(RefCell::new(Vec::new()));

    let slow = log.clone();
    emitter.on_async(NavigateKind, move |event: Navigate| {
        let slow = slow.clone();
        async move {
            slow.borrow_mut().push(format!("start {}", event.0));
            tokio::task::yield_now().await;
            slow.borrow_mut().push(format!("end {}", event.0));
            Ok(())
        }
    });

    let sync = log.clone();
    emitter.on_with_priority(NavigateKind, 1, move |event| {
        sync.borrow_mut().push(format!("sync {}", event.0));
        Ok(())
    });

    assert!(emitter.emit_async(Navigate("/docs".into())).await);
    assert_eq!(
        *log.borrow(),
        vec!["start /docs", "end /docs", "sync /docs"]
    );
}

#[tokio::test]
async fn test_emit_async_without_listeners() {
    let emitter = EventEmitter::<Navigate>::default();
    assert!(!emitter.emit_async(Navigate("/".into())).await);
}

#[tokio::test]
async fn test_once_async_is_removed_after_first_run() {
    let emitter = EventEmitter::<Navigate>::default();
    let hits = Rc::new(RefCell::new(0));
    let counter = hits.clone();
    emitter.once_async(NavigateKind, move |_| {
        let counter = counter.clone();
        async move {
            *counter.borrow_mut() += 1;
            Ok(())
        }
    });

    assert!(emitter.emit_async(Navigate("/a".into())).await);
    assert!(!emitter.emit_async(Navigate("/b".into())).await);
    assert_eq!(*hits.borrow(), 1);
}

#[tokio::test]
async fn test_async_failures_follow_error_policy() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let emitter = EventEmitter::<Navigate>::new(
        EmitterOptions::default()
            .with_continue_on_error(false)
            .with_on_error(move |_, err| sink.borrow_mut().push(err.to_string())),
    );
    let reached = Rc::new(RefCell::new(false));

    emitter.on_async(NavigateKind, reject);
    let flag = reached.clone();
    emitter.on(NavigateKind, move |_| {
        *flag.borrow_mut() = true;
        Ok(())
    });

    assert!(emitter.emit_async(Navigate("/missing".into())).await);
    assert!(!*reached.borrow());
    assert_eq!(*errors.borrow(), vec!["route not found".to_string()]);
}

#[tokio::test]
async fn test_async_panic_is_caught() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let emitter = EventEmitter::<Navigate>::new(EmitterOptions::default().with_on_error(move |_, err| {
        sink.borrow_mut().push(err.downcast_ref::<HandlerPanic>().is_some());
    }));

    emitter.on_async(NavigateKind, explode);

    assert!(emitter.emit_async(Navigate("/".into())).await);
    assert_eq!(*errors.borrow(), vec![true]);
}
