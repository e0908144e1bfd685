//! Single-flight guard for application-supplied async handlers
//!
//! The core never runs anything in the background. The only async boundary
//! is a caller's submit/send handler: while one invocation is outstanding
//! the triggering control is busy (rendered disabled) and further
//! invocations are no-ops. The busy flag is cleared by a drop guard, so it
//! resets on success, failure and cancellation alike.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// Busy flag shared between a control and its in-flight invocation
#[derive(Debug, Clone, Default)]
pub struct AsyncControl {
    busy: Rc<Cell<bool>>,
}

struct BusyGuard(Rc<Cell<bool>>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl AsyncControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Start `handler` unless an earlier invocation is still outstanding
    ///
    /// Returns `None` (and never calls `handler`) while busy. The returned
    /// future keeps the control busy until it completes or is dropped.
    pub fn invoke<F, Fut>(&self, handler: F) -> Option<impl Future<Output = Fut::Output>>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        if self.busy.get() {
            tracing::debug!("async control busy, ignoring invocation");
            return None;
        }
        self.busy.set(true);
        let guard = BusyGuard(Rc::clone(&self.busy));
        let pending = handler();
        Some(async move {
            let _guard = guard;
            pending.await
        })
    }
}

/// Receiver of loading/data/error transitions around an async load
pub trait AsyncStateSink<T, E> {
    fn set_loading(&mut self, loading: bool);

    fn set_data(&mut self, data: &T);

    fn set_error(&mut self, error: &E);
}

/// Run `pending` with loading display around it
///
/// Loading is switched on first, the outcome is reported to `sink` as data
/// or error, and loading is switched off again. The outcome is handed back
/// unchanged, so failures still reach the caller.
pub async fn with_async_state<S, T, E, Fut>(sink: &mut S, pending: Fut) -> Result<T, E>
where
    S: AsyncStateSink<T, E> + ?Sized,
    Fut: Future<Output = Result<T, E>>,
{
    sink.set_loading(true);
    let outcome = pending.await;
    match &outcome {
        Ok(data) => sink.set_data(data),
        Err(error) => sink.set_error(error),
    }
    sink.set_loading(false);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    #[test]
    fn test_second_invocation_is_noop_while_outstanding() {
        let control = AsyncControl::new();
        let calls = Rc::new(Cell::new(0));
        let (tx, rx) = oneshot::channel::<()>();

        let first = {
            let calls = calls.clone();
            control.invoke(move || {
                calls.set(calls.get() + 1);
                async move {
                    let _ = rx.await;
                }
            })
        };
        assert!(first.is_some());
        assert!(control.is_busy());

        let second = {
            let calls = calls.clone();
            control.invoke(move || {
                calls.set(calls.get() + 1);
                async {}
            })
        };
        assert!(second.is_none());
        assert_eq!(calls.get(), 1);

        let mut pool = LocalPool::new();
        pool.spawner()
            .spawn_local(async move {
                if let Some(pending) = first {
                    pending.await;
                }
            })
            .unwrap();
        pool.run_until_stalled();
        assert!(control.is_busy());

        tx.send(()).unwrap();
        pool.run_until_stalled();
        assert!(!control.is_busy());
    }

    #[test]
    fn test_failure_clears_busy() {
        let control = AsyncControl::new();
        let pending = control
            .invoke(|| async { Err::<(), &str>("boom") })
            .unwrap();
        assert_eq!(block_on(pending), Err("boom"));
        assert!(!control.is_busy());
    }

    #[test]
    fn test_dropped_invocation_clears_busy() {
        let control = AsyncControl::new();
        let pending = control.invoke(|| async {});
        assert!(control.is_busy());
        drop(pending);
        assert!(!control.is_busy());
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl AsyncStateSink<u32, String> for Recorder {
        fn set_loading(&mut self, loading: bool) {
            self.log.push(format!("loading={loading}"));
        }
        fn set_data(&mut self, data: &u32) {
            self.log.push(format!("data={data}"));
        }
        fn set_error(&mut self, error: &String) {
            self.log.push(format!("error={error}"));
        }
    }

    #[test]
    fn test_with_async_state_reports_and_returns_error() {
        let mut sink = Recorder::default();
        let outcome = block_on(with_async_state(&mut sink, async {
            Err::<u32, String>("offline".into())
        }));

        assert_eq!(outcome, Err("offline".to_string()));
        assert_eq!(sink.log, ["loading=true", "error=offline", "loading=false"]);
    }

    #[test]
    fn test_with_async_state_reports_data() {
        let mut sink = Recorder::default();
        let outcome = block_on(with_async_state(&mut sink, async { Ok::<u32, String>(7) }));

        assert_eq!(outcome, Ok(7));
        assert_eq!(sink.log, ["loading=true", "data=7", "loading=false"]);
    }
}
