//! Sequential action queue
//!
//! Actions run one at a time in submission order on a single worker task,
//! each one starting only once the previous one has settled. The first
//! action that fails (or panics) poisons the queue: every later action is
//! skipped and every completion awaiter sees the failure.

use anyhow::anyhow;
use futures::{
    future::{BoxFuture, FutureExt},
    Future,
};
use log::{debug, warn};
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};
use tokio::sync::{mpsc, oneshot};

use crate::error::HarnessError;

type BoxedAction = Box<dyn FnOnce() -> BoxFuture<'static, anyhow::Result<()>> + Send>;

enum Task {
    Action(BoxedAction),
    // Resolved once every task queued before it has settled
    Barrier(oneshot::Sender<Result<(), HarnessError>>),
}

/// FIFO of asynchronous actions drained by a dedicated worker task
pub struct ActionQueue {
    sender: mpsc::UnboundedSender<Task>,
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

async fn run_worker(mut receiver: mpsc::UnboundedReceiver<Task>) {
    let mut poisoned: Option<(usize, Arc<anyhow::Error>)> = None;
    let mut position = 0;

    while let Some(task) = receiver.recv().await {
        match task {
            Task::Action(action) => {
                position += 1;
                if let Some((failed_at, _)) = &poisoned {
                    debug!("Skipping action #{} after failure of #{}", position, failed_at);
                    continue;
                }

                let outcome = AssertUnwindSafe(async move { action().await })
                    .catch_unwind()
                    .await;

                let error = match outcome {
                    Ok(Ok(())) => continue,
                    Ok(Err(e)) => e,
                    Err(panic) => anyhow!("action panicked: {}", panic_message(panic.as_ref())),
                };

                if log::log_enabled!(log::Level::Warn) {
                    warn!("Action #{} failed: {:#}", position, error);
                }
                poisoned = Some((position, Arc::new(error)));
            }
            Task::Barrier(done) => {
                let result = match &poisoned {
                    Some((position, cause)) => Err(HarnessError::ActionFailed {
                        position: *position,
                        cause: Arc::clone(cause),
                    }),
                    None => Ok(()),
                };
                // the awaiter may have given up
                let _ = done.send(result);
            }
        }
    }
}

impl ActionQueue {
    /// Create a queue and spawn its worker on the current tokio runtime
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(receiver));
        Self { sender }
    }

    /// Append `action`; it runs after every action enqueued before it
    pub fn enqueue<F, Fut>(&self, action: F) -> &Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let task = Task::Action(Box::new(move || action().boxed()));
        if self.sender.send(task).is_err() {
            warn!("Dropping action, the queue worker is gone");
        }
        self
    }

    /// Resolve once every action enqueued so far has settled
    ///
    /// The position in the queue is fixed when this is called, not when the
    /// returned future is first polled.
    pub fn completion(&self) -> impl Future<Output = Result<(), HarnessError>> + Send + 'static {
        let (done, wait) = oneshot::channel();
        let queued = self.sender.send(Task::Barrier(done)).is_ok();

        async move {
            if !queued {
                return Err(HarnessError::QueueClosed);
            }
            wait.await.map_err(|_| HarnessError::QueueClosed)?
        }
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    fn recorder() -> Arc<Mutex<Vec<usize>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_actions_run_in_submission_order() {
        let queue = ActionQueue::new();
        let seen = recorder();

        // earlier actions sleep longer, order must still hold
        for index in 0..5u64 {
            let seen = seen.clone();
            queue.enqueue(move || async move {
                tokio::time::sleep(Duration::from_millis(25 - index * 5)).await;
                seen.lock().push(index as usize);
                Ok(())
            });
        }

        queue.completion().await.unwrap();
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_actions_never_overlap() {
        let queue = ActionQueue::new();
        let running = Arc::new(Mutex::new(0usize));
        let max_running = Arc::new(Mutex::new(0usize));

        for _ in 0..4 {
            let running = running.clone();
            let max_running = max_running.clone();
            queue.enqueue(move || async move {
                {
                    let mut count = running.lock();
                    *count += 1;
                    let mut max = max_running.lock();
                    *max = (*max).max(*count);
                }
                tokio::task::yield_now().await;
                *running.lock() -= 1;
                Ok(())
            });
        }

        queue.completion().await.unwrap();
        assert_eq!(*max_running.lock(), 1);
    }

    #[tokio::test]
    async fn test_empty_queue_completes() {
        let queue = ActionQueue::new();
        queue.completion().await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_skips_later_actions() {
        let queue = ActionQueue::new();
        let seen = recorder();

        let first = seen.clone();
        let third = seen.clone();
        queue
            .enqueue(move || async move {
                first.lock().push(1);
                Ok(())
            })
            .enqueue(|| async { Err(anyhow!("boom")) })
            .enqueue(move || async move {
                third.lock().push(3);
                Ok(())
            });

        match queue.completion().await {
            Err(HarnessError::ActionFailed { position, cause }) => {
                assert_eq!(position, 2);
                assert_eq!(cause.to_string(), "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(*seen.lock(), vec![1]);

        // the queue stays poisoned
        queue.enqueue(|| async { Ok(()) });
        assert!(queue.completion().await.is_err());
    }

    #[tokio::test]
    async fn test_panic_is_reported_as_failure() {
        let queue = ActionQueue::new();
        queue.enqueue(|| async {
            assert_eq!(1 + 1, 3, "math is broken");
            Ok(())
        });

        match queue.completion().await {
            Err(HarnessError::ActionFailed { position, cause }) => {
                assert_eq!(position, 1);
                assert!(cause.to_string().contains("math is broken"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_completion_only_covers_earlier_actions() {
        let queue = ActionQueue::new();
        let seen = recorder();

        let first = seen.clone();
        queue.enqueue(move || async move {
            first.lock().push(1);
            Ok(())
        });
        let early = queue.completion();

        let second = seen.clone();
        queue.enqueue(move || async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            second.lock().push(2);
            Ok(())
        });

        early.await.unwrap();
        assert_eq!(*seen.lock(), vec![1]);

        queue.completion().await.unwrap();
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_multiple_awaiters_see_same_failure() {
        let queue = ActionQueue::new();
        queue.enqueue(|| async { Err(anyhow!("broken")) });

        let (a, b) = tokio::join!(queue.completion(), queue.completion());
        assert!(matches!(a, Err(HarnessError::ActionFailed { position: 1, .. })));
        assert!(matches!(b, Err(HarnessError::ActionFailed { position: 1, .. })));
    }
}
