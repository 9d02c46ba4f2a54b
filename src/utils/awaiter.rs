use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

pub type Continuation = Box<dyn FnOnce() + Send + 'static>;

/// 以回调通知完成的异步操作。
///
/// 实现方必须在完成后对每个已注册的回调恰好调用一次，
/// 包括在操作完成之后才注册的回调。
pub trait CompletionSource {
    fn is_done(&self) -> bool;

    fn on_completed(&self, continuation: Continuation);
}

// 将回调式的完成通知桥接为 Future
pub struct OperationAwaiter<S: CompletionSource> {
    source: S,
    waker: Option<Arc<Mutex<Option<Waker>>>>,
}

impl<S: CompletionSource> OperationAwaiter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            waker: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.source.is_done()
    }

    // 结果保存在操作句柄上，这里无需返回
    pub fn get_result(&self) {}
}

impl<S: CompletionSource + Unpin> Future for OperationAwaiter<S> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if this.is_completed() {
            this.get_result();
            return Poll::Ready(());
        }

        match &this.waker {
            Some(slot) => {
                let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                *slot = Some(cx.waker().clone());
            }
            None => {
                // 只订阅一次，之后的 poll 只更新 waker
                let slot = Arc::new(Mutex::new(Some(cx.waker().clone())));
                let notify = Arc::clone(&slot);
                this.waker = Some(slot);
                this.source.on_completed(Box::new(move || {
                    let waker = notify
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take();
                    if let Some(waker) = waker {
                        waker.wake();
                    }
                }));
            }
        }

        // 订阅期间可能已经完成
        if this.is_completed() {
            this.get_result();
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct ManualSource {
        done: Arc<AtomicBool>,
        continuations: Arc<Mutex<Vec<Continuation>>>,
        subscriptions: Arc<AtomicUsize>,
    }

    impl ManualSource {
        fn complete(&self) {
            self.done.store(true, Ordering::SeqCst);
            let pending: Vec<Continuation> = self.continuations.lock().unwrap().drain(..).collect();
            for continuation in pending {
                continuation();
            }
        }
    }

    impl CompletionSource for ManualSource {
        fn is_done(&self) -> bool {
            self.done.load(Ordering::SeqCst)
        }

        fn on_completed(&self, continuation: Continuation) {
            self.subscriptions.fetch_add(1, Ordering::SeqCst);
            if self.is_done() {
                continuation();
            } else {
                self.continuations.lock().unwrap().push(continuation);
            }
        }
    }

    #[tokio::test]
    async fn resolves_immediately_when_already_done() {
        let source = ManualSource::default();
        source.complete();

        let awaiter = OperationAwaiter::new(source.clone());
        assert!(awaiter.is_completed());
        awaiter.await;
        assert_eq!(source.subscriptions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resumes_after_completion_callback() {
        let source = ManualSource::default();
        let trigger = source.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.complete();
        });

        tokio::time::timeout(Duration::from_secs(2), OperationAwaiter::new(source.clone()))
            .await
            .expect("awaiter should resolve after completion");
        assert_eq!(source.subscriptions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pending_while_not_done() {
        let source = ManualSource::default();
        let result =
            tokio::time::timeout(Duration::from_millis(30), OperationAwaiter::new(source)).await;
        assert!(result.is_err());
    }
}
