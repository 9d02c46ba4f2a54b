use std::future::IntoFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;

use crate::models::{RequestOutcome, RequestResult};
use crate::services::transport::Transport;
use crate::utils::awaiter::{CompletionSource, Continuation, OperationAwaiter};

#[derive(Default)]
struct OperationInner {
    outcome: Option<RequestOutcome>,
    continuations: Vec<Continuation>,
    task: Option<AbortHandle>,
}

#[derive(Default)]
struct OperationState {
    done: AtomicBool,
    inner: Mutex<OperationInner>,
}

/// 进行中的一次网络调用的句柄。
///
/// 克隆之间共享同一份状态。完成标记只会从 `false` 变为 `true`，
/// 以第一次完成为准，之后的完成会被忽略。
#[derive(Clone, Default)]
pub struct AsyncOperation {
    state: Arc<OperationState>,
}

impl AsyncOperation {
    fn lock(&self) -> MutexGuard<'_, OperationInner> {
        self.state.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_done(&self) -> bool {
        self.state.done.load(Ordering::Acquire)
    }

    pub fn outcome(&self) -> Option<RequestOutcome> {
        self.lock().outcome.clone()
    }

    // 完成操作并通知所有订阅者，返回是否为首次完成
    fn complete(&self, outcome: RequestOutcome) -> bool {
        let continuations = {
            let mut inner = self.lock();
            if self.is_done() {
                return false;
            }
            inner.outcome = Some(outcome);
            inner.task = None;
            self.state.done.store(true, Ordering::Release);
            std::mem::take(&mut inner.continuations)
        };

        for continuation in continuations {
            continuation();
        }
        true
    }
}

impl CompletionSource for AsyncOperation {
    fn is_done(&self) -> bool {
        AsyncOperation::is_done(self)
    }

    fn on_completed(&self, continuation: Continuation) {
        {
            let mut inner = self.lock();
            if !self.is_done() {
                inner.continuations.push(continuation);
                return;
            }
        }
        // 已完成时立即回调
        continuation();
    }
}

impl IntoFuture for AsyncOperation {
    type Output = ();
    type IntoFuture = OperationAwaiter<AsyncOperation>;

    fn into_future(self) -> Self::IntoFuture {
        OperationAwaiter::new(self)
    }
}

// 单次GET请求，结果通过 AsyncOperation 获取
pub struct WebRequest {
    url: String,
    operation: AsyncOperation,
    started: AtomicBool,
}

impl WebRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            operation: AsyncOperation::default(),
            started: AtomicBool::new(false),
        }
    }

    // 发送请求，只会真正发送一次；必须在 tokio 运行时内调用
    pub fn send_web_request(&self, transport: Arc<dyn Transport>) -> AsyncOperation {
        if self.started.swap(true, Ordering::AcqRel) {
            log::warn!("请求已发送，忽略重复发送: {}", self.url);
            return self.operation.clone();
        }

        log::debug!("发送请求: {}", self.url);
        let request = transport.get(&self.url);
        let operation = self.operation.clone();
        // 持锁期间任务无法完成，保证 abort 句柄先于完成写入
        let mut inner = self.operation.lock();
        let handle = tokio::spawn(async move {
            let outcome = request.await;
            operation.complete(outcome);
        });
        inner.task = Some(handle.abort_handle());
        drop(inner);

        self.operation.clone()
    }

    // 尽力中止请求；已完成的请求不受影响
    pub fn abort(&self) {
        let task = self.operation.lock().task.take();
        if let Some(task) = task {
            task.abort();
        }
        if self.operation.complete(RequestOutcome::aborted()) {
            log::debug!("请求已中止: {}", self.url);
        }
    }

    pub fn is_done(&self) -> bool {
        self.operation.is_done()
    }

    pub fn result(&self) -> RequestResult {
        self.operation
            .outcome()
            .map(|outcome| outcome.result)
            .unwrap_or(RequestResult::InProgress)
    }

    pub fn error(&self) -> Option<String> {
        self.operation.outcome().and_then(|outcome| outcome.error)
    }

    pub fn text(&self) -> Option<String> {
        self.operation.outcome().and_then(|outcome| outcome.text)
    }

    pub fn is_aborted(&self) -> bool {
        self.operation
            .outcome()
            .map(|outcome| outcome.aborted)
            .unwrap_or(false)
    }
}

// 调用方放弃请求时，不再让后台任务继续占用连接
impl Drop for WebRequest {
    fn drop(&mut self) {
        if self.started.load(Ordering::Acquire) && !self.operation.is_done() {
            self.abort();
        }
    }
}
