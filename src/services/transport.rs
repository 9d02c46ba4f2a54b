use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;

use crate::config::SheetConfig;
use crate::models::RequestOutcome;

pub type TransportFuture = Pin<Box<dyn Future<Output = RequestOutcome> + Send + 'static>>;

/// [`WebRequest`](crate::services::WebRequest) 使用的网络层。
///
/// 实现不会返回错误，所有问题都通过 [`RequestOutcome`] 上报。
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> TransportFuture;
}

// 基于 reqwest 的默认实现
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &SheetConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("构建 HTTP 客户端失败，回退默认设置: {e}");
                Client::new()
            });
        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> TransportFuture {
        let client = self.client.clone();
        let url = url.to_string();

        Box::pin(async move {
            let response = match client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => return RequestOutcome::connection_error(e.to_string()),
            };

            let status = response.status();
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => return RequestOutcome::data_processing_error(e.to_string()),
            };

            if !status.is_success() {
                let text = String::from_utf8_lossy(&body).into_owned();
                return RequestOutcome::protocol_error(format!("HTTP {status}"), Some(text));
            }

            match String::from_utf8(body.to_vec()) {
                Ok(text) => RequestOutcome::success(text),
                Err(e) => RequestOutcome::data_processing_error(format!("响应不是有效的UTF-8: {e}")),
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    // 测试用: 固定延迟后返回预设结果
    pub struct CannedTransport {
        outcome: RequestOutcome,
        delay: Option<Duration>,
        pub urls: Arc<std::sync::Mutex<Vec<String>>>,
        pub calls: Arc<AtomicUsize>,
    }

    impl CannedTransport {
        pub fn new(outcome: RequestOutcome) -> Self {
            Self {
                outcome,
                delay: None,
                urls: Arc::default(),
                calls: Arc::default(),
            }
        }

        pub fn delayed(outcome: RequestOutcome, delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new(outcome)
            }
        }
    }

    impl Transport for CannedTransport {
        fn get(&self, url: &str) -> TransportFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            let outcome = self.outcome.clone();
            let delay = self.delay;
            Box::pin(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                outcome
            })
        }
    }

    // 测试用: 永不完成
    pub struct HangingTransport;

    // 测试用: 长时间挂起，请求 future 被释放时置位
    #[derive(Default)]
    pub struct ReleaseTracker {
        released: Arc<AtomicBool>,
    }

    impl ReleaseTracker {
        pub fn released(&self) -> Arc<AtomicBool> {
            Arc::clone(&self.released)
        }
    }

    struct ReleaseGuard(Arc<AtomicBool>);

    impl Drop for ReleaseGuard {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    impl Transport for ReleaseTracker {
        fn get(&self, _url: &str) -> TransportFuture {
            let guard = ReleaseGuard(Arc::clone(&self.released));
            Box::pin(async move {
                let _guard = guard;
                tokio::time::sleep(Duration::from_secs(3600)).await;
                RequestOutcome::success("")
            })
        }
    }

    impl Transport for HangingTransport {
        fn get(&self, _url: &str) -> TransportFuture {
            Box::pin(std::future::pending::<RequestOutcome>())
        }
    }
}
