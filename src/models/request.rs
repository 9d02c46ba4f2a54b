// 中止请求时写入的错误信息
pub const ABORT_MESSAGE: &str = "Request aborted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestResult {
    InProgress,
    Success,
    ConnectionError,
    ProtocolError,
    DataProcessingError,
}

impl RequestResult {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            RequestResult::ConnectionError
                | RequestResult::ProtocolError
                | RequestResult::DataProcessingError
        )
    }
}

/// 一次网络调用的最终状态，由网络层上报。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub result: RequestResult,
    pub text: Option<String>,
    pub error: Option<String>,
    pub aborted: bool,
}

impl RequestOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            result: RequestResult::Success,
            text: Some(text.into()),
            error: None,
            aborted: false,
        }
    }

    pub fn connection_error(error: impl Into<String>) -> Self {
        Self::failure(RequestResult::ConnectionError, error, None)
    }

    pub fn protocol_error(error: impl Into<String>, body: Option<String>) -> Self {
        Self::failure(RequestResult::ProtocolError, error, body)
    }

    pub fn data_processing_error(error: impl Into<String>) -> Self {
        Self::failure(RequestResult::DataProcessingError, error, None)
    }

    // 被中止的请求按连接错误上报，同时显式标记 aborted
    pub fn aborted() -> Self {
        Self {
            result: RequestResult::ConnectionError,
            text: None,
            error: Some(ABORT_MESSAGE.to_string()),
            aborted: true,
        }
    }

    fn failure(result: RequestResult, error: impl Into<String>, text: Option<String>) -> Self {
        Self {
            result,
            text,
            error: Some(error.into()),
            aborted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_outcome_is_flagged_connection_error() {
        let outcome = RequestOutcome::aborted();
        assert_eq!(outcome.result, RequestResult::ConnectionError);
        assert!(outcome.aborted);
        assert_eq!(outcome.error.as_deref(), Some(ABORT_MESSAGE));
    }

    #[test]
    fn plain_connection_error_is_not_aborted() {
        let outcome = RequestOutcome::connection_error(ABORT_MESSAGE);
        assert!(!outcome.aborted);
        assert!(outcome.result.is_error());
        assert!(!RequestResult::Success.is_error());
        assert!(!RequestResult::InProgress.is_error());
    }
}
