//! 客户端错误类型
//!
//! 所有 API 操作返回 `ApiError`，页面通过 `user_message` 转成展示给用户的文本。

use crate::web::http::HttpError;

/// 网络不可达时的统一提示
pub const UNREACHABLE_MESSAGE: &str =
    "No response from server. Please check if the server is running.";
/// 无法归类错误的统一提示
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// 触发错误的操作，决定后端未给出消息时的兜底文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Signup,
    Upload,
    ProcessStatement,
    Analyze,
    Summary,
    Transactions,
}

impl Operation {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Login => "Login failed.",
            Operation::Signup => "Sign up failed. Please try again.",
            Operation::Upload => "Upload failed. Please try again.",
            Operation::ProcessStatement => "Analysis failed. Please try again.",
            Operation::Analyze => "Could not analyze your spending. Please try again.",
            Operation::Summary => "Failed to load your spending summary.",
            Operation::Transactions => "Failed to load transactions. Please try again later.",
        }
    }
}

/// API 错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 发请求之前就被拦下的输入错误
    #[error("{0}")]
    Validation(String),
    /// 后端返回非 2xx，`message` 取自 `{error}`
    #[error("server responded {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Server {
        status: u16,
        message: Option<String>,
    },
    /// 后端返回 401，本地缓存的会话已失效
    #[error("unauthorized: {}", .0.as_deref().unwrap_or("<no message>"))]
    Unauthorized(Option<String>),
    /// 服务器不可达
    #[error("network error: {0}")]
    Network(String),
    /// 请求构建失败或响应格式不符
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// 展示给用户的文本：后端消息原样展示，否则使用按操作区分的兜底文案
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Server { message, .. } | Self::Unauthorized(message) => message
                .clone()
                .unwrap_or_else(|| op.fallback_message().to_string()),
            Self::Network(_) => UNREACHABLE_MESSAGE.to_string(),
            Self::Unexpected(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::NetworkError(msg) => ApiError::Network(msg),
            HttpError::RequestBuildFailed(msg) | HttpError::ResponseParseFailed(msg) => {
                ApiError::Unexpected(msg)
            }
        }
    }
}
