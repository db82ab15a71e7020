use async_trait::async_trait;
use std::time::Duration;

/// Errors from a text-completion backend.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The request did not complete within the given timeout.
    #[error("Completion request timed out")]
    Timeout,

    /// The completion service could not be reached.
    #[error("Completion service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with a non-success status.
    #[error("Completion API error: status={status}, body={body}")]
    Api { status: u16, body: String },

    /// The response payload could not be decoded.
    #[error("Completion response decode error: {0}")]
    Decode(String),
}

/// Convenience `Result` alias for completion operations.
pub type Result<T> = std::result::Result<T, CompletionError>;

/// 文本补全服务抽象（支持多模型扩展）。
///
/// 每次调用相互独立，不携带会话上下文。分类阶段通过该接口注入真实
/// provider 或测试桩。
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// 模型提供商名称
    fn provider(&self) -> &str;

    /// 模型名称
    fn model_name(&self) -> &str;

    /// 发送单条 prompt 并返回补全文本，超时由调用方指定。
    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String>;
}
