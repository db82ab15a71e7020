use serde::{Deserialize, Serialize};

/// Ollama `/api/generate` 请求格式
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// 始终关闭流式返回，一次性取回完整补全
    pub stream: bool,
}

/// Ollama `/api/generate` 响应格式（仅解析关心的字段）
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}
