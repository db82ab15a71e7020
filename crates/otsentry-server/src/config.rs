use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// 是否启用只读仪表盘 HTTP API
    #[serde(default = "default_dashboard_enabled")]
    pub dashboard_enabled: bool,

    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// 已处理 CVE ID 缓存文件路径
    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("cve_cache.json")
    }

    /// 威胁报告文件路径（仪表盘读取同一路径）
    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("threat_report.json")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            data_dir: default_data_dir(),
            dashboard_enabled: default_dashboard_enabled(),
            fetch: FetchConfig::default(),
            ai: AiConfig::default(),
            cycle: CycleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// 常规模式回看窗口（分钟）
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,
    /// 回退模式回看天数
    #[serde(default = "default_fallback_days")]
    pub fallback_days: i64,
    /// 回退模式结果条数上限
    #[serde(default = "default_fallback_max_results")]
    pub fallback_max_results: u32,
    /// NVD API key；未配置时读取环境变量 NVD_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,
}

impl FetchConfig {
    /// 配置值优先，其次环境变量。两者皆无时返回 None（适用更严格的限速）。
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("NVD_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
            fallback_days: default_fallback_days(),
            fallback_max_results: default_fallback_max_results(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Ollama 服务地址，缺省使用本机默认端口
    #[serde(default)]
    pub base_url: Option<String>,
    /// 模型名（可被 CLI --model 覆盖）
    #[serde(default)]
    pub model: Option<String>,
    /// 单次模型调用超时（秒）
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
    /// 模型调用重试次数上限
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: None,
            attempt_timeout_secs: default_attempt_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// 周期间隔（分钟）
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
        }
    }
}

fn default_http_port() -> u16 {
    8686
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_dashboard_enabled() -> bool {
    true
}

fn default_window_minutes() -> i64 {
    10
}

fn default_fallback_days() -> i64 {
    2
}

fn default_fallback_max_results() -> u32 {
    20
}

fn default_attempt_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_interval_minutes() -> u64 {
    10
}
