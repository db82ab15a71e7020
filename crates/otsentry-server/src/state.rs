use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use otsentry_report::ReportStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// 仪表盘每次请求都重新读取报告文件，避免持有陈旧数据
    pub store: Arc<ReportStore>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}
