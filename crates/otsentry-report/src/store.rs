use crate::error::Result;
use otsentry_common::types::ThreatReport;
use std::path::{Path, PathBuf};

/// 报告文件的读写入口。
///
/// 报告是仪表盘消费的唯一持久化产物。写失败会向上传播（对当前周期致命）；
/// 读侧宽容：文件缺失视为"暂无报告"，内容损坏记录错误后同样返回无报告。
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 序列化并覆盖写入报告文件，按需创建父目录。
    pub fn save(&self, report: &ThreatReport) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(report)?;
        std::fs::write(&self.path, content)?;

        tracing::info!(
            path = %self.path.display(),
            total = report.total_threats,
            "Report saved"
        );
        Ok(())
    }

    /// 读取报告。文件不存在或损坏时返回 `Ok(None)`。
    pub fn load(&self) -> Result<Option<ThreatReport>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No report file yet");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(report) => Ok(Some(report)),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Corrupt report file");
                Ok(None)
            }
        }
    }
}
