use chrono::{DateTime, Duration, Utc};

/// 抓取时间窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    /// 最近 N 分钟（常规模式）
    Minutes(i64),
    /// 最近 N 天，限制返回条数（回退/测试模式）
    Days { days: i64, max_results: u32 },
}

impl FetchWindow {
    /// 以 `now` 为终点计算绝对时间范围
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let span = match self {
            FetchWindow::Minutes(minutes) => Duration::minutes(*minutes),
            FetchWindow::Days { days, .. } => Duration::days(*days),
        };
        (now - span, now)
    }

    /// 回退模式下的结果条数上限（映射为 `resultsPerPage`）
    pub fn max_results(&self) -> Option<u32> {
        match self {
            FetchWindow::Minutes(_) => None,
            FetchWindow::Days { max_results, .. } => Some(*max_results),
        }
    }
}

/// NVD API 要求的时间参数格式（ISO-8601，毫秒精度）
pub fn format_nvd_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S.000").to_string()
}
