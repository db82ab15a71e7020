use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 报告格式版本号
pub const REPORT_VERSION: &str = "1.0";

/// CVE 描述缺失时的占位文本
pub const NO_DESCRIPTION: &str = "No description available";

/// CVSS 向量缺失时的占位文本
pub const NA_VECTOR: &str = "N/A";

/// 时间戳缺失时的占位文本
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// Threat severity level derived from a CVSS base score.
///
/// # Examples
///
/// ```
/// use otsentry_common::types::Severity;
///
/// assert_eq!(Severity::from_score(9.8), Severity::Critical);
/// assert_eq!(Severity::from_score(0.0), Severity::None);
/// assert_eq!(Severity::Critical.to_string(), "CRITICAL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    None,
}

impl Severity {
    /// CVSS 分数到严重级别的固定阈值映射。
    /// 阈值与 AI 洞察生成使用的严重度分档保持一致。
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else if score > 0.0 {
            Severity::Low
        } else {
            Severity::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::None => "NONE",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            "NONE" => Ok(Severity::None),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// 从 NVD 抓取并归一化后的单条漏洞记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    /// CVE 编号（全局唯一，用于去重）
    pub cve_id: String,
    /// CVSS 基础分（0.0-10.0，未知时为 0.0）
    pub cvss_score: f64,
    /// CVSS 向量字符串（未知时为 "N/A"）
    pub cvss_vector: String,
    /// 英文描述（缺失时为占位文本）
    pub description: String,
    /// 发布时间（ISO-8601，缺失时为 "Unknown"）
    pub published_date: String,
    /// 最后修改时间（ISO-8601，缺失时为 "Unknown"）
    pub last_modified: String,
    /// 参考链接（最多保留上游前 3 条）
    pub references: Vec<String>,
}

/// 通过 OT 相关性判定的漏洞记录，附带 AI 生成的影响分析。
/// 出现在下游列表中即代表"相关"，无需单独的布尔标记。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedThreat {
    pub record: VulnerabilityRecord,
    /// AI 生成的工业影响分析（2-3 句）
    pub ai_insight: String,
}

/// 报告中的单条威胁条目
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreatEntry {
    pub cve_id: String,
    pub cvss_score: f64,
    pub severity: Severity,
    pub description: String,
    pub ai_insight: String,
    pub published_date: String,
    pub last_modified: String,
    pub references: Vec<String>,
}

/// 按严重级别统计的威胁数量。
/// NONE 级别的威胁不计入任何一项（沿用既有报告格式）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeverityBreakdown {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// 最终持久化的威胁情报报告（仪表盘的唯一数据来源）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreatReport {
    /// 生成时间（RFC3339 UTC）
    pub generated_at: String,
    pub report_version: String,
    pub total_threats: usize,
    /// 按 CVSS 分数降序排列（同分保持分类输出顺序）
    pub threats: Vec<ThreatEntry>,
    pub severity_breakdown: SeverityBreakdown,
}
