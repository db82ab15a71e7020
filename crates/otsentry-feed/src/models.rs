use otsentry_common::types::{VulnerabilityRecord, NA_VECTOR, NO_DESCRIPTION, UNKNOWN_TIMESTAMP};
use serde::Deserialize;

/// 参考链接最多保留上游前 3 条
const MAX_REFERENCES: usize = 3;

/// NVD CVE API 2.0 响应顶层结构
#[derive(Debug, Deserialize)]
pub struct NvdResponse {
    #[serde(default)]
    pub vulnerabilities: Vec<NvdItem>,
}

#[derive(Debug, Deserialize)]
pub struct NvdItem {
    pub cve: NvdCve,
}

/// 单条 CVE 原始数据（仅反序列化本系统关心的字段）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NvdCve {
    pub id: String,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<NvdDescription>,
    #[serde(default)]
    pub metrics: NvdMetrics,
    #[serde(default)]
    pub references: Vec<NvdReference>,
}

#[derive(Debug, Deserialize)]
pub struct NvdDescription {
    pub lang: String,
    pub value: String,
}

/// 按 CVSS 标准版本分组的评分指标
#[derive(Debug, Default, Deserialize)]
pub struct NvdMetrics {
    #[serde(default, rename = "cvssMetricV31")]
    pub cvss_metric_v31: Vec<NvdCvssMetric>,
    #[serde(default, rename = "cvssMetricV30")]
    pub cvss_metric_v30: Vec<NvdCvssMetric>,
    #[serde(default, rename = "cvssMetricV2")]
    pub cvss_metric_v2: Vec<NvdCvssMetric>,
}

#[derive(Debug, Deserialize)]
pub struct NvdCvssMetric {
    #[serde(rename = "cvssData")]
    pub cvss_data: NvdCvssData,
}

#[derive(Debug, Deserialize)]
pub struct NvdCvssData {
    #[serde(default, rename = "baseScore")]
    pub base_score: Option<f64>,
    #[serde(default, rename = "vectorString")]
    pub vector_string: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NvdReference {
    pub url: String,
}

impl NvdCve {
    /// 归一化为内部漏洞记录。
    /// CVSS 版本优先级：v3.1 > v3.0 > v2，取首个匹配；均缺失时为 0.0 / "N/A"。
    pub fn into_record(self) -> VulnerabilityRecord {
        let (cvss_score, cvss_vector) = extract_cvss(&self.metrics);

        let description = self
            .descriptions
            .iter()
            .find(|d| d.lang == "en")
            .map(|d| d.value.clone())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        let references = self
            .references
            .into_iter()
            .take(MAX_REFERENCES)
            .map(|r| r.url)
            .collect();

        VulnerabilityRecord {
            cve_id: self.id,
            cvss_score,
            cvss_vector,
            description,
            published_date: self
                .published
                .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string()),
            last_modified: self
                .last_modified
                .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string()),
            references,
        }
    }
}

fn extract_cvss(metrics: &NvdMetrics) -> (f64, String) {
    let first_of = |group: &[NvdCvssMetric]| -> Option<(f64, String)> {
        group.first().map(|m| {
            (
                m.cvss_data.base_score.unwrap_or(0.0),
                m.cvss_data
                    .vector_string
                    .clone()
                    .unwrap_or_else(|| NA_VECTOR.to_string()),
            )
        })
    };

    first_of(&metrics.cvss_metric_v31)
        .or_else(|| first_of(&metrics.cvss_metric_v30))
        .or_else(|| first_of(&metrics.cvss_metric_v2))
        .unwrap_or_else(|| (0.0, NA_VECTOR.to_string()))
}
