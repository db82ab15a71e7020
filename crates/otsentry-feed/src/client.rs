use crate::cache::SeenCache;
use crate::error::{FeedError, Result};
use crate::models::NvdResponse;
use crate::window::{format_nvd_timestamp, FetchWindow};
use chrono::Utc;
use otsentry_common::types::VulnerabilityRecord;
use std::time::Duration;

/// NVD CVE API 2.0 入口
pub const DEFAULT_NVD_BASE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";

/// NVD 限速：带 API key 时 30 秒内最多 5 次请求，
/// 每次成功请求后无条件等待 6 秒。
const RATE_LIMIT_DELAY_SECS: u64 = 6;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// NVD 漏洞源客户端。增量抓取，基于 [`SeenCache`] 去重。
pub struct NvdClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    rate_limit_delay: Duration,
}

impl NvdClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_NVD_BASE_URL.to_string(),
            api_key,
            rate_limit_delay: Duration::from_secs(RATE_LIMIT_DELAY_SECS),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 覆盖限速等待时长（测试中设为零以避免真实等待）
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    /// 抓取窗口内新发布的 CVE，跳过缓存中已有的 ID，并在返回前持久化缓存。
    ///
    /// 传输错误与非 2xx 响应直接返回错误，调用方在下一个调度周期重试；
    /// 本方法内部不做重试。幂等性完全由缓存保证：同一窗口、上游数据不变时，
    /// 第二次调用返回空集。
    pub async fn fetch(
        &self,
        window: FetchWindow,
        cache: &mut SeenCache,
    ) -> Result<Vec<VulnerabilityRecord>> {
        let (start, end) = window.range(Utc::now());

        tracing::info!(
            start = %format_nvd_timestamp(&start),
            end = %format_nvd_timestamp(&end),
            "Fetching CVEs from NVD"
        );

        let mut request = self.client.get(&self.base_url).query(&[
            ("pubStartDate", format_nvd_timestamp(&start)),
            ("pubEndDate", format_nvd_timestamp(&end)),
        ]);

        if let Some(cap) = window.max_results() {
            request = request.query(&[("resultsPerPage", cap.to_string())]);
        }

        if let Some(key) = &self.api_key {
            request = request.header("apiKey", key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let data: NvdResponse = response.json().await?;

        // 成功后无条件等待，遵守 NVD 限速（非自适应）
        if !self.rate_limit_delay.is_zero() {
            tokio::time::sleep(self.rate_limit_delay).await;
        }

        let records = collect_new_records(data, cache);

        // 缓存写失败不致命：已抓到的记录照常返回，下一轮可能重复处理
        if let Err(e) = cache.save() {
            tracing::error!(error = %e, "Failed to persist seen-id cache");
        }

        tracing::info!(count = records.len(), "Fetched new CVEs");
        Ok(records)
    }
}

/// 从响应中提取未见过的记录并登记其 ID。
fn collect_new_records(data: NvdResponse, cache: &mut SeenCache) -> Vec<VulnerabilityRecord> {
    let mut records = Vec::new();

    for item in data.vulnerabilities {
        if cache.contains(&item.cve.id) {
            tracing::debug!(cve_id = %item.cve.id, "Skipping already processed CVE");
            continue;
        }

        let record = item.cve.into_record();
        cache.insert(&record.cve_id);
        tracing::info!(cve_id = %record.cve_id, cvss = record.cvss_score, "New CVE found");
        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> NvdResponse {
        serde_json::from_str(
            r#"{
                "vulnerabilities": [
                    {"cve": {"id": "CVE-2026-1111",
                             "metrics": {"cvssMetricV31": [{"cvssData": {"baseScore": 9.8, "vectorString": "v"}}]},
                             "descriptions": [{"lang": "en", "value": "Siemens SIMATIC S7-1200 PLC flaw"}]}},
                    {"cve": {"id": "CVE-2026-2222",
                             "descriptions": [{"lang": "en", "value": "Browser bug"}]}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn first_pass_returns_all_second_pass_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = SeenCache::load(&path);
        let first = collect_new_records(sample_response(), &mut cache);
        assert_eq!(first.len(), 2);
        cache.save().unwrap();

        // Same upstream data, cache persisted between calls
        let mut cache = SeenCache::load(&path);
        let second = collect_new_records(sample_response(), &mut cache);
        assert!(second.is_empty());
    }

    #[test]
    fn records_preserve_upstream_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = SeenCache::load(dir.path().join("cache.json"));
        let records = collect_new_records(sample_response(), &mut cache);
        assert_eq!(records[0].cve_id, "CVE-2026-1111");
        assert_eq!(records[1].cve_id, "CVE-2026-2222");
        assert_eq!(cache.len(), 2);
    }
}
