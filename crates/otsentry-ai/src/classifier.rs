use crate::completion::TextCompletion;
use crate::prompt;
use crate::vocabulary;
use otsentry_common::types::{ClassifiedThreat, VulnerabilityRecord};
use std::sync::Arc;
use std::time::Duration;

/// 模型调用默认重试次数上限
const MAX_MODEL_ATTEMPTS: u32 = 3;

/// 单次模型调用默认超时（秒）
const MODEL_ATTEMPT_TIMEOUT_SECS: u64 = 60;

/// 两级 OT/ICS 相关性分类器。
///
/// 每条记录依次经过：词法门（固定词表，未命中直接淘汰，不产生模型调用）
/// → 模型确认（严格 YES/NO 判定，带重试）→ 洞察生成（仅对接受的记录）。
/// 模型回答既无 YES 也无 NO、或重试耗尽时，回退到词法门自身的结论
/// （已通过词法门 ⇒ 接受）。这是有意偏向误报而非静默丢弃的既定策略。
pub struct OtClassifier {
    completion: Arc<dyn TextCompletion>,
    max_attempts: u32,
    attempt_timeout: Duration,
}

impl OtClassifier {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            completion,
            max_attempts: MAX_MODEL_ATTEMPTS,
            attempt_timeout: Duration::from_secs(MODEL_ATTEMPT_TIMEOUT_SECS),
        }
    }

    pub fn with_retry_policy(mut self, max_attempts: u32, attempt_timeout: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.attempt_timeout = attempt_timeout;
        self
    }

    /// 逐条顺序分类，返回判定为 OT 相关的子序列（保持输入顺序）。
    /// 单条记录的任何失败只影响该条，不中断批次。
    pub async fn classify(&self, records: Vec<VulnerabilityRecord>) -> Vec<ClassifiedThreat> {
        let total = records.len();
        tracing::info!(total, "Analyzing CVEs for OT relevance");

        let mut accepted = Vec::new();

        for (idx, record) in records.into_iter().enumerate() {
            tracing::info!(
                cve_id = %record.cve_id,
                progress = format!("{}/{}", idx + 1, total),
                "Analyzing CVE"
            );

            if !self.is_ot_relevant(&record.description).await {
                tracing::info!(cve_id = %record.cve_id, "IT-only, discarded");
                continue;
            }

            tracing::info!(cve_id = %record.cve_id, "OT-relevant");
            let ai_insight = self.generate_impact(&record).await;
            accepted.push(ClassifiedThreat { record, ai_insight });
        }

        tracing::info!(
            accepted = accepted.len(),
            total,
            "OT relevance filtering complete"
        );
        accepted
    }

    /// 两级相关性判定：词法门 + 模型确认。
    async fn is_ot_relevant(&self, description: &str) -> bool {
        // 词法门：无命中直接淘汰，模型调用是昂贵路径
        if !vocabulary::matches_ot_vocabulary(description) {
            tracing::debug!("No OT keywords found, skipping model check");
            return false;
        }

        let relevance_prompt = prompt::build_relevance_prompt(description);

        match self.query_model(&relevance_prompt).await {
            Some(response) => {
                let upper = response.to_uppercase();
                if upper.contains("YES") {
                    tracing::info!("Model confirmed OT relevance");
                    true
                } else if upper.contains("NO") {
                    tracing::info!("Model rejected as IT-only");
                    false
                } else {
                    // 模糊回答：回退到词法门结论（此处必然已通过）
                    tracing::warn!(
                        response = %truncate(&response, 100),
                        "Unclear model response, falling back to lexical verdict"
                    );
                    vocabulary::matches_ot_vocabulary(description)
                }
            }
            None => {
                // 重试耗尽等同于模糊回答
                tracing::warn!("Model attempts exhausted, falling back to lexical verdict");
                vocabulary::matches_ot_vocabulary(description)
            }
        }
    }

    /// 为接受的记录生成工业影响洞察，过短或失败时换用固定兜底文案。
    async fn generate_impact(&self, record: &VulnerabilityRecord) -> String {
        let impact_prompt =
            prompt::build_impact_prompt(&record.cve_id, &record.description, record.cvss_score);

        let insight = self
            .query_model(&impact_prompt)
            .await
            .unwrap_or_default()
            .trim()
            .to_string();

        if insight.len() < prompt::MIN_INSIGHT_LEN {
            tracing::warn!(
                cve_id = %record.cve_id,
                length = insight.len(),
                "Insight too short, substituting canned narrative"
            );
            return prompt::canned_narrative(record.cvss_score).to_string();
        }

        insight
    }

    /// 带重试的模型调用。所有尝试失败时返回 None。
    async fn query_model(&self, prompt_text: &str) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            match self
                .completion
                .complete(prompt_text, self.attempt_timeout)
                .await
            {
                Ok(response) => return Some(response),
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Completion attempt failed"
                    );
                }
            }
        }
        None
    }
}

fn truncate(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
