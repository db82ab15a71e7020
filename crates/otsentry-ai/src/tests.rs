use crate::classifier::OtClassifier;
use crate::completion::{CompletionError, Result, TextCompletion};
use crate::prompt;
use async_trait::async_trait;
use otsentry_common::types::VulnerabilityRecord;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted completion stub: returns queued responses in order and counts
/// every invocation.
enum Script {
    Reply(&'static str),
    Timeout,
    Unavailable,
}

struct ScriptedCompletion {
    script: Mutex<VecDeque<Script>>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    fn new(script: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    fn provider(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "test"
    }

    async fn complete(&self, _prompt: &str, _timeout: Duration) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Script::Reply(text)) => Ok(text.to_string()),
            Some(Script::Timeout) => Err(CompletionError::Timeout),
            Some(Script::Unavailable) => {
                Err(CompletionError::Unavailable("connection refused".into()))
            }
            None => panic!("completion stub called more times than scripted"),
        }
    }
}

fn make_record(cve_id: &str, score: f64, description: &str) -> VulnerabilityRecord {
    VulnerabilityRecord {
        cve_id: cve_id.to_string(),
        cvss_score: score,
        cvss_vector: "N/A".to_string(),
        description: description.to_string(),
        published_date: "2026-01-26T08:15:00.000".to_string(),
        last_modified: "2026-01-26T08:15:00.000".to_string(),
        references: vec![],
    }
}

const LONG_INSIGHT: &str = "Attackers could halt the production line by overwriting ladder logic on exposed controllers, causing extended downtime and potential equipment damage.";

#[tokio::test]
async fn lexical_reject_never_invokes_model() {
    let completion = ScriptedCompletion::new(vec![]);
    let classifier = OtClassifier::new(completion.clone());

    let records = vec![make_record(
        "CVE-2026-0001",
        7.5,
        // No vocabulary term (beware: "OT" substring-matches words like "remote")
        "Cross-site scripting flaw in a webmail client.",
    )];

    let accepted = classifier.classify(records).await;
    assert!(accepted.is_empty());
    assert_eq!(completion.call_count(), 0);
}

#[tokio::test]
async fn model_yes_accepts_with_generated_insight() {
    let completion = ScriptedCompletion::new(vec![
        Script::Reply("YES, this is an OT issue."),
        Script::Reply(LONG_INSIGHT),
    ]);
    let classifier = OtClassifier::new(completion.clone());

    let records = vec![make_record(
        "CVE-2026-0002",
        9.8,
        "A critical vulnerability in Siemens SIMATIC S7-1200 PLC allows remote code execution through the Profinet protocol.",
    )];

    let accepted = classifier.classify(records).await;
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].ai_insight, LONG_INSIGHT);
    assert_eq!(completion.call_count(), 2);
}

#[tokio::test]
async fn model_no_rejects_lexically_passed_record() {
    let completion = ScriptedCompletion::new(vec![Script::Reply("NO")]);
    let classifier = OtClassifier::new(completion.clone());

    // "remote" passes the lexical gate via the "OT" acronym
    let records = vec![make_record(
        "CVE-2026-0003",
        7.5,
        "A buffer overflow vulnerability in Google Chrome browser allows remote code execution.",
    )];

    let accepted = classifier.classify(records).await;
    assert!(accepted.is_empty());
    assert_eq!(completion.call_count(), 1);
}

#[tokio::test]
async fn ambiguous_response_defaults_to_acceptance() {
    let completion = ScriptedCompletion::new(vec![
        // Neither YES nor NO anywhere in the reply (watch out: "not" contains "NO")
        Script::Reply("Hmm, that is unclear from the available details."),
        Script::Reply(LONG_INSIGHT),
    ]);
    let classifier = OtClassifier::new(completion.clone());

    let records = vec![make_record(
        "CVE-2026-0004",
        8.1,
        "Authentication bypass in Rockwell Automation FactoryTalk View SCADA software.",
    )];

    let accepted = classifier.classify(records).await;
    assert_eq!(accepted.len(), 1, "ambiguous answers must accept, not drop");
}

#[tokio::test]
async fn exhausted_retries_fall_back_to_lexical_acceptance() {
    let completion = ScriptedCompletion::new(vec![
        Script::Timeout,
        Script::Unavailable,
        Script::Timeout,
        // Insight call also fails across all attempts -> canned narrative
        Script::Timeout,
        Script::Timeout,
        Script::Timeout,
    ]);
    let classifier =
        OtClassifier::new(completion.clone()).with_retry_policy(3, Duration::from_millis(10));

    let records = vec![make_record(
        "CVE-2026-0005",
        9.1,
        "Hardcoded credentials in Schneider Electric Modicon PLC firmware.",
    )];

    let accepted = classifier.classify(records).await;
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].ai_insight, prompt::canned_narrative(9.1));
    assert_eq!(completion.call_count(), 6);
}

#[tokio::test]
async fn short_insight_replaced_by_canned_critical_narrative() {
    let completion = ScriptedCompletion::new(vec![
        Script::Reply("YES"),
        Script::Reply("Bad."),
    ]);
    let classifier = OtClassifier::new(completion.clone());

    let records = vec![make_record(
        "CVE-2026-0006",
        9.8,
        "Remote code execution in SIMATIC WinCC HMI panels.",
    )];

    let accepted = classifier.classify(records).await;
    assert_eq!(accepted.len(), 1);
    assert_eq!(
        accepted[0].ai_insight,
        "This critical vulnerability could allow attackers to gain complete control of industrial systems, potentially causing severe operational disruption, safety incidents, or equipment damage. Immediate remediation is essential to protect critical infrastructure."
    );
}

#[tokio::test]
async fn output_preserves_input_order_of_accepted_records() {
    let completion = ScriptedCompletion::new(vec![
        Script::Reply("YES"),
        Script::Reply(LONG_INSIGHT),
        Script::Reply("NO"),
        Script::Reply("YES"),
        Script::Reply(LONG_INSIGHT),
    ]);
    let classifier = OtClassifier::new(completion.clone());

    let records = vec![
        make_record("CVE-A", 5.0, "Modbus gateway flaw"),
        make_record("CVE-B", 9.0, "Chrome browser remote exploit"),
        make_record("CVE-C", 7.0, "DNP3 outstation crash"),
    ];

    let accepted = classifier.classify(records).await;
    let ids: Vec<&str> = accepted.iter().map(|t| t.record.cve_id.as_str()).collect();
    assert_eq!(ids, vec!["CVE-A", "CVE-C"]);
}
