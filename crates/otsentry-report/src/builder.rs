use chrono::Utc;
use otsentry_common::types::{
    ClassifiedThreat, Severity, SeverityBreakdown, ThreatEntry, ThreatReport, REPORT_VERSION,
};
use std::cmp::Ordering;

/// 组装最终报告（纯函数，不做 I/O）。
///
/// 威胁按 CVSS 分数降序排列；同分保持分类阶段的输出顺序（稳定排序）。
/// NONE 级别的威胁保留在列表中，但不计入 severity_breakdown 的任何一项。
pub fn build_report(threats: Vec<ClassifiedThreat>) -> ThreatReport {
    let mut entries: Vec<ThreatEntry> = threats
        .into_iter()
        .map(|t| ThreatEntry {
            severity: Severity::from_score(t.record.cvss_score),
            cve_id: t.record.cve_id,
            cvss_score: t.record.cvss_score,
            description: t.record.description,
            ai_insight: t.ai_insight,
            published_date: t.record.published_date,
            last_modified: t.record.last_modified,
            references: t.record.references,
        })
        .collect();

    // Vec::sort_by 是稳定排序，同分条目保持输入相对顺序
    entries.sort_by(|a, b| {
        b.cvss_score
            .partial_cmp(&a.cvss_score)
            .unwrap_or(Ordering::Equal)
    });

    let mut breakdown = SeverityBreakdown::default();
    for entry in &entries {
        match entry.severity {
            Severity::Critical => breakdown.critical += 1,
            Severity::High => breakdown.high += 1,
            Severity::Medium => breakdown.medium += 1,
            Severity::Low => breakdown.low += 1,
            Severity::None => {}
        }
    }

    let report = ThreatReport {
        generated_at: Utc::now().to_rfc3339(),
        report_version: REPORT_VERSION.to_string(),
        total_threats: entries.len(),
        threats: entries,
        severity_breakdown: breakdown,
    };

    tracing::info!(total = report.total_threats, "Report generated");
    report
}

/// 报告的人类可读摘要（用于周期结束时的日志输出）
pub fn render_summary(report: &ThreatReport) -> String {
    let mut lines = Vec::new();
    let rule = "=".repeat(70);

    lines.push(rule.clone());
    lines.push("OT THREAT INTELLIGENCE REPORT".to_string());
    lines.push(rule.clone());
    lines.push(format!("Generated: {}", report.generated_at));
    lines.push(format!("Total Threats: {}", report.total_threats));

    let stats = &report.severity_breakdown;
    lines.push(String::new());
    lines.push("SEVERITY BREAKDOWN:".to_string());
    lines.push(format!("  Critical: {}", stats.critical));
    lines.push(format!("  High:     {}", stats.high));
    lines.push(format!("  Medium:   {}", stats.medium));
    lines.push(format!("  Low:      {}", stats.low));

    for (idx, threat) in report.threats.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "[{}] {} - {} (CVSS {})",
            idx + 1,
            threat.cve_id,
            threat.severity,
            threat.cvss_score
        ));
        lines.push(format!("    Description: {}", snippet(&threat.description, 150)));
        lines.push(format!("    Impact: {}", snippet(&threat.ai_insight, 200)));
    }

    lines.push(rule);
    lines.join("\n")
}

fn snippet(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use otsentry_common::types::VulnerabilityRecord;

    fn make_threat(cve_id: &str, score: f64) -> ClassifiedThreat {
        ClassifiedThreat {
            record: VulnerabilityRecord {
                cve_id: cve_id.to_string(),
                cvss_score: score,
                cvss_vector: "N/A".to_string(),
                description: format!("description for {cve_id}"),
                published_date: "Unknown".to_string(),
                last_modified: "Unknown".to_string(),
                references: vec![],
            },
            ai_insight: "insight".to_string(),
        }
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let threats = vec![
            make_threat("CVE-LOW", 3.0),
            make_threat("CVE-TIE-FIRST", 9.9),
            make_threat("CVE-TIE-SECOND", 9.9),
            make_threat("CVE-HIGH", 7.0),
        ];

        let report = build_report(threats);
        let ids: Vec<&str> = report.threats.iter().map(|t| t.cve_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["CVE-TIE-FIRST", "CVE-TIE-SECOND", "CVE-HIGH", "CVE-LOW"]
        );
    }

    #[test]
    fn breakdown_counts_exclude_none_severity() {
        let threats = vec![
            make_threat("CVE-1", 9.8),
            make_threat("CVE-2", 7.5),
            make_threat("CVE-3", 5.0),
            make_threat("CVE-4", 0.5),
            make_threat("CVE-5", 0.0),
        ];

        let report = build_report(threats);
        assert_eq!(report.total_threats, 5);
        assert_eq!(
            report.severity_breakdown,
            SeverityBreakdown {
                critical: 1,
                high: 1,
                medium: 1,
                low: 1,
            }
        );
        // NONE-severity entry is still listed
        assert_eq!(report.threats[4].severity, Severity::None);
    }

    #[test]
    fn report_carries_version_and_count() {
        let report = build_report(vec![make_threat("CVE-1", 8.0)]);
        assert_eq!(report.report_version, "1.0");
        assert_eq!(report.total_threats, 1);
        assert!(!report.generated_at.is_empty());
    }

    #[test]
    fn summary_lists_each_threat() {
        let report = build_report(vec![make_threat("CVE-1", 9.8), make_threat("CVE-2", 2.0)]);
        let summary = render_summary(&report);
        assert!(summary.contains("Total Threats: 2"));
        assert!(summary.contains("CVE-1 - CRITICAL"));
        assert!(summary.contains("CVE-2 - LOW"));
    }
}
