//! Fixed prompt templates and fallback narratives.
//!
//! 判定与洞察两类 prompt 均为固定模板，便于对模型输出做稳定解析。

/// 接受记录的 AI 洞察最短长度，短于该值时换用固定兜底文案
pub const MIN_INSIGHT_LEN: usize = 50;

/// OT 相关性判定 prompt（要求模型仅回答 YES / NO）
pub fn build_relevance_prompt(description: &str) -> String {
    format!(
        r#"You are a cybersecurity expert specializing in Operational Technology (OT) and Industrial Control Systems (ICS).

Analyze the following CVE description and determine if it is relevant to OT/ICS environments such as factories, power plants, water treatment facilities, or critical infrastructure.

OT/ICS indicators include:
- Industrial control systems: SCADA, PLC, HMI, DCS, RTU
- Industrial vendors: Siemens, Rockwell Automation, Schneider Electric, Allen-Bradley, ABB, Honeywell
- Industrial protocols: Modbus, DNP3, OPC, Profinet, EtherNet/IP, BACnet
- Industrial software: FactoryTalk, TIA Portal, Unity Pro, WinCC

CVE Description:
{description}

Answer with ONLY 'YES' if this CVE directly affects OT/ICS systems, or 'NO' if it only affects standard IT systems (like web browsers, office software, general operating systems).

Answer:"#
    )
}

/// 工业影响分析 prompt（2-3 句），按严重度分档给模型上下文
pub fn build_impact_prompt(cve_id: &str, description: &str, cvss_score: f64) -> String {
    format!(
        r#"You are an OT cybersecurity analyst. Provide a concise 2-3 sentence explanation of why this vulnerability is dangerous for industrial facilities like factories, power plants, or manufacturing sites.

Focus on real-world operational risks such as:
- Production shutdowns or equipment damage
- Safety hazards to workers
- Loss of process control or monitoring
- Environmental or regulatory impacts
- Financial losses from downtime

CVE ID: {cve_id}
Severity: {severity} (CVSS {cvss_score})
Description: {description}

Industrial Impact Analysis (2-3 sentences):"#,
        severity = severity_context(cvss_score),
    )
}

/// 严重度分档标签。阈值与报告阶段的 CRITICAL/HIGH/MEDIUM 一致，
/// 低分段统一归入 LOW（洞察生成不区分 LOW 与 NONE）。
pub fn severity_context(cvss_score: f64) -> &'static str {
    if cvss_score >= 9.0 {
        "CRITICAL severity"
    } else if cvss_score >= 7.0 {
        "HIGH severity"
    } else if cvss_score >= 4.0 {
        "MEDIUM severity"
    } else {
        "LOW severity"
    }
}

/// 模型失败或输出过短时的固定兜底文案，按严重度分档取用，
/// 保证每条接受的记录都带有非空洞察。
pub fn canned_narrative(cvss_score: f64) -> &'static str {
    if cvss_score >= 9.0 {
        "This critical vulnerability could allow attackers to gain complete control of industrial systems, potentially causing severe operational disruption, safety incidents, or equipment damage. Immediate remediation is essential to protect critical infrastructure."
    } else if cvss_score >= 7.0 {
        "This high-severity vulnerability poses significant risk to industrial operations. Exploitation could result in unauthorized access to control systems, process manipulation, or service disruption affecting production and safety."
    } else if cvss_score >= 4.0 {
        "This vulnerability affects industrial control systems and should be addressed through proper patch management and security controls to maintain operational integrity."
    } else {
        "This low-severity vulnerability has limited direct impact on industrial operations, but should still be tracked and patched during routine maintenance windows to reduce overall attack surface."
    }
}
