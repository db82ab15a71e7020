/// OT/ICS 指示词表：厂商名、协议名、系统类别缩写。
/// 词法门只是低成本的预筛，不是最终判定。
pub const OT_KEYWORDS: &[&str] = &[
    "SCADA",
    "PLC",
    "HMI",
    "ICS",
    "OT",
    "Industrial Control",
    "Siemens",
    "Rockwell",
    "Schneider",
    "Allen-Bradley",
    "Modbus",
    "DNP3",
    "OPC",
    "Profinet",
    "EtherNet/IP",
    "RTU",
    "DCS",
    "Programmable Logic Controller",
    "SIMATIC",
    "ControlLogix",
    "CompactLogix",
    "Modicon",
    "Industrial Automation",
    "Process Control",
    "Factory",
    "Manufacturing",
    "Critical Infrastructure",
];

/// 大小写不敏感的子串匹配
pub fn matches_ot_vocabulary(description: &str) -> bool {
    let upper = description.to_uppercase();
    OT_KEYWORDS.iter().any(|kw| upper.contains(&kw.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_case_insensitive() {
        assert!(matches_ot_vocabulary("A flaw in siemens simatic firmware"));
        assert!(matches_ot_vocabulary("Exposed MODBUS endpoint"));
        assert!(matches_ot_vocabulary(
            "Authentication bypass in SCADA software"
        ));
    }

    #[test]
    fn plain_it_descriptions_do_not_match() {
        assert!(!matches_ot_vocabulary(
            "Cross-site scripting flaw in a webmail client."
        ));
        assert!(!matches_ot_vocabulary(""));
    }

    // 词表中的 "OT" 会以子串形式命中 "remote" 这类普通词。
    // 词法门刻意偏向放行，由模型做最终判定。
    #[test]
    fn short_acronyms_match_inside_ordinary_words() {
        assert!(matches_ot_vocabulary(
            "A buffer overflow in a web browser allows remote code execution."
        ));
    }
}
