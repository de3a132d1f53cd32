//! Flattened text rendering of a normalized report.

use frr_report::{FieldValue, Report};

/// Renders a report as flat share text.
///
/// The first line is the uppercased category (slug hyphens become spaces),
/// the second the RFC 3339 creation timestamp, then one `KEY: VALUE` line
/// per populated leaf. Sentinel-valued fields are omitted entirely: they
/// record a deliberate skip and carry no information worth sharing.
///
/// Nested mappings render as a heading line followed by their own entries;
/// sequence elements are numbered from 1.
pub fn share_text(report: &Report) -> String {
    let mut lines = Vec::new();

    lines.push(report.category.as_str().replace('-', " ").to_uppercase());
    lines.push(report.created_at.to_rfc3339());
    lines.push(String::new());

    flatten(&report.form_data, None, &mut lines);

    // A report whose every field was skipped renders as just the header.
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Wraps share text in a WhatsApp share URL.
pub fn share_link(text: &str) -> String {
    format!("https://wa.me/?text={}", urlencoding::encode(text))
}

fn display_key(key: &str) -> String {
    key.replace(['_', '-'], " ").to_uppercase()
}

fn scalar_line(key: &str, value: &FieldValue) -> Option<String> {
    let rendered = match value {
        FieldValue::Sentinel | FieldValue::Null => return None,
        FieldValue::Text(s) => s.to_uppercase(),
        FieldValue::Bool(b) => b.to_string().to_uppercase(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Sequence(_) | FieldValue::Mapping(_) => return None,
    };
    Some(format!("{}: {}", display_key(key), rendered))
}

fn flatten(value: &FieldValue, heading: Option<&str>, lines: &mut Vec<String>) {
    match value {
        FieldValue::Mapping(entries) => {
            if let Some(heading) = heading {
                lines.push(heading.to_owned());
            }
            for (key, entry) in entries {
                match entry {
                    FieldValue::Mapping(_) => {
                        flatten(entry, Some(&display_key(key)), lines);
                    }
                    FieldValue::Sequence(items) => {
                        for (index, item) in items.iter().enumerate() {
                            let numbered = format!("{} {}", display_key(key), index + 1);
                            match item {
                                FieldValue::Mapping(_) => flatten(item, Some(&numbered), lines),
                                other => {
                                    if let Some(line) = scalar_line(&numbered, other) {
                                        lines.push(line);
                                    }
                                }
                            }
                        }
                    }
                    other => {
                        if let Some(line) = scalar_line(key, other) {
                            lines.push(line);
                        }
                    }
                }
            }
        }
        other => {
            if let Some(line) = scalar_line(heading.unwrap_or(""), other) {
                lines.push(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frr_types::CategorySlug;

    fn report(category: &str, form_data: &str) -> Report {
        Report::new(
            CategorySlug::new(category).unwrap(),
            serde_json::from_str(form_data).expect("should parse form data"),
            "2026-03-14T09:21:45.120Z".parse().unwrap(),
            None,
        )
    }

    #[test]
    fn renders_header_and_uppercased_lines() {
        let text = share_text(&report(
            "animal-on-road",
            r#"{"rodovia":"ms-112","qth":"km 42","sentido":"norte"}"#,
        ));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ANIMAL ON ROAD");
        assert_eq!(lines[1], "2026-03-14T09:21:45.120+00:00");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "RODOVIA: MS-112");
        assert_eq!(lines[4], "QTH: KM 42");
        assert_eq!(lines[5], "SENTIDO: NORTE");
    }

    #[test]
    fn omits_sentinel_valued_fields() {
        let text = share_text(&report(
            "accident",
            r#"{"rodovia":"ms-112","qth":"NILL","sentido":"norte"}"#,
        ));

        assert!(!text.contains("QTH"), "skipped fields should not be shared");
        assert!(text.contains("SENTIDO: NORTE"));
    }

    #[test]
    fn numbers_sequence_elements() {
        let text = share_text(&report(
            "accident",
            r#"{"vehicles":[{"placa":"abc1234","modelo":"NILL"},{"placa":"xyz9876","modelo":"uno"}]}"#,
        ));

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"VEHICLES 1"));
        assert!(lines.contains(&"PLACA: ABC1234"));
        assert!(lines.contains(&"VEHICLES 2"));
        assert!(lines.contains(&"MODELO: UNO"));
        assert!(
            !text.contains("MODELO: NILL"),
            "sentinel leaves inside sequences should be omitted"
        );
    }

    #[test]
    fn renders_nested_sections_with_headings() {
        let text = share_text(&report(
            "cargo-spill",
            r#"{"qth":"km 3","other_info":{"support_vehicle":"vtr-07"}}"#,
        ));

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"OTHER INFO"));
        assert!(lines.contains(&"SUPPORT VEHICLE: VTR-07"));
    }

    #[test]
    fn booleans_and_numbers_render_plainly() {
        let text = share_text(&report(
            "infrastructure-damage",
            r#"{"lanes_blocked":2,"traffic_stopped":true}"#,
        ));

        assert!(text.contains("LANES BLOCKED: 2"));
        assert!(text.contains("TRAFFIC STOPPED: TRUE"));
    }

    #[test]
    fn all_sentinel_report_renders_header_only() {
        let text = share_text(&report("accident", r#"{"qth":"NILL","sentido":"NILL"}"#));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "only category and timestamp should remain");
    }

    #[test]
    fn share_link_percent_encodes_the_text() {
        let link = share_link("RODOVIA: MS-112\nQTH: KM 42");
        assert!(link.starts_with("https://wa.me/?text="));
        assert!(link.contains("RODOVIA%3A%20MS-112%0AQTH"));
        assert!(!link.contains(' '), "spaces must be encoded");
    }
}
