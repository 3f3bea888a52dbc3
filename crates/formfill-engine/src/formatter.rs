use crate::candidates::CandidateSummary;
use crate::config::schema::SecurityConfig;
use crate::replay::ReplayStep;
use formfill_common::protocol::{Entry, EntryType, SelectorResult, Strategy};

/// Candidate list as the picker panel shows it, best first.
pub fn format_candidates(candidates: &[CandidateSummary]) -> String {
    if candidates.is_empty() {
        return "No candidates.".to_string();
    }

    let mut output = String::new();
    for (idx, c) in candidates.iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        let semantic = if c.is_semantic { " [semantic]" } else { "" };
        output.push_str(&format!("[{}] <{}>{} score={}", idx, c.tag, semantic, c.score));
        output.push_str(&format!("\n    {}", c.human_readable));
        output.push_str(&format!("\n    {}", c.selector));
    }
    output
}

pub fn format_selector_result(result: &SelectorResult) -> String {
    let mut output = format!("Selector: {}\nDescription: {}", result.selector, result.human_readable);
    if !result.used_attributes.is_empty() {
        output.push_str(&format!("\nAttributes: {}", result.used_attributes.join(", ")));
    }
    output
}

pub fn format_entry(entry: &Entry, security: &SecurityConfig) -> String {
    let status = if entry.enabled { "on" } else { "off" };
    let mut output = format!(
        "{} [{}] {} {}",
        entry.id,
        status,
        entry.url_match.domain,
        entry_type_label(entry.entry_type)
    );
    if let Some(prefix) = &entry.url_match.path_prefix {
        output.push_str(&format!(" path={}", prefix));
    }
    if let Some(strategy) = entry.strategy {
        output.push_str(&format!(" strategy={}", strategy_label(strategy)));
    }

    if let Some(input) = &entry.input {
        let value = mask_sensitive(&input.value, &input.selector, security);
        output.push_str(&format!("\n  input  {} = \"{}\"", input.selector, value));
    }
    if let Some(button) = &entry.button {
        output.push_str(&format!("\n  button {}", button.selector));
    }
    output
}

pub fn format_plan(steps: &[ReplayStep], security: &SecurityConfig) -> String {
    steps
        .iter()
        .map(|step| match step {
            ReplayStep::Sleep(d) => format!("sleep {}ms", d.as_millis()),
            ReplayStep::Fill { selector, value } => format!(
                "fill {} = \"{}\"",
                selector,
                mask_sensitive(value, selector, security)
            ),
            ReplayStep::Click { selector } => format!("click {}", selector),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hide `value` when `field` names something sensitive and redaction is on.
pub fn mask_sensitive(value: &str, field: &str, security: &SecurityConfig) -> String {
    if security.redact_in_logs && security.is_sensitive(field) {
        "••••••••".to_string()
    } else {
        value.to_string()
    }
}

fn entry_type_label(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::InputAndButton => "input_and_button",
        EntryType::ButtonOnly => "button_only",
        EntryType::StrategyOnly => "strategy_only",
    }
}

fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::FillNoClick => "fill_no_click",
        Strategy::ClickOnly => "click_only",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formfill_common::protocol::{InputTarget, SelectorMeta, UrlMatch};
    use std::time::Duration;

    #[test]
    fn candidate_rows() {
        let rows = vec![CandidateSummary {
            tag: "button".into(),
            score: 150,
            is_semantic: true,
            selector: "button".into(),
            human_readable: "'Go' button".into(),
            used_attributes: vec!["textContent".into()],
        }];
        assert_eq!(
            format_candidates(&rows),
            "[0] <button> [semantic] score=150\n    'Go' button\n    button"
        );
        assert_eq!(format_candidates(&[]), "No candidates.");
    }

    #[test]
    fn masks_password_values() {
        let security = SecurityConfig::default();
        let mut entry = Entry::new(UrlMatch::domain("a.com"), EntryType::InputAndButton);
        entry.id = "e1".into();
        entry.input = Some(InputTarget {
            selector: "input[name=\"password\"]".into(),
            selector_meta: SelectorMeta::default(),
            value: "hunter2".into(),
        });

        let text = format_entry(&entry, &security);
        assert!(text.starts_with("e1 [on] a.com input_and_button"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn plan_lines() {
        let steps = vec![
            ReplayStep::Sleep(Duration::from_millis(500)),
            ReplayStep::Fill {
                selector: "input".into(),
                value: "x".into(),
            },
            ReplayStep::Click {
                selector: "button".into(),
            },
        ];
        assert_eq!(
            format_plan(&steps, &SecurityConfig::default()),
            "sleep 500ms\nfill input = \"x\"\nclick button"
        );
    }
}
