use formfill_dom::parse_html;
use formfill_engine::protocol::{EntryType, ExecutionSettings};
use formfill_engine::{CandidateOptions, PickMode, PickerError, PickerSession};

const PAGE: &str = r#"
<form id="search-form">
  <div id="search-wrapper">
    <div><textarea aria-label="Search" name="q"></textarea></div>
  </div>
  <div class="actions">
    <button type="submit"><span class="icon">Go</span></button>
  </div>
</form>"#;

#[test]
fn test_pick_input_then_button() {
    let doc = parse_html(PAGE).unwrap();
    let wrapper = doc.query_selector("#search-wrapper").unwrap().unwrap();
    let icon = doc.query_selector("span.icon").unwrap().unwrap();

    let mut session = PickerSession::new(CandidateOptions::default());
    assert_eq!(session.mode(), PickMode::Input);

    let candidates = session.pick(&wrapper);
    assert_eq!(candidates[0].tag, "textarea");
    assert_eq!(session.selected_index(), Some(0));
    assert_eq!(session.input().unwrap().selector, "textarea");

    session.switch_to_button_mode().unwrap();
    assert_eq!(session.mode(), PickMode::Button);
    assert!(session.candidates().is_empty());

    session.pick(&icon);
    assert_eq!(session.selected().unwrap().tag, "button");
    assert_eq!(session.button().unwrap().selector, "button");

    let entry = session
        .confirm("https://www.Example.com/search?q=x", "rust lang")
        .unwrap();
    assert_eq!(entry.entry_type, EntryType::InputAndButton);
    assert_eq!(entry.url_match.domain, "www.example.com");
    assert!(entry.url_match.path_prefix.is_none());
    assert!(entry.id.is_empty());

    let input = entry.input.unwrap();
    assert_eq!(input.value, "rust lang");
    assert_eq!(input.selector_meta.used_attributes, vec!["name", "aria-label"]);
    assert_eq!(entry.button.unwrap().selector, "button");
}

#[test]
fn test_select_other_candidate() {
    let doc = parse_html(PAGE).unwrap();
    let wrapper = doc.query_selector("#search-wrapper").unwrap().unwrap();

    let mut session = PickerSession::new(CandidateOptions::default());
    let len = session.pick(&wrapper).len();

    session.select_candidate(1).unwrap();
    assert_eq!(session.input().unwrap().selector, "div#search-wrapper");

    let chosen = session.selected().unwrap().selector_result();
    assert_eq!(session.input().unwrap().selector_meta, chosen.meta());
    assert_eq!(session.input().unwrap().selector_meta.used_attributes, vec!["id"]);

    assert_eq!(
        session.select_candidate(len),
        Err(PickerError::OutOfRange { index: len, len })
    );
    assert_eq!(session.selected_index(), Some(1));
}

#[test]
fn test_button_mode_needs_input() {
    let mut session = PickerSession::<formfill_dom::ElementRef<'_>>::new(CandidateOptions::default());
    assert_eq!(session.switch_to_button_mode(), Err(PickerError::NoInput));
    assert_eq!(session.mode(), PickMode::Input);
}

#[test]
fn test_confirm_without_picks() {
    let session = PickerSession::<formfill_dom::ElementRef<'_>>::new(CandidateOptions::default())
        .with_execution(ExecutionSettings {
            wait_timeout: 100,
            ..ExecutionSettings::default()
        });

    let entry = session.confirm("https://example.com/", "").unwrap();
    assert_eq!(entry.entry_type, EntryType::StrategyOnly);
    assert_eq!(entry.execution.wait_timeout, 100);
}

#[test]
fn test_confirm_rejects_hostless_url() {
    let session = PickerSession::<formfill_dom::ElementRef<'_>>::new(CandidateOptions::default());
    assert!(matches!(
        session.confirm("data:text/plain,hello", "x"),
        Err(PickerError::InvalidUrl(_))
    ));
}
