use super::*;
use crate::export::ExportOptions;
use crate::markup::{segments_to_inline_tags, CHECKBOX_CHECKED, CHECKBOX_UNCHECKED};
use crate::utils::{objective_stub, sanitize_filename};
use crate::xlsx::truncate_sheet_name;

fn form(objective: &str, grade: &str) -> FormData {
    FormData {
        learning_objective: objective.to_string(),
        grade_level: grade.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_parse_segments_plain_text() {
    let segments = parse_segments("just plain text");
    assert_eq!(segments, vec![Segment::plain("just plain text")]);
}

#[test]
fn test_parse_segments_never_empty() {
    let segments = parse_segments("");
    assert_eq!(segments, vec![Segment::plain("")]);
}

#[test]
fn test_parse_segments_bold() {
    let segments = parse_segments("before **bold** after");
    assert_eq!(
        segments,
        vec![
            Segment::plain("before "),
            Segment::new("bold", true, false),
            Segment::plain(" after"),
        ]
    );
}

#[test]
fn test_parse_segments_italic_and_bold_italic() {
    let segments = parse_segments("*i* and ***both***");
    assert_eq!(
        segments,
        vec![
            Segment::new("i", false, true),
            Segment::plain(" and "),
            Segment::new("both", true, true),
        ]
    );
}

#[test]
fn test_parse_segments_unmatched_asterisk_stays_literal() {
    let segments = parse_segments("a * b");
    assert_eq!(segments, vec![Segment::plain("a * b")]);
}

#[test]
fn test_parse_segments_is_deterministic() {
    let line = "**x** then *y* then [x]";
    assert_eq!(parse_segments(line), parse_segments(line));
}

#[test]
fn test_convert_checkboxes() {
    let converted = convert_checkboxes("Tasks: [x] done [ ] pending");
    assert_eq!(
        converted,
        format!("Tasks: {} done {} pending", CHECKBOX_CHECKED, CHECKBOX_UNCHECKED)
    );
}

#[test]
fn test_convert_checkboxes_variants() {
    assert_eq!(convert_checkboxes("[X]"), CHECKBOX_CHECKED);
    assert_eq!(convert_checkboxes("[]"), CHECKBOX_UNCHECKED);
}

#[test]
fn test_strip_markup() {
    assert_eq!(strip_markup("**bold** and *italic*"), "bold and italic");
    assert_eq!(
        strip_markup("- [x] task"),
        format!("- {} task", CHECKBOX_CHECKED)
    );
}

#[test]
fn test_segments_to_inline_tags() {
    let tagged = segments_to_inline_tags(&parse_segments("a **b** ***c***"));
    assert_eq!(tagged, "a <b>b</b> <b><i>c</i></b>");
}

#[test]
fn test_split_sections_empty_input() {
    let sections = split_sections("");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Content");
    assert_eq!(sections[0].body, "");
}

#[test]
fn test_split_sections_heading_and_body() {
    let sections = split_sections("# Intro\nHello there\nSecond line");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Intro");
    assert_eq!(sections[0].body, "Hello there\nSecond line");
}

#[test]
fn test_split_sections_bold_line_is_heading() {
    let sections = split_sections("**Warm Up**\nDo ten jumping jacks");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Warm Up");
    assert_eq!(sections[0].body, "Do ten jumping jacks");
}

#[test]
fn test_split_sections_multiple_preserve_order() {
    let sections = split_sections("# One\na\n\n## Two\nb\n### **Three**\nc");
    let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
    assert_eq!(sections[0].body, "a");
    assert_eq!(sections[1].body, "b");
    assert_eq!(sections[2].body, "c");
}

#[test]
fn test_split_sections_heading_only_falls_back() {
    // A lone heading accumulates no body, so the splitter falls back to a
    // single Content section holding the raw input.
    let sections = split_sections("# Title");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Content");
    assert_eq!(sections[0].body, "# Title");
}

#[test]
fn test_classify_line_bullet() {
    let line = classify_line("- Buy milk").unwrap();
    assert_eq!(line.kind, LineKind::Bullet);
    assert_eq!(line.content, "Buy milk");

    let line = classify_line("* Starred item").unwrap();
    assert_eq!(line.kind, LineKind::Bullet);
    assert_eq!(line.content, "Starred item");
}

#[test]
fn test_classify_line_numbered() {
    let line = classify_line("2. Go home").unwrap();
    assert_eq!(line.kind, LineKind::Numbered);
    assert_eq!(line.content, "Go home");
}

#[test]
fn test_classify_line_plain_and_blank() {
    let line = classify_line("  just words  ").unwrap();
    assert_eq!(line.kind, LineKind::Plain);
    assert_eq!(line.content, "just words");

    assert!(classify_line("   ").is_none());
    assert!(classify_line("").is_none());
}

#[test]
fn test_pipeline_round_trip() {
    let content = "# Intro\nHello **world**\n- [x] done\n- [ ] todo";
    let parsed = split_sections(content);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].title, "Intro");

    let lines = sections::classified_lines(&parsed[0].body);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].kind, LineKind::Plain);
    assert_eq!(lines[1].kind, LineKind::Bullet);
    assert_eq!(lines[2].kind, LineKind::Bullet);

    let hello = parse_segments(&lines[0].content);
    assert_eq!(
        hello,
        vec![Segment::plain("Hello "), Segment::new("world", true, false)]
    );

    let done = parse_segments(&lines[1].content);
    assert_eq!(done.len(), 1);
    assert!(!done[0].bold);
    assert_eq!(done[0].text, format!("{} done", CHECKBOX_CHECKED));

    let todo = parse_segments(&lines[2].content);
    assert_eq!(todo[0].text, format!("{} todo", CHECKBOX_UNCHECKED));
}

#[test]
fn test_sanitize_filename_strips_forbidden_characters() {
    assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
}

#[test]
fn test_sanitize_filename_truncates() {
    let long = "x".repeat(80);
    assert_eq!(sanitize_filename(&long).chars().count(), 50);
}

#[test]
fn test_export_filename_convention() {
    let form = form(
        "Identify main idea: a very long objective text exceeding thirty chars",
        "5th Grade",
    );
    let filename =
        export_filename(&ExportOptions::default(), "on_level", &form, "docx");
    assert!(filename.starts_with("UDL_on_level_"));
    assert!(filename.ends_with(".docx"));
    // Objective truncated to 30 chars before sanitization; the colon is stripped.
    assert_eq!(filename, "UDL_on_level_Identify main idea a very lon.docx");
    for c in ['<', '>', ':', '"', '/', '\\', '|', '?', '*'] {
        assert!(!filename.contains(c));
    }
}

#[test]
fn test_objective_stub_falls_back_to_materials() {
    assert_eq!(objective_stub(&form("", "K")), "materials");
}

#[test]
fn test_sheet_name_truncation() {
    let synthetic = "a_very_long_synthetic_version_key_name74";
    assert_eq!(synthetic.len(), 40);
    let truncated = truncate_sheet_name(synthetic);
    assert_eq!(truncated.chars().count(), 31);
    assert!(synthetic.starts_with(&truncated));
    // Real keys are untouched.
    assert_eq!(truncate_sheet_name("visual_heavy"), "visual_heavy");
}

#[test]
fn test_version_key_round_trip() {
    for key in VersionKey::ALL {
        assert_eq!(VersionKey::parse(key.as_str()), Some(key));
    }
    assert_eq!(VersionKey::parse("bogus"), None);
    assert_eq!(
        VersionKey::OnLevel.display_name(),
        "On-Level (Grade Appropriate)"
    );
}

#[test]
fn test_resolved_content_placeholder_and_error() {
    let empty = VersionContent::default();
    assert_eq!(empty.resolved_content(), "No content generated");

    let failed = VersionContent {
        error: Some("model unavailable".to_string()),
        ..Default::default()
    };
    assert_eq!(failed.resolved_content(), "Error: model unavailable");

    let ok = VersionContent {
        content: "# Title\nbody".to_string(),
        ..Default::default()
    };
    assert_eq!(ok.resolved_content(), "# Title\nbody");
}
