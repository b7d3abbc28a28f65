// ABOUTME: Inline markup parser for generated lesson content
// ABOUTME: Splits a line into bold/italic segments and substitutes checkbox glyphs

use regex::Regex;
use std::sync::LazyLock;

/// Unicode glyph substituted for `[x]` / `[X]` tokens.
pub const CHECKBOX_CHECKED: &str = "\u{2611}";
/// Unicode glyph substituted for `[]` / `[ ]` tokens.
pub const CHECKBOX_UNCHECKED: &str = "\u{2610}";

static CHECKED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[xX]\]").unwrap());
static UNCHECKED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\s?\]").unwrap());

/// Emphasis spans, longest delimiter first so `***` is not consumed as `**` + `*`.
/// Inner runs are non-greedy; an unmatched delimiter simply fails to match and
/// stays literal text.
static EMPHASIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*|\*(.+?)\*").unwrap());

/// One run of text with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false, false)
    }
}

/// Replace markdown-style checkbox tokens with Unicode checkbox glyphs.
pub fn convert_checkboxes(text: &str) -> String {
    let text = CHECKED_REGEX.replace_all(text, CHECKBOX_CHECKED);
    UNCHECKED_REGEX.replace_all(&text, CHECKBOX_UNCHECKED).into_owned()
}

/// Parse a line into ordered formatting segments.
///
/// Checkbox substitution runs first, then a single left-to-right scan for
/// `***bold italic***`, `**bold**`, and `*italic*` spans. Text outside any
/// span becomes plain segments. Never returns an empty vec: a line with no
/// markup comes back as one plain segment.
pub fn parse_segments(line: &str) -> Vec<Segment> {
    let text = convert_checkboxes(line);

    let mut segments = Vec::new();
    let mut last_end = 0;
    for caps in EMPHASIS_REGEX.captures_iter(&text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last_end {
            segments.push(Segment::plain(&text[last_end..whole.start()]));
        }
        if let Some(inner) = caps.get(1) {
            segments.push(Segment::new(inner.as_str(), true, true));
        } else if let Some(inner) = caps.get(2) {
            segments.push(Segment::new(inner.as_str(), true, false));
        } else if let Some(inner) = caps.get(3) {
            segments.push(Segment::new(inner.as_str(), false, true));
        }
        last_end = whole.end();
    }
    if last_end < text.len() {
        segments.push(Segment::plain(&text[last_end..]));
    }

    if segments.is_empty() {
        segments.push(Segment::plain(text));
    }
    segments
}

/// Remove emphasis markers entirely, keeping the inner text. Checkbox tokens
/// are still substituted. Used where the target format has no rich runs.
pub fn strip_markup(text: &str) -> String {
    let text = convert_checkboxes(text);
    EMPHASIS_REGEX.replace_all(&text, "$1$2$3").into_owned()
}

/// Re-serialize segments into inline `<b>`/`<i>` tags for renderers that
/// consume tagged text instead of structured runs.
pub fn segments_to_inline_tags(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match (seg.bold, seg.italic) {
            (true, true) => {
                out.push_str("<b><i>");
                out.push_str(&seg.text);
                out.push_str("</i></b>");
            }
            (true, false) => {
                out.push_str("<b>");
                out.push_str(&seg.text);
                out.push_str("</b>");
            }
            (false, true) => {
                out.push_str("<i>");
                out.push_str(&seg.text);
                out.push_str("</i>");
            }
            (false, false) => out.push_str(&seg.text),
        }
    }
    out
}
