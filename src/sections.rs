// ABOUTME: Section splitter and line classifier for generated lesson content
// ABOUTME: Turns a content blob into titled sections and classified body lines

use regex::Regex;
use std::sync::LazyLock;

/// A `#`-style heading: one to three hashes, optional `**` wrapping, title text.
static HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,3}\s*\*{0,2}(.+?)\*{0,2}\s*$").unwrap());

/// A line that is nothing but a `**bold**` span also counts as a heading.
static BOLD_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(.+?)\*\*\s*$").unwrap());

static NUMBERED_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());

/// A titled chunk of content. Derived at render time, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Bullet,
    Numbered,
    Plain,
}

/// One non-blank body line with its list marker stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub content: String,
    pub kind: LineKind,
}

fn heading_title(line: &str) -> Option<String> {
    HEADER_REGEX
        .captures(line)
        .or_else(|| BOLD_LINE_REGEX.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Split a content blob into ordered (title, body) sections.
///
/// Heading lines start a new section; everything else accumulates into the
/// current body, trimmed of surrounding blank lines at section boundaries.
/// Always returns at least one section: content with no headings (or no body
/// under any heading) comes back as a single "Content" section.
pub fn split_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title = String::from("Content");
    let mut current_body: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if let Some(title) = heading_title(line) {
            if !current_body.is_empty() {
                sections.push(Section {
                    title: std::mem::replace(&mut current_title, title),
                    body: current_body.join("\n").trim().to_string(),
                });
                current_body.clear();
            } else {
                current_title = title;
            }
        } else {
            current_body.push(line);
        }
    }

    if !current_body.is_empty() {
        sections.push(Section {
            title: current_title,
            body: current_body.join("\n").trim().to_string(),
        });
    }

    if sections.is_empty() {
        sections.push(Section {
            title: "Content".to_string(),
            body: content.to_string(),
        });
    }
    sections
}

/// Classify one raw body line. Returns `None` for blank lines, which callers
/// skip. List markers are stripped from the returned content; inline markup
/// is left for the segment parser downstream.
pub fn classify_line(raw: &str) -> Option<ClassifiedLine> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(ClassifiedLine {
            content: rest.to_string(),
            kind: LineKind::Bullet,
        });
    }

    if let Some(m) = NUMBERED_REGEX.find(line) {
        return Some(ClassifiedLine {
            content: line[m.end()..].to_string(),
            kind: LineKind::Numbered,
        });
    }

    Some(ClassifiedLine {
        content: line.to_string(),
        kind: LineKind::Plain,
    })
}

/// Classify every non-blank line of a section body, in order.
pub fn classified_lines(body: &str) -> Vec<ClassifiedLine> {
    body.split('\n').filter_map(classify_line).collect()
}
