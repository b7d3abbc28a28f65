// ABOUTME: PDF generation module for the udl-export library
// ABOUTME: Hand-written PDF 1.4 output using the base-14 Helvetica family

use crate::errors::{ExportError, Result};
use crate::export::{
    export_filename, prepare_output, render_date, render_sections, DocumentBuilder, ExportOptions,
};
use crate::markup::{parse_segments, segments_to_inline_tags};
use crate::sections::{ClassifiedLine, LineKind};
use crate::version::{resolve_content, FormData, Materials, VersionKey};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

// US letter, one-inch margins, coordinates in points.
const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 72.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// One styled run of text on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StyledRun {
    text: String,
    bold: bool,
    italic: bool,
}

impl StyledRun {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }
}

fn font_name(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (false, false) => "F1",
        (true, false) => "F2",
        (false, true) => "F3",
        (true, true) => "F4",
    }
}

/// Parse `<b>`/`<i>` inline tags back into styled runs. Unknown text,
/// including stray angle brackets, passes through literally.
fn parse_inline_tags(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut bold = 0i32;
    let mut italic = 0i32;
    let mut buf = String::new();
    let mut rest = text;

    let flush = |buf: &mut String, runs: &mut Vec<StyledRun>, bold: i32, italic: i32| {
        if !buf.is_empty() {
            runs.push(StyledRun {
                text: std::mem::take(buf),
                bold: bold > 0,
                italic: italic > 0,
            });
        }
    };

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix("<b>") {
            flush(&mut buf, &mut runs, bold, italic);
            bold += 1;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("</b>") {
            flush(&mut buf, &mut runs, bold, italic);
            bold = (bold - 1).max(0);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("<i>") {
            flush(&mut buf, &mut runs, bold, italic);
            italic += 1;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("</i>") {
            flush(&mut buf, &mut runs, bold, italic);
            italic = (italic - 1).max(0);
            rest = stripped;
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                buf.push(c);
                rest = chars.as_str();
            }
        }
    }
    flush(&mut buf, &mut runs, bold, italic);
    runs
}

/// Escape text into a PDF literal string with WinAnsi bytes. The base-14
/// fonts carry no glyph for the checkbox characters, so those fall back to
/// bracket notation in this renderer only.
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\u{2610}' => out.push_str("[ ]"),
            '\u{2611}' => out.push_str("[X]"),
            '\u{2022}' => out.push_str("\\225"),
            '\u{2018}' => out.push_str("\\221"),
            '\u{2019}' => out.push_str("\\222"),
            '\u{201C}' => out.push_str("\\223"),
            '\u{201D}' => out.push_str("\\224"),
            '\u{2013}' => out.push_str("\\226"),
            '\u{2014}' => out.push_str("\\227"),
            '\u{2026}' => out.push_str("\\205"),
            c if (' '..='~').contains(&c) => out.push(c),
            c if (0xA0..0x100).contains(&(c as u32)) => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => out.push('?'),
        }
    }
    out
}

/// Rough width estimate for the Helvetica family. Half an em per character
/// is close enough for wrapping body text.
fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.5
}

fn row_width(row: &[StyledRun], size: f64) -> f64 {
    row.iter().map(|r| text_width(&r.text, size)).sum()
}

/// Word-wrap runs into rows that fit the content width, preserving styling
/// across breaks. Overlong single words are placed alone and allowed to
/// overflow.
fn wrap_runs(runs: &[StyledRun], size: f64, max_width: f64) -> Vec<Vec<StyledRun>> {
    let mut rows: Vec<Vec<StyledRun>> = Vec::new();
    let mut row: Vec<StyledRun> = Vec::new();
    let mut width = 0.0;

    for run in runs {
        for word in run.text.split_inclusive(' ') {
            let w = text_width(word, size);
            if width + w > max_width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                width = 0.0;
                if word.trim().is_empty() {
                    continue;
                }
            }
            match row.last_mut() {
                Some(last) if last.bold == run.bold && last.italic == run.italic => {
                    last.text.push_str(word);
                }
                _ => row.push(StyledRun {
                    text: word.to_string(),
                    bold: run.bold,
                    italic: run.italic,
                }),
            }
            width += w;
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Accumulates page content streams with a downward-moving cursor.
struct PdfFlow {
    pages: Vec<String>,
    ops: String,
    y: f64,
    list_index: usize,
}

impl PdfFlow {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: String::new(),
            y: PAGE_HEIGHT - MARGIN,
            list_index: 0,
        }
    }

    fn spacer(&mut self, points: f64) {
        self.y -= points;
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Write one logical line of runs, wrapping and paginating as needed.
    fn write_line(
        &mut self,
        runs: &[StyledRun],
        size: f64,
        leading: f64,
        align: Align,
        space_after: f64,
    ) {
        let rows = wrap_runs(runs, size, CONTENT_WIDTH);
        if rows.is_empty() {
            self.y -= leading;
        }
        for row in rows {
            if self.y - leading < MARGIN {
                self.break_page();
            }
            self.y -= leading;
            let x = match align {
                Align::Left => MARGIN,
                Align::Center => MARGIN + ((CONTENT_WIDTH - row_width(&row, size)) / 2.0).max(0.0),
            };
            self.ops.push_str("BT\n");
            self.ops.push_str(&format!("{:.2} {:.2} Td\n", x, self.y));
            for run in &row {
                self.ops.push_str(&format!(
                    "/{} {} Tf ({}) Tj\n",
                    font_name(run.bold, run.italic),
                    size,
                    escape_pdf_text(&run.text)
                ));
            }
            self.ops.push_str("ET\n");
        }
        self.y -= space_after;
    }

    fn finish(mut self) -> Vec<String> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }
}

impl DocumentBuilder for PdfFlow {
    fn add_heading(&mut self, title: &str) {
        self.list_index = 0;
        self.spacer(15.0);
        self.write_line(
            &[StyledRun {
                text: title.to_string(),
                bold: true,
                italic: false,
            }],
            14.0,
            17.0,
            Align::Left,
            10.0,
        );
    }

    fn add_line(&mut self, line: &ClassifiedLine) {
        // Segments are re-serialized through inline tags here rather than
        // consumed directly; this renderer's layout works on tagged text.
        let tagged = segments_to_inline_tags(&parse_segments(&line.content));
        let mut runs = parse_inline_tags(&tagged);
        match line.kind {
            LineKind::Bullet => runs.insert(0, StyledRun::plain("\u{2022} ")),
            LineKind::Numbered => {
                self.list_index += 1;
                runs.insert(0, StyledRun::plain(format!("{}. ", self.list_index)));
            }
            LineKind::Plain => {}
        }
        self.write_line(&runs, 11.0, 14.0, Align::Left, 6.0);
    }
}

/// Serialize content streams into a complete PDF file.
fn build_pdf(pages: &[String]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets: Vec<usize> = Vec::new();
    let append_obj = |out: &mut Vec<u8>, offsets: &mut Vec<usize>, num: usize, body: &str| {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", num, body).as_bytes());
    };

    let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 7 + 2 * i)).collect();

    append_obj(&mut out, &mut offsets, 1, "<< /Type /Catalog /Pages 2 0 R >>");
    append_obj(
        &mut out,
        &mut offsets,
        2,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );

    let fonts = [
        "Helvetica",
        "Helvetica-Bold",
        "Helvetica-Oblique",
        "Helvetica-BoldOblique",
    ];
    for (i, base) in fonts.iter().enumerate() {
        append_obj(
            &mut out,
            &mut offsets,
            3 + i,
            &format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                base
            ),
        );
    }

    for (i, ops) in pages.iter().enumerate() {
        let page_num = 7 + 2 * i;
        let content_num = page_num + 1;
        append_obj(
            &mut out,
            &mut offsets,
            page_num,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R /F4 6 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_num
            ),
        );
        append_obj(
            &mut out,
            &mut offsets,
            content_num,
            &format!("<< /Length {} >>\nstream\n{}endstream", ops.len(), ops),
        );
    }

    let xref_offset = out.len();
    let total = offsets.len() + 1;
    out.extend_from_slice(format!("xref\n0 {}\n", total).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            total, xref_offset
        )
        .as_bytes(),
    );
    out
}

/// Export a single version to a paginated PDF. Returns the written path.
pub fn export_pdf(
    materials: &Materials,
    form: &FormData,
    version: VersionKey,
    save_path: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    info!("Generating PDF for version {}", version);

    let content = resolve_content(materials, version);
    let mut flow = PdfFlow::new();

    // Centered title
    flow.write_line(
        &[StyledRun {
            text: format!("UDL Learning Materials: {}", version.display_name()),
            bold: true,
            italic: false,
        }],
        18.0,
        22.0,
        Align::Center,
        0.0,
    );
    flow.spacer(12.0);

    // Metadata block with bold labels
    let mut metadata = vec![
        format!("<b>Learning Objective:</b> {}", form.objective()),
        format!("<b>Grade Level:</b> {}", form.grade()),
    ];
    if let Some(subject) = form.subject() {
        metadata.push(format!("<b>Subject:</b> {}", subject));
    }
    metadata.push(format!("<b>Generated:</b> {}", render_date()));
    for line in &metadata {
        let runs = parse_inline_tags(line);
        flow.write_line(&runs, 11.0, 14.0, Align::Left, 6.0);
    }
    flow.spacer(20.0);

    render_sections(&content, &mut flow);

    // Centered italic footer
    flow.spacer(30.0);
    flow.write_line(
        &[StyledRun {
            text: options.credit_line.clone(),
            bold: false,
            italic: true,
        }],
        9.0,
        11.0,
        Align::Center,
        0.0,
    );

    let pdf_bytes = build_pdf(&flow.finish());

    let filename = export_filename(options, version.as_str(), form, "pdf");
    let filepath = prepare_output(save_path, &filename)?;
    fs::write(&filepath, pdf_bytes).map_err(ExportError::FileWriteError)?;

    info!("PDF file created at {:?}", filepath);
    Ok(filepath)
}
