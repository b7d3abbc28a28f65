// ABOUTME: DOCX generation module for the udl-export library
// ABOUTME: Creates Word documents from differentiated lesson materials

use crate::errors::{ExportError, Result};
use crate::export::{
    export_filename, prepare_output, render_date, render_sections, DocumentBuilder, ExportOptions,
};
use crate::markup::parse_segments;
use crate::sections::{ClassifiedLine, LineKind};
use crate::version::{resolve_content, FormData, Materials, VersionKey};
use log::info;
use quick_xml::escape::escape;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::{write::FileOptions, ZipWriter};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
    <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
    <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#;

// Title 28pt, Heading1 16pt; list styles bind to the two numbering
// definitions below. Sizes are half-points.
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
        <w:name w:val="Normal"/>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Title">
        <w:name w:val="Title"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:spacing w:after="240"/></w:pPr>
        <w:rPr><w:b/><w:sz w:val="56"/></w:rPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Heading1">
        <w:name w:val="heading 1"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:spacing w:before="240" w:after="120"/></w:pPr>
        <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="ListBullet">
        <w:name w:val="List Bullet"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="ListNumber">
        <w:name w:val="List Number"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr><w:numPr><w:numId w:val="2"/></w:numPr></w:pPr>
    </w:style>
</w:styles>"#;

const NUMBERING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:abstractNum w:abstractNumId="0">
        <w:multiLevelType w:val="singleLevel"/>
        <w:lvl w:ilvl="0">
            <w:start w:val="1"/>
            <w:numFmt w:val="bullet"/>
            <w:lvlText w:val="&#8226;"/>
            <w:lvlJc w:val="left"/>
            <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
        </w:lvl>
    </w:abstractNum>
    <w:abstractNum w:abstractNumId="1">
        <w:multiLevelType w:val="singleLevel"/>
        <w:lvl w:ilvl="0">
            <w:start w:val="1"/>
            <w:numFmt w:val="decimal"/>
            <w:lvlText w:val="%1."/>
            <w:lvlJc w:val="left"/>
            <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
        </w:lvl>
    </w:abstractNum>
    <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
    <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;

// US letter with one-inch margins, in twips.
const SECT_PR: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Accumulates `document.xml` body paragraphs.
struct DocxBody {
    xml: String,
}

impl DocxBody {
    fn new() -> Self {
        Self { xml: String::new() }
    }

    fn paragraph(&mut self, ppr: &str, runs: &str) {
        self.xml.push_str("<w:p>");
        if !ppr.is_empty() {
            self.xml.push_str("<w:pPr>");
            self.xml.push_str(ppr);
            self.xml.push_str("</w:pPr>");
        }
        self.xml.push_str(runs);
        self.xml.push_str("</w:p>");
    }

    fn plain_paragraph(&mut self, text: &str) {
        self.paragraph("", &run_xml(text, false, false, None));
    }

    fn spacer(&mut self) {
        self.paragraph("", "");
    }
}

impl DocumentBuilder for DocxBody {
    fn add_heading(&mut self, title: &str) {
        self.paragraph(
            r#"<w:pStyle w:val="Heading1"/>"#,
            &run_xml(title, false, false, None),
        );
    }

    fn add_line(&mut self, line: &ClassifiedLine) {
        let ppr = match line.kind {
            LineKind::Bullet => r#"<w:pStyle w:val="ListBullet"/>"#,
            LineKind::Numbered => r#"<w:pStyle w:val="ListNumber"/>"#,
            LineKind::Plain => "",
        };
        let runs: String = parse_segments(&line.content)
            .iter()
            .map(|seg| run_xml(&seg.text, seg.bold, seg.italic, None))
            .collect();
        self.paragraph(ppr, &runs);
    }
}

/// One `<w:r>` run. `size` is in half-points.
fn run_xml(text: &str, bold: bool, italic: bool, size: Option<u32>) -> String {
    let mut rpr = String::new();
    if bold {
        rpr.push_str("<w:b/>");
    }
    if italic {
        rpr.push_str("<w:i/>");
    }
    if let Some(sz) = size {
        rpr.push_str(&format!(r#"<w:sz w:val="{}"/>"#, sz));
    }
    let rpr = if rpr.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{}</w:rPr>", rpr)
    };
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        rpr,
        escape(text)
    )
}

/// Export a single version to a Word document. Returns the written path.
pub fn export_docx(
    materials: &Materials,
    form: &FormData,
    version: VersionKey,
    save_path: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    info!("Generating DOCX for version {}", version);

    let content = resolve_content(materials, version);
    let mut body = DocxBody::new();

    // Centered title
    body.paragraph(
        r#"<w:pStyle w:val="Title"/><w:jc w:val="center"/>"#,
        &run_xml(
            &format!("UDL Learning Materials: {}", version.display_name()),
            false,
            false,
            None,
        ),
    );

    // Metadata block
    body.plain_paragraph(&format!("Learning Objective: {}", form.objective()));
    body.plain_paragraph(&format!("Grade Level: {}", form.grade()));
    if let Some(subject) = form.subject() {
        body.plain_paragraph(&format!("Subject: {}", subject));
    }
    body.plain_paragraph(&format!("Generated: {}", render_date()));
    body.spacer();

    render_sections(&content, &mut body);

    // Centered italic footer credit
    body.spacer();
    body.paragraph(
        r#"<w:jc w:val="center"/>"#,
        &run_xml(&options.credit_line, false, true, Some(18)),
    );

    let document_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}{}</w:body></w:document>"#,
        body.xml, SECT_PR
    );

    let filename = export_filename(options, version.as_str(), form, "docx");
    let filepath = prepare_output(save_path, &filename)?;

    let file = fs::File::create(&filepath).map_err(ExportError::FileWriteError)?;
    let mut zip = ZipWriter::new(file);

    info!("Creating DOCX structure: [Content_Types].xml");
    zip.start_file("[Content_Types].xml", FileOptions::default())?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    info!("Creating DOCX structure: _rels/.rels");
    zip.start_file("_rels/.rels", FileOptions::default())?;
    zip.write_all(ROOT_RELS.as_bytes())?;

    info!("Creating DOCX structure: word/_rels/document.xml.rels");
    zip.start_file("word/_rels/document.xml.rels", FileOptions::default())?;
    zip.write_all(DOCUMENT_RELS.as_bytes())?;

    info!("Creating DOCX structure: word/styles.xml");
    zip.start_file("word/styles.xml", FileOptions::default())?;
    zip.write_all(STYLES_XML.as_bytes())?;

    info!("Creating DOCX structure: word/numbering.xml");
    zip.start_file("word/numbering.xml", FileOptions::default())?;
    zip.write_all(NUMBERING_XML.as_bytes())?;

    info!("Creating DOCX structure: word/document.xml");
    zip.start_file("word/document.xml", FileOptions::default())?;
    zip.write_all(document_xml.as_bytes())?;

    zip.finish()?;
    info!("DOCX file created at {:?}", filepath);

    Ok(filepath)
}
