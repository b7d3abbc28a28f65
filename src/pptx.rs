// ABOUTME: PPTX generation module for the udl-export library
// ABOUTME: Creates PowerPoint presentations from differentiated lesson materials

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

// 16:9 widescreen canvas, 13.333in x 7.5in.
const SLIDE_CX: i64 = 12192000;
const SLIDE_CY: i64 = 6858000;

const EMU_PER_INCH: f64 = 914400.0;

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// One text paragraph inside a slide textbox.
struct SlideParagraph {
    xml: String,
}

fn paragraph_xml(runs: &str, level: u8, bullet: bool, align_center: bool) -> SlideParagraph {
    let mut ppr = String::new();
    if level > 0 {
        ppr.push_str(&format!(r#" lvl="{}""#, level));
    }
    if align_center {
        ppr.push_str(r#" algn="ctr""#);
    }
    let bullet_el = if bullet {
        r#"<a:buChar char="&#8226;"/>"#
    } else {
        ""
    };
    let xml = if runs.is_empty() {
        format!(
            r#"<a:p><a:pPr{}/><a:endParaRPr lang="en-US"/></a:p>"#,
            ppr
        )
    } else {
        format!("<a:p><a:pPr{}>{}</a:pPr>{}</a:p>", ppr, bullet_el, runs)
    };
    SlideParagraph { xml }
}

/// One `<a:r>` run. `size` is in hundredths of a point.
fn run_xml(text: &str, bold: bool, italic: bool, size: u32) -> String {
    let mut attrs = format!(r#" lang="en-US" sz="{}""#, size);
    if bold {
        attrs.push_str(r#" b="1""#);
    }
    if italic {
        attrs.push_str(r#" i="1""#);
    }
    format!(
        "<a:r><a:rPr{} dirty=\"0\"/><a:t>{}</a:t></a:r>",
        attrs,
        escape(text)
    )
}

/// A positioned textbox shape holding a list of paragraphs.
fn textbox_xml(id: u32, x: i64, y: i64, cx: i64, cy: i64, paragraphs: &[SlideParagraph]) -> String {
    let body: String = paragraphs.iter().map(|p| p.xml.as_str()).collect();
    format!(
        r#"<p:sp>
    <p:nvSpPr>
        <p:cNvPr id="{id}" name="TextBox {id}"/>
        <p:cNvSpPr txBox="1"/>
        <p:nvPr/>
    </p:nvSpPr>
    <p:spPr>
        <a:xfrm>
            <a:off x="{x}" y="{y}"/>
            <a:ext cx="{cx}" cy="{cy}"/>
        </a:xfrm>
        <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
    </p:spPr>
    <p:txBody>
        <a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr>
        <a:lstStyle/>
        {body}
    </p:txBody>
</p:sp>"#
    )
}

/// Wrap shapes into a complete slide part.
fn slide_xml(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:cSld>
        <p:spTree>
            <p:nvGrpSpPr>
                <p:cNvPr id="1" name=""/>
                <p:cNvGrpSpPr/>
                <p:nvPr/>
            </p:nvGrpSpPr>
            <p:grpSpPr>
                <a:xfrm>
                    <a:off x="0" y="0"/>
                    <a:ext cx="0" cy="0"/>
                    <a:chOff x="0" y="0"/>
                    <a:chExt cx="0" cy="0"/>
                </a:xfrm>
            </p:grpSpPr>
            {shapes}
        </p:spTree>
    </p:cSld>
    <p:clrMapOvr>
        <a:masterClrMapping/>
    </p:clrMapOvr>
</p:sld>"#
    )
}

/// Accumulates one content slide per section.
struct SlideDeck {
    slides: Vec<String>,
    current_title: Option<String>,
    current_body: Vec<SlideParagraph>,
}

impl SlideDeck {
    fn new() -> Self {
        Self {
            slides: Vec::new(),
            current_title: None,
            current_body: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let Some(title) = self.current_title.take() else {
            return;
        };
        let title_box = textbox_xml(
            2,
            emu(0.6),
            emu(0.4),
            emu(12.1),
            emu(1.0),
            &[paragraph_xml(&run_xml(&title, true, false, 3200), 0, false, false)],
        );
        let body_paragraphs = std::mem::take(&mut self.current_body);
        let body_box = textbox_xml(
            3,
            emu(0.6),
            emu(1.6),
            emu(12.1),
            emu(5.5),
            &body_paragraphs,
        );
        self.slides.push(slide_xml(&format!("{}\n{}", title_box, body_box)));
    }
}

impl DocumentBuilder for SlideDeck {
    fn add_heading(&mut self, title: &str) {
        self.flush();
        self.current_title = Some(title.to_string());
    }

    fn add_line(&mut self, line: &ClassifiedLine) {
        let runs: String = parse_segments(&line.content)
            .iter()
            .map(|seg| run_xml(&seg.text, seg.bold, seg.italic, 1800))
            .collect();
        let indented = matches!(line.kind, LineKind::Bullet | LineKind::Numbered);
        self.current_body.push(paragraph_xml(
            &runs,
            if indented { 1 } else { 0 },
            indented,
            false,
        ));
    }
}

fn title_slide(form: &FormData, version: VersionKey) -> String {
    let title_box = textbox_xml(
        2,
        emu(0.75),
        emu(2.2),
        emu(11.8),
        emu(1.4),
        &[paragraph_xml(
            &run_xml(
                &format!("UDL Materials: {}", version.display_name()),
                true,
                false,
                4000,
            ),
            0,
            false,
            true,
        )],
    );
    let subtitle_box = textbox_xml(
        3,
        emu(0.75),
        emu(3.8),
        emu(11.8),
        emu(2.0),
        &[
            paragraph_xml(&run_xml(form.objective(), false, false, 2000), 0, false, true),
            paragraph_xml("", 0, false, true),
            paragraph_xml(
                &run_xml(&format!("Grade: {}", form.grade()), false, false, 2000),
                0,
                false,
                true,
            ),
        ],
    );
    slide_xml(&format!("{}\n{}", title_box, subtitle_box))
}

fn credit_slide(options: &ExportOptions) -> String {
    let textbox = textbox_xml(
        2,
        emu(1.0),
        emu(3.0),
        emu(11.0),
        emu(1.5),
        &[
            paragraph_xml(&run_xml(&options.credit_line, false, false, 2400), 0, false, true),
            paragraph_xml(&run_xml(&render_date(), false, false, 1800), 0, false, true),
        ],
    );
    slide_xml(&textbox)
}

/// Export a single version to a PowerPoint presentation. Returns the written path.
pub fn export_pptx(
    materials: &Materials,
    form: &FormData,
    version: VersionKey,
    save_path: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    info!("Generating PPTX for version {}", version);

    let content = resolve_content(materials, version);

    // Title slide, one slide per section, then the credit slide.
    let mut slides = vec![title_slide(form, version)];
    let mut deck = SlideDeck::new();
    render_sections(&content, &mut deck);
    deck.flush();
    slides.extend(deck.slides);
    slides.push(credit_slide(options));

    let filename = export_filename(options, version.as_str(), form, "pptx");
    let filepath = prepare_output(save_path, &filename)?;

    let file = fs::File::create(&filepath).map_err(ExportError::FileWriteError)?;
    let mut zip = ZipWriter::new(file);

    info!("Creating PPTX structure: [Content_Types].xml");
    zip.start_file("[Content_Types].xml", FileOptions::default())?;
    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
    {slides}
</Types>"#,
        slides = (1..=slides.len())
            .map(|i| format!(r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#, i))
            .collect::<Vec<String>>()
            .join("\n")
    );
    zip.write_all(content_types.as_bytes())?;

    info!("Creating PPTX structure: _rels/.rels");
    zip.start_file("_rels/.rels", FileOptions::default())?;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;
    zip.write_all(rels.as_bytes())?;

    info!("Creating PPTX structure: docProps/app.xml");
    zip.start_file("docProps/app.xml", FileOptions::default())?;
    let app_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>udl-export</Application>
    <Slides>{}</Slides>
</Properties>"#,
        slides.len()
    );
    zip.write_all(app_xml.as_bytes())?;

    info!("Creating PPTX structure: docProps/core.xml");
    zip.start_file("docProps/core.xml", FileOptions::default())?;
    let core_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:creator>udl-export</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        escape(&format!("UDL Materials: {}", version.display_name())),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
    zip.write_all(core_xml.as_bytes())?;

    info!("Creating PPTX structure: ppt/_rels/presentation.xml.rels");
    zip.start_file("ppt/_rels/presentation.xml.rels", FileOptions::default())?;
    let mut pres_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 1..=slides.len() {
        pres_rels.push_str(&format!(
            r#"    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            i, i
        ));
        pres_rels.push('\n');
    }
    pres_rels.push_str("</Relationships>");
    zip.write_all(pres_rels.as_bytes())?;

    info!("Creating PPTX structure: ppt/presentation.xml");
    zip.start_file("ppt/presentation.xml", FileOptions::default())?;
    let presentation_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}"/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        slide_ids = (1..=slides.len())
            .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i))
            .collect::<Vec<String>>()
            .join("\n"),
        cx = SLIDE_CX,
        cy = SLIDE_CY
    );
    zip.write_all(presentation_xml.as_bytes())?;

    for (i, slide) in slides.iter().enumerate() {
        let slide_num = i + 1;
        info!("Creating slide XML: ppt/slides/slide{}.xml", slide_num);
        zip.start_file(
            format!("ppt/slides/slide{}.xml", slide_num),
            FileOptions::default(),
        )?;
        zip.write_all(slide.as_bytes())?;
    }

    zip.finish()?;
    info!("PPTX file created at {:?}", filepath);

    Ok(filepath)
}
