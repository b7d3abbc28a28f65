// ABOUTME: XLSX generation module for the udl-export library
// ABOUTME: Creates an all-versions Excel workbook with an overview sheet

use crate::errors::{ExportError, Result};
use crate::export::{export_filename, prepare_output, render_datetime, ExportOptions};
use crate::markup::strip_markup;
use crate::sections::split_sections;
use crate::version::{resolve_content, FormData, Materials, VersionKey};
use log::info;
use quick_xml::escape::escape;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::{write::FileOptions, ZipWriter};

// Cell format indices into the cellXfs table in STYLES_XML.
const XF_DEFAULT: u32 = 0;
const XF_BOLD: u32 = 1;
const XF_TITLE: u32 = 2;
const XF_SHEET_TITLE: u32 = 3;
const XF_HEADER: u32 = 4;
const XF_WRAP_TOP: u32 = 5;
const XF_BOLD_TOP: u32 = 6;

// Accent fill matches the wizard theme color.
const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="5">
        <font><sz val="11"/><name val="Calibri"/></font>
        <font><b/><sz val="11"/><name val="Calibri"/></font>
        <font><b/><sz val="16"/><name val="Calibri"/></font>
        <font><b/><sz val="14"/><name val="Calibri"/></font>
        <font><b/><sz val="12"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font>
    </fonts>
    <fills count="3">
        <fill><patternFill patternType="none"/></fill>
        <fill><patternFill patternType="gray125"/></fill>
        <fill><patternFill patternType="solid"><fgColor rgb="FF6B46C1"/><bgColor indexed="64"/></patternFill></fill>
    </fills>
    <borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
    <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
    <cellXfs count="7">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
        <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
        <xf numFmtId="0" fontId="2" fillId="0" borderId="0" xfId="0" applyFont="1"/>
        <xf numFmtId="0" fontId="3" fillId="0" borderId="0" xfId="0" applyFont="1"/>
        <xf numFmtId="0" fontId="4" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1"/>
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0" applyAlignment="1"><alignment wrapText="1" vertical="top"/></xf>
        <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1" applyAlignment="1"><alignment vertical="top"/></xf>
    </cellXfs>
    <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
</styleSheet>"#;

/// Truncate a sheet name to the 31-character limit the format imposes.
pub fn truncate_sheet_name(name: &str) -> String {
    name.chars().take(31).collect()
}

/// Accumulates one worksheet: column widths, cells, merged ranges.
struct Worksheet {
    cols: Vec<(u32, f64)>,
    rows: Vec<(u32, Vec<String>)>,
    merges: Vec<String>,
}

impl Worksheet {
    fn new() -> Self {
        Self {
            cols: Vec::new(),
            rows: Vec::new(),
            merges: Vec::new(),
        }
    }

    fn column_width(&mut self, col: u32, width: f64) {
        self.cols.push((col, width));
    }

    fn merge(&mut self, range: &str) {
        self.merges.push(range.to_string());
    }

    fn cell(&mut self, col: u32, row: u32, text: &str, style: u32) {
        let cell_ref = format!("{}{}", column_letter(col), row);
        let xml = format!(
            r#"<c r="{}" s="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            cell_ref,
            style,
            escape(text)
        );
        match self.rows.iter_mut().find(|(r, _)| *r == row) {
            Some((_, cells)) => cells.push(xml),
            None => self.rows.push((row, vec![xml])),
        }
    }

    fn to_xml(&self) -> String {
        let mut out = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        if !self.cols.is_empty() {
            out.push_str("<cols>");
            for (col, width) in &self.cols {
                out.push_str(&format!(
                    r#"<col min="{0}" max="{0}" width="{1}" customWidth="1"/>"#,
                    col, width
                ));
            }
            out.push_str("</cols>");
        }
        out.push_str("<sheetData>");
        let mut rows: Vec<&(u32, Vec<String>)> = self.rows.iter().collect();
        rows.sort_by_key(|(r, _)| *r);
        for (row, cells) in rows {
            out.push_str(&format!(r#"<row r="{}">"#, row));
            for cell in cells {
                out.push_str(cell);
            }
            out.push_str("</row>");
        }
        out.push_str("</sheetData>");
        if !self.merges.is_empty() {
            out.push_str(&format!(r#"<mergeCells count="{}">"#, self.merges.len()));
            for merge in &self.merges {
                out.push_str(&format!(r#"<mergeCell ref="{}"/>"#, merge));
            }
            out.push_str("</mergeCells>");
        }
        out.push_str("</worksheet>");
        out
    }
}

fn column_letter(col: u32) -> char {
    // Only the first few columns are ever used.
    (b'A' + (col - 1) as u8) as char
}

fn overview_sheet(form: &FormData, options: &ExportOptions) -> Worksheet {
    let mut ws = Worksheet::new();
    ws.column_width(1, 20.0);
    ws.column_width(2, 60.0);

    ws.cell(
        1,
        1,
        &format!("{} Differentiation Wizard - Generated Materials", options.artifact_prefix),
        XF_TITLE,
    );
    ws.merge("A1:D1");

    ws.cell(1, 3, "Learning Objective:", XF_BOLD);
    ws.cell(2, 3, form.objective(), XF_DEFAULT);
    ws.cell(1, 4, "Grade Level:", XF_BOLD);
    ws.cell(2, 4, form.grade(), XF_DEFAULT);
    ws.cell(1, 5, "Subject:", XF_BOLD);
    ws.cell(2, 5, form.subject().unwrap_or("N/A"), XF_DEFAULT);
    ws.cell(1, 6, "Generated:", XF_BOLD);
    ws.cell(2, 6, &render_datetime(), XF_DEFAULT);

    ws
}

fn version_sheet(materials: &Materials, version: VersionKey) -> Worksheet {
    let mut ws = Worksheet::new();
    ws.column_width(1, 25.0);
    ws.column_width(2, 80.0);

    ws.cell(1, 1, version.display_name(), XF_SHEET_TITLE);
    ws.merge("A1:C1");

    ws.cell(1, 3, "Section", XF_HEADER);
    ws.cell(2, 3, "Content", XF_HEADER);

    let content = resolve_content(materials, version);
    let mut row = 4;
    for section in split_sections(&content) {
        ws.cell(1, row, &section.title, XF_BOLD_TOP);
        // Plain text only: strip emphasis markers, substitute checkboxes.
        ws.cell(2, row, &strip_markup(&section.body), XF_WRAP_TOP);
        row += 1;
    }

    ws
}

/// Export all five versions to a single Excel workbook. Returns the written path.
pub fn export_all_xlsx(
    materials: &Materials,
    form: &FormData,
    save_path: &Path,
    options: &ExportOptions,
) -> Result<PathBuf> {
    info!("Generating XLSX workbook for all versions");

    let mut sheets: Vec<(String, Worksheet)> =
        vec![("Overview".to_string(), overview_sheet(form, options))];
    for version in VersionKey::ALL {
        sheets.push((
            truncate_sheet_name(version.as_str()),
            version_sheet(materials, version),
        ));
    }

    let filename = export_filename(options, "AllVersions", form, "xlsx");
    let filepath = prepare_output(save_path, &filename)?;

    let file = fs::File::create(&filepath).map_err(ExportError::FileWriteError)?;
    let mut zip = ZipWriter::new(file);

    info!("Creating XLSX structure: [Content_Types].xml");
    zip.start_file("[Content_Types].xml", FileOptions::default())?;
    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    {sheets}
</Types>"#,
        sheets = (1..=sheets.len())
            .map(|i| format!(r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#, i))
            .collect::<Vec<String>>()
            .join("\n")
    );
    zip.write_all(content_types.as_bytes())?;

    info!("Creating XLSX structure: _rels/.rels");
    zip.start_file("_rels/.rels", FileOptions::default())?;
    let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;
    zip.write_all(rels.as_bytes())?;

    info!("Creating XLSX structure: xl/workbook.xml");
    zip.start_file("xl/workbook.xml", FileOptions::default())?;
    let workbook_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
{sheets}
    </sheets>
</workbook>"#,
        sheets = sheets
            .iter()
            .enumerate()
            .map(|(i, (name, _))| format!(
                r#"        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                i + 1,
                i + 1
            ))
            .collect::<Vec<String>>()
            .join("\n")
    );
    zip.write_all(workbook_xml.as_bytes())?;

    info!("Creating XLSX structure: xl/_rels/workbook.xml.rels");
    zip.start_file("xl/_rels/workbook.xml.rels", FileOptions::default())?;
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
    );
    for i in 1..=sheets.len() {
        workbook_rels.push_str(&format!(
            r#"    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i, i
        ));
        workbook_rels.push('\n');
    }
    workbook_rels.push_str(&format!(
        r#"    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        sheets.len() + 1
    ));
    workbook_rels.push_str("\n</Relationships>");
    zip.write_all(workbook_rels.as_bytes())?;

    info!("Creating XLSX structure: xl/styles.xml");
    zip.start_file("xl/styles.xml", FileOptions::default())?;
    zip.write_all(STYLES_XML.as_bytes())?;

    for (i, (name, ws)) in sheets.iter().enumerate() {
        let sheet_num = i + 1;
        info!("Creating worksheet {} ({})", sheet_num, name);
        zip.start_file(
            format!("xl/worksheets/sheet{}.xml", sheet_num),
            FileOptions::default(),
        )?;
        zip.write_all(ws.to_xml().as_bytes())?;
    }

    zip.finish()?;
    info!("XLSX file created at {:?}", filepath);

    Ok(filepath)
}
