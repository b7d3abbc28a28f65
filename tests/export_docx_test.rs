use std::io::Read;
use tempfile::TempDir;
use udl_export::export::ExportOptions;
use udl_export::{export_docx, FormData, Materials, VersionContent, VersionKey};

fn sample_materials() -> Materials {
    let mut materials = Materials::new();
    materials.insert(
        VersionKey::OnLevel,
        VersionContent {
            content: "# Warm Up\nHello **world**\n- [x] done\n- [ ] todo\n1. First step"
                .to_string(),
            name: VersionKey::OnLevel.display_name().to_string(),
            generated_at: "2026-08-28T10:00:00".to_string(),
            error: None,
        },
    );
    materials
}

fn sample_form() -> FormData {
    FormData {
        learning_objective: "Identify the main idea".to_string(),
        grade_level: "5th Grade".to_string(),
        subject: Some("Reading".to_string()),
        ..Default::default()
    }
}

fn read_zip_entry(path: &std::path::Path, name: &str) -> String {
    let file = std::fs::File::open(path).expect("Failed to open archive");
    let mut archive = zip::ZipArchive::new(file).expect("Failed to read archive as ZIP");
    let mut entry = archive.by_name(name).expect("Missing archive entry");
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .expect("Failed to read archive entry");
    content
}

#[test]
fn test_export_docx_structure_and_content() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let path = export_docx(
        &sample_materials(),
        &sample_form(),
        VersionKey::OnLevel,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    assert!(path.exists(), "DOCX file was not created");
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "UDL_on_level_Identify the main idea.docx"
    );

    let file = std::fs::File::open(&path).expect("Failed to open DOCX");
    let archive = zip::ZipArchive::new(file).expect("Failed to read DOCX as ZIP");
    let names: Vec<&str> = archive.file_names().collect();
    for expected in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/styles.xml",
        "word/numbering.xml",
    ] {
        assert!(names.contains(&expected), "Missing {}", expected);
    }

    let document = read_zip_entry(&path, "word/document.xml");

    // Title, metadata, section heading
    assert!(document.contains("UDL Learning Materials: On-Level (Grade Appropriate)"));
    assert!(document.contains("Learning Objective: Identify the main idea"));
    assert!(document.contains("Subject: Reading"));
    assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
    assert!(document.contains("Warm Up"));

    // Bold run for **world**
    assert!(document.contains(r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">world</w:t></w:r>"#));

    // List paragraphs and checkbox glyphs
    assert!(document.contains(r#"<w:pStyle w:val="ListBullet"/>"#));
    assert!(document.contains(r#"<w:pStyle w:val="ListNumber"/>"#));
    assert!(document.contains('\u{2611}'));
    assert!(document.contains('\u{2610}'));

    // Footer credit
    assert!(document.contains("Generated by Assignment Differentiation Wizard"));
}

#[test]
fn test_export_docx_missing_version_uses_placeholder() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let path = export_docx(
        &Materials::new(),
        &sample_form(),
        VersionKey::Scaffolded,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    let document = read_zip_entry(&path, "word/document.xml");
    assert!(document.contains("No content generated"));
}

#[test]
fn test_export_docx_error_version_renders_error_line() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let mut materials = Materials::new();
    materials.insert(
        VersionKey::Simplified,
        VersionContent {
            error: Some("generation timed out".to_string()),
            ..Default::default()
        },
    );

    let path = export_docx(
        &materials,
        &sample_form(),
        VersionKey::Simplified,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    let document = read_zip_entry(&path, "word/document.xml");
    assert!(document.contains("Error: generation timed out"));
}

#[test]
fn test_export_docx_escapes_xml_characters() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let mut materials = Materials::new();
    materials.insert(
        VersionKey::OnLevel,
        VersionContent {
            content: "# A & B\nless < more > done".to_string(),
            ..Default::default()
        },
    );

    let path = export_docx(
        &materials,
        &sample_form(),
        VersionKey::OnLevel,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    let document = read_zip_entry(&path, "word/document.xml");
    assert!(document.contains("A &amp; B"));
    assert!(document.contains("less &lt; more &gt; done"));
}
