use std::io::Read;
use tempfile::TempDir;
use udl_export::export::ExportOptions;
use udl_export::{export_pptx, FormData, Materials, VersionContent, VersionKey};

fn sample_form() -> FormData {
    FormData {
        learning_objective: "Compare fractions".to_string(),
        grade_level: "4th Grade".to_string(),
        ..Default::default()
    }
}

fn materials_with(content: &str) -> Materials {
    let mut materials = Materials::new();
    materials.insert(
        VersionKey::Enriched,
        VersionContent {
            content: content.to_string(),
            ..Default::default()
        },
    );
    materials
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
fn test_export_pptx_slide_count_and_structure() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    // Two sections -> title slide + 2 content slides + credit slide.
    let materials = materials_with("# First\n- one\n# Second\n- two");

    let path = export_pptx(
        &materials,
        &sample_form(),
        VersionKey::Enriched,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    assert!(path.exists(), "PPTX file was not created");

    let file = std::fs::File::open(&path).expect("Failed to open PPTX");
    let archive = zip::ZipArchive::new(file).expect("Failed to read PPTX as ZIP");
    let slide_files: Vec<String> = archive
        .file_names()
        .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
        .map(|name| name.to_string())
        .collect();
    assert_eq!(slide_files.len(), 4, "Expected exactly four slide XML files");

    let presentation = read_zip_entry(&path, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
}

#[test]
fn test_export_pptx_title_and_content_slides() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let materials = materials_with("# Key Ideas\nPlain intro line\n- **bold** point");

    let path = export_pptx(
        &materials,
        &sample_form(),
        VersionKey::Enriched,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    let slide1 = read_zip_entry(&path, "ppt/slides/slide1.xml");
    assert!(slide1.contains("UDL Materials: Enriched (Above Grade Level)"));
    assert!(slide1.contains("Compare fractions"));
    assert!(slide1.contains("Grade: 4th Grade"));

    let slide2 = read_zip_entry(&path, "ppt/slides/slide2.xml");
    assert!(slide2.contains("Key Ideas"));
    assert!(slide2.contains("Plain intro line"));
    // Bullet line is indented one level and carries a bold run.
    assert!(slide2.contains(r#"lvl="1""#));
    assert!(slide2.contains(r#"b="1""#));
    assert!(slide2.contains("<a:t>bold</a:t>"));

    let slide3 = read_zip_entry(&path, "ppt/slides/slide3.xml");
    assert!(slide3.contains("Generated by Assignment Differentiation Wizard"));
}

#[test]
fn test_export_pptx_plain_lines_not_indented() {
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    let materials = materials_with("# Only\nA single plain line");

    let path = export_pptx(
        &materials,
        &sample_form(),
        VersionKey::Enriched,
        output_dir.path(),
        &ExportOptions::default(),
    )
    .expect("Export failed");

    let slide2 = read_zip_entry(&path, "ppt/slides/slide2.xml");
    assert!(!slide2.contains(r#"lvl="1""#));
}
