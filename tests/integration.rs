//! Integration tests for guide assembly

mod common;

use lopdf::Document;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use form_guide::config::{Branding, FormPlan, GuideOptions, TitleSpec};
use form_guide::guide::assemble_from_dir;
use form_guide::pdf::{collect_screenshots, count_pages, extract_metadata, GuideAssembler, GuidePage};
use form_guide::Error;

/// Write `count` page screenshots into `dir`
fn write_screenshots(dir: &Path, count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|n| {
            let path = dir.join(format!("page-{:02}.png", n));
            std::fs::write(&path, common::png_bytes(n)).unwrap();
            path
        })
        .collect()
}

fn page_text(doc: &Document, page_number: u32) -> String {
    let pages = doc.get_pages();
    let content = doc.get_page_content(pages[&page_number]).unwrap();
    String::from_utf8_lossy(&content).to_string()
}

#[test]
fn test_eight_screenshots_make_nine_pages() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("guide.pdf");
    let images = write_screenshots(temp.path(), 8);

    let plan = FormPlan::default();
    let pages = GuidePage::pair(&plan.labels(), images);
    let report = GuideAssembler::new(Branding::default())
        .assemble(&TitleSpec::default(), &pages, &output)
        .unwrap();

    assert_eq!(report.page_count, 9);
    assert_eq!(report.bytes, std::fs::metadata(&output).unwrap().len());
    assert_eq!(count_pages(&output).unwrap(), 9);

    let doc = Document::load(&output).unwrap();
    for n in 1..=8u32 {
        let text = page_text(&doc, n + 1);
        assert!(
            text.contains(&format!("(Page {} of 8) Tj", n)),
            "page {} is missing its indicator",
            n
        );
        assert!(text.contains("/Shot Do"));
    }

    // Title page carries no indicator
    assert!(!page_text(&doc, 1).contains("of 8)"));
}

#[test]
fn test_guide_is_landscape_a4_with_info() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("guide.pdf");
    let images = write_screenshots(temp.path(), 2);

    GuideAssembler::new(Branding::default())
        .assemble(&TitleSpec::default(), &GuidePage::pair(&[], images), &output)
        .unwrap();

    let metadata = extract_metadata(&output).unwrap();
    assert_eq!(metadata.page_count, 3);
    assert!(metadata.is_landscape());
    let (w, h) = metadata.page_size.unwrap();
    assert!((w - 841.89).abs() < 0.01);
    assert!((h - 595.28).abs() < 0.01);

    assert_eq!(
        metadata.title.as_deref(),
        Some("FCS Website Requirements Questionnaire \u{2014} Sample Guide")
    );
    assert_eq!(metadata.fonts, vec!["Helvetica".to_string()]);
    assert_eq!(metadata.author.as_deref(), Some("Miraloyd Global Consult Ltd"));
    assert!(metadata.creation_date.unwrap().starts_with("D:"));
}

#[test]
fn test_missing_screenshot_leaves_blank_page() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("guide.pdf");
    let mut images = write_screenshots(temp.path(), 1);
    images.push(temp.path().join("page-02.png"));

    let report = GuideAssembler::new(Branding::default())
        .assemble(&TitleSpec::default(), &GuidePage::pair(&[], images), &output)
        .unwrap();
    assert_eq!(report.page_count, 3);

    let doc = Document::load(&output).unwrap();
    let blank = page_text(&doc, 3);
    assert!(blank.contains("(Page 2 of 2) Tj"));
    assert!(!blank.contains("Do"));
}

#[test]
fn test_collect_screenshots_orders_by_page() {
    let temp = TempDir::new().unwrap();
    write_screenshots(temp.path(), 10);
    std::fs::write(temp.path().join("page-notes.txt"), "ignored").unwrap();

    let found = collect_screenshots(temp.path()).unwrap();
    assert_eq!(found.len(), 10);
    assert!(found[0].ends_with("page-01.png"));
    assert!(found[9].ends_with("page-10.png"));
}

#[test]
fn test_assemble_from_empty_dir_fails() {
    let temp = TempDir::new().unwrap();
    let opts = GuideOptions::default();
    let result = assemble_from_dir(
        &opts,
        &FormPlan::default(),
        temp.path(),
        &temp.path().join("guide.pdf"),
    );

    assert!(matches!(result, Err(Error::NoScreenshots(_))));
    assert!(!temp.path().join("guide.pdf").exists());
}

#[test]
fn test_assemble_from_dir_uses_plan_labels() {
    let temp = TempDir::new().unwrap();
    let shots = temp.path().join("shots");
    std::fs::create_dir(&shots).unwrap();
    write_screenshots(&shots, 8);
    let output = temp.path().join("out").join("guide.pdf");

    let report = assemble_from_dir(&GuideOptions::default(), &FormPlan::default(), &shots, &output)
        .unwrap();
    assert_eq!(report.page_count, 9);

    let doc = Document::load(&output).unwrap();
    // Header label, em dash encoded as WinAnsi 0x97
    assert!(page_text(&doc, 2).contains("(Sample Guide \\227 01 \\227 School Identity) Tj"));
    assert!(page_text(&doc, 9).contains("Timeline & Final Details) Tj"));
}

#[test]
fn test_assemble_from_dir_with_missing_capture_keeps_page_numbers() {
    let temp = TempDir::new().unwrap();
    let shots = temp.path().join("shots");
    std::fs::create_dir(&shots).unwrap();
    for n in [1, 3] {
        std::fs::write(shots.join(format!("page-{:02}.png", n)), common::png_bytes(n)).unwrap();
    }
    let output = temp.path().join("guide.pdf");

    let report = assemble_from_dir(&GuideOptions::default(), &FormPlan::default(), &shots, &output)
        .unwrap();
    assert_eq!(report.page_count, 3);

    let doc = Document::load(&output).unwrap();
    let third = page_text(&doc, 3);
    assert!(third.contains("(Sample Guide \\227 03 \\227 Website Pages & Features) Tj"));
    assert!(third.contains("(Page 3 of 3) Tj"));
    assert!(!third.contains("Branding"));
}
