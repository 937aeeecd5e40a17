use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vterm::error::VtermError;
use vterm::render::pdf::{load_uniform_pages, px_to_mm, PAGE_DPI};
use vterm::render::combine_images_to_pdf;

struct TestContext {
    dir: TempDir,
    images: Vec<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let first = dir.path().join("Projectile.png");
        RgbImage::from_pixel(120, 80, Rgb([255, 0, 0]))
            .save(&first)
            .unwrap();

        // Different size and an alpha channel: must be converted and resized.
        let second = dir.path().join("energy_analysis_combined.png");
        RgbaImage::from_pixel(60, 200, Rgba([0, 0, 255, 128]))
            .save(&second)
            .unwrap();

        let third = dir.path().join("accuracy_report.png");
        RgbImage::from_pixel(120, 80, Rgb([0, 255, 0]))
            .save(&third)
            .unwrap();

        Self {
            dir,
            images: vec![first, second, third],
        }
    }
}

#[test]
fn test_pages_take_first_image_size() {
    let ctx = TestContext::new();
    let pages = load_uniform_pages(&ctx.images).unwrap();

    assert_eq!(pages.len(), 3);
    for page in &pages {
        assert_eq!((page.width(), page.height()), (120, 80));
        assert!(page.as_rgb8().is_some());
    }
}

#[test]
fn test_combine_writes_pdf() {
    let ctx = TestContext::new();
    let output = ctx.dir.path().join("vterm.pdf");

    let summary = combine_images_to_pdf(&ctx.images, &output).unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!((summary.width, summary.height), (120, 80));
    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_combine_rejects_empty_list() {
    let ctx = TestContext::new();
    let none: Vec<PathBuf> = Vec::new();
    let res = combine_images_to_pdf(&none, ctx.dir.path().join("empty.pdf"));
    assert!(matches!(res, Err(VtermError::Validation(_))));
}

#[test]
fn test_combine_reports_missing_image() {
    let ctx = TestContext::new();
    let mut images = ctx.images.clone();
    images.push(ctx.dir.path().join("vt_vs_mass.png"));

    let output = ctx.dir.path().join("vterm.pdf");
    let res = combine_images_to_pdf(&images, &output);
    assert!(matches!(res, Err(VtermError::Image(_))));
    assert!(!output.exists());
}

#[test]
fn test_page_size_at_300_dpi() {
    assert!((px_to_mm(300, PAGE_DPI) - 25.4).abs() < 1e-4);
    assert!((px_to_mm(3000, PAGE_DPI) - 254.0).abs() < 1e-3);
}
