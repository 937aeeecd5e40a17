use crate::error::{VtResult, VtermError};
use printpdf::image_crate::{self as image, imageops::FilterType, DynamicImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_PDF: &str = "vterm.pdf";

/// Page order of the full report.
pub const DEFAULT_PAGES: [&str; 6] = [
    "Projectile.png",
    "vterm_plots.png",
    "energy_analysis_combined.png",
    "projectile_speed_terminal_velocity.png",
    "vt_vs_mass.png",
    "accuracy_report.png",
];

/// Images are placed at this resolution; page size follows from it.
pub const PAGE_DPI: f32 = 300.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CombineSummary {
    pub pages: usize,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

pub fn px_to_mm(px: u32, dpi: f32) -> f32 {
    px as f32 * 25.4 / dpi
}

fn open_rgb(path: &Path) -> VtResult<DynamicImage> {
    let img = image::open(path)
        .map_err(|e| VtermError::Image(format!("{}: {}", path.display(), e)))?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Loads the images in order, converted to RGB, with every image after the
/// first resized to the first one's pixel size.
pub fn load_uniform_pages<P: AsRef<Path>>(images: &[P]) -> VtResult<Vec<DynamicImage>> {
    let Some((first, rest)) = images.split_first() else {
        return Err(VtermError::Validation(
            "no images given to combine".to_string(),
        ));
    };

    let first = open_rgb(first.as_ref())?;
    let (width, height) = (first.width(), first.height());

    let mut pages = Vec::with_capacity(images.len());
    pages.push(first);
    for path in rest {
        let img = open_rgb(path.as_ref())?;
        if img.width() != width || img.height() != height {
            debug!(
                "Resizing {} from {}x{} to {}x{}",
                path.as_ref().display(),
                img.width(),
                img.height(),
                width,
                height
            );
            pages.push(img.resize_exact(width, height, FilterType::Lanczos3));
        } else {
            pages.push(img);
        }
    }
    Ok(pages)
}

/// Writes one page per image into a single PDF, all pages the size of the
/// first image.
pub fn combine_images_to_pdf<P: AsRef<Path>, Q: AsRef<Path>>(
    images: &[P],
    output: Q,
) -> VtResult<CombineSummary> {
    let pages = load_uniform_pages(images)?;
    let (width, height) = (pages[0].width(), pages[0].height());
    let (w_mm, h_mm) = (Mm(px_to_mm(width, PAGE_DPI)), Mm(px_to_mm(height, PAGE_DPI)));

    let (doc, first_page, first_layer) = PdfDocument::new("vterm", w_mm, h_mm, "Layer 1");

    for (i, page) in pages.iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(w_mm, h_mm, "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);
        Image::from_dynamic_image(page).add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(PAGE_DPI),
                ..Default::default()
            },
        );
    }

    let output = output.as_ref().to_path_buf();
    let mut writer = BufWriter::new(File::create(&output)?);
    doc.save(&mut writer)
        .map_err(|e| VtermError::Pdf(e.to_string()))?;

    info!(
        "📄 Combined {} PNGs into {} with uniform page size ({}x{})",
        pages.len(),
        output.display(),
        width,
        height
    );

    Ok(CombineSummary {
        pages: pages.len(),
        width,
        height,
        output,
    })
}
