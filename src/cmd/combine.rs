use clap::Args;
use std::path::PathBuf;
use vterm::error::VtResult;
use vterm::render::combine_images_to_pdf;
use vterm::render::pdf::{DEFAULT_PAGES, DEFAULT_PDF};

#[derive(Args, Debug, Clone)]
pub struct CombineArgs {
    #[arg(short, long, default_value = DEFAULT_PDF)]
    pub output: PathBuf,

    /// PNG files in page order. The first one sets the page size.
    pub images: Vec<PathBuf>,
}

pub fn run(args: CombineArgs) -> VtResult<()> {
    let images: Vec<PathBuf> = if args.images.is_empty() {
        DEFAULT_PAGES.iter().map(PathBuf::from).collect()
    } else {
        args.images
    };

    let summary = combine_images_to_pdf(&images, &args.output)?;
    println!(
        "Combined {} PNGs into {} with uniform page size ({}x{})",
        summary.pages,
        summary.output.display(),
        summary.width,
        summary.height
    );
    Ok(())
}
