use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::{Path, PathBuf};

/// Where an image-to-image conversion writes: `<dir>/<input stem>.<ext>`,
/// with `dir` being the requested output directory or the input's own
/// directory when none was given.
pub fn sibling_output_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> Result<PathBuf> {
    let stem = input.file_stem().context("Input file has no name")?;
    let dir = match output_dir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new(".")),
    };
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(extension);
    Ok(dir.join(file_name))
}

/// Encode `img` to `dest`. JPEG has no alpha channel, so the image is
/// flattened to 8-bit RGB first.
pub fn save_image(img: DynamicImage, dest: &Path, format: ImageFormat) -> Result<()> {
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.into_rgb8()),
        _ => img,
    };
    img.save_with_format(dest, format)
        .with_context(|| format!("Failed to write image: {}", dest.display()))
}

pub fn convert_image(input: &Path, dest: &Path, format: ImageFormat) -> Result<()> {
    // Decoder comes from the content; the extension may be wrong
    let img = ImageReader::open(input)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("Failed to open image: {}", input.display()))?
        .decode()
        .with_context(|| format!("Failed to decode image: {}", input.display()))?;
    log::debug!(
        "Decoded {}x{} image from {}",
        img.width(),
        img.height(),
        input.display()
    );

    if dest == input {
        log::warn!("Overwriting input file {}", input.display());
    }

    save_image(img, dest, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn output_defaults_to_input_directory() {
        let path = sibling_output_path(Path::new("/photos/cat.png"), None, "jpg").unwrap();
        assert_eq!(path, PathBuf::from("/photos/cat.jpg"));
    }

    #[test]
    fn output_dir_overrides_input_directory() {
        let path =
            sibling_output_path(Path::new("/photos/cat.png"), Some(Path::new("/out")), "png").unwrap();
        assert_eq!(path, PathBuf::from("/out/cat.png"));
    }

    #[test]
    fn only_the_last_extension_is_replaced() {
        let path = sibling_output_path(Path::new("scans/page.v2.tiff"), None, "png").unwrap();
        assert_eq!(path, PathBuf::from("scans/page.v2.png"));
    }

    #[test]
    fn bare_file_name_stays_in_current_directory() {
        let path = sibling_output_path(Path::new("cat.png"), None, "jpg").unwrap();
        assert_eq!(path, PathBuf::from("cat.jpg"));
    }

    #[test]
    fn rgba_png_converts_to_jpeg_with_same_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("overlay.png");
        let mut img = RgbaImage::new(7, 5);
        img.put_pixel(3, 2, Rgba([255, 0, 0, 128]));
        img.save(&input).unwrap();

        let dest = dir.path().join("overlay.jpg");
        convert_image(&input, &dest, ImageFormat::Jpeg).unwrap();

        let reopened = image::open(&dest).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (7, 5));
        assert_eq!(image::ImageFormat::from_path(&dest).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn misnamed_image_is_decoded_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        image::RgbImage::new(6, 4)
            .save_with_format(&input, ImageFormat::Png)
            .unwrap();

        let dest = dir.path().join("scan.png");
        convert_image(&input, &dest, ImageFormat::Png).unwrap();

        let reopened = image::open(&dest).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (6, 4));
    }

    #[test]
    fn corrupt_image_reports_the_input_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let err = convert_image(&input, &dir.path().join("broken.jpg"), ImageFormat::Jpeg)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("broken.png"));
    }
}
