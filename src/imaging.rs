//! Image operations — pure Rust, zero system dependencies.
//!
//! The process stage needs exactly two encodes per gallery photo:
//!
//! | Operation | How |
//! |---|---|
//! | **Grid thumbnail** | `resize_to_fill` center-crop to the configured aspect, Lanczos3 |
//! | **Lightbox display** | bounded fit to the configured long edge, Lanczos3, never upscaled |
//!
//! Both encode to JPEG through the `image` crate, so the binary works on
//! any machine without ImageMagick or FFmpeg installed. Dimension math is
//! kept in pure functions so it can be unit tested without encoding
//! anything.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Pixel size of a grid thumbnail's short edge.
pub const THUMBNAIL_SHORT_EDGE: u32 = 400;

/// Output dimensions for a thumbnail crop of the given aspect ratio.
///
/// The short edge of the output is fixed; the long edge follows the
/// aspect. `[4, 3]` with a 400px short edge gives 533x400.
pub fn thumbnail_dimensions(aspect: (u32, u32), short_edge: u32) -> (u32, u32) {
    let (aw, ah) = aspect;
    if aw >= ah {
        ((short_edge * aw + ah / 2) / ah, short_edge)
    } else {
        (short_edge, (short_edge * ah + aw / 2) / aw)
    }
}

/// Output dimensions for a display image bounded by `max_edge`.
///
/// Keeps the source aspect; sources already within the bound pass
/// through unscaled (upscaling a festival snapshot only grows the file).
pub fn display_dimensions(original: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (w, h) = original;
    let long = w.max(h);
    if long == 0 || long <= max_edge {
        return original;
    }
    let scale = |edge: u32| -> u32 {
        let scaled = edge as u64 * max_edge as u64 / long as u64;
        scaled.max(1) as u32
    };
    (scale(w), scale(h))
}

/// Decode a source image fully (the discovery probe only reads headers;
/// encoding needs pixels).
pub fn load(source: &Path) -> Result<DynamicImage, ImagingError> {
    Ok(image::open(source)?)
}

/// Encode a center-cropped thumbnail to `dest` as JPEG.
pub fn encode_thumbnail(
    img: &DynamicImage,
    dest: &Path,
    aspect: (u32, u32),
    quality: u8,
) -> Result<(), ImagingError> {
    let (w, h) = thumbnail_dimensions(aspect, THUMBNAIL_SHORT_EDGE);
    let thumb = img.resize_to_fill(w, h, FilterType::Lanczos3);
    write_jpeg(&thumb, dest, quality)
}

/// Encode a bounded display image to `dest` as JPEG.
pub fn encode_display(
    img: &DynamicImage,
    dest: &Path,
    max_edge: u32,
    quality: u8,
) -> Result<(), ImagingError> {
    let (w, h) = display_dimensions((img.width(), img.height()), max_edge);
    let display = if (w, h) == (img.width(), img.height()) {
        img.clone()
    } else {
        img.resize(w, h, FilterType::Lanczos3)
    };
    write_jpeg(&display, dest, quality)
}

fn write_jpeg(img: &DynamicImage, dest: &Path, quality: u8) -> Result<(), ImagingError> {
    // JPEG has no alpha; flatten whatever the decoder produced
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let file = File::create(dest)?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    rgb.write_with_encoder(encoder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn thumbnail_dims_landscape_aspect() {
        assert_eq!(thumbnail_dimensions((4, 3), 400), (533, 400));
        assert_eq!(thumbnail_dimensions((1, 1), 400), (400, 400));
    }

    #[test]
    fn thumbnail_dims_portrait_aspect() {
        assert_eq!(thumbnail_dimensions((4, 5), 400), (400, 500));
    }

    #[test]
    fn display_dims_bound_the_long_edge() {
        assert_eq!(display_dimensions((3200, 2400), 1600), (1600, 1200));
        assert_eq!(display_dimensions((2400, 3200), 1600), (1200, 1600));
    }

    #[test]
    fn display_dims_never_upscale() {
        assert_eq!(display_dimensions((800, 600), 1600), (800, 600));
        assert_eq!(display_dimensions((1600, 1200), 1600), (1600, 1200));
    }

    #[test]
    fn display_dims_degenerate_input() {
        assert_eq!(display_dimensions((0, 0), 1600), (0, 0));
        assert_eq!(display_dimensions((100_000, 1), 1600), (1600, 1));
    }

    #[test]
    fn thumbnail_encodes_to_cropped_jpeg() {
        let tmp = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(1000, 800));
        let dest = tmp.path().join("thumb.jpg");

        encode_thumbnail(&img, &dest, (1, 1), 85).unwrap();

        let written = image::image_dimensions(&dest).unwrap();
        assert_eq!(written, (400, 400));
    }

    #[test]
    fn display_encodes_within_bound() {
        let tmp = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(2000, 1000));
        let dest = tmp.path().join("display.jpg");

        encode_display(&img, &dest, 1600, 85).unwrap();

        let written = image::image_dimensions(&dest).unwrap();
        assert_eq!(written, (1600, 800));
    }

    #[test]
    fn alpha_sources_are_flattened() {
        let tmp = TempDir::new().unwrap();
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(640, 480));
        let dest = tmp.path().join("flat.jpg");

        encode_display(&img, &dest, 1600, 85).unwrap();
        assert!(image::image_dimensions(&dest).is_ok());
    }
}
