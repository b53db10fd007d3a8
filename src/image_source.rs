//! Image loading: decode a file into an RGBA raster the playback loop can walk.
//!
//! ## Rust concepts
//! - A small trait (`PixelSource`) so playback does not care where pixels come from
//! - `map_err` to attach the file path to the decoder's error

use crate::Color;
use crate::error::{Error, Result};
use image::{ImageError, ImageReader, RgbaImage};
use std::path::Path;

/// A rectangular grid of RGBA pixels addressed by `(x, y)`.
pub trait PixelSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Color of the pixel at column `x`, row `y`.
    ///
    /// Coordinates outside `0..width` × `0..height` are an
    /// [`Error::IndexOutOfBounds`].
    fn pixel_at(&self, x: u32, y: u32) -> Result<Color>;

    fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

/// A decoded image held as 8-bit RGBA.
pub struct RgbaImageSource {
    image: RgbaImage,
}

impl RgbaImageSource {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl PixelSource for RgbaImageSource {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Result<Color> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Color::from(*p))
            .ok_or(Error::IndexOutOfBounds {
                x,
                y,
                width: self.image.width(),
                height: self.image.height(),
            })
    }
}

/// Result of [`decode`]: the RGBA raster plus the channel count of the file
/// before it was expanded to RGBA.
pub struct DecodedImage {
    pub source: RgbaImageSource,
    pub channels: u8,
}

/// Decode the image at `path`, whatever its format, into RGBA.
pub fn decode(path: &Path) -> Result<DecodedImage> {
    let decode_error = |source| Error::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;

    let channels = img.color().channel_count();
    Ok(DecodedImage {
        source: RgbaImageSource::new(img.to_rgba8()),
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn two_by_one() -> RgbaImageSource {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        img.put_pixel(1, 0, Rgba([40, 50, 60, 0]));
        RgbaImageSource::new(img)
    }

    #[test]
    fn pixel_at_returns_rgba() {
        let source = two_by_one();
        assert_eq!(source.width(), 2);
        assert_eq!(source.height(), 1);
        assert_eq!(source.pixel_count(), 2);
        assert_eq!(source.pixel_at(0, 0).unwrap(), Color::new(10, 20, 30, 255));
        assert_eq!(source.pixel_at(1, 0).unwrap(), Color::new(40, 50, 60, 0));
    }

    #[test]
    fn pixel_at_out_of_range_is_an_error() {
        let source = two_by_one();
        assert!(matches!(
            source.pixel_at(2, 0),
            Err(Error::IndexOutOfBounds {
                x: 2,
                y: 0,
                width: 2,
                height: 1
            })
        ));
        assert!(source.pixel_at(0, 1).is_err());
    }

    #[test]
    fn decode_png_keeps_alpha() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pixels.png");
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([1, 2, 3, 4]));
        img.save(&path).unwrap();

        let decoded = decode(&path).unwrap();

        assert_eq!(decoded.channels, 4);
        assert_eq!(decoded.source.width(), 3);
        assert_eq!(decoded.source.height(), 2);
        assert_eq!(decoded.source.pixel_at(2, 1).unwrap(), Color::new(1, 2, 3, 4));
    }

    #[test]
    fn decode_grayscale_expands_to_opaque_rgba() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gray.png");
        GrayImage::from_pixel(1, 1, Luma([77])).save(&path).unwrap();

        let decoded = decode(&path).unwrap();

        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.source.pixel_at(0, 0).unwrap(), Color::new(77, 77, 77, 255));
    }

    #[test]
    fn decode_garbage_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(decode(&path), Err(Error::ImageDecode { .. })));
    }

    #[test]
    fn decode_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            decode(&tmp.path().join("missing.png")),
            Err(Error::ImageDecode { .. })
        ));
    }
}
