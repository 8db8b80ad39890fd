//! Cover image processing
//!
//! Covers are stretched to a fixed portrait footprint matching physical box
//! art and re-encoded as PNG. Source aspect ratio is not preserved.

use image::ImageOutputFormat;
use image::imageops::FilterType;
use std::io::Cursor;

use crate::error::StoreError;

pub const COVER_WIDTH: u32 = 567;
pub const COVER_HEIGHT: u32 = 878;

/// Invalidation hook for whatever caches rendered covers
pub trait CoverCache: Send + Sync {
    fn invalidate(&self, key: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCoverCache;

impl CoverCache for NoopCoverCache {
    fn invalidate(&self, _key: &str) {}
}

/// Decode, rescale to the cover footprint, and encode as PNG
pub fn render_cover(source: &[u8]) -> Result<Vec<u8>, StoreError> {
    let original =
        image::load_from_memory(source).map_err(|e| StoreError::DecodeFailed(e.to_string()))?;

    let resized = original.resize_exact(COVER_WIDTH, COVER_HEIGHT, FilterType::Triangle);

    let mut output = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut output), ImageOutputFormat::Png)
        .map_err(|e| StoreError::WriteFailed(format!("cover encode: {e}")))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_cover_is_stretched_to_fixed_size() {
        let rendered = render_cover(&png(300, 100)).unwrap();
        let decoded = image::load_from_memory(&rendered).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (COVER_WIDTH, COVER_HEIGHT));
        assert_eq!(
            image::guess_format(&rendered).unwrap(),
            image::ImageFormat::Png
        );
    }

    #[test]
    fn test_garbage_fails_decode() {
        let err = render_cover(b"definitely not an image").unwrap_err();
        assert!(matches!(err, StoreError::DecodeFailed(_)));
    }
}
