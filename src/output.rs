use std::io::Cursor;
use std::path::Path;

use data_encoding::BASE64;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{QrError, QrResult};

pub const PREVIEW_SIDE: u32 = 400;

pub fn encode_png(image: &RgbaImage) -> QrResult<Vec<u8>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

pub fn data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Shrinks `image` so its width is at most `max_side`, keeping the aspect
/// ratio. Smaller images are returned as-is.
pub fn preview(image: &RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= max_side || w == 0 {
        return image.clone();
    }
    let ratio = max_side as f64 / w as f64;
    let new_h = ((h as f64 * ratio) as u32).max(1);
    image::imageops::resize(image, max_side, new_h, FilterType::Lanczos3)
}

/// Writes `image` in the format named by the extension of `path`.
pub fn save_as(image: &RgbaImage, path: &Path) -> QrResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => image.save_with_format(path, ImageFormat::Png)?,
        "jpg" | "jpeg" => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(path, ImageFormat::Jpeg)?,
        "bmp" => image.save_with_format(path, ImageFormat::Bmp)?,
        _ => return Err(QrError::UnsupportedFormat(ext)),
    }
    Ok(())
}
