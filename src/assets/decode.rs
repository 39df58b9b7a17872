use std::io::Cursor;

use crate::foundation::core::RasterImage;
use crate::foundation::error::{GifError, GifResult};

/// Decode any format the `image` crate recognises into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> GifResult<RasterImage> {
    if bytes.is_empty() {
        return Err(GifError::decode("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| GifError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(GifError::dimension(format!(
            "decoded image has zero area ({width}x{height})"
        )));
    }
    RasterImage::new(width, height, rgba.into_raw())
}

/// Read only the header dimensions, so oversize inputs are rejected before pixel allocation.
pub fn probe_dimensions(bytes: &[u8]) -> GifResult<(u32, u32)> {
    if bytes.is_empty() {
        return Err(GifError::decode("image bytes are empty"));
    }
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| GifError::decode(format!("sniff image format: {e}")))?
        .into_dimensions()
        .map_err(|e| GifError::decode(format!("read image header: {e}")))
}

/// Decode, failing with [`GifError::Dimension`] if either side exceeds `max_dimension`.
pub fn decode_image_bounded(bytes: &[u8], max_dimension: u32) -> GifResult<RasterImage> {
    let (w, h) = probe_dimensions(bytes)?;
    check_dimensions(w, h, max_dimension)?;
    let img = decode_image(bytes)?;
    check_dimensions(img.width(), img.height(), max_dimension)?;
    Ok(img)
}

fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> GifResult<()> {
    if width == 0 || height == 0 {
        return Err(GifError::dimension(format!(
            "image has zero area ({width}x{height})"
        )));
    }
    if width > max_dimension || height > max_dimension {
        return Err(GifError::dimension(format!(
            "image {width}x{height} exceeds the {max_dimension}x{max_dimension} ceiling"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
