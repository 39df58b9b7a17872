use crate::assets::decode::decode_image_bounded;
use crate::effects::composite::draw_over;
use crate::foundation::config::{PipelineConfig, ResizeFilter};
use crate::foundation::core::{RasterImage, Rgba8};
use crate::foundation::error::{GifError, GifResult};

/// Shared frame geometry for a pair of images: max width by max height.
pub fn target_size(a: &RasterImage, b: &RasterImage) -> (u32, u32) {
    (a.width().max(b.width()), a.height().max(b.height()))
}

/// Decode both inputs and bring them to one identical size.
///
/// Each image is uniformly scaled to fit the shared geometry and centred on a background-filled
/// canvas; mismatched aspect ratios are padded, never stretched or cropped.
#[tracing::instrument(skip(start, end, cfg), fields(start_len = start.len(), end_len = end.len()))]
pub fn normalize_pair(
    start: &[u8],
    end: &[u8],
    cfg: &PipelineConfig,
) -> GifResult<(RasterImage, RasterImage)> {
    let a = decode_image_bounded(start, cfg.max_dimension)
        .map_err(|e| relabel(e, "start"))?;
    let b = decode_image_bounded(end, cfg.max_dimension).map_err(|e| relabel(e, "end"))?;

    let (tw, th) = target_size(&a, &b);
    tracing::debug!(
        start_w = a.width(),
        start_h = a.height(),
        end_w = b.width(),
        end_h = b.height(),
        target_w = tw,
        target_h = th,
        "normalizing image pair"
    );

    let a = fit_to_canvas(&a, tw, th, cfg.background, cfg.resize_filter)?;
    let b = fit_to_canvas(&b, tw, th, cfg.background, cfg.resize_filter)?;
    Ok((a, b))
}

/// Scale `img` uniformly to fit `width x height` and centre it over `bg`.
pub fn fit_to_canvas(
    img: &RasterImage,
    width: u32,
    height: u32,
    bg: Rgba8,
    filter: ResizeFilter,
) -> GifResult<RasterImage> {
    let (sw, sh) = fitted_size(img.width(), img.height(), width, height);

    let scaled = if (sw, sh) == (img.width(), img.height()) {
        img.clone()
    } else {
        let resized =
            image::imageops::resize(&img.to_rgba_image()?, sw, sh, filter.to_image_filter());
        RasterImage::from_rgba_image(resized)?
    };

    let mut canvas = RasterImage::filled(width, height, bg)?;
    let left = (width - sw) / 2;
    let top = (height - sh) / 2;
    draw_over(&mut canvas, &scaled, left, top);
    Ok(canvas)
}

/// Largest size with `w:h` aspect that fits inside `max_w x max_h` (each side at least 1).
pub fn fitted_size(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    // Compare w/max_w against h/max_h without floating point.
    let (w64, h64, mw, mh) = (
        u64::from(w),
        u64::from(h),
        u64::from(max_w),
        u64::from(max_h),
    );
    if w64 * mh >= h64 * mw {
        let sh = ((h64 * mw + w64 / 2) / w64).clamp(1, mh);
        (max_w, sh as u32)
    } else {
        let sw = ((w64 * mh + h64 / 2) / h64).clamp(1, mw);
        (sw as u32, max_h)
    }
}

fn relabel(err: GifError, slot: &str) -> GifError {
    match err {
        GifError::Decode(msg) => GifError::Decode(format!("{slot} image: {msg}")),
        GifError::Dimension(msg) => GifError::Dimension(format!("{slot} image: {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/normalize.rs"]
mod tests;
