use std::collections::HashMap;

use rayon::prelude::*;

use crate::foundation::config::PipelineConfig;
use crate::foundation::core::{Frame, IndexedFrame, Palette, RasterImage, Rgb8};
use crate::foundation::error::{GifError, GifResult};
use crate::foundation::math::squared_distance;
use crate::quantize::palette::build_shared_palette;

/// Index of the closest colour by squared Euclidean RGB distance; ties go to the lowest index.
pub fn nearest_index(colors: &[Rgb8], c: Rgb8) -> u8 {
    let mut best = 0usize;
    let mut best_d = u32::MAX;
    for (i, &p) in colors.iter().enumerate() {
        let d = squared_distance(p, c);
        if d < best_d {
            best = i;
            best_d = d;
            if d == 0 {
                break;
            }
        }
    }
    best as u8
}

/// Map every pixel of `img` onto `palette`.
pub fn index_frame(
    img: &RasterImage,
    palette: &Palette,
    delay_cs: u16,
    cfg: &PipelineConfig,
) -> GifResult<IndexedFrame> {
    let opaque = palette.opaque_colors();
    if opaque.is_empty() && palette.transparent.is_none() {
        return Err(GifError::quantize("palette has no colours"));
    }

    let mut cache: HashMap<Rgb8, u8> = HashMap::new();
    let mut indices = Vec::with_capacity(img.pixel_count());
    let mut used_transparent = false;

    for px in img.pixels() {
        if px[3] < cfg.alpha_threshold
            && let Some(t) = palette.transparent
        {
            used_transparent = true;
            indices.push(t);
            continue;
        }
        if opaque.is_empty() {
            return Err(GifError::quantize(
                "opaque pixel found but palette holds only the transparent slot",
            ));
        }
        let rgb = [px[0], px[1], px[2]];
        let idx = *cache
            .entry(rgb)
            .or_insert_with(|| nearest_index(opaque, rgb));
        indices.push(idx);
    }

    Ok(IndexedFrame {
        width: img.width(),
        height: img.height(),
        indices,
        delay_cs,
        transparent: if used_transparent {
            palette.transparent
        } else {
            None
        },
    })
}

/// Build one shared palette over all frames and index each frame against it.
///
/// Each indexed frame keeps the display delay of its source frame.
#[tracing::instrument(skip(frames, cfg), fields(frames = frames.len()))]
pub fn quantize_frames(
    frames: &[Frame],
    cfg: &PipelineConfig,
) -> GifResult<(Palette, Vec<IndexedFrame>)> {
    let palette = build_shared_palette(frames.iter().map(|f| &f.image), cfg)?;
    let indexed = frames
        .par_iter()
        .map(|f| index_frame(&f.image, &palette, f.delay_cs, cfg))
        .collect::<GifResult<Vec<_>>>()?;
    Ok((palette, indexed))
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/indexer.rs"]
mod tests;
