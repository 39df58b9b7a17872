use rayon::prelude::*;

use crate::effects::composite::{crossfade, over, sample_bilinear};
use crate::effects::transitions::TransitionKind;
use crate::foundation::config::{DividerStyle, PipelineConfig};
use crate::foundation::core::{Affine, Point, RasterImage, Rgba8};
use crate::foundation::error::{GifError, GifResult};
use crate::foundation::math::progress;

/// Horizontal offset (in pixels) A has travelled at progress `t`.
pub fn slide_offset(width: u32, t: f32) -> u32 {
    ((f64::from(t.clamp(0.0, 1.0)) * f64::from(width)).round() as u32).min(width)
}

/// Slide frame at progress `t`: A shifted left by `t * width`, B entering from the right edge.
pub fn slide_frame(a: &RasterImage, b: &RasterImage, t: f32, bg: Rgba8) -> GifResult<RasterImage> {
    ensure_same_size(a, b)?;
    let (w, h) = (a.width(), a.height());
    let off = slide_offset(w, t);
    let seam = w - off;

    let mut out = RasterImage::filled(w, h, bg)?;
    let (seam_px, off_px) = (seam as usize * 4, off as usize * 4);
    for y in 0..h {
        let a_row = a.row(y);
        let b_row = b.row(y);
        let dst = out.row_mut(y);
        // [0, seam) shows A[off..w); [seam, w) shows B[0..off).
        dst[..seam_px].copy_from_slice(&a_row[off_px..]);
        dst[seam_px..].copy_from_slice(&b_row[..off_px]);
    }
    Ok(out)
}

/// Rotate `img` by `degrees` about the canvas centre, filling uncovered area with `bg`.
pub fn rotate_image(img: &RasterImage, degrees: f64, bg: Rgba8) -> GifResult<RasterImage> {
    if degrees.rem_euclid(360.0) == 0.0 {
        return Ok(img.clone());
    }
    let (w, h) = (img.width(), img.height());
    // Pixel centres sit at integer coordinates, so the centre is ((w-1)/2, (h-1)/2).
    let centre = Point::new(f64::from(w - 1) / 2.0, f64::from(h - 1) / 2.0);
    let inverse = Affine::rotate_about(-degrees.to_radians(), centre);

    let mut out = RasterImage::filled(w, h, bg)?;
    for y in 0..h {
        for x in 0..w {
            let src = inverse * Point::new(f64::from(x), f64::from(y));
            out.set_pixel(x, y, sample_bilinear(img, src.x, src.y, bg));
        }
    }
    Ok(out)
}

/// Rotate frame at progress `t`.
///
/// A is rotated by `t * sweep` with opacity `1 - t`; B is rotated by `t * sweep - sweep` with
/// opacity `t`; the two are blended so each contributes its own weight.
pub fn rotate_frame(
    a: &RasterImage,
    b: &RasterImage,
    t: f32,
    sweep_degrees: f64,
    bg: Rgba8,
) -> GifResult<RasterImage> {
    ensure_same_size(a, b)?;
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return Ok(a.clone());
    }
    if t == 1.0 {
        return Ok(b.clone());
    }

    let theta = f64::from(t) * sweep_degrees;
    let ra = rotate_image(a, theta, bg)?;
    let rb = rotate_image(b, theta - sweep_degrees, bg)?;

    let mut data = Vec::with_capacity(ra.data().len());
    for (pa, pb) in ra.pixels().zip(rb.pixels()) {
        data.extend_from_slice(&crossfade(pa, pb, t));
    }
    RasterImage::new(a.width(), a.height(), data)
}

/// One pure frame function per transition kind.
pub fn transition_frame(
    a: &RasterImage,
    b: &RasterImage,
    kind: TransitionKind,
    t: f32,
    cfg: &PipelineConfig,
) -> GifResult<RasterImage> {
    match kind {
        TransitionKind::Slide => slide_frame(a, b, t, cfg.background),
        TransitionKind::Rotate => rotate_frame(a, b, t, cfg.rotate_sweep_degrees, cfg.background),
    }
}

/// Synthesize `n` frames from A (frame 0) to B (frame `n - 1`).
///
/// Frames are generated in parallel and collected in index order.
#[tracing::instrument(skip(a, b, cfg), fields(width = a.width(), height = a.height()))]
pub fn render_transition(
    a: &RasterImage,
    b: &RasterImage,
    kind: TransitionKind,
    n: usize,
    cfg: &PipelineConfig,
) -> GifResult<Vec<RasterImage>> {
    if n < 2 {
        return Err(GifError::invalid_request(format!(
            "transition needs at least 2 frames, got {n}"
        )));
    }
    ensure_same_size(a, b)?;

    (0..n)
        .into_par_iter()
        .map(|i| {
            let t = progress(i, n);
            let mut frame = transition_frame(a, b, kind, t, cfg)?;
            if let Some(style) = cfg.divider
                && i > 0
                && i + 1 < n
            {
                draw_divider(&mut frame, kind, t, cfg.rotate_sweep_degrees, style);
            }
            Ok(frame)
        })
        .collect()
}

/// Guide line on the seam: vertical for slide, through the centre at the current angle for rotate.
pub fn draw_divider(
    frame: &mut RasterImage,
    kind: TransitionKind,
    t: f32,
    sweep_degrees: f64,
    style: DividerStyle,
) {
    let (w, h) = (frame.width(), frame.height());
    let half = f64::from(style.width) / 2.0;
    match kind {
        TransitionKind::Slide => {
            let seam = f64::from(w - slide_offset(w, t));
            for y in 0..h {
                for x in 0..w {
                    let cx = f64::from(x) + 0.5;
                    if (cx - seam).abs() <= half {
                        let d = frame.pixel(x, y);
                        frame.set_pixel(x, y, over(d, style.color));
                    }
                }
            }
        }
        TransitionKind::Rotate => {
            // Line starts vertical and turns with A.
            let theta = (f64::from(t) * sweep_degrees).to_radians();
            let (dx, dy) = (theta.sin(), -theta.cos());
            let (cx, cy) = (f64::from(w - 1) / 2.0, f64::from(h - 1) / 2.0);
            for y in 0..h {
                for x in 0..w {
                    let (px, py) = (f64::from(x) - cx, f64::from(y) - cy);
                    // Distance from the infinite line through the centre along (dx, dy).
                    let dist = (px * dy - py * dx).abs();
                    if dist <= half {
                        let d = frame.pixel(x, y);
                        frame.set_pixel(x, y, over(d, style.color));
                    }
                }
            }
        }
    }
}

fn ensure_same_size(a: &RasterImage, b: &RasterImage) -> GifResult<()> {
    if !a.same_size(b) {
        return Err(GifError::dimension(format!(
            "transition endpoints differ in size: {}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/frames.rs"]
mod tests;
