use crate::foundation::core::{RasterImage, Rgba8};
use crate::foundation::error::{GifError, GifResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8_weight};

/// Straight-alpha source-over: `src` drawn on top of `dst`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    let da = u32::from(dst[3]);
    if sa == 255 || da == 0 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let inv = 255 - sa;
    // out_a * 255 = sa * 255 + da * (255 - sa)
    let out_a_255 = sa * 255 + da * inv;
    let out_a = (out_a_255 + 127) / 255;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + out_a_255 / 2) / out_a_255).min(255) as u8;
    }
    out[3] = out_a.min(255) as u8;
    out
}

/// Linear blend of all four channels; `t = 0` is exactly `a`, `t = 1` is exactly `b`.
pub fn crossfade(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    let tt = unit_to_u8_weight(t);
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = av.saturating_add(bv);
    }
    out
}

/// Bilinear sample at continuous pixel coordinates (pixel centres sit on integers).
///
/// Texels outside the bitmap read as `bg`, so rotated edges blend into the background instead of
/// exposing transparent corners.
pub fn sample_bilinear(img: &RasterImage, x: f64, y: f64, bg: Rgba8) -> Rgba8 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (xi, yi) = (x0 as i64, y0 as i64);

    let p00 = img.get(xi, yi).unwrap_or(bg);
    if fx == 0.0 && fy == 0.0 {
        return p00;
    }
    let p10 = img.get(xi + 1, yi).unwrap_or(bg);
    let p01 = img.get(xi, yi + 1).unwrap_or(bg);
    let p11 = img.get(xi + 1, yi + 1).unwrap_or(bg);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = f64::from(p00[i]) * w00
            + f64::from(p10[i]) * w10
            + f64::from(p01[i]) * w01
            + f64::from(p11[i]) * w11;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Crossfade two equal-size images into a new one.
pub fn crossfade_images(a: &RasterImage, b: &RasterImage, t: f32) -> GifResult<RasterImage> {
    if !a.same_size(b) {
        return Err(GifError::dimension(format!(
            "crossfade expects equal-size images, got {}x{} and {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    let mut data = Vec::with_capacity(a.data().len());
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        data.extend_from_slice(&crossfade(pa, pb, t));
    }
    RasterImage::new(a.width(), a.height(), data)
}

/// Draw `src` over `dst` with its top-left corner at `(left, top)`, clipping to `dst`.
pub fn draw_over(dst: &mut RasterImage, src: &RasterImage, left: u32, top: u32) {
    if left >= dst.width() || top >= dst.height() {
        return;
    }
    let w = src.width().min(dst.width() - left);
    let h = src.height().min(dst.height() - top);
    for y in 0..h {
        for x in 0..w {
            let d = dst.pixel(left + x, top + y);
            dst.set_pixel(left + x, top + y, over(d, src.pixel(x, y)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
