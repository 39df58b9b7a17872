use std::borrow::Cow;

use gif::{DisposalMethod, Encoder, Repeat};

use crate::foundation::core::{Animation, IndexedFrame, LoopDirective};
use crate::foundation::error::{GifError, GifResult};

/// Container MIME type for encoded output.
pub const GIF_CONTENT_TYPE: &str = "image/gif";

/// Serialize an animation into a complete GIF89a byte stream.
///
/// Layout: header + logical screen (canvas) + global colour table (shared palette), NETSCAPE2.0
/// loop extension, then per frame a graphic control extension (delay, transparency) and a
/// full-canvas image descriptor with LZW data, and finally the trailer. The whole artifact is
/// buffered; nothing is returned until the trailer has been written.
#[tracing::instrument(skip(anim), fields(frames = anim.frames.len(), width = anim.width, height = anim.height))]
pub fn encode_gif(anim: &Animation) -> GifResult<Vec<u8>> {
    validate(anim)?;
    let (width, height) = (anim.width as u16, anim.height as u16);
    let palette = anim.palette.to_rgb_bytes();

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, width, height, &palette)
        .map_err(|e| GifError::encode(format!("write gif header: {e}")))?;

    let repeat = match anim.repeat {
        LoopDirective::Infinite => Repeat::Infinite,
    };
    encoder
        .set_repeat(repeat)
        .map_err(|e| GifError::encode(format!("write loop extension: {e}")))?;

    // Keeping the previous frame would let it show through transparent pixels.
    let dispose = if anim.palette.transparent.is_some() {
        DisposalMethod::Background
    } else {
        DisposalMethod::Keep
    };

    for (i, frame) in anim.frames.iter().enumerate() {
        let gif_frame = gif::Frame {
            width: frame.width as u16,
            height: frame.height as u16,
            left: 0,
            top: 0,
            delay: frame.delay_cs,
            transparent: frame.transparent,
            dispose,
            palette: None,
            buffer: Cow::Borrowed(frame.indices.as_slice()),
            ..gif::Frame::default()
        };
        encoder
            .write_frame(&gif_frame)
            .map_err(|e| GifError::encode(format!("write frame {i}: {e}")))?;
    }

    encoder
        .into_inner()
        .map_err(|e| GifError::encode(format!("write gif trailer: {e}")))?;

    tracing::debug!(bytes = out.len(), "encoded gif");
    Ok(out)
}

fn validate(anim: &Animation) -> GifResult<()> {
    if anim.width == 0 || anim.height == 0 {
        return Err(GifError::encode(format!(
            "canvas must be non-empty, got {}x{}",
            anim.width, anim.height
        )));
    }
    if anim.width > u32::from(u16::MAX) || anim.height > u32::from(u16::MAX) {
        return Err(GifError::encode(format!(
            "canvas {}x{} exceeds the gif limit of {}",
            anim.width,
            anim.height,
            u16::MAX
        )));
    }
    let palette_len = anim.palette.len();
    if palette_len == 0 || palette_len > 256 {
        return Err(GifError::encode(format!(
            "palette must hold 1..=256 colours, got {palette_len}"
        )));
    }
    if let Some(t) = anim.palette.transparent
        && usize::from(t) >= palette_len
    {
        return Err(GifError::encode(format!(
            "transparent index {t} is outside the palette"
        )));
    }
    if anim.frames.is_empty() {
        return Err(GifError::encode("animation has no frames"));
    }
    for (i, f) in anim.frames.iter().enumerate() {
        validate_frame(i, f, anim.width, anim.height, palette_len)?;
    }
    Ok(())
}

fn validate_frame(
    i: usize,
    f: &IndexedFrame,
    canvas_w: u32,
    canvas_h: u32,
    palette_len: usize,
) -> GifResult<()> {
    if f.width == 0 || f.height == 0 || f.width > canvas_w || f.height > canvas_h {
        return Err(GifError::encode(format!(
            "frame {i} is {}x{}, canvas is {canvas_w}x{canvas_h}",
            f.width, f.height
        )));
    }
    let expected = f.width as usize * f.height as usize;
    if f.indices.len() != expected {
        return Err(GifError::encode(format!(
            "frame {i} has {} indices, expected {expected}",
            f.indices.len()
        )));
    }
    if f.delay_cs == 0 {
        return Err(GifError::encode(format!("frame {i} has zero delay")));
    }
    if let Some(bad) = f.indices.iter().find(|&&ix| usize::from(ix) >= palette_len) {
        return Err(GifError::encode(format!(
            "frame {i} references index {bad} outside a {palette_len}-entry palette"
        )));
    }
    if let Some(t) = f.transparent
        && usize::from(t) >= palette_len
    {
        return Err(GifError::encode(format!(
            "frame {i} transparent index {t} is outside the palette"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif89a.rs"]
mod tests;
