use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::foundation::core::{Frame, RasterImage, Rgba8};
use crate::foundation::error::{GifError, GifResult};
use crate::foundation::math::mul_div255_u16;

#[derive(Clone, Debug)]
pub struct Mp4Config {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl Mp4Config {
    pub fn validate(&self) -> GifResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GifError::invalid_request(
                "mp4 width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(GifError::invalid_request("mp4 fps must be non-zero"));
        }
        Ok(())
    }

    /// Output size rounded up to even sides (yuv420p needs both even).
    pub fn padded_size(&self) -> (u32, u32) {
        (self.width + self.width % 2, self.height + self.height % 2)
    }
}

/// Frames-per-second that best matches a GIF delay in hundredths of a second.
pub fn fps_for_delay(delay_cs: u16) -> u32 {
    (100 / u32::from(delay_cs.max(1))).max(1)
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> GifResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams RGBA frames into the system `ffmpeg` binary (libx264, yuv420p).
pub struct FfmpegEncoder {
    cfg: Mp4Config,
    bg_rgba: Rgba8,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    pub fn new(cfg: Mp4Config, bg_rgba: Rgba8) -> GifResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(GifError::invalid_request(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(GifError::encode(
                "ffmpeg is required for MP4 output, but was not found on PATH",
            ));
        }

        let (pw, ph) = cfg.padded_size();
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{pw}x{ph}"),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            GifError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GifError::encode("failed to open ffmpeg stdin"))?;

        Ok(Self {
            scratch: vec![0u8; (pw * ph * 4) as usize],
            cfg,
            bg_rgba,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &RasterImage) -> GifResult<()> {
        if frame.width() != self.cfg.width || frame.height() != self.cfg.height {
            return Err(GifError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.cfg.width,
                self.cfg.height
            )));
        }

        let (pw, _) = self.cfg.padded_size();
        flatten_padded(&mut self.scratch, pw, frame, self.bg_rgba);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(GifError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| GifError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))?;

        Ok(())
    }

    pub fn finish(mut self) -> GifResult<()> {
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| GifError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GifError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Encode a whole frame sequence to MP4 at the rate implied by the first frame's delay.
#[tracing::instrument(skip(frames, out_path), fields(frames = frames.len()))]
pub fn write_mp4(frames: &[Frame], out_path: &Path, bg_rgba: Rgba8) -> GifResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| GifError::invalid_request("mp4 export needs at least one frame"))?;
    let cfg = Mp4Config {
        width: first.image.width(),
        height: first.image.height(),
        fps: fps_for_delay(first.delay_cs),
        out_path: out_path.to_path_buf(),
        overwrite: true,
    };
    let mut enc = FfmpegEncoder::new(cfg, bg_rgba)?;
    for f in frames {
        enc.encode_frame(&f.image)?;
    }
    enc.finish()
}

/// Flatten straight-alpha `src` over an opaque background into a `dst_width`-wide buffer whose
/// extra column/row (odd-size padding) stays background.
fn flatten_padded(dst: &mut [u8], dst_width: u32, src: &RasterImage, bg_rgba: Rgba8) {
    let bg = [bg_rgba[0], bg_rgba[1], bg_rgba[2], 255];
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&bg);
    }

    let stride = dst_width as usize * 4;
    for y in 0..src.height() {
        let row = src.row(y);
        let start = y as usize * stride;
        let out = &mut dst[start..start + row.len()];
        for (d, s) in out.chunks_exact_mut(4).zip(row.chunks_exact(4)) {
            let a = u16::from(s[3]);
            if a == 255 {
                d.copy_from_slice(s);
                continue;
            }
            let inv = 255 - a;
            for i in 0..3 {
                let c = mul_div255_u16(u16::from(s[i]), a) + mul_div255_u16(u16::from(bg[i]), inv);
                d[i] = c.min(255) as u8;
            }
            d[3] = 255;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
