use crate::foundation::error::{GifError, GifResult};

pub use kurbo::{Affine, Point};

/// Straight (non-premultiplied) RGBA8 sample.
pub type Rgba8 = [u8; 4];

/// Opaque RGB8 palette entry.
pub type Rgb8 = [u8; 3];

/// In-memory RGBA bitmap, row-major, top-to-bottom, straight alpha.
///
/// Invariant: `data.len() == width * height * 4` and both sides are non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer, checking the length invariant.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> GifResult<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(GifError::dimension(format!(
                "rgba buffer length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A `width x height` image where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: Rgba8) -> GifResult<Self> {
        let n = buffer_len(width, height)? / 4;
        Ok(Self {
            width,
            height,
            data: rgba.repeat(n),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Sample at `(x, y)`; callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Sample at signed coordinates, returning `None` outside the bitmap.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(self.pixel(x as u32, y as u32))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: Rgba8) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Mutable access to one row of RGBA bytes.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn to_rgba_image(&self) -> GifResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            GifError::dimension(format!(
                "rgba buffer does not fit {}x{}",
                self.width, self.height
            ))
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> GifResult<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

fn buffer_len(width: u32, height: u32) -> GifResult<usize> {
    if width == 0 || height == 0 {
        return Err(GifError::dimension(format!(
            "image must have non-zero area, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| GifError::dimension(format!("{width}x{height} rgba buffer overflows")))
}

/// A composited frame with its display duration.
///
/// Transparency is only marked once a frame is indexed; see [`IndexedFrame::transparent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub image: RasterImage,
    /// Display duration in hundredths of a second (>= 1).
    pub delay_cs: u16,
}

impl Frame {
    pub fn new(image: RasterImage, delay_cs: u16) -> Self {
        Self {
            image,
            delay_cs: delay_cs.max(1),
        }
    }
}

/// Ordered palette of at most 256 distinct colours.
///
/// When `transparent` is set it is always the last index and its colour entry is only a
/// placeholder for the global colour table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<Rgb8>,
    pub transparent: Option<u8>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colours that pixels may be mapped onto (everything but the transparent slot).
    pub fn opaque_colors(&self) -> &[Rgb8] {
        match self.transparent {
            Some(t) => &self.colors[..usize::from(t)],
            None => &self.colors,
        }
    }

    /// Flat `r, g, b, r, g, b, ...` table as written to a GIF colour table.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flatten().copied().collect()
    }
}

/// A frame whose pixels are indices into a shared [`Palette`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub delay_cs: u16,
    /// Palette index of the transparent slot, set only when this frame uses it.
    pub transparent: Option<u8>,
}

/// Container-level repeat instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopDirective {
    #[default]
    Infinite,
}

/// A complete, encodable animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub frames: Vec<IndexedFrame>,
    pub repeat: LoopDirective,
}

impl Animation {
    /// Build an infinitely looping animation; the canvas is the max width/height over frames.
    pub fn new(palette: Palette, frames: Vec<IndexedFrame>) -> Self {
        let width = frames.iter().map(|f| f.width).max().unwrap_or(0);
        let height = frames.iter().map(|f| f.height).max().unwrap_or(0);
        Self {
            width,
            height,
            palette,
            frames,
            repeat: LoopDirective::Infinite,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
