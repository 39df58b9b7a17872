use std::collections::HashMap;

use crate::foundation::config::PipelineConfig;
use crate::foundation::core::{Palette, RasterImage, Rgb8};
use crate::foundation::error::{GifError, GifResult};

/// Colour counts in first-occurrence order.
#[derive(Clone, Debug, Default)]
pub struct ColorHistogram {
    entries: Vec<(Rgb8, u64)>,
    slots: HashMap<Rgb8, usize>,
    saw_transparent: bool,
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Rgb8) {
        match self.slots.get(&color) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.slots.insert(color, self.entries.len());
                self.entries.push((color, 1));
            }
        }
    }

    /// Accumulate one frame: every pixel is checked for transparency, opaque colours are sampled
    /// every `cfg.sample_stride` opaque pixels starting with the first one.
    pub fn observe(&mut self, img: &RasterImage, cfg: &PipelineConfig) {
        let stride = cfg.sample_stride.max(1) as usize;
        let mut opaque_seen = 0usize;
        for px in img.pixels() {
            if px[3] < cfg.alpha_threshold {
                self.saw_transparent = true;
                continue;
            }
            if opaque_seen % stride == 0 {
                self.add([px[0], px[1], px[2]]);
            }
            opaque_seen += 1;
        }
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn saw_transparent(&self) -> bool {
        self.saw_transparent
    }

    pub fn entries(&self) -> &[(Rgb8, u64)] {
        &self.entries
    }
}

/// Build one palette over the union of all frames.
///
/// Reusing a single palette for every frame keeps colours from flickering between frames.
#[tracing::instrument(skip(frames, cfg))]
pub fn build_shared_palette<'a>(
    frames: impl IntoIterator<Item = &'a RasterImage>,
    cfg: &PipelineConfig,
) -> GifResult<Palette> {
    let mut hist = ColorHistogram::new();
    let mut observed = 0usize;
    for frame in frames {
        hist.observe(frame, cfg);
        observed += 1;
    }
    if observed == 0 {
        return Err(GifError::quantize("cannot build a palette from zero frames"));
    }
    tracing::trace!(frames = observed, "histogram complete");
    palette_from_histogram(&hist, usize::from(cfg.max_colors))
}

/// Turn a histogram into a palette of at most `max_colors` entries.
pub fn palette_from_histogram(hist: &ColorHistogram, max_colors: usize) -> GifResult<Palette> {
    if hist.distinct() == 0 && !hist.saw_transparent() {
        return Err(GifError::quantize("no pixels observed"));
    }
    let max_colors = max_colors.clamp(1, 256);
    let reserve = usize::from(hist.saw_transparent());
    let budget = max_colors.saturating_sub(reserve).max(1);

    let mut colors: Vec<Rgb8> = if hist.distinct() <= budget {
        hist.entries().iter().map(|&(c, _)| c).collect()
    } else {
        median_cut(hist.entries(), budget)
    };

    let transparent = if hist.saw_transparent() {
        let idx = u8::try_from(colors.len()).map_err(|_| {
            GifError::quantize(format!("palette overflow: {} colours", colors.len() + 1))
        })?;
        colors.push(unused_color(&colors));
        Some(idx)
    } else {
        None
    };

    tracing::debug!(
        distinct = hist.distinct(),
        palette = colors.len(),
        transparent = transparent.is_some(),
        "built shared palette"
    );
    Ok(Palette {
        colors,
        transparent,
    })
}

#[derive(Clone, Debug)]
struct ColorBox {
    colors: Vec<(Rgb8, u64)>,
}

impl ColorBox {
    /// Channel with the widest value range; ties go to the lower channel.
    fn widest_channel(&self) -> (usize, u8) {
        let mut best = (0usize, 0u8);
        for ch in 0..3 {
            let (lo, hi) = self
                .colors
                .iter()
                .fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                    (lo.min(c[ch]), hi.max(c[ch]))
                });
            let range = hi.saturating_sub(lo);
            if range > best.1 {
                best = (ch, range);
            }
        }
        best
    }

    fn mean(&self) -> Rgb8 {
        let total: u64 = self.colors.iter().map(|&(_, n)| n).sum::<u64>().max(1);
        let mut out = [0u8; 3];
        for (ch, slot) in out.iter_mut().enumerate() {
            let sum: u64 = self
                .colors
                .iter()
                .map(|&(c, n)| u64::from(c[ch]) * n)
                .sum();
            *slot = ((sum + total / 2) / total).min(255) as u8;
        }
        out
    }

    /// Split at the count-weighted median of `ch`. Both halves are non-empty.
    fn split(mut self, ch: usize) -> (Self, Self) {
        // Stable: equal channel values keep first-occurrence order.
        self.colors.sort_by_key(|&(c, _)| c[ch]);
        let total: u64 = self.colors.iter().map(|&(_, n)| n).sum();
        let mut acc = 0u64;
        let mut cut = self.colors.len() / 2;
        for (i, &(_, n)) in self.colors.iter().enumerate() {
            acc += n;
            if acc * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.colors.len() - 1);
        let upper = self.colors.split_off(cut);
        (self, Self { colors: upper })
    }
}

/// Median-cut reduction to at most `target` colours.
pub fn median_cut(entries: &[(Rgb8, u64)], target: usize) -> Vec<Rgb8> {
    if entries.is_empty() || target == 0 {
        return Vec::new();
    }
    let mut boxes = vec![ColorBox {
        colors: entries.to_vec(),
    }];

    while boxes.len() < target {
        let mut pick: Option<(usize, usize, u8)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if b.colors.len() < 2 {
                continue;
            }
            let (ch, range) = b.widest_channel();
            if range > 0 && pick.is_none_or(|(_, _, r)| range > r) {
                pick = Some((i, ch, range));
            }
        }
        let Some((i, ch, _)) = pick else {
            break;
        };
        let (lo, hi) = boxes.remove(i).split(ch);
        boxes.insert(i, lo);
        boxes.insert(i + 1, hi);
    }

    let mut out: Vec<Rgb8> = Vec::with_capacity(boxes.len());
    for b in &boxes {
        let c = b.mean();
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

/// First colour (counting up from black) not already in `colors`.
fn unused_color(colors: &[Rgb8]) -> Rgb8 {
    let mut v: u32 = 0;
    loop {
        let c = [(v >> 16) as u8, (v >> 8) as u8, v as u8];
        if !colors.contains(&c) || v >= 0x00FF_FFFF {
            return c;
        }
        v += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/palette.rs"]
mod tests;
