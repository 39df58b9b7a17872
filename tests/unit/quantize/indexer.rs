use super::*;

fn gradient(w: u32, h: u32, phase: u32) -> RasterImage {
    let mut img = RasterImage::filled(w, h, [0, 0, 0, 255]).unwrap();
    for y in 0..h {
        for x in 0..w {
            img.set_pixel(
                x,
                y,
                [
                    ((x * 7 + phase) % 256) as u8,
                    ((y * 5 + phase) % 256) as u8,
                    ((x * y + phase) % 256) as u8,
                    255,
                ],
            );
        }
    }
    img
}

fn frames_of(images: Vec<RasterImage>) -> Vec<Frame> {
    images.into_iter().map(|img| Frame::new(img, 10)).collect()
}

#[test]
fn nearest_prefers_exact_match() {
    let colors = [[0, 0, 0], [10, 10, 10], [255, 255, 255]];
    assert_eq!(nearest_index(&colors, [10, 10, 10]), 1);
    assert_eq!(nearest_index(&colors, [200, 200, 200]), 2);
}

#[test]
fn nearest_ties_go_to_lowest_index() {
    let colors = [[0, 0, 0], [10, 0, 0]];
    assert_eq!(nearest_index(&colors, [5, 0, 0]), 0);
    let colors = [[10, 0, 0], [0, 0, 0]];
    assert_eq!(nearest_index(&colors, [5, 0, 0]), 0);
}

#[test]
fn lossless_when_colours_fit() {
    let cfg = PipelineConfig::default();
    let img = RasterImage::new(
        3,
        1,
        vec![255, 0, 0, 255, 0, 255, 0, 255, 255, 0, 0, 255],
    )
    .unwrap();
    let (palette, frames) = quantize_frames(&frames_of(vec![img]), &cfg).unwrap();
    assert_eq!(palette.colors, vec![[255, 0, 0], [0, 255, 0]]);
    assert_eq!(frames[0].indices, vec![0, 1, 0]);
    assert_eq!(frames[0].delay_cs, 10);
    assert_eq!(frames[0].transparent, None);
}

#[test]
fn every_index_is_a_valid_palette_reference() {
    let cfg = PipelineConfig::default();
    let frames = frames_of((0..4).map(|i| gradient(40, 30, i * 60)).collect());
    let (palette, indexed) = quantize_frames(&frames, &cfg).unwrap();
    assert!(palette.len() <= 256);
    assert_eq!(indexed.len(), 4);
    for f in &indexed {
        assert_eq!(f.indices.len(), 40 * 30);
        assert!(f.indices.iter().all(|&i| usize::from(i) < palette.len()));
    }
}

#[test]
fn all_frames_share_one_palette() {
    // Disjoint colours per frame: per-frame palettes would both start at index 0.
    let cfg = PipelineConfig::default();
    let red = RasterImage::filled(2, 2, [255, 0, 0, 255]).unwrap();
    let blue = RasterImage::filled(2, 2, [0, 0, 255, 255]).unwrap();
    let (palette, frames) = quantize_frames(&frames_of(vec![red, blue]), &cfg).unwrap();
    assert_eq!(palette.colors, vec![[255, 0, 0], [0, 0, 255]]);
    assert_eq!(frames[0].indices, vec![0; 4]);
    assert_eq!(frames[1].indices, vec![1; 4]);
}

#[test]
fn transparent_pixels_use_reserved_index_only_where_present() {
    let cfg = PipelineConfig::default();
    let clear = RasterImage::new(2, 1, vec![0, 0, 0, 0, 9, 9, 9, 255]).unwrap();
    let solid = RasterImage::filled(2, 1, [9, 9, 9, 255]).unwrap();
    let (palette, frames) = quantize_frames(&frames_of(vec![clear, solid]), &cfg).unwrap();
    let t = palette.transparent.unwrap();
    assert_eq!(frames[0].indices, vec![t, 0]);
    assert_eq!(frames[0].transparent, Some(t));
    assert_eq!(frames[1].transparent, None);
}

#[test]
fn quantization_is_deterministic() {
    let cfg = PipelineConfig::default();
    let frames = frames_of((0..3).map(|i| gradient(50, 20, i * 33)).collect());
    let x = quantize_frames(&frames, &cfg).unwrap();
    let y = quantize_frames(&frames, &cfg).unwrap();
    assert_eq!(x, y);
}

#[test]
fn strided_sampling_never_leaves_opaque_pixels_unmapped() {
    // Transparent and opaque pixels alternate, so a stride of 2 over every pixel would only
    // ever sample transparent ones.
    let cfg = PipelineConfig {
        sample_stride: 2,
        background: [0, 0, 0, 0],
        ..PipelineConfig::default()
    };
    let img = RasterImage::new(
        2,
        2,
        vec![
            0, 0, 0, 0, 255, 0, 0, 255, //
            0, 0, 0, 0, 255, 0, 0, 255,
        ],
    )
    .unwrap();
    let (palette, frames) = quantize_frames(&frames_of(vec![img.clone(), img]), &cfg).unwrap();
    let t = palette.transparent.unwrap();
    assert_eq!(frames[0].indices, vec![t, 0, t, 0]);
    assert_eq!(palette.colors[0], [255, 0, 0]);
}

#[test]
fn delay_follows_each_source_frame() {
    let cfg = PipelineConfig::default();
    let frames = vec![
        Frame::new(RasterImage::filled(1, 1, [0, 0, 0, 255]).unwrap(), 4),
        Frame::new(RasterImage::filled(1, 1, [0, 0, 0, 255]).unwrap(), 7),
    ];
    let (_, indexed) = quantize_frames(&frames, &cfg).unwrap();
    assert_eq!(indexed[0].delay_cs, 4);
    assert_eq!(indexed[1].delay_cs, 7);
}
