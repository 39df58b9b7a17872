use super::*;

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_on_opaque_blends() {
    let out = over([0, 0, 0, 255], [200, 100, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 100);
    assert_eq!(out[1], 50);
    assert_eq!(out[2], 0);
}

#[test]
fn crossfade_t_0_is_a_and_t_1_is_b() {
    let a = [10, 20, 30, 40];
    let b = [200, 210, 220, 230];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
}

#[test]
fn crossfade_midpoint_weights_are_even() {
    let out = crossfade([255, 0, 0, 255], [0, 0, 255, 255], 0.5);
    assert!((i32::from(out[0]) - i32::from(out[2])).abs() <= 1);
    assert_eq!(out[3], 255);
}

#[test]
fn bilinear_on_pixel_centres_is_exact() {
    let mut img = RasterImage::filled(2, 2, [0, 0, 0, 255]).unwrap();
    img.set_pixel(1, 0, [200, 100, 50, 255]);
    assert_eq!(
        sample_bilinear(&img, 1.0, 0.0, [9, 9, 9, 9]),
        [200, 100, 50, 255]
    );
    assert_eq!(sample_bilinear(&img, 0.5, 0.0, [0; 4]), [100, 50, 25, 255]);
}

#[test]
fn bilinear_outside_reads_background() {
    let img = RasterImage::filled(2, 2, [0, 0, 0, 255]).unwrap();
    let bg = [255, 255, 255, 255];
    assert_eq!(sample_bilinear(&img, -5.0, -5.0, bg), bg);
    assert_eq!(sample_bilinear(&img, 1.5, 0.0, bg), [128, 128, 128, 255]);
}

#[test]
fn crossfade_images_rejects_size_mismatch() {
    let a = RasterImage::filled(2, 2, [0; 4]).unwrap();
    let b = RasterImage::filled(3, 2, [0; 4]).unwrap();
    assert!(matches!(
        crossfade_images(&a, &b, 0.5),
        Err(GifError::Dimension(_))
    ));
}

#[test]
fn draw_over_clips_to_destination() {
    let mut dst = RasterImage::filled(3, 3, [0, 0, 0, 255]).unwrap();
    let src = RasterImage::filled(2, 2, [255, 0, 0, 255]).unwrap();
    draw_over(&mut dst, &src, 2, 2);
    assert_eq!(dst.pixel(2, 2), [255, 0, 0, 255]);
    assert_eq!(dst.pixel(1, 1), [0, 0, 0, 255]);
}
