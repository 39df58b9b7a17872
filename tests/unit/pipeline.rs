use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn small_cfg() -> PipelineConfig {
    PipelineConfig {
        slide_frames: 6,
        rotate_frames: 6,
        ..PipelineConfig::default()
    }
}

fn request(kind: TransitionKind) -> AnimationRequest {
    AnimationRequest::new(
        png_bytes(8, 6, [255, 0, 0, 255]),
        png_bytes(8, 6, [0, 0, 255, 255]),
        kind,
    )
}

#[test]
fn from_form_requires_exactly_two_images() {
    for n in [0usize, 1, 3] {
        let images = vec![vec![1u8]; n];
        assert!(matches!(
            AnimationRequest::from_form(images, Some("slide")),
            Err(GifError::InvalidRequest(_))
        ));
    }

    let req = AnimationRequest::from_form(vec![vec![1], vec![2]], Some("rotate")).unwrap();
    assert_eq!(req.start, vec![1]);
    assert_eq!(req.end, vec![2]);
    assert_eq!(req.transition, TransitionKind::Rotate);
}

#[test]
fn from_form_falls_back_to_slide() {
    let missing = AnimationRequest::from_form(vec![vec![1], vec![2]], None).unwrap();
    assert_eq!(missing.transition, TransitionKind::Slide);
    let unknown = AnimationRequest::from_form(vec![vec![1], vec![2]], Some("zoom")).unwrap();
    assert_eq!(unknown.transition, TransitionKind::Slide);
}

#[test]
fn successful_run_ends_done_with_metadata() {
    let cfg = small_cfg();
    let mut pipeline = Pipeline::new(&cfg);
    let out = pipeline.run(request(TransitionKind::Slide)).unwrap();

    assert_eq!(pipeline.state(), &PipelineState::Done);
    assert_eq!((out.width, out.height), (8, 6));
    assert_eq!(out.frame_count, 6);
    assert_eq!(out.delay_cs, cfg.frame_delay_cs(TransitionKind::Slide));
    assert!(out.palette_len >= 2 && out.palette_len <= 256);
    assert_eq!(out.content_type(), "image/gif");
    assert_eq!(&out.bytes[..6], b"GIF89a");
    assert_eq!(*out.bytes.last().unwrap(), 0x3B);
}

#[test]
fn decode_failure_marks_state_failed() {
    let cfg = small_cfg();
    let mut pipeline = Pipeline::new(&cfg);
    let req = AnimationRequest::new(
        b"not an image".to_vec(),
        png_bytes(4, 4, [0, 0, 0, 255]),
        TransitionKind::Slide,
    );
    let err = pipeline.run(req).unwrap_err();
    assert!(matches!(err, GifError::Decode(_)));
    assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
}

#[test]
fn invalid_config_is_rejected_before_decoding() {
    let cfg = PipelineConfig {
        slide_frames: 1,
        ..PipelineConfig::default()
    };
    let err = generate_gif(request(TransitionKind::Slide), &cfg).unwrap_err();
    assert!(matches!(err, GifError::InvalidRequest(_)));
}

#[test]
fn cancelled_token_aborts_without_output() {
    let cfg = small_cfg();
    let token = CancelToken::new();
    token.cancel();
    let mut pipeline = Pipeline::new(&cfg).with_cancel(token.clone());
    let err = pipeline.run(request(TransitionKind::Rotate)).unwrap_err();
    assert!(matches!(err, GifError::Cancelled));
    assert_eq!(err.status_code(), 503);
    assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
}

#[test]
fn uncancelled_token_does_not_interfere() {
    let cfg = small_cfg();
    let token = CancelToken::new();
    let out = Pipeline::new(&cfg)
        .with_cancel(token.clone())
        .run(request(TransitionKind::Rotate))
        .unwrap();
    assert!(!token.is_cancelled());
    assert_eq!(out.frame_count, 6);
}

#[test]
fn error_payload_serializes_with_single_error_field() {
    let payload = ErrorPayload::from_error(&GifError::decode("bad bytes"));
    let json = serde_json::to_string(&payload).unwrap();
    assert_eq!(json, r#"{"error":"decode error: bad bytes"}"#);
}

#[test]
fn run_with_frames_sees_composited_frames_before_quantizing() {
    let cfg = small_cfg();
    let mut seen = Vec::new();
    let out = Pipeline::new(&cfg)
        .run_with_frames(request(TransitionKind::Slide), |frames| {
            seen = frames.to_vec();
            Ok(())
        })
        .unwrap();

    assert_eq!(seen.len(), out.frame_count);
    assert!(seen.iter().all(|f| f.delay_cs == out.delay_cs));
    assert_eq!(seen[0].image.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(seen[5].image.pixel(0, 0), [0, 0, 255, 255]);
}

#[test]
fn frame_hook_error_fails_the_run() {
    let cfg = small_cfg();
    let mut pipeline = Pipeline::new(&cfg);
    let err = pipeline
        .run_with_frames(request(TransitionKind::Rotate), |_| {
            Err(GifError::encode("export failed"))
        })
        .unwrap_err();
    assert!(matches!(err, GifError::Encode(_)));
    assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
}
