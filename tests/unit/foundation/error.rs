use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(GifError::decode("x").to_string().contains("decode error:"));
    assert!(
        GifError::dimension("x")
            .to_string()
            .contains("dimension error:")
    );
    assert!(
        GifError::transition("x")
            .to_string()
            .contains("transition error:")
    );
    assert!(GifError::quantize("x").to_string().contains("quantize error:"));
    assert!(GifError::encode("x").to_string().contains("encode error:"));
    assert!(
        GifError::invalid_request("x")
            .to_string()
            .contains("invalid request:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn client_errors_map_to_400_and_internal_to_500() {
    assert_eq!(GifError::decode("x").status_code(), 400);
    assert_eq!(GifError::dimension("x").status_code(), 400);
    assert_eq!(GifError::invalid_request("x").status_code(), 400);
    assert_eq!(GifError::quantize("x").status_code(), 500);
    assert_eq!(GifError::encode("x").status_code(), 500);
    assert_eq!(GifError::Cancelled.status_code(), 503);
}
