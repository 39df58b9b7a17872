use super::*;

#[test]
fn form_values_map_to_kinds() {
    assert_eq!(TransitionKind::from_form_value("default"), TransitionKind::Slide);
    assert_eq!(TransitionKind::from_form_value("rotate"), TransitionKind::Rotate);
    assert_eq!(TransitionKind::from_form_value(" ROTATE "), TransitionKind::Rotate);
}

#[test]
fn unknown_form_values_fall_back_to_slide() {
    assert_eq!(TransitionKind::from_form_value("zoom"), TransitionKind::Slide);
    assert_eq!(TransitionKind::from_form_value(""), TransitionKind::Slide);
}

#[test]
fn strict_parse_rejects_unknown() {
    assert!(matches!(
        TransitionKind::parse_strict("zoom"),
        Err(GifError::Transition(_))
    ));
    assert!(matches!(
        TransitionKind::parse_strict("   "),
        Err(GifError::Transition(_))
    ));
    assert_eq!(
        TransitionKind::parse_strict("slide").unwrap(),
        TransitionKind::Slide
    );
}
