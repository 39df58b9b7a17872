use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
    assert_eq!(mul_div255_u8(200, 255), 200);
    assert_eq!(mul_div255_u8(200, 0), 0);
}

#[test]
fn progress_hits_exact_endpoints() {
    assert_eq!(progress(0, 20), 0.0);
    assert_eq!(progress(19, 20), 1.0);
    assert_eq!(progress(1, 3), 0.5);
    let ts: Vec<f32> = (0..20).map(|i| progress(i, 20)).collect();
    assert!(ts.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn unit_weight_clamps() {
    assert_eq!(unit_to_u8_weight(-1.0), 0);
    assert_eq!(unit_to_u8_weight(0.5), 128);
    assert_eq!(unit_to_u8_weight(7.0), 255);
}

#[test]
fn squared_distance_is_symmetric() {
    assert_eq!(squared_distance([0, 0, 0], [3, 4, 0]), 25);
    assert_eq!(squared_distance([3, 4, 0], [0, 0, 0]), 25);
}
