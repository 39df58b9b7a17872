pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Quantize a weight in `[0, 1]` to `0..=255`.
pub(crate) fn unit_to_u8_weight(t: f32) -> u16 {
    ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

/// Progress `t_i = i / (n - 1)` for frame `i` of `n` (n >= 2).
pub(crate) fn progress(i: usize, n: usize) -> f32 {
    if n < 2 {
        return 0.0;
    }
    if i + 1 >= n {
        return 1.0;
    }
    (i as f64 / (n - 1) as f64) as f32
}

pub(crate) fn squared_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
