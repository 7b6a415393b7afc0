//! Mathematical helpers for rotation handling.

/// Computes sine and cosine for an angle in degrees.
pub(crate) fn sin_cos_deg(angle_deg: f32) -> (f32, f32) {
    angle_deg.to_radians().sin_cos()
}

#[cfg(test)]
mod tests {
    use super::sin_cos_deg;

    #[test]
    fn sin_cos_deg_matches_quadrants() {
        let (sin, cos) = sin_cos_deg(90.0);
        assert!(sin > 0.999);
        assert!(cos.abs() < 1e-6);
        let (sin, cos) = sin_cos_deg(-90.0);
        assert!(sin < -0.999);
        assert!(cos.abs() < 1e-6);
    }
}
