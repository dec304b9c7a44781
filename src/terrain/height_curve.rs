// src/terrain/height_curve.rs
use serde::{Deserialize, Serialize};

/// Monotone height-response curve, evaluated on normalized heights before
/// the height multiplier is applied. Piecewise linear between keyframes.
///
/// Every mesh job receives its own clone of the curve, so evaluation never
/// shares state between worker threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightCurve {
    keys: Vec<[f32; 2]>,
}

impl HeightCurve {
    /// Build a curve from `[t, value]` keyframes. Keys are sorted by `t`;
    /// an empty key list falls back to the identity curve.
    pub fn new(mut keys: Vec<[f32; 2]>) -> Self {
        if keys.is_empty() {
            return Self::linear();
        }
        keys.sort_by(|a, b| a[0].total_cmp(&b[0]));
        HeightCurve { keys }
    }

    /// Identity response: height passes through unchanged.
    pub fn linear() -> Self {
        HeightCurve {
            keys: vec![[0.0, 0.0], [1.0, 1.0]],
        }
    }

    pub fn keys(&self) -> &[[f32; 2]] {
        &self.keys
    }

    /// Evaluate the curve at `t`, clamping outside the keyed range.
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first[0] {
            return first[1];
        }
        if t >= last[0] {
            return last[1];
        }

        for pair in self.keys.windows(2) {
            let [t0, v0] = pair[0];
            let [t1, v1] = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                let blend = (t - t0) / span;
                return v0 + (v1 - v0) * blend;
            }
        }

        last[1]
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Identity curve passes values straight through
    #[test]
    fn test_linear_curve() {
        let curve = HeightCurve::linear();
        assert_eq!(curve.evaluate(0.0), 0.0);
        assert_eq!(curve.evaluate(1.0), 1.0);
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
    }

    // Values outside the keyed range clamp to the end keys
    #[test]
    fn test_clamped_ends() {
        let curve = HeightCurve::new(vec![[0.0, 0.1], [1.0, 0.9]]);
        assert_eq!(curve.evaluate(-0.5), 0.1);
        assert_eq!(curve.evaluate(1.5), 0.9);
    }

    // A water-shelf curve flattens low terrain and keeps peaks
    #[test]
    fn test_shelf_curve_interpolation() {
        let curve = HeightCurve::new(vec![[0.0, 0.0], [0.4, 0.0], [1.0, 1.0]]);
        assert_eq!(curve.evaluate(0.2), 0.0);
        assert!((curve.evaluate(0.7) - 0.5).abs() < 1e-6);
        assert_eq!(curve.evaluate(1.0), 1.0);
    }

    // Keyframes are sorted on construction
    #[test]
    fn test_unsorted_keys_are_sorted() {
        let curve = HeightCurve::new(vec![[1.0, 1.0], [0.0, 0.0], [0.5, 0.2]]);
        assert_eq!(curve.keys()[0], [0.0, 0.0]);
        assert!((curve.evaluate(0.5) - 0.2).abs() < 1e-6);
    }
}
