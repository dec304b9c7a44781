// src/terrain/noise/falloff.rs
use crate::terrain::height_map::HeightMap;

// Shape constants for the attenuation curve.
const CURVE_SHARPNESS: f32 = 3.0;
const CURVE_MIDPOINT: f32 = 2.2;

/// Generate a radial attenuation mask: 0 near the center, rising smoothly
/// to 1 at the square's edge. Subtracting it from a height field carves an
/// island shape out of the landmass.
///
/// The mask depends only on its size. It is computed once per map size and
/// reused; seed and viewer state play no part.
pub fn generate_falloff_map(size: usize) -> HeightMap {
    let mut map = HeightMap::new(size, size);

    for y in 0..size {
        for x in 0..size {
            let nx = x as f32 / size as f32 * 2.0 - 1.0;
            let ny = y as f32 / size as f32 * 2.0 - 1.0;

            // Chebyshev distance as the radial proxy keeps the mask square.
            let value = nx.abs().max(ny.abs());
            map.set(x, y, falloff_curve(value));
        }
    }

    map
}

// v^a / (v^a + (b - b*v)^a), flat near 0 and saturating toward 1.
fn falloff_curve(value: f32) -> f32 {
    let a = CURVE_SHARPNESS;
    let b = CURVE_MIDPOINT;
    let rising = value.powf(a);
    rising / (rising + (b - b * value).powf(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Flat center, saturated border, everything in range
    #[test]
    fn test_falloff_profile() {
        let size = 32;
        let map = generate_falloff_map(size);

        for &value in map.values() {
            assert!((0.0..=1.0).contains(&value));
        }
        assert!(map.get(size / 2, size / 2) < 0.05);
        assert!(map.get(0, 0) > 0.95);
        assert!(map.get(0, size - 1) > 0.95);
    }

    // Mask is mirror-symmetric around the center
    #[test]
    fn test_falloff_symmetry() {
        let size = 16;
        let map = generate_falloff_map(size);

        // Normalized coordinates negate between x and size - x, and the
        // curve only sees absolute values.
        for y in 1..size {
            for x in 1..size {
                assert_eq!(map.get(x, y), map.get(size - x, y));
                assert_eq!(map.get(x, y), map.get(x, size - y));
            }
        }
    }

    // Same size always produces the same mask
    #[test]
    fn test_falloff_deterministic() {
        assert_eq!(generate_falloff_map(24), generate_falloff_map(24));
    }
}
