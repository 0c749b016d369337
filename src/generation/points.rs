//! Seeded uniform site placement
//!
//! Sites are drawn from a ChaCha8 stream so the same seed, count and extents
//! always produce the same site set on every platform.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geom::Point;

/// Generate `count` points uniformly distributed in `[0, width) x [0, height)`
///
/// Each point draws its x coordinate first, then its y coordinate.
///
/// # Example
///
/// ```rust
/// use rust_fortune_voronoi::generation::generate_random_points;
///
/// let points = generate_random_points(1000, 800.0, 600.0, 42);
/// assert_eq!(points.len(), 1000);
/// assert!(points.iter().all(|p| p.x < 800.0 && p.y < 600.0));
/// ```
pub fn generate_random_points(count: usize, width: f64, height: f64, seed: u64) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let x = rng.gen::<f64>() * width;
            let y = rng.gen::<f64>() * height;
            Point::new(x, y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_count() {
        for count in [1, 10, 100, 5000] {
            let points = generate_random_points(count, 10.0, 10.0, 42);
            assert_eq!(points.len(), count);
        }
    }

    #[test]
    fn test_empty() {
        assert!(generate_random_points(0, 10.0, 10.0, 42).is_empty());
    }

    #[test]
    fn test_points_inside_extents() {
        let points = generate_random_points(2000, 320.0, 240.0, 7);
        for p in &points {
            assert!(p.x >= 0.0 && p.x < 320.0, "x out of range: {}", p.x);
            assert!(p.y >= 0.0 && p.y < 240.0, "y out of range: {}", p.y);
        }
    }

    #[test]
    fn test_determinism() {
        let points1 = generate_random_points(100, 10.0, 10.0, 42);
        let points2 = generate_random_points(100, 10.0, 10.0, 42);
        assert_eq!(points1, points2);
    }

    #[test]
    fn test_different_seeds() {
        let points1 = generate_random_points(100, 10.0, 10.0, 12345);
        let points2 = generate_random_points(100, 10.0, 10.0, 67890);
        assert_ne!(points1, points2, "Different seeds should produce different points");
    }
}
