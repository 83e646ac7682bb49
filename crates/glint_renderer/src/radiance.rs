//! Radiance estimation by photon density.
//!
//! A photon counts towards a query when it lies strictly inside the search
//! disk and arrived from the side the query normal faces. At most
//! `max_photons` are used; when more qualify, the earliest stored ones win,
//! exactly as a front-to-back scan of the map would pick them.

use crate::PhotonMap;
use glint_math::{Color, Vec3};
use std::f32::consts::PI;

/// Photons accepted by one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gathered {
    /// Summed power of the accepted photons
    pub power: Color,
    /// Number of accepted photons, never above the cap
    pub count: usize,
}

impl Gathered {
    /// Flat-disk density estimate: power per photon per unit area.
    pub fn radiance(&self, search_radius: f32) -> Color {
        if self.count == 0 {
            return Color::ZERO;
        }
        let area = PI * search_radius * search_radius;
        self.power / (area * self.count as f32)
    }
}

impl PhotonMap {
    /// Collect photons around `point` through the k-d tree.
    pub fn gather(&self, point: Vec3, normal: Vec3, search_radius: f32, max_photons: usize) -> Gathered {
        let photons = self.photons();

        let mut accepted = Vec::new();
        self.indices_within(point, search_radius, |i| {
            if photons[i as usize].direction.dot(normal) > 0.0 {
                accepted.push(i);
            }
        });

        // Sorting also fixes the summation order
        accepted.sort_unstable();
        accepted.truncate(max_photons);

        let power = accepted.iter().map(|&i| photons[i as usize].power).sum();
        Gathered {
            power,
            count: accepted.len(),
        }
    }

    /// Reference scan over every photon, stopping at the cap.
    pub fn gather_linear(&self, point: Vec3, normal: Vec3, search_radius: f32, max_photons: usize) -> Gathered {
        let radius_sq = search_radius * search_radius;
        let mut power = Color::ZERO;
        let mut count = 0;

        for photon in self.photons() {
            if count >= max_photons {
                break;
            }
            if (photon.position - point).length_squared() < radius_sq && photon.direction.dot(normal) > 0.0 {
                power += photon.power;
                count += 1;
            }
        }

        Gathered { power, count }
    }

    /// Outgoing diffuse radiance estimate at a surface point.
    ///
    /// Zero when no photon qualifies. Safe to call from many threads.
    pub fn estimate_radiance(&self, point: Vec3, normal: Vec3, search_radius: f32, max_photons: usize) -> Color {
        self.gather(point, normal, search_radius, max_photons)
            .radiance(search_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Photon;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scattered_map(n: usize, seed: u64) -> PhotonMap {
        let mut rng = StdRng::seed_from_u64(seed);
        let photons = (0..n)
            .map(|_| {
                let position = Vec3::new(rng.gen_range(-2.0..2.0), rng.gen_range(-0.1..0.1), rng.gen_range(-2.0..2.0));
                let direction = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
                    .normalize();
                let power = Color::new(rng.gen(), rng.gen(), rng.gen()) * 0.01;
                Photon::new(position, power, direction)
            })
            .collect();
        PhotonMap::new(photons)
    }

    #[test]
    fn test_empty_map_gives_zero() {
        let map = PhotonMap::empty();
        assert_eq!(map.estimate_radiance(Vec3::ZERO, Vec3::Y, 1.0, 100), Color::ZERO);
    }

    #[test]
    fn test_density_estimate() {
        let photons = vec![
            Photon::new(Vec3::ZERO, Color::new(1.0, 2.0, 3.0), Vec3::Y),
            Photon::new(Vec3::new(0.1, 0.0, 0.0), Color::new(3.0, 2.0, 1.0), Vec3::Y),
        ];
        let map = PhotonMap::new(photons);

        let radiance = map.estimate_radiance(Vec3::ZERO, Vec3::Y, 0.5, 100);
        let expected = Color::splat(4.0) / (PI * 0.25 * 2.0);
        assert!((radiance - expected).length() < 1e-5);
    }

    #[test]
    fn test_rejects_photons_from_behind() {
        let photons = vec![
            Photon::new(Vec3::ZERO, Color::ONE, -Vec3::Y),
            Photon::new(Vec3::ZERO, Color::ONE, Vec3::new(1.0, 0.0, 0.0)),
        ];
        let map = PhotonMap::new(photons);

        // Neither arrived from the +Y side (dot <= 0)
        assert_eq!(map.gather(Vec3::ZERO, Vec3::Y, 1.0, 100).count, 0);
        assert_eq!(map.gather(Vec3::ZERO, -Vec3::Y, 1.0, 100).count, 1);
    }

    #[test]
    fn test_radius_is_exclusive() {
        let map = PhotonMap::new(vec![Photon::new(Vec3::new(0.5, 0.0, 0.0), Color::ONE, Vec3::Y)]);
        assert_eq!(map.gather(Vec3::ZERO, Vec3::Y, 0.5, 10).count, 0);
        assert_eq!(map.gather(Vec3::ZERO, Vec3::Y, 0.51, 10).count, 1);
    }

    #[test]
    fn test_cap_keeps_earliest_photons() {
        let photons: Vec<Photon> = (0..10)
            .map(|i| Photon::new(Vec3::new(0.01 * i as f32, 0.0, 0.0), Color::splat(i as f32), Vec3::Y))
            .collect();
        let map = PhotonMap::new(photons);

        let gathered = map.gather(Vec3::ZERO, Vec3::Y, 1.0, 3);
        assert_eq!(gathered.count, 3);
        // Photons 0, 1 and 2
        assert_eq!(gathered.power, Color::splat(3.0));
    }

    #[test]
    fn test_tree_matches_linear_scan() {
        let map = scattered_map(4000, 17);
        let mut rng = StdRng::seed_from_u64(18);

        for _ in 0..100 {
            let point = Vec3::new(rng.gen_range(-2.0..2.0), 0.0, rng.gen_range(-2.0..2.0));
            let normal = Vec3::new(rng.gen_range(-1.0..1.0), 1.0, rng.gen_range(-1.0..1.0)).normalize();
            let radius = rng.gen_range(0.05..0.6);
            let cap = rng.gen_range(1..150);

            let fast = map.gather(point, normal, radius, cap);
            let slow = map.gather_linear(point, normal, radius, cap);
            assert_eq!(fast, slow);
        }
    }

    #[test]
    fn test_larger_radius_never_finds_fewer() {
        let map = scattered_map(3000, 5);
        let point = Vec3::new(0.3, 0.0, -0.2);
        let cap = 120;

        let mut previous = 0;
        for step in 1..=20 {
            let radius = 0.05 * step as f32;
            let count = map.gather(point, Vec3::Y, radius, cap).count;
            assert!(count >= previous, "radius {} found {} < {}", radius, count, previous);
            assert!(count <= cap);
            previous = count;
        }
        assert_eq!(previous, cap);
    }
}
