//! Photon records and the frozen photon map.

use glint_math::{Color, Vec3};
use kd_tree::{KdPoint, KdTree};

/// Light energy deposited on a diffuse surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Photon {
    /// Where the photon landed
    pub position: Vec3,
    /// Carried power (RGB)
    pub power: Color,
    /// Unit vector pointing back along the path it arrived on
    pub direction: Vec3,
}

impl Photon {
    pub fn new(position: Vec3, power: Color, direction: Vec3) -> Self {
        Self {
            position,
            power,
            direction,
        }
    }
}

/// Tree item: a photon's position and its index in the map.
#[derive(Debug, Clone, Copy)]
struct IndexedPosition {
    index: u32,
    position: [f32; 3],
}

impl KdPoint for IndexedPosition {
    type Scalar = f32;
    type Dim = typenum::U3;
    fn at(&self, k: usize) -> f32 {
        self.position[k]
    }
}

/// Read-only collection of photons with a spatial index.
///
/// Photons keep the order they were stored in; radiance queries honour it
/// when the per-estimate cap cuts the neighbourhood short.
pub struct PhotonMap {
    photons: Vec<Photon>,
    tree: Option<KdTree<IndexedPosition>>,
}

impl PhotonMap {
    /// Freeze `photons` and build the index.
    pub fn new(photons: Vec<Photon>) -> Self {
        let tree = if photons.is_empty() {
            None
        } else {
            let items = photons
                .iter()
                .enumerate()
                .map(|(i, p)| IndexedPosition {
                    index: i as u32,
                    position: p.position.to_array(),
                })
                .collect();
            let tree = KdTree::build_by(items, |a, b, k| {
                a.position[k]
                    .partial_cmp(&b.position[k])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            log::debug!("Photon k-d tree built over {} photons", photons.len());
            Some(tree)
        };
        Self { photons, tree }
    }

    /// A map with no photons. Every radiance estimate is zero.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    /// Sum of the power of every stored photon.
    pub fn total_power(&self) -> Color {
        self.photons.iter().map(|p| p.power).sum()
    }

    /// Indices of photons strictly within `radius` of `point`. Visit order
    /// is unspecified.
    pub(crate) fn indices_within(&self, point: Vec3, radius: f32, mut visit: impl FnMut(u32)) {
        let Some(tree) = &self.tree else {
            return;
        };
        let query = IndexedPosition {
            index: u32::MAX,
            position: point.to_array(),
        };
        // Padded so rounding in the tree never drops a photon the exact
        // test below would keep
        let padded = radius * (1.0 + 1e-4) + f32::EPSILON;
        let radius_sq = radius * radius;
        for item in tree.within_radius(&query, padded) {
            if (Vec3::from_array(item.position) - point).length_squared() < radius_sq {
                visit(item.index);
            }
        }
    }
}

impl Default for PhotonMap {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for PhotonMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotonMap")
            .field("photons", &self.photons.len())
            .finish()
    }
}
