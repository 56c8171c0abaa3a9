use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::NoiseGenerator;

// Pseudorandom permutation of 0..=255, stored twice so that
// perm[perm[xi + 1] + yi + 1] never needs a wrap check
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    pub fn new(seed: u64) -> Self {
        let mut p: Vec<u8> = (0..=255u8).collect();
        // Local generator owned by this table, nothing process-wide
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        p.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { perm }
    }

    #[inline]
    pub fn get(&self, i: usize) -> u8 {
        self.perm[i]
    }

    // The 256 distinct entries, before doubling
    pub fn entries(&self) -> &[u8] {
        &self.perm[..256]
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

// The fixed set of four corner gradients, picked by `hash % 4`.
// Diagonal vectors are the standard; the axis-aligned set is the older
// variant and is only used when asked for explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientSet {
    #[default]
    Diagonal,
    AxisAligned,
}

impl GradientSet {
    const DIAGONAL: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)];
    const AXIS_ALIGNED: [(f64, f64); 4] = [(0.0, 1.0), (0.0, -1.0), (1.0, 0.0), (-1.0, 0.0)];

    pub fn vectors(self) -> &'static [(f64, f64); 4] {
        match self {
            GradientSet::Diagonal => &Self::DIAGONAL,
            GradientSet::AxisAligned => &Self::AXIS_ALIGNED,
        }
    }
}

// Single-octave 2D Perlin noise over continuous coordinates
#[derive(Debug, Clone)]
pub struct Perlin2D {
    seed: u64,
    gradients: GradientSet,
    perm: PermutationTable,
}

impl Perlin2D {
    pub fn new(seed: u64) -> Self {
        Self::with_gradients(seed, GradientSet::default())
    }

    pub fn with_gradients(seed: u64, gradients: GradientSet) -> Self {
        let perm = PermutationTable::new(seed);
        debug!(seed, ?gradients, "built permutation table");
        Self {
            seed,
            gradients,
            perm,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn gradients(&self) -> GradientSet {
        self.gradients
    }

    pub fn permutation(&self) -> &PermutationTable {
        &self.perm
    }

    // 6t^5 − 15t^4 + 10t^3, first and second derivatives vanish at 0 and 1
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Dot product of the hashed corner gradient with the offset (x, y)
    #[inline]
    fn grad(&self, hash: u8, x: f64, y: f64) -> f64 {
        let (gx, gy) = self.gradients.vectors()[(hash % 4) as usize];
        gx * x + gy * y
    }

    #[inline]
    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm.get(self.perm.get(xi) as usize + yi)
    }

    // Raw noise at (x, y), roughly within [−√2, √2]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;

        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let n00 = self.grad(self.hash(xi, yi), xf, yf);
        let n10 = self.grad(self.hash(xi + 1, yi), xf - 1.0, yf);
        let n01 = self.grad(self.hash(xi, yi + 1), xf, yf - 1.0);
        let n11 = self.grad(self.hash(xi + 1, yi + 1), xf - 1.0, yf - 1.0);

        let x1 = Self::lerp(n00, n10, u);
        let x2 = Self::lerp(n01, n11, u);
        Self::lerp(x1, x2, v)
    }
}

impl NoiseGenerator for Perlin2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.value(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::{GradientSet, PermutationTable, Perlin2D};
    use crate::NoiseGenerator;

    #[test]
    fn permutation_is_a_shuffle_of_identity() {
        let table = PermutationTable::new(7);
        let mut seen = [false; 256];
        for &v in table.entries() {
            assert!(!seen[v as usize], "duplicate entry {v}");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        for i in 0..256 {
            assert_eq!(table.get(i), table.get(i + 256));
        }
    }

    #[test]
    fn permutation_depends_on_seed() {
        assert_eq!(PermutationTable::new(3), PermutationTable::new(3));
        assert_ne!(PermutationTable::new(3), PermutationTable::new(4));
    }

    #[test]
    fn perlin2_determinism() {
        let p1 = Perlin2D::new(1234);
        let p2 = Perlin2D::new(1234);
        for &(x, y) in &[(10.5, -3.7), (0.25, 0.75), (1000.3, 7.9)] {
            assert_eq!(p1.value(x, y).to_bits(), p2.value(x, y).to_bits());
            assert_eq!(p1.value(x, y).to_bits(), p1.get2(x, y).to_bits());
        }
    }

    #[test]
    fn zero_seed_is_valid() {
        let p = Perlin2D::new(0);
        assert!(p.value(3.3, 4.4).is_finite());
    }

    #[test]
    fn zero_on_lattice_points() {
        // Offset to every corner is zero at integer coordinates
        let p = Perlin2D::new(99);
        for x in -3..5 {
            for y in -3..5 {
                assert_eq!(p.value(x as f64, y as f64), 0.0);
            }
        }
    }

    #[test]
    fn diagonal_gradients_stay_bounded() {
        let p = Perlin2D::new(2);
        let bound = std::f64::consts::SQRT_2 + 1e-9;
        let mut nonzero = false;
        for i in 0..400 {
            for j in 0..400 {
                let v = p.value(i as f64 * 0.137 - 20.0, j as f64 * 0.091 - 15.0);
                assert!(v.abs() <= bound, "value {v} out of range");
                nonzero |= v.abs() > 1e-3;
            }
        }
        assert!(nonzero);
    }

    #[test]
    fn axis_aligned_variant_differs() {
        let diag = Perlin2D::new(5);
        let axis = Perlin2D::with_gradients(5, GradientSet::AxisAligned);
        assert_eq!(axis.gradients(), GradientSet::AxisAligned);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 0.31 + 0.1;
            (diag.value(x, x * 0.7) - axis.value(x, x * 0.7)).abs() > 1e-9
        });
        assert!(differs);
        for i in 0..200 {
            let v = axis.value(i as f64 * 0.173, i as f64 * 0.059);
            assert!(v.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn negative_coordinates_are_total() {
        let p = Perlin2D::new(11);
        let v = p.value(-1234.56, -0.001);
        assert!(v.is_finite());
    }
}
