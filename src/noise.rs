//! Seeded 3D simplex noise for the water surface.
//!
//! The permutation tables are built once by a Fisher-Yates shuffle and never
//! change afterwards, so a single generator can be shared freely between the
//! render thread and the height worker.

use noise::NoiseFn;
use rand::{Rng, RngCore};

/// Skew factor into simplex space (3D)
const F3: f64 = 1.0 / 3.0;

/// Unskew factor back to cartesian space (3D)
const G3: f64 = 1.0 / 6.0;

/// Edge midpoints of a cube, used as gradient directions
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Where the shuffle randomness comes from
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseSeed {
    /// Non-deterministic, drawn from the thread-local RNG
    Entropy,
    /// Expanded through the sine hash
    Number(f64),
    /// Numeric strings behave like `Number`, anything else is folded into one
    Text(String),
}

impl From<f64> for NoiseSeed {
    fn from(value: f64) -> Self {
        NoiseSeed::Number(value)
    }
}

impl From<u32> for NoiseSeed {
    fn from(value: u32) -> Self {
        NoiseSeed::Number(value as f64)
    }
}

impl From<&str> for NoiseSeed {
    fn from(value: &str) -> Self {
        NoiseSeed::Text(value.to_string())
    }
}

impl From<String> for NoiseSeed {
    fn from(value: String) -> Self {
        NoiseSeed::Text(value)
    }
}

impl<T: Into<NoiseSeed>> From<Option<T>> for NoiseSeed {
    fn from(value: Option<T>) -> Self {
        value.map_or(NoiseSeed::Entropy, Into::into)
    }
}

/// Deterministic [0, 1) sequence: frac(sin(i + seed) * 10000) for i = 0, 1, 2, ...
fn sine_hash(seed: f64) -> impl FnMut() -> f64 {
    let mut i = 0u32;
    move || {
        let x = (i as f64 + seed).sin() * 10000.0;
        i += 1;
        x - x.floor()
    }
}

fn text_to_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => text
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32)) as f64,
    }
}

/// Immutable simplex noise generator
#[derive(Clone)]
pub struct SimplexNoise {
    perm: [u8; 512],
    perm_mod12: [u8; 512],
}

impl std::fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimplexNoise")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

impl SimplexNoise {
    /// Create a generator from a seed
    pub fn new(seed: impl Into<NoiseSeed>) -> Self {
        match seed.into() {
            NoiseSeed::Entropy => Self::from_rng(&mut rand::thread_rng()),
            NoiseSeed::Number(value) => Self::from_fn(sine_hash(value)),
            NoiseSeed::Text(text) => Self::from_fn(sine_hash(text_to_number(&text))),
        }
    }

    /// Create a generator that shuffles with an explicit random source
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self::from_fn(|| rng.gen::<f64>())
    }

    /// Create a generator from any closure yielding values in [0, 1)
    pub fn from_fn(mut random: impl FnMut() -> f64) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);

        // Fisher-Yates, top down
        for n in (0..256usize).rev() {
            let k = ((random() * (n + 1) as f64).floor() as usize).min(n);
            p.swap(n, k);
        }

        let perm: [u8; 512] = std::array::from_fn(|i| p[i & 255]);
        let perm_mod12: [u8; 512] = std::array::from_fn(|i| perm[i] % 12);

        Self { perm, perm_mod12 }
    }

    /// Permutation table (0..255 shuffled, stored twice)
    pub fn perm(&self) -> &[u8; 512] {
        &self.perm
    }

    /// Sample 3D simplex noise at position
    ///
    /// Returns value in range [-1, 1] (approximately)
    pub fn sample(&self, xin: f64, yin: f64, zin: f64) -> f64 {
        // Skew input space to find the containing simplex cell
        let s = (xin + yin + zin) * F3;
        let i = (xin + s).floor();
        let j = (yin + s).floor();
        let k = (zin + s).floor();

        // Unskew the cell origin back to (x, y, z) space
        let t = (i + j + k) * G3;
        let x0 = xin - (i - t);
        let y0 = yin - (j - t);
        let z0 = zin - (k - t);

        // Offsets of the second and third corners, picked by coordinate rank
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        // Wrap lattice coordinates into the table
        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;

        let gi0 = self.gradient_index(ii, jj, kk);
        let gi1 = self.gradient_index(ii + i1, jj + j1, kk + k1);
        let gi2 = self.gradient_index(ii + i2, jj + j2, kk + k2);
        let gi3 = self.gradient_index(ii + 1, jj + 1, kk + 1);

        let n0 = corner(gi0, x0, y0, z0);
        let n1 = corner(gi1, x1, y1, z1);
        let n2 = corner(gi2, x2, y2, z2);
        let n3 = corner(gi3, x3, y3, z3);

        32.0 * (n0 + n1 + n2 + n3)
    }

    fn gradient_index(&self, i: usize, j: usize, k: usize) -> usize {
        let pk = self.perm[k] as usize;
        let pj = self.perm[j + pk] as usize;
        self.perm_mod12[i + pj] as usize
    }
}

/// Contribution of one simplex corner: max(0, 0.6 - d²)^4 * (g · d)
fn corner(gi: usize, x: f64, y: f64, z: f64) -> f64 {
    let t = 0.6 - x * x - y * y - z * z;
    if t <= 0.0 {
        return 0.0;
    }
    let g = GRAD3[gi];
    let t2 = t * t;
    t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
}

impl NoiseFn<f64, 3> for SimplexNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_permutation(table: &[u8]) -> bool {
        let mut seen = [false; 256];
        for &v in table {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        seen.iter().all(|&s| s)
    }

    #[test]
    fn test_perm_table_is_doubled_permutation() {
        let noise = SimplexNoise::new(42u32);
        let perm = noise.perm();

        assert!(is_permutation(&perm[..256]));
        assert_eq!(&perm[..256], &perm[256..]);
    }

    #[test]
    fn test_constant_random_source_still_permutes() {
        let noise = SimplexNoise::from_rng(&mut StepRng::new(0, 0));
        assert!(is_permutation(&noise.perm()[..256]));
    }

    #[test]
    fn test_sample_is_deterministic() {
        let a = SimplexNoise::new(7.5);
        let b = SimplexNoise::new(7.5);

        for &(x, y, z) in &[(0.1, 0.2, 0.3), (-4.2, 17.9, 0.0), (123.4, -56.7, 8.9)] {
            let first = a.sample(x, y, z);
            assert_eq!(first.to_bits(), a.sample(x, y, z).to_bits());
            assert_eq!(first.to_bits(), b.sample(x, y, z).to_bits());
        }
    }

    #[test]
    fn test_sample_is_bounded() {
        let noise = SimplexNoise::new(1234u32);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..10_000 {
            let x = rng.gen_range(-100.0..100.0);
            let y = rng.gen_range(-100.0..100.0);
            let z = rng.gen_range(-100.0..100.0);
            let value = noise.sample(x, y, z);
            assert!(value.is_finite());
            assert!((-1.05..=1.05).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_seeds_change_the_field() {
        let a = SimplexNoise::new(1u32);
        let b = SimplexNoise::new(2u32);
        assert_ne!(a.perm(), b.perm());
    }

    #[test]
    fn test_zero_seed_is_deterministic() {
        let a = SimplexNoise::new(0.0);
        let b = SimplexNoise::new(0.0);
        assert_eq!(a.perm(), b.perm());
    }

    #[test]
    fn test_numeric_text_seed_matches_number() {
        let text = SimplexNoise::new("42");
        let number = SimplexNoise::new(42u32);
        assert_eq!(text.perm(), number.perm());

        let word = SimplexNoise::new("harbor");
        assert_eq!(word.perm(), SimplexNoise::new("harbor").perm());
    }

    #[test]
    fn test_noise_fn_matches_sample() {
        let noise = SimplexNoise::new(3u32);
        let direct = noise.sample(1.5, -2.5, 0.75);
        assert_eq!(direct, noise.get([1.5, -2.5, 0.75]));
    }

    #[test]
    fn test_lattice_points_are_zero() {
        // Simplex vertices on the main diagonal sit at (n/2, n/2, n/2)
        let noise = SimplexNoise::new(5u32);
        assert!(noise.sample(0.0, 0.0, 0.0).abs() < 1e-12);
        assert!(noise.sample(0.5, 0.5, 0.5).abs() < 1e-12);
        assert!(noise.sample(-1.0, -1.0, -1.0).abs() < 1e-12);
    }
}
