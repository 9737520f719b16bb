//! Fractal (multi-octave) noise for height-field synthesis.
//!
//! Each octave doubles the frequency and halves the amplitude; the sum is
//! normalized by the total amplitude so the output range is independent of
//! the octave count.
use noise::{NoiseFn, Perlin};

/// Seeded fractal noise sampler over 2D Perlin octaves.
///
/// Pure and stateless after construction: the same `(x, z, frequency)` always
/// yields the same value for a given seed, so grid cells can be sampled in
/// any order (or in parallel).
#[derive(Debug, Clone)]
pub struct FractalNoise {
    octaves: u32,
    perlin: Perlin,
}

impl FractalNoise {
    pub fn new(seed: u32, octaves: u32) -> Self {
        Self {
            octaves: octaves.max(1),
            perlin: Perlin::new(seed),
        }
    }

    /// Evaluate the fractal noise at `(x, z)` with the given base frequency.
    ///
    /// Returns a value in `[0, 1]`; vertical scaling is the caller's job.
    pub fn sample(&self, x: f64, z: f64, frequency: f64) -> f32 {
        let mut value = 0.0f64;
        let mut amp = 1.0f64;
        let mut freq = frequency;
        let mut total_amp = 0.0f64;
        for _ in 0..self.octaves {
            value += amp * self.perlin.get([x * freq, z * freq]);
            total_amp += amp;
            amp *= 0.5;
            freq *= 2.0;
        }
        // Perlin octaves are in [-1, 1]; map the amplitude-normalized sum
        // onto the unit interval.
        ((value / total_amp) * 0.5 + 0.5) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_inputs_is_deterministic() {
        let a = FractalNoise::new(42, 10);
        let b = FractalNoise::new(42, 10);
        for i in 0..50 {
            let x = i as f64 * 1.7;
            let z = i as f64 * 0.3;
            assert_eq!(a.sample(x, z, 0.01), b.sample(x, z, 0.01));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = FractalNoise::new(1, 6);
        let b = FractalNoise::new(2, 6);
        let diverged = (0..100).any(|i| {
            let x = i as f64 * 0.91;
            a.sample(x, x * 0.5, 0.05) != b.sample(x, x * 0.5, 0.05)
        });
        assert!(diverged, "seeds 1 and 2 produced identical fields");
    }

    #[test]
    fn output_stays_in_unit_range_for_any_octave_count() {
        for octaves in [1, 2, 4, 8, 16] {
            let noise = FractalNoise::new(7, octaves);
            for i in 0..200 {
                let v = noise.sample(i as f64 * 0.37, i as f64 * 0.11, 0.02);
                assert!(
                    (0.0..=1.0).contains(&v),
                    "octaves={octaves}: sample {v} escaped [0, 1]"
                );
            }
        }
    }

    #[test]
    fn field_is_non_constant() {
        let noise = FractalNoise::new(42, 8);
        let vals: Vec<f32> = (0..64)
            .map(|i| noise.sample(i as f64, i as f64 * 0.7, 0.05))
            .collect();
        let min = vals.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = vals.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.01);
    }
}
