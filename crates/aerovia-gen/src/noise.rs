//! Seeded Gaussian noise.
//!
//! `rand` 0.9 ships only uniform sampling, so the standard-normal draw
//! is a Box-Muller transform over two uniforms. The sampler consumes
//! exactly two uniforms per draw, which keeps the generator output a
//! pure function of the seed and the draw order.

use rand::Rng;
use rand::rngs::StdRng;

/// Draw one standard-normal sample (mean 0, std 1) from `rng`.
///
/// Box-Muller transform; the log argument is kept away from zero so the
/// result is always finite.
pub fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Draw a normal sample with the given mean and standard deviation.
pub fn normal(rng: &mut StdRng, mean: f64, std: f64) -> f64 {
    mean + std * standard_normal(rng)
}
