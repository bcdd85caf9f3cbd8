//! Seeded sampling primitives over a [`Rand`] source.

use std::f64::consts::TAU;

use tinyrand::Rand;

/// Uniform draw on [0, 1].
#[inline]
pub fn uniform(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

/// Standard normal draw via the Box-Muller transform.
#[inline]
pub fn standard_normal(rand: &mut impl Rand) -> f64 {
    let radial = loop {
        let value = uniform(rand);
        // ln(0) is a singularity
        if value > 0.0 {
            break value;
        }
    };
    let angular = uniform(rand);
    (-2.0 * radial.ln()).sqrt() * (TAU * angular).cos()
}

/// Exact Poisson draw by Knuth's product-of-uniforms method. Rates above the
/// threshold are split in half and the halves summed, keeping the product from
/// underflowing while remaining exact.
pub fn poisson(rate: f64, rand: &mut impl Rand) -> u16 {
    debug_assert!(rate.is_finite() && rate >= 0.0, "invalid rate {rate}");
    const SPLIT_THRESHOLD: f64 = 30.0;
    if rate > SPLIT_THRESHOLD {
        let half = 0.5 * rate;
        return poisson(half, rand) + poisson(half, rand);
    }
    let threshold = (-rate).exp();
    let mut count = 0;
    let mut product = uniform(rand);
    while product > threshold {
        count += 1;
        product *= uniform(rand);
    }
    count
}

/// Derives an independent seed for the given substream using a
/// splitmix64-style finalizer, so that concurrently simulated fixtures never
/// share a random stream.
#[inline]
pub fn substream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}
