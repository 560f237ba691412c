//! Particle colors.
//!
//! Rendering tint is separate from the motion state: a particle carries one
//! of four fixed accent colors, re-rolled each time it respawns.

use glam::Vec3;
use rand::Rng;

/// The four accent colors particles glow in.
///
/// These match the neon tones of the page theme the animation sits behind,
/// sampled uniformly on every respawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accent {
    /// `#00e676` - bright mint green.
    #[default]
    Mint,
    /// `#6200ea` - deep violet.
    Violet,
    /// `#03dac6` - teal.
    Teal,
    /// `#ff4081` - hot pink.
    Pink,
}

impl Accent {
    /// All accents, in palette order.
    pub const ALL: [Accent; 4] = [Accent::Mint, Accent::Violet, Accent::Teal, Accent::Pink];

    /// RGB components (0.0-1.0).
    pub fn rgb(&self) -> Vec3 {
        match self {
            Accent::Mint => Vec3::new(0.0, 0.902, 0.463),
            Accent::Violet => Vec3::new(0.384, 0.0, 0.918),
            Accent::Teal => Vec3::new(0.012, 0.855, 0.776),
            Accent::Pink => Vec3::new(1.0, 0.251, 0.506),
        }
    }

    /// Pick one of the four accents uniformly.
    pub fn sample<R: Rng>(rng: &mut R) -> Accent {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_rgb_components_in_range() {
        for accent in Accent::ALL {
            let c = accent.rgb();
            assert!(c.min_element() >= 0.0);
            assert!(c.max_element() <= 1.0);
        }
    }

    #[test]
    fn test_sample_covers_palette() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            let accent = Accent::sample(&mut rng);
            let idx = Accent::ALL.iter().position(|a| *a == accent).unwrap();
            counts[idx] += 1;
        }
        for count in counts {
            assert!(count > 700, "accent under-sampled: {:?}", counts);
        }
    }

    #[test]
    fn test_sample_deterministic_with_seed() {
        let a: Vec<Accent> = {
            let mut rng = SmallRng::seed_from_u64(42);
            (0..16).map(|_| Accent::sample(&mut rng)).collect()
        };
        let b: Vec<Accent> = {
            let mut rng = SmallRng::seed_from_u64(42);
            (0..16).map(|_| Accent::sample(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
