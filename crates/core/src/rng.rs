//! RNG module - seeded randomness for spawns and ejections
//!
//! The board draws piece styles and colors uniformly at random, and jitters
//! the trajectories of cubes thrown off by a line clear. Both go through one
//! small LCG so that a seed reproduces a whole session.

use crate::types::{PieceStyle, PALETTE_SIZE};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
    seed: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would stay at the increment forever; nudge it.
        let state = if seed == 0 { 1 } else { seed };
        Self { state, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max.max(1)
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniformly chosen piece style.
    pub fn next_style(&mut self) -> PieceStyle {
        let idx = self.next_range(PieceStyle::ALL.len() as u32) as usize;
        PieceStyle::ALL[idx]
    }

    /// Uniformly chosen cube color index.
    pub fn next_palette(&mut self) -> u8 {
        self.next_range(PALETTE_SIZE as u32) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimpleRng::new(42);
        let mut b = SimpleRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        let first = rng.next_u32();
        assert_ne!(first, rng.next_u32());
        assert_eq!(rng.seed(), 0);
    }

    #[test]
    fn test_next_f32_in_unit_interval() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_every_style_is_drawn() {
        let mut rng = SimpleRng::new(12345);
        let mut seen = [false; 7];
        for _ in 0..500 {
            let style = rng.next_style();
            let idx = PieceStyle::ALL.iter().position(|&s| s == style).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_palette_in_range() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..200 {
            assert!(rng.next_palette() < PALETTE_SIZE);
        }
    }
}
