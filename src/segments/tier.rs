//! Tier coordinates: a (size, quality) pair indexing a stat curve.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A (size, quality) coordinate.
///
/// Adding a scalar shifts quality only; adding another tier shifts both.
/// "Not applicable" is modelled as `Option<Tier>::None` by the defs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub size: f32,
    pub quality: f32,
}

impl Tier {
    pub const fn new(size: f32, quality: f32) -> Self {
        Self { size, quality }
    }

    /// Same quality, size shifted by `delta`
    pub fn resized(self, delta: f32) -> Self {
        Self {
            size: self.size + delta,
            quality: self.quality,
        }
    }
}

impl Add for Tier {
    type Output = Tier;
    fn add(self, rhs: Tier) -> Tier {
        Tier::new(self.size + rhs.size, self.quality + rhs.quality)
    }
}

impl Sub for Tier {
    type Output = Tier;
    fn sub(self, rhs: Tier) -> Tier {
        Tier::new(self.size - rhs.size, self.quality - rhs.quality)
    }
}

impl Add<f32> for Tier {
    type Output = Tier;
    fn add(self, rhs: f32) -> Tier {
        Tier::new(self.size, self.quality + rhs)
    }
}

impl Sub<f32> for Tier {
    type Output = Tier;
    fn sub(self, rhs: f32) -> Tier {
        Tier::new(self.size, self.quality - rhs)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}Q{:+}", self.size, self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_shifts_quality_only() {
        let t = Tier::new(2.0, 1.0);
        assert_eq!(t + 1.0, Tier::new(2.0, 2.0));
        assert_eq!(t - 2.0, Tier::new(2.0, -1.0));
    }

    #[test]
    fn test_tier_arithmetic() {
        let a = Tier::new(2.0, 1.0);
        let b = Tier::new(1.0, 0.5);
        assert_eq!(a + b, Tier::new(3.0, 1.5));
        assert_eq!(a - b, Tier::new(1.0, 0.5));
    }

    #[test]
    fn test_resized_keeps_quality() {
        assert_eq!(Tier::new(1.0, 2.0).resized(2.0), Tier::new(3.0, 2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Tier::new(3.0, 1.0).to_string(), "S3Q+1");
        assert_eq!(Tier::new(1.0, -1.0).to_string(), "S1Q-1");
    }
}
