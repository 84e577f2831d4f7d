//! Step size calculation shared by every incremental action.

/// Modifier flags resolved from the user's bindings for this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IncrementModifiers {
    pub reverse: bool,
    pub large: bool,
    pub fine: bool,
}

impl IncrementModifiers {
    pub const NONE: Self = Self {
        reverse: false,
        large: false,
        fine: false,
    };
}

/// Multipliers applied by the large/fine modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementMultipliers {
    large: f32,
    fine: f32,
}

impl IncrementMultipliers {
    pub const MIN_LARGE: f32 = 1.0;
    pub const MIN_FINE: f32 = 0.01;
    pub const MAX_FINE: f32 = 1.0;

    /// Create multipliers, clamping large to >= 1 and fine to [0.01, 1].
    pub fn new(large: f32, fine: f32) -> Self {
        let large = if large.is_finite() { large.max(Self::MIN_LARGE) } else { Self::MIN_LARGE };
        let fine = if fine.is_finite() {
            fine.clamp(Self::MIN_FINE, Self::MAX_FINE)
        } else {
            Self::MAX_FINE
        };
        Self { large, fine }
    }

    pub fn large(&self) -> f32 {
        self.large
    }

    pub fn fine(&self) -> f32 {
        self.fine
    }
}

impl Default for IncrementMultipliers {
    fn default() -> Self {
        Self::new(5.0, 0.1)
    }
}

/// Signed step for a base increment under the given modifiers.
///
/// Large wins over fine when both are held.
#[inline]
pub fn step(base: f32, modifiers: IncrementModifiers, multipliers: IncrementMultipliers) -> f32 {
    let magnitude = if modifiers.large {
        multipliers.large
    } else if modifiers.fine {
        multipliers.fine
    } else {
        1.0
    };
    let sign = if modifiers.reverse { -1.0 } else { 1.0 };
    base * magnitude * sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mods(reverse: bool, large: bool, fine: bool) -> IncrementModifiers {
        IncrementModifiers { reverse, large, fine }
    }

    #[test]
    fn test_step_table() {
        let m = IncrementMultipliers::default();
        assert_relative_eq!(step(15.0, mods(false, false, false), m), 15.0);
        assert_relative_eq!(step(15.0, mods(false, true, false), m), 75.0);
        assert_relative_eq!(step(15.0, mods(false, false, true), m), 1.5);
        assert_relative_eq!(step(15.0, mods(true, true, false), m), -75.0);
        assert_relative_eq!(step(15.0, mods(true, false, true), m), -1.5);
        assert_relative_eq!(step(15.0, mods(true, false, false), m), -15.0);
        // large beats fine
        assert_relative_eq!(step(15.0, mods(false, true, true), m), 75.0);
        assert_relative_eq!(step(15.0, mods(true, true, true), m), -75.0);
    }

    #[test]
    fn test_multiplier_clamping() {
        let m = IncrementMultipliers::new(0.5, 2.0);
        assert_eq!(m.large(), 1.0);
        assert_eq!(m.fine(), 1.0);

        let m = IncrementMultipliers::new(10.0, 0.0001);
        assert_eq!(m.large(), 10.0);
        assert_eq!(m.fine(), 0.01);

        let m = IncrementMultipliers::new(f32::NAN, f32::INFINITY);
        assert_eq!(m.large(), 1.0);
        assert_eq!(m.fine(), 1.0);
    }
}
