//! Formation factor: how far the cloud has assembled into its target shape.
//!
//! The factor chases 1 while a hand is tracked and relaxes back to 0 when it
//! is lost. Each frame closes a fixed fraction of the remaining gap, so the
//! approach is exponential and never overshoots.

use crate::shapes::ShapeId;
use serde::{Deserialize, Serialize};

/// Per-frame approach rates of the formation factor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormationRates {
    /// Fraction of the gap to 1 closed per frame while input is present.
    pub attack: f32,
    /// Fraction of the gap to 0 closed per frame while input is absent.
    pub release: f32,
}

impl Default for FormationRates {
    fn default() -> Self {
        Self {
            attack: 0.1,
            release: 0.02,
        }
    }
}

/// Which shape is active and how formed the cloud is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationState {
    /// Formation the cloud blends toward. Written by hotkeys and gestures.
    pub active_shape: ShapeId,
    factor: f32,
    rates: FormationRates,
}

impl FormationState {
    /// Fully scattered, targeting the sphere.
    pub fn new(rates: FormationRates) -> Self {
        Self {
            active_shape: ShapeId::Sphere,
            factor: 0.0,
            rates,
        }
    }

    /// Current formation factor in `[0, 1]`.
    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Force the factor, clamped to `[0, 1]`.
    pub fn set_factor(&mut self, factor: f32) {
        self.factor = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Approach rates this state was built with.
    #[inline]
    pub fn rates(&self) -> FormationRates {
        self.rates
    }

    /// Advance one frame.
    pub fn update(&mut self, has_input: bool) {
        let (goal, rate) = if has_input {
            (1.0, self.rates.attack)
        } else {
            (0.0, self.rates.release)
        };
        self.factor += (goal - self.factor) * rate;
        // f32 rounding can land a hair outside the interval
        self.factor = self.factor.clamp(0.0, 1.0);
    }
}

impl Default for FormationState {
    fn default() -> Self {
        Self::new(FormationRates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_scattered() {
        let state = FormationState::default();
        assert_eq!(state.factor(), 0.0);
        assert_eq!(state.active_shape, ShapeId::Sphere);
    }

    #[test]
    fn test_first_steps() {
        let mut state = FormationState::default();
        state.update(true);
        assert!((state.factor() - 0.1).abs() < 1e-6);
        state.update(true);
        assert!((state.factor() - 0.19).abs() < 1e-6);

        state.set_factor(1.0);
        state.update(false);
        assert!((state.factor() - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_input_rises_toward_one() {
        let mut state = FormationState::default();
        let mut last = state.factor();
        for _ in 0..50 {
            state.update(true);
            assert!(state.factor() > last);
            assert!(state.factor() <= 1.0);
            last = state.factor();
        }
        for _ in 0..1000 {
            state.update(true);
            assert!(state.factor() <= 1.0);
        }
        assert!(state.factor() > 0.999);
    }

    #[test]
    fn test_no_input_decays_toward_zero() {
        let mut state = FormationState::default();
        state.set_factor(1.0);
        let mut last = state.factor();
        for _ in 0..200 {
            state.update(false);
            assert!(state.factor() < last);
            assert!(state.factor() >= 0.0);
            last = state.factor();
        }
        assert!(state.factor() < 0.02);
    }

    #[test]
    fn test_release_slower_than_attack() {
        let mut rising = FormationState::default();
        let mut falling = FormationState::default();
        falling.set_factor(1.0);
        for _ in 0..10 {
            rising.update(true);
            falling.update(false);
        }
        assert!(rising.factor() > 1.0 - falling.factor());
    }

    #[test]
    fn test_set_factor_clamps() {
        let mut state = FormationState::default();
        state.set_factor(3.0);
        assert_eq!(state.factor(), 1.0);
        state.set_factor(-1.0);
        assert_eq!(state.factor(), 0.0);
        state.set_factor(f32::NAN);
        assert_eq!(state.factor(), 0.0);
    }

    #[test]
    fn test_keeps_configured_rates() {
        let rates = FormationRates {
            attack: 0.5,
            release: 0.25,
        };
        let mut state = FormationState::new(rates);
        assert_eq!(state.rates(), rates);
        state.update(true);
        assert!((state.factor() - 0.5).abs() < 1e-6);
    }
}
