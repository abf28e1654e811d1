use thiserror::Error;

/// Smallest cup count the control surface offers.
pub const MIN_CUP_COUNT: usize = 2;
/// Largest cup count the control surface offers.
pub const MAX_CUP_COUNT: usize = 500;
/// Smallest wheel radius the control surface offers.
pub const MIN_RADIUS: f64 = 50.0;
/// Largest wheel radius the control surface offers.
pub const MAX_RADIUS: f64 = 1000.0;

/// Rejected parameter values. Invalid values are refused outright rather than
/// clamped; the interactive controls keep themselves inside the valid range,
/// so in practice only command-line input can hit these.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParameterError {
    #[error("cup count must be at least {MIN_CUP_COUNT}, got {got}")]
    CupCount { got: usize },
    #[error("wheel radius must be positive and finite, got {got}")]
    Radius { got: f64 },
    #[error("wheel rotation must be finite, got {got}")]
    Rotation { got: f64 },
}

/// The three numeric inputs that drive the wheel. Rotation is in radians;
/// the degree form used by the control surface is converted before values
/// arrive here. Only constructible through [`WheelParameters::try_new`], so a
/// held value is always valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelParameters {
    cup_count: usize,
    radius: f64,
    rotation: f64,
}

impl WheelParameters {
    pub fn try_new(cup_count: usize, radius: f64, rotation: f64) -> Result<Self, ParameterError> {
        if cup_count < MIN_CUP_COUNT {
            return Err(ParameterError::CupCount { got: cup_count });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ParameterError::Radius { got: radius });
        }
        if !rotation.is_finite() {
            return Err(ParameterError::Rotation { got: rotation });
        }
        Ok(WheelParameters {
            cup_count,
            radius,
            rotation,
        })
    }

    pub fn cup_count(&self) -> usize {
        self.cup_count
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// True when moving from `other` to `self` invalidates the instance set.
    /// A rotation-only change never does.
    pub fn structurally_differs_from(&self, other: &WheelParameters) -> bool {
        self.cup_count != other.cup_count || self.radius != other.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn accepts_the_smallest_valid_wheel() {
        let params = WheelParameters::try_new(MIN_CUP_COUNT, 50.0, 0.0).unwrap();
        assert_eq!(params.cup_count(), 2);
        assert_eq!(params.radius(), 50.0);
    }

    #[test]
    fn rejects_degenerate_cup_counts() {
        assert_eq!(
            WheelParameters::try_new(0, 500.0, 0.0),
            Err(ParameterError::CupCount { got: 0 })
        );
        assert_eq!(
            WheelParameters::try_new(1, 500.0, 0.0),
            Err(ParameterError::CupCount { got: 1 })
        );
    }

    #[test]
    fn rejects_non_positive_and_non_finite_radii() {
        assert!(matches!(
            WheelParameters::try_new(10, 0.0, 0.0),
            Err(ParameterError::Radius { .. })
        ));
        assert!(matches!(
            WheelParameters::try_new(10, -4.0, 0.0),
            Err(ParameterError::Radius { .. })
        ));
        assert!(matches!(
            WheelParameters::try_new(10, f64::NAN, 0.0),
            Err(ParameterError::Radius { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_rotation() {
        assert!(matches!(
            WheelParameters::try_new(10, 500.0, f64::INFINITY),
            Err(ParameterError::Rotation { .. })
        ));
    }

    #[test]
    fn rotation_alone_is_not_structural() {
        let a = WheelParameters::try_new(10, 500.0, 0.0).unwrap();
        let b = WheelParameters::try_new(10, 500.0, PI).unwrap();
        assert!(!b.structurally_differs_from(&a));

        let more_cups = WheelParameters::try_new(11, 500.0, PI).unwrap();
        let wider = WheelParameters::try_new(10, 600.0, PI).unwrap();
        assert!(more_cups.structurally_differs_from(&a));
        assert!(wider.structurally_differs_from(&a));
    }
}
