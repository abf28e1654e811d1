use crate::params::WheelParameters;
use std::f64::consts::PI;

/// Vertical offset of the cup ring above the wheel base.
pub const CUP_RING_HEIGHT: f64 = 10.0;

/// A cup's computed position and angular index on the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CupPlacement {
    pub index: usize,
    /// Angle around the vertical axis, starting at 0 for the first cup.
    pub angle: f64,
    /// World position of the cup's group, on the circle of the wheel radius.
    pub position: [f64; 3],
}

/// Result of the layout pass: one placement per cup plus the uniform scale
/// every cup is drawn at for this configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    pub placements: Vec<CupPlacement>,
    pub cup_scale: f64,
}

/// Derives the geometric arrangement for the given parameters. Cups are
/// spread evenly around the circle; the scale shrinks as the ring gets
/// denser so neighbouring cups do not overlap.
pub fn layout(params: &WheelParameters) -> WheelLayout {
    let total = params.cup_count();
    let radius = params.radius();
    let mut placements = Vec::with_capacity(total);
    for index in 0..total {
        let angle = index as f64 / total as f64 * 2.0 * PI;
        placements.push(CupPlacement {
            index,
            angle,
            position: [radius * angle.sin(), CUP_RING_HEIGHT, radius * angle.cos()],
        });
    }
    WheelLayout {
        placements,
        cup_scale: cup_scale(total, radius),
    }
}

/// Half the chord between the first two cups on a unit circle, scaled by the
/// wheel radius. Sampling the 0-1 pair is enough: all adjacent chords of a
/// regular polygon are equal.
fn cup_scale(cup_count: usize, radius: f64) -> f64 {
    let step = 1.0 / cup_count as f64 * 2.0 * PI;
    let (x1, z1) = (0.0, 1.0);
    let (x2, z2) = (step.sin(), step.cos());
    let chord = ((x2 - x1) * (x2 - x1) + (z2 - z1) * (z2 - z1)).sqrt();
    chord / 2.0 * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(cup_count: usize, radius: f64) -> WheelParameters {
        WheelParameters::try_new(cup_count, radius, 0.0).unwrap()
    }

    #[test]
    fn produces_one_placement_per_cup() {
        for count in [2, 3, 7, 100, 500] {
            let wheel = layout(&params(count, 500.0));
            assert_eq!(wheel.placements.len(), count);
        }
    }

    #[test]
    fn angles_form_an_even_ring_starting_at_zero() {
        let wheel = layout(&params(12, 400.0));
        let step = 2.0 * PI / 12.0;
        assert_eq!(wheel.placements[0].angle, 0.0);
        for pair in wheel.placements.windows(2) {
            assert_relative_eq!(pair[1].angle - pair[0].angle, step, epsilon = 1e-12);
        }
        let last = wheel.placements.last().unwrap();
        assert_relative_eq!(last.angle + step, 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn placements_lie_on_the_circle() {
        let radius = 650.0;
        let wheel = layout(&params(37, radius));
        for placement in &wheel.placements {
            let [x, y, z] = placement.position;
            assert_relative_eq!(x * x + z * z, radius * radius, max_relative = 1e-9);
            assert_eq!(y, CUP_RING_HEIGHT);
        }
    }

    #[test]
    fn cup_scale_shrinks_as_the_ring_gets_denser() {
        let radius = 500.0;
        let mut previous = f64::INFINITY;
        for count in [2, 4, 10, 50, 100, 500] {
            let scale = layout(&params(count, radius)).cup_scale;
            assert!(scale < previous, "scale {scale} did not shrink at {count} cups");
            previous = scale;
        }
    }

    #[test]
    fn cup_scale_grows_linearly_with_radius() {
        for count in [3, 16, 200] {
            let small = layout(&params(count, 250.0)).cup_scale;
            let large = layout(&params(count, 500.0)).cup_scale;
            assert_relative_eq!(large, 2.0 * small, max_relative = 1e-12);
        }
    }

    #[test]
    fn four_cup_wheel_lands_on_the_axes() {
        let wheel = layout(&params(4, 500.0));
        let angles: Vec<f64> = wheel.placements.iter().map(|p| p.angle).collect();
        let expected_angles = [0.0, PI / 2.0, PI, 3.0 * PI / 2.0];
        for (angle, expected) in angles.iter().zip(expected_angles) {
            assert_relative_eq!(*angle, expected, epsilon = 1e-12);
        }

        let expected_positions = [
            [0.0, CUP_RING_HEIGHT, 500.0],
            [500.0, CUP_RING_HEIGHT, 0.0],
            [0.0, CUP_RING_HEIGHT, -500.0],
            [-500.0, CUP_RING_HEIGHT, 0.0],
        ];
        for (placement, expected) in wheel.placements.iter().zip(expected_positions) {
            for axis in 0..3 {
                assert_relative_eq!(placement.position[axis], expected[axis], epsilon = 1e-9);
            }
        }

        // Half the distance between the first two cups.
        let [x0, _, z0] = wheel.placements[0].position;
        let [x1, _, z1] = wheel.placements[1].position;
        let half_chord = ((x1 - x0).powi(2) + (z1 - z0).powi(2)).sqrt() / 2.0;
        assert_relative_eq!(wheel.cup_scale, half_chord, max_relative = 1e-12);
    }
}
