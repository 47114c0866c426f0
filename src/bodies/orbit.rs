//! Closed-form orbital paths for bodies that move on rails.
//!
//! Orbiting bodies are not integrated: their position relative to the parent
//! is a function of time, solved from Kepler's equation by Newton iteration.
//! With zero eccentricity this reduces to `a·(cos θ, sin θ)`.

use std::f64::consts::{PI, TAU};

use bevy::math::DVec2;

/// Elements of a prescribed orbit around a parent body.
///
/// Angles are in radians, distances in game units, time in ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPath {
    /// Semi-major axis (the orbital radius for circular paths)
    pub semi_major_axis: f64,
    /// Eccentricity, 0 ≤ e < 1
    pub eccentricity: f64,
    /// Argument of periapsis in radians
    pub argument_of_periapsis: f64,
    /// Current mean anomaly in radians (the orbital angle for circular paths)
    pub angle: f64,
    /// Mean motion in radians per tick; negative for clockwise motion
    pub angular_speed: f64,
}

impl OrbitPath {
    /// Circular path of the given radius, starting at `angle`.
    pub fn circular(radius: f64, angular_speed: f64, angle: f64) -> Self {
        Self {
            semi_major_axis: radius,
            eccentricity: 0.0,
            argument_of_periapsis: 0.0,
            angle,
            angular_speed,
        }
    }

    /// Same path with the given eccentricity and argument of periapsis.
    pub fn with_shape(mut self, eccentricity: f64, argument_of_periapsis: f64) -> Self {
        self.eccentricity = eccentricity;
        self.argument_of_periapsis = argument_of_periapsis;
        self
    }

    /// Move along the path by `dt` ticks.
    pub fn advance(&mut self, dt: f64) {
        self.angle = (self.angle + self.angular_speed * dt).rem_euclid(TAU);
    }

    /// Mean anomaly `offset` ticks from now.
    #[inline]
    pub fn mean_anomaly_at(&self, offset: f64) -> f64 {
        self.angle + self.angular_speed * offset
    }

    /// Solve Kepler's equation `M = E - e·sin(E)` for the eccentric anomaly.
    pub fn solve_eccentric_anomaly(&self, mean_anomaly: f64) -> f64 {
        let m = mean_anomaly.rem_euclid(TAU);
        let e = self.eccentricity;
        if e == 0.0 {
            return m;
        }

        let mut anomaly = if e < 0.8 { m } else { PI };
        for _ in 0..50 {
            let (sin_e, cos_e) = anomaly.sin_cos();
            let delta = (anomaly - e * sin_e - m) / (1.0 - e * cos_e);
            anomaly -= delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }
        anomaly
    }

    /// True anomaly for an eccentric anomaly.
    pub fn true_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let (sin_half, cos_half) = (eccentric_anomaly / 2.0).sin_cos();
        2.0 * ((1.0 + e).sqrt() * sin_half).atan2((1.0 - e).sqrt() * cos_half)
    }

    /// Position relative to the parent, now.
    pub fn local_position(&self) -> DVec2 {
        self.local_position_at(0.0)
    }

    /// Position relative to the parent, `offset` ticks from now.
    pub fn local_position_at(&self, offset: f64) -> DVec2 {
        let eccentric = self.solve_eccentric_anomaly(self.mean_anomaly_at(offset));
        let r = self.semi_major_axis * (1.0 - self.eccentricity * eccentric.cos());
        let angle = self.true_anomaly(eccentric) + self.argument_of_periapsis;
        DVec2::new(r * angle.cos(), r * angle.sin())
    }

    /// Velocity relative to the parent, `offset` ticks from now, in units per tick.
    pub fn local_velocity_at(&self, offset: f64) -> DVec2 {
        let e = self.eccentricity;
        let a = self.semi_major_axis;
        let eccentric = self.solve_eccentric_anomaly(self.mean_anomaly_at(offset));
        let nu = self.true_anomaly(eccentric);
        let r = a * (1.0 - e * eccentric.cos());

        // Specific angular momentum; carries the sign of the direction of travel
        let h = self.angular_speed * a * a * (1.0 - e * e).sqrt();
        let radial = h * e * nu.sin() / (a * (1.0 - e * e));
        let tangential = h / r;

        let (sin_a, cos_a) = (nu + self.argument_of_periapsis).sin_cos();
        DVec2::new(
            radial * cos_a - tangential * sin_a,
            radial * sin_a + tangential * cos_a,
        )
    }

    /// Closed loop of `segments + 1` points around the path, relative to the parent.
    pub fn outline(&self, segments: usize) -> impl Iterator<Item = DVec2> + '_ {
        let segments = segments.max(3);
        (0..=segments).map(move |i| {
            let eccentric = TAU * i as f64 / segments as f64;
            let r = self.semi_major_axis * (1.0 - self.eccentricity * eccentric.cos());
            let angle = self.true_anomaly(eccentric) + self.argument_of_periapsis;
            DVec2::new(r * angle.cos(), r * angle.sin())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_circular_matches_polar_formula() {
        let orbit = OrbitPath::circular(1600.0, 0.001, 0.7);
        for offset in [0.0, 10.0, 500.0, 12_345.0] {
            let angle: f64 = 0.7 + 0.001 * offset;
            let expected = DVec2::new(1600.0 * angle.cos(), 1600.0 * angle.sin());
            let pos = orbit.local_position_at(offset);
            assert_relative_eq!(pos.x, expected.x, epsilon = 1e-6);
            assert_relative_eq!(pos.y, expected.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_kepler_equation_satisfied() {
        let orbit = OrbitPath::circular(500.0, 0.01, 0.0).with_shape(0.9, 0.0);
        for m in [0.1, 0.5, 1.0, 2.0, 3.0, 5.0] {
            let e_anom = orbit.solve_eccentric_anomaly(m);
            let m_check = e_anom - orbit.eccentricity * e_anom.sin();
            assert!(
                (m_check - m).abs() < 1e-10,
                "Kepler equation not satisfied for M={}: {}",
                m,
                m_check
            );
        }
    }

    #[test]
    fn test_periapsis_and_apoapsis_distance() {
        let orbit = OrbitPath::circular(1000.0, 0.002, 0.0).with_shape(0.5, FRAC_PI_2);
        let periapsis = orbit.local_position();
        assert_relative_eq!(periapsis.length(), 500.0, epsilon = 1e-9);
        // Periapsis lies along the argument of periapsis
        assert_relative_eq!(periapsis.x, 0.0, epsilon = 1e-9);

        let half_period = PI / 0.002;
        let apoapsis = orbit.local_position_at(half_period);
        assert_relative_eq!(apoapsis.length(), 1500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_advance_matches_offset() {
        let mut orbit = OrbitPath::circular(300.0, -0.02, 1.0).with_shape(0.2, 0.3);
        let ahead = orbit.local_position_at(75.0);
        orbit.advance(75.0);
        let now = orbit.local_position();
        assert_relative_eq!(now.x, ahead.x, epsilon = 1e-9);
        assert_relative_eq!(now.y, ahead.y, epsilon = 1e-9);
    }

    #[test]
    fn test_circular_velocity_is_tangential() {
        let orbit = OrbitPath::circular(200.0, 0.05, 0.4);
        let pos = orbit.local_position();
        let vel = orbit.local_velocity_at(0.0);
        assert_relative_eq!(vel.length(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(pos.dot(vel), 0.0, epsilon = 1e-9);
        // Counter-clockwise: angular momentum is positive
        assert!(pos.perp_dot(vel) > 0.0);
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let orbit = OrbitPath::circular(800.0, 0.003, 0.2).with_shape(0.3, 1.1);
        let h = 1e-3;
        let numeric = (orbit.local_position_at(10.0 + h) - orbit.local_position_at(10.0 - h)) / (2.0 * h);
        let analytic = orbit.local_velocity_at(10.0);
        assert_relative_eq!(analytic.x, numeric.x, epsilon = 1e-5);
        assert_relative_eq!(analytic.y, numeric.y, epsilon = 1e-5);
    }

    #[test]
    fn test_outline_closed_and_on_path() {
        let orbit = OrbitPath::circular(100.0, 0.01, 0.3).with_shape(0.5, 1.0);
        let points: Vec<_> = orbit.outline(64).collect();
        assert_eq!(points.len(), 65);
        assert_relative_eq!(points[0].x, points[64].x, epsilon = 1e-9);
        assert_relative_eq!(points[0].y, points[64].y, epsilon = 1e-9);
        // Periapsis and apoapsis distances bound every point
        for p in &points {
            let r = p.length();
            assert!((50.0 - 1e-9..=150.0 + 1e-9).contains(&r));
        }
        assert_relative_eq!(points[0].length(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(points[32].length(), 150.0, epsilon = 1e-9);
    }
}
