use super::soil::{RainBand, Strength};
use super::types::RiskLevel;

/// Assumed depth of the planar slip surface, meters.
pub const SLIP_DEPTH_M: f64 = 3.0;
const GRAVITY: f64 = 9.81;
/// Keeps flat terrain from dividing by zero.
const DRIVING_EPSILON: f64 = 0.001;

/// FoS reported for ground flatter than one degree.
pub const FLAT_FOS: f64 = 20.0;
pub const FLAT_PROBABILITY: f64 = 0.01;

/// Output of the infinite-slope limit-equilibrium model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeStability {
    /// Total normal stress on the slip plane
    pub normal_stress: f64,
    pub pore_pressure: f64,
    /// Mohr-Coulomb resisting shear (tau_resisting)
    pub resisting: f64,
    /// Gravity-driven shear (tau_driving)
    pub driving: f64,
    pub fos: f64,
}

/// Infinite-slope stability for `slope` degrees with the given effective strength.
pub fn infinite_slope(
    slope: f64,
    bulk_density: f64,
    strength: Strength,
    band: RainBand,
) -> SlopeStability {
    let gamma = (bulk_density / 100.0) * GRAVITY;
    let beta = slope.to_radians();
    let (sin_b, cos_b) = beta.sin_cos();

    let normal_stress = gamma * SLIP_DEPTH_M * cos_b * cos_b;
    let driving = gamma * SLIP_DEPTH_M * sin_b * cos_b;
    let pore_pressure = band.pore_pressure_ratio() * normal_stress;
    let effective_normal = (normal_stress - pore_pressure).max(0.0);
    let resisting = strength.cohesion + effective_normal * strength.friction.to_radians().tan();

    SlopeStability {
        normal_stress,
        pore_pressure,
        resisting,
        driving,
        fos: resisting / (driving + DRIVING_EPSILON),
    }
}

/// Failure probability for a factor of safety. First match wins.
pub fn failure_probability(fos: f64) -> f64 {
    match fos {
        f if f < 1.0 => 0.95,
        f if f < 1.2 => 0.75,
        f if f < 1.5 => 0.40,
        f if f < 2.0 => 0.20,
        _ => 0.05,
    }
}

pub fn level_for_probability(probability: f64) -> RiskLevel {
    match probability {
        p if p > 0.7 => RiskLevel::High,
        p if p > 0.3 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Final (FoS, probability) pair. Ground under one degree is forced to the
/// flat values and never consults the probability table.
pub fn classify(slope: f64, fos: f64) -> (f64, f64) {
    if slope < 1.0 {
        (FLAT_FOS, FLAT_PROBABILITY)
    } else {
        (fos, failure_probability(fos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOAM: Strength = Strength {
        cohesion: 14.516,
        friction: 25.8796,
    };

    #[test]
    fn test_infinite_slope_dry_loam() {
        let s = infinite_slope(30.0, 130.0, LOAM, RainBand::Dry);
        assert!((s.driving - 16.5666).abs() < 1e-3);
        assert_eq!(s.pore_pressure, 0.0);
        assert!((s.fos - 1.7164).abs() < 1e-3);
    }

    #[test]
    fn test_pore_pressure_reduces_resistance() {
        let dry = infinite_slope(30.0, 130.0, LOAM, RainBand::Dry);
        let wet = infinite_slope(30.0, 130.0, LOAM, RainBand::Extreme);
        assert!((wet.pore_pressure - 0.5 * wet.normal_stress).abs() < 1e-9);
        assert!(wet.resisting < dry.resisting);
        assert_eq!(wet.driving, dry.driving);
    }

    #[test]
    fn test_flat_ground_finite_thanks_to_epsilon() {
        let s = infinite_slope(0.0, 130.0, LOAM, RainBand::Dry);
        assert_eq!(s.driving, 0.0);
        assert!(s.fos.is_finite());
        assert!(s.fos > 1000.0);
    }

    #[test]
    fn test_zero_density_gives_cohesion_only() {
        let s = infinite_slope(25.0, 0.0, LOAM, RainBand::Dry);
        assert_eq!(s.normal_stress, 0.0);
        assert!((s.resisting - LOAM.cohesion).abs() < 1e-12);
    }

    #[test]
    fn test_probability_breakpoints() {
        assert_eq!(failure_probability(0.5), 0.95);
        assert_eq!(failure_probability(0.999), 0.95);
        assert_eq!(failure_probability(1.0), 0.75);
        assert_eq!(failure_probability(1.2), 0.40);
        assert_eq!(failure_probability(1.5), 0.20);
        assert_eq!(failure_probability(1.99), 0.20);
        assert_eq!(failure_probability(2.0), 0.05);
        assert_eq!(failure_probability(50.0), 0.05);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_probability(0.95), RiskLevel::High);
        assert_eq!(level_for_probability(0.75), RiskLevel::High);
        assert_eq!(level_for_probability(0.7), RiskLevel::Medium);
        assert_eq!(level_for_probability(0.40), RiskLevel::Medium);
        assert_eq!(level_for_probability(0.3), RiskLevel::Low);
        assert_eq!(level_for_probability(0.01), RiskLevel::Low);
    }

    #[test]
    fn test_flat_override_replaces_table() {
        // A failing FoS on flat ground is still overridden
        assert_eq!(classify(0.9, 0.4), (FLAT_FOS, FLAT_PROBABILITY));
        assert_eq!(classify(1.0, 0.4), (0.4, 0.95));
    }
}
