use super::types::FeatureSet;

/// Rainfall bands shared by the saturation and pore-pressure tables.
///
/// Thresholds are strict (`rain > N`) and evaluated from wettest down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RainBand {
    Dry,
    Moderate,
    Heavy,
    Extreme,
}

impl RainBand {
    pub fn from_rain(rain: f64) -> Self {
        match rain {
            r if r > 800.0 => RainBand::Extreme,
            r if r > 400.0 => RainBand::Heavy,
            r if r > 100.0 => RainBand::Moderate,
            _ => RainBand::Dry,
        }
    }

    pub fn saturation_index(&self) -> f64 {
        match self {
            RainBand::Extreme => 1.0,
            RainBand::Heavy => 0.7,
            RainBand::Moderate => 0.4,
            RainBand::Dry => 0.1,
        }
    }

    /// Share of total normal stress carried by pore water.
    pub fn pore_pressure_ratio(&self) -> f64 {
        match self {
            RainBand::Extreme => 0.5,
            RainBand::Heavy => 0.3,
            RainBand::Moderate => 0.1,
            RainBand::Dry => 0.0,
        }
    }
}

/// Cohesion (kPa) and friction angle (degrees) of the soil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strength {
    pub cohesion: f64,
    pub friction: f64,
}

/// Texture-weighted baseline strength. Clay carries cohesion, sand carries friction.
pub fn base_strength(features: &FeatureSet) -> Strength {
    let (f_clay, f_sand, f_silt) = features.fractions();
    Strength {
        cohesion: 35.0 * f_clay + 10.0 * f_silt + 1.0 * f_sand,
        friction: 34.0 * f_sand + 28.0 * f_silt + 18.0 * f_clay,
    }
}

/// Strength left after saturation, with cohesion floored at 0 and friction at 5°.
pub fn effective_strength(base: Strength, band: RainBand) -> Strength {
    let saturation = band.saturation_index();
    let cohesion = base.cohesion * (1.0 - 0.5 * saturation);
    let friction = base.friction * (1.0 - 0.3 * saturation);
    Strength {
        cohesion: cohesion.max(0.0),
        friction: friction.max(5.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soil(clay: f64, sand: f64, silt: f64) -> FeatureSet {
        FeatureSet {
            rain: 0.0,
            precip_real: 0.0,
            slope: 20.0,
            elevation: 200.0,
            temp: 20.0,
            code: 0,
            bulk_density: 130.0,
            clay,
            sand,
            silt,
            is_water: false,
        }
    }

    #[test]
    fn test_rain_band_thresholds_are_strict() {
        assert_eq!(RainBand::from_rain(0.0), RainBand::Dry);
        assert_eq!(RainBand::from_rain(100.0), RainBand::Dry);
        assert_eq!(RainBand::from_rain(100.1), RainBand::Moderate);
        assert_eq!(RainBand::from_rain(400.0), RainBand::Moderate);
        assert_eq!(RainBand::from_rain(401.0), RainBand::Heavy);
        assert_eq!(RainBand::from_rain(800.0), RainBand::Heavy);
        assert_eq!(RainBand::from_rain(800.5), RainBand::Extreme);
    }

    #[test]
    fn test_saturation_and_pore_pressure_tables() {
        assert_eq!(RainBand::Dry.saturation_index(), 0.1);
        assert_eq!(RainBand::Moderate.saturation_index(), 0.4);
        assert_eq!(RainBand::Heavy.saturation_index(), 0.7);
        assert_eq!(RainBand::Extreme.saturation_index(), 1.0);

        assert_eq!(RainBand::Dry.pore_pressure_ratio(), 0.0);
        assert_eq!(RainBand::Moderate.pore_pressure_ratio(), 0.1);
        assert_eq!(RainBand::Heavy.pore_pressure_ratio(), 0.3);
        assert_eq!(RainBand::Extreme.pore_pressure_ratio(), 0.5);
    }

    #[test]
    fn test_base_strength_clay_rich() {
        let s = base_strength(&soil(60.0, 20.0, 20.0));
        assert!((s.cohesion - 23.2).abs() < 1e-9);
        assert!((s.friction - 23.2).abs() < 1e-9);
    }

    #[test]
    fn test_base_strength_pure_sand() {
        let s = base_strength(&soil(0.0, 100.0, 0.0));
        assert!((s.cohesion - 1.0).abs() < 1e-9);
        assert!((s.friction - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_effective_strength_reduction() {
        let base = Strength { cohesion: 20.0, friction: 30.0 };
        let dry = effective_strength(base, RainBand::Dry);
        assert!((dry.cohesion - 19.0).abs() < 1e-9);
        assert!((dry.friction - 29.1).abs() < 1e-9);

        let soaked = effective_strength(base, RainBand::Extreme);
        assert!((soaked.cohesion - 10.0).abs() < 1e-9);
        assert!((soaked.friction - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_friction_floor_at_five_degrees() {
        let base = Strength { cohesion: 0.0, friction: 4.0 };
        let s = effective_strength(base, RainBand::Extreme);
        assert_eq!(s.friction, 5.0);
        assert_eq!(s.cohesion, 0.0);
    }

    #[test]
    fn test_wetter_band_never_strengthens() {
        let base = base_strength(&soil(40.0, 30.0, 30.0));
        let bands = [RainBand::Dry, RainBand::Moderate, RainBand::Heavy, RainBand::Extreme];
        for pair in bands.windows(2) {
            let drier = effective_strength(base, pair[0]);
            let wetter = effective_strength(base, pair[1]);
            assert!(wetter.cohesion <= drier.cohesion);
            assert!(wetter.friction <= drier.friction);
        }
    }
}
