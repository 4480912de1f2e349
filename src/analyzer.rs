//! Surf quality classification.
//!
//! Everything here is a pure function of its arguments: wind type comes from
//! the angle between the wind bearing and the location's onshore bearing, and
//! the quality indicators from wave height and period thresholds.

use crate::models::{ClassifiedForecastPoint, ForecastPoint, QualityIndicators, WindType};

/// Wind within this angle of the onshore bearing is onshore (inclusive)
pub const ONSHORE_MAX_ANGLE_DEG: f64 = 45.0;

/// Wind at least this far from the onshore bearing is offshore (inclusive)
pub const OFFSHORE_MIN_ANGLE_DEG: f64 = 135.0;

/// Wave period from which a swell counts as quality ground swell
pub const GOOD_PERIOD_THRESHOLD_S: f64 = 10.0;

pub const MIN_SURFABLE_HEIGHT_M: f64 = 0.5;

pub const MIN_SURFABLE_PERIOD_S: f64 = 8.0;

/// Onshore bearing assumed when neither configuration nor the provider gives one
pub const DEFAULT_ONSHORE_REFERENCE_DEG: f64 = 270.0;

/// How the onshore bearing of a location is resolved for each forecast point.
///
/// The onshore bearing is the direction wind blows *from* when it is pure
/// onshore, which is also the direction incoming waves travel from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnshoreReference {
    /// Fixed bearing for the location, takes precedence over provider data
    pub fixed_deg: Option<f64>,
    pub fallback_deg: f64,
}

impl Default for OnshoreReference {
    fn default() -> Self {
        Self {
            fixed_deg: None,
            fallback_deg: DEFAULT_ONSHORE_REFERENCE_DEG,
        }
    }
}

impl OnshoreReference {
    pub fn fixed(deg: f64) -> Self {
        Self {
            fixed_deg: Some(deg),
            ..Self::default()
        }
    }

    /// Fixed bearing, else wave direction, else swell direction, else fallback.
    pub fn resolve(&self, point: &ForecastPoint) -> f64 {
        self.fixed_deg
            .or(point.wave_direction_deg)
            .or(point.swell_direction_deg)
            .unwrap_or(self.fallback_deg)
    }
}

/// Smallest angle between two bearings, in `[0, 180]`
pub fn angular_difference(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (a_deg - b_deg).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

pub fn classify_wind(wind_direction_deg: f64, onshore_deg: f64) -> WindType {
    let diff = angular_difference(wind_direction_deg, onshore_deg);
    if diff <= ONSHORE_MAX_ANGLE_DEG {
        WindType::Onshore
    } else if diff >= OFFSHORE_MIN_ANGLE_DEG {
        WindType::Offshore
    } else {
        WindType::Cross
    }
}

pub fn is_good_period(wave_period_s: Option<f64>) -> bool {
    wave_period_s.is_some_and(|period| period >= GOOD_PERIOD_THRESHOLD_S)
}

pub fn is_surfable(wave_height_m: Option<f64>, wave_period_s: Option<f64>) -> bool {
    match (wave_height_m, wave_period_s) {
        (Some(height), Some(period)) => {
            height >= MIN_SURFABLE_HEIGHT_M && period >= MIN_SURFABLE_PERIOD_S
        }
        _ => false,
    }
}

pub fn quality_indicators(
    wave_height_m: Option<f64>,
    wave_period_s: Option<f64>,
    wind_type: WindType,
) -> QualityIndicators {
    QualityIndicators {
        // cross-shore is tolerable for surfing but is not reported as offshore
        is_offshore: wind_type == WindType::Offshore,
        good_period: is_good_period(wave_period_s),
        surfable: is_surfable(wave_height_m, wave_period_s),
    }
}

/// Classifies one forecast point against the given onshore bearing
pub fn classify(point: ForecastPoint, onshore_deg: f64) -> ClassifiedForecastPoint {
    let wind_type = classify_wind(point.wind_direction_deg, onshore_deg);
    let indicators = quality_indicators(point.wave_height_m, point.wave_period_s, wind_type);
    ClassifiedForecastPoint {
        point,
        wind_type,
        quality_indicators: indicators,
    }
}

/// Converts u/v wind components into `(speed_ms, direction_deg)`.
///
/// The direction follows the meteorological convention (where the wind comes
/// from). Missing components are reported as calm.
pub fn wind_from_components(wind_u: Option<f64>, wind_v: Option<f64>) -> (f64, f64) {
    let (Some(u), Some(v)) = (wind_u, wind_v) else {
        return (0.0, 0.0);
    };

    let speed = u.hypot(v);
    let direction_to = u.atan2(v).to_degrees();
    let direction_from = (direction_to + 180.0).rem_euclid(360.0);

    (round_to(speed, 2), round_to(direction_from, 1) % 360.0)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
