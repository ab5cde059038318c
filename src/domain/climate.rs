use serde::{Deserialize, Serialize};

/// Global-average irradiance used when no measurement is available (kWh/m²/day)
pub const DEFAULT_SOLAR_IRRADIANCE: f64 = 4.2;
/// Global-average wind speed used when no measurement is available (m/s)
pub const DEFAULT_WIND_SPEED: f64 = 3.5;
/// Global-average ambient temperature used when no measurement is available (°C)
pub const DEFAULT_AVG_TEMPERATURE: f64 = 15.0;

/// Where the numbers of a [`ClimateReading`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateSource {
    /// Averaged from a weather data provider
    Measured,
    /// Static defaults, the provider could not be reached or resolved
    Estimated,
}

/// Climate snapshot for one location, produced once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    pub location_label: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Daily solar irradiance (kWh/m²/day), equivalent to peak sun hours
    pub solar_irradiance: f64,
    /// Mean wind speed at 10 m (m/s)
    pub wind_speed: f64,
    /// Mean ambient temperature (°C)
    pub avg_temperature: f64,
    pub source: ClimateSource,
}

impl ClimateReading {
    /// Reading built from measured averages. Negative irradiance or wind speed is clamped to zero.
    pub fn measured(
        location_label: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        solar_irradiance: f64,
        wind_speed: f64,
        avg_temperature: f64,
    ) -> Self {
        Self {
            location_label: location_label.into(),
            latitude,
            longitude,
            solar_irradiance: non_negative(solar_irradiance, DEFAULT_SOLAR_IRRADIANCE),
            wind_speed: non_negative(wind_speed, DEFAULT_WIND_SPEED),
            avg_temperature: if avg_temperature.is_finite() {
                avg_temperature
            } else {
                DEFAULT_AVG_TEMPERATURE
            },
            source: ClimateSource::Measured,
        }
    }

    /// Default reading returned whenever a lookup fails
    pub fn estimated(
        location_label: impl Into<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        Self {
            location_label: location_label.into(),
            latitude,
            longitude,
            solar_irradiance: DEFAULT_SOLAR_IRRADIANCE,
            wind_speed: DEFAULT_WIND_SPEED,
            avg_temperature: DEFAULT_AVG_TEMPERATURE,
            source: ClimateSource::Estimated,
        }
    }

    pub fn is_estimated(&self) -> bool {
        self.source == ClimateSource::Estimated
    }
}

fn non_negative(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}
