//! Open-Meteo climate client with Nominatim geocoding for place names.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{
    config::ClimateConfig,
    domain::{ClimateReading, DEFAULT_AVG_TEMPERATURE, DEFAULT_SOLAR_IRRADIANCE, DEFAULT_WIND_SPEED},
    fallback::with_fallback_timeout,
};

use super::{ClimateError, ClimateProvider, Location};

/// MJ/m² per day to kWh/m² per day
const MJ_PER_KWH: f64 = 3.6;

#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    archive_url: String,
    forecast_url: String,
    default_country: String,
    lookup_timeout: Duration,
}

impl OpenMeteoClient {
    pub fn new(cfg: &ClimateConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent).context("invalid climate user agent")?,
        );
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            geocoding_url: cfg.geocoding_url.trim_end_matches('/').to_string(),
            archive_url: cfg.archive_url.trim_end_matches('/').to_string(),
            forecast_url: cfg.forecast_url.trim_end_matches('/').to_string(),
            default_country: cfg.default_country.clone(),
            lookup_timeout: Duration::from_secs(cfg.lookup_timeout_seconds),
        })
    }

    /// Measured reading for `location`, or the first failure along the way
    pub async fn try_lookup(&self, location: &Location) -> Result<ClimateReading, ClimateError> {
        let (latitude, longitude, label) = match location {
            Location::Coordinates { latitude, longitude } => {
                (*latitude, *longitude, location.to_string())
            }
            Location::Place(name) => self.geocode(name).await?,
        };

        let (archive, forecast) = tokio::join!(
            self.archive(latitude, longitude),
            self.forecast(latitude, longitude)
        );
        let archive = archive?;
        let forecast = forecast?;

        let temperature = archive.as_ref().and_then(|d| mean(&d.temperature_2m_mean));
        let wind = archive.as_ref().and_then(|d| mean(&d.windspeed_10m_mean));
        let radiation_mj = forecast.as_ref().and_then(|d| mean(&d.shortwave_radiation_sum));

        if temperature.is_none() && wind.is_none() && radiation_mj.is_none() {
            return Err(ClimateError::EmptySeries);
        }
        for (field, value) in [
            ("temperature_2m_mean", temperature),
            ("windspeed_10m_mean", wind),
            ("shortwave_radiation_sum", radiation_mj),
        ] {
            if value.is_none() {
                warn!(field, %label, "climate series missing, using default");
            }
        }

        let irradiance = radiation_mj.map(|mj| mj / MJ_PER_KWH).unwrap_or(DEFAULT_SOLAR_IRRADIANCE);
        let reading = ClimateReading::measured(
            label,
            Some(latitude),
            Some(longitude),
            round_to(irradiance, 2),
            round_to(wind.unwrap_or(DEFAULT_WIND_SPEED), 1),
            round_to(temperature.unwrap_or(DEFAULT_AVG_TEMPERATURE), 1),
        );
        info!(
            location = %reading.location_label,
            irradiance = reading.solar_irradiance,
            wind_speed = reading.wind_speed,
            avg_temperature = reading.avg_temperature,
            "climate data fetched"
        );
        Ok(reading)
    }

    async fn geocode(&self, place: &str) -> Result<(f64, f64, String), ClimateError> {
        let query = if self.default_country.is_empty()
            || place.to_lowercase().contains(&self.default_country.to_lowercase())
        {
            place.to_string()
        } else {
            format!("{place}, {}", self.default_country)
        };
        debug!(%query, "geocoding place");

        let url = format!("{}/search", self.geocoding_url);
        let places: Vec<NominatimPlace> = self
            .get_json(
                "geocoding",
                &url,
                &[("q", query.as_str()), ("format", "json"), ("limit", "1")],
            )
            .await?;

        let first = places
            .into_iter()
            .next()
            .ok_or_else(|| ClimateError::NotFound(place.to_string()))?;
        let latitude: f64 = first
            .lat
            .parse()
            .map_err(|_| ClimateError::Decode(format!("latitude {:?}", first.lat)))?;
        let longitude: f64 = first
            .lon
            .parse()
            .map_err(|_| ClimateError::Decode(format!("longitude {:?}", first.lon)))?;
        Location::coordinates(latitude, longitude)?;

        Ok((latitude, longitude, first.display_name))
    }

    async fn archive(&self, latitude: f64, longitude: f64) -> Result<Option<DailySeries>, ClimateError> {
        let year = Utc::now().year() - 1;
        let (start, end) = (format!("{year}-01-01"), format!("{year}-12-31"));
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let url = format!("{}/archive", self.archive_url);
        let resp: OpenMeteoResponse = self
            .get_json(
                "climate archive",
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("start_date", start.as_str()),
                    ("end_date", end.as_str()),
                    ("daily", "temperature_2m_mean,windspeed_10m_mean"),
                    ("windspeed_unit", "ms"),
                    ("timezone", "auto"),
                ],
            )
            .await?;
        Ok(resp.daily)
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Option<DailySeries>, ClimateError> {
        let (lat, lon) = (latitude.to_string(), longitude.to_string());
        let url = format!("{}/forecast", self.forecast_url);
        let resp: OpenMeteoResponse = self
            .get_json(
                "solar forecast",
                &url,
                &[
                    ("latitude", lat.as_str()),
                    ("longitude", lon.as_str()),
                    ("daily", "shortwave_radiation_sum"),
                    ("timezone", "auto"),
                ],
            )
            .await?;
        Ok(resp.daily)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClimateError> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClimateError::Status {
                service,
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ClimateError::Decode(format!("{service}: {e}")))
    }
}

#[async_trait]
impl ClimateProvider for OpenMeteoClient {
    async fn lookup(&self, location: &str) -> ClimateReading {
        let parsed = match Location::parse(location) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(location, error = %e, "unusable location, using estimated climate");
                return ClimateReading::estimated(location.trim(), None, None);
            }
        };
        let (latitude, longitude) = match parsed {
            Location::Coordinates { latitude, longitude } => (Some(latitude), Some(longitude)),
            Location::Place(_) => (None, None),
        };
        let label = parsed.to_string();

        with_fallback_timeout(
            "climate",
            self.lookup_timeout,
            self.try_lookup(&parsed),
            || ClimateReading::estimated(label, latitude, longitude),
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    daily: Option<DailySeries>,
}

#[derive(Debug, Default, Deserialize)]
struct DailySeries {
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m_mean: Vec<Option<f64>>,
    #[serde(default)]
    shortwave_radiation_sum: Vec<Option<f64>>,
}

/// Mean of the non-null values
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
