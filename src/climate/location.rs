use std::fmt;

use thiserror::Error;

/// Where a climate lookup should look
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    /// Free-text place name, geocoded before the weather lookup
    Place(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location is empty")]
    Empty,
    #[error("coordinates out of range: {latitude},{longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
}

impl Location {
    /// Parse `"lat,lon"` into coordinates; anything that is not two numbers is a place name
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LocationError::Empty);
        }

        if let Some((lat, lon)) = input.split_once(',') {
            if let (Ok(latitude), Ok(longitude)) =
                (lat.trim().parse::<f64>(), lon.trim().parse::<f64>())
            {
                return Self::coordinates(latitude, longitude);
            }
        }

        Ok(Location::Place(input.to_string()))
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Location::Coordinates { latitude, longitude })
        } else {
            Err(LocationError::OutOfRange { latitude, longitude })
        }
    }

    /// Normalized form used as a cache key
    pub fn cache_key(&self) -> String {
        match self {
            Location::Coordinates { latitude, longitude } => format!("{latitude:.4},{longitude:.4}"),
            Location::Place(name) => name.to_lowercase(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates { latitude, longitude } => write!(f, "{latitude}, {longitude}"),
            Location::Place(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(
            Location::parse(" -34.6037, -58.3816 "),
            Ok(Location::Coordinates {
                latitude: -34.6037,
                longitude: -58.3816
            })
        );
    }

    #[rstest]
    #[case("Córdoba")]
    #[case("Mendoza, Argentina")]
    #[case("12a,34")]
    fn test_parse_place(#[case] input: &str) {
        assert_eq!(Location::parse(input), Ok(Location::Place(input.to_string())));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_parse_empty(#[case] input: &str) {
        assert_eq!(Location::parse(input), Err(LocationError::Empty));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            Location::parse("95,10"),
            Err(LocationError::OutOfRange { .. })
        ));
        assert!(matches!(
            Location::parse("10,-200"),
            Err(LocationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_cache_key_normalizes() {
        let a = Location::parse("Rosario").unwrap();
        let b = Location::parse("ROSARIO").unwrap();
        assert_eq!(a.cache_key(), b.cache_key());
        let c = Location::parse("-32.94682,-60.63932").unwrap();
        assert_eq!(c.cache_key(), "-32.9468,-60.6393");
    }
}
