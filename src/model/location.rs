// File: ./src/model/location.rs
use crate::config::CityConfig;
use crate::geo::{approx_direction, distance_bearing};
use crate::model::name::sanitize_name;
use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_FR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.*?)\s*,\s*FR\s*(🇫🇷)?\s*$").expect("valid regex"));
static RE_CH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.*?)\s*,\s*CH\s*(🇨🇭)?\s*$").expect("valid regex"));

static RE_GEO_NE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*N\s*(\d+(?:\.\d+)?)\s*,?\s*E\s*(\d+(?:\.\d+)?)\s*$").expect("valid regex")
});
static RE_GEO_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*[,;\s]\s*(-?\d+(?:\.\d+)?)\s*$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    France,
    Switzerland,
}

impl Country {
    pub fn label(&self) -> &'static str {
        match self {
            Country::France => "Frankreich",
            Country::Switzerland => "Schweiz",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Country::France => "FR",
            Country::Switzerland => "CH",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Country::France => "🇫🇷",
            Country::Switzerland => "🇨🇭",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Parses `N 49.41 E 8.69` or `49.41, 8.69`.
pub fn parse_coordinates(s: &str) -> Result<GeoPoint> {
    let caps = RE_GEO_NE
        .captures(s)
        .or_else(|| RE_GEO_DECIMAL.captures(s));
    let Some(c) = caps else {
        bail!("cannot parse coordinates '{s}'");
    };
    let lat: f64 = c[1].parse()?;
    let lon: f64 = c[2].parse()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("coordinates out of range '{s}'");
    }
    Ok(GeoPoint { lat, lon })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: Option<Country>,
    /// Normalized `lat,lon` text; empty when no coordinates were parsed.
    pub geo: String,
    pub point: Option<GeoPoint>,
    pub distance_km: Option<f64>,
    pub bearing: Option<f64>,
    pub direction: String,
    pub dist_dir_fancy: String,
}

impl Location {
    /// Builds a location from the table cells. Bad coordinates only leave the
    /// location without geo information.
    pub fn new(city_ref: &CityConfig, location: &str, coordinates: &str) -> Self {
        let (city, country) = if let Some(m) = RE_FR.captures(location) {
            (m[1].to_string(), Some(Country::France))
        } else if let Some(m) = RE_CH.captures(location) {
            (m[1].to_string(), Some(Country::Switzerland))
        } else {
            (location.trim().to_string(), None)
        };

        let mut loc = Location {
            city,
            country,
            ..Default::default()
        };

        if coordinates.trim().is_empty() {
            return loc;
        }
        match parse_coordinates(coordinates) {
            Ok(p) => {
                let (d, b) = distance_bearing(city_ref.lat, city_ref.lon, p.lat, p.lon);
                loc.geo = format!("{:.6},{:.6}", p.lat, p.lon);
                loc.point = Some(p);
                loc.distance_km = Some(d);
                loc.bearing = Some(b);
                loc.direction = approx_direction(b).to_string();
                loc.dist_dir_fancy = format!("{:.1}km {} von {}", d, loc.direction, city_ref.name);
            }
            Err(e) => log::warn!("location '{}': {}", loc.city, e),
        }
        loc
    }

    pub fn has_geo(&self) -> bool {
        self.point.is_some()
    }

    pub fn name(&self) -> String {
        if self.city.is_empty() {
            return String::new();
        }
        match self.country {
            Some(c) => format!("{}, {} {}", self.city, c.code(), c.flag()),
            None => self.city.clone(),
        }
    }

    pub fn name_no_flag(&self) -> String {
        if self.city.is_empty() {
            return String::new();
        }
        match self.country {
            Some(c) => format!("{}, {}", self.city, c.code()),
            None => self.city.clone(),
        }
    }

    /// Extra tags implied by the location.
    pub fn tags(&self) -> Vec<String> {
        self.country
            .map(|c| vec![sanitize_name(c.label())])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heidelberg() -> CityConfig {
        CityConfig {
            name: "Heidelberg".into(),
            lat: 49.3988,
            lon: 8.6724,
        }
    }

    #[test]
    fn test_parse_coordinates() {
        let p = parse_coordinates("N 49.41 E 8.69").unwrap();
        assert_eq!((p.lat, p.lon), (49.41, 8.69));
        let p = parse_coordinates("49.41, 8.69").unwrap();
        assert_eq!((p.lat, p.lon), (49.41, 8.69));
        assert!(parse_coordinates("somewhere").is_err());
        assert!(parse_coordinates("91.0, 8.0").is_err());
    }

    #[test]
    fn test_country_marker() {
        let loc = Location::new(&heidelberg(), "Wissembourg, FR 🇫🇷", "49.037, 7.945");
        assert_eq!(loc.city, "Wissembourg");
        assert_eq!(loc.country, Some(Country::France));
        assert_eq!(loc.tags(), vec!["frankreich".to_string()]);
        assert_eq!(loc.name_no_flag(), "Wissembourg, FR");
        assert!(loc.has_geo());
        assert_eq!(loc.direction, "SW");

        let loc = Location::new(&heidelberg(), "Basel, CH", "");
        assert_eq!(loc.country, Some(Country::Switzerland));
        assert!(!loc.has_geo());
    }

    #[test]
    fn test_bad_coordinates_keep_city() {
        let loc = Location::new(&heidelberg(), "Rohrbach", "beim Sportplatz");
        assert_eq!(loc.city, "Rohrbach");
        assert!(!loc.has_geo());
        assert!(loc.geo.is_empty());
        assert!(loc.tags().is_empty());
    }
}
