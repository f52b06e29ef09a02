//! Reverse geocoding through a Nominatim-compatible endpoint.
//!
//! Lookups never fail: any error yields the "unknown" placeholders so that
//! a report can still be submitted.

use serde::Deserialize;
use std::time::Duration;

use crate::config::GeocodingConfig;

pub const UNKNOWN_AREA: &str = "Unknown Area";
pub const UNKNOWN_CITY: &str = "Unknown City";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub area: String,
    pub city: String,
    pub full_address: String,
}

impl LocationInfo {
    pub fn unknown() -> Self {
        Self {
            area: UNKNOWN_AREA.to_string(),
            city: UNKNOWN_CITY.to_string(),
            full_address: "Location unavailable".to_string(),
        }
    }
}

pub trait ReverseGeocoder: Send + Sync {
    fn reverse(&self, latitude: f64, longitude: f64) -> LocationInfo;
}

#[derive(Debug, Default, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    suburb: Option<String>,
    neighbourhood: Option<String>,
    locality: Option<String>,
    hamlet: Option<String>,
    village: Option<String>,
    town: Option<String>,
    city: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state_district: Option<String>,
}

fn parse_response(response: NominatimResponse) -> LocationInfo {
    let a = response.address;

    let area = a
        .suburb
        .clone()
        .or_else(|| a.neighbourhood.clone())
        .or_else(|| a.locality.clone())
        .or_else(|| a.hamlet.clone())
        .or_else(|| a.village.clone())
        .or_else(|| a.town.clone())
        .unwrap_or_else(|| UNKNOWN_AREA.to_string());

    let city = a
        .city
        .or(a.town)
        .or(a.municipality)
        .or(a.county)
        .or(a.state_district)
        .unwrap_or_else(|| UNKNOWN_CITY.to_string());

    let full_address = response
        .display_name
        .unwrap_or_else(|| format!("{}, {}", area, city));

    LocationInfo {
        area,
        city,
        full_address,
    }
}

pub struct NominatimClient {
    agent: ureq::Agent,
    endpoint: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn from_config(config: &GeocodingConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn lookup(&self, latitude: f64, longitude: f64) -> anyhow::Result<LocationInfo> {
        let url = format!("{}/reverse", self.endpoint);
        let response: NominatimResponse = self
            .agent
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .query("format", "json")
            .query("lat", &latitude.to_string())
            .query("lon", &longitude.to_string())
            .query("zoom", "18")
            .query("addressdetails", "1")
            .call()?
            .into_json()?;
        Ok(parse_response(response))
    }
}

impl ReverseGeocoder for NominatimClient {
    fn reverse(&self, latitude: f64, longitude: f64) -> LocationInfo {
        match self.lookup(latitude, longitude) {
            Ok(info) => {
                tracing::debug!(area = %info.area, city = %info.city, "Reverse geocoded");
                info
            }
            Err(e) => {
                tracing::warn!(error = %e, "Reverse geocoding failed");
                LocationInfo::unknown()
            }
        }
    }
}

/// Used when geocoding is disabled in the config.
pub struct NoGeocoding;

impl ReverseGeocoder for NoGeocoding {
    fn reverse(&self, _latitude: f64, _longitude: f64) -> LocationInfo {
        LocationInfo::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LocationInfo {
        parse_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_suburb_and_city() {
        let info = parse(
            r#"{
                "display_name": "Vidyanagar, Hubballi, Dharwad, Karnataka, India",
                "address": { "suburb": "Vidyanagar", "city": "Hubballi", "county": "Dharwad" }
            }"#,
        );
        assert_eq!(info.area, "Vidyanagar");
        assert_eq!(info.city, "Hubballi");
        assert!(info.full_address.starts_with("Vidyanagar"));
    }

    #[test]
    fn test_fallback_fields() {
        let info = parse(r#"{ "address": { "village": "Amargol", "state_district": "Dharwad" } }"#);
        assert_eq!(info.area, "Amargol");
        assert_eq!(info.city, "Dharwad");
        assert_eq!(info.full_address, "Amargol, Dharwad");

        // a town can serve as both
        let info = parse(r#"{ "address": { "town": "Navalgund" } }"#);
        assert_eq!(info.area, "Navalgund");
        assert_eq!(info.city, "Navalgund");
    }

    #[test]
    fn test_empty_response_is_unknown() {
        let info = parse("{}");
        assert_eq!(info.area, UNKNOWN_AREA);
        assert_eq!(info.city, UNKNOWN_CITY);
    }

    #[test]
    fn test_unreachable_endpoint_yields_placeholders() {
        let client = NominatimClient::from_config(&GeocodingConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        });
        assert_eq!(client.reverse(15.36, 75.12), LocationInfo::unknown());
    }
}
