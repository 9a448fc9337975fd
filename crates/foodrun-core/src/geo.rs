//! # Geo Module
//!
//! Great-circle distance between two coordinates, plus reading the
//! coordinates out of geocoder search hits.
//!
//! The geocoder itself (an HTTP search API) lives outside the core; this
//! module only interprets the results the caller already fetched.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Coordinate;
use crate::validation::ValidationResult;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine formula).
///
/// Both coordinates are validated first; NaN or out-of-range input is an
/// error instead of a NaN distance.
///
/// ## Example
/// ```rust
/// use foodrun_core::geo::haversine_km;
/// use foodrun_core::types::Coordinate;
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// let d = haversine_km(&a, &b).unwrap();
/// assert!((d - 111.195).abs() < 0.01);
/// ```
pub fn haversine_km(origin: &Coordinate, destination: &Coordinate) -> ValidationResult<f64> {
    origin.validate()?;
    destination.validate()?;

    let lat1 = origin.latitude.to_radians();
    let lat2 = destination.latitude.to_radians();
    let d_lat = (destination.latitude - origin.latitude).to_radians();
    let d_lon = (destination.longitude - origin.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push `a` just above 1.0 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    Ok(EARTH_RADIUS_KM * c)
}

// =============================================================================
// Geocoder Results
// =============================================================================

/// One hit from the address search API.
///
/// The API returns coordinates as strings, so they are parsed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeocodeResult {
    #[serde(rename = "ADDRESS")]
    pub address: String,

    #[serde(rename = "LATITUDE")]
    pub latitude: String,

    #[serde(rename = "LONGITUDE")]
    pub longitude: String,
}

impl GeocodeResult {
    /// Parses the string coordinates into a validated [`Coordinate`].
    pub fn coordinate(&self) -> ValidationResult<Coordinate> {
        let parse = |field: &str, raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: format!("'{}' is not a number", raw),
                })
        };

        Coordinate::new(
            parse("latitude", &self.latitude)?,
            parse("longitude", &self.longitude)?,
        )
    }
}

/// The delivery address the customer picked, with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryLocation {
    pub address: String,
    pub coordinate: Coordinate,
}

/// Finds the search hit matching the address the customer picked.
///
/// ## Errors
/// - `Required` if the target address is blank
/// - `NotFound` if no hit has exactly that address
/// - coordinate errors if the matching hit carries unusable coordinates
pub fn select_delivery_location(
    results: &[GeocodeResult],
    target_address: &str,
) -> ValidationResult<DeliveryLocation> {
    if target_address.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "delivery address".to_string(),
        });
    }

    let hit = results
        .iter()
        .find(|r| r.address == target_address)
        .ok_or_else(|| ValidationError::NotFound {
            field: "delivery address".to_string(),
            value: target_address.to_string(),
        })?;

    Ok(DeliveryLocation {
        address: hit.address.clone(),
        coordinate: hit.coordinate()?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_zero_distance() {
        let a = coord(1.3521, 103.8198);
        assert_eq!(haversine_km(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = coord(1.2966, 103.8520);
        let b = coord(1.4382, 103.7890);
        let ab = haversine_km(&a, &b).unwrap();
        let ba = haversine_km(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_across_singapore() {
        // Raffles Place to Woodlands, roughly 17 km as the crow flies
        let raffles = coord(1.2840, 103.8514);
        let woodlands = coord(1.4360, 103.7860);
        let d = haversine_km(&raffles, &woodlands).unwrap();
        assert!(d > 17.0 && d < 19.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_km(&coord(0.0, 0.0), &coord(0.0, 180.0)).unwrap();
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_invalid_coordinates() {
        let bad = Coordinate {
            latitude: f64::NAN,
            longitude: 0.0,
        };
        assert!(haversine_km(&bad, &coord(0.0, 0.0)).is_err());

        let bad = Coordinate {
            latitude: 0.0,
            longitude: 200.0,
        };
        assert!(haversine_km(&coord(0.0, 0.0), &bad).is_err());
    }

    fn hit(address: &str, lat: &str, lon: &str) -> GeocodeResult {
        GeocodeResult {
            address: address.to_string(),
            latitude: lat.to_string(),
            longitude: lon.to_string(),
        }
    }

    #[test]
    fn test_select_delivery_location() {
        let results = vec![
            hit("1 RAFFLES PLACE", "1.2840", "103.8514"),
            hit("10 WOODLANDS AVE", "1.4360", "103.7860"),
        ];
        let location = select_delivery_location(&results, "10 WOODLANDS AVE").unwrap();
        assert_eq!(location.address, "10 WOODLANDS AVE");
        assert_eq!(location.coordinate, coord(1.4360, 103.7860));
    }

    #[test]
    fn test_select_delivery_location_errors() {
        let results = vec![hit("1 RAFFLES PLACE", "not-a-number", "103.8514")];
        assert!(matches!(
            select_delivery_location(&results, "2 NOWHERE ROAD"),
            Err(ValidationError::NotFound { .. })
        ));
        assert!(matches!(
            select_delivery_location(&results, "1 RAFFLES PLACE"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            select_delivery_location(&results, " "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_geocode_result_reads_api_payload() {
        let raw = r#"{"ADDRESS":"1 RAFFLES PLACE","LATITUDE":"1.2840","LONGITUDE":"103.8514","POSTAL":"048616"}"#;
        let result: GeocodeResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.coordinate().unwrap(), coord(1.2840, 103.8514));
    }
}
