//! Venue ingestion from OpenStreetMap Overpass responses.
//!
//! Fetching is left to the caller; this module builds the Overpass QL query
//! and turns the JSON response into [`Venue`] records sorted nearest first,
//! each carrying the geohash the caller stores with it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo::{encode, GeoPoint};

/// Default search radius around the user, in meters.
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 1_000;

/// Most venues returned from one response.
pub const MAX_VENUES: usize = 50;

/// Geohash precision stored with venue records (~38 m × 19 m).
pub const VENUE_GEOHASH_PRECISION: usize = 8;

/// OSM keys queried for named points of interest.
const POI_KEYS: [&str; 4] = ["amenity", "shop", "leisure", "tourism"];

/// Venue category shown in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VenueCategory {
    Coffee,
    Restaurant,
    Bar,
    Shopping,
    Entertainment,
    Outdoors,
    Gym,
    Health,
    Services,
    Education,
    Transport,
    #[default]
    Other,
}

impl VenueCategory {
    /// Maps OSM tags to a category. The first matching rule wins.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use checkin_core::venue::VenueCategory;
    ///
    /// let tags = HashMap::from([("amenity".to_string(), "cafe".to_string())]);
    /// assert_eq!(VenueCategory::from_tags(&tags), VenueCategory::Coffee);
    /// ```
    #[must_use]
    pub fn from_tags(tags: &HashMap<String, String>) -> Self {
        let tag = |key: &str| tags.get(key).map(String::as_str);

        match tag("amenity") {
            Some("cafe") => return Self::Coffee,
            Some("restaurant" | "fast_food" | "ice_cream") => return Self::Restaurant,
            Some("bar" | "pub") => return Self::Bar,
            _ => {}
        }

        if tag("shop").is_some() || tag("amenity") == Some("marketplace") {
            return Self::Shopping;
        }

        if matches!(tag("amenity"), Some("cinema" | "theatre")) {
            return Self::Entertainment;
        }
        match tag("leisure") {
            Some("park" | "garden" | "playground") => return Self::Outdoors,
            Some("sports_centre" | "fitness_centre") => return Self::Gym,
            _ => {}
        }

        match tag("amenity") {
            Some("hospital" | "clinic") => return Self::Health,
            Some("bank" | "post_office") => return Self::Services,
            Some("library" | "school" | "university") => return Self::Education,
            _ => {}
        }

        if tag("railway") == Some("station")
            || tag("amenity") == Some("bus_station")
            || tag("aeroway") == Some("aerodrome")
        {
            return Self::Transport;
        }

        match tag("tourism") {
            Some("museum" | "gallery") => return Self::Entertainment,
            Some("attraction" | "viewpoint") => return Self::Outdoors,
            _ => {}
        }
        if tag("historic").is_some() {
            return Self::Entertainment;
        }

        Self::Other
    }
}

/// A named point of interest a user can check in at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Stable id of the form `osm-<type>-<id>`
    pub id: String,

    /// Display name from the `name` tag
    pub name: String,

    /// Venue coordinates (way centre for areas)
    pub location: GeoPoint,

    /// Display category derived from the tags
    pub category: VenueCategory,

    /// Street address when the tags carry one
    pub address: Option<String>,

    /// Geohash at [`VENUE_GEOHASH_PRECISION`]
    pub geohash: String,

    /// Raw OSM tags
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Some((lat, lon)),
            (_, _, Some(center)) => Some((center.lat, center.lon)),
            _ => None,
        }
    }
}

/// Joins house number, street and city from the `addr:*` tags.
///
/// ```
/// use std::collections::HashMap;
/// use checkin_core::venue::format_address;
///
/// let tags = HashMap::from([
///     ("addr:housenumber".to_string(), "1".to_string()),
///     ("addr:street".to_string(), "Ferry Building".to_string()),
/// ]);
/// assert_eq!(format_address(&tags).as_deref(), Some("1 Ferry Building"));
/// ```
#[must_use]
pub fn format_address(tags: &HashMap<String, String>) -> Option<String> {
    let parts: Vec<&str> = ["addr:housenumber", "addr:street", "addr:city"]
        .iter()
        .filter_map(|key| tags.get(*key).map(String::as_str))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Builds the Overpass QL query for named points of interest within
/// `radius_m` meters of `origin`, returning way centres.
#[must_use]
pub fn overpass_query(origin: GeoPoint, radius_m: u32) -> String {
    let around = format!("(around:{radius_m},{},{})", origin.lat, origin.lng);
    let mut query = String::from("[out:json][timeout:25];\n(\n");
    for element in ["node", "way"] {
        for key in POI_KEYS {
            query.push_str(&format!("  {element}[\"name\"][\"{key}\"]{around};\n"));
        }
    }
    query.push_str(");\nout center;\n");
    query
}

/// Parses an Overpass JSON response into venues, nearest to `origin` first.
///
/// Elements without a name or usable coordinates are skipped. At most
/// [`MAX_VENUES`] are returned.
///
/// # Errors
///
/// Returns [`CoreError::Serialization`](crate::CoreError::Serialization) if
/// the body is not a valid Overpass response.
pub fn parse_overpass_response(json: &str, origin: GeoPoint) -> Result<Vec<Venue>> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    let total = response.elements.len();

    let mut venues: Vec<(f64, Venue)> = response
        .elements
        .into_iter()
        .filter_map(|element| {
            let name = element.tags.get("name")?.clone();
            let (lat, lon) = element.position()?;
            let location = GeoPoint::new(lat, lon).ok()?;
            let geohash = encode(lat, lon, VENUE_GEOHASH_PRECISION).ok()?;
            let venue = Venue {
                id: format!("osm-{}-{}", element.kind, element.id),
                name,
                location,
                category: VenueCategory::from_tags(&element.tags),
                address: format_address(&element.tags),
                geohash,
                tags: element.tags,
            };
            Some((origin.distance_to(location), venue))
        })
        .collect();

    venues.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    venues.truncate(MAX_VENUES);

    log::debug!(
        "parsed {} venues from {total} overpass elements",
        venues.len()
    );
    Ok(venues.into_iter().map(|(_, venue)| venue).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn categorizes_food_and_drink() {
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "cafe")])),
            VenueCategory::Coffee
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "fast_food")])),
            VenueCategory::Restaurant
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "pub")])),
            VenueCategory::Bar
        );
    }

    #[test]
    fn any_shop_is_shopping() {
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("shop", "bakery")])),
            VenueCategory::Shopping
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "marketplace")])),
            VenueCategory::Shopping
        );
    }

    #[test]
    fn amenity_rule_beats_shop_rule() {
        let both = tags(&[("amenity", "cafe"), ("shop", "coffee")]);
        assert_eq!(VenueCategory::from_tags(&both), VenueCategory::Coffee);
    }

    #[test]
    fn categorizes_leisure_transit_and_tourism() {
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("leisure", "fitness_centre")])),
            VenueCategory::Gym
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("leisure", "playground")])),
            VenueCategory::Outdoors
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("railway", "station")])),
            VenueCategory::Transport
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("aeroway", "aerodrome")])),
            VenueCategory::Transport
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("tourism", "museum")])),
            VenueCategory::Entertainment
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("tourism", "viewpoint")])),
            VenueCategory::Outdoors
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("historic", "castle")])),
            VenueCategory::Entertainment
        );
    }

    #[test]
    fn categorizes_services() {
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "clinic")])),
            VenueCategory::Health
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "post_office")])),
            VenueCategory::Services
        );
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "university")])),
            VenueCategory::Education
        );
    }

    #[test]
    fn unknown_tags_are_other() {
        assert_eq!(
            VenueCategory::from_tags(&tags(&[("amenity", "bench")])),
            VenueCategory::Other
        );
        assert_eq!(VenueCategory::from_tags(&HashMap::new()), VenueCategory::Other);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&VenueCategory::Entertainment).unwrap();
        assert_eq!(json, "\"entertainment\"");
    }

    #[test]
    fn address_skips_missing_parts() {
        let t = tags(&[("addr:street", "Market St"), ("addr:city", "San Francisco")]);
        assert_eq!(format_address(&t).as_deref(), Some("Market St San Francisco"));
        assert_eq!(format_address(&tags(&[("name", "x")])), None);
    }

    #[test]
    fn query_covers_nodes_and_ways() {
        let origin = GeoPoint::new(37.5, -122.25).unwrap();
        let query = overpass_query(origin, 1_000);
        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("node[\"name\"][\"amenity\"](around:1000,37.5,-122.25);"));
        assert!(query.contains("way[\"name\"][\"tourism\"](around:1000,37.5,-122.25);"));
        assert!(query.trim_end().ends_with("out center;"));
        assert_eq!(query.matches("around:").count(), 8);
        assert!(query.ends_with(");\nout center;\n"));
        assert_eq!(query.lines().count(), 12);
    }

    #[test]
    fn parses_nodes_and_way_centres_nearest_first() {
        let origin = GeoPoint::new(37.7955, -122.3937).unwrap();
        let json = r#"{
            "elements": [
                {"type": "way", "id": 7, "center": {"lat": 37.7990, "lon": -122.3937},
                 "tags": {"name": "Pier Park", "leisure": "park"}},
                {"type": "node", "id": 42, "lat": 37.7956, "lon": -122.3937,
                 "tags": {"name": "Blue Bottle", "amenity": "cafe",
                          "addr:housenumber": "1", "addr:street": "Ferry Building"}},
                {"type": "node", "id": 9, "lat": 37.7960, "lon": -122.3937,
                 "tags": {"amenity": "bench"}},
                {"type": "way", "id": 8, "tags": {"name": "No Geometry", "shop": "mall"}}
            ]
        }"#;

        let venues = parse_overpass_response(json, origin).unwrap();

        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].id, "osm-node-42");
        assert_eq!(venues[0].name, "Blue Bottle");
        assert_eq!(venues[0].category, VenueCategory::Coffee);
        assert_eq!(venues[0].address.as_deref(), Some("1 Ferry Building"));
        assert_eq!(venues[0].geohash.len(), VENUE_GEOHASH_PRECISION);
        assert_eq!(venues[1].id, "osm-way-7");
        assert_eq!(venues[1].category, VenueCategory::Outdoors);
    }

    #[test]
    fn skips_out_of_range_coordinates() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        let json = r#"{"elements": [
            {"type": "node", "id": 1, "lat": 95.0, "lon": 0.0, "tags": {"name": "Nowhere"}}
        ]}"#;
        assert!(parse_overpass_response(json, origin).unwrap().is_empty());
    }

    #[test]
    fn truncates_to_max_venues() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        let elements: Vec<String> = (0..60)
            .map(|i| {
                format!(
                    r#"{{"type":"node","id":{i},"lat":{},"lon":0.0,"tags":{{"name":"v{i}"}}}}"#,
                    f64::from(i) * 0.0001
                )
            })
            .collect();
        let json = format!(r#"{{"elements":[{}]}}"#, elements.join(","));

        let venues = parse_overpass_response(&json, origin).unwrap();
        assert_eq!(venues.len(), MAX_VENUES);
        assert_eq!(venues[0].name, "v0");
        assert_eq!(venues[MAX_VENUES - 1].name, "v49");
    }

    #[test]
    fn missing_elements_is_empty() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(parse_overpass_response("{}", origin).unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_an_error() {
        let origin = GeoPoint::new(0.0, 0.0).unwrap();
        assert!(parse_overpass_response("<html>rate limited</html>", origin).is_err());
    }
}
