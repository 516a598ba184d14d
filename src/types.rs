use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single address lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupStatus {
    Success,
    NotFound,
    Error,
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One candidate address returned by the provider.
///
/// Components the provider leaves out are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub address_number: String,
    pub street: String,
    /// City
    pub municipality: String,
    /// State or province
    pub region: String,
    /// County
    pub sub_region: String,
    pub postal_code: String,
    pub country: String,
    /// Full single-line address
    pub label: String,
}

/// Result of looking up a ZIP code.
///
/// Built through [`AddressResult::success`], [`AddressResult::not_found`] or
/// [`AddressResult::error`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResult {
    status: LookupStatus,
    formatted_address: String,
    places: Vec<Place>,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    zip_code: Option<String>,
}

impl AddressResult {
    /// A successful lookup. `places` must hold at least the primary match.
    pub fn success(
        zip_code: impl Into<String>,
        formatted_address: impl Into<String>,
        places: Vec<Place>,
        (latitude, longitude): (f64, f64),
    ) -> Self {
        debug_assert!(!places.is_empty(), "success without places");
        Self {
            status: LookupStatus::Success,
            formatted_address: formatted_address.into(),
            places,
            latitude,
            longitude,
            error_message: None,
            zip_code: Some(zip_code.into()),
        }
    }

    /// A well-formed query that matched nothing
    pub fn not_found(zip_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: LookupStatus::NotFound,
            formatted_address: String::new(),
            places: Vec::new(),
            latitude: 0.0,
            longitude: 0.0,
            error_message: Some(message.into()),
            zip_code: Some(zip_code.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Unknown error".to_string();
        }
        Self {
            status: LookupStatus::Error,
            formatted_address: String::new(),
            places: Vec::new(),
            latitude: 0.0,
            longitude: 0.0,
            error_message: Some(message),
            zip_code: None,
        }
    }

    pub fn status(&self) -> LookupStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == LookupStatus::Success
    }

    pub fn formatted_address(&self) -> &str {
        &self.formatted_address
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// The primary (first) match
    pub fn primary_place(&self) -> Option<&Place> {
        self.places.first()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `(latitude, longitude)` of the primary match, `None` for the `(0, 0)` sentinel
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if self.latitude == 0.0 && self.longitude == 0.0 {
            None
        } else {
            Some((self.latitude, self.longitude))
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }
}

/// Search request body sent to the place index
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchTextRequest {
    pub text: String,
    pub max_results: u32,
}

/// Raw provider payload, decoded as JSON but not yet interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub body: serde_json::Value,
}

impl ProviderResponse {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }
}

/// Search response from the place index
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchTextResponse {
    #[serde(default)]
    pub summary: Option<SearchSummary>,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchSummary {
    #[serde(default)]
    pub text: Option<String>,
    /// `[west, south, east, north]`
    #[serde(default, rename = "ResultBBox")]
    pub result_bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub data_source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    pub place: ProviderPlace,
    #[serde(default)]
    pub relevance: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderPlace {
    pub label: Option<String>,
    pub address_number: Option<String>,
    pub street: Option<String>,
    pub municipality: Option<String>,
    pub region: Option<String>,
    pub sub_region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    /// `[longitude, latitude]`
    pub point: Option<Vec<f64>>,
}

impl From<&ProviderPlace> for Place {
    fn from(place: &ProviderPlace) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            address_number: field(&place.address_number),
            street: field(&place.street),
            municipality: field(&place.municipality),
            region: field(&place.region),
            sub_region: field(&place.sub_region),
            postal_code: field(&place.postal_code),
            country: field(&place.country),
            label: field(&place.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_serializes_without_places() {
        let result = AddressResult::error("Invalid ZIP code format");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "ERROR");
        assert_eq!(json["errorMessage"], "Invalid ZIP code format");
        assert_eq!(json["formattedAddress"], "");
        assert_eq!(json["places"].as_array().unwrap().len(), 0);
        assert!(json.get("zipCode").is_none());
    }

    #[test]
    fn test_error_message_is_never_blank() {
        let result = AddressResult::error("  ");
        assert_eq!(result.error_message(), Some("Unknown error"));
    }

    #[test]
    fn test_zero_coordinates_are_absent() {
        let result = AddressResult::success("92021", "x", vec![Place::default()], (0.0, 0.0));
        assert_eq!(result.coordinates(), None);

        let result = AddressResult::success("92021", "x", vec![Place::default()], (32.8, -116.9));
        assert_eq!(result.coordinates(), Some((32.8, -116.9)));
    }

    #[test]
    fn test_provider_place_defaults_missing_fields() {
        let json = r#"{"Label":"San Diego, CA","Municipality":"San Diego"}"#;
        let raw: ProviderPlace = serde_json::from_str(json).unwrap();
        let place = Place::from(&raw);
        assert_eq!(place.label, "San Diego, CA");
        assert_eq!(place.municipality, "San Diego");
        assert_eq!(place.street, "");
        assert_eq!(place.sub_region, "");
    }

    #[test]
    fn test_search_request_uses_provider_field_names() {
        let request = SearchTextRequest {
            text: "92021".to_string(),
            max_results: 5,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"Text":"92021","MaxResults":5}"#);
    }
}
