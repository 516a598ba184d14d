//! Conversion of place index responses into [`AddressResult`]s.

use tracing::{debug, warn};

use crate::types::{AddressResult, Place, ProviderResponse, SearchTextResponse};

/// Upper bound on the number of places kept from one response
pub const MAX_PLACES: usize = 10;

/// Where the primary match's coordinates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateStrategy {
    /// `Geometry.Point = [longitude, latitude]` of the first result
    Point,
    /// Center of `Summary.ResultBBox = [west, south, east, north]`
    BoundingBox,
}

/// Interpret a provider response for `zip_code`.
///
/// Never fails: payloads that don't have the expected shape become an
/// `ERROR` result.
pub fn translate(
    raw: &ProviderResponse,
    zip_code: &str,
    strategy: CoordinateStrategy,
) -> AddressResult {
    let response: SearchTextResponse = match serde_json::from_value(raw.body.clone()) {
        Ok(response) => response,
        Err(e) => {
            warn!(
                "cannot parse place index response for [{}]: {}",
                zip_code, e
            );
            return AddressResult::error(format!("Error parsing response: {}", e));
        }
    };

    let Some(first) = response.results.first() else {
        warn!("no results found for ZIP code [{}]", zip_code);
        return AddressResult::not_found(
            zip_code,
            format!("No results found for ZIP code {}", zip_code),
        );
    };

    let coordinates = match strategy {
        CoordinateStrategy::Point => first
            .place
            .geometry
            .as_ref()
            .and_then(|g| g.point.as_deref())
            .and_then(point_to_lat_lon),
        CoordinateStrategy::BoundingBox => response
            .summary
            .as_ref()
            .and_then(|s| s.result_bbox.as_deref())
            .and_then(bbox_center),
    }
    .unwrap_or((0.0, 0.0));

    let places: Vec<Place> = response
        .results
        .iter()
        .take(MAX_PLACES)
        .map(|result| Place::from(&result.place))
        .collect();

    debug!(
        "translated {} place(s) for [{}], primary at {:?}",
        places.len(),
        zip_code,
        coordinates
    );

    let formatted_address = first.place.label.clone().unwrap_or_default();
    AddressResult::success(zip_code, formatted_address, places, coordinates)
}

/// `[lon, lat]` to `(lat, lon)`
fn point_to_lat_lon(point: &[f64]) -> Option<(f64, f64)> {
    match point {
        [lon, lat, ..] => Some((*lat, *lon)),
        _ => None,
    }
}

/// Center of `[west, south, east, north]` as `(lat, lon)`
pub fn bbox_center(bbox: &[f64]) -> Option<(f64, f64)> {
    match bbox {
        [west, south, east, north, ..] => Some(((south + north) / 2.0, (west + east) / 2.0)),
        _ => None,
    }
}
