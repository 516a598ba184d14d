//! Server-rendered lookup page.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::config::LocationConfig;
use crate::types::{AddressResult, LookupStatus};
use crate::zipcode::ZIP_CODE_PATTERN;

const TITLE: &str = "AWS Location Service - ZIP Code Lookup";

/// What the embedded map needs to render
#[derive(Debug, Clone, Default)]
pub struct MapSettings {
    pub region: String,
    pub api_key: Option<String>,
    pub map_name: Option<String>,
}

impl MapSettings {
    pub fn from_config(config: &LocationConfig) -> Self {
        Self {
            region: config.region.clone(),
            api_key: config.api_key.clone(),
            map_name: config.map_name.clone(),
        }
    }
}

/// Message shown above the form
pub struct Notice<'a> {
    pub text: &'a str,
    pub is_error: bool,
}

/// Lookup page: the form, then an optional notice and result
pub fn lookup_page(
    zip_code: &str,
    notice: Option<Notice<'_>>,
    result: Option<&AddressResult>,
    map: &MapSettings,
) -> Markup {
    layout(html! {
        h2 { (TITLE) }
        (lookup_form(zip_code))
        @if let Some(notice) = notice {
            @let class = if notice.is_error { "notice notice-error" } else { "notice" };
            div class=(class) role="alert" {
                (notice.text)
            }
        }
        @if let Some(result) = result {
            (result_section(result, map))
        }
    })
}

fn layout(content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (TITLE) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                (content)
            }
        }
    }
}

fn lookup_form(zip_code: &str) -> Markup {
    // a plain GET form submits on Enter as well as on click
    html! {
        form method="get" action="/lookup" {
            label for="zip" { "Enter ZIP Code" }
            div class="input-row" {
                input id="zip" name="zip" type="text" placeholder="e.g. 92021"
                    pattern=(ZIP_CODE_PATTERN) minlength="5" maxlength="10"
                    required value=(zip_code);
                button type="submit" { "Lookup Address" }
            }
        }
    }
}

fn result_section(result: &AddressResult, map: &MapSettings) -> Markup {
    match (result.status(), result.primary_place()) {
        (LookupStatus::Success, Some(place)) => html! {
            div class="address-container" {
                h2 { "Address Information" }
                p { "Full Address: " (result.formatted_address()) }
                div class="address-details" {
                    (detail("Street Number", &place.address_number))
                    (detail("Street", &place.street))
                    (detail("City", &place.municipality))
                    (detail("County", &place.sub_region))
                    (detail("State", &place.region))
                    (detail("Postal Code", &place.postal_code))
                    (detail("Country", &place.country))
                }
                p { "Coordinates: " (result.latitude()) ", " (result.longitude()) }
                @if result.places().len() > 1 {
                    h3 { "Other matches" }
                    ul {
                        @for other in &result.places()[1..] {
                            li { (other.label) }
                        }
                    }
                }
            }
            @if let Some((latitude, longitude)) = result.coordinates() {
                (map_panel(latitude, longitude, map))
            }
        },
        _ => html! {
            p class="no-results" { "No address information found for this ZIP code." }
        },
    }
}

fn detail(name: &str, value: &str) -> Markup {
    html! {
        @if !value.is_empty() {
            p { (name) ": " (value) }
        }
    }
}

fn map_panel(latitude: f64, longitude: f64, map: &MapSettings) -> Markup {
    let (Some(api_key), Some(map_name)) = (&map.api_key, &map.map_name) else {
        return html! {};
    };
    html! {
        div class="map-container" {
            h2 { "Location Map" }
            iframe srcdoc=(map_document(latitude, longitude, &map.region, api_key, map_name))
                width="100%" height="400" style="border: none" {}
            p { "Map powered by AWS Location Service" }
        }
    }
}

/// Standalone MapLibre page centered on the given point
fn map_document(
    latitude: f64,
    longitude: f64,
    region: &str,
    api_key: &str,
    map_name: &str,
) -> String {
    let js = |s: &str| serde_json::Value::from(s).to_string();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <script src="https://unpkg.com/maplibre-gl@2.x/dist/maplibre-gl.js"></script>
  <link href="https://unpkg.com/maplibre-gl@2.x/dist/maplibre-gl.css" rel="stylesheet">
  <style>body {{ margin: 0; }} #map {{ position: absolute; top: 0; bottom: 0; width: 100%; }}</style>
</head>
<body>
  <div id="map"></div>
  <script>
    const region = {region};
    const mapName = {map_name};
    const apiKey = {api_key};
    const map = new maplibregl.Map({{
      container: "map",
      style: `https://maps.geo.${{region}}.amazonaws.com/maps/v0/maps/${{mapName}}/style-descriptor?key=${{apiKey}}`,
      center: [{longitude}, {latitude}],
      zoom: 13
    }});
    new maplibregl.Marker().setLngLat([{longitude}, {latitude}]).addTo(map);
  </script>
</body>
</html>"#,
        region = js(region),
        map_name = js(map_name),
        api_key = js(api_key),
        longitude = longitude,
        latitude = latitude,
    )
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 1rem; }
.input-row { display: flex; gap: 0.5rem; }
.input-row input { flex: 1; padding: 0.4rem; }
.notice { margin: 1rem 0; padding: 0.6rem; border-radius: 6px; background: #eef; }
.notice-error { background: #fee; color: #900; }
"#;
