//! Map marker, popup, and radius overlay for the queried location.

use super::RenderError;
use crate::models::CurrentConditions;
use crate::utils::{
    html::escape_html,
    units::{capitalize, kelvin_to_celsius},
};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Radius of the circle drawn around the marker
pub const MAP_CIRCLE_RADIUS_METERS: f64 = 8000.0;

const MAP_ZOOM: u8 = 10;

/// Everything Leaflet needs to draw the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct MapView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
    /// Escaped HTML shown in the marker popup
    pub popup_html: String,
    pub circle_radius_m: f64,
}

/// The map slot of the page: either a map or the reason it is missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct MapPanel {
    pub map: Option<MapView>,
    pub error: Option<String>,
}

impl From<Result<MapView, RenderError>> for MapPanel {
    fn from(result: Result<MapView, RenderError>) -> Self {
        match result {
            Ok(map) => MapPanel {
                map: Some(map),
                error: None,
            },
            Err(e) => MapPanel {
                map: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Build the map for a location's current conditions
pub fn build_map(conditions: &CurrentConditions) -> Result<MapView, RenderError> {
    let lat = conditions.coordinate.lat;
    let lon = conditions.coordinate.lon;

    let valid = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    if !valid {
        return Err(RenderError::InvalidCoordinate { lat, lon });
    }

    let place = conditions
        .city_name
        .as_deref()
        .map(|name| format!("<b>{}</b><br>", escape_html(name)))
        .unwrap_or_default();

    let popup_html = format!(
        "{place}🌡 {:.1}°C<br>{}<br>💧 {}%<br>🌬 {} m/s",
        kelvin_to_celsius(conditions.temperature),
        escape_html(&capitalize(&conditions.description)),
        conditions.humidity,
        conditions.wind_speed,
    );

    Ok(MapView {
        lat,
        lon,
        zoom: MAP_ZOOM,
        popup_html,
        circle_radius_m: MAP_CIRCLE_RADIUS_METERS,
    })
}
