//! Route pattern extraction utilities.

use actix_web::HttpRequest;

/// Extract a low-cardinality route label for metrics
///
/// Asset paths are collapsed to a single pattern so each image name does
/// not become its own label.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    route_pattern_for_path(req.path())
}

fn route_pattern_for_path(path: &str) -> String {
    if path.starts_with("/assets/") {
        "/assets/{name}".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        "/unknown".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_collapse_to_pattern() {
        assert_eq!(route_pattern_for_path("/assets/sunny.jpg"), "/assets/{name}");
        assert_eq!(route_pattern_for_path("/api/weather"), "/api/weather");
        assert_eq!(route_pattern_for_path("weird"), "/unknown");
    }
}
