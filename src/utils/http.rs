//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Proxy headers consulted for the client address, in order of preference
const CLIENT_IP_HEADERS: [&str; 3] = ["X-Forwarded-For", "X-Real-IP", "CF-Connecting-IP"];

/// Extract client IP address from request headers
///
/// Takes the first hop of the first proxy header present, falling back to
/// the connection peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    for header_name in CLIENT_IP_HEADERS {
        let first_hop = req
            .headers()
            .get(header_name)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        if let Some(ip) = first_hop {
            return ip.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", " "))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "198.51.100.2");
    }

    #[test]
    fn test_user_agent() {
        let req = TestRequest::default()
            .insert_header(("User-Agent", "curl/8.0"))
            .to_http_request();
        assert_eq!(extract_user_agent(&req), Some("curl/8.0".to_string()));
        assert_eq!(extract_user_agent(&TestRequest::default().to_http_request()), None);
    }
}
