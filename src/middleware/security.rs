//! Response hardening headers.
//!
//! The dashboard page gets the configured CSP, which admits the chart and
//! map CDNs. Every other response gets [`NON_DOCUMENT_CSP`]. Responses tied
//! to a chat session are marked `no-store` so a shared cache never replays
//! someone's conversation.

use crate::{
    config::{NON_DOCUMENT_CSP, SecurityHeadersConfig},
    services::session::SESSION_COOKIE,
};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap, HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// Security headers middleware factory
pub struct SecurityHeaders {
    config: Rc<SecurityHeadersConfig>,
}

impl SecurityHeaders {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

/// What the middleware needs to know about a finished response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseKind {
    /// Body is an HTML document
    pub html: bool,
    /// Request or response carries the session cookie
    pub session_bearing: bool,
}

impl ResponseKind {
    fn of<B>(res: &ServiceResponse<B>) -> Self {
        let html = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));

        let session_bearing = res.request().cookie(SESSION_COOKIE).is_some()
            || res.response().cookies().any(|c| c.name() == SESSION_COOKIE);

        Self {
            html,
            session_bearing,
        }
    }
}

/// Insert the hardening headers for a response of `kind`
pub fn apply_security_headers(headers: &mut HeaderMap, config: &SecurityHeadersConfig, kind: ResponseKind) {
    if config.content_type_options {
        headers.insert(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        );
    }

    if let Ok(value) = HeaderValue::from_str(&config.frame_options) {
        headers.insert(HeaderName::from_static("x-frame-options"), value);
    }

    if let Ok(value) = HeaderValue::from_str(&config.referrer_policy) {
        headers.insert(HeaderName::from_static("referrer-policy"), value);
    }

    if config.csp_enabled {
        let policy = if kind.html {
            HeaderValue::from_str(&config.csp_directives).ok()
        } else {
            Some(HeaderValue::from_static(NON_DOCUMENT_CSP))
        };
        if let Some(value) = policy {
            headers.insert(header::CONTENT_SECURITY_POLICY, value);
        }
    }

    if config.hsts_enabled
        && let Ok(value) = HeaderValue::from_str(&format!("max-age={}", config.hsts_max_age))
    {
        headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
    }

    // Handlers that chose a caching policy (images) keep it
    if kind.session_bearing && !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
    config: Rc<SecurityHeadersConfig>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);
        let config = Rc::clone(&self.config);

        Box::pin(async move {
            let mut res = fut.await?;
            let kind = ResponseKind::of(&res);
            apply_security_headers(res.headers_mut(), &config, kind);
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: ResponseKind = ResponseKind {
        html: true,
        session_bearing: false,
    };
    const SESSION_JSON: ResponseKind = ResponseKind {
        html: false,
        session_bearing: true,
    };

    #[test]
    fn test_page_csp_only_on_html() {
        let config = SecurityHeadersConfig::default();

        let mut page = HeaderMap::new();
        apply_security_headers(&mut page, &config, PAGE);
        let csp = page.get(header::CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("https://cdn.jsdelivr.net"));
        assert!(page.get(header::CACHE_CONTROL).is_none());

        let mut json = HeaderMap::new();
        apply_security_headers(&mut json, &config, SESSION_JSON);
        assert_eq!(json.get(header::CONTENT_SECURITY_POLICY).unwrap(), NON_DOCUMENT_CSP);
    }

    #[test]
    fn test_session_responses_are_not_stored() {
        let config = SecurityHeadersConfig::default();

        let mut json = HeaderMap::new();
        apply_security_headers(&mut json, &config, SESSION_JSON);
        assert_eq!(json.get(header::CACHE_CONTROL).unwrap(), "no-store");

        let mut image = HeaderMap::new();
        image.insert(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=86400"));
        apply_security_headers(&mut image, &config, SESSION_JSON);
        assert_eq!(image.get(header::CACHE_CONTROL).unwrap(), "public, max-age=86400");
    }

    #[test]
    fn test_toggles() {
        let config = SecurityHeadersConfig {
            csp_enabled: false,
            hsts_enabled: true,
            hsts_max_age: 60,
            content_type_options: false,
            ..SecurityHeadersConfig::default()
        };

        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers, &config, PAGE);
        assert!(headers.get(header::CONTENT_SECURITY_POLICY).is_none());
        assert!(headers.get("x-content-type-options").is_none());
        assert_eq!(headers.get(header::STRICT_TRANSPORT_SECURITY).unwrap(), "max-age=60");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    }
}
