/// HTTP middleware utilities for content-service
///
/// Provides the admin session extractor and request metrics.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use crate::error::AppError;
use crate::metrics::http::HTTP_REQUEST_DURATION_SECONDS;

// =====================================================================
// Admin authentication
// =====================================================================

/// Admin credentials registered as app data; `None` disables admin routes.
#[derive(Clone)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    fn verify(&self, presented: &str) -> Result<(), AppError> {
        let expected = self.token.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("Admin API is not configured".to_string())
        })?;

        if constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Invalid admin token".to_string()))
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Proof that the request carried a valid admin bearer token.
///
/// Handlers take this as an argument; the session is checked per request
/// against [`AdminAuth`] rather than read from ambient state.
#[derive(Debug, Clone)]
pub struct AdminSession;

impl AdminSession {
    fn from_http(req: &HttpRequest) -> Result<Self, AppError> {
        let auth = req
            .app_data::<web::Data<AdminAuth>>()
            .ok_or_else(|| AppError::ServiceUnavailable("Admin API is not configured".into()))?;

        // disabled admin API answers 503 regardless of credentials
        if auth.token.is_none() {
            return Err(AppError::ServiceUnavailable(
                "Admin API is not configured".to_string(),
            ));
        }

        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))?;

        auth.verify(token.trim())?;
        Ok(AdminSession)
    }
}

impl FromRequest for AdminSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Self::from_http(req).map_err(Error::from))
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        // route pattern keeps label cardinality bounded
        let route = req
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();
            let status = match &res {
                Ok(response) => response.status().as_u16().to_string(),
                Err(err) => err.as_response_error().status_code().as_u16().to_string(),
            };

            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[method.as_str(), route.as_str(), status.as_str()])
                .observe(elapsed.as_secs_f64());
            tracing::debug!(%method, %path, %status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn request_with(auth: AdminAuth, header: Option<&str>) -> HttpRequest {
        let mut req = TestRequest::default().app_data(web::Data::new(auth));
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        req.to_http_request()
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret2"));
    }

    #[test]
    fn test_admin_session_accepts_valid_token() {
        let req = request_with(AdminAuth::new(Some("s3cret".into())), Some("Bearer s3cret"));
        assert!(AdminSession::from_http(&req).is_ok());
    }

    #[test]
    fn test_admin_session_rejects_bad_credentials() {
        let auth = AdminAuth::new(Some("s3cret".into()));

        let missing = request_with(auth.clone(), None);
        assert!(matches!(
            AdminSession::from_http(&missing),
            Err(AppError::Unauthorized(_))
        ));

        let wrong = request_with(auth.clone(), Some("Bearer nope"));
        assert!(matches!(
            AdminSession::from_http(&wrong),
            Err(AppError::Unauthorized(_))
        ));

        let scheme = request_with(auth, Some("Basic s3cret"));
        assert!(matches!(
            AdminSession::from_http(&scheme),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_admin_session_disabled_without_token() {
        let req = request_with(AdminAuth::new(None), Some("Bearer anything"));
        assert!(matches!(
            AdminSession::from_http(&req),
            Err(AppError::ServiceUnavailable(_))
        ));
    }
}
