use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

/// Emits one `request_completed` event per request, levelled by status
/// class and tagged with the realm when the path names one.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct Completion {
    method: String,
    path: String,
    realm: String,
    trace_id: String,
    started: Instant,
}

impl Completion {
    fn emit(&self, status: StatusCode) {
        let status_code = status.as_u16();
        let duration_us = self.started.elapsed().as_micros() as u64;
        let Self {
            method,
            path,
            realm,
            trace_id,
            ..
        } = self;
        if status.is_server_error() {
            error!(
                http.method = %method,
                url.path = %path,
                realm = %realm,
                http.status_code = status_code,
                duration_us,
                trace_id = %trace_id,
                "request_completed"
            );
        } else if status.is_client_error() {
            warn!(
                http.method = %method,
                url.path = %path,
                realm = %realm,
                http.status_code = status_code,
                duration_us,
                trace_id = %trace_id,
                "request_completed"
            );
        } else {
            info!(
                http.method = %method,
                url.path = %path,
                realm = %realm,
                http.status_code = status_code,
                duration_us,
                trace_id = %trace_id,
                "request_completed"
            );
        }
    }
}

/// `/api/realms/{realm_id}/...` → `realm_id`.
fn realm_segment(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("api"), Some("realms"), Some(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let completion = Completion {
            method: req.method().to_string(),
            path: req.path().to_string(),
            realm: realm_segment(req.path()).unwrap_or("-").to_string(),
            trace_id: req
                .extensions()
                .get::<String>()
                .cloned()
                .unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        };
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            completion.emit(status);
            result
        })
    }
}
