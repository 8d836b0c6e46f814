//! JSON content negotiation for the resource routes.

use axum::{
    extract::Request,
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::Response,
};

use ratingsapp_core::errors::{AppError, ErrorCode};

const JSON: &str = "application/json";

/// An absent `Accept` header accepts anything.
fn accepts_json(headers: &HeaderMap) -> bool {
    match headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
        None => true,
        Some(accept) if accept.trim().is_empty() => true,
        Some(accept) => {
            accept.contains("*/*") || accept.contains("application/*") || accept.contains(JSON)
        }
    }
}

fn sends_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|content_type| content_type.contains(JSON))
}

/// Refuses requests whose `Accept` header excludes JSON, and bodies on
/// POST/PUT/PATCH that are not declared as JSON.
pub async fn require_json(req: Request, next: Next) -> Result<Response, AppError> {
    if !accepts_json(req.headers()) {
        return Err(ErrorCode::NotAcceptable.into());
    }

    let has_body = matches!(*req.method(), Method::POST | Method::PUT | Method::PATCH);
    if has_body && !sends_json(req.headers()) {
        return Err(ErrorCode::NotAcceptable.into());
    }

    Ok(next.run(req).await)
}
