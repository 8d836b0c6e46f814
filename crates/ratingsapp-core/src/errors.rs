//! Error taxonomy shared by every layer of the API.
//!
//! Three shapes of failure exist:
//!
//! - [`ErrorCode`]: a single public code (`not_found`, `read_only`, ...) that is safe to
//!   return to API users verbatim.
//! - [`ValidationErrors`]: a map of field names to public codes, produced by the
//!   validation pipeline and by storage constraint translation.
//! - [`AppError::Internal`]: anything else. It is logged with its full context and
//!   rendered to the caller only as `server_error`.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::json;

/// Public error codes. The string returned by [`ErrorCode::as_str`] is the stable
/// value exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorCode {
    #[error("resource not found")]
    NotFound,
    #[error("resource cannot be modified or deleted")]
    ReadOnly,
    #[error("field cannot be modified")]
    FieldReadOnly,
    #[error("resource cannot be deleted because other resources depend on it")]
    InUse,
    #[error("credentials or token are invalid, or the user does not exist")]
    Unauthorized,
    #[error("user does not have permissions to perform this action")]
    Forbidden,
    #[error("primary key already exists")]
    IdTaken,
    #[error("value is shorter than required")]
    TooShort,
    #[error("value is longer than allowed")]
    TooLong,
    #[error("value cannot be empty")]
    Required,
    #[error("value does not match its specification")]
    Invalid,
    #[error("value already exists and cannot be duplicated")]
    IsDuplicate,
    #[error("referenced resource not found")]
    ReferenceNotFound,
    #[error("username, password or refresh token are empty")]
    CredentialsNotProvided,
    #[error("provided JSON input cannot be parsed")]
    InvalidJson,
    #[error("provided form input cannot be parsed")]
    InvalidForm,
    #[error("the content-type provided is not supported")]
    ContentTypeNotAccepted,
    #[error("contents are not in an appropriate format")]
    InvalidParse,
    #[error("the content-type or accept header cannot be satisfied")]
    NotAcceptable,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::ReadOnly => "read_only",
            ErrorCode::FieldReadOnly => "field_read_only",
            ErrorCode::InUse => "in_use",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::IdTaken => "id_taken",
            ErrorCode::TooShort => "too_short",
            ErrorCode::TooLong => "too_long",
            ErrorCode::Required => "required",
            ErrorCode::Invalid => "invalid",
            ErrorCode::IsDuplicate => "is_duplicate",
            ErrorCode::ReferenceNotFound => "reference_not_found",
            ErrorCode::CredentialsNotProvided => "credentials_not_provided",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::InvalidForm => "invalid_form",
            ErrorCode::ContentTypeNotAccepted => "content_type_not_accepted",
            ErrorCode::InvalidParse => "invalid_parse",
            ErrorCode::NotAcceptable => "not_acceptable",
        }
    }

    /// HTTP status used when this code is returned on its own, or as part of a
    /// validation error.
    pub const fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound | ErrorCode::ReferenceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ErrorCode::IsDuplicate
            | ErrorCode::ReadOnly
            | ErrorCode::FieldReadOnly
            | ErrorCode::InUse => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Field name to error code map. Nested fields use dotted names, e.g. `user.email`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, ErrorCode>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a validation error with a single field.
    pub fn single(field: impl Into<String>, code: ErrorCode) -> Self {
        let mut errors = Self::new();
        errors.insert(field, code);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, code: ErrorCode) {
        self.0.insert(field.into(), code);
    }

    pub fn get(&self, field: &str) -> Option<ErrorCode> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ErrorCode)> {
        self.0.iter().map(|(field, code)| (field.as_str(), *code))
    }

    /// Merges `nested` into `self`, prefixing every nested field with `prefix.`.
    pub fn merge_nested(&mut self, prefix: &str, nested: ValidationErrors) {
        for (field, code) in nested.0 {
            self.0.insert(format!("{prefix}.{field}"), code);
        }
    }

    /// Returns `true` when every field of `other` carries the same code in `self`.
    pub fn includes(&self, other: &ValidationErrors) -> bool {
        other.iter().all(|(field, code)| self.get(field) == Some(code))
    }

    fn status(&self) -> StatusCode {
        self.0
            .values()
            .map(|code| code.status())
            .find(|status| *status != StatusCode::BAD_REQUEST)
            .unwrap_or(StatusCode::BAD_REQUEST)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "validation error on fields {}", fields.join(", "))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, code) in &self.0 {
            map.serialize_entry(field, code.as_str())?;
        }
        map.end()
    }
}

impl std::error::Error for ValidationErrors {}

/// Error type returned by services, validators and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{code}: {0}", code = .0.as_str())]
    Public(ErrorCode),
    #[error(transparent)]
    Validation(ValidationErrors),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found() -> Self {
        Self::Public(ErrorCode::NotFound)
    }

    pub fn unauthorized() -> Self {
        Self::Public(ErrorCode::Unauthorized)
    }

    pub fn forbidden() -> Self {
        Self::Public(ErrorCode::Forbidden)
    }

    pub fn read_only() -> Self {
        Self::Public(ErrorCode::ReadOnly)
    }

    /// Validation error on a single field.
    pub fn field(field: impl Into<String>, code: ErrorCode) -> Self {
        Self::Validation(ValidationErrors::single(field, code))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    /// Public code of this error. Internal errors report `server_error`.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Public(code) => code.as_str(),
            AppError::Validation(_) => "validation_error",
            AppError::Internal(_) => "server_error",
        }
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        matches!(self, AppError::Public(c) if *c == code)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Public(code) => code.status(),
            AppError::Validation(errors) => errors.status(),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::Public(code)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Public(code) => json!({ "error": code.as_str() }),
            AppError::Validation(fields) => json!({
                "error": "validation_error",
                "fields": fields,
            }),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error while handling request");
                json!({ "error": "server_error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_snake_case_strings() {
        assert_eq!(ErrorCode::ReferenceNotFound.as_str(), "reference_not_found");
        assert_eq!(ErrorCode::IsDuplicate.as_str(), "is_duplicate");
        assert_eq!(
            serde_json::to_string(&ErrorCode::CredentialsNotProvided).unwrap(),
            r#""credentials_not_provided""#
        );
    }

    #[test]
    fn test_merge_nested_prefixes_fields() {
        let mut outer = ValidationErrors::single("score", ErrorCode::Required);
        let mut nested = ValidationErrors::new();
        nested.insert("email", ErrorCode::Invalid);
        nested.insert("roleId", ErrorCode::ReferenceNotFound);

        outer.merge_nested("user", nested);

        assert_eq!(outer.len(), 3);
        assert_eq!(outer.get("user.email"), Some(ErrorCode::Invalid));
        assert_eq!(outer.get("user.roleId"), Some(ErrorCode::ReferenceNotFound));
        assert!(!outer.contains("user"));
    }

    #[test]
    fn test_validation_errors_serialize_as_code_map() {
        let mut errors = ValidationErrors::single("label", ErrorCode::TooShort);
        errors.insert("id", ErrorCode::IdTaken);

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, json!({ "id": "id_taken", "label": "too_short" }));
    }

    #[test]
    fn test_validation_status_prefers_specific_codes() {
        let mut errors = ValidationErrors::single("firstName", ErrorCode::Required);
        assert_eq!(AppError::from(errors.clone()).status(), StatusCode::BAD_REQUEST);

        errors.insert("email", ErrorCode::IsDuplicate);
        assert_eq!(AppError::from(errors).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(err.code(), "server_error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_includes_matches_subset() {
        let mut errors = ValidationErrors::single("email", ErrorCode::Required);
        errors.insert("password", ErrorCode::TooShort);

        assert!(errors.includes(&ValidationErrors::single("email", ErrorCode::Required)));
        assert!(!errors.includes(&ValidationErrors::single("email", ErrorCode::Invalid)));
    }
}
