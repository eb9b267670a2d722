//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every request-shape failure becomes `400 invalid_request` with a
//! `details` object naming the offending `field` and a stable `code`.

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use pagination::PaginationError;
use serde_json::json;

use crate::domain::{
    Error, LoginValidationError, ProductId, ProductValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidNumber,
    InvalidJson,
    PayloadTooLarge,
    EmptyValue,
    InvalidFormat,
    OutOfRange,
    UnknownValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::PayloadTooLarge => "payload_too_large",
            ErrorCode::EmptyValue => "empty_value",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::UnknownValue => "unknown_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn payload_too_large_error(field: FieldName, limit: usize) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be at most {limit} bytes"))
        .with_code(ErrorCode::PayloadTooLarge)
}

pub(crate) fn empty_value_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be empty"))
        .with_code(ErrorCode::EmptyValue)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse a product id path segment.
pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId, Error> {
    raw.parse::<ProductId>()
        .map_err(|_| invalid_uuid_error(FieldName::new("id"), raw))
}

pub(crate) fn map_pagination_error(err: PaginationError) -> Error {
    let message = err.to_string();
    ValidationError::new(err.param().as_str(), message)
        .with_value(ErrorCode::InvalidNumber, err.value())
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::InvalidId => ("id", ErrorCode::InvalidUuid),
        UserValidationError::EmptyEmail => ("email", ErrorCode::EmptyValue),
        UserValidationError::InvalidEmail => ("email", ErrorCode::InvalidFormat),
        UserValidationError::EmptyUsername => ("username", ErrorCode::EmptyValue),
        UserValidationError::UsernameTooLong { .. } => ("username", ErrorCode::OutOfRange),
        UserValidationError::UsernameContainsWhitespace => ("username", ErrorCode::InvalidFormat),
        UserValidationError::EmptyPassword => ("password", ErrorCode::EmptyValue),
        UserValidationError::UnknownRole(_) => ("role", ErrorCode::UnknownValue),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::EmptyValue)
}

pub(crate) fn map_product_validation_error(err: ProductValidationError) -> Error {
    let code = match &err {
        ProductValidationError::InvalidId => ErrorCode::InvalidUuid,
        ProductValidationError::EmptyName
        | ProductValidationError::EmptyDescription
        | ProductValidationError::EmptyCategory => ErrorCode::EmptyValue,
        ProductValidationError::NonPositivePrice
        | ProductValidationError::NonPositiveStock
        | ProductValidationError::StockOutOfRange => ErrorCode::OutOfRange,
        ProductValidationError::InvalidImage(_) => ErrorCode::InvalidFormat,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

/// `JsonConfig` error handler turning body failures into domain errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}"))
        .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() }))
        .into()
}
