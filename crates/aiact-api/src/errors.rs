// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    MissingTenant,
    InvalidPathParameter,
    InvalidQueryParameter,
    ValidationFailed,
    SystemNotFound,
    CertificateNotFound,
    NotQualified,
    UpstreamStoreUnavailable,
    PayloadTooLarge,
    Internal,
}

pub const API_ERROR_CODES: [ApiErrorCode; 10] = [
    ApiErrorCode::MissingTenant,
    ApiErrorCode::InvalidPathParameter,
    ApiErrorCode::InvalidQueryParameter,
    ApiErrorCode::ValidationFailed,
    ApiErrorCode::SystemNotFound,
    ApiErrorCode::CertificateNotFound,
    ApiErrorCode::NotQualified,
    ApiErrorCode::UpstreamStoreUnavailable,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::Internal,
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingTenant => "MissingTenant",
            Self::InvalidPathParameter => "InvalidPathParameter",
            Self::InvalidQueryParameter => "InvalidQueryParameter",
            Self::ValidationFailed => "ValidationFailed",
            Self::SystemNotFound => "SystemNotFound",
            Self::CertificateNotFound => "CertificateNotFound",
            Self::NotQualified => "NotQualified",
            Self::UpstreamStoreUnavailable => "UpstreamStoreUnavailable",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn missing_tenant(header: &str) -> Self {
        Self::new(
            ApiErrorCode::MissingTenant,
            format!("missing tenant header: {header}"),
            json!({"header": header}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_path_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidPathParameter,
            format!("invalid path parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "invalid", "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn validation_failed(field_errors: Value) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({"field_errors": field_errors}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn system_not_found(system_id: &str) -> Self {
        Self::new(
            ApiErrorCode::SystemNotFound,
            "AI system not found",
            json!({"system_id": system_id}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn certificate_not_found(cert_id: &str) -> Self {
        Self::new(
            ApiErrorCode::CertificateNotFound,
            "certificate not found",
            json!({"cert_id": cert_id}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn not_qualified(status: &str, score: u8, percentage: u8) -> Self {
        Self::new(
            ApiErrorCode::NotQualified,
            "system does not qualify for a certificate",
            json!({
                "certification_status": status,
                "compliance_score": score,
                "requirements_percentage": percentage
            }),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn upstream_unavailable(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::UpstreamStoreUnavailable,
            "compliance store unavailable",
            json!({"reason": reason}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            ApiErrorCode::PayloadTooLarge,
            "request body too large",
            json!({"limit_bytes": limit_bytes}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}), "req-unknown")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_wire_names_match_variant_names() {
        for code in API_ERROR_CODES {
            let encoded = serde_json::to_value(code).expect("encode");
            assert_eq!(encoded, Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn details_schema_is_stable() {
        let e = ApiError::invalid_path_param("system_id", "bad id");
        assert_eq!(e.details["field_errors"][0]["parameter"], "system_id");
        assert_eq!(e.request_id, "req-unknown");
        let e = e.with_request_id("req-7");
        assert_eq!(e.request_id, "req-7");
    }
}
