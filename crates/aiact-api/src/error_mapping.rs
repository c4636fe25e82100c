// SPDX-License-Identifier: Apache-2.0

use crate::{ApiError, ApiErrorCode};

pub const API_ERROR_SCHEMA_REF: &str = "#/components/schemas/ApiError";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
    pub schema_ref: &'static str,
}

#[must_use]
pub const fn status_for_code(code: ApiErrorCode) -> u16 {
    match code {
        ApiErrorCode::MissingTenant
        | ApiErrorCode::InvalidPathParameter
        | ApiErrorCode::InvalidQueryParameter
        | ApiErrorCode::ValidationFailed => 400,
        ApiErrorCode::SystemNotFound | ApiErrorCode::CertificateNotFound => 404,
        ApiErrorCode::PayloadTooLarge => 413,
        ApiErrorCode::NotQualified => 422,
        ApiErrorCode::UpstreamStoreUnavailable => 503,
        ApiErrorCode::Internal => 500,
    }
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    ApiErrorMapping {
        status_code: status_for_code(error.code),
        schema_ref: API_ERROR_SCHEMA_REF,
    }
}
