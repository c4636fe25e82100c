// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod convert;
pub mod dto;
pub mod error_mapping;
mod errors;
pub mod openapi;
pub mod params;

pub use convert::{certificate_dto, projection_dto};
pub use dto::{
    CertificateDto, CertificationProjectionDto, CertificationWindowDto, ChecksDto,
    DocumentRequestDto, DocumentSectionDto, RequirementsDto, VersionDto,
};
pub use errors::{ApiError, ApiErrorCode, API_ERROR_CODES};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "aiact-api";
pub const API_VERSION: &str = "v1";
pub const TENANT_HEADER: &str = "x-organization-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";
