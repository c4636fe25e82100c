// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use aiact_core::{CertId, SystemId};
use aiact_model::TenantContext;
use aiact_render::BadgeStyle;
use serde_json::json;

use crate::dto::DocumentRequestDto;
use crate::errors::ApiError;
use crate::TENANT_HEADER;

pub const MAX_DOCUMENT_TITLE_CHARS: usize = 200;
pub const MAX_DOCUMENT_SECTIONS: usize = 100;
pub const MAX_SECTION_HEADING_CHARS: usize = 200;
pub const MAX_SECTION_BODY_CHARS: usize = 20_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PdfDisposition {
    #[default]
    Inline,
    Attachment,
}

impl PdfDisposition {
    #[must_use]
    pub fn header_value(self, filename: &str) -> String {
        let kind = match self {
            Self::Inline => "inline",
            Self::Attachment => "attachment",
        };
        format!("{kind}; filename=\"{filename}\"")
    }
}

pub fn parse_tenant(raw: Option<&str>) -> Result<TenantContext, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_tenant(TENANT_HEADER))?;
    TenantContext::parse(raw).map_err(|e| {
        ApiError::validation_failed(json!([{
            "field": TENANT_HEADER,
            "reason": e.to_string()
        }]))
    })
}

pub fn parse_system_id(raw: &str) -> Result<SystemId, ApiError> {
    SystemId::new(raw).map_err(|_| ApiError::invalid_path_param("system_id", raw))
}

pub fn parse_cert_id(raw: &str) -> Result<CertId, ApiError> {
    CertId::new(raw).map_err(|_| ApiError::invalid_path_param("cert_id", raw))
}

/// Badges never fail: an unknown or missing `style` renders the standard badge.
#[must_use]
pub fn parse_badge_style(query: &BTreeMap<String, String>) -> BadgeStyle {
    query
        .get("style")
        .and_then(|raw| BadgeStyle::parse(raw))
        .unwrap_or_default()
}

pub fn parse_pdf_disposition(
    query: &BTreeMap<String, String>,
) -> Result<PdfDisposition, ApiError> {
    match query.get("disposition").map(String::as_str) {
        None | Some("inline") => Ok(PdfDisposition::Inline),
        Some("attachment") => Ok(PdfDisposition::Attachment),
        Some(other) => Err(ApiError::invalid_param("disposition", other)),
    }
}

pub fn validate_document_request(request: &DocumentRequestDto) -> Result<(), ApiError> {
    let mut field_errors = Vec::new();
    if request.title.chars().count() > MAX_DOCUMENT_TITLE_CHARS {
        field_errors.push(json!({"field": "title", "reason": "too long"}));
    }
    if request.sections.len() > MAX_DOCUMENT_SECTIONS {
        field_errors.push(json!({"field": "sections", "reason": "too many sections"}));
    }
    for (idx, section) in request.sections.iter().enumerate() {
        if section.heading.chars().count() > MAX_SECTION_HEADING_CHARS {
            field_errors.push(json!({"field": format!("sections[{idx}].heading"), "reason": "too long"}));
        }
        if section
            .body
            .as_ref()
            .is_some_and(|body| body.chars().count() > MAX_SECTION_BODY_CHARS)
        {
            field_errors.push(json!({"field": format!("sections[{idx}].body"), "reason": "too long"}));
        }
    }
    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_failed(serde_json::Value::Array(field_errors)))
    }
}
