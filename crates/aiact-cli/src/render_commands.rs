// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use aiact_api::params::validate_document_request;
use aiact_api::DocumentRequestDto;
use aiact_render::{
    render_badge, render_certificate_pdf, render_document_pdf, resolve_badge_subject,
    resolve_certificate_view, BadgeStyle, CertificateView, DocumentSection,
};
use serde_json::json;

use crate::inputs::{parse_at, read_certificate, read_json};
use crate::output::{emit_ok, write_artifact, write_stdout};
use crate::{BadgeStyleCli, CliError, OutputMode};

impl From<BadgeStyleCli> for BadgeStyle {
    fn from(value: BadgeStyleCli) -> Self {
        match value {
            BadgeStyleCli::Standard => Self::Standard,
            BadgeStyleCli::Compact => Self::Compact,
            BadgeStyleCli::Detailed => Self::Detailed,
        }
    }
}

/// Writes the SVG itself, to `--out` or stdout, never a JSON envelope.
pub(crate) fn run_badge(
    certificate: Option<&Path>,
    style: BadgeStyleCli,
    at: Option<&str>,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let cert = certificate.map(read_certificate).transpose()?;
    let now = parse_at(at)?;
    let svg = render_badge(resolve_badge_subject(cert.as_ref(), now), style.into());
    match out {
        Some(path) => write_artifact(path, svg.as_bytes()),
        None => write_stdout(svg.as_bytes()),
    }
}

pub(crate) fn run_certificate_pdf(
    certificate: &Path,
    at: Option<&str>,
    out: &Path,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let cert = read_certificate(certificate)?;
    let view = resolve_certificate_view(Some(&cert), parse_at(at)?);
    let expired = matches!(view, CertificateView::Expired(_));
    let pdf = render_certificate_pdf(view);
    write_artifact(out, &pdf)?;
    emit_ok(
        output_mode,
        json!({
            "command": "render certificate-pdf",
            "cert_id": cert.cert_id,
            "expired": expired,
            "bytes": pdf.len(),
            "out": out,
        }),
    )
}

pub(crate) fn run_document_pdf(
    request: &Path,
    out: &Path,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let request: DocumentRequestDto = read_json(request, "read document request")?;
    validate_document_request(&request).map_err(|err| {
        CliError::validation("invalid_document", err.message.clone())
            .with_detail("details", &err.details.to_string())
    })?;
    let sections: Vec<DocumentSection> = request
        .sections
        .into_iter()
        .map(|s| DocumentSection {
            heading: s.heading,
            body: s.body,
        })
        .collect();
    let pdf = render_document_pdf(&request.title, &sections);
    write_artifact(out, &pdf)?;
    emit_ok(
        output_mode,
        json!({
            "command": "render document-pdf",
            "sections": sections.len(),
            "bytes": pdf.len(),
            "out": out,
        }),
    )
}
