// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Pure renderers. Identical input produces byte-identical output and no
//! path returns an error: unknown or expired certificates and blank document
//! sections render as placeholders.

mod badge;
mod certificate;
mod colors;
mod document;
mod escape;
mod pdf;

pub use badge::{
    render_badge, resolve_badge_subject, BadgeStyle, BadgeSubject, EXPIRED_BADGE_TEXT,
    NOT_FOUND_BADGE_TEXT,
};
pub use certificate::{render_certificate_pdf, resolve_certificate_view, CertificateView};
pub use colors::{level_color, risk_color, Rgb};
pub use document::{render_document_pdf, DocumentSection, BLANK_SECTION_PLACEHOLDER};
pub use escape::{pdf_escape, xml_escape};

pub const CRATE_NAME: &str = "aiact-render";
