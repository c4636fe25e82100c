// SPDX-License-Identifier: Apache-2.0

use aiact_model::IssuedCertificate;
use chrono::{DateTime, Utc};

use crate::badge::{EXPIRED_BADGE_TEXT, NOT_FOUND_BADGE_TEXT};
use crate::colors::{level_color, risk_color, Rgb, INK, MUTED, PLACEHOLDER, SLATE};
use crate::escape::truncate_chars;
use crate::pdf::{Font, Page, PdfDocument, PAGE_HEIGHT, PAGE_WIDTH};

const MARGIN: f32 = 48.0;
const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
const STAMP: Rgb = Rgb(0xb9, 0x1c, 0x1c);
const DATE_FORMAT: &str = "%Y-%m-%d";

/// What the certificate PDF shows for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateView<'a> {
    Valid(&'a IssuedCertificate),
    /// Still rendered in full, stamped as expired on every page.
    Expired(&'a IssuedCertificate),
    NotFound,
}

#[must_use]
pub fn resolve_certificate_view(
    certificate: Option<&IssuedCertificate>,
    now: DateTime<Utc>,
) -> CertificateView<'_> {
    match certificate {
        None => CertificateView::NotFound,
        Some(cert) if cert.is_expired(now) => CertificateView::Expired(cert),
        Some(cert) => CertificateView::Valid(cert),
    }
}

/// Two pages, the certificate itself and a verification sheet, or a single
/// placeholder page when there is nothing to show.
#[must_use]
pub fn render_certificate_pdf(view: CertificateView<'_>) -> Vec<u8> {
    let (cert, expired) = match view {
        CertificateView::Valid(cert) => (cert, false),
        CertificateView::Expired(cert) => (cert, true),
        CertificateView::NotFound => return not_found_pdf(),
    };
    let mut doc = PdfDocument::new(&format!(
        "EU AI Act Compliance Certificate {}",
        cert.cert_id
    ));
    let mut pages = [certificate_page(cert), verification_page(cert)];
    if expired {
        for page in &mut pages {
            stamp_expired(page, cert);
        }
    }
    for page in pages {
        doc.push_page(page);
    }
    doc.finish()
}

fn stamp_expired(page: &mut Page, cert: &IssuedCertificate) {
    let center = PAGE_WIDTH / 2.0;
    page.fill_rect(MARGIN, PAGE_HEIGHT / 2.0 - 30.0, PAGE_WIDTH - MARGIN * 2.0, 60.0, STAMP);
    page.text_centered(center, PAGE_HEIGHT / 2.0 + 2.0, Font::Bold, 24.0, WHITE, EXPIRED_BADGE_TEXT);
    page.text_centered(
        center,
        PAGE_HEIGHT / 2.0 - 20.0,
        Font::Regular,
        10.0,
        WHITE,
        &format!("Validity ended {}", cert.valid_until.format(DATE_FORMAT)),
    );
}

fn not_found_pdf() -> Vec<u8> {
    let center = PAGE_WIDTH / 2.0;
    let mut page = Page::default();
    page.stroke_rect(
        MARGIN / 2.0,
        MARGIN / 2.0,
        PAGE_WIDTH - MARGIN,
        PAGE_HEIGHT - MARGIN,
        2.0,
        PLACEHOLDER,
    );
    page.text_centered(center, PAGE_HEIGHT / 2.0 + 20.0, Font::Bold, 26.0, PLACEHOLDER, NOT_FOUND_BADGE_TEXT);
    page.text_centered(
        center,
        PAGE_HEIGHT / 2.0 - 12.0,
        Font::Regular,
        11.0,
        MUTED,
        "No certificate is registered under this identifier.",
    );
    let mut doc = PdfDocument::new("EU AI Act Compliance Certificate");
    doc.push_page(page);
    doc.finish()
}

fn certificate_page(cert: &IssuedCertificate) -> Page {
    let level = level_color(cert.level);
    let center = PAGE_WIDTH / 2.0;
    let mut page = Page::default();

    page.stroke_rect(
        MARGIN / 2.0,
        MARGIN / 2.0,
        PAGE_WIDTH - MARGIN,
        PAGE_HEIGHT - MARGIN,
        4.0,
        level,
    );
    page.stroke_rect(
        MARGIN * 0.75,
        MARGIN * 0.75,
        PAGE_WIDTH - MARGIN * 1.5,
        PAGE_HEIGHT - MARGIN * 1.5,
        0.75,
        level,
    );

    page.text_centered(center, 720.0, Font::Bold, 26.0, INK, "Certificate of Compliance");
    page.text_centered(center, 692.0, Font::Regular, 13.0, MUTED, "EU Artificial Intelligence Act (Regulation (EU) 2024/1689)");
    page.line((MARGIN * 2.0, 672.0), (PAGE_WIDTH - MARGIN * 2.0, 672.0), 1.0, level);

    page.text_centered(center, 620.0, Font::Regular, 12.0, MUTED, "This certifies that the AI system");
    page.text_centered(center, 584.0, Font::Bold, 22.0, INK, &truncate_chars(&cert.system_name, 44));
    page.text_centered(center, 556.0, Font::Regular, 12.0, MUTED, "operated by");
    page.text_centered(center, 530.0, Font::Bold, 16.0, INK, &truncate_chars(&cert.organization_name, 56));

    page.fill_rect(center - 110.0, 440.0, 220.0, 54.0, level);
    page.text_centered(
        center,
        460.0,
        Font::Bold,
        22.0,
        WHITE,
        &format!("{} Certification", cert.level.label()),
    );
    page.text_centered(
        center,
        410.0,
        Font::Regular,
        13.0,
        INK,
        &format!("Compliance score {}/100", cert.score),
    );

    page.fill_rect(center - 70.0, 368.0, 140.0, 22.0, risk_color(cert.risk_level));
    page.text_centered(
        center,
        375.0,
        Font::Bold,
        11.0,
        WHITE,
        cert.risk_level.label(),
    );

    let rows = [
        ("Certificate ID", cert.cert_id.to_string()),
        ("Issued", cert.issued_at.format(DATE_FORMAT).to_string()),
        ("Valid until", cert.valid_until.format(DATE_FORMAT).to_string()),
        (
            "Next verification",
            cert.next_verification_at.format(DATE_FORMAT).to_string(),
        ),
    ];
    let mut y = 300.0;
    for (label, value) in rows {
        page.text(MARGIN * 2.5, y, Font::Regular, 11.0, MUTED, label);
        page.text(PAGE_WIDTH / 2.0, y, Font::Bold, 11.0, INK, &value);
        y -= 22.0;
    }

    page.line((MARGIN * 2.0, 150.0), (PAGE_WIDTH - MARGIN * 2.0, 150.0), 0.5, MUTED);
    page.text_centered(
        center,
        130.0,
        Font::Regular,
        9.0,
        MUTED,
        "Issued on the basis of self-reported requirement completion and live monitoring signals.",
    );
    page
}

fn verification_page(cert: &IssuedCertificate) -> Page {
    let mut page = Page::default();
    page.fill_rect(0.0, PAGE_HEIGHT - 90.0, PAGE_WIDTH, 90.0, SLATE);
    page.text(MARGIN, PAGE_HEIGHT - 55.0, Font::Bold, 20.0, WHITE, "Certificate Verification");

    let mut y = PAGE_HEIGHT - 140.0;
    let fields = [
        ("Certificate ID", cert.cert_id.to_string()),
        ("Organization", cert.organization_name.clone()),
        ("Organization ID", cert.organization_id.to_string()),
        ("AI system", cert.system_name.clone()),
        ("System ID", cert.system_id.to_string()),
        ("Risk classification", cert.risk_level.label().to_string()),
        ("Certification level", cert.level.label().to_string()),
        ("Compliance score", format!("{}/100", cert.score)),
        ("Issued", cert.issued_at.format(DATE_FORMAT).to_string()),
        ("Valid until", cert.valid_until.format(DATE_FORMAT).to_string()),
        (
            "Next verification",
            cert.next_verification_at.format(DATE_FORMAT).to_string(),
        ),
    ];
    for (label, value) in fields {
        page.text(MARGIN, y, Font::Regular, 11.0, MUTED, label);
        page.text(MARGIN + 160.0, y, Font::Bold, 11.0, INK, &truncate_chars(&value, 60));
        y -= 20.0;
    }

    y -= 20.0;
    page.text(MARGIN, y, Font::Bold, 12.0, INK, "How to verify");
    y -= 20.0;
    let notes = [
        format!("Request /v1/certificates/{} to confirm the current status.", cert.cert_id),
        "A certificate is void once its validity date has passed.".to_string(),
        "Compliance is re-verified against live signals by the next verification date.".to_string(),
    ];
    for note in notes {
        page.text(MARGIN, y, Font::Regular, 10.0, MUTED, &note);
        y -= 16.0;
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiact_core::{CertId, OrganizationId, SystemId};
    use aiact_model::{CertificationLevel, RiskLevel};
    use chrono::{TimeZone, Utc};

    fn cert() -> IssuedCertificate {
        let issued = Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).single().expect("date");
        IssuedCertificate {
            cert_id: CertId::new("AIC-2026-0A1B2C3D").expect("id"),
            organization_id: OrganizationId::new("org-1").expect("org"),
            organization_name: "Müller (Holding)".to_string(),
            system_id: SystemId::new("sys-1").expect("sys"),
            system_name: "Claims triage".to_string(),
            risk_level: RiskLevel::High,
            level: CertificationLevel::Silver,
            score: 88,
            issued_at: issued,
            valid_until: issued,
            next_verification_at: issued,
        }
    }

    #[test]
    fn certificate_has_two_pages_and_escaped_names() {
        let bytes = render_certificate_pdf(CertificateView::Valid(&cert()));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 2"));
        assert!(text.contains("\\(Holding\\)"));
        assert!(text.contains("Silver Certification"));
        assert!(!text.contains(EXPIRED_BADGE_TEXT));
    }

    #[test]
    fn expired_certificate_is_stamped_on_both_pages() {
        let cert = cert();
        let view = resolve_certificate_view(Some(&cert), cert.valid_until);
        assert_eq!(view, CertificateView::Expired(&cert));
        let bytes = render_certificate_pdf(view);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 2"));
        assert_eq!(text.matches(EXPIRED_BADGE_TEXT).count(), 2);
        assert!(text.contains("Validity ended 2026-02-01"));
        assert!(text.contains("Silver Certification"));
    }

    #[test]
    fn missing_certificate_renders_a_single_placeholder_page() {
        let view = resolve_certificate_view(None, Utc::now());
        let bytes = render_certificate_pdf(view);
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains(NOT_FOUND_BADGE_TEXT));
        assert!(!text.contains("AIC-"));
    }
}
