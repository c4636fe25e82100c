// SPDX-License-Identifier: Apache-2.0

use aiact_core::{CertId, OrganizationId, SystemId};
use aiact_model::{CertificationLevel, IssuedCertificate, RiskLevel};
use aiact_render::{
    render_badge, render_certificate_pdf, render_document_pdf, resolve_badge_subject,
    resolve_certificate_view, BadgeStyle, BadgeSubject, CertificateView, DocumentSection,
    NOT_FOUND_BADGE_TEXT,
};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn certificate(system_name: &str) -> IssuedCertificate {
    let issued = Utc.with_ymd_and_hms(2026, 1, 20, 12, 0, 0).single().expect("date");
    IssuedCertificate {
        cert_id: CertId::new("AIC-2026-DEADBEEF").expect("id"),
        organization_id: OrganizationId::new("org-acme").expect("org"),
        organization_name: "Acme & Sons".to_string(),
        system_id: SystemId::new("sys-1").expect("sys"),
        system_name: system_name.to_string(),
        risk_level: RiskLevel::Limited,
        level: CertificationLevel::Gold,
        score: 97,
        issued_at: issued,
        valid_until: issued + Duration::days(365),
        next_verification_at: issued + Duration::days(90),
    }
}

#[test]
fn badges_are_byte_identical_for_identical_input() {
    let cert = certificate("Support assistant");
    for style in BadgeStyle::ALL {
        let a = render_badge(BadgeSubject::Found(&cert), style);
        let b = render_badge(BadgeSubject::Found(&cert.clone()), style);
        assert_eq!(a, b, "{}", style.as_str());
        let (w, h) = style.size();
        assert!(a.starts_with("<svg"));
        assert!(a.contains(&format!("viewBox=\"0 0 {w} {h}\"")));
        assert!(a.contains("#d4af37"));
        assert!(a.ends_with("</svg>"));
    }
}

#[test]
fn standard_badge_carries_risk_colour_and_escaped_org() {
    let svg = render_badge(BadgeSubject::Found(&certificate("Chat")), BadgeStyle::Standard);
    assert!(svg.contains("#9333ea"));
    assert!(svg.contains("Acme &amp; Sons"));
    assert!(!svg.contains("Acme & Sons"));
}

#[test]
fn expired_and_unknown_certificates_render_placeholders() {
    let cert = certificate("Chat");
    let after_expiry = cert.valid_until;
    assert_eq!(
        resolve_badge_subject(Some(&cert), after_expiry),
        BadgeSubject::Expired
    );
    assert_eq!(
        resolve_badge_subject(Some(&cert), cert.issued_at),
        BadgeSubject::Found(&cert)
    );
    let svg = render_badge(resolve_badge_subject(None, after_expiry), BadgeStyle::Compact);
    assert!(svg.contains(NOT_FOUND_BADGE_TEXT));
    assert!(svg.contains("viewBox=\"0 0 200 36\""));
}

#[test]
fn pdfs_are_deterministic() {
    let cert = certificate("Support assistant");
    assert_eq!(
        render_certificate_pdf(CertificateView::Valid(&cert)),
        render_certificate_pdf(CertificateView::Valid(&cert))
    );
    let expired = resolve_certificate_view(Some(&cert), cert.valid_until + Duration::days(1));
    assert_eq!(render_certificate_pdf(expired), render_certificate_pdf(expired));
    assert_ne!(
        render_certificate_pdf(expired),
        render_certificate_pdf(CertificateView::Valid(&cert))
    );
    assert_eq!(
        render_certificate_pdf(CertificateView::NotFound),
        render_certificate_pdf(resolve_certificate_view(None, cert.issued_at))
    );

    let sections = vec![
        DocumentSection {
            heading: "Purpose".to_string(),
            body: Some("Describes the intended purpose of the system.".to_string()),
        },
        DocumentSection {
            heading: "Human oversight".to_string(),
            body: None,
        },
    ];
    let a = render_document_pdf("Technical documentation", &sections);
    let b = render_document_pdf("Technical documentation", &sections);
    assert_eq!(a, b);
    assert!(a.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&a);
    assert!(text.contains("This section has not been completed yet."));
    assert!(text.contains("Page 1 of 1"));
}

proptest! {
    #[test]
    fn user_text_never_breaks_svg_markup(name in ".{1,80}") {
        let cert = certificate(&name);
        for style in BadgeStyle::ALL {
            let svg = render_badge(BadgeSubject::Found(&cert), style);
            let open = svg.matches("<text").count();
            let close = svg.matches("</text>").count();
            prop_assert_eq!(open, close);
            prop_assert!(svg.ends_with("</svg>"));
            prop_assert_eq!(svg.matches("<svg").count(), 1);
        }
    }
}
