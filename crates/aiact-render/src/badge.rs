// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write as _;

use aiact_model::IssuedCertificate;
use chrono::{DateTime, Utc};

use crate::colors::{level_color, risk_color, INK, MUTED, PLACEHOLDER, SLATE};
use crate::escape::{truncate_chars, xml_escape};

pub const NOT_FOUND_BADGE_TEXT: &str = "Certificate Not Found";
pub const EXPIRED_BADGE_TEXT: &str = "Certificate Expired";

const FONT: &str = "Helvetica, Arial, sans-serif";
const WHITE: &str = "#ffffff";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BadgeStyle {
    #[default]
    Standard,
    Compact,
    Detailed,
}

impl BadgeStyle {
    pub const ALL: [Self; 3] = [Self::Standard, Self::Compact, Self::Detailed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compact => "compact",
            Self::Detailed => "detailed",
        }
    }

    /// Unknown names yield `None`; callers pick the fallback.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "compact" => Some(Self::Compact),
            "detailed" => Some(Self::Detailed),
            _ => None,
        }
    }

    #[must_use]
    pub const fn size(self) -> (u32, u32) {
        match self {
            Self::Standard => (280, 120),
            Self::Compact => (200, 36),
            Self::Detailed => (340, 200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeSubject<'a> {
    Found(&'a IssuedCertificate),
    NotFound,
    Expired,
}

/// Classifies a certificate lookup for rendering at `now`.
#[must_use]
pub fn resolve_badge_subject(
    certificate: Option<&IssuedCertificate>,
    now: DateTime<Utc>,
) -> BadgeSubject<'_> {
    match certificate {
        None => BadgeSubject::NotFound,
        Some(cert) if cert.is_expired(now) => BadgeSubject::Expired,
        Some(cert) => BadgeSubject::Found(cert),
    }
}

#[must_use]
pub fn render_badge(subject: BadgeSubject<'_>, style: BadgeStyle) -> String {
    match subject {
        BadgeSubject::Found(cert) => match style {
            BadgeStyle::Standard => standard(cert),
            BadgeStyle::Compact => compact(cert),
            BadgeStyle::Detailed => detailed(cert),
        },
        BadgeSubject::NotFound => placeholder(style, NOT_FOUND_BADGE_TEXT),
        BadgeSubject::Expired => placeholder(style, EXPIRED_BADGE_TEXT),
    }
}

fn open_svg(out: &mut String, style: BadgeStyle, label: &str) {
    let (w, h) = style.size();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" role=\"img\" aria-label=\"{}\">",
        xml_escape(label)
    );
    let _ = write!(out, "<title>{}</title>", xml_escape(label));
}

#[allow(clippy::too_many_arguments)]
fn text(
    out: &mut String,
    x: u32,
    y: u32,
    size: u32,
    fill: &str,
    bold: bool,
    anchor: &str,
    body: &str,
) {
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    let _ = write!(
        out,
        "<text x=\"{x}\" y=\"{y}\" font-family=\"{FONT}\" font-size=\"{size}\"{weight} fill=\"{fill}\" text-anchor=\"{anchor}\">{}</text>",
        xml_escape(body)
    );
}

fn risk_pill(out: &mut String, x: u32, y: u32, cert: &IssuedCertificate) {
    let label = cert.risk_level.label();
    let width = 16 + 6 * label.len() as u32;
    let _ = write!(
        out,
        "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"18\" rx=\"9\" fill=\"{}\"/>",
        risk_color(cert.risk_level).hex()
    );
    text(out, x + width / 2, y + 13, 10, WHITE, true, "middle", label);
}

fn headline(cert: &IssuedCertificate) -> String {
    format!("EU AI Act {} Certified", cert.level.label())
}

fn standard(cert: &IssuedCertificate) -> String {
    let level = level_color(cert.level).hex();
    let mut out = String::new();
    open_svg(&mut out, BadgeStyle::Standard, &format!("{}: {}", headline(cert), cert.system_name));
    let _ = write!(
        out,
        "<rect x=\"1\" y=\"1\" width=\"278\" height=\"118\" rx=\"10\" fill=\"{WHITE}\" stroke=\"{level}\" stroke-width=\"2\"/>"
    );
    let _ = write!(
        out,
        "<path d=\"M1 11a10 10 0 0 1 10-10h258a10 10 0 0 1 10 10v19H1z\" fill=\"{level}\"/>"
    );
    text(&mut out, 14, 21, 12, WHITE, true, "start", &headline(cert));
    text(&mut out, 266, 21, 12, WHITE, true, "end", &format!("{}/100", cert.score));
    text(&mut out, 14, 54, 15, &INK.hex(), true, "start", &truncate_chars(&cert.system_name, 30));
    text(&mut out, 14, 72, 11, &MUTED.hex(), false, "start", &truncate_chars(&cert.organization_name, 40));
    risk_pill(&mut out, 14, 82, cert);
    text(&mut out, 266, 112, 9, &MUTED.hex(), false, "end", cert.cert_id.as_str());
    out.push_str("</svg>");
    out
}

fn compact(cert: &IssuedCertificate) -> String {
    let level = level_color(cert.level).hex();
    let mut out = String::new();
    open_svg(&mut out, BadgeStyle::Compact, &format!("{}: {}", headline(cert), cert.system_name));
    let _ = write!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"200\" height=\"36\" rx=\"6\" fill=\"{}\"/>",
        SLATE.hex()
    );
    let _ = write!(
        out,
        "<path d=\"M96 0h98a6 6 0 0 1 6 6v24a6 6 0 0 1-6 6H96z\" fill=\"{level}\"/>"
    );
    let _ = write!(
        out,
        "<circle cx=\"14\" cy=\"18\" r=\"5\" fill=\"{}\"/>",
        risk_color(cert.risk_level).hex()
    );
    text(&mut out, 26, 23, 12, WHITE, true, "start", "EU AI Act");
    text(
        &mut out,
        148,
        23,
        12,
        WHITE,
        true,
        "middle",
        &format!("{} {}", cert.level.label(), cert.score),
    );
    out.push_str("</svg>");
    out
}

fn detailed(cert: &IssuedCertificate) -> String {
    let level = level_color(cert.level).hex();
    let ink = INK.hex();
    let muted = MUTED.hex();
    let mut out = String::new();
    open_svg(&mut out, BadgeStyle::Detailed, &format!("{}: {}", headline(cert), cert.system_name));
    let _ = write!(
        out,
        "<rect x=\"1\" y=\"1\" width=\"338\" height=\"198\" rx=\"12\" fill=\"{WHITE}\" stroke=\"{level}\" stroke-width=\"2\"/>"
    );
    let _ = write!(
        out,
        "<path d=\"M1 13a12 12 0 0 1 12-12h314a12 12 0 0 1 12 12v23H1z\" fill=\"{level}\"/>"
    );
    text(&mut out, 16, 24, 13, WHITE, true, "start", &headline(cert));
    text(&mut out, 324, 24, 13, WHITE, true, "end", &format!("Score {}/100", cert.score));
    text(&mut out, 16, 62, 16, &ink, true, "start", &truncate_chars(&cert.system_name, 34));
    text(&mut out, 16, 80, 11, &muted, false, "start", &truncate_chars(&cert.organization_name, 48));
    risk_pill(&mut out, 16, 90, cert);

    let rows = [
        ("Certificate", cert.cert_id.as_str().to_string()),
        ("Issued", cert.issued_at.format("%Y-%m-%d").to_string()),
        ("Valid until", cert.valid_until.format("%Y-%m-%d").to_string()),
        (
            "Next verification",
            cert.next_verification_at.format("%Y-%m-%d").to_string(),
        ),
    ];
    for (idx, (label, value)) in rows.iter().enumerate() {
        let y = 130 + 17 * idx as u32;
        text(&mut out, 16, y, 10, &muted, false, "start", label);
        text(&mut out, 324, y, 10, &ink, true, "end", value);
    }
    out.push_str("</svg>");
    out
}

fn placeholder(style: BadgeStyle, message: &str) -> String {
    let (w, h) = style.size();
    let grey = PLACEHOLDER.hex();
    let mut out = String::new();
    open_svg(&mut out, style, message);
    let _ = write!(
        out,
        "<rect x=\"1\" y=\"1\" width=\"{}\" height=\"{}\" rx=\"6\" fill=\"#f3f4f6\" stroke=\"{grey}\" stroke-width=\"2\" stroke-dasharray=\"6 4\"/>",
        w - 2,
        h - 2
    );
    let size = if style == BadgeStyle::Compact { 12 } else { 14 };
    text(&mut out, w / 2, h / 2 + size / 3, size, &MUTED.hex(), true, "middle", message);
    out.push_str("</svg>");
    out
}
