// SPDX-License-Identifier: Apache-2.0

use aiact_model::{CertificationLevel, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[must_use]
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// PDF colour operands in `0..=1`, three decimals.
    #[must_use]
    pub(crate) fn pdf_operands(self) -> String {
        let c = |v: u8| f32::from(v) / 255.0;
        format!("{:.3} {:.3} {:.3}", c(self.0), c(self.1), c(self.2))
    }
}

pub(crate) const INK: Rgb = Rgb(0x11, 0x18, 0x27);
pub(crate) const MUTED: Rgb = Rgb(0x4b, 0x55, 0x63);
pub(crate) const PLACEHOLDER: Rgb = Rgb(0x9c, 0xa3, 0xaf);
pub(crate) const SLATE: Rgb = Rgb(0x1f, 0x29, 0x37);

#[must_use]
pub fn risk_color(risk: RiskLevel) -> Rgb {
    match risk {
        RiskLevel::Minimal => Rgb(0x16, 0xa3, 0x4a),
        RiskLevel::Limited => Rgb(0x93, 0x33, 0xea),
        RiskLevel::High => Rgb(0xea, 0x58, 0x0c),
        RiskLevel::Prohibited => Rgb(0xdc, 0x26, 0x26),
        _ => PLACEHOLDER,
    }
}

/// `None` has no medal colour and renders in the placeholder grey.
#[must_use]
pub fn level_color(level: CertificationLevel) -> Rgb {
    match level {
        CertificationLevel::Bronze => Rgb(0xcd, 0x7f, 0x32),
        CertificationLevel::Silver => Rgb(0xa8, 0xa9, 0xad),
        CertificationLevel::Gold => Rgb(0xd4, 0xaf, 0x37),
        CertificationLevel::None => PLACEHOLDER,
    }
}
