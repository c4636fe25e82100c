// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Pure compliance projection.
//!
//! Nothing here performs I/O or caches: every call recomputes score, level,
//! status and certificate window from the snapshot it is given.

mod engine_error;
mod issue;
mod lifecycle;
mod progress;
mod score;
mod signals;
mod snapshot;
mod tier;

pub use engine_error::{EngineError, IssueError};
pub use issue::{derive_cert_id, issue_certificate, CERT_ID_PREFIX};
pub use lifecycle::{certificate_window, project_certification, CertificateWindow};
pub use progress::requirements_progress;
pub use score::{compute_score, ScoreBreakdown};
pub use signals::derive_checks;
pub use snapshot::SystemSnapshot;
pub use tier::classify_level;

pub const CRATE_NAME: &str = "aiact-engine";
