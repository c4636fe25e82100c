// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// Snapshot belongs to another organization than the calling tenant.
    TenantMismatch { expected: String, actual: String },
    /// Certificate dates fall outside the representable calendar.
    WindowOutOfRange(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TenantMismatch { expected, actual } => {
                write!(f, "tenant mismatch: expected {expected}, got {actual}")
            }
            Self::WindowOutOfRange(msg) => write!(f, "certificate window out of range: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug)]
#[non_exhaustive]
pub enum IssueError {
    NotQualified {
        status: &'static str,
        score: u8,
        percentage: u8,
    },
    Engine(EngineError),
    Identifier(aiact_core::Error),
}

impl Display for IssueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotQualified {
                status,
                score,
                percentage,
            } => write!(
                f,
                "system does not qualify for a certificate (status={status} score={score} requirements={percentage}%)"
            ),
            Self::Engine(err) => write!(f, "{err}"),
            Self::Identifier(err) => write!(f, "certificate id derivation failed: {err}"),
        }
    }
}

impl std::error::Error for IssueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotQualified { .. } => None,
            Self::Engine(err) => Some(err),
            Self::Identifier(err) => Some(err),
        }
    }
}

impl From<EngineError> for IssueError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<aiact_core::Error> for IssueError {
    fn from(value: aiact_core::Error) -> Self {
        Self::Identifier(value)
    }
}
