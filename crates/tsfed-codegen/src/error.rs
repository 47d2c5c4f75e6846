//! Error types and omission reporting for code generation
//!
//! Only a missing entry file fails a compilation. Everything else that keeps
//! a symbol out of the emitted closure is recorded as an [`Omission`] so the
//! caller can tell an incomplete public surface from a complete one.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tsfed_core::CoreError;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Not found file at - {path} (entry point '{module}')")]
    EntryNotFound { module: String, path: String },

    #[error("Semantic model error: {0}")]
    Model(#[from] CoreError),

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Why an exported symbol did not make it into the closure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OmissionReason {
    /// The export resolves to no declaration at all
    UnresolvedDeclaration,
    /// The declaration kind has no printable form
    UnsupportedDeclaration,
    /// The export resolves into an external package but not through an
    /// import binding that could be re-exported
    UnresolvedReExport,
}

impl fmt::Display for OmissionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OmissionReason::UnresolvedDeclaration => write!(f, "UNRESOLVED_DECLARATION"),
            OmissionReason::UnsupportedDeclaration => write!(f, "UNSUPPORTED_DECLARATION"),
            OmissionReason::UnresolvedReExport => write!(f, "UNRESOLVED_RE_EXPORT"),
        }
    }
}

/// One exported symbol left out of an entry point's closure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Omission {
    /// Logical module name of the entry point
    pub module: String,
    /// Exported name
    pub symbol: String,
    pub reason: OmissionReason,
    /// Shape of the offending declaration, when there is one
    pub detail: Option<String>,
}

impl Omission {
    pub fn new(module: impl Into<String>, symbol: impl Into<String>, reason: OmissionReason) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            reason,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for Omission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}::{}", self.reason, self.module, self.symbol)?;
        if let Some(ref detail) = self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Summarize omissions grouped by reason, at most ten per group
pub fn format_omissions(omissions: &[Omission]) -> String {
    if omissions.is_empty() {
        return "No omissions".to_string();
    }

    let mut by_reason: indexmap::IndexMap<OmissionReason, Vec<&Omission>> =
        indexmap::IndexMap::new();
    for omission in omissions {
        by_reason.entry(omission.reason).or_default().push(omission);
    }

    let mut lines = vec![format!("Omitted {} export(s):", omissions.len())];
    for (reason, entries) in by_reason {
        lines.push(format!("## {} ({}):", reason, entries.len()));
        for entry in entries.iter().take(10) {
            lines.push(format!("  - {}", entry));
        }
        if entries.len() > 10 {
            lines.push(format!("  ... and {} more", entries.len() - 10));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omission_display() {
        let omission = Omission::new("app/Button", "Theme", OmissionReason::UnsupportedDeclaration)
            .with_detail("namespace");
        assert_eq!(
            omission.to_string(),
            "[UNSUPPORTED_DECLARATION] app/Button::Theme (namespace)"
        );
    }

    #[test]
    fn test_format_omissions_groups_by_reason() {
        let omissions = vec![
            Omission::new("m", "a", OmissionReason::UnresolvedDeclaration),
            Omission::new("m", "b", OmissionReason::UnsupportedDeclaration),
            Omission::new("m", "c", OmissionReason::UnresolvedDeclaration),
        ];
        let summary = format_omissions(&omissions);
        assert!(summary.starts_with("Omitted 3 export(s):"));
        assert!(summary.contains("## UNRESOLVED_DECLARATION (2):"));
        assert!(summary.contains("## UNSUPPORTED_DECLARATION (1):"));
    }

    #[test]
    fn test_entry_not_found_names_the_file() {
        let error = CodegenError::EntryNotFound {
            module: "app/Button".to_string(),
            path: "src/Button.tsx".to_string(),
        };
        assert!(error.to_string().contains("src/Button.tsx"));
    }
}
