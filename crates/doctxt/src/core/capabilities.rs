//! Startup capability probe results.
//!
//! Each converter decides once, when it is constructed, whether its parsing
//! backend is usable. The pipeline collects those answers into a
//! [`CapabilityReport`] and consults it before every conversion, so a missing
//! backend is reported as `MissingDependency` without calling the converter.

use crate::core::format::Format;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Capability {
    Available,
    Unavailable { reason: String },
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Capability::Available => None,
            Capability::Unavailable { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Available => f.write_str("available"),
            Capability::Unavailable { reason } => write!(f, "unavailable ({})", reason),
        }
    }
}

/// Capability of every format, as probed when the pipeline was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    entries: BTreeMap<Format, Capability>,
}

impl CapabilityReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, format: Format, capability: Capability) {
        if let Capability::Unavailable { reason } = &capability {
            tracing::warn!(format = %format, reason = %reason, "Converter backend unavailable");
        }
        self.entries.insert(format, capability);
    }

    /// Formats never probed count as unavailable.
    pub fn get(&self, format: Format) -> Capability {
        self.entries.get(&format).cloned().unwrap_or_else(|| Capability::Unavailable {
            reason: format!("no converter registered for {}", format),
        })
    }

    pub fn is_available(&self, format: Format) -> bool {
        self.entries.get(&format).is_some_and(Capability::is_available)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Format, &Capability)> {
        self.entries.iter().map(|(format, capability)| (*format, capability))
    }
}
