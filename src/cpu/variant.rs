//! Machine presets.
//!
//! The classic, 32-bit and 64-bit LMC machines share one engine; a
//! [`Variant`] bundles the choices that distinguish them.

use crate::word::WordPolicy;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the three historical LMC machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Three-digit decimal machine; starved INP only warns.
    #[default]
    Classic,
    /// 32-bit saturating machine; starved INP prompts the user.
    Lmc32,
    /// 64-bit saturating machine; starved INP prompts the user.
    Lmc64,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Classic, Variant::Lmc32, Variant::Lmc64];

    /// Arithmetic policy of this machine.
    pub fn policy(self) -> WordPolicy {
        match self {
            Variant::Classic => WordPolicy::Decimal,
            Variant::Lmc32 => WordPolicy::Bounded32,
            Variant::Lmc64 => WordPolicy::Bounded64,
        }
    }

    /// Whether a starved INP falls back to an interactive read.
    pub fn prompts_for_input(self) -> bool {
        !matches!(self, Variant::Classic)
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Lmc32 => "lmc32",
            Variant::Lmc64 => "lmc64",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "decimal" | "lmc" => Ok(Variant::Classic),
            "lmc32" | "32" => Ok(Variant::Lmc32),
            "lmc64" | "64" => Ok(Variant::Lmc64),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/// Unrecognised variant name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant `{0}` (expected classic, lmc32 or lmc64)")]
pub struct ParseVariantError(String);
