//! Core domain types
//!
//! This module contains the core domain structures used across Pipedeck crates.
//! These types represent the stored business entities and are shared between
//! the server (for persistence) and the client/CLI (for display).

use thiserror::Error;

/// A string did not name any variant of a fixed enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares the wire names of a fieldless enum.
///
/// Generates `as_str`, `ALL`, `Display` and `FromStr`. Database columns store
/// the same names the JSON API uses.
macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err($crate::domain::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod agent;
pub mod execution;
pub mod feedback;
pub mod pipeline;
pub mod repository;
pub mod template;
