//! Common types used across CLI modules

use std::str::FromStr;

use uuid::Uuid;

/// Identifier that can be either a full UUID or an unambiguous prefix
///
/// Parsed straight from command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrPrefix {
    Full(Uuid),
    /// Lowercased leading characters of a UUID
    Prefix(String),
}

impl FromStr for IdOrPrefix {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Ok(uuid) = Uuid::parse_str(input) {
            return Ok(IdOrPrefix::Full(uuid));
        }

        if input.is_empty() || !input.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Err(format!("'{}' is not a UUID or UUID prefix", input));
        }

        Ok(IdOrPrefix::Prefix(input.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(id.to_string().parse(), Ok(IdOrPrefix::Full(id)));
    }

    #[test]
    fn test_parse_prefix_is_lowercased() {
        assert_eq!(" 3F2A ".parse(), Ok(IdOrPrefix::Prefix("3f2a".to_string())));
        assert_eq!("3f2a-9c".parse(), Ok(IdOrPrefix::Prefix("3f2a-9c".to_string())));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!("".parse::<IdOrPrefix>().is_err());
        assert!("nightly".parse::<IdOrPrefix>().is_err());
    }
}
