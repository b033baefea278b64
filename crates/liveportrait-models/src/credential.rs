//! Bearer credential for the external inference service.

use std::fmt;

/// API token sent as `Authorization: Bearer <token>`.
///
/// The token is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Parse a raw value. Blank input means "no credential".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_rejects_blank() {
        assert_eq!(Credential::parse("  hf_abc \n").unwrap().expose(), "hf_abc");
        assert!(Credential::parse("").is_none());
        assert!(Credential::parse("   ").is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let credential = Credential::parse("hf_secret").unwrap();
        assert_eq!(format!("{:?}", credential), "Credential(***)");
    }
}
