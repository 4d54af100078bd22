// Validation utilities module
// Email-shape classification and custom field rules

use regex::Regex;
use validator::ValidationError;

/// Basic `local@domain.tld` shape, no whitespace and a single `@`
const EMAIL_SHAPE: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// How a login identifier should be looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Username,
}

/// Classifies strings as email-shaped or not
///
/// Built once at startup and handed to the workflows that need it.
#[derive(Debug, Clone)]
pub struct EmailShape {
    pattern: Regex,
}

impl EmailShape {
    pub fn new() -> Self {
        let pattern = Regex::new(EMAIL_SHAPE).expect("email shape pattern is a valid regex");
        Self { pattern }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.pattern.is_match(candidate)
    }

    /// Email-shaped identifiers are looked up by email, everything else by username
    pub fn classify(&self, identifier: &str) -> IdentifierKind {
        if self.matches(identifier) {
            IdentifierKind::Email
        } else {
            IdentifierKind::Username
        }
    }
}

impl Default for EmailShape {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("must_not_be_blank"))
    } else {
        Ok(())
    }
}
