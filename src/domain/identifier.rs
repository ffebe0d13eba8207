use super::constants::matching::MIN_CODE_LENGTH;

/// A lookup identifier: either a numeric product code (EAN) or free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Code(String),
    Name(String),
}

impl Identifier {
    /// Classify a raw term. Surrounding whitespace is ignored.
    pub fn classify(raw: &str) -> Self {
        let term = raw.trim();
        if is_all_digits(term) && term.chars().count() >= MIN_CODE_LENGTH {
            Self::Code(term.to_string())
        } else {
            Self::Name(term.to_string())
        }
    }

    pub const fn is_code(&self) -> bool {
        matches!(self, Self::Code(_))
    }
}

/// True for a non-empty string made only of ASCII digits
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
