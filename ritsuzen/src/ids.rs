//! Prefixed unique identifiers for competitions, participants and masters.

use uuid::Uuid;

/// Kind of entity an identifier is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Competition,
    Participant,
    Master,
}

impl IdPrefix {
    pub const fn as_str(self) -> &'static str {
        match self {
            IdPrefix::Competition => "comp",
            IdPrefix::Participant => "part",
            IdPrefix::Master => "mast",
        }
    }
}

impl std::fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generate a fresh identifier such as `part-2f0c…`.
#[must_use]
pub fn generate_id(prefix: IdPrefix) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
