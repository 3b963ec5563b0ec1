// ID Provider Port (for deterministic testing)

use std::sync::Mutex;
use ulid::{Generator, Ulid};

/// Prefix of unarchive job identifiers
pub const UNARCHIVE_JOB_PREFIX: &str = "ufj";

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique job ID
    fn generate_id(&self) -> String;
}

/// ULID provider (production)
///
/// Emits `<prefix>.<ULID>`. IDs generated within the same millisecond are
/// still strictly increasing.
pub struct UlidProvider {
    prefix: String,
    generator: Mutex<Generator>,
}

impl UlidProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            generator: Mutex::new(Generator::new()),
        }
    }

    fn next_ulid(&self) -> Ulid {
        // A poisoned lock or an exhausted random component only costs
        // monotonicity within one millisecond, not uniqueness.
        match self.generator.lock() {
            Ok(mut generator) => generator.generate().unwrap_or_else(|_| Ulid::new()),
            Err(_) => Ulid::new(),
        }
    }
}

impl Default for UlidProvider {
    fn default() -> Self {
        Self::new(UNARCHIVE_JOB_PREFIX)
    }
}

impl IdProvider for UlidProvider {
    fn generate_id(&self) -> String {
        format!("{}.{}", self.prefix, self.next_ulid())
    }
}

/// Check the `<3 lowercase alnum>.<26 char ULID>` identifier shape
pub fn is_valid_job_id(id: &str) -> bool {
    let Some((prefix, ulid)) = id.split_once('.') else {
        return false;
    };

    prefix.len() == 3
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && ulid.len() == 26
        && ulid
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && Ulid::from_string(ulid).is_ok()
}
