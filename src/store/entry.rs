//! Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

use std::time::{Duration, Instant};

// == Entry Data ==
/// Payload held by an entry: a plain byte string or a list of byte strings.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    /// Byte string written by `SET` or `INCR`
    Bytes(Vec<u8>),
    /// List written by `RPUSH`
    List(Vec<Vec<u8>>),
}

impl EntryData {
    /// Name of the payload kind, used in wrong-type errors.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryData::Bytes(_) => "string",
            EntryData::List(_) => "list",
        }
    }
}

// == Entry ==
/// Represents a single store entry with value and metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored payload
    pub data: EntryData,
    /// Creation instant
    pub created_at: Instant,
    /// Time to live, None = no expiration
    pub ttl: Option<Duration>,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry created at `now` with optional TTL.
    pub fn new(data: EntryData, now: Instant, ttl: Option<Duration>) -> Self {
        Self {
            data,
            created_at: now,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now - created_at >= ttl`, so the boundary
    /// instant itself already counts as expired.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.created_at) >= ttl,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// Returns `Some(Duration::ZERO)` once the entry has expired.
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        self.ttl.map(|ttl| {
            let age = now.saturating_duration_since(self.created_at);
            ttl.saturating_sub(age)
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(value: &str) -> EntryData {
        EntryData::Bytes(value.as_bytes().to_vec())
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let now = Instant::now();
        let entry = Entry::new(bytes("test_value"), now, None);

        assert_eq!(entry.data, bytes("test_value"));
        assert!(entry.ttl.is_none());
        assert!(!entry.is_expired(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = Entry::new(bytes("test_value"), now, Some(Duration::from_secs(10)));

        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::from_millis(9_999)));
        assert!(entry.is_expired(now + Duration::from_secs(11)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = Entry::new(bytes("test"), now, Some(Duration::from_secs(10)));

        assert!(
            entry.is_expired(now + Duration::from_secs(10)),
            "Entry should be expired at boundary"
        );
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let now = Instant::now();
        let entry = Entry::new(bytes("test"), now, Some(Duration::ZERO));

        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = Entry::new(bytes("v"), now, Some(Duration::from_secs(10)));

        assert_eq!(
            entry.ttl_remaining(now + Duration::from_secs(4)),
            Some(Duration::from_secs(6))
        );
        assert_eq!(
            entry.ttl_remaining(now + Duration::from_secs(20)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let now = Instant::now();
        let entry = Entry::new(bytes("v"), now, None);

        assert!(entry.ttl_remaining(now).is_none());
    }

    #[test]
    fn test_entry_data_kind() {
        assert_eq!(bytes("x").kind(), "string");
        assert_eq!(EntryData::List(vec![]).kind(), "list");
    }
}
