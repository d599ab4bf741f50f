//! Glob patterns for key listings (`*` and `?` wildcards).

use regex::Regex;

use crate::error::{CacheError, Result};

/// A compiled key glob.
///
/// `*` matches any run of characters (including none) and `?` matches
/// exactly one character. Every other character matches itself.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    /// Compiles `pattern` into an anchored regex.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut source = String::with_capacity(pattern.len() + 8);
        source.push_str("(?s)^");
        let mut literal = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => source.push_str(".*"),
                '?' => source.push('.'),
                _ => source.push_str(&regex::escape(c.encode_utf8(&mut literal))),
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| {
            CacheError::InvalidRequest(format!("invalid key pattern {:?}: {}", pattern, e))
        })?;
        Ok(Self { regex })
    }

    /// Returns true if `key` matches the whole pattern.
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}
