//! Text memos attached to transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// A UTF-8 text memo of at most [`Memo::MAX_BYTES`] bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Memo(String);

impl Memo {
    /// Protocol limit for text memos.
    pub const MAX_BYTES: usize = 28;

    /// Strict constructor: fails when the text exceeds the byte limit.
    pub fn new(text: impl Into<String>) -> Result<Self, TypesError> {
        let text = text.into();
        if text.len() > Self::MAX_BYTES {
            return Err(TypesError::MemoTooLong {
                len: text.len(),
                limit: Self::MAX_BYTES,
            });
        }
        Ok(Self(text))
    }

    /// Cut `text` to the byte limit without failing.
    ///
    /// The cut lands on the last char boundary at or below the limit, so a
    /// multi-byte code point is dropped whole rather than split. Empty input
    /// produces no memo.
    pub fn truncated(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let mut end = text.len().min(Self::MAX_BYTES);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Some(Self(text[..end].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_memo_keeps_first_28_bytes() {
        let text = "a".repeat(40);
        let memo = Memo::truncated(&text).unwrap();
        assert_eq!(memo.as_str(), &text[..28]);
        assert_eq!(memo.as_str().len(), 28);
    }

    #[test]
    fn short_memo_untouched() {
        assert_eq!(Memo::truncated("coffee").unwrap().as_str(), "coffee");
    }

    #[test]
    fn empty_memo_is_none() {
        assert!(Memo::truncated("").is_none());
    }

    #[test]
    fn multibyte_boundary_respected() {
        // 27 ASCII bytes + a 2-byte char straddling the limit.
        let text = format!("{}é", "x".repeat(27));
        let memo = Memo::truncated(&text).unwrap();
        assert_eq!(memo.as_str(), "x".repeat(27));
    }

    #[test]
    fn strict_constructor_rejects_oversized() {
        assert!(Memo::new("x".repeat(28)).is_ok());
        assert_eq!(
            Memo::new("x".repeat(29)),
            Err(TypesError::MemoTooLong { len: 29, limit: 28 })
        );
    }
}
