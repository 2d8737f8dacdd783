//! Hash paths for note commitments
//!
//! A hash path holds one `(left, right)` pair per tree level, leaf first.
//! Each pair contains the node on the leaf's path and its sibling; which
//! one is which is decided by the leaf index bit for that level.
//!
//! ```text
//!                    Root
//!                   /    \
//!          (N2_0, N2_1)   ...          level 2
//!            /    \
//!     (N1_0, N1_1) ...                 level 1
//!       /    \
//!   (C4, C5)                           level 0   leaf index 5 = 0b101
//! ```
//!
//! Raw encoding, as delivered by the ledger client:
//!
//! ```text
//! u32 BE level count || count * (left[32] || right[32])
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use shade_account::hex0x;

use crate::error::{PrivacyError, Result};

const LEVEL_COUNT_LEN: usize = 4;
const PAIR_LEN: usize = 64;

/// The two children hashed together at one tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingPair {
    pub left: [u8; 32],
    pub right: [u8; 32],
}

impl SiblingPair {
    pub fn new(left: [u8; 32], right: [u8; 32]) -> Self {
        Self { left, right }
    }

    /// The node needed to hash upward, given the leaf index bit at this level.
    ///
    /// Bit 1 means the path node is the right child, so the sibling is `left`.
    pub fn sibling(&self, bit: u64) -> &[u8; 32] {
        if bit & 1 == 1 { &self.left } else { &self.right }
    }

    /// The node on the leaf's own path at this level.
    pub fn own(&self, bit: u64) -> &[u8; 32] {
        if bit & 1 == 1 { &self.right } else { &self.left }
    }
}

/// Sibling pairs from the leaf level up to the level just below the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashPath {
    levels: Vec<SiblingPair>,
}

impl HashPath {
    pub fn new(levels: Vec<SiblingPair>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[SiblingPair] {
        &self.levels
    }

    /// Number of levels in the path.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Decode the raw ledger encoding.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let (count, body) = raw.split_at_checked(LEVEL_COUNT_LEN).ok_or_else(|| {
            PrivacyError::InvalidHashPathEncoding(format!(
                "{} bytes is shorter than the level count",
                raw.len()
            ))
        })?;
        let count = u32::from_be_bytes([count[0], count[1], count[2], count[3]]) as usize;

        let expected = count.checked_mul(PAIR_LEN).ok_or_else(|| {
            PrivacyError::InvalidHashPathEncoding(format!("level count {count} overflows"))
        })?;
        if body.len() != expected {
            return Err(PrivacyError::InvalidHashPathEncoding(format!(
                "{count} levels need {expected} bytes, got {}",
                body.len()
            )));
        }

        let levels = body
            .chunks_exact(PAIR_LEN)
            .map(|chunk| {
                let mut left = [0u8; 32];
                let mut right = [0u8; 32];
                left.copy_from_slice(&chunk[..32]);
                right.copy_from_slice(&chunk[32..]);
                SiblingPair { left, right }
            })
            .collect();

        Ok(Self { levels })
    }

    /// Encode to the raw ledger encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(LEVEL_COUNT_LEN + self.levels.len() * PAIR_LEN);
        out.extend_from_slice(&(self.levels.len() as u32).to_be_bytes());
        for pair in &self.levels {
            out.extend_from_slice(&pair.left);
            out.extend_from_slice(&pair.right);
        }
        out
    }

    /// Select one sibling per level, leaf to root, by the bits of `index`.
    ///
    /// Always yields exactly one entry per level. Once the shifted index is
    /// zero every remaining level selects `right`.
    pub fn siblings_for(&self, index: u64) -> Vec<[u8; 32]> {
        let mut position = index;
        self.levels
            .iter()
            .map(|pair| {
                let sibling = *pair.sibling(position & 1);
                position >>= 1;
                sibling
            })
            .collect()
    }
}

impl Serialize for HashPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex0x::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for HashPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = hex0x::decode(&s).map_err(D::Error::custom)?;
        HashPath::from_bytes(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(tag: u8) -> [u8; 32] {
        [tag; 32]
    }

    fn three_levels() -> HashPath {
        HashPath::new(vec![
            SiblingPair::new(h(0x10), h(0x11)),
            SiblingPair::new(h(0x20), h(0x21)),
            SiblingPair::new(h(0x30), h(0x31)),
        ])
    }

    #[test]
    fn test_index_five_selects_left_right_left() {
        // 5 = 0b101: bits consumed 1, 0, 1
        let siblings = three_levels().siblings_for(5);
        assert_eq!(siblings, vec![h(0x10), h(0x21), h(0x30)]);
    }

    #[test]
    fn test_index_zero_selects_right_everywhere() {
        let siblings = three_levels().siblings_for(0);
        assert_eq!(siblings, vec![h(0x11), h(0x21), h(0x31)]);
    }

    #[test]
    fn test_exhausted_index_keeps_selecting_right() {
        // 1 = 0b1: only the first level sees a set bit
        let siblings = three_levels().siblings_for(1);
        assert_eq!(siblings, vec![h(0x10), h(0x21), h(0x31)]);
    }

    #[test]
    fn test_one_entry_per_level() {
        let path = three_levels();
        for index in 0..8 {
            assert_eq!(path.siblings_for(index).len(), path.depth());
        }
    }

    #[test]
    fn test_sibling_and_own_are_opposite() {
        let pair = SiblingPair::new(h(1), h(2));
        assert_eq!(pair.sibling(0), &h(2));
        assert_eq!(pair.own(0), &h(1));
        assert_eq!(pair.sibling(1), &h(1));
        assert_eq!(pair.own(1), &h(2));
    }

    #[test]
    fn test_raw_encoding_layout() {
        let raw = three_levels().to_bytes();
        assert_eq!(raw.len(), 4 + 3 * 64);
        assert_eq!(&raw[..4], &[0, 0, 0, 3]);
        assert_eq!(&raw[4..36], &h(0x10));
        assert_eq!(&raw[36..68], &h(0x11));

        let decoded = HashPath::from_bytes(&raw).unwrap();
        assert_eq!(decoded, three_levels());
    }

    #[test]
    fn test_decode_rejects_short_header() {
        let err = HashPath::from_bytes(&[0, 0, 1]).unwrap_err();
        assert!(matches!(err, PrivacyError::InvalidHashPathEncoding(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_body() {
        let mut raw = three_levels().to_bytes();
        raw.pop();
        let err = HashPath::from_bytes(&raw).unwrap_err();
        assert_eq!(
            err,
            PrivacyError::InvalidHashPathEncoding("3 levels need 192 bytes, got 191".into())
        );
        assert!(err.is_malformed_path());
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut raw = three_levels().to_bytes();
        raw.push(0);
        assert!(matches!(
            HashPath::from_bytes(&raw),
            Err(PrivacyError::InvalidHashPathEncoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_inflated_count() {
        let mut raw = three_levels().to_bytes();
        raw[..4].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(HashPath::from_bytes(&raw).is_err());
    }

    #[test]
    fn test_empty_path() {
        let path = HashPath::from_bytes(&[0, 0, 0, 0]).unwrap();
        assert_eq!(path.depth(), 0);
        assert!(path.siblings_for(0).is_empty());
    }
}
