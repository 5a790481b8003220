//! Codepoint allocation for grid keys.
//!
//! Every distinct key seen during one encode is assigned a printable
//! character, starting at U+0020 and counting upwards in first-seen order.
//! `"` and `\` are skipped so rows never need JSON escaping. Allocation stops
//! below the surrogate block, which keeps every codepoint a valid `char`.

use std::collections::HashMap;
use std::hash::Hash;

/// First codepoint handed out.
pub const FIRST_CODEPOINT: u32 = 0x20;

/// Last codepoint that may be handed out.
pub const LAST_CODEPOINT: u32 = 0xD7FF;

const RESERVED: [u32; 2] = [0x22, 0x5C];

/// Largest number of distinct keys a single grid can hold.
pub const MAX_KEYS: usize = (LAST_CODEPOINT - FIRST_CODEPOINT + 1) as usize - RESERVED.len();

/// Codepoint used for the `index`-th allocated key.
///
/// Returns `None` once `index` falls past [`LAST_CODEPOINT`].
pub fn codepoint_for_index(index: usize) -> Option<char> {
    let mut cp = FIRST_CODEPOINT.checked_add(u32::try_from(index).ok()?)?;
    for reserved in RESERVED {
        if cp >= reserved {
            cp = cp.saturating_add(1);
        }
    }
    if cp > LAST_CODEPOINT {
        return None;
    }
    char::from_u32(cp)
}

/// Inverse of [`codepoint_for_index`].
pub fn index_for_codepoint(ch: char) -> Option<usize> {
    let cp = ch as u32;
    if cp < FIRST_CODEPOINT || cp > LAST_CODEPOINT || RESERVED.contains(&cp) {
        return None;
    }
    let skipped = RESERVED.iter().filter(|&&r| r < cp).count() as u32;
    Some((cp - FIRST_CODEPOINT - skipped) as usize)
}

/// Per-encode key -> codepoint table.
///
/// Generic over the key type so callers can keep the background apart from
/// feature keys that happen to share its text.
#[derive(Debug)]
pub struct CodepointAllocator<K> {
    table: HashMap<K, char>,
    order: Vec<K>,
    limit: usize,
}

/// The allocator refused a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exhausted {
    pub limit: usize,
}

impl<K: Copy + Eq + Hash> CodepointAllocator<K> {
    /// Allocator that accepts up to [`MAX_KEYS`] keys.
    pub fn new() -> Self {
        Self::with_limit(MAX_KEYS)
    }

    /// Allocator that accepts up to `limit` keys, capped at [`MAX_KEYS`].
    pub fn with_limit(limit: usize) -> Self {
        Self { table: HashMap::new(), order: Vec::new(), limit: limit.min(MAX_KEYS) }
    }

    /// Codepoint for `key`, assigning the next free one on first sight.
    pub fn allocate(&mut self, key: K) -> Result<char, Exhausted> {
        if let Some(&cp) = self.table.get(&key) {
            return Ok(cp);
        }
        if self.order.len() >= self.limit {
            return Err(Exhausted { limit: self.limit });
        }
        let cp = codepoint_for_index(self.order.len()).ok_or(Exhausted { limit: self.limit })?;
        self.table.insert(key, cp);
        self.order.push(key);
        Ok(cp)
    }

    /// Keys in allocation order.
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl<K: Copy + Eq + Hash> Default for CodepointAllocator<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_codepoints_skip_quote() {
        assert_eq!(codepoint_for_index(0), Some(' '));
        assert_eq!(codepoint_for_index(1), Some('!'));
        assert_eq!(codepoint_for_index(2), Some('#'));
    }

    #[test]
    fn test_codepoints_skip_backslash() {
        // 0x5B is index 58 (one skip), 0x5D follows it
        assert_eq!(codepoint_for_index(58), Some('['));
        assert_eq!(codepoint_for_index(59), Some(']'));
    }

    #[test]
    fn test_last_codepoint() {
        assert_eq!(codepoint_for_index(MAX_KEYS - 1), char::from_u32(LAST_CODEPOINT));
        assert_eq!(codepoint_for_index(MAX_KEYS), None);
        assert_eq!(MAX_KEYS, 55_262);
    }

    #[test]
    fn test_codepoints_strictly_increase() {
        let mut prev = None;
        for i in 0..500 {
            let cp = codepoint_for_index(i).unwrap();
            assert!(cp != '"' && cp != '\\');
            if let Some(p) = prev {
                assert!(cp > p);
            }
            prev = Some(cp);
        }
    }

    #[test]
    fn test_index_for_codepoint_inverts() {
        for i in [0, 1, 2, 57, 58, 59, 60, 1000, MAX_KEYS - 1] {
            let cp = codepoint_for_index(i).unwrap();
            assert_eq!(index_for_codepoint(cp), Some(i));
        }
        assert_eq!(index_for_codepoint('"'), None);
        assert_eq!(index_for_codepoint('\\'), None);
        assert_eq!(index_for_codepoint('\n'), None);
        assert_eq!(index_for_codepoint('\u{E000}'), None);
    }

    #[test]
    fn test_allocate_reuses_existing() {
        let mut alloc = CodepointAllocator::new();
        assert_eq!(alloc.allocate("a"), Ok(' '));
        assert_eq!(alloc.allocate("b"), Ok('!'));
        assert_eq!(alloc.allocate("a"), Ok(' '));
        assert_eq!(alloc.allocate("c"), Ok('#'));
        assert_eq!(alloc.keys(), &["a", "b", "c"]);
    }

    #[test]
    fn test_allocate_respects_limit() {
        let mut alloc = CodepointAllocator::with_limit(2);
        alloc.allocate("a").unwrap();
        alloc.allocate("b").unwrap();
        assert_eq!(alloc.allocate("a"), Ok(' '));
        assert_eq!(alloc.allocate("c"), Err(Exhausted { limit: 2 }));
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn test_limit_is_capped() {
        assert_eq!(CodepointAllocator::<&str>::with_limit(usize::MAX).limit(), MAX_KEYS);
    }
}
