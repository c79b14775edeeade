//! Fixed-capacity command history for the interactive shell.
//!
//! The ring self-overwrites: once full, a new record silently replaces the
//! oldest one (newest wins). Retrieval walks backwards from the most recent
//! record via a fetch cursor that is independent of the write cursor.

/// Number of records retained per session.
pub const HISTORY_CAPACITY: usize = 1000;

/// Sentinel for "no fetch in progress". Must be numerically outside the
/// valid index range for any allowed capacity.
const FETCH_UNSET: usize = usize::MAX;

/// Fixed-size, self-overwriting store of past input lines.
#[derive(Debug)]
pub struct HistoryRing {
    records: Vec<String>,
    insert_at: usize,
    fetch: usize,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRing {
    /// Create a ring with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create a ring with a specific capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or the sentinel would collide with a
    /// valid index.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        assert!(
            FETCH_UNSET > capacity - 1,
            "fetch sentinel must exceed the maximum valid index"
        );
        Self {
            records: vec![String::new(); capacity],
            insert_at: 0,
            fetch: FETCH_UNSET,
        }
    }

    /// Number of records the ring can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Store a submitted line.
    ///
    /// Whitespace is trimmed; empty results are dropped. Insertion never
    /// moves the fetch cursor.
    pub fn insert(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        self.records[self.insert_at] = trimmed.to_string();
        self.insert_at = (self.insert_at + 1) % self.capacity();
    }

    /// Fetch the next record walking backwards through history.
    ///
    /// The first call after [`HistoryRing::unset_fetch`] (or on a fresh
    /// ring) returns the most recently inserted line. Subsequent calls step
    /// towards older records. Once the cursor points at an empty slot the
    /// empty string is returned and the cursor stops moving, so scrolling
    /// cannot run away past the oldest entry.
    ///
    /// Quirk, kept intentionally: the first fetch on an empty history
    /// returns the empty string and parks the cursor at the wrap boundary
    /// (the slot before index zero has never been written).
    pub fn get_record(&mut self) -> String {
        let cap = self.capacity();
        if self.fetch == FETCH_UNSET {
            self.fetch = if self.insert_at == 0 {
                cap - 1
            } else {
                self.insert_at - 1
            };
            return self.records[self.fetch].clone();
        }

        if self.records[self.fetch].is_empty() {
            return String::new();
        }

        self.fetch = if self.fetch == 0 { cap - 1 } else { self.fetch - 1 };
        self.records[self.fetch].clone()
    }

    /// Reset the fetch cursor so the next [`HistoryRing::get_record`]
    /// restarts at the newest entry.
    pub fn unset_fetch(&mut self) {
        self.fetch = FETCH_UNSET;
    }

    /// Collect all retrievable records, newest first.
    ///
    /// Drives the fetch protocol until an empty result is seen (bounded by
    /// capacity for a completely full ring), then resets the fetch cursor.
    /// The underlying records are untouched.
    pub fn records(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        self.unset_fetch();
        for _ in 0..self.capacity() {
            let record = self.get_record();
            if record.is_empty() {
                break;
            }
            out.push(record);
        }
        self.unset_fetch();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fetch_sentinel_outside_index_range() {
        let ring = HistoryRing::new();
        assert!(FETCH_UNSET > ring.capacity() - 1);
    }

    #[test]
    fn test_insert_then_fetch_newest_first() {
        let mut ring = HistoryRing::new();
        ring.insert("first");
        ring.insert("second");
        ring.insert("third");

        assert_eq!(ring.get_record(), "third");
        assert_eq!(ring.get_record(), "second");
        assert_eq!(ring.get_record(), "first");
        // Oldest boundary: empty slot stops the walk.
        assert_eq!(ring.get_record(), "");
        assert_eq!(ring.get_record(), "");
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let mut ring = HistoryRing::new();
        ring.insert("");
        ring.insert("   ");
        ring.insert("\t\n");
        assert!(ring.records().is_empty());

        ring.insert("  spaced  ");
        assert_eq!(ring.records(), vec!["spaced".to_string()]);
    }

    #[test]
    fn test_unset_fetch_restarts_at_newest() {
        let mut ring = HistoryRing::new();
        ring.insert("a");
        ring.insert("b");

        assert_eq!(ring.get_record(), "b");
        assert_eq!(ring.get_record(), "a");
        ring.unset_fetch();
        assert_eq!(ring.get_record(), "b");
    }

    #[test]
    fn test_insertion_does_not_move_fetch_cursor() {
        let mut ring = HistoryRing::new();
        ring.insert("a");
        ring.insert("b");
        assert_eq!(ring.get_record(), "b");

        // Inserting mid-scroll must not disturb the walk position.
        ring.insert("c");
        assert_eq!(ring.get_record(), "a");
    }

    #[test]
    fn test_overwrite_drops_oldest() {
        let mut ring = HistoryRing::with_capacity(3);
        ring.insert("one");
        ring.insert("two");
        ring.insert("three");
        ring.insert("four");

        let records = ring.records();
        assert_eq!(records, vec!["four", "three", "two"]);
        assert!(!records.contains(&"one".to_string()));
    }

    #[test]
    fn test_full_ring_capped_at_capacity() {
        let mut ring = HistoryRing::with_capacity(4);
        for i in 0..10 {
            ring.insert(&format!("cmd-{i}"));
        }
        let records = ring.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0], "cmd-9");
        assert_eq!(records[3], "cmd-6");
    }

    #[test]
    fn test_empty_history_quirk() {
        let mut ring = HistoryRing::new();
        // First fetch on an empty history returns empty and parks the
        // cursor at the wrap boundary.
        assert_eq!(ring.get_record(), "");
        assert_eq!(ring.get_record(), "");
    }

    #[test]
    fn test_records_leaves_contents_intact() {
        let mut ring = HistoryRing::new();
        ring.insert("a");
        ring.insert("b");
        assert_eq!(ring.records(), vec!["b", "a"]);
        // A second pass sees the same contents.
        assert_eq!(ring.records(), vec!["b", "a"]);
    }
}
