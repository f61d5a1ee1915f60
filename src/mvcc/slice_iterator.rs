//! SliceIterator - in-memory snapshot cursor
//!
//! Iterates a materialized snapshot held as a sorted vector of rows.

use super::errors::{SnapshotError, SnapshotResult};
use super::iterator::SnapshotIterator;
use super::key::{MvccKey, MvccKeyValue};

/// In-memory `SnapshotIterator` over rows in storage order.
#[derive(Debug)]
pub struct SliceIterator {
    rows: Vec<MvccKeyValue>,
    /// None until the first seek
    cur: Option<usize>,
    closed: bool,
}

impl SliceIterator {
    /// Creates an iterator over `rows`.
    ///
    /// Rows must be strictly increasing in `MvccKey` order.
    pub fn new(rows: Vec<MvccKeyValue>) -> SnapshotResult<Self> {
        if let Some(i) = rows.windows(2).position(|w| w[0].key >= w[1].key) {
            return Err(SnapshotError::Unsorted(i + 1));
        }
        Ok(Self {
            rows,
            cur: None,
            closed: false,
        })
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current(&self) -> &MvccKeyValue {
        let cur = self.cur.unwrap_or(self.rows.len());
        &self.rows[cur]
    }
}

impl SnapshotIterator for SliceIterator {
    fn seek(&mut self, key: &MvccKey) {
        self.cur = Some(self.rows.partition_point(|kv| kv.key < *key));
    }

    fn valid(&self) -> SnapshotResult<bool> {
        Ok(!self.closed && matches!(self.cur, Some(cur) if cur < self.rows.len()))
    }

    fn next(&mut self) {
        if let Some(cur) = self.cur.as_mut() {
            *cur += 1;
        }
    }

    fn next_key(&mut self) {
        let Some(start) = self.cur else {
            return;
        };
        if start >= self.rows.len() {
            return;
        }
        let user_key = &self.rows[start].key.key;
        let skip = self.rows[start..]
            .iter()
            .take_while(|kv| kv.key.key == *user_key)
            .count();
        self.cur = Some(start + skip);
    }

    fn unsafe_key(&self) -> &MvccKey {
        &self.current().key
    }

    fn unsafe_value(&self) -> &[u8] {
        &self.current().value
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hlc::Timestamp;

    fn kv(k: &str, ts: i64, v: &str) -> MvccKeyValue {
        MvccKeyValue::new(MvccKey::new(k.as_bytes(), Timestamp::from_wall(ts)), v.as_bytes())
    }

    fn rows() -> Vec<MvccKeyValue> {
        vec![
            kv("a", 10, "a10"),
            kv("c", 11, "c11"),
            kv("c", 9, "c9"),
            kv("d", 20, "d20"),
        ]
    }

    #[test]
    fn test_rejects_unsorted_rows() {
        let err = SliceIterator::new(vec![kv("c", 9, "x"), kv("c", 11, "y")]).unwrap_err();
        assert_eq!(err, SnapshotError::Unsorted(1));
    }

    #[test]
    fn test_invalid_before_seek() {
        let it = SliceIterator::new(rows()).unwrap();
        assert!(!it.valid().unwrap());
    }

    #[test]
    fn test_seek_positions_at_first_row_at_or_after_key() {
        let mut it = SliceIterator::new(rows()).unwrap();
        it.seek(&MvccKey::metadata(b"b".to_vec()));
        assert!(it.valid().unwrap());
        assert_eq!(it.unsafe_value(), b"c11");
    }

    #[test]
    fn test_next_visits_every_version() {
        let mut it = SliceIterator::new(rows()).unwrap();
        let mut seen = Vec::new();
        it.seek(&MvccKey::metadata(Vec::new()));
        while it.valid().unwrap() {
            seen.push(it.unsafe_value().to_vec());
            it.next();
        }
        assert_eq!(seen, vec![b"a10".to_vec(), b"c11".to_vec(), b"c9".to_vec(), b"d20".to_vec()]);
    }

    #[test]
    fn test_next_key_skips_older_versions() {
        let mut it = SliceIterator::new(rows()).unwrap();
        let mut seen = Vec::new();
        it.seek(&MvccKey::metadata(Vec::new()));
        while it.valid().unwrap() {
            seen.push(it.unsafe_value().to_vec());
            it.next_key();
        }
        assert_eq!(seen, vec![b"a10".to_vec(), b"c11".to_vec(), b"d20".to_vec()]);
    }

    #[test]
    fn test_close_invalidates() {
        let mut it = SliceIterator::new(rows()).unwrap();
        it.seek(&MvccKey::metadata(Vec::new()));
        it.close();
        assert!(it.is_closed());
        assert!(!it.valid().unwrap());
    }
}
