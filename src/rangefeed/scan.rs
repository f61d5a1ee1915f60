//! Helpers shared by the snapshot scans.

use std::ops::{Deref, DerefMut};

use super::errors::{RangefeedError, RangefeedResult};
use crate::mvcc::{MvccKey, MvccMetadata, SnapshotIterator};

/// Decodes the metadata row at `key`.
pub(crate) fn decode_metadata(key: &MvccKey, value: &[u8]) -> RangefeedResult<MvccMetadata> {
    MvccMetadata::decode(value).map_err(|e| RangefeedError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Closes the wrapped iterator exactly once when dropped.
///
/// Tasks hold their iterator through this guard so that every exit path
/// releases it: normal completion, early error return, or the task's
/// future being dropped mid-scan.
pub(crate) struct IterGuard<I: SnapshotIterator> {
    iter: I,
}

impl<I: SnapshotIterator> IterGuard<I> {
    pub(crate) fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I: SnapshotIterator> Deref for IterGuard<I> {
    type Target = I;

    fn deref(&self) -> &I {
        &self.iter
    }
}

impl<I: SnapshotIterator> DerefMut for IterGuard<I> {
    fn deref_mut(&mut self) -> &mut I {
        &mut self.iter
    }
}

impl<I: SnapshotIterator> Drop for IterGuard<I> {
    fn drop(&mut self) {
        self.iter.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mvcc::{SliceIterator, SnapshotResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        inner: SliceIterator,
        closes: Arc<AtomicUsize>,
    }

    impl SnapshotIterator for Counting {
        fn seek(&mut self, key: &MvccKey) {
            self.inner.seek(key)
        }
        fn valid(&self) -> SnapshotResult<bool> {
            self.inner.valid()
        }
        fn next(&mut self) {
            self.inner.next()
        }
        fn next_key(&mut self) {
            self.inner.next_key()
        }
        fn unsafe_key(&self) -> &MvccKey {
            self.inner.unsafe_key()
        }
        fn unsafe_value(&self) -> &[u8] {
            self.inner.unsafe_value()
        }
        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_decode_error_names_key() {
        let key = MvccKey::metadata(b"c".to_vec());
        let err = decode_metadata(&key, b"garbage").unwrap_err();
        match err {
            RangefeedError::Decode { key, .. } => assert_eq!(key, "c"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_closes_once_on_drop() {
        let closes = Arc::new(AtomicUsize::new(0));
        let guard = IterGuard::new(Counting {
            inner: SliceIterator::new(Vec::new()).unwrap(),
            closes: Arc::clone(&closes),
        });
        assert_eq!(closes.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closes_on_early_return() {
        fn scan(guard: IterGuard<Counting>) -> Result<(), ()> {
            let _guard = guard;
            Err(())
        }

        let closes = Arc::new(AtomicUsize::new(0));
        let guard = IterGuard::new(Counting {
            inner: SliceIterator::new(Vec::new()).unwrap(),
            closes: Arc::clone(&closes),
        });
        assert!(scan(guard).is_err());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
