//! SnapshotIterator - cursor over a multi-version snapshot
//!
//! The cursor is positioned with `seek` and advanced either one version at
//! a time (`next`) or one user key at a time (`next_key`). Keys and values
//! returned by `unsafe_key` / `unsafe_value` borrow the iterator and are
//! only valid until it is advanced; copy anything that must be retained.

use super::errors::SnapshotResult;
use super::key::MvccKey;

/// Read-only, seekable cursor over a multi-version snapshot.
///
/// An iterator is owned by exactly one task and released exactly once via
/// `close`.
pub trait SnapshotIterator: Send {
    /// Positions the cursor at the first row `>= key`.
    fn seek(&mut self, key: &MvccKey);

    /// Reports whether the cursor is on a row.
    ///
    /// `Ok(false)` means exhausted. `Err` means the iterator is unusable.
    fn valid(&self) -> SnapshotResult<bool>;

    /// Advances to the next row (next version or next key).
    fn next(&mut self);

    /// Advances past all remaining versions of the current user key.
    fn next_key(&mut self);

    /// Key of the current row. Only valid while `valid()` is `Ok(true)`.
    fn unsafe_key(&self) -> &MvccKey;

    /// Payload of the current row. Only valid while `valid()` is `Ok(true)`.
    fn unsafe_value(&self) -> &[u8];

    /// Releases the iterator.
    fn close(&mut self);
}

impl<I: SnapshotIterator + ?Sized> SnapshotIterator for Box<I> {
    fn seek(&mut self, key: &MvccKey) {
        (**self).seek(key)
    }

    fn valid(&self) -> SnapshotResult<bool> {
        (**self).valid()
    }

    fn next(&mut self) {
        (**self).next()
    }

    fn next_key(&mut self) {
        (**self).next_key()
    }

    fn unsafe_key(&self) -> &MvccKey {
        (**self).unsafe_key()
    }

    fn unsafe_value(&self) -> &[u8] {
        (**self).unsafe_value()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
