//! Preview handles for not-yet-submitted photos.
//!
//! A [`PreviewHandle`] is the locally-resolvable reference a front end uses
//! to render the pending photo. Handles are registered with a
//! [`PreviewTracker`] so the workflow can account for every release: a handle
//! must be released when it is superseded by a new capture or when the
//! workflow is torn down, or the browser-level resource it stands for leaks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    next_id: AtomicU64,
    created: AtomicU64,
    released: AtomicU64,
}

/// Issues preview handles and tracks their lifecycle.
///
/// Cloning the tracker shares the underlying counters, so tests can hold a
/// clone and observe releases made by the workflow.
#[derive(Debug, Clone, Default)]
pub struct PreviewTracker {
    inner: Arc<Counters>,
}

impl PreviewTracker {
    /// Create a new tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new preview over a payload of the given length.
    #[must_use]
    pub fn register(&self, byte_len: usize) -> PreviewHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.created.fetch_add(1, Ordering::SeqCst);
        PreviewHandle {
            id,
            byte_len,
            released: false,
            counters: Arc::clone(&self.inner),
        }
    }

    /// Total handles ever created.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.inner.created.load(Ordering::SeqCst)
    }

    /// Total handles released.
    #[must_use]
    pub fn released(&self) -> u64 {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// Handles currently live (created minus released).
    #[must_use]
    pub fn active(&self) -> u64 {
        self.created() - self.released()
    }
}

/// A live reference to a pending photo, for rendering.
///
/// Released at most once, either explicitly via [`PreviewHandle::release`]
/// or on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    byte_len: usize,
    released: bool,
    counters: Arc<Counters>,
}

impl PreviewHandle {
    /// The unique id of this handle.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A locally-resolvable URI for the pending photo.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("preview://attendance/{}", self.id)
    }

    /// Length of the payload this handle refers to.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Whether this handle has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Release the handle. Idempotent.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_creates_distinct_ids() {
        let tracker = PreviewTracker::new();
        let a = tracker.register(10);
        let b = tracker.register(20);

        assert_ne!(a.id(), b.id());
        assert_eq!(tracker.created(), 2);
        assert_eq!(tracker.active(), 2);
    }

    #[test]
    fn test_uri_resolves_to_id() {
        let tracker = PreviewTracker::new();
        let handle = tracker.register(0);
        assert_eq!(handle.uri(), format!("preview://attendance/{}", handle.id()));
    }

    #[test]
    fn test_release_is_counted_once() {
        let tracker = PreviewTracker::new();
        let mut handle = tracker.register(10);

        handle.release();
        handle.release();

        assert!(handle.is_released());
        assert_eq!(tracker.released(), 1);
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_drop_releases() {
        let tracker = PreviewTracker::new();
        {
            let _handle = tracker.register(10);
            assert_eq!(tracker.active(), 1);
        }
        assert_eq!(tracker.released(), 1);
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_explicit_release_then_drop_counts_once() {
        let tracker = PreviewTracker::new();
        {
            let mut handle = tracker.register(10);
            handle.release();
        }
        assert_eq!(tracker.created(), 1);
        assert_eq!(tracker.released(), 1);
    }

    #[test]
    fn test_tracker_clone_shares_counters() {
        let tracker = PreviewTracker::new();
        let observer = tracker.clone();

        let _handle = tracker.register(5);
        assert_eq!(observer.created(), 1);
        assert_eq!(observer.active(), 1);
    }

    #[test]
    fn test_byte_len() {
        let tracker = PreviewTracker::new();
        let handle = tracker.register(1234);
        assert_eq!(handle.byte_len(), 1234);
    }
}
