//! File-oriented commands: pick and share.
//!
//! These suspend pending a user-driven OS dialog and resume through a
//! continuation keyed by a correlation code. Only one pending request is
//! tracked at a time: beginning a second request before the first resolves
//! overwrites the slot and orphans the first continuation. That overwrite is
//! the source system's de-facto behavior and is kept, with a local log when
//! it happens.

use std::fmt;
use std::path::PathBuf;

/// Invoked exactly once with the chosen path, or `None` if the dialog was
/// canceled (or the request was orphaned — orphaned continuations are never
/// invoked at all).
pub type FileContinuation = Box<dyn FnOnce(Option<PathBuf>) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRequestKind {
    Pick,
    Share,
}

impl fmt::Display for FileRequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRequestKind::Pick => write!(f, "pick"),
            FileRequestKind::Share => write!(f, "share"),
        }
    }
}

struct Pending {
    code: u64,
    kind: FileRequestKind,
    continuation: FileContinuation,
}

/// Single-slot store for the in-flight file request.
#[derive(Default)]
pub struct FileRequestSlot {
    next_code: u64,
    pending: Option<Pending>,
}

impl FileRequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a file request. Returns the correlation code the OS callback
    /// must present to resume. Any prior pending request is dropped.
    pub fn begin(&mut self, kind: FileRequestKind, continuation: FileContinuation) -> u64 {
        if let Some(prior) = self.pending.take() {
            eprintln!(
                "[Chame] orphaning pending {} request #{}",
                prior.kind, prior.code
            );
        }
        self.next_code += 1;
        let code = self.next_code;
        self.pending = Some(Pending {
            code,
            kind,
            continuation,
        });
        code
    }

    /// Resume the pending request. Stale or unknown codes are ignored (the
    /// request they belonged to was orphaned). Returns whether a
    /// continuation ran.
    pub fn resolve(&mut self, code: u64, path: Option<PathBuf>) -> bool {
        match &self.pending {
            Some(pending) if pending.code == code => {}
            _ => {
                eprintln!("[Chame] ignoring stale file request callback #{code}");
                return false;
            }
        }
        if let Some(pending) = self.pending.take() {
            (pending.continuation)(path);
            return true;
        }
        false
    }

    pub fn pending_code(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.code)
    }

    pub fn pending_kind(&self) -> Option<FileRequestKind> {
        self.pending.as_ref().map(|p| p.kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn resolve_runs_continuation_once() {
        let mut slot = FileRequestSlot::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = hits.clone();
        let code = slot.begin(
            FileRequestKind::Pick,
            Box::new(move |path| {
                assert_eq!(path, Some(PathBuf::from("/tmp/backup.db")));
                hits2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert!(slot.resolve(code, Some(PathBuf::from("/tmp/backup.db"))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // Second delivery of the same code is stale.
        assert!(!slot.resolve(code, None));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_begin_orphans_first_continuation() {
        let mut slot = FileRequestSlot::new();
        let first_hits = Arc::new(AtomicUsize::new(0));
        let first_hits2 = first_hits.clone();
        let first = slot.begin(
            FileRequestKind::Pick,
            Box::new(move |_| {
                first_hits2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let second_hits = Arc::new(AtomicUsize::new(0));
        let second_hits2 = second_hits.clone();
        let second = slot.begin(
            FileRequestKind::Share,
            Box::new(move |_| {
                second_hits2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_ne!(first, second);
        assert_eq!(slot.pending_kind(), Some(FileRequestKind::Share));

        // The first request's callback arrives late: dropped, not delivered.
        assert!(!slot.resolve(first, Some(PathBuf::from("/tmp/late"))));
        assert_eq!(first_hits.load(Ordering::SeqCst), 0);

        assert!(slot.resolve(second, None));
        assert_eq!(second_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_is_resolution_with_no_path() {
        let mut slot = FileRequestSlot::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = seen.clone();
        let code = slot.begin(
            FileRequestKind::Share,
            Box::new(move |path| {
                assert!(path.is_none());
                seen2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert!(slot.resolve(code, None));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(slot.pending_code().is_none());
    }
}
