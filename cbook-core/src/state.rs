//! Observable `(content, loading, error)` triple for UI consumers

use crate::types::ChapterContent;
use std::sync::Arc;
use tokio::sync::watch;

/// Point-in-time copy of a loader's state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSnapshot {
    pub content: Option<Arc<ChapterContent>>,
    pub loading: bool,
    pub error: Option<String>,
}

/// What a consumer should render for a snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadView<'a> {
    Error(&'a str),
    Loading,
    Content(&'a ChapterContent),
    Empty,
}

impl LoadSnapshot {
    /// Error wins over the spinner, the spinner wins over content
    pub fn view(&self) -> LoadView<'_> {
        if let Some(error) = &self.error {
            LoadView::Error(error)
        } else if self.loading {
            LoadView::Loading
        } else if let Some(content) = &self.content {
            LoadView::Content(content)
        } else {
            LoadView::Empty
        }
    }
}

/// Reactive load state owned by a single [`ChapterLoader`](crate::ChapterLoader).
///
/// Readers take snapshots or subscribe; only the loader writes.
#[derive(Debug)]
pub struct LoadState {
    tx: watch::Sender<LoadSnapshot>,
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadSnapshot::default());
        Self { tx }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> LoadSnapshot {
        self.tx.borrow().clone()
    }

    pub fn content(&self) -> Option<Arc<ChapterContent>> {
        self.tx.borrow().content.clone()
    }

    pub fn loading(&self) -> bool {
        self.tx.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }

    /// Receiver notified whenever the state changes
    pub fn subscribe(&self) -> watch::Receiver<LoadSnapshot> {
        self.tx.subscribe()
    }

    /// Apply `f` and notify subscribers if anything changed.
    ///
    /// `f` edits a copy; returning `false` discards the copy, including any
    /// edits made before deciding.
    pub(crate) fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut LoadSnapshot) -> bool,
    {
        let mut applied = false;
        self.tx.send_if_modified(|snapshot| {
            let mut next = snapshot.clone();
            applied = f(&mut next);
            if applied && next != *snapshot {
                *snapshot = next;
                true
            } else {
                false
            }
        });
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_precedence() {
        let content = Arc::new(ChapterContent::new("loops", "Loops"));
        let mut snapshot = LoadSnapshot {
            content: Some(content),
            loading: true,
            error: Some("boom".into()),
        };
        assert_eq!(snapshot.view(), LoadView::Error("boom"));

        snapshot.error = None;
        assert_eq!(snapshot.view(), LoadView::Loading);

        snapshot.loading = false;
        assert!(matches!(snapshot.view(), LoadView::Content(c) if c.id == "loops"));

        assert_eq!(LoadSnapshot::default().view(), LoadView::Empty);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_only() {
        let state = LoadState::new();
        let mut rx = state.subscribe();

        assert!(state.update(|s| {
            s.loading = true;
            true
        }));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().loading);

        // Same value again: applied, but no notification
        assert!(state.update(|s| {
            s.loading = true;
            true
        }));
        assert!(!rx.has_changed().unwrap());

        // Abandoned write
        assert!(!state.update(|s| {
            s.loading = false;
            false
        }));
        assert!(state.loading());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_abandoned_write_keeps_prior_state() {
        let state = LoadState::new();
        state.update(|s| {
            s.error = Some("Chapter 'nope' not found".into());
            true
        });

        let applied = state.update(|s| {
            s.error = None;
            s.loading = true;
            s.content = Some(Arc::new(ChapterContent::new("loops", "Loops")));
            false
        });

        assert!(!applied);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some("Chapter 'nope' not found"));
        assert!(!snapshot.loading);
        assert!(snapshot.content.is_none());
    }
}
