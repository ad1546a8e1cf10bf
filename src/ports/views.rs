/// Story view staleness port
///
/// Read views cache their last fetch; after a successful save the
/// orchestrator bumps their version so they re-fetch on next render.
use serde::{Deserialize, Serialize};

/// A cached read view fed from story data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StoryView {
    /// The storyteller's story list
    MyStories,
    /// The next suggested prompt
    NextPrompt,
}

impl std::fmt::Display for StoryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryView::MyStories => write!(f, "my_stories"),
            StoryView::NextPrompt => write!(f, "next_prompt"),
        }
    }
}

/// Trait for view staleness tracking - allows for mocking in tests
pub trait StoryViewsPort: Send + Sync {
    /// Bump the view's version so consumers re-fetch
    fn mark_stale(&self, view: StoryView);

    /// Current version; consumers re-fetch when it moves
    fn version(&self, view: StoryView) -> u64;
}
