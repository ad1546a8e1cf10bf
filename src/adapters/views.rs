/// In-process story view registry
///
/// One version counter per read view. UIs snapshot the version when they
/// fetch and re-fetch whenever it has moved since.
use crate::ports::views::{StoryView, StoryViewsPort};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct CountingStoryViews {
    my_stories: AtomicU64,
    next_prompt: AtomicU64,
}

impl CountingStoryViews {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, view: StoryView) -> &AtomicU64 {
        match view {
            StoryView::MyStories => &self.my_stories,
            StoryView::NextPrompt => &self.next_prompt,
        }
    }
}

impl StoryViewsPort for CountingStoryViews {
    fn mark_stale(&self, view: StoryView) {
        let version = self.counter(view).fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("View {} marked stale (version {})", view, version);
    }

    fn version(&self, view: StoryView) -> u64 {
        self.counter(view).load(Ordering::SeqCst)
    }
}
