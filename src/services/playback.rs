//! Playback exclusivity coordinator
//!
//! Many story widgets render their own audio player, but at most one may
//! play at a time. Widgets register with a stop callback, claim the single
//! slot before starting, and confirm once their element actually started so
//! the coordinator can halt it directly when someone else takes over.
//!
//! A forced stop releases the resource, not just an indicator: the recorded
//! handle is paused and its position reset.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Callback fired on a widget when another widget takes over playback
pub type StopCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle to a live audio element, held while it plays
pub trait PlaybackHandle: Send {
    fn pause(&mut self);

    /// Return the position to the start
    fn reset(&mut self);
}

/// Lifecycle of the single playback slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotPhase {
    /// Slot granted, element not started yet
    Pending,
    /// Element confirmed running, handle recorded
    Playing,
}

struct ActiveSlot {
    widget_id: String,
    phase: SlotPhase,
    handle: Option<Box<dyn PlaybackHandle>>,
}

#[derive(Default)]
struct CoordState {
    widgets: HashMap<String, StopCallback>,
    active: Option<ActiveSlot>,
}

/// Single-slot coordinator shared by every playback widget
#[derive(Default)]
pub struct PlaybackCoordinator {
    state: Mutex<CoordState>,
}

impl PlaybackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a widget and the callback fired when it must stop
    pub fn register(&self, id: &str, on_force_stop: StopCallback) {
        let mut state = self.state.lock().unwrap();
        if state
            .widgets
            .insert(id.to_string(), on_force_stop)
            .is_some()
        {
            log::debug!("Playback widget {} re-registered", id);
        }
    }

    /// Announce teardown; releases the slot if this widget held it
    pub fn unregister(&self, id: &str) {
        let slot = {
            let mut state = self.state.lock().unwrap();
            state.widgets.remove(id);
            let holds_slot = state
                .active
                .as_ref()
                .map(|active| active.widget_id == id)
                .unwrap_or(false);
            if holds_slot {
                state.active.take()
            } else {
                None
            }
        };
        if let Some(slot) = slot {
            Self::halt(slot);
        }
    }

    /// Claim the slot immediately before starting playback.
    ///
    /// Synchronously halts the current occupant's handle and fires every
    /// other registered widget's stop callback. Callbacks run after the
    /// internal lock is released, so a callback may re-enter the
    /// coordinator.
    pub fn request_play(&self, id: &str) {
        let (previous, callbacks) = {
            let mut state = self.state.lock().unwrap();
            let previous = state.active.take();
            state.active = Some(ActiveSlot {
                widget_id: id.to_string(),
                phase: SlotPhase::Pending,
                handle: None,
            });
            let callbacks: Vec<StopCallback> = state
                .widgets
                .iter()
                .filter(|(widget_id, _)| widget_id.as_str() != id)
                .map(|(_, callback)| Arc::clone(callback))
                .collect();
            (previous, callbacks)
        };

        if let Some(slot) = previous {
            log::debug!("Playback slot moves from {} to {}", slot.widget_id, id);
            Self::halt(slot);
        }
        for callback in callbacks {
            callback();
        }
    }

    /// Record the live handle once the element actually started.
    ///
    /// Returns false when the widget lost the slot between request and
    /// confirm; the handed-in handle is halted so no stray audio survives.
    pub fn confirm_playing(&self, id: &str, handle: Box<dyn PlaybackHandle>) -> bool {
        let stale = {
            let mut state = self.state.lock().unwrap();
            match state.active.as_mut() {
                Some(active) if active.widget_id == id => {
                    active.phase = SlotPhase::Playing;
                    active.handle = Some(handle);
                    None
                }
                _ => Some(handle),
            }
        };

        match stale {
            Some(mut handle) => {
                log::debug!("Stale playback confirm from {}", id);
                handle.pause();
                handle.reset();
                false
            }
            None => true,
        }
    }

    /// Release the slot on natural end or error
    pub fn stop(&self, id: &str) {
        let slot = {
            let mut state = self.state.lock().unwrap();
            let holds_slot = state
                .active
                .as_ref()
                .map(|active| active.widget_id == id)
                .unwrap_or(false);
            if holds_slot {
                state.active.take()
            } else {
                None
            }
        };
        if let Some(slot) = slot {
            Self::halt(slot);
        }
    }

    /// Widget currently holding the slot, if any
    pub fn active_widget(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .active
            .as_ref()
            .map(|active| active.widget_id.clone())
    }

    /// Whether `id` holds the slot with a confirmed running element
    pub fn is_playing(&self, id: &str) -> bool {
        matches!(
            self.state.lock().unwrap().active.as_ref(),
            Some(active) if active.widget_id == id && active.phase == SlotPhase::Playing
        )
    }

    fn halt(mut slot: ActiveSlot) {
        if let Some(handle) = slot.handle.as_mut() {
            handle.pause();
            handle.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records pause/reset calls so tests can assert the resource was
    /// actually released
    #[derive(Clone, Default)]
    struct TestHandle {
        pauses: Arc<AtomicUsize>,
        resets: Arc<AtomicUsize>,
    }

    impl PlaybackHandle for TestHandle {
        fn pause(&mut self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }

        fn reset(&mut self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_callback() -> (StopCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let callback: StopCallback = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, count)
    }

    #[test]
    fn test_play_notifies_every_other_widget_exactly_once() {
        let coordinator = PlaybackCoordinator::new();
        let (cb_a, count_a) = counting_callback();
        let (cb_b, count_b) = counting_callback();
        let (cb_c, count_c) = counting_callback();
        coordinator.register("a", cb_a);
        coordinator.register("b", cb_b);
        coordinator.register("c", cb_c);

        coordinator.request_play("a");
        assert!(coordinator.confirm_playing("a", Box::new(TestHandle::default())));

        assert_eq!(count_a.load(Ordering::SeqCst), 0);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
        assert_eq!(count_c.load(Ordering::SeqCst), 1);

        // Exactly one widget reports playing
        assert!(coordinator.is_playing("a"));
        assert!(!coordinator.is_playing("b"));
        assert!(!coordinator.is_playing("c"));
    }

    #[test]
    fn test_takeover_halts_previous_handle() {
        let coordinator = PlaybackCoordinator::new();
        let (cb_a, count_a) = counting_callback();
        let (cb_b, _) = counting_callback();
        coordinator.register("a", cb_a);
        coordinator.register("b", cb_b);

        let handle_a = TestHandle::default();
        coordinator.request_play("a");
        assert!(coordinator.confirm_playing("a", Box::new(handle_a.clone())));

        coordinator.request_play("b");

        // a's element was paused and rewound, and its callback fired
        assert_eq!(handle_a.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(handle_a.resets.load(Ordering::SeqCst), 1);
        assert_eq!(count_a.load(Ordering::SeqCst), 1);

        // b holds the slot but has not confirmed yet
        assert_eq!(coordinator.active_widget().as_deref(), Some("b"));
        assert!(!coordinator.is_playing("b"));
    }

    #[test]
    fn test_stale_confirm_is_rejected_and_halted() {
        let coordinator = PlaybackCoordinator::new();
        let (cb_a, _) = counting_callback();
        let (cb_b, _) = counting_callback();
        coordinator.register("a", cb_a);
        coordinator.register("b", cb_b);

        coordinator.request_play("a");
        // b preempts before a's element got going
        coordinator.request_play("b");

        let late_handle = TestHandle::default();
        assert!(!coordinator.confirm_playing("a", Box::new(late_handle.clone())));
        assert_eq!(late_handle.pauses.load(Ordering::SeqCst), 1);
        assert_eq!(late_handle.resets.load(Ordering::SeqCst), 1);

        assert_eq!(coordinator.active_widget().as_deref(), Some("b"));
    }

    #[test]
    fn test_stop_releases_slot() {
        let coordinator = PlaybackCoordinator::new();
        let (cb_a, _) = counting_callback();
        coordinator.register("a", cb_a);

        let handle = TestHandle::default();
        coordinator.request_play("a");
        coordinator.confirm_playing("a", Box::new(handle.clone()));

        coordinator.stop("a");
        assert!(coordinator.active_widget().is_none());
        assert_eq!(handle.pauses.load(Ordering::SeqCst), 1);

        // stop from a widget that does not hold the slot is a no-op
        coordinator.stop("a");
        assert!(coordinator.active_widget().is_none());
    }

    #[test]
    fn test_unregister_clears_held_slot() {
        let coordinator = PlaybackCoordinator::new();
        let (cb_a, count_a) = counting_callback();
        coordinator.register("a", cb_a);

        let handle = TestHandle::default();
        coordinator.request_play("a");
        coordinator.confirm_playing("a", Box::new(handle.clone()));

        coordinator.unregister("a");
        assert!(coordinator.active_widget().is_none());
        assert_eq!(handle.pauses.load(Ordering::SeqCst), 1);

        // unregistered widgets no longer get notified
        let (cb_b, _) = counting_callback();
        coordinator.register("b", cb_b);
        coordinator.request_play("b");
        assert_eq!(count_a.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_reenter_coordinator() {
        let coordinator = Arc::new(PlaybackCoordinator::new());

        let seen_active = Arc::new(Mutex::new(None));
        let coordinator_for_cb = Arc::clone(&coordinator);
        let seen_for_cb = Arc::clone(&seen_active);
        coordinator.register(
            "a",
            Arc::new(move || {
                // Re-entering must not deadlock; the lock is released
                // before callbacks fire.
                *seen_for_cb.lock().unwrap() = coordinator_for_cb.active_widget();
            }),
        );
        let (cb_b, _) = counting_callback();
        coordinator.register("b", cb_b);

        coordinator.request_play("b");
        assert_eq!(seen_active.lock().unwrap().as_deref(), Some("b"));
    }
}
