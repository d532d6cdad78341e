//! Pairs a media element with its playback controller.
//!
//! `Player` owns the element and the controller and is the only place commands
//! and events meet. The controller borrow is always released before the
//! element is touched, because a host element may emit its events
//! synchronously from inside a command.

use std::cell::RefCell;

use super::controller::{MediaEvent, PlaybackController, PlaybackState, PlaybackStatus};
use super::element::{MediaElement, PlaybackError, Transport};

/// What changed after an event or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Only the playhead moved; cheap to redraw.
    Progress,
    /// Status, mute flag or duration changed.
    State,
}

/// Callback type for controller changes
pub type ChangeCallback = Box<dyn Fn(Change) + 'static>;

pub struct Player<E: MediaElement> {
    element: E,
    controller: RefCell<PlaybackController>,
    change_callbacks: RefCell<Vec<ChangeCallback>>,
}

impl<E: MediaElement> Player<E> {
    /// Applies the initial mute policy to `element` and mirrors the result.
    pub fn new(element: E, start_muted: bool) -> Self {
        element.set_muted(start_muted);
        let muted = element.is_muted();
        Self {
            element,
            controller: RefCell::new(PlaybackController::new(muted)),
            change_callbacks: RefCell::new(Vec::new()),
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.borrow().state()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.controller.borrow().status()
    }

    pub fn progress_fraction(&self) -> f64 {
        self.controller.borrow().progress_fraction()
    }

    /// Elapsed and total time, formatted for display.
    pub fn time_labels(&self) -> (String, String) {
        let controller = self.controller.borrow();
        (controller.elapsed_label(), controller.total_label())
    }

    /// Register a callback for controller changes
    pub fn connect_changed<F: Fn(Change) + 'static>(&self, callback: F) {
        self.change_callbacks.borrow_mut().push(Box::new(callback));
    }

    /// Feeds one element event into the controller, in arrival order.
    pub fn dispatch(&self, event: MediaEvent) -> bool {
        let change = match event {
            MediaEvent::TimeUpdate { .. } => Change::Progress,
            _ => Change::State,
        };
        let applied = self.controller.borrow_mut().handle_event(&event);
        if applied {
            self.notify(change);
        }
        applied
    }

    /// Issues play or pause. A rejected play is logged and dropped; the
    /// element's next events decide the status.
    pub fn toggle_play(&self) {
        let command = self.controller.borrow().toggle_play();
        if let Some(command) = command {
            self.issue(command);
        }
    }

    /// Flips the element's mute flag and mirrors what the element reports.
    pub fn toggle_mute(&self) {
        let command = self.controller.borrow().toggle_mute();
        let Some(command) = command else {
            return;
        };
        self.issue(command);
        let actual = self.element.is_muted();
        self.controller.borrow_mut().mirror_muted(actual);
        self.notify(Change::State);
    }

    /// Seeks to `fraction` of the duration; see [`PlaybackController::seek`].
    ///
    /// If the element refuses the seek, the optimistic position is dropped
    /// again and progress returns to the element's reported time.
    pub fn seek(&self, fraction: f64) {
        let command = self.controller.borrow_mut().seek(fraction);
        let Some(command) = command else {
            return;
        };
        self.notify(Change::Progress);
        if !self.issue(command) {
            let cancelled = self.controller.borrow_mut().cancel_seek();
            if cancelled {
                self.notify(Change::Progress);
            }
        }
    }

    /// Returns false when the element refused the command.
    fn issue(&self, command: Transport) -> bool {
        match command.apply(&self.element) {
            Ok(()) => {
                tracing::trace!(?command, "transport command issued");
                true
            }
            Err(PlaybackError::CommandRejected { reason }) => {
                tracing::warn!(%reason, "play command rejected, keeping element state");
                false
            }
            Err(err) => {
                tracing::debug!(error = %err, "transport command refused");
                false
            }
        }
    }

    fn notify(&self, change: Change) {
        for callback in self.change_callbacks.borrow().iter() {
            callback(change);
        }
    }
}
