//! Playback state machine for a single reel card.
//!
//! The controller is a projection of its media element: `status`, duration and
//! current time change only in [`PlaybackController::handle_event`]. Commands
//! never touch that state; they return a [`Transport`] for the caller to issue
//! and wait for the element to report back. The single exception is the seek
//! override, a transient progress value shown until the next time update.

use super::element::Transport;
use super::time::format_time;

/// Guards fraction math against zero durations.
const DURATION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Loading,
    Ready,
    Playing,
    Paused,
    /// Terminal for the element instance.
    Errored,
}

impl PlaybackStatus {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn is_errored(self) -> bool {
        matches!(self, Self::Errored)
    }
}

/// Notifications from the host media element, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata { duration: f64 },
    DurationChange { duration: f64 },
    CanPlay,
    TimeUpdate { current_time: f64 },
    Play,
    Pause,
    Ended,
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub is_muted: bool,
    /// Zero until metadata is known.
    pub duration_seconds: f64,
    pub current_time_seconds: f64,
}

impl PlaybackState {
    pub fn has_duration(&self) -> bool {
        self.duration_seconds > 0.0
    }

    /// Position within the media, always in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        (self.current_time_seconds / self.duration_seconds.max(DURATION_EPSILON)).clamp(0.0, 1.0)
    }
}

/// Host values can be NaN, infinite or negative before metadata arrives.
fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    state: PlaybackState,
    /// Fraction requested by the last seek, shown until the next time update.
    seek_override: Option<f64>,
    /// A play event arrived before the element finished loading.
    play_pending: bool,
}

impl PlaybackController {
    pub fn new(is_muted: bool) -> Self {
        Self {
            state: PlaybackState {
                is_muted,
                ..PlaybackState::default()
            },
            seek_override: None,
            play_pending: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }


    pub fn progress_fraction(&self) -> f64 {
        self.seek_override
            .unwrap_or_else(|| self.state.progress_fraction())
    }

    /// Elapsed time label, following the seek override while one is pending.
    pub fn elapsed_label(&self) -> String {
        let seconds = match self.seek_override {
            Some(fraction) => fraction * self.state.duration_seconds,
            None => self.state.current_time_seconds,
        };
        format_time(seconds)
    }

    pub fn total_label(&self) -> String {
        format_time(self.state.duration_seconds)
    }

    /// Play when paused, pause when playing.
    pub fn toggle_play(&self) -> Option<Transport> {
        match self.state.status {
            PlaybackStatus::Errored => None,
            PlaybackStatus::Playing => Some(Transport::Pause),
            PlaybackStatus::Loading if self.play_pending => Some(Transport::Pause),
            PlaybackStatus::Loading | PlaybackStatus::Ready | PlaybackStatus::Paused => {
                Some(Transport::Play)
            }
        }
    }

    pub fn toggle_mute(&self) -> Option<Transport> {
        if self.state.status.is_errored() {
            return None;
        }
        Some(Transport::SetMuted(!self.state.is_muted))
    }

    /// Records the mute flag read back from the element after a mute command.
    pub fn mirror_muted(&mut self, actual: bool) {
        if self.state.status.is_errored() {
            return;
        }
        self.state.is_muted = actual;
    }

    /// Maps a scrub fraction to a seek, showing the target immediately.
    ///
    /// Out-of-range fractions are clamped; NaN or an unknown duration makes
    /// the seek a no-op.
    pub fn seek(&mut self, fraction: f64) -> Option<Transport> {
        if self.state.status.is_errored() || fraction.is_nan() || !self.state.has_duration() {
            return None;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        self.seek_override = Some(fraction);
        Some(Transport::SeekTo(fraction * self.state.duration_seconds))
    }

    /// Drops the seek override after the element refused the seek, so
    /// progress falls back to the element's reported time. Returns whether
    /// an override was pending.
    pub fn cancel_seek(&mut self) -> bool {
        self.seek_override.take().is_some()
    }

    /// Applies one element event. Returns false when the event was ignored
    /// because the controller already reached `Errored`.
    pub fn handle_event(&mut self, event: &MediaEvent) -> bool {
        if self.state.status.is_errored() {
            return false;
        }

        let previous = self.state.status;
        match event {
            MediaEvent::LoadedMetadata { duration } => {
                self.state.duration_seconds = sanitize_seconds(*duration);
                self.leave_loading();
            }
            MediaEvent::DurationChange { duration } => {
                self.state.duration_seconds = sanitize_seconds(*duration);
            }
            MediaEvent::CanPlay => self.leave_loading(),
            MediaEvent::TimeUpdate { current_time } => {
                self.state.current_time_seconds = sanitize_seconds(*current_time);
                self.seek_override = None;
            }
            MediaEvent::Play => match self.state.status {
                PlaybackStatus::Loading => self.play_pending = true,
                PlaybackStatus::Ready | PlaybackStatus::Paused => {
                    self.state.status = PlaybackStatus::Playing;
                }
                PlaybackStatus::Playing | PlaybackStatus::Errored => {}
            },
            MediaEvent::Pause | MediaEvent::Ended => match self.state.status {
                PlaybackStatus::Loading => self.play_pending = false,
                PlaybackStatus::Playing => self.state.status = PlaybackStatus::Paused,
                PlaybackStatus::Ready | PlaybackStatus::Paused | PlaybackStatus::Errored => {}
            },
            MediaEvent::Error { message } => {
                tracing::error!(%message, "media element failed");
                self.state.status = PlaybackStatus::Errored;
                self.seek_override = None;
                self.play_pending = false;
            }
        }

        if previous != self.state.status {
            tracing::debug!(from = ?previous, to = ?self.state.status, "playback status");
        }
        true
    }

    fn leave_loading(&mut self) {
        if self.state.status == PlaybackStatus::Loading {
            self.state.status = if self.play_pending {
                PlaybackStatus::Playing
            } else {
                PlaybackStatus::Ready
            };
            self.play_pending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(duration: f64) -> PlaybackController {
        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::LoadedMetadata { duration });
        controller.handle_event(&MediaEvent::CanPlay);
        controller
    }

    #[test]
    fn test_starts_loading_with_mute_policy() {
        let controller = PlaybackController::new(true);
        assert_eq!(controller.status(), PlaybackStatus::Loading);
        assert!(controller.state().is_muted);
        assert!(!PlaybackController::new(false).state().is_muted);
    }

    #[test]
    fn test_metadata_and_canplay_reach_ready() {
        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::CanPlay);
        assert_eq!(controller.status(), PlaybackStatus::Ready);

        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::LoadedMetadata { duration: 12.5 });
        assert_eq!(controller.status(), PlaybackStatus::Ready);
        assert_eq!(controller.state().duration_seconds, 12.5);
    }

    #[test]
    fn test_play_pause_events_drive_status() {
        let mut controller = ready(30.0);
        controller.handle_event(&MediaEvent::Play);
        assert_eq!(controller.status(), PlaybackStatus::Playing);
        controller.handle_event(&MediaEvent::Pause);
        assert_eq!(controller.status(), PlaybackStatus::Paused);
        controller.handle_event(&MediaEvent::Play);
        assert_eq!(controller.status(), PlaybackStatus::Playing);
        controller.handle_event(&MediaEvent::Ended);
        assert_eq!(controller.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn test_play_during_loading_is_deferred() {
        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::Play);
        assert_eq!(controller.status(), PlaybackStatus::Loading);
        assert_eq!(controller.toggle_play(), Some(Transport::Pause));
        controller.handle_event(&MediaEvent::CanPlay);
        assert_eq!(controller.status(), PlaybackStatus::Playing);

        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::Play);
        controller.handle_event(&MediaEvent::Pause);
        controller.handle_event(&MediaEvent::CanPlay);
        assert_eq!(controller.status(), PlaybackStatus::Ready);
    }

    #[test]
    fn test_toggle_play_commands() {
        let mut controller = ready(30.0);
        assert_eq!(controller.toggle_play(), Some(Transport::Play));
        // Commands do not move the state machine.
        assert_eq!(controller.status(), PlaybackStatus::Ready);
        controller.handle_event(&MediaEvent::Play);
        assert_eq!(controller.toggle_play(), Some(Transport::Pause));
        assert_eq!(PlaybackController::new(false).toggle_play(), Some(Transport::Play));
    }

    #[test]
    fn test_error_is_terminal() {
        let mut controller = ready(30.0);
        controller.handle_event(&MediaEvent::Play);
        assert!(controller.handle_event(&MediaEvent::Error {
            message: "decode failed".into()
        }));
        assert_eq!(controller.status(), PlaybackStatus::Errored);

        assert!(!controller.handle_event(&MediaEvent::Play));
        assert!(!controller.handle_event(&MediaEvent::CanPlay));
        assert!(!controller.handle_event(&MediaEvent::TimeUpdate { current_time: 4.0 }));
        assert_eq!(controller.status(), PlaybackStatus::Errored);
        assert_eq!(controller.state().current_time_seconds, 0.0);

        assert_eq!(controller.toggle_play(), None);
        assert_eq!(controller.toggle_mute(), None);
        assert_eq!(controller.seek(0.5), None);
        controller.mirror_muted(false);
        assert!(controller.state().is_muted);
    }

    #[test]
    fn test_error_while_loading() {
        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::Error {
            message: "404".into(),
        });
        assert_eq!(controller.status(), PlaybackStatus::Errored);
    }

    #[test]
    fn test_seek_maps_fraction_to_time() {
        for fraction in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let mut controller = ready(80.0);
            let command = controller.seek(fraction);
            assert_eq!(command, Some(Transport::SeekTo(fraction * 80.0)));
            assert_eq!(controller.progress_fraction(), fraction);
        }
    }

    #[test]
    fn test_seek_clamps_out_of_range() {
        let mut controller = ready(10.0);
        assert_eq!(controller.seek(1.7), Some(Transport::SeekTo(10.0)));
        assert_eq!(controller.progress_fraction(), 1.0);
        assert_eq!(controller.seek(-0.3), Some(Transport::SeekTo(0.0)));
        assert_eq!(controller.progress_fraction(), 0.0);
        assert_eq!(controller.seek(f64::NAN), None);
    }

    #[test]
    fn test_seek_without_duration_is_noop() {
        let mut controller = PlaybackController::new(true);
        assert_eq!(controller.seek(0.5), None);
        assert!(controller.seek_override.is_none());

        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::LoadedMetadata { duration: f64::NAN });
        assert_eq!(controller.seek(0.5), None);
    }

    #[test]
    fn test_seek_override_cleared_by_time_update() {
        let mut controller = ready(100.0);
        controller.handle_event(&MediaEvent::TimeUpdate { current_time: 10.0 });
        controller.seek(0.6);
        assert!(controller.seek_override.is_some());
        assert_eq!(controller.progress_fraction(), 0.6);
        assert_eq!(controller.elapsed_label(), "1:00");
        // Raw time is untouched until the element confirms.
        assert_eq!(controller.state().current_time_seconds, 10.0);

        controller.handle_event(&MediaEvent::TimeUpdate { current_time: 60.0 });
        assert!(controller.seek_override.is_none());
        assert!((controller.progress_fraction() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_cancelled_seek_falls_back_to_element_time() {
        let mut controller = ready(100.0);
        controller.handle_event(&MediaEvent::TimeUpdate { current_time: 10.0 });
        controller.seek(0.8);
        assert_eq!(controller.elapsed_label(), "1:20");

        assert!(controller.cancel_seek());
        assert!((controller.progress_fraction() - 0.1).abs() < 1e-9);
        assert_eq!(controller.elapsed_label(), "0:10");
        assert!(!controller.cancel_seek());
    }

    #[test]
    fn test_progress_fraction_bounds() {
        let mut controller = PlaybackController::new(true);
        controller.handle_event(&MediaEvent::TimeUpdate { current_time: 5.0 });
        assert_eq!(controller.progress_fraction(), 0.0);

        controller.handle_event(&MediaEvent::LoadedMetadata { duration: 4.0 });
        assert_eq!(controller.progress_fraction(), 1.0);

        controller.handle_event(&MediaEvent::TimeUpdate {
            current_time: f64::NAN,
        });
        assert_eq!(controller.progress_fraction(), 0.0);

        controller.handle_event(&MediaEvent::DurationChange {
            duration: f64::INFINITY,
        });
        controller.handle_event(&MediaEvent::TimeUpdate { current_time: 2.0 });
        let fraction = controller.progress_fraction();
        assert!(fraction.is_finite() && (0.0..=1.0).contains(&fraction));
    }

    #[test]
    fn test_labels() {
        let mut controller = PlaybackController::new(true);
        assert_eq!(controller.elapsed_label(), "0:00");
        assert_eq!(controller.total_label(), "0:00");
        controller.handle_event(&MediaEvent::LoadedMetadata { duration: 65.0 });
        controller.handle_event(&MediaEvent::TimeUpdate { current_time: 7.4 });
        assert_eq!(controller.elapsed_label(), "0:07");
        assert_eq!(controller.total_label(), "1:05");
    }

    #[test]
    fn test_toggle_mute_and_mirror() {
        let mut controller = ready(10.0);
        assert_eq!(controller.toggle_mute(), Some(Transport::SetMuted(false)));
        controller.mirror_muted(false);
        assert_eq!(controller.toggle_mute(), Some(Transport::SetMuted(true)));
    }
}
