//! The seam between the playback controller and a concrete media backend.

/// Failures reported by a media element.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    /// The element refused a play command (e.g. autoplay policy). Recovered locally.
    #[error("play command rejected: {reason}")]
    CommandRejected { reason: String },
    /// The element cannot seek right now (live or not yet seekable stream).
    #[error("seek to {seconds:.2}s refused: stream is not seekable")]
    NotSeekable { seconds: f64 },
}

/// The transport surface of a native media element.
///
/// Implementations must not assume the controller state; the controller only
/// learns the outcome of a command from the element's own events.
pub trait MediaElement {
    /// Requests playback. A rejected request is reported, never panics.
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self);
    fn is_muted(&self) -> bool;
    fn set_muted(&self, muted: bool);
    /// Moves the playhead to `seconds`. A refused seek leaves the playhead
    /// where it was.
    fn set_current_time(&self, seconds: f64) -> Result<(), PlaybackError>;
}

/// A command the controller wants issued to its element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transport {
    Play,
    Pause,
    SetMuted(bool),
    SeekTo(f64),
}

impl Transport {
    pub fn apply<E: MediaElement + ?Sized>(self, element: &E) -> Result<(), PlaybackError> {
        match self {
            Self::Play => element.play(),
            Self::Pause => {
                element.pause();
                Ok(())
            }
            Self::SetMuted(muted) => {
                element.set_muted(muted);
                Ok(())
            }
            Self::SeekTo(seconds) => element.set_current_time(seconds),
        }
    }
}
