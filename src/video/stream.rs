//! GTK media stream backend.
//!
//! `GtkMediaFile` is the native element here: its property notifications are
//! translated into [`MediaEvent`]s and forwarded to the card's [`Player`].

use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{glib, MediaFile};

use super::controller::MediaEvent;
use super::element::{MediaElement, PlaybackError};
use super::player::Player;
use crate::models::has_uri_scheme;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}

fn seconds_to_micros(seconds: f64) -> i64 {
    (seconds.max(0.0) * MICROS_PER_SECOND).round() as i64
}

/// Resolves a reel source into a `gio::File` (URI or local path).
pub fn source_file(source: &str) -> gio::File {
    if has_uri_scheme(source) {
        gio::File::for_uri(source)
    } else {
        gio::File::for_path(source)
    }
}

/// A `GtkMediaFile` driven through the [`MediaElement`] surface.
pub struct StreamElement {
    stream: MediaFile,
}

impl StreamElement {
    pub fn new(looping: bool) -> Self {
        let stream = MediaFile::new();
        stream.set_loop(looping);
        Self { stream }
    }

    /// The stream doubles as the paintable shown by the card.
    pub fn stream(&self) -> &MediaFile {
        &self.stream
    }

    /// Starts loading `source`. Listeners should be attached first.
    pub fn load(&self, source: &str) {
        tracing::debug!(source, "loading reel");
        self.stream.set_file(Some(&source_file(source)));
    }

    /// Stops playback and drops the underlying pipeline.
    pub fn release(&self) {
        self.stream.pause();
        self.stream.clear();
    }
}

impl MediaElement for StreamElement {
    fn play(&self) -> Result<(), PlaybackError> {
        if let Some(err) = self.stream.error() {
            return Err(PlaybackError::CommandRejected {
                reason: err.message().to_string(),
            });
        }
        self.stream.play();
        Ok(())
    }

    fn pause(&self) {
        self.stream.pause();
    }

    fn is_muted(&self) -> bool {
        self.stream.is_muted()
    }

    fn set_muted(&self, muted: bool) {
        self.stream.set_muted(muted);
    }

    fn set_current_time(&self, seconds: f64) -> Result<(), PlaybackError> {
        if !self.stream.is_seekable() {
            return Err(PlaybackError::NotSeekable { seconds });
        }
        self.stream.seek(seconds_to_micros(seconds));
        Ok(())
    }
}

/// Signal handlers registered on one stream; disconnected on drop.
///
/// Dropping the guard is the single teardown path for a card, whether it is
/// unbound, rebound to a new source or destroyed mid-load.
pub struct ListenerGuard {
    stream: MediaFile,
    handlers: Vec<glib::SignalHandlerId>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for handler in self.handlers.drain(..) {
            self.stream.disconnect(handler);
        }
        tracing::trace!("stream listeners detached");
    }
}

/// Forwards a notification as an optional event to a weakly held player.
fn forward<F>(player: &Rc<Player<StreamElement>>, to_event: F) -> impl Fn(&MediaFile) + 'static
where
    F: Fn(&MediaFile) -> Option<MediaEvent> + 'static,
{
    let player = Rc::downgrade(player);
    move |stream: &MediaFile| {
        let Some(player) = player.upgrade() else {
            return;
        };
        if let Some(event) = to_event(stream) {
            player.dispatch(event);
        }
    }
}

/// Connects the stream's notifications to `player`.
pub fn attach_listeners(player: &Rc<Player<StreamElement>>) -> ListenerGuard {
    let stream = player.element().stream().clone();
    let mut handlers = Vec::with_capacity(6);

    let weak = Rc::downgrade(player);
    handlers.push(stream.connect_prepared_notify(move |stream| {
        let Some(player) = weak.upgrade() else {
            return;
        };
        if stream.is_prepared() {
            player.dispatch(MediaEvent::LoadedMetadata {
                duration: micros_to_seconds(stream.duration()),
            });
            player.dispatch(MediaEvent::CanPlay);
        }
    }));

    handlers.push(stream.connect_duration_notify(forward(player, |stream| {
        Some(MediaEvent::DurationChange {
            duration: micros_to_seconds(stream.duration()),
        })
    })));

    handlers.push(stream.connect_timestamp_notify(forward(player, |stream| {
        Some(MediaEvent::TimeUpdate {
            current_time: micros_to_seconds(stream.timestamp()),
        })
    })));

    handlers.push(stream.connect_playing_notify(forward(player, |stream| {
        Some(if stream.is_playing() {
            MediaEvent::Play
        } else {
            MediaEvent::Pause
        })
    })));

    handlers.push(stream.connect_ended_notify(forward(player, |stream| {
        stream.is_ended().then_some(MediaEvent::Ended)
    })));

    handlers.push(stream.connect_error_notify(forward(player, |stream| {
        stream.error().map(|err| MediaEvent::Error {
            message: err.message().to_string(),
        })
    })));

    ListenerGuard { stream, handlers }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_conversion() {
        assert_eq!(micros_to_seconds(2_500_000), 2.5);
        assert_eq!(seconds_to_micros(1.25), 1_250_000);
        assert_eq!(seconds_to_micros(-4.0), 0);
    }
}
