pub mod controller;
pub mod element;
pub mod player;
pub mod stream;
pub mod time;

pub use controller::PlaybackStatus;
pub use player::{Change, Player};
pub use stream::{attach_listeners, ListenerGuard, StreamElement};
