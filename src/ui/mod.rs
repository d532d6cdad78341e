pub mod card;
pub mod gallery;
pub mod reveal;
pub mod window;

pub use window::MainWindow;
