// Main window for reelgrid
// GTK4 ApplicationWindow hosting the gallery section with terminal aesthetic CSS

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    gdk, glib, Align, Application, ApplicationWindow, Box as GtkBox, CssProvider,
    EventControllerKey, Label, Orientation, Settings, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use once_cell::sync::OnceCell;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::gallery::GallerySection;
use crate::config::GalleryConfig;
use crate::models::ReelItem;
use crate::scanner::{ReelScanner, ReelSource, ScanConfig};

static CSS_LOADED: OnceCell<()> = OnceCell::new();

/// CSS for terminal aesthetic
const GALLERY_CSS: &str = r#"
* {
    border-radius: 0;
    box-shadow: none;
    background-image: none;
}

window {
    background-color: #0a0a0a;
    color: #e0e0e0;
}

button {
    background-color: transparent;
    border: 1px solid #333333;
    color: #e0e0e0;
    padding: 2px 6px;
    font-family: monospace;
    font-size: 11px;
}

button:hover {
    background-color: rgba(224, 224, 224, 0.05);
    border-color: #555555;
}

.section-title {
    color: #00ff88;
    font-family: monospace;
    font-size: 16px;
    font-weight: bold;
}

.muted {
    color: #777777;
    font-family: monospace;
    font-size: 11px;
}

.reel-card {
    background-color: #121212;
    border: 1px solid #333333;
    padding: 6px;
    opacity: 0;
    transition: opacity 400ms ease-out;
}

.reel-card.revealed {
    opacity: 1;
}

.reel-card:hover {
    border-color: #555555;
}

.reel-card.errored {
    border-color: #ff5555;
    border-style: dashed;
}

.reel-frame {
    background-color: #000000;
}

.reel-title {
    color: #e0e0e0;
    font-weight: bold;
}

.reel-error {
    color: #ff5555;
    font-family: monospace;
}

.reel-controls scale {
    min-width: 40px;
}

.reel-description {
    color: #b0b0b0;
    font-size: 12px;
}

.status-bar {
    background-color: #121212;
    border-top: 1px solid #333333;
    padding: 4px 8px;
}

.nav-hint {
    color: #555555;
    font-family: monospace;
    font-size: 11px;
}
"#;

/// Load and apply the stylesheet once per process
fn load_css() {
    CSS_LOADED.get_or_init(|| {
        let provider = CssProvider::new();
        provider.load_from_string(GALLERY_CSS);

        if let Some(display) = Display::default() {
            gtk4::style_context_add_provider_for_display(
                &display,
                &provider,
                STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
            tracing::info!("Loaded gallery CSS");
        } else {
            tracing::warn!("No default display, gallery CSS not applied");
        }
    });
}

type LoadResult = Result<Vec<ReelItem>, String>;

/// Main window: gallery plus a status bar
pub struct MainWindow {
    self_weak: RefCell<Weak<MainWindow>>,
    window: ApplicationWindow,
    gallery: GallerySection,
    status_label: Label,
    source: Option<ReelSource>,
    scan_config: ScanConfig,
    load_generation: Cell<u64>,
    load_sender: async_channel::Sender<(u64, LoadResult)>,
}

impl MainWindow {
    pub fn new(app: &Application, config: GalleryConfig, source: Option<ReelSource>) -> Rc<Self> {
        load_css();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title(format!("reelgrid - {}", config.title))
            .default_width(1200)
            .default_height(800)
            .build();

        let scan_config = config.scan_config();
        let gallery = GallerySection::new(Rc::new(config));

        let status_bar = GtkBox::new(Orientation::Horizontal, 8);
        status_bar.add_css_class("status-bar");

        let status_label = Label::new(Some("> Ready"));
        status_label.set_halign(Align::Start);
        status_label.set_hexpand(true);
        status_label.add_css_class("muted");

        let hints_label = Label::new(Some("[F5] Reload  [Ctrl+Q] Quit"));
        hints_label.set_halign(Align::End);
        hints_label.add_css_class("nav-hint");

        status_bar.append(&status_label);
        status_bar.append(&hints_label);

        let main_box = GtkBox::new(Orientation::Vertical, 0);
        main_box.append(gallery.widget());
        main_box.append(&status_bar);
        window.set_child(Some(&main_box));

        let (load_sender, load_receiver) = async_channel::unbounded::<(u64, LoadResult)>();

        let main_window = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            gallery,
            status_label,
            source,
            scan_config,
            load_generation: Cell::new(0),
            load_sender,
        });
        *main_window.self_weak.borrow_mut() = Rc::downgrade(&main_window);

        // Results are applied on the main thread
        let window_weak = Rc::downgrade(&main_window);
        glib::spawn_future_local(async move {
            while let Ok((generation, result)) = load_receiver.recv().await {
                match window_weak.upgrade() {
                    Some(window) => window.apply_load_result(generation, result),
                    None => break,
                }
            }
        });

        main_window.setup_keybindings();
        main_window.reload();
        main_window
    }

    fn setup_keybindings(&self) {
        let controller = EventControllerKey::new();
        let window_weak = self.self_weak.borrow().clone();
        controller.connect_key_pressed(move |_controller, keyval, _keycode, state| {
            let Some(window) = window_weak.upgrade() else {
                return glib::Propagation::Proceed;
            };
            if keyval == gdk::Key::F5 {
                window.reload();
                return glib::Propagation::Stop;
            }
            let ctrl = state.contains(gdk::ModifierType::CONTROL_MASK);
            if ctrl && (keyval == gdk::Key::q || keyval == gdk::Key::Q) {
                window.window.close();
                return glib::Propagation::Stop;
            }
            glib::Propagation::Proceed
        });
        self.window.add_controller(controller);
    }

    pub fn present(&self) {
        self.window.present();
    }

    /// Set status bar text
    pub fn set_status(&self, status: &str) {
        self.status_label.set_text(status);
    }

    /// Load the current source on a worker thread. Results from older
    /// loads are discarded.
    pub fn reload(&self) {
        let generation = self.load_generation.get().wrapping_add(1);
        self.load_generation.set(generation);

        let Some(source) = self.source.clone() else {
            tracing::info!("No reel source configured");
            self.set_status("> No reel source: pass a manifest or a directory");
            self.gallery.set_items(Vec::new());
            return;
        };

        self.set_status(&format!("> Loading: {}", source.path().display()));
        let sender = self.load_sender.clone();
        let scan_config = self.scan_config.clone();
        std::thread::spawn(move || {
            let result = ReelScanner::with_config(scan_config)
                .load(&source)
                .map_err(|err| format!("{:#}", err));
            if sender.send_blocking((generation, result)).is_err() {
                tracing::debug!("Window closed before reel load finished");
            }
        });
    }

    fn apply_load_result(&self, generation: u64, result: LoadResult) {
        if generation != self.load_generation.get() {
            tracing::debug!(generation, "Discarding stale reel load");
            return;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.gallery.set_items(items);
                self.set_status(&format!(
                    "> {} reels | {} cards",
                    count,
                    self.gallery.card_count()
                ));
            }
            Err(message) => {
                tracing::warn!("Failed to load reels: {}", message);
                self.gallery.set_items(Vec::new());
                self.set_status(&format!("> Load failed: {}", message));
            }
        }
    }
}
