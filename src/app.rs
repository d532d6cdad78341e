use gtk4::prelude::*;
use gtk4::Application;

use crate::config::GalleryConfig;
use crate::scanner::ReelSource;
use crate::ui::MainWindow;

const APP_ID: &str = "com.reelgrid.Gallery";

pub struct ReelgridApp {
    app: Application,
}

impl ReelgridApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        Self::show(app, ReelSource::default_manifest());
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let source = files
            .first()
            .and_then(|f| f.path())
            .map(|path| ReelSource::from_path(&path));
        Self::show(app, source);
    }

    fn show(app: &Application, source: Option<ReelSource>) {
        let window = MainWindow::new(app, GalleryConfig::from_env(), source);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}

impl Default for ReelgridApp {
    fn default() -> Self {
        Self::new()
    }
}
