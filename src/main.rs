mod app;
mod config;
mod layout;
mod models;
mod scanner;
mod ui;
mod video;

use app::ReelgridApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reelgrid=info".parse().unwrap()),
        )
        .init();

    let app = ReelgridApp::new();
    std::process::exit(app.run());
}
