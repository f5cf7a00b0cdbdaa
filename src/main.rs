mod app;
mod ui;
mod utils;

use adw::prelude::*;
use adw::Application;

fn main() -> glib::ExitCode {
    utils::init_logging();
    let app = Application::builder()
        .application_id("com.example.SteelEnquiry")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run()
}
