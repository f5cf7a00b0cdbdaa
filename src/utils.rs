use gtk4 as gtk;
use gtk4::prelude::*;

pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn toast(overlay: &adw::ToastOverlay, message: &str) {
    overlay.add_toast(adw::Toast::new(message));
}

/// Window content with a header bar on top, the way every window is laid out.
pub fn with_header(title: &str, content: &impl IsA<gtk::Widget>) -> gtk::Box {
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let label = gtk::Label::new(Some(title));
    header.set_title_widget(Some(&label));
    container.append(&header);
    container.append(content);
    container
}

pub fn padded_box(orientation: gtk::Orientation, spacing: i32, margin: i32) -> gtk::Box {
    let root = gtk::Box::new(orientation, spacing);
    root.set_margin_top(margin);
    root.set_margin_bottom(margin);
    root.set_margin_start(margin);
    root.set_margin_end(margin);
    root
}
