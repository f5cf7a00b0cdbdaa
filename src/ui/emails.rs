use crate::app::Session;
use crate::utils::toast;
use adw::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;
use steel_enquiry::Composition;

pub fn show_emails_window(parent: &impl IsA<gtk::Window>, session: Rc<Session>, composition: Composition) {
    let window = adw::Window::builder()
        .transient_for(parent)
        .title("Generated Emails")
        .default_width(800)
        .default_height(600)
        .build();

    let overlay = adw::ToastOverlay::new();
    let root = crate::utils::padded_box(gtk::Orientation::Vertical, 12, 12);

    let text_view = gtk::TextView::builder()
        .wrap_mode(gtk::WrapMode::Word)
        .monospace(false)
        .build();
    text_view.buffer().set_text(&composition.transcript());
    let scroller = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hexpand(true)
        .child(&text_view)
        .build();
    root.append(&scroller);

    let actions = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    actions.set_halign(gtk::Align::Center);
    let copy_btn = gtk::Button::with_label("Copy All Emails");
    copy_btn.add_css_class("suggested-action");
    let export_btn = gtk::Button::with_label("Export JSON");
    export_btn.set_sensitive(!composition.is_empty());
    actions.append(&copy_btn);
    actions.append(&export_btn);
    root.append(&actions);

    {
        let overlay = overlay.clone();
        let text_view = text_view.clone();
        copy_btn.connect_clicked(move |_| {
            let buffer = text_view.buffer();
            let text = buffer.text(&buffer.start_iter(), &buffer.end_iter(), false);
            text_view.clipboard().set_text(&text);
            toast(&overlay, "All emails copied to clipboard!");
        });
    }
    {
        let overlay = overlay.clone();
        export_btn.connect_clicked(move |_| {
            match composition.export(&session.config.export_dir()) {
                Ok(path) => toast(&overlay, &format!("Saved to {}", path.display())),
                Err(err) => toast(&overlay, &format!("Export failed: {}", err)),
            }
        });
    }

    overlay.set_child(Some(&root));
    let container = crate::utils::with_header("Generated Emails", &overlay);
    window.set_content(Some(&container));
    window.present();
}
