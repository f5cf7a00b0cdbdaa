use crate::app::Session;
use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use std::rc::Rc;

pub fn show_main_window(app: &Application, session: Rc<Session>) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Steel Product Enquiry Manager")
        .default_width(800)
        .default_height(600)
        .build();

    let root = crate::utils::padded_box(gtk::Orientation::Vertical, 12, 24);
    root.set_valign(gtk::Align::Center);
    root.set_halign(gtk::Align::Center);

    let manage_btn = gtk::Button::with_label("Manage Suppliers");
    let enquiry_btn = gtk::Button::with_label("New Enquiry");
    enquiry_btn.add_css_class("suggested-action");
    root.append(&manage_btn);
    root.append(&enquiry_btn);

    {
        let window = window.clone();
        let session = session.clone();
        manage_btn.connect_clicked(move |_| {
            crate::ui::suppliers::show_suppliers_window(&window, session.clone());
        });
    }
    {
        let window = window.clone();
        let session = session.clone();
        enquiry_btn.connect_clicked(move |_| {
            crate::ui::enquiry::show_enquiry_window(&window, session.clone());
        });
    }

    let container = crate::utils::with_header("Steel Enquiry", &root);
    window.set_content(Some(&container));
    window.present();
}

/// Shown instead of the main window when the data files cannot be prepared.
pub fn show_startup_error(app: &Application, err: &steel_enquiry::Error) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Steel Product Enquiry Manager")
        .default_width(520)
        .default_height(320)
        .build();

    let status = adw::StatusPage::builder()
        .icon_name("dialog-error-symbolic")
        .title("Could not open supplier data")
        .description(err.to_string())
        .vexpand(true)
        .build();

    let container = crate::utils::with_header("Steel Enquiry", &status);
    window.set_content(Some(&container));
    window.present();
}
