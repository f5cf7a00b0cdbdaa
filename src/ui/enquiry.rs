use crate::app::Session;
use crate::utils::toast;
use adw::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use steel_enquiry::{build_product_list, compose, ContactRecord, ProductEntry};

const PRODUCT_COLUMNS: [(&str, i32); 5] = [
    ("Description", 30),
    ("Quantity", 10),
    ("Unit", 10),
    ("Last Price", 10),
    ("Price Unit", 10),
];

struct ProductRow {
    description: gtk::Entry,
    quantity: gtk::Entry,
    unit: gtk::Entry,
    last_price: gtk::Entry,
    price_unit: gtk::Entry,
}

impl ProductRow {
    fn entry(&self) -> ProductEntry {
        ProductEntry::new(
            self.description.text(),
            self.quantity.text(),
            self.unit.text(),
            self.last_price.text(),
            self.price_unit.text(),
        )
    }
}

fn fill_product_grid(grid: &gtk::Grid, count: usize) -> Vec<ProductRow> {
    while let Some(child) = grid.first_child() {
        grid.remove(&child);
    }
    for (col, (title, _)) in PRODUCT_COLUMNS.into_iter().enumerate() {
        let lbl = gtk::Label::new(Some(title));
        lbl.add_css_class("heading");
        grid.attach(&lbl, col as i32, 0, 1, 1);
    }

    (1..=count as i32)
        .map(|row| {
            let cell = |col: usize| {
                let entry = gtk::Entry::new();
                entry.set_width_chars(PRODUCT_COLUMNS[col].1);
                grid.attach(&entry, col as i32, row, 1, 1);
                entry
            };
            ProductRow {
                description: cell(0),
                quantity: cell(1),
                unit: cell(2),
                last_price: cell(3),
                price_unit: cell(4),
            }
        })
        .collect()
}

pub fn show_enquiry_window(parent: &impl IsA<gtk::Window>, session: Rc<Session>) {
    let window = adw::Window::builder()
        .transient_for(parent)
        .title("New Enquiry")
        .default_width(1000)
        .default_height(800)
        .build();

    let overlay = adw::ToastOverlay::new();
    let root = crate::utils::padded_box(gtk::Orientation::Vertical, 12, 12);

    // Number of products
    let count_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    count_row.append(&gtk::Label::new(Some("Number of Products:")));
    let count_spin = gtk::SpinButton::with_range(1.0, 100.0, 1.0);
    count_spin.set_value(session.config.product_rows.max(1) as f64);
    count_row.append(&count_spin);
    let update_btn = gtk::Button::with_label("Update Products");
    count_row.append(&update_btn);
    root.append(&count_row);

    let products_frame = gtk::Frame::new(Some("Products"));
    let products_grid = gtk::Grid::new();
    products_grid.set_row_spacing(6);
    products_grid.set_column_spacing(6);
    products_grid.set_margin_top(6);
    products_grid.set_margin_bottom(6);
    products_grid.set_margin_start(6);
    products_grid.set_margin_end(6);
    products_frame.set_child(Some(&products_grid));
    root.append(&products_frame);

    let product_rows = Rc::new(RefCell::new(fill_product_grid(
        &products_grid,
        count_spin.value_as_int().max(1) as usize,
    )));
    {
        let product_rows = product_rows.clone();
        let products_grid = products_grid.clone();
        let count_spin = count_spin.clone();
        update_btn.connect_clicked(move |_| {
            let count = count_spin.value_as_int().max(1) as usize;
            *product_rows.borrow_mut() = fill_product_grid(&products_grid, count);
        });
    }

    // Supplier selection
    let suppliers_frame = gtk::Frame::new(Some("Select Suppliers"));
    let suppliers_box = crate::utils::padded_box(gtk::Orientation::Vertical, 4, 6);
    suppliers_frame.set_child(Some(&suppliers_box));
    root.append(&suppliers_frame);

    let mut choices: Vec<(gtk::CheckButton, ContactRecord)> = Vec::new();
    match session.directory.load() {
        Ok(grouping) if grouping.is_empty() => {
            suppliers_box.append(&gtk::Label::new(Some("No supplier contacts yet.")));
        }
        Ok(grouping) => {
            for (supplier, contacts) in grouping.iter() {
                let heading = gtk::Label::new(Some(supplier));
                heading.add_css_class("heading");
                heading.set_halign(gtk::Align::Start);
                suppliers_box.append(&heading);
                for contact in contacts {
                    let check = gtk::CheckButton::with_label(&contact.record.label());
                    check.set_margin_start(15);
                    suppliers_box.append(&check);
                    choices.push((check, contact.record.clone()));
                }
            }
        }
        Err(err) => toast(&overlay, &format!("Failed to load suppliers: {}", err)),
    }

    let generate_btn = gtk::Button::with_label("Generate Emails");
    generate_btn.add_css_class("suggested-action");
    generate_btn.set_halign(gtk::Align::Center);
    root.append(&generate_btn);

    {
        let window = window.clone();
        let overlay = overlay.clone();
        generate_btn.connect_clicked(move |_| {
            let entries: Vec<ProductEntry> = product_rows.borrow().iter().map(ProductRow::entry).collect();
            let lines = build_product_list(&entries);
            let selected: Vec<ContactRecord> = choices
                .iter()
                .filter(|(check, _)| check.is_active())
                .map(|(_, record)| record.clone())
                .collect();
            let template = match session.templates.load() {
                Ok(template) => template,
                Err(err) => {
                    toast(&overlay, &err.to_string());
                    return;
                }
            };
            let composition = compose(&template, &lines, &selected);
            crate::ui::emails::show_emails_window(&window, session.clone(), composition);
        });
    }

    let scroller = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hexpand(true)
        .child(&root)
        .build();
    overlay.set_child(Some(&scroller));
    let container = crate::utils::with_header("New Enquiry", &overlay);
    window.set_content(Some(&container));
    window.present();
}
