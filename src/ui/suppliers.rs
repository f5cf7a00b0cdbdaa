use crate::app::Session;
use crate::utils::toast;
use adw::prelude::*;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use steel_enquiry::{Contact, ContactId, ContactRecord, Grouping};

/// Flat list of every contact, supplier group by supplier group.
struct ContactTable {
    list: gtk::ListBox,
    grouping: RefCell<Grouping>,
    rows: RefCell<Vec<ContactId>>,
}

impl ContactTable {
    fn new() -> Self {
        let list = gtk::ListBox::new();
        list.set_selection_mode(gtk::SelectionMode::Single);
        Self {
            list,
            grouping: RefCell::new(Grouping::default()),
            rows: RefCell::new(Vec::new()),
        }
    }

    fn set_grouping(&self, grouping: Grouping) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        let mut rows = Vec::new();
        for contact in grouping.contacts_grouped() {
            let row = gtk::ListBoxRow::new();
            let record = &contact.record;
            row.set_child(Some(&table_line(&record.supplier, &record.contact_name, &record.email)));
            self.list.append(&row);
            rows.push(contact.id);
        }
        *self.rows.borrow_mut() = rows;
        *self.grouping.borrow_mut() = grouping;
    }

    fn selected(&self) -> Option<Contact> {
        let row = self.list.selected_row()?;
        let idx = usize::try_from(row.index()).ok()?;
        let id = *self.rows.borrow().get(idx)?;
        self.grouping.borrow().find(id).cloned()
    }
}

fn table_line(supplier: &str, contact_name: &str, email: &str) -> gtk::Box {
    let line = crate::utils::padded_box(gtk::Orientation::Horizontal, 12, 6);
    for (text, width) in [(supplier, 20), (contact_name, 20), (email, 28)] {
        let lbl = gtk::Label::new(Some(text));
        lbl.set_width_chars(width);
        lbl.set_max_width_chars(width);
        lbl.set_xalign(0.0);
        line.append(&lbl);
    }
    line
}

/// Supplier, contact and email entries laid out as a labelled grid.
#[derive(Clone)]
struct ContactForm {
    grid: gtk::Grid,
    supplier: gtk::Entry,
    contact_name: gtk::Entry,
    email: gtk::Entry,
}

impl ContactForm {
    fn new() -> Self {
        let grid = gtk::Grid::new();
        grid.set_row_spacing(6);
        grid.set_column_spacing(8);
        let supplier = labelled_entry(&grid, 0, "Supplier Name:");
        let contact_name = labelled_entry(&grid, 1, "Contact Name:");
        let email = labelled_entry(&grid, 2, "Email:");
        Self {
            grid,
            supplier,
            contact_name,
            email,
        }
    }

    fn fill(&self, record: &ContactRecord) {
        self.supplier.set_text(&record.supplier);
        self.contact_name.set_text(&record.contact_name);
        self.email.set_text(&record.email);
    }

    fn clear(&self) {
        self.supplier.set_text("");
        self.contact_name.set_text("");
        self.email.set_text("");
    }

    fn record(&self) -> ContactRecord {
        ContactRecord::new(self.supplier.text(), self.contact_name.text(), self.email.text())
    }
}

fn labelled_entry(grid: &gtk::Grid, row: i32, title: &str) -> gtk::Entry {
    let lbl = gtk::Label::new(Some(title));
    lbl.set_xalign(1.0);
    let entry = gtk::Entry::new();
    entry.set_width_chars(40);
    entry.set_hexpand(true);
    grid.attach(&lbl, 0, row, 1, 1);
    grid.attach(&entry, 1, row, 1, 1);
    entry
}

pub fn show_suppliers_window(parent: &impl IsA<gtk::Window>, session: Rc<Session>) {
    let window = adw::Window::builder()
        .transient_for(parent)
        .title("Manage Suppliers")
        .default_width(600)
        .default_height(800)
        .build();

    let overlay = adw::ToastOverlay::new();
    let root = crate::utils::padded_box(gtk::Orientation::Vertical, 12, 12);

    let header_line = table_line("Supplier Name", "Contact Name", "Email");
    header_line.add_css_class("heading");
    root.append(&header_line);

    let table = Rc::new(ContactTable::new());
    let scroller = gtk::ScrolledWindow::builder()
        .vexpand(true)
        .hexpand(true)
        .child(&table.list)
        .build();
    root.append(&scroller);

    match session.directory.load() {
        Ok(grouping) => table.set_grouping(grouping),
        Err(err) => toast(&overlay, &format!("Failed to load suppliers: {}", err)),
    }

    let form_title = gtk::Label::new(Some("Add New Supplier Contact"));
    form_title.add_css_class("title-4");
    form_title.set_halign(gtk::Align::Start);
    root.append(&form_title);

    let form = ContactForm::new();
    root.append(&form.grid);

    let add_btn = gtk::Button::with_label("Add Supplier Contact");
    add_btn.add_css_class("suggested-action");
    add_btn.set_halign(gtk::Align::End);
    root.append(&add_btn);

    let actions = gtk::Box::new(gtk::Orientation::Horizontal, 6);
    actions.set_halign(gtk::Align::Center);
    let edit_btn = gtk::Button::with_label("Edit Supplier Contact");
    let delete_btn = gtk::Button::with_label("Delete Supplier Contact");
    delete_btn.add_css_class("destructive-action");
    actions.append(&edit_btn);
    actions.append(&delete_btn);
    root.append(&actions);

    overlay.set_child(Some(&root));
    let container = crate::utils::with_header("Manage Suppliers", &overlay);
    window.set_content(Some(&container));

    {
        let session = session.clone();
        let table = table.clone();
        let overlay = overlay.clone();
        let form = form.clone();
        add_btn.connect_clicked(move |_| match session.directory.append(&form.record()) {
            Ok(grouping) => {
                table.set_grouping(grouping);
                form.clear();
                toast(&overlay, "Supplier contact added successfully!");
            }
            Err(err) => toast(&overlay, &err.to_string()),
        });
    }
    {
        let window = window.clone();
        let session = session.clone();
        let table = table.clone();
        let overlay = overlay.clone();
        edit_btn.connect_clicked(move |_| edit_selected(&window, &session, &table, &overlay));
    }
    {
        let window = window.clone();
        delete_btn.connect_clicked(move |_| delete_selected(&window, &session, &table, &overlay));
    }

    window.present();
}

fn edit_selected(
    window: &adw::Window,
    session: &Rc<Session>,
    table: &Rc<ContactTable>,
    overlay: &adw::ToastOverlay,
) {
    let Some(contact) = table.selected() else {
        toast(overlay, "Please select a supplier contact to edit");
        return;
    };

    let dialog = gtk::Dialog::builder()
        .title("Edit Supplier")
        .transient_for(window)
        .modal(true)
        .build();
    let form = ContactForm::new();
    form.fill(&contact.record);
    let content = crate::utils::padded_box(gtk::Orientation::Vertical, 12, 12);
    content.append(&form.grid);
    dialog.content_area().append(&content);
    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let save_btn = dialog.add_button("Save", gtk::ResponseType::Ok);
    save_btn.add_css_class("suggested-action");
    dialog.set_default_response(gtk::ResponseType::Ok);

    let session = session.clone();
    let table = table.clone();
    let overlay = overlay.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp == gtk::ResponseType::Ok {
            match session.directory.update_by_id(contact.id, &contact.record, &form.record()) {
                Ok(grouping) => {
                    table.set_grouping(grouping);
                    toast(&overlay, "Supplier contact updated successfully!");
                }
                Err(err) if err.is_validation() => {
                    // leave the dialog open so the field can be fixed
                    toast(&overlay, &err.to_string());
                    return;
                }
                Err(err) => toast(&overlay, &err.to_string()),
            }
        }
        dlg.close();
    });

    dialog.present();
}

fn delete_selected(
    window: &adw::Window,
    session: &Rc<Session>,
    table: &Rc<ContactTable>,
    overlay: &adw::ToastOverlay,
) {
    let Some(contact) = table.selected() else {
        toast(overlay, "Please select a supplier contact to delete");
        return;
    };

    let dialog = gtk::Dialog::builder()
        .title("Confirm")
        .transient_for(window)
        .modal(true)
        .build();
    let content = crate::utils::padded_box(gtk::Orientation::Vertical, 12, 12);
    let question = gtk::Label::new(Some(&format!(
        "Are you sure you want to delete {} from {}?",
        contact.record.label(),
        contact.record.supplier
    )));
    question.set_wrap(true);
    content.append(&question);
    dialog.content_area().append(&content);
    let _ = dialog.add_button("No", gtk::ResponseType::No);
    let yes_btn = dialog.add_button("Yes", gtk::ResponseType::Yes);
    yes_btn.add_css_class("destructive-action");

    let session = session.clone();
    let table = table.clone();
    let overlay = overlay.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp == gtk::ResponseType::Yes {
            match session.directory.delete_by_id(contact.id, &contact.record) {
                Ok(grouping) => {
                    table.set_grouping(grouping);
                    toast(&overlay, "Supplier contact deleted successfully!");
                }
                Err(err) => toast(&overlay, &err.to_string()),
            }
        }
        dlg.close();
    });

    dialog.present();
}
