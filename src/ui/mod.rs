pub mod emails;
pub mod enquiry;
pub mod main_window;
pub mod suppliers;
