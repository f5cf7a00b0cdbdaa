//! Supplier contact directory and price-enquiry email generation.
//!
//! [`directory::DirectoryStore`] keeps the contact list, [`template::TemplateStore`]
//! the enquiry text, and [`enquiry::compose`] renders one email per selected
//! contact.

pub mod config;
pub mod directory;
pub mod enquiry;
pub mod error;
pub mod models;
pub mod storage;
pub mod template;

pub use config::AppConfig;
pub use directory::{DirectoryStore, Grouping};
pub use enquiry::{build_product_list, compose, Composition};
pub use error::{Error, Field, Result};
pub use models::{Contact, ContactId, ContactRecord, ProductEntry, RenderedEnquiry};
pub use storage::{CsvFileBackend, DirectoryBackend, MemoryBackend};
pub use template::{EmailTemplate, TemplateStore};
