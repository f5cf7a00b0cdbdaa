//! Turning product rows and a contact selection into enquiry emails.

use crate::error::Result;
use crate::models::{ContactRecord, ProductEntry, RenderedEnquiry};
use crate::storage::write_atomic;
use crate::template::EmailTemplate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Product-list lines for every entry that has a description, in input order.
pub fn build_product_list<'a>(entries: impl IntoIterator<Item = &'a ProductEntry>) -> Vec<String> {
    entries.into_iter().filter_map(ProductEntry::line).collect()
}

/// Renders one enquiry per selected contact, in selection order.
///
/// Duplicate selections yield duplicate emails.
pub fn compose(
    template: &EmailTemplate,
    product_lines: &[String],
    selected: &[ContactRecord],
) -> Composition {
    let product_list = product_lines.join("\n");
    let mut composition = Composition::default();
    for contact in selected {
        composition.emails.push(RenderedEnquiry {
            supplier: contact.supplier.clone(),
            contact_name: contact.contact_name.clone(),
            email: contact.email.clone(),
            body: template.render(&contact.contact_name, &product_list),
        });
        composition.audit.push(audit_line(contact));
    }
    log::info!("composed {} enquiry email(s)", composition.emails.len());
    composition
}

fn audit_line(contact: &ContactRecord) -> String {
    format!("{} ({}) - {}", contact.contact_name, contact.email, contact.supplier)
}

/// Output of one composition run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub emails: Vec<RenderedEnquiry>,
    pub audit: Vec<String>,
}

impl Composition {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Plain-text rendering of every email followed by the contact list.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for email in &self.emails {
            out.push_str(&format!(
                "--- Email to {} from {} ---\n",
                email.contact_name, email.supplier
            ));
            out.push_str(&email.body);
            out.push_str("\n\n");
        }
        out.push_str("\n--- Contacts Included ---\n");
        for line in &self.audit {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the composition as JSON into `dir` and returns the file path.
    ///
    /// Files are named `enquiry-<unix millis>.json`; a `-<n>` suffix is added
    /// when that name is already taken so earlier exports are never replaced.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut path = dir.join(format!("enquiry-{}.json", millis));
        let mut n = 1;
        while path.exists() {
            path = dir.join(format!("enquiry-{}-{}.json", millis, n));
            n += 1;
        }
        write_atomic(&path, self.to_json()?.as_bytes())?;
        log::info!("exported {} enquiry email(s) to {}", self.emails.len(), path.display());
        Ok(path)
    }
}
