use crate::error::{Error, Field, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a contact row in the directory at the time it was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(pub usize);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One (supplier, contact name, email) row of the directory.
///
/// The full triple is the record's identity; two identical triples cannot be
/// told apart by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactRecord {
    pub supplier: String,
    pub contact_name: String,
    pub email: String,
}

impl ContactRecord {
    pub fn new(
        supplier: impl Into<String>,
        contact_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            supplier: supplier.into(),
            contact_name: contact_name.into(),
            email: email.into(),
        }
    }

    /// Trims every field and rejects the record if any of them ends up empty.
    pub fn validated(&self) -> Result<Self> {
        let supplier = self.supplier.trim();
        let contact_name = self.contact_name.trim();
        let email = self.email.trim();

        if supplier.is_empty() {
            return Err(Error::Validation(Field::Supplier));
        }
        if contact_name.is_empty() {
            return Err(Error::Validation(Field::ContactName));
        }
        if email.is_empty() {
            return Err(Error::Validation(Field::Email));
        }
        Ok(Self::new(supplier, contact_name, email))
    }

    /// Label used next to selection checkboxes, e.g. `Jo (jo@acme.test)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.contact_name, self.email)
    }
}

/// A directory row together with the position it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub id: ContactId,
    pub record: ContactRecord,
}

/// A raw product row as typed into the enquiry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub description: String,
    pub quantity: String,
    pub unit: String,
    pub last_price: String,
    pub price_unit: String,
}

impl ProductEntry {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
        last_price: impl Into<String>,
        price_unit: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            unit: unit.into(),
            last_price: last_price.into(),
            price_unit: price_unit.into(),
        }
    }

    /// Formats the entry as one product-list line, or `None` when the
    /// description is blank.
    pub fn line(&self) -> Option<String> {
        let description = self.description.trim();
        if description.is_empty() {
            return None;
        }
        let mut line = format!("{} - {} {}", description, self.quantity.trim(), self.unit.trim());
        let last_price = self.last_price.trim();
        if !last_price.is_empty() {
            line.push_str(&format!(
                " - last price paid: £{}/{}",
                last_price,
                self.price_unit.trim()
            ));
        }
        Some(line)
    }
}

/// One enquiry body addressed to a single contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEnquiry {
    pub supplier: String,
    pub contact_name: String,
    pub email: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_trims_fields() {
        let record = ContactRecord::new("  Acme Steel ", "Jo\t", " jo@acme.test");
        let clean = record.validated().unwrap();
        assert_eq!(clean, ContactRecord::new("Acme Steel", "Jo", "jo@acme.test"));
    }

    #[test]
    fn test_validated_rejects_blank_fields() {
        let err = ContactRecord::new("   ", "Jo", "jo@acme.test").validated().unwrap_err();
        assert!(matches!(err, Error::Validation(Field::Supplier)));

        let err = ContactRecord::new("Acme", "", "jo@acme.test").validated().unwrap_err();
        assert!(matches!(err, Error::Validation(Field::ContactName)));

        let err = ContactRecord::new("Acme", "Jo", " ").validated().unwrap_err();
        assert_eq!(err.to_string(), "Email must not be empty");
    }

    #[test]
    fn test_email_is_not_checked_for_syntax() {
        let record = ContactRecord::new("Acme", "Jo", "not an address");
        assert!(record.validated().is_ok());
    }

    #[test]
    fn test_product_line_with_price() {
        let entry = ProductEntry::new("Rebar", "10", "t", "500", "t");
        assert_eq!(entry.line().unwrap(), "Rebar - 10 t - last price paid: £500/t");
    }

    #[test]
    fn test_product_line_without_price() {
        let entry = ProductEntry::new(" Angle 50x50 ", "3", "lengths", "  ", "m");
        assert_eq!(entry.line().unwrap(), "Angle 50x50 - 3 lengths");
    }

    #[test]
    fn test_blank_description_yields_no_line() {
        assert!(ProductEntry::new("", "5", "t", "", "").line().is_none());
        assert!(ProductEntry::new("   ", "5", "t", "100", "t").line().is_none());
    }
}
