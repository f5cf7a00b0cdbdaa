use crate::error::{Error, Result};
use crate::storage::write_atomic;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONTACT_NAME_TOKEN: &str = "[contact_name]";
pub const PRODUCT_LIST_TOKEN: &str = "[product_list]";

pub const DEFAULT_TEMPLATE: &str = "Hi [contact_name],

I hope you're well. I'm emailing to enquire on prices for the following products:


[product_list]


Many thanks,
YOUR NAME";

/// Enquiry email text containing literal placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    text: String,
}

impl EmailTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitutes every occurrence of both tokens in one left-to-right scan.
    ///
    /// Substituted values are copied verbatim and never rescanned. Anything
    /// else in square brackets is passed through untouched.
    pub fn render(&self, contact_name: &str, product_list: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + product_list.len());
        let mut rest = self.text.as_str();
        while let Some(start) = rest.find('[') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(CONTACT_NAME_TOKEN) {
                out.push_str(contact_name);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(PRODUCT_LIST_TOKEN) {
                out.push_str(product_list);
                rest = after;
            } else {
                out.push('[');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }

    /// Recognized tokens that do not appear in the text.
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        [CONTACT_NAME_TOKEN, PRODUCT_LIST_TOKEN]
            .into_iter()
            .filter(|token| !self.text.contains(token))
            .collect()
    }
}

impl Default for EmailTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// The template file on disk.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ensure_default_exists(&self) -> Result<()> {
        if !self.path.exists() {
            log::info!("writing default email template to {}", self.path.display());
            write_atomic(&self.path, DEFAULT_TEMPLATE.as_bytes())?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<EmailTemplate> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| Error::StorageRead(format!("{}: {}", self.path.display(), e)))?;
        let template = EmailTemplate::new(text);
        let missing = template.missing_tokens();
        if !missing.is_empty() {
            log::warn!("email template has no {}", missing.join(" or "));
        }
        Ok(template)
    }

    pub fn save(&self, template: &EmailTemplate) -> Result<()> {
        write_atomic(&self.path, template.text().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let template = EmailTemplate::new("Hi [contact_name], see [product_list]. Thanks [contact_name]");
        assert_eq!(template.render("Jo", "A\nB"), "Hi Jo, see A\nB. Thanks Jo");
    }

    #[test]
    fn test_render_passes_other_brackets_through() {
        let template = EmailTemplate::new("Dear [contact_name] [sender] [product_list");
        assert_eq!(template.render("Jo", "A"), "Dear Jo [sender] [product_list");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let template = EmailTemplate::new("Hi [contact_name],\n[product_list]");
        assert_eq!(
            template.render("[product_list]", "Rebar [contact_name]"),
            "Hi [product_list],\nRebar [contact_name]"
        );
    }

    #[test]
    fn test_render_handles_nested_brackets() {
        let template = EmailTemplate::new("[[contact_name]] [[product_list]");
        assert_eq!(template.render("Jo", "A"), "[Jo] [A");
    }

    #[test]
    fn test_render_without_tokens() {
        let template = EmailTemplate::new("Static text");
        assert_eq!(template.render("Jo", "A"), "Static text");
        assert_eq!(template.missing_tokens(), vec![CONTACT_NAME_TOKEN, PRODUCT_LIST_TOKEN]);
    }

    #[test]
    fn test_default_template_has_both_tokens() {
        let template = EmailTemplate::default();
        assert!(template.missing_tokens().is_empty());
        assert!(template.text().ends_with("Many thanks,\nYOUR NAME"));

        let body = template.render("Jo", "Rebar - 10 t");
        assert!(body.starts_with("Hi Jo,\n"));
        assert!(body.contains("\nRebar - 10 t\n"));
    }
}
