//! Seam to an external view/template engine.

use anyhow::Result;
use kstring::KString;
use serde_json::Value;

use crate::{indexed::IndexedMap, Tag};

/// Identifier parts of an external template. The engine sees them
/// joined with a dot, directory first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    pub directory: KString,
    pub file_name: Option<KString>,
}

impl TemplateRef {
    pub fn new(directory: impl Into<KString>) -> TemplateRef {
        TemplateRef { directory: directory.into(), file_name: None }
    }

    pub fn with_file_name(directory: impl Into<KString>, file_name: impl Into<KString>) -> TemplateRef {
        TemplateRef {
            directory: directory.into(),
            file_name: Some(file_name.into()),
        }
    }

    /// The file name falls back to the tag's name when not given.
    pub fn template_id(&self, default_name: &str) -> String {
        format!(
            "{}.{}",
            self.directory,
            self.file_name.as_deref().unwrap_or(default_name)
        )
    }
}

/// What a view engine gets to work with: the tag itself under `key`
/// (the camel-cased tag name), plus the template data the tag was
/// configured with.
pub struct ViewData<'a> {
    pub key: KString,
    pub tag: &'a Tag,
    pub vars: &'a IndexedMap<Value>,
}

pub trait ViewEngine: Send + Sync {
    /// Fails if `template_id` does not resolve to an existing
    /// template; the failure aborts the enclosing render.
    fn render(&self, template_id: &str, data: &ViewData) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_template_id() {
        let t = TemplateRef::new("admin.forms");
        assert_eq!(t.template_id("select"), "admin.forms.select");
        let t = TemplateRef::with_file_name("admin.forms", "checkbox");
        assert_eq!(t.template_id("input"), "admin.forms.checkbox");
    }
}
