//! The `<form>` container: an ordered, alias-indexed set of form
//! items.

use std::sync::Arc;

use anyhow::Result;
use kstring::KString;

use domtag::{indexed::IndexedMap, view::{TemplateRef, ViewEngine}, DomTag, Tag};

use crate::{form_item::FormItem, registry::Component};

pub struct Form {
    tag: Tag,
    items: IndexedMap<Box<dyn FormItem>>,
    // Propagated to the items just before they render.
    template_directory: Option<(KString, Arc<dyn ViewEngine>)>,
}

impl Form {
    pub fn new() -> Form {
        Form {
            tag: Tag::new("form", true),
            items: IndexedMap::new(),
            template_directory: None,
        }
    }

    pub fn set_method(&mut self, method: impl Into<KString>) -> &mut Form {
        self.tag.set_attribute("method", method.into());
        self
    }

    pub fn set_action(&mut self, action: impl Into<KString>) -> &mut Form {
        self.tag.set_attribute("action", action.into());
        self
    }

    /// Items are indexed by their alias; an item without one gets a
    /// positional alias.
    pub fn add_item(&mut self, item: Box<dyn FormItem>) -> &mut Form {
        let alias = item
            .alias()
            .map(KString::from_ref)
            .unwrap_or_else(|| KString::from_string(self.items.len().to_string()));
        self.items.set(alias, item);
        self
    }

    pub fn item(&self, alias: &str) -> Option<&dyn FormItem> {
        self.items.get(alias).map(|item| item.as_ref())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// All items (and the form itself) render through external
    /// templates below this directory.
    pub fn set_template_directory(
        &mut self,
        directory: impl Into<KString>,
        engine: Arc<dyn ViewEngine>,
    ) -> &mut Form {
        let directory = directory.into();
        self.tag
            .set_template_override(TemplateRef::new(directory.clone()), engine.clone());
        self.template_directory = Some((directory, engine));
        self
    }

    fn propagate_template_directory(&mut self) {
        if let Some((directory, engine)) = &self.template_directory {
            for item in self.items.values_mut() {
                item.tag_mut()
                    .set_template_override(TemplateRef::new(directory.clone()), engine.clone());
            }
        }
    }

    fn stringify_items(&self) -> Result<String> {
        let mut out = String::new();
        for item in self.items.values() {
            out.push_str(&item.printable()?);
        }
        Ok(out)
    }
}

impl Default for Form {
    fn default() -> Self {
        Form::new()
    }
}

impl DomTag for Form {
    fn tag(&self) -> &Tag {
        &self.tag
    }
    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }
    fn content_markup(&self) -> Result<String> {
        self.stringify_items()
    }
}

impl Component for Form {
    fn render(&mut self) -> Result<String> {
        self.propagate_template_directory();
        self.printable()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use domtag::view::ViewData;

    use super::*;
    use crate::form_item::{Button, Text};

    #[test]
    fn t_form_renders_items_in_order() {
        let mut form = Form::new();
        form.set_method("post").set_action("/save");
        let mut name = Text::new();
        name.set_alias("name");
        name.set_name("name");
        form.add_item(Box::new(name));
        let mut save = Button::submit();
        save.set_value("Save");
        form.add_item(Box::new(save));
        assert_eq!(
            form.render().unwrap(),
            "<form method=\"post\" action=\"/save\">\
             <input type=\"text\" name=\"name\"/>\
             <button type=\"submit\">Save</button></form>"
        );
    }

    #[test]
    fn t_auto_alias_is_positional() {
        let mut form = Form::new();
        form.add_item(Box::new(Text::new()));
        form.add_item(Box::new(Text::email()));
        assert_eq!(form.item_count(), 2);
        assert!(form.item("0").is_some());
        assert!(form.item("1").is_some());
    }

    #[test]
    fn t_aliased_item_replaces_same_alias() {
        let mut form = Form::new();
        let mut a = Text::new();
        a.set_alias("field");
        form.add_item(Box::new(a));
        let mut b = Text::email();
        b.set_alias("field");
        form.add_item(Box::new(b));
        assert_eq!(form.item_count(), 1);
    }

    struct RecordingEngine;

    impl ViewEngine for RecordingEngine {
        fn render(&self, template_id: &str, data: &ViewData) -> Result<String> {
            Ok(format!("{{{} as {}}}", template_id, data.key))
        }
    }

    #[test]
    fn t_template_directory_propagates_to_items() {
        let mut form = Form::new();
        let mut name = Text::new();
        name.set_alias("name");
        form.add_item(Box::new(name));
        form.set_template_directory("admin.forms", Arc::new(RecordingEngine));
        assert_eq!(form.render().unwrap(), "{admin.forms.form as form}");
    }

    struct FailingEngine;

    impl ViewEngine for FailingEngine {
        fn render(&self, template_id: &str, _data: &ViewData) -> Result<String> {
            anyhow::bail!("template {template_id:?} does not exist")
        }
    }

    #[test]
    fn t_item_render_failure_aborts_the_form() {
        // No partial markup comes back when a child fails.
        let mut form = Form::new();
        form.add_item(Box::new(Text::new()));
        form.set_template_directory("missing.dir", Arc::new(FailingEngine));
        form.tag_mut().clear_template_override();
        assert!(form.render().is_err());
    }

    #[test]
    fn t_items_use_directory_templates_when_form_does_not() {
        // Propagation also happens when only the items should render
        // through templates: clear the form's own override afterwards.
        let mut form = Form::new();
        let mut name = Text::new();
        name.set_alias("name");
        form.add_item(Box::new(name));
        form.set_template_directory("admin.forms", Arc::new(RecordingEngine));
        form.tag_mut().clear_template_override();
        assert_eq!(
            form.render().unwrap(),
            "<form>{admin.forms.input as input}</form>"
        );
    }
}
