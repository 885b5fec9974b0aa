//! Built-in component registrations. Called once at startup by the
//! composition root, which owns the resulting registries; there is one
//! registry per component family.

use crate::{form::Form,
            form_item::{Button, Checkbox, RadioButtonSet, Select, Text, Textarea},
            model_table::ModelTable,
            registry::ComponentRegistry,
            table::Table};

/// Tables: a plain one, and the data-bound one under both of its
/// conventional aliases.
pub fn table_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.provide("domkit::table::Table", |_args| Box::new(Table::new()));
    registry.provide("domkit::model_table::ModelTable", |_args| {
        Box::new(ModelTable::new())
    });
    registry.register("simple", "domkit::table::Table");
    registry.register("model-collection", "domkit::model_table::ModelTable");
    registry.register("model", "domkit::model_table::ModelTable");
    registry
}

pub fn form_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.provide("domkit::form::Form", |_args| Box::new(Form::new()));
    registry.register("simple", "domkit::form::Form");
    registry
}

pub fn form_item_registry() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry.provide("domkit::form_item::Text", |_args| Box::new(Text::new()));
    registry.provide("domkit::form_item::Text::email", |_args| {
        Box::new(Text::email())
    });
    registry.provide("domkit::form_item::Text::number", |_args| {
        Box::new(Text::number())
    });
    registry.provide("domkit::form_item::Text::file", |_args| {
        Box::new(Text::file())
    });
    registry.provide("domkit::form_item::Textarea", |_args| {
        Box::new(Textarea::new())
    });
    registry.provide("domkit::form_item::Select", |_args| Box::new(Select::new()));
    registry.provide("domkit::form_item::Checkbox", |_args| {
        Box::new(Checkbox::new())
    });
    registry.provide("domkit::form_item::RadioButtonSet", |_args| {
        Box::new(RadioButtonSet::new())
    });
    registry.provide("domkit::form_item::Button", |_args| Box::new(Button::plain()));
    registry.provide("domkit::form_item::Button::submit", |_args| {
        Box::new(Button::submit())
    });
    registry.provide("domkit::form_item::Button::reset", |_args| {
        Box::new(Button::reset())
    });

    registry.register("text", "domkit::form_item::Text");
    registry.register("email", "domkit::form_item::Text::email");
    registry.register("number", "domkit::form_item::Text::number");
    registry.register("file", "domkit::form_item::Text::file");
    registry.register("textarea", "domkit::form_item::Textarea");
    registry.register("select", "domkit::form_item::Select");
    registry.register("checkbox", "domkit::form_item::Checkbox");
    registry.register("radio", "domkit::form_item::RadioButtonSet");
    registry.register("button", "domkit::form_item::Button");
    registry.register("submit-button", "domkit::form_item::Button::submit");
    registry.register("reset-button", "domkit::form_item::Button::reset");
    registry
}

#[cfg(test)]
mod tests {
    use domtag::DomTag;

    use super::*;
    use crate::form_item::Text;

    #[test]
    fn t_builtin_aliases_resolve() {
        let tables = table_registry();
        for alias in ["simple", "model-collection", "model"] {
            assert!(tables.factory(alias, &[]).is_ok(), "alias {alias:?}");
        }
        let forms = form_registry();
        assert!(forms.factory("simple", &[]).is_ok());
        let items = form_item_registry();
        for alias in [
            "text",
            "email",
            "number",
            "file",
            "textarea",
            "select",
            "checkbox",
            "radio",
            "button",
            "submit-button",
            "reset-button",
        ] {
            assert!(items.factory(alias, &[]).is_ok(), "alias {alias:?}");
        }
    }

    #[test]
    fn t_model_table_via_factory() {
        use std::sync::Arc;

        use kstring::KString;
        use serde_json::json;

        use crate::model::fixtures::{FixtureEntry, FixtureQuery, FixtureSource};

        let source = FixtureSource::new().table(
            "people",
            vec![Arc::new(FixtureEntry::new("Person", "p").field("name", json!("Ada")))],
        );
        let registry = table_registry();
        let mut component = registry.factory("model", &[]).unwrap();
        let table: &mut ModelTable = component.as_any_mut().downcast_mut().unwrap();
        table
            .set_source(Arc::new(source))
            .set_query(Box::new(FixtureQuery::new("people")))
            .set_columns(vec![KString::from_static("name")])
            .set_headers([(KString::from_static("name"), KString::from_static("Name"))])
            .set_show_head(true);
        assert_eq!(
            component.render().unwrap(),
            "<table><thead><tr><th>Name</th></tr></thead>\
             <tbody><tr><td>Ada</td></tr></tbody></table>"
        );
    }

    #[test]
    fn t_factory_text_is_configurable() {
        let registry = form_item_registry();
        let mut component = registry.factory("text", &[]).unwrap();
        let text: &mut Text = component.as_any_mut().downcast_mut().unwrap();
        text.tag_mut().set_attribute("name", "q");
        assert_eq!(
            component.render().unwrap(),
            "<input type=\"text\" name=\"q\"/>"
        );
    }
}
