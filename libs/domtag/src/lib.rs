//! Dom tag abstraction: typed markup nodes that serialize themselves
//! through a small placeholder-substitution protocol.

pub mod indexed;
pub mod meta;
pub mod template;
pub mod view;
pub mod warn;

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use itertools::Itertools;
use kstring::KString;
use lazy_static::lazy_static;
use serde_json::Value;

use crate::{indexed::IndexedMap,
            meta::is_void_element,
            template::{camel_case, CONTAINER_TAG_PROTOTYPE, NON_CONTAINER_TAG_PROTOTYPE},
            view::{TemplateRef, ViewData, ViewEngine}};

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("no template was given and no tag name to build one from")]
    ConfigurationError,
    #[error("value of type {0} is not supported as an attribute")]
    UnsupportedAttributeType(&'static str),
}

/// An attribute value: a plain scalar, or an ordered list whose
/// elements are joined with single spaces when rendered (the way
/// `class` works).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttValue {
    Str(KString),
    List(Vec<KString>),
}

impl AttValue {
    /// Conversion from dynamic (JSON) values. Only scalars and lists
    /// of scalars map to attribute values.
    pub fn from_json(value: &Value) -> Result<AttValue, TagError> {
        match value {
            Value::String(s) => Ok(AttValue::Str(KString::from_ref(s))),
            Value::Number(n) => Ok(AttValue::Str(KString::from_string(n.to_string()))),
            Value::Bool(b) => Ok(AttValue::Str(KString::from_static(if *b {
                "true"
            } else {
                "false"
            }))),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match AttValue::from_json(item)? {
                        AttValue::Str(s) => list.push(s),
                        AttValue::List(_) => {
                            return Err(TagError::UnsupportedAttributeType("nested array"))
                        }
                    }
                }
                Ok(AttValue::List(list))
            }
            Value::Null => Err(TagError::UnsupportedAttributeType("null")),
            Value::Object(_) => Err(TagError::UnsupportedAttributeType("object")),
        }
    }

    pub fn rendered(&self) -> String {
        match self {
            AttValue::Str(s) => s.to_string(),
            AttValue::List(items) => items.iter().join(" "),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttValue::Str(s) => Some(s),
            AttValue::List(_) => None,
        }
    }
}

impl From<&str> for AttValue {
    fn from(s: &str) -> Self {
        AttValue::Str(KString::from_ref(s))
    }
}
impl From<String> for AttValue {
    fn from(s: String) -> Self {
        AttValue::Str(KString::from_string(s))
    }
}
impl From<KString> for AttValue {
    fn from(s: KString) -> Self {
        AttValue::Str(s)
    }
}
impl From<Vec<KString>> for AttValue {
    fn from(items: Vec<KString>) -> Self {
        AttValue::List(items)
    }
}

lazy_static! {
    static ref NEXT_TAG_ID: Mutex<u64> = Mutex::new(0);
}

fn next_tag_id() -> u64 {
    // replace with atomic inc?
    let mut guard = NEXT_TAG_ID.lock().unwrap();
    let id = *guard;
    *guard += 1;
    id
}

/// Delegation of a tag's rendering to an external view engine.
pub struct TemplateOverride {
    pub template: TemplateRef,
    pub engine: Arc<dyn ViewEngine>,
}

/// The state every dom tag carries. Concrete tags embed a `Tag` and
/// expose it through the `DomTag` trait, adding their content hook on
/// top.
pub struct Tag {
    tag_name: KString,
    // Resolved once at construction when not explicitly supplied.
    template: String,
    attributes: IndexedMap<AttValue>,
    is_container: bool,
    print_if_empty: bool,
    // Leaf tags may force the content hook despite not being
    // containers.
    force_content_markup: bool,
    template_override: Option<TemplateOverride>,
    template_data: IndexedMap<Value>,
}

impl Tag {
    pub fn new(tag_name: impl Into<KString>, is_container: bool) -> Tag {
        let tag_name = tag_name.into();
        let prototype = if is_container {
            CONTAINER_TAG_PROTOTYPE
        } else {
            NON_CONTAINER_TAG_PROTOTYPE
        };
        let template = prototype.replace("{tagname}", &tag_name);
        Tag {
            tag_name,
            template,
            attributes: IndexedMap::new(),
            is_container,
            print_if_empty: true,
            force_content_markup: false,
            template_override: None,
            template_data: IndexedMap::new(),
        }
    }

    /// Tag with the default template for its name; container-ness
    /// comes from the void-element table.
    pub fn named(tag_name: impl Into<KString>) -> Tag {
        let tag_name = tag_name.into();
        let is_container = !is_void_element(&tag_name);
        Tag::new(tag_name, is_container)
    }

    /// Tag with an explicitly supplied template.
    pub fn with_template(tag_name: impl Into<KString>, template: impl Into<String>) -> Tag {
        let mut tag = Tag::new(tag_name, true);
        tag.template = template.into();
        tag
    }

    /// Construction from dynamic parts; this is where a missing
    /// template *and* missing tag name surface.
    pub fn build(
        tag_name: Option<KString>,
        template: Option<String>,
        is_container: bool,
    ) -> Result<Tag, TagError> {
        match (tag_name, template) {
            (Some(name), Some(template)) => {
                let mut tag = Tag::new(name, is_container);
                tag.template = template;
                Ok(tag)
            }
            (Some(name), None) => Ok(Tag::new(name, is_container)),
            (None, Some(template)) => {
                let mut tag = Tag::new("", is_container);
                tag.template = template;
                Ok(tag)
            }
            (None, None) => Err(TagError::ConfigurationError),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn is_container(&self) -> bool {
        self.is_container
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn print_if_empty(&self) -> bool {
        self.print_if_empty
    }

    pub fn set_print_if_empty(&mut self, print_if_empty: bool) -> &mut Tag {
        self.print_if_empty = print_if_empty;
        self
    }

    pub fn force_content_markup(&self) -> bool {
        self.force_content_markup
    }

    pub fn set_force_content_markup(&mut self, force: bool) -> &mut Tag {
        self.force_content_markup = force;
        self
    }

    // --- attributes ---------------------------------------------------

    pub fn set_attribute(&mut self, name: impl Into<KString>, value: impl Into<AttValue>) -> &mut Tag {
        self.attributes.set(name, value.into());
        self
    }

    /// Attribute from a dynamic (JSON) value; non-scalar shapes are
    /// rejected.
    pub fn set_attribute_json(
        &mut self,
        name: impl Into<KString>,
        value: &Value,
    ) -> Result<&mut Tag, TagError> {
        let value = AttValue::from_json(value)?;
        self.attributes.set(name, value);
        Ok(self)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttValue> {
        self.attributes.get(name)
    }

    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_str())
    }

    pub fn remove_attribute(&mut self, name: &str) -> &mut Tag {
        self.attributes.remove(name);
        self
    }

    pub fn add_class(&mut self, class: impl Into<KString>) -> &mut Tag {
        match self.attributes.get_mut("class") {
            Some(AttValue::List(items)) => items.push(class.into()),
            Some(AttValue::Str(s)) => {
                // someone set class as a plain scalar earlier
                crate::warn!("converting scalar class attribute of <{}> to a list",
                             self.tag_name);
                let existing = s.clone();
                self.attributes
                    .set("class", AttValue::List(vec![existing, class.into()]));
            }
            None => {
                self.attributes
                    .set("class", AttValue::List(vec![class.into()]));
            }
        }
        self
    }

    pub fn add_classes(&mut self, classes: impl IntoIterator<Item = KString>) -> &mut Tag {
        for class in classes {
            self.add_class(class);
        }
        self
    }

    /// Removal by value lookup; unknown classes are left alone.
    pub fn remove_class(&mut self, class: &str) -> &mut Tag {
        if let Some(AttValue::List(items)) = self.attributes.get_mut("class") {
            if let Some(i) = items.iter().position(|c| c.as_str() == class) {
                items.remove(i);
            }
        }
        self
    }

    pub fn set_id(&mut self, id: impl Into<KString>) -> &mut Tag {
        self.set_attribute("id", id.into())
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute_str("id")
    }

    /// Sets a fresh unique id, unless one is present already.
    pub fn generate_id_if_not_set(&mut self) -> &mut Tag {
        if self.id().is_none() {
            let id = format!("tag-{}", next_tag_id());
            self.set_id(KString::from_string(id));
        }
        self
    }

    /// The rendered attribute string, in insertion order, without the
    /// leading space.
    pub fn attribute_string(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, value.rendered()))
            .join(" ")
    }

    // --- external templates -------------------------------------------

    pub fn set_template_override(
        &mut self,
        template: TemplateRef,
        engine: Arc<dyn ViewEngine>,
    ) -> &mut Tag {
        self.template_override = Some(TemplateOverride { template, engine });
        self
    }

    pub fn clear_template_override(&mut self) -> &mut Tag {
        self.template_override = None;
        self
    }

    pub fn template_override(&self) -> Option<&TemplateOverride> {
        self.template_override.as_ref()
    }

    pub fn set_template_data(&mut self, key: impl Into<KString>, value: Value) -> &mut Tag {
        self.template_data.set(key, value);
        self
    }

    pub fn template_data(&self) -> &IndexedMap<Value> {
        &self.template_data
    }

    pub fn remove_template_data(&mut self, key: &str) -> &mut Tag {
        self.template_data.remove(key);
        self
    }

    /// A `label` is just template data, made available to external
    /// templates.
    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Tag {
        self.set_template_data("label", Value::String(label.into()))
    }

    pub fn label(&self) -> Option<&str> {
        self.template_data.get("label").and_then(|v| v.as_str())
    }
}

pub trait DomTag {
    fn tag(&self) -> &Tag;
    fn tag_mut(&mut self) -> &mut Tag;

    /// The inner markup. Implemented by tags that wrap content; leaf
    /// tags never get asked unless they force it.
    fn content_markup(&self) -> Result<String> {
        bail!("<{}> has no content hook", self.tag().tag_name())
    }

    /// Serialize the tag. The result is entirely determined by
    /// attributes, content and template at the time of the call.
    fn printable(&self) -> Result<String> {
        let tag = self.tag();

        if let Some(over) = tag.template_override() {
            let template_id = over.template.template_id(tag.tag_name());
            let data = ViewData {
                key: KString::from_string(camel_case(tag.tag_name())),
                tag,
                vars: tag.template_data(),
            };
            return over.engine.render(&template_id, &data);
        }

        let attributes = tag.attribute_string();
        let attributes = if attributes.is_empty() {
            String::new()
        } else {
            format!(" {}", attributes)
        };
        let markup = tag
            .template()
            .replace("{tagname}", tag.tag_name())
            .replace("{attributes}", &attributes);

        let content = if tag.is_container() || tag.force_content_markup() {
            self.content_markup()?
        } else {
            String::new()
        };
        if content.is_empty() && !tag.print_if_empty() {
            return Ok(String::new());
        }

        Ok(markup.replace("{content}", &content))
    }
}

// A bare `Tag` is usable as a leaf without a content hook.
impl DomTag for Tag {
    fn tag(&self) -> &Tag {
        self
    }
    fn tag_mut(&mut self) -> &mut Tag {
        self
    }
}
