//! The form-item tag variants: inputs, textarea, select, checkbox,
//! radio sets, buttons.

use anyhow::Result;
use kstring::KString;
use strum_macros::Display;

use domtag::{indexed::IndexedMap, DomTag, Tag};

use crate::registry::Component;

/// State shared by all form items: the tag plus the alias under which
/// a form references the item.
pub struct FormItemCore {
    tag: Tag,
    alias: Option<KString>,
}

impl FormItemCore {
    fn new(tag: Tag) -> FormItemCore {
        FormItemCore { tag, alias: None }
    }
}

pub trait FormItem: DomTag {
    fn core(&self) -> &FormItemCore;
    fn core_mut(&mut self) -> &mut FormItemCore;

    fn set_alias(&mut self, alias: impl Into<KString>) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().alias = Some(alias.into());
        self
    }

    fn alias(&self) -> Option<&str> {
        self.core().alias.as_deref()
    }

    fn set_name(&mut self, name: impl Into<KString>) -> &mut Self
    where
        Self: Sized,
    {
        self.tag_mut().set_attribute("name", name.into());
        self
    }

    fn name(&self) -> Option<&str> {
        self.tag().attribute_str("name")
    }

    fn set_required(&mut self, required: bool) -> &mut Self
    where
        Self: Sized,
    {
        if required {
            self.tag_mut().set_attribute("required", "required");
        } else {
            self.tag_mut().remove_attribute("required");
        }
        self
    }

    fn required(&self) -> bool {
        self.tag().attribute("required").is_some()
    }
}

// The DomTag plumbing is the same for every item; the content hook is
// not, so it stays out of here.
macro_rules! impl_form_item {
    ($type:ident) => {
        impl DomTag for $type {
            fn tag(&self) -> &Tag {
                &self.core.tag
            }
            fn tag_mut(&mut self) -> &mut Tag {
                &mut self.core.tag
            }
            fn content_markup(&self) -> Result<String> {
                $type::content_markup_(self)
            }
        }

        impl FormItem for $type {
            fn core(&self) -> &FormItemCore {
                &self.core
            }
            fn core_mut(&mut self) -> &mut FormItemCore {
                &mut self.core
            }
        }

        impl Component for $type {
            fn render(&mut self) -> Result<String> {
                self.printable()
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        impl Default for $type {
            fn default() -> Self {
                $type::new()
            }
        }
    };
}

// --- text-like inputs -------------------------------------------------

/// `<input/>` with a `type` fixed per constructor.
pub struct Text {
    core: FormItemCore,
}

impl Text {
    pub fn new() -> Text {
        Text::with_input_type("text")
    }

    pub fn email() -> Text {
        Text::with_input_type("email")
    }

    pub fn number() -> Text {
        Text::with_input_type("number")
    }

    pub fn file() -> Text {
        Text::with_input_type("file")
    }

    fn with_input_type(input_type: &'static str) -> Text {
        let mut tag = Tag::new("input", false);
        tag.set_attribute("type", input_type);
        Text { core: FormItemCore::new(tag) }
    }

    pub fn set_value(&mut self, value: impl Into<KString>) -> &mut Text {
        self.core.tag.set_attribute("value", value.into());
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.core.tag.attribute_str("value")
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<KString>) -> &mut Text {
        self.core.tag.set_attribute("placeholder", placeholder.into());
        self
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.core.tag.attribute_str("placeholder")
    }

    // leaf; never asked for content
    fn content_markup_(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl_form_item!(Text);

/// `<input type="checkbox"/>`.
pub struct Checkbox {
    core: FormItemCore,
}

impl Checkbox {
    pub fn new() -> Checkbox {
        let mut tag = Tag::new("input", false);
        tag.set_attribute("type", "checkbox");
        Checkbox { core: FormItemCore::new(tag) }
    }

    pub fn set_value(&mut self, value: impl Into<KString>) -> &mut Checkbox {
        self.core.tag.set_attribute("value", value.into());
        self
    }

    pub fn set_checked(&mut self, checked: bool) -> &mut Checkbox {
        if checked {
            self.core.tag.set_attribute("checked", "checked");
        } else {
            self.core.tag.remove_attribute("checked");
        }
        self
    }

    pub fn checked(&self) -> bool {
        self.core.tag.attribute("checked").is_some()
    }

    fn content_markup_(&self) -> Result<String> {
        Ok(String::new())
    }
}

impl_form_item!(Checkbox);

// --- textarea ---------------------------------------------------------

pub struct Textarea {
    core: FormItemCore,
    value: String,
}

impl Textarea {
    pub fn new() -> Textarea {
        Textarea {
            core: FormItemCore::new(Tag::new("textarea", true)),
            value: String::new(),
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> &mut Textarea {
        self.value = value.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn content_markup_(&self) -> Result<String> {
        Ok(self.value.clone())
    }
}

impl_form_item!(Textarea);

// --- select -----------------------------------------------------------

/// `<option>`: value attribute, label content, selected flag.
pub struct OptionItem {
    core: FormItemCore,
    label: KString,
}

impl OptionItem {
    pub fn new() -> OptionItem {
        OptionItem {
            core: FormItemCore::new(Tag::new("option", true)),
            label: KString::from_static(""),
        }
    }

    pub fn set_value(&mut self, value: impl Into<KString>) -> &mut OptionItem {
        self.core.tag.set_attribute("value", value.into());
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.core.tag.attribute_str("value")
    }

    pub fn set_label(&mut self, label: impl Into<KString>) -> &mut OptionItem {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_selected(&mut self, selected: bool) -> &mut OptionItem {
        if selected {
            self.core.tag.set_attribute("selected", "selected");
        } else {
            self.core.tag.remove_attribute("selected");
        }
        self
    }

    pub fn selected(&self) -> bool {
        self.core.tag.attribute("selected").is_some()
    }

    fn content_markup_(&self) -> Result<String> {
        Ok(self.label.to_string())
    }
}

impl_form_item!(OptionItem);

/// Current value of a select: a single choice, or several for a
/// multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectValue {
    One(KString),
    Many(Vec<KString>),
}

impl SelectValue {
    fn matches(&self, key: &str) -> bool {
        match self {
            SelectValue::One(v) => v.as_str() == key,
            SelectValue::Many(vs) => vs.iter().any(|v| v.as_str() == key),
        }
    }
}

pub struct Select {
    core: FormItemCore,
    options: IndexedMap<OptionItem>,
    value: Option<SelectValue>,
}

impl Select {
    pub fn new() -> Select {
        Select {
            core: FormItemCore::new(Tag::new("select", true)),
            options: IndexedMap::new(),
            value: None,
        }
    }

    pub fn set_value(&mut self, value: SelectValue) -> &mut Select {
        self.value = Some(value);
        self
    }

    pub fn value(&self) -> Option<&SelectValue> {
        self.value.as_ref()
    }

    /// Builds one option per `(value, label)` pair. The option whose
    /// key matches the current value is marked selected; a list-valued
    /// field selects every contained key and makes the select a
    /// `multiple` one.
    pub fn set_options(
        &mut self,
        options: impl IntoIterator<Item = (KString, KString)>,
    ) -> &mut Select {
        self.options.clear();
        for (key, label) in options {
            let mut option = OptionItem::new();
            option.set_value(key.clone());
            option.set_label(label);
            if let Some(value) = &self.value {
                if value.matches(&key) {
                    option.set_selected(true);
                }
            }
            self.options.set(key, option);
        }
        if let Some(SelectValue::Many(_)) = &self.value {
            self.core.tag.set_attribute("multiple", "multiple");
        }
        self
    }

    /// Fully-formed options are used as-is, keyed by their value.
    pub fn set_option_items(
        &mut self,
        options: impl IntoIterator<Item = OptionItem>,
    ) -> &mut Select {
        self.options.clear();
        for option in options {
            let key = option
                .value()
                .map(KString::from_ref)
                .unwrap_or_else(|| KString::from_static(""));
            self.options.set(key, option);
        }
        self
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionItem> {
        self.options.values()
    }

    fn content_markup_(&self) -> Result<String> {
        let mut out = String::new();
        for option in self.options.values() {
            out.push_str(&option.printable()?);
        }
        Ok(out)
    }
}

impl_form_item!(Select);

// --- radio buttons ----------------------------------------------------

/// A single label-wrapped radio input.
pub struct RadioButton {
    core: FormItemCore,
    label: KString,
}

impl RadioButton {
    pub fn new() -> RadioButton {
        RadioButton {
            core: FormItemCore::new(Tag::with_template(
                "input",
                "<label><input type=\"radio\"{attributes} /> {content}</label>",
            )),
            label: KString::from_static(""),
        }
    }

    pub fn set_value(&mut self, value: impl Into<KString>) -> &mut RadioButton {
        self.core.tag.set_attribute("value", value.into());
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.core.tag.attribute_str("value")
    }

    pub fn set_label(&mut self, label: impl Into<KString>) -> &mut RadioButton {
        self.label = label.into();
        self
    }

    pub fn set_checked(&mut self, checked: bool) -> &mut RadioButton {
        if checked {
            self.core.tag.set_attribute("checked", "checked");
        } else {
            self.core.tag.remove_attribute("checked");
        }
        self
    }

    pub fn checked(&self) -> bool {
        self.core.tag.attribute("checked").is_some()
    }

    fn content_markup_(&self) -> Result<String> {
        Ok(self.label.to_string())
    }
}

impl_form_item!(RadioButton);

/// A group of radio buttons sharing one field name; renders as its
/// buttons only, there is no wrapping element.
pub struct RadioButtonSet {
    core: FormItemCore,
    options: IndexedMap<RadioButton>,
    value: Option<KString>,
}

impl RadioButtonSet {
    pub fn new() -> RadioButtonSet {
        let mut tag = Tag::with_template("radio-button-set", "{content}");
        tag.set_force_content_markup(true);
        RadioButtonSet {
            core: FormItemCore::new(tag),
            options: IndexedMap::new(),
            value: None,
        }
    }

    pub fn set_value(&mut self, value: impl Into<KString>) -> &mut RadioButtonSet {
        self.value = Some(value.into());
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Builds one radio button per `(value, label)` pair; all buttons
    /// share the set's field name, and the one whose key equals the
    /// current value is checked.
    pub fn set_options(
        &mut self,
        options: impl IntoIterator<Item = (KString, KString)>,
    ) -> &mut RadioButtonSet {
        let name = self.name().map(KString::from_ref);
        self.options.clear();
        for (key, label) in options {
            let mut button = RadioButton::new();
            button.set_value(key.clone());
            button.set_label(label);
            if let Some(name) = &name {
                button.set_name(name.clone());
            }
            if self.value.as_deref() == Some(key.as_str()) {
                button.set_checked(true);
            }
            self.options.set(key, button);
        }
        self
    }

    /// Fully-formed buttons are used as-is, keyed by their value.
    pub fn set_option_items(
        &mut self,
        options: impl IntoIterator<Item = RadioButton>,
    ) -> &mut RadioButtonSet {
        self.options.clear();
        for button in options {
            let key = button
                .value()
                .map(KString::from_ref)
                .unwrap_or_else(|| KString::from_static(""));
            self.options.set(key, button);
        }
        self
    }

    pub fn options(&self) -> impl Iterator<Item = &RadioButton> {
        self.options.values()
    }

    fn content_markup_(&self) -> Result<String> {
        let mut out = String::new();
        for button in self.options.values() {
            out.push_str(&button.printable()?);
        }
        Ok(out)
    }
}

impl_form_item!(RadioButtonSet);

// --- buttons ----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ButtonKind {
    #[strum(serialize = "submit")]
    Submit,
    #[strum(serialize = "reset")]
    Reset,
    #[strum(serialize = "button")]
    Plain,
}

/// `<button type="...">`; the optional value doubles as the label.
pub struct Button {
    core: FormItemCore,
    kind: ButtonKind,
    value: Option<KString>,
}

impl Button {
    pub fn new(kind: ButtonKind) -> Button {
        let mut tag = Tag::new("button", true);
        tag.set_attribute("type", kind.to_string());
        Button {
            core: FormItemCore::new(tag),
            kind,
            value: None,
        }
    }

    pub fn submit() -> Button {
        Button::new(ButtonKind::Submit)
    }

    pub fn reset() -> Button {
        Button::new(ButtonKind::Reset)
    }

    pub fn plain() -> Button {
        Button::new(ButtonKind::Plain)
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn set_value(&mut self, value: impl Into<KString>) -> &mut Button {
        self.value = Some(value.into());
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn content_markup_(&self) -> Result<String> {
        Ok(self.value.clone().map(|v| v.to_string()).unwrap_or_default())
    }
}

impl Default for Button {
    fn default() -> Self {
        Button::plain()
    }
}

impl DomTag for Button {
    fn tag(&self) -> &Tag {
        &self.core.tag
    }
    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.core.tag
    }
    fn content_markup(&self) -> Result<String> {
        Button::content_markup_(self)
    }
}

impl FormItem for Button {
    fn core(&self) -> &FormItemCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut FormItemCore {
        &mut self.core
    }
}

impl Component for Button {
    fn render(&mut self) -> Result<String> {
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
    use super::*;

    fn ks(s: &str) -> KString {
        KString::from_ref(s)
    }

    #[test]
    fn t_text_input() {
        let mut text = Text::new();
        text.set_name("q");
        text.set_value("hello");
        text.set_placeholder("Search");
        assert_eq!(
            text.printable().unwrap(),
            "<input type=\"text\" name=\"q\" value=\"hello\" placeholder=\"Search\"/>"
        );
    }

    #[test]
    fn t_email_and_number_inputs() {
        assert_eq!(Text::email().printable().unwrap(), "<input type=\"email\"/>");
        assert_eq!(Text::number().printable().unwrap(), "<input type=\"number\"/>");
        assert_eq!(Text::file().printable().unwrap(), "<input type=\"file\"/>");
    }

    #[test]
    fn t_required_attribute() {
        let mut text = Text::new();
        text.set_required(true);
        assert!(text.printable().unwrap().contains("required=\"required\""));
        text.set_required(false);
        assert!(!text.printable().unwrap().contains("required"));
    }

    #[test]
    fn t_checkbox_checked() {
        let mut cb = Checkbox::new();
        cb.set_name("agree");
        cb.set_checked(true);
        assert_eq!(
            cb.printable().unwrap(),
            "<input type=\"checkbox\" name=\"agree\" checked=\"checked\"/>"
        );
        cb.set_checked(false);
        assert!(!cb.printable().unwrap().contains("checked"));
    }

    #[test]
    fn t_textarea_value_is_content() {
        let mut ta = Textarea::new();
        ta.set_name("bio");
        ta.set_value("some text");
        assert_eq!(
            ta.printable().unwrap(),
            "<textarea name=\"bio\">some text</textarea>"
        );
    }

    #[test]
    fn t_select_marks_matching_option() {
        let mut select = Select::new();
        select.set_value(SelectValue::One(ks("2")));
        select.set_options([(ks("1"), ks("One")), (ks("2"), ks("Two"))]);
        let selected: Vec<bool> = select.options().map(|o| o.selected()).collect();
        assert_eq!(selected, vec![false, true]);
        assert_eq!(
            select.printable().unwrap(),
            "<select><option value=\"1\">One</option>\
             <option value=\"2\" selected=\"selected\">Two</option></select>"
        );
    }

    #[test]
    fn t_select_list_value_makes_it_multiple() {
        let mut select = Select::new();
        select.set_value(SelectValue::Many(vec![ks("a"), ks("c")]));
        select.set_options([(ks("a"), ks("A")), (ks("b"), ks("B")), (ks("c"), ks("C"))]);
        let selected: Vec<bool> = select.options().map(|o| o.selected()).collect();
        assert_eq!(selected, vec![true, false, true]);
        assert!(select.printable().unwrap().starts_with("<select multiple=\"multiple\">"));
    }

    #[test]
    fn t_select_keeps_fully_formed_options() {
        let mut option = OptionItem::new();
        option.set_value("x");
        option.set_label("Custom");
        option.set_selected(true);
        let mut select = Select::new();
        select.set_option_items([option]);
        assert_eq!(
            select.printable().unwrap(),
            "<select><option value=\"x\" selected=\"selected\">Custom</option></select>"
        );
    }

    #[test]
    fn t_radio_button_set() {
        let mut set = RadioButtonSet::new();
        set.set_name("color");
        set.set_value("a");
        set.set_options([(ks("a"), ks("Label A"))]);
        let buttons: Vec<&RadioButton> = set.options().collect();
        assert_eq!(buttons.len(), 1);
        assert!(buttons[0].checked());
        assert_eq!(buttons[0].name(), Some("color"));
        assert_eq!(
            set.printable().unwrap(),
            "<label><input type=\"radio\" value=\"a\" name=\"color\" checked=\"checked\" /> Label A</label>"
        );
    }

    #[test]
    fn t_radio_button_set_marks_only_matching() {
        let mut set = RadioButtonSet::new();
        set.set_name("n");
        set.set_value("b");
        set.set_options([(ks("a"), ks("A")), (ks("b"), ks("B")), (ks("c"), ks("C"))]);
        let checked: Vec<bool> = set.options().map(|b| b.checked()).collect();
        assert_eq!(checked, vec![false, true, false]);
    }

    #[test]
    fn t_button_types() {
        assert!(Button::submit()
            .printable()
            .unwrap()
            .contains("type=\"submit\""));
        assert!(Button::reset().printable().unwrap().contains("type=\"reset\""));
        assert!(Button::plain().printable().unwrap().contains("type=\"button\""));
    }

    #[test]
    fn t_button_value_is_label() {
        let mut button = Button::submit();
        button.set_value("Save");
        assert_eq!(
            button.printable().unwrap(),
            "<button type=\"submit\">Save</button>"
        );
    }
}
