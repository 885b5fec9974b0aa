//! Placeholder templates for tags.

pub const CONTAINER_TAG_PROTOTYPE: &str = "<{tagname}{attributes}>{content}</{tagname}>";
pub const NON_CONTAINER_TAG_PROTOTYPE: &str = "<{tagname}{attributes}/>";

/// `foo-bar_baz` -> `fooBarBaz`. Used as the key under which a tag is
/// handed to the view engine.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upcase_next = false;
    for c in name.chars() {
        if c == '-' || c == '_' || c == ' ' {
            upcase_next = true;
        } else if upcase_next {
            out.extend(c.to_uppercase());
            upcase_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_camel_case() {
        assert_eq!(camel_case("table"), "table");
        assert_eq!(camel_case("radio-button-set"), "radioButtonSet");
        assert_eq!(camel_case("foo_bar"), "fooBar");
    }
}
