//! Minimal element metadata used when building default templates.

use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    // Elements with no content model; these serialize as a single
    // self-closing tag.
    static ref VOID_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input",
        "link", "meta", "param", "source", "track", "wbr",
    ]
    .iter()
    .copied()
    .collect();
}

pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_void_elements() {
        assert!(is_void_element("input"));
        assert!(is_void_element("br"));
        assert!(!is_void_element("div"));
        assert!(!is_void_element("select"));
    }
}
