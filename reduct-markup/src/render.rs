use crate::{element::Element, ELEMENT_NAME, TAG_ATTRIBUTE};

/// Escapes the characters that cannot appear verbatim inside a quoted attribute value.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(ELEMENT_NAME);
    out.push_str(&format!(" {}=\"{}\"", TAG_ATTRIBUTE, escape(&element.tag)));
    for (name, value) in &element.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_element(out, child);
    }
    out.push_str("</");
    out.push_str(ELEMENT_NAME);
    out.push('>');
}

/// Renders the element, and all of its children, into markup text.
///
/// The output contains no insignificant whitespace and no prolog; [`crate::parse`] accepts both.
pub fn render(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(escape(r#"a<b>&"c"'d'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;d&apos;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn self_closing_leaf() {
        let element = Element::new("Math.Number").with_attribute("Value", "-3.5");
        assert_eq!(render(&element), r#"<expression tag="Math.Number" Value="-3.5"/>"#);
    }

    #[test]
    fn nested_children_in_order() {
        let element = Element::new("Expression.Append")
            .with_child(Element::new("List.List"))
            .with_child(Element::new("Null"));
        assert_eq!(
            render(&element),
            concat!(
                r#"<expression tag="Expression.Append">"#,
                r#"<expression tag="List.List"/>"#,
                r#"<expression tag="Null"/>"#,
                "</expression>",
            ),
        );
    }
}
