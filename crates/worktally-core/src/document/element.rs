use std::collections::BTreeMap;

/// Handle to an element of a [`Document`](super::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A single UI element: tag, identity, classes, attributes and content.
///
/// `value` models the live value of form inputs, which is distinct from any
/// `value` attribute the markup was rendered with. `text` is the element's own
/// text; children contribute theirs after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub value: Option<String>,
    pub text: String,
}

impl Element {
    pub fn new(tag: &str) -> Element {
        Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        }
    }

    /// Convenience for `<input>` elements, which start with an empty value.
    pub fn input() -> Element {
        Element::new("input").value("")
    }

    pub fn id(mut self, id: &str) -> Element {
        self.id = Some(id.to_string());
        self
    }

    /// Add one or more space separated classes.
    pub fn class(mut self, classes: &str) -> Element {
        for class in classes.split_whitespace() {
            if !self.has_class(class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Element {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn style(self, css: &str) -> Element {
        self.attr("style", css)
    }

    pub fn value(mut self, value: &str) -> Element {
        self.value = Some(value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Element {
        self.text = text.to_string();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute by name. `id` and `class` resolve to the element's
    /// identity and class list.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            _ => self.attributes.get(name).cloned(),
        }
    }
}
