//! Declarative element trees.
//!
//! Builders return a finished tree instead of mutating a live document, so
//! table construction can be tested without any rendering surface. The tree
//! is attached to its container in one step, replacing whatever was there.

use serde::Serialize;

use super::status::StatusClass;

/// Element kinds used by the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tag {
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "tr")]
    Row,
    #[serde(rename = "th")]
    HeaderCell,
    #[serde(rename = "td")]
    Cell,
}

/// One node of an element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<StatusClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            class: None,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_class(mut self, class: StatusClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Direct children that are rows.
    pub fn rows(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(|c| c.tag == Tag::Row)
    }

    /// True for a row made only of header cells.
    pub fn is_header_row(&self) -> bool {
        self.tag == Tag::Row
            && !self.children.is_empty()
            && self.children.iter().all(|c| c.tag == Tag::HeaderCell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_queries() {
        let table = Element::new(Tag::Table)
            .with_child(
                Element::new(Tag::Row).with_child(Element::new(Tag::HeaderCell).with_text("Name")),
            )
            .with_child(
                Element::new(Tag::Row).with_child(
                    Element::new(Tag::Cell)
                        .with_text("Up")
                        .with_class(StatusClass::Up),
                ),
            );

        let rows: Vec<&Element> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_header_row());
        assert!(!rows[1].is_header_row());
        assert_eq!(rows[1].children[0].text(), "Up");
        assert_eq!(Element::new(Tag::Cell).text(), "");
    }

    #[test]
    fn test_serializes_with_markup_names() {
        let cell = Element::new(Tag::Cell)
            .with_text("Down")
            .with_class(StatusClass::Down);
        assert_eq!(
            serde_json::to_value(&cell).unwrap(),
            serde_json::json!({"tag": "td", "class": "state-down", "text": "Down"})
        );
    }
}
