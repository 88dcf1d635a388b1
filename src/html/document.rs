//! Document tree capabilities and the lol_html-backed HTML document
//!
//! The rewriter only needs a handful of tree operations: enumerate text nodes
//! in document order, look at the parent chain of a text node, replace a text
//! node's value, and serialize. They are expressed as three small traits so
//! the rewriter can run over any tree, and implemented here for an HTML
//! document.
//!
//! The document is never rebuilt by an HTML5 tree builder: markup is emitted
//! exactly as written, only replaced text nodes change. Element nesting is
//! taken from the tags as they appear; an element stays open until its own
//! end tag (or an enclosing one) is seen.

use crate::mt::{MtError, MtResult};
use lol_html::html_content::{ContentType, EndTag, TextType};
use lol_html::{RewriteStrSettings, doc_text, element, rewrite_str};
use std::cell::RefCell;
use std::rc::Rc;

/// Read-only view of an element, used for classification
pub trait ElementView: Sized {
    /// Lowercase local tag name (`p`, `code`, `math`, ...)
    fn tag_name(&self) -> String;

    /// Class names in attribute order
    fn classes(&self) -> Vec<String>;

    fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// The enclosing element, `None` at the top of the tree
    fn parent_element(&self) -> Option<Self>;
}

/// A text node that can be inspected and rewritten in place
pub trait TextNodeHandle {
    type Element: ElementView;

    fn value(&self) -> String;

    /// The element directly containing this text, if any
    fn parent_element(&self) -> Option<Self::Element>;

    /// Replace the text in place; the node keeps its position and parent
    fn replace_value(&self, text: &str);
}

/// A mutable document tree
pub trait HtmlTree {
    type Text: TextNodeHandle;

    /// All text nodes in document order
    fn text_nodes(&self) -> Vec<Self::Text>;

    fn serialize(&self) -> MtResult<String>;
}

#[derive(Debug, Clone)]
struct ElementRecord {
    tag: String,
    classes: Vec<String>,
    parent: Option<usize>,
}

#[derive(Debug, Clone)]
struct TextRecord {
    /// Entity-decoded text
    value: String,
    parent: Option<usize>,
}

#[derive(Debug, Default)]
struct Nodes {
    elements: Vec<ElementRecord>,
    texts: Vec<TextRecord>,
    /// New value per text node, `None` while unchanged
    replacements: RefCell<Vec<Option<String>>>,
}

/// Element stack and text buffer for the collecting pass
#[derive(Default)]
struct Collector {
    elements: Vec<ElementRecord>,
    texts: Vec<TextRecord>,
    open: Vec<usize>,
    buffer: String,
    decode: bool,
    in_text: bool,
}

impl Collector {
    fn open_element(&mut self, tag: String, classes: Vec<String>) -> usize {
        self.elements.push(ElementRecord {
            tag,
            classes,
            parent: self.open.last().copied(),
        });
        let id = self.elements.len() - 1;
        self.open.push(id);
        id
    }

    /// Close `id` and anything opened inside it but never closed
    fn close_element(&mut self, id: usize) {
        if let Some(pos) = self.open.iter().rposition(|&open| open == id) {
            self.open.truncate(pos);
        }
    }

    fn push_chunk(&mut self, chunk: &str, text_type: TextType, last: bool) {
        if !self.in_text {
            self.in_text = true;
            self.decode = matches!(text_type, TextType::Data | TextType::RCData);
            self.buffer.clear();
        }
        self.buffer.push_str(chunk);

        if last {
            let raw = std::mem::take(&mut self.buffer);
            let value = if self.decode {
                html_escape::decode_html_entities(&raw).into_owned()
            } else {
                raw
            };
            self.texts.push(TextRecord {
                value,
                parent: self.open.last().copied(),
            });
            self.in_text = false;
        }
    }
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_ascii_whitespace().map(str::to_string).collect()
}

fn markup_error(err: impl std::fmt::Display) -> MtError {
    MtError::MarkupError(err.to_string())
}

/// An element of a parsed [`HtmlDocument`]
#[derive(Debug, Clone)]
pub struct HtmlElement {
    nodes: Rc<Nodes>,
    index: usize,
}

impl ElementView for HtmlElement {
    fn tag_name(&self) -> String {
        self.nodes.elements[self.index].tag.clone()
    }

    fn classes(&self) -> Vec<String> {
        self.nodes.elements[self.index].classes.clone()
    }

    fn parent_element(&self) -> Option<Self> {
        self.nodes.elements[self.index]
            .parent
            .map(|index| HtmlElement {
                nodes: Rc::clone(&self.nodes),
                index,
            })
    }
}

/// A text node of a parsed [`HtmlDocument`]
#[derive(Debug, Clone)]
pub struct HtmlText {
    nodes: Rc<Nodes>,
    index: usize,
}

impl TextNodeHandle for HtmlText {
    type Element = HtmlElement;

    fn value(&self) -> String {
        match &self.nodes.replacements.borrow()[self.index] {
            Some(replaced) => replaced.clone(),
            None => self.nodes.texts[self.index].value.clone(),
        }
    }

    fn parent_element(&self) -> Option<HtmlElement> {
        self.nodes.texts[self.index].parent.map(|index| HtmlElement {
            nodes: Rc::clone(&self.nodes),
            index,
        })
    }

    fn replace_value(&self, text: &str) {
        self.nodes.replacements.borrow_mut()[self.index] = Some(text.to_string());
    }
}

/// A parsed HTML document
///
/// Input does not have to be well-formed; unmatched end tags are ignored and
/// unclosed elements simply enclose what follows them.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    source: String,
    nodes: Rc<Nodes>,
}

impl HtmlDocument {
    pub fn parse(html: &str) -> MtResult<Self> {
        let collector = Rc::new(RefCell::new(Collector::default()));
        let on_element = Rc::clone(&collector);
        let on_text = Rc::clone(&collector);

        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![element!("*", move |el| {
                    let tag = el.tag_name().to_ascii_lowercase();
                    let classes = el
                        .get_attribute("class")
                        .map(|value| split_classes(&value))
                        .unwrap_or_default();
                    let id = on_element.borrow_mut().open_element(tag, classes);

                    // Void elements have no end tag and never enclose text.
                    match el.end_tag_handlers() {
                        Some(handlers) => {
                            let state = Rc::clone(&on_element);
                            let handler: lol_html::EndTagHandler<'static> =
                                Box::new(move |_end: &mut EndTag<'_>| {
                                    state.borrow_mut().close_element(id);
                                    Ok(())
                                });
                            handlers.push(handler);
                        }
                        None => on_element.borrow_mut().close_element(id),
                    }
                    Ok(())
                })],
                document_content_handlers: vec![doc_text!(move |chunk| {
                    on_text.borrow_mut().push_chunk(
                        chunk.as_str(),
                        chunk.text_type(),
                        chunk.last_in_text_node(),
                    );
                    Ok(())
                })],
                strict: false,
                ..RewriteStrSettings::new()
            },
        )
        .map_err(markup_error)?;

        let collector = std::mem::take(&mut *collector.borrow_mut());
        let replacements = RefCell::new(vec![None; collector.texts.len()]);
        Ok(Self {
            source: html.to_string(),
            nodes: Rc::new(Nodes {
                elements: collector.elements,
                texts: collector.texts,
                replacements,
            }),
        })
    }
}

impl HtmlTree for HtmlDocument {
    type Text = HtmlText;

    fn text_nodes(&self) -> Vec<HtmlText> {
        (0..self.nodes.texts.len())
            .map(|index| HtmlText {
                nodes: Rc::clone(&self.nodes),
                index,
            })
            .collect()
    }

    /// Re-emit the source with replaced text nodes swapped in
    ///
    /// The same handler set as the collecting pass is registered so text
    /// nodes are delimited identically and indices line up.
    fn serialize(&self) -> MtResult<String> {
        let replacements = self.nodes.replacements.borrow();
        if replacements.iter().all(Option::is_none) {
            return Ok(self.source.clone());
        }

        let mut index = 0usize;
        let mut in_text = false;

        rewrite_str(
            &self.source,
            RewriteStrSettings {
                element_content_handlers: vec![element!("*", |_el| Ok(()))],
                document_content_handlers: vec![doc_text!(|chunk| {
                    let replacement = replacements.get(index).and_then(Option::as_ref);
                    if let Some(text) = replacement {
                        if in_text {
                            chunk.remove();
                        } else {
                            chunk.replace(text, ContentType::Text);
                        }
                    }
                    in_text = true;
                    if chunk.last_in_text_node() {
                        in_text = false;
                        index += 1;
                    }
                    Ok(())
                })],
                strict: false,
                ..RewriteStrSettings::new()
            },
        )
        .map_err(markup_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> HtmlDocument {
        HtmlDocument::parse(html).unwrap()
    }

    fn text_values(doc: &HtmlDocument) -> Vec<String> {
        doc.text_nodes().iter().map(|t| t.value()).collect()
    }

    fn non_blank_values(doc: &HtmlDocument) -> Vec<String> {
        text_values(doc)
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect()
    }

    fn find_text(doc: &HtmlDocument, value: &str) -> HtmlText {
        doc.text_nodes()
            .into_iter()
            .find(|t| t.value() == value)
            .unwrap()
    }

    // ========== Parsing Tests ==========

    #[test]
    fn test_text_nodes_in_document_order() {
        let doc = parse("<p>one <b>two</b> three</p><p>four</p>");
        assert_eq!(non_blank_values(&doc), vec!["one ", "two", " three", "four"]);
    }

    #[test]
    fn test_comments_are_not_text_nodes() {
        let doc = parse("<p>text<!-- note --></p>");
        assert_eq!(non_blank_values(&doc), vec!["text"]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let doc = parse("<p>Tom &amp; Jerry &lt;3</p>");
        assert_eq!(non_blank_values(&doc), vec!["Tom & Jerry <3"]);
    }

    #[test]
    fn test_script_text_kept_raw() {
        let doc = parse("<script>if (a &amp;&amp; b) {}</script>");
        assert_eq!(non_blank_values(&doc), vec!["if (a &amp;&amp; b) {}"]);
    }

    // ========== Element View Tests ==========

    #[test]
    fn test_parent_tag_and_classes() {
        let doc = parse("<div class=\"header  title\"><span>Limit</span></div>");
        let text = doc
            .text_nodes()
            .into_iter()
            .find(|t| t.value() == "Limit")
            .unwrap();
        let span = text.parent_element().unwrap();
        assert_eq!(span.tag_name(), "span");
        assert!(span.classes().is_empty());

        let div = span.parent_element().unwrap();
        assert_eq!(div.tag_name(), "div");
        assert_eq!(div.classes(), vec!["header", "title"]);
        assert!(div.has_class("title"));
        assert!(!div.has_class("head"));
        assert!(div.parent_element().is_none());
    }

    #[test]
    fn test_no_wrapper_elements_are_synthesized() {
        let doc = parse("<p>x</p>");
        let mut tags = Vec::new();
        let mut current = find_text(&doc, "x").parent_element();
        while let Some(element) = current {
            tags.push(element.tag_name());
            current = element.parent_element();
        }
        assert_eq!(tags, vec!["p"]);
    }

    #[test]
    fn test_void_elements_do_not_enclose_text() {
        let doc = parse("<p>a<br>b</p>");
        let parents: Vec<_> = doc
            .text_nodes()
            .iter()
            .filter(|t| !t.value().is_empty())
            .map(|t| t.parent_element().unwrap().tag_name())
            .collect();
        assert_eq!(parents, vec!["p", "p"]);
    }

    #[test]
    fn test_unclosed_element_encloses_following_text() {
        let doc = parse("<div><li>one<li>two</div>after");
        let two = doc
            .text_nodes()
            .into_iter()
            .find(|t| t.value() == "two")
            .unwrap();
        let parent = two.parent_element().unwrap();
        assert_eq!(parent.tag_name(), "li");
        assert_eq!(parent.parent_element().unwrap().tag_name(), "li");

        let after = doc
            .text_nodes()
            .into_iter()
            .find(|t| t.value() == "after")
            .unwrap();
        assert!(after.parent_element().is_none());
    }

    // ========== Serialization Tests ==========

    #[test]
    fn test_untouched_document_is_byte_identical() {
        for html in [
            "<p>Hello <code>print(x)</code> world $a+b$</p>",
            "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>",
            "<table><tr><td>Input</td></tr></table>",
            "<p>Hello<div>world</div></p>",
            "\n  <p>Hello</p>\n",
            "<p>x</p><!-- <body> -->",
            "<p class=a>unquoted &amp; entity</p>",
        ] {
            assert_eq!(parse(html).serialize().unwrap(), html);
        }
    }

    #[test]
    fn test_replace_value_in_place() {
        let doc = parse("<p>old <i>keep</i></p>");
        let first = doc
            .text_nodes()
            .into_iter()
            .find(|t| t.value() == "old ")
            .unwrap();
        first.replace_value("new ");
        assert_eq!(first.value(), "new ");
        assert_eq!(doc.serialize().unwrap(), "<p>new <i>keep</i></p>");
    }

    #[test]
    fn test_replaced_text_is_escaped() {
        let doc = parse("<p>x</p>");
        find_text(&doc, "x").replace_value("a < b & c");
        assert_eq!(doc.serialize().unwrap(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_replacement_inside_table_keeps_table_markup() {
        let doc = parse("<table><tr><td>Input</td></tr></table>");
        for text in doc.text_nodes() {
            if text.value() == "Input" {
                text.replace_value("Entrée");
            }
        }
        assert_eq!(
            doc.serialize().unwrap(),
            "<table><tr><td>Entrée</td></tr></table>"
        );
    }
}
