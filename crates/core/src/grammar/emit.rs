//! Emitters: fxml surface syntax and an XML rendering of a [`Document`].
//!
//! [`emit_fxml`] output re-parses to the same tree for any document the
//! parser produced. Every element is written with a body (`name{}`) so it is
//! recognised as a tag again; attribute values are always double-quoted.
//!
//! Both emitters recurse once per nesting level, as deep as
//! [`ParseOptions::max_depth`](crate::ParseOptions::max_depth) allows.

use crate::escape::quote_string;
use crate::grammar::ast::{Document, Element, Node};
use crate::grammar::lexer::{is_name_char, is_name_start_char};

// ── Configuration ───────────────────────────────────────────────────────

/// Indentation style for emitted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// Everything on one line.
    #[default]
    None,
    /// One child per line, nested by this many spaces per level.
    ///
    /// In fxml output only bodies made entirely of elements are laid out this
    /// way; bodies holding text keep their text untouched.
    Spaces(usize),
}

/// Configuration for the emitters.
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    /// Indentation style.
    pub indent: Indent,
}

impl EmitConfig {
    /// Config with `n`-space nesting.
    pub fn indented(n: usize) -> Self {
        Self {
            indent: Indent::Spaces(n),
        }
    }
}

// ── fxml ────────────────────────────────────────────────────────────────

/// Emit a document in fxml syntax, followed by a newline.
pub fn emit_fxml(document: &Document, config: &EmitConfig) -> String {
    let mut out = String::new();
    emit_element(&mut out, &document.root, config, 0);
    out.push('\n');
    out
}

fn emit_element(out: &mut String, element: &Element, config: &EmitConfig, depth: usize) {
    out.push_str(&element.name);

    if !element.attributes.is_empty() {
        out.push('(');
        for (i, (name, value)) in element.attributes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            push_attribute_name(out, name);
            out.push('=');
            out.push_str(&quote_string(value, '"'));
        }
        out.push(')');
    }

    out.push('{');
    let element_only = element.children.iter().all(|c| c.as_element().is_some());
    match config.indent {
        Indent::Spaces(width) if element_only && !element.children.is_empty() => {
            for child in element.child_elements() {
                newline_indent(out, width * (depth + 1));
                emit_element(out, child, config, depth + 1);
            }
            newline_indent(out, width * depth);
        }
        _ => {
            for child in &element.children {
                match child {
                    Node::Text { content } => out.push_str(content),
                    Node::Element(el) => emit_element(out, el, config, depth + 1),
                }
            }
        }
    }
    out.push('}');
}

/// Bare identifier when the lexer would read it back unchanged, else quoted.
fn push_attribute_name(out: &mut String, name: &str) {
    let bare = !name.is_empty()
        && !name.chars().any(|c| {
            crate::grammar::lexer::is_whitespace(c)
                || matches!(c, '=' | '(' | ')' | '{' | '}' | '\\')
                || crate::escape::QUOTES.contains(&c)
        });
    if bare {
        out.push_str(name);
    } else {
        out.push_str(&quote_string(name, '"'));
    }
}

fn newline_indent(out: &mut String, width: usize) {
    out.push('\n');
    out.extend(std::iter::repeat_n(' ', width));
}

// ── XML ─────────────────────────────────────────────────────────────────

/// Emit a document as XML-like markup, followed by a newline.
///
/// Childless elements are self-closing; with [`Indent::Spaces`] every child
/// goes on its own line. Names that are not valid XML names (an fxml
/// attribute name may be any quoted string) have each offending character
/// replaced by `_`.
pub fn emit_xml(document: &Document, config: &EmitConfig) -> String {
    let mut out = String::new();
    emit_xml_element(&mut out, &document.root, config, 0);
    out.push('\n');
    out
}

fn emit_xml_element(out: &mut String, element: &Element, config: &EmitConfig, depth: usize) {
    out.push('<');
    push_xml_name(out, &element.name);
    for (name, value) in &element.attributes {
        out.push(' ');
        push_xml_name(out, name);
        out.push_str("=\"");
        push_xml_escaped(out, value, true);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        if let Indent::Spaces(width) = config.indent {
            newline_indent(out, width * (depth + 1));
        }
        match child {
            Node::Text { content } => push_xml_escaped(out, content, false),
            Node::Element(el) => emit_xml_element(out, el, config, depth + 1),
        }
    }
    if let Indent::Spaces(width) = config.indent {
        newline_indent(out, width * depth);
    }
    out.push_str("</");
    push_xml_name(out, &element.name);
    out.push('>');
}

fn push_xml_name(out: &mut String, name: &str) {
    if name.is_empty() {
        out.push('_');
        return;
    }
    for (i, ch) in name.chars().enumerate() {
        let valid = if i == 0 {
            is_name_start_char(ch)
        } else {
            is_name_char(ch)
        };
        // `@` and `$` start fxml names but are not XML name characters.
        if valid && ch != '@' && ch != '$' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
}

fn push_xml_escaped(out: &mut String, text: &str, in_attribute: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
