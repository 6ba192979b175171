//! Schema-bound walk of the Doxygen XML export.
//!
//! One export file per documented entity group: `config_8h.xml` holds every
//! enum, each struct has its own `structroc__*.xml`, and each class-like
//! header has a `*_8h.xml` with a typedef plus its functions. The walk
//! itself is direct; the interesting invariants live in the resolver and
//! the renderers.

use crate::model::*;
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use sxd_document::dom::{ChildOfElement, Element};
use sxd_document::{parser as xml, Package};
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context as XPathContext, Factory, Value};
use tracing::{debug, info, warn};

const ENUM_FILE: &str = "config_8h.xml";

const STRUCT_FILES: &[&str] = &[
    "structroc__context__config.xml",
    "structroc__receiver__config.xml",
    "structroc__sender__config.xml",
    "structroc__interface__config.xml",
    "structroc__media__encoding.xml",
];

const CLASS_FILES: &[&str] = &[
    "context_8h.xml",
    "receiver_8h.xml",
    "sender_8h.xml",
    "endpoint_8h.xml",
];

pub fn parse_enums(doxygen_dir: &Path) -> Result<IndexMap<String, EnumDefinition>> {
    let package = load_xml(doxygen_dir, ENUM_FILE)?;
    let document = package.as_document();

    let mut enums = IndexMap::new();
    for member in find_all(
        document.root(),
        "//sectiondef[@kind='enum']/memberdef[@kind='enum']",
    )? {
        let name = required_child_text(member, "name", ENUM_FILE)?;
        let doc = parse_doc_comment(member);

        let mut values = Vec::new();
        for enum_value in child_elements(member, "enumvalue") {
            let value_name = required_child_text(enum_value, "name", ENUM_FILE)?;
            let initializer = required_child_text(enum_value, "initializer", ENUM_FILE)?;
            let value = initializer
                .strip_prefix("= ")
                .unwrap_or(&initializer)
                .to_string();
            values.push(EnumValue {
                name: value_name,
                value,
                doc: parse_doc_comment(enum_value),
            });
        }

        debug!("found enum in docs: {name}");
        enums.insert(name.clone(), EnumDefinition { name, values, doc });
    }

    Ok(enums)
}

pub fn parse_structs(doxygen_dir: &Path) -> Result<IndexMap<String, StructDefinition>> {
    let mut structs = IndexMap::new();

    for file in STRUCT_FILES {
        let package = load_xml(doxygen_dir, file)?;
        let document = package.as_document();
        let compound = compound_def(document.root(), file)?;

        let name = required_child_text(compound, "compoundname", file)?;
        let doc = parse_doc_comment(compound);

        let mut fields = Vec::new();
        for member in find_all(compound, "sectiondef/memberdef[@kind='variable']")? {
            let field_name = required_child_text(member, "name", file)?;
            let ty = parse_field_type(member, file)?;
            fields.push(StructField {
                name: field_name,
                ty,
                doc: parse_doc_comment(member),
            });
        }

        debug!("found struct in docs: {name}");
        structs.insert(name.clone(), StructDefinition { name, fields, doc });
    }

    Ok(structs)
}

pub fn parse_classes(doxygen_dir: &Path) -> Result<IndexMap<String, ClassDefinition>> {
    let mut classes = IndexMap::new();

    for file in CLASS_FILES {
        let package = load_xml(doxygen_dir, file)?;
        let document = package.as_document();
        let compound = compound_def(document.root(), file)?;

        let typedef = find_all(compound, "sectiondef/memberdef[@kind='typedef']")?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("missing typedef memberdef in {file}"))?;
        let name = required_child_text(typedef, "name", file)?;
        let doc = parse_doc_comment(typedef);

        let mut methods = Vec::new();
        for member in find_all(compound, "sectiondef/memberdef[@kind='function']")? {
            let method_name = required_child_text(member, "name", file)?;
            methods.push(ClassMethod {
                name: method_name,
                doc: parse_doc_comment(member),
            });
        }

        debug!("found class in docs: {name}");
        classes.insert(name.clone(), ClassDefinition { name, methods, doc });
    }

    Ok(classes)
}

// -- Documentation tree -------------------------------------------------------

/// Convert a member's description elements into a [`DocComment`]. The first
/// block always exists and holds the brief description.
fn parse_doc_comment(el: Element<'_>) -> DocComment {
    let mut blocks = Vec::new();

    let brief = child_element(el, "briefdescription").and_then(|b| child_element(b, "para"));
    blocks.push(DocBlock {
        items: brief.map(parse_doc_elem).unwrap_or_default(),
    });

    if let Some(detailed) = child_element(el, "detaileddescription") {
        for para in child_elements(detailed, "para") {
            blocks.push(DocBlock {
                items: parse_doc_elem(para),
            });
        }
    }

    DocComment { blocks }
}

/// Recursively convert one description element into doc items.
///
/// Unknown tags contribute no item of their own, but their children and
/// interleaved text are still walked. Tail text after a nested element
/// becomes its own `Text` item; whitespace-only text is dropped.
fn parse_doc_elem(el: Element<'_>) -> Vec<DocItem> {
    let mut items = Vec::new();
    let tag = el.name().local_part();
    let text = leading_text(el);
    let mut walk_children = true;

    match tag {
        "para" => {
            if let Some(t) = text {
                items.push(DocItem::Text(t));
            }
        }
        "ref" => {
            if let Some(t) = text {
                items.push(DocItem::Ref(t));
            }
        }
        "computeroutput" => {
            if let Some(t) = text {
                items.push(DocItem::Code(t));
            }
        }
        "bold" => {
            if let Some(t) = text {
                items.push(DocItem::Bold(t));
            }
        }
        "emphasis" => {
            if let Some(t) = text {
                items.push(DocItem::Emphasis(t));
            }
        }
        "simplesect" => match el.attribute_value("kind") {
            Some("see") => items.push(DocItem::See),
            kind => warn!("unknown simplesect kind = {kind:?}, consider adding it to parse_doc_elem"),
        },
        "itemizedlist" => {
            let mut child_blocks = Vec::new();
            for li in child_elements(el, "listitem") {
                let mut li_items = Vec::new();
                for child in all_child_elements(li) {
                    li_items.extend(parse_doc_elem(child));
                }
                child_blocks.push(DocBlock { items: li_items });
            }
            items.push(DocItem::List(child_blocks));
            walk_children = false;
        }
        _ => warn!("unknown tag = {tag}, consider adding it to parse_doc_elem"),
    }

    if walk_children {
        let mut tail = String::new();
        let mut seen_element = false;
        for child in el.children() {
            match child {
                ChildOfElement::Element(c) => {
                    if seen_element {
                        flush_tail(&mut tail, &mut items);
                    } else {
                        // leading text was already captured above
                        tail.clear();
                    }
                    seen_element = true;
                    items.extend(parse_doc_elem(c));
                }
                ChildOfElement::Text(t) => tail.push_str(t.text()),
                _ => {}
            }
        }
        if seen_element {
            flush_tail(&mut tail, &mut items);
        }
    }

    items
}

fn flush_tail(tail: &mut String, items: &mut Vec<DocItem>) {
    let trimmed = tail.trim();
    if !trimmed.is_empty() {
        items.push(DocItem::Text(trimmed.to_string()));
    }
    tail.clear();
}

/// Text content before the first element child, trimmed.
fn leading_text(el: Element<'_>) -> Option<String> {
    let mut buf = String::new();
    for child in el.children() {
        match child {
            ChildOfElement::Text(t) => buf.push_str(t.text()),
            ChildOfElement::Element(_) => break,
            _ => {}
        }
    }
    let trimmed = buf.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// -- XML plumbing -------------------------------------------------------------

fn load_xml(doxygen_dir: &Path, name: &str) -> Result<Package> {
    let path = doxygen_dir.join(name);
    info!("parsing {}", path.display());

    let text = fs::read_to_string(&path)
        .with_context(|| format!("file not found or unreadable: {}", path.display()))?;
    xml::parse(&text).map_err(|e| anyhow!("error parsing XML file {}: {e:?}", path.display()))
}

fn compound_def<'d>(root: sxd_document::dom::Root<'d>, file: &str) -> Result<Element<'d>> {
    find_all(root, "//compounddef")?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("missing <compounddef> in {file}"))
}

/// Evaluate an XPath returning matched elements in document order.
fn find_all<'d>(node: impl Into<Node<'d>>, expr: &str) -> Result<Vec<Element<'d>>> {
    let xpath = Factory::new()
        .build(expr)
        .map_err(|e| anyhow!("invalid XPath {expr}: {e:?}"))?
        .ok_or_else(|| anyhow!("empty XPath {expr}"))?;
    let value = xpath
        .evaluate(&XPathContext::new(), node)
        .map_err(|e| anyhow!("XPath {expr} failed: {e:?}"))?;

    let mut elements = Vec::new();
    if let Value::Nodeset(nodes) = value {
        for node in nodes.document_order() {
            if let Node::Element(el) = node {
                elements.push(el);
            }
        }
    }
    Ok(elements)
}

fn child_element<'d>(el: Element<'d>, name: &str) -> Option<Element<'d>> {
    el.children()
        .into_iter()
        .filter_map(|c| c.element())
        .find(|c| c.name().local_part() == name)
}

fn child_elements<'d>(el: Element<'d>, name: &str) -> Vec<Element<'d>> {
    el.children()
        .into_iter()
        .filter_map(|c| c.element())
        .filter(|c| c.name().local_part() == name)
        .collect()
}

fn all_child_elements(el: Element<'_>) -> Vec<Element<'_>> {
    el.children().into_iter().filter_map(|c| c.element()).collect()
}

/// Concatenated text content of an element's direct text children.
fn element_text(el: Element<'_>) -> String {
    el.children()
        .into_iter()
        .filter_map(|c| c.text())
        .map(|t| t.text())
        .collect()
}

fn required_child_text(el: Element<'_>, name: &str, file: &str) -> Result<String> {
    child_element(el, name)
        .map(|c| element_text(c).trim().to_string())
        .ok_or_else(|| anyhow!("missing <{name}> in {file}"))
}

/// A struct field's type is either a `<ref>` to an API type or raw text.
fn parse_field_type(member: Element<'_>, file: &str) -> Result<String> {
    let ty = child_element(member, "type").ok_or_else(|| anyhow!("missing <type> in {file}"))?;
    let text = match child_element(ty, "ref") {
        Some(r) => element_text(r),
        None => element_text(ty),
    };
    Ok(text.trim().to_string())
}
