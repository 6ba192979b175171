//! Data model for the extracted API documentation — target-agnostic.
//!
//! Everything here is built once during the extraction phase and read-only
//! afterwards; generation is a pure pass over the assembled [`ApiRoot`].

use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// A single formatting unit inside a documentation block: a chunk of plain
/// text, a code reference, bold/emphasized text, or a nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocItem {
    Text(String),
    /// Cross-reference token, e.g. `roc_sender` or `ROC_INTERFACE_AUDIO_SOURCE`.
    Ref(String),
    /// Inline code span; may also carry a reference token.
    Code(String),
    Bold(String),
    Emphasis(String),
    /// Itemized list, one child block per list entry.
    List(Vec<DocBlock>),
    /// "See also" marker.
    See,
}

/// A sequence of successive items: one paragraph or one list entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub items: Vec<DocItem>,
}

/// A comment attached to a definition. The first block is always the brief
/// description (possibly empty), the remaining blocks are the
/// detailed-description paragraphs, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    pub blocks: Vec<DocBlock>,
}

/// A resolved code reference. For example, `roc_sender_write()` resolves to
/// `ClassMethod { class_name: "roc_sender", method_name: "write" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocRef {
    Enum(String),
    EnumValue {
        /// Full raw token, e.g. `ROC_INTERFACE_AUDIO_SOURCE`.
        name: String,
        enum_name: String,
        /// Token with the owning enum's prefix stripped, e.g. `AUDIO_SOURCE`.
        value_name: String,
    },
    Struct(String),
    StructField(String),
    Class(String),
    ClassMethod {
        class_name: String,
        method_name: String,
    },
    Typedef(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    /// Literal initializer text, radix and formatting preserved.
    pub value: String,
    pub doc: DocComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDefinition {
    pub name: String,
    pub values: Vec<EnumValue>,
    pub doc: DocComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    /// Declared C type token, e.g. `unsigned long long` or `roc_media_encoding`.
    pub ty: String,
    pub doc: DocComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<StructField>,
    pub doc: DocComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMethod {
    pub name: String,
    pub doc: DocComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    pub name: String,
    pub methods: Vec<ClassMethod>,
    pub doc: DocComment,
}

/// Source-library revision used in the provenance banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub tag: String,
    pub commit: String,
}

/// Aggregate of everything extracted from the documentation export.
///
/// The definition maps keep declaration order; generated file ordering and
/// cross-dependent naming rely on it.
#[derive(Debug)]
pub struct ApiRoot {
    pub git_info: GitInfo,

    pub enums: IndexMap<String, EnumDefinition>,
    pub structs: IndexMap<String, StructDefinition>,
    pub classes: IndexMap<String, ClassDefinition>,

    /// Enum name → its value-name prefix. Declaration order is kept so that
    /// prefix-length ties resolve deterministically.
    pub enum_prefixes: IndexMap<String, String>,
    /// Struct field name → the structs declaring it.
    pub struct_fields: HashMap<String, BTreeSet<String>>,
    /// Raw reference token → resolved classification, for every token that
    /// appears in any `Ref` or `Code` item anywhere in the model.
    pub doc_refs: HashMap<String, DocRef>,
}
