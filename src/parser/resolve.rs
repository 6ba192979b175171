//! Symbol index — classifies every cross-reference token found in any
//! documentation tree, once, before rendering begins.
//!
//! Classification precedence is load-bearing: several categories share
//! naming conventions, so the checks run in a fixed order and the first
//! match wins. Enum-value matching is gated on the uppercase `ROC_` shape,
//! which struct field names never have, keeping those two checks disjoint.

use crate::model::*;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;
use tracing::warn;

/// Enums whose value prefix doesn't follow the uppercase-name-plus-underscore
/// derivation.
const ODD_PREFIXES: &[(&str, &str)] = &[("roc_protocol", "ROC_PROTO_")];

// class method, e.g. "roc_sender_write()" (trailing parens optional)
static RE_CLASS_METHOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(roc_[a-z]+)_([a-z_]+)(\(\))?$").unwrap());

// bare namespaced type, e.g. "roc_slot"
static RE_TYPEDEF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^roc_[a-z_]+$").unwrap());

/// Derive the per-enum indexes and the global symbol index, then assemble
/// the immutable [`ApiRoot`].
pub fn build_api_root(
    git_info: GitInfo,
    enums: IndexMap<String, EnumDefinition>,
    structs: IndexMap<String, StructDefinition>,
    classes: IndexMap<String, ClassDefinition>,
) -> ApiRoot {
    let enum_prefixes = build_enum_prefixes(&enums);
    let struct_fields = build_struct_fields(&structs);

    let resolver = Resolver {
        enums: &enums,
        structs: &structs,
        classes: &classes,
        enum_prefixes: &enum_prefixes,
        struct_fields: &struct_fields,
    };
    let doc_refs = resolver.build_doc_refs();

    ApiRoot {
        git_info,
        enums,
        structs,
        classes,
        enum_prefixes,
        struct_fields,
        doc_refs,
    }
}

fn build_enum_prefixes(enums: &IndexMap<String, EnumDefinition>) -> IndexMap<String, String> {
    enums
        .keys()
        .map(|name| {
            let prefix = ODD_PREFIXES
                .iter()
                .find(|(odd, _)| odd == name)
                .map(|(_, p)| (*p).to_string())
                .unwrap_or_else(|| format!("{}_", name.to_uppercase()));
            (name.clone(), prefix)
        })
        .collect()
}

fn build_struct_fields(
    structs: &IndexMap<String, StructDefinition>,
) -> HashMap<String, BTreeSet<String>> {
    let mut fields: HashMap<String, BTreeSet<String>> = HashMap::new();
    for def in structs.values() {
        for field in &def.fields {
            fields
                .entry(field.name.clone())
                .or_default()
                .insert(def.name.clone());
        }
    }
    fields
}

struct Resolver<'a> {
    enums: &'a IndexMap<String, EnumDefinition>,
    structs: &'a IndexMap<String, StructDefinition>,
    classes: &'a IndexMap<String, ClassDefinition>,
    enum_prefixes: &'a IndexMap<String, String>,
    struct_fields: &'a HashMap<String, BTreeSet<String>>,
}

impl Resolver<'_> {
    /// Classify one raw token. `None` is a valid terminal outcome, expected
    /// for ordinary prose words that happen to look like identifiers.
    fn resolve(&self, token: &str) -> Option<DocRef> {
        // definition name (e.g. "roc_interface")
        if self.enums.contains_key(token) {
            return Some(DocRef::Enum(token.to_string()));
        }
        if self.structs.contains_key(token) {
            return Some(DocRef::Struct(token.to_string()));
        }
        if self.classes.contains_key(token) {
            return Some(DocRef::Class(token.to_string()));
        }

        // enum value (e.g. "ROC_INTERFACE_AUDIO_SOURCE");
        // on multiple prefix matches the longest declared prefix wins
        if token.starts_with("ROC_") {
            let mut best: Option<(&str, &str)> = None;
            for (enum_name, prefix) in self.enum_prefixes {
                if token.len() > prefix.len()
                    && token.starts_with(prefix.as_str())
                    && best.is_none_or(|(_, b)| prefix.len() > b.len())
                {
                    best = Some((enum_name.as_str(), prefix.as_str()));
                }
            }
            if let Some((enum_name, prefix)) = best {
                return Some(DocRef::EnumValue {
                    name: token.to_string(),
                    enum_name: enum_name.to_string(),
                    value_name: token[prefix.len()..].to_string(),
                });
            }
        }

        // struct field (e.g. "packet_length")
        if self.struct_fields.contains_key(token) {
            return Some(DocRef::StructField(token.to_string()));
        }

        // class method (e.g. "roc_sender_write()")
        if let Some(caps) = RE_CLASS_METHOD.captures(token) {
            let class_name = &caps[1];
            if self.classes.contains_key(class_name) {
                return Some(DocRef::ClassMethod {
                    class_name: class_name.to_string(),
                    method_name: caps[2].to_string(),
                });
            }
        }

        // another type name (e.g. "roc_slot")
        if RE_TYPEDEF.is_match(token) {
            return Some(DocRef::Typedef(token.to_string()));
        }

        None
    }

    /// One upfront pass over every documentation tree in the model. The
    /// first classification per token wins; later occurrences of the same
    /// token text reuse the stored entry.
    fn build_doc_refs(&self) -> HashMap<String, DocRef> {
        let mut refs = HashMap::new();

        for def in self.enums.values() {
            self.visit_comment(&def.doc, &mut refs);
            for value in &def.values {
                self.visit_comment(&value.doc, &mut refs);
            }
        }
        for def in self.structs.values() {
            self.visit_comment(&def.doc, &mut refs);
            for field in &def.fields {
                self.visit_comment(&field.doc, &mut refs);
            }
        }
        for def in self.classes.values() {
            self.visit_comment(&def.doc, &mut refs);
            for method in &def.methods {
                self.visit_comment(&method.doc, &mut refs);
            }
        }

        refs
    }

    fn visit_comment(&self, doc: &DocComment, refs: &mut HashMap<String, DocRef>) {
        for block in &doc.blocks {
            self.visit_items(&block.items, refs);
        }
    }

    fn visit_items(&self, items: &[DocItem], refs: &mut HashMap<String, DocRef>) {
        for item in items {
            match item {
                DocItem::Ref(token) => self.visit_token(token, true, refs),
                DocItem::Code(token) => self.visit_token(token, false, refs),
                DocItem::List(blocks) => {
                    for block in blocks {
                        self.visit_items(&block.items, refs);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_token(&self, token: &str, is_ref: bool, refs: &mut HashMap<String, DocRef>) {
        if refs.contains_key(token) {
            return;
        }
        match self.resolve(token) {
            Some(doc_ref) => {
                refs.insert(token.to_string(), doc_ref);
            }
            // code spans stay silent, they often hold plain literals
            None if is_ref => warn!("unresolved doc reference: {token}"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_def(name: &str, value_names: &[&str]) -> EnumDefinition {
        EnumDefinition {
            name: name.to_string(),
            values: value_names
                .iter()
                .enumerate()
                .map(|(i, v)| EnumValue {
                    name: v.to_string(),
                    value: i.to_string(),
                    doc: DocComment::default(),
                })
                .collect(),
            doc: DocComment::default(),
        }
    }

    fn struct_def(name: &str, field_names: &[&str]) -> StructDefinition {
        StructDefinition {
            name: name.to_string(),
            fields: field_names
                .iter()
                .map(|f| StructField {
                    name: f.to_string(),
                    ty: "unsigned int".to_string(),
                    doc: DocComment::default(),
                })
                .collect(),
            doc: DocComment::default(),
        }
    }

    fn class_def(name: &str, method_names: &[&str]) -> ClassDefinition {
        ClassDefinition {
            name: name.to_string(),
            methods: method_names
                .iter()
                .map(|m| ClassMethod {
                    name: m.to_string(),
                    doc: DocComment::default(),
                })
                .collect(),
            doc: DocComment::default(),
        }
    }

    fn test_resolver_api() -> ApiRoot {
        let mut enums = IndexMap::new();
        enums.insert(
            "roc_interface".to_string(),
            enum_def(
                "roc_interface",
                &["ROC_INTERFACE_CONSOLIDATED", "ROC_INTERFACE_AUDIO_SOURCE"],
            ),
        );
        enums.insert(
            "roc_protocol".to_string(),
            enum_def("roc_protocol", &["ROC_PROTO_RTSP"]),
        );
        enums.insert("roc_fec".to_string(), enum_def("roc_fec", &["ROC_FEC_DEFAULT"]));
        enums.insert(
            "roc_fec_encoding".to_string(),
            enum_def("roc_fec_encoding", &["ROC_FEC_ENCODING_RS8M"]),
        );

        let mut structs = IndexMap::new();
        structs.insert(
            "roc_sender_config".to_string(),
            struct_def("roc_sender_config", &["packet_length", "frame_encoding"]),
        );

        let mut classes = IndexMap::new();
        classes.insert(
            "roc_sender".to_string(),
            class_def("roc_sender", &["roc_sender_open", "roc_sender_write"]),
        );

        build_api_root(
            GitInfo {
                tag: "v0.1.0".to_string(),
                commit: "abc1234".to_string(),
            },
            enums,
            structs,
            classes,
        )
    }

    fn resolve(api: &ApiRoot, token: &str) -> Option<DocRef> {
        let resolver = Resolver {
            enums: &api.enums,
            structs: &api.structs,
            classes: &api.classes,
            enum_prefixes: &api.enum_prefixes,
            struct_fields: &api.struct_fields,
        };
        resolver.resolve(token)
    }

    #[test]
    fn definition_names_resolve_exactly() {
        let api = test_resolver_api();
        assert_eq!(
            resolve(&api, "roc_interface"),
            Some(DocRef::Enum("roc_interface".to_string()))
        );
        assert_eq!(
            resolve(&api, "roc_sender_config"),
            Some(DocRef::Struct("roc_sender_config".to_string()))
        );
        assert_eq!(
            resolve(&api, "roc_sender"),
            Some(DocRef::Class("roc_sender".to_string()))
        );
    }

    #[test]
    fn enum_value_by_derived_prefix() {
        let api = test_resolver_api();
        assert_eq!(
            resolve(&api, "ROC_INTERFACE_AUDIO_SOURCE"),
            Some(DocRef::EnumValue {
                name: "ROC_INTERFACE_AUDIO_SOURCE".to_string(),
                enum_name: "roc_interface".to_string(),
                value_name: "AUDIO_SOURCE".to_string(),
            })
        );
    }

    #[test]
    fn enum_value_by_odd_prefix() {
        let api = test_resolver_api();
        assert_eq!(
            resolve(&api, "ROC_PROTO_RTSP"),
            Some(DocRef::EnumValue {
                name: "ROC_PROTO_RTSP".to_string(),
                enum_name: "roc_protocol".to_string(),
                value_name: "RTSP".to_string(),
            })
        );
    }

    #[test]
    fn longest_prefix_wins() {
        let api = test_resolver_api();
        // ROC_FEC_ and ROC_FEC_ENCODING_ both match; the longer one owns it
        assert_eq!(
            resolve(&api, "ROC_FEC_ENCODING_RS8M"),
            Some(DocRef::EnumValue {
                name: "ROC_FEC_ENCODING_RS8M".to_string(),
                enum_name: "roc_fec_encoding".to_string(),
                value_name: "RS8M".to_string(),
            })
        );
    }

    #[test]
    fn bare_prefix_is_not_a_value() {
        let api = test_resolver_api();
        assert_eq!(resolve(&api, "ROC_INTERFACE_"), None);
    }

    #[test]
    fn struct_field_by_name() {
        let api = test_resolver_api();
        assert_eq!(
            resolve(&api, "packet_length"),
            Some(DocRef::StructField("packet_length".to_string()))
        );
    }

    #[test]
    fn class_method_with_and_without_parens() {
        let api = test_resolver_api();
        let expected = Some(DocRef::ClassMethod {
            class_name: "roc_sender".to_string(),
            method_name: "write".to_string(),
        });
        assert_eq!(resolve(&api, "roc_sender_write()"), expected);
        assert_eq!(resolve(&api, "roc_sender_write"), expected);
    }

    #[test]
    fn method_shape_without_known_class_is_typedef() {
        let api = test_resolver_api();
        assert_eq!(
            resolve(&api, "roc_receiver_read"),
            Some(DocRef::Typedef("roc_receiver_read".to_string()))
        );
    }

    #[test]
    fn typedef_shape() {
        let api = test_resolver_api();
        assert_eq!(
            resolve(&api, "roc_slot"),
            Some(DocRef::Typedef("roc_slot".to_string()))
        );
    }

    #[test]
    fn prose_words_stay_unresolved() {
        let api = test_resolver_api();
        assert_eq!(resolve(&api, "nanoseconds"), None);
        assert_eq!(resolve(&api, "ROC_UNKNOWN_THING"), None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let api = test_resolver_api();
        let first = resolve(&api, "ROC_INTERFACE_AUDIO_SOURCE");
        let second = resolve(&api, "ROC_INTERFACE_AUDIO_SOURCE");
        assert_eq!(first, second);
    }

    #[test]
    fn index_covers_tokens_from_nested_lists() {
        let mut enums = IndexMap::new();
        let mut def = enum_def("roc_interface", &["ROC_INTERFACE_AUDIO_SOURCE"]);
        def.doc = DocComment {
            blocks: vec![DocBlock {
                items: vec![DocItem::List(vec![
                    DocBlock {
                        items: vec![DocItem::Ref("ROC_INTERFACE_AUDIO_SOURCE".to_string())],
                    },
                    DocBlock {
                        items: vec![DocItem::Code("roc_slot".to_string())],
                    },
                ])],
            }],
        };
        enums.insert("roc_interface".to_string(), def);

        let api = build_api_root(
            GitInfo {
                tag: "v0".to_string(),
                commit: "0000000".to_string(),
            },
            enums,
            IndexMap::new(),
            IndexMap::new(),
        );

        assert!(api.doc_refs.contains_key("ROC_INTERFACE_AUDIO_SOURCE"));
        assert_eq!(
            api.doc_refs.get("roc_slot"),
            Some(&DocRef::Typedef("roc_slot".to_string()))
        );
    }
}
