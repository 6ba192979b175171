//! Go target — renders each definition into a source file for the `roc`
//! package, stringer directive included.

use crate::case::to_pascal_case;
use crate::model::*;
use crate::render::wrap::wrap;
use crate::render::{autogen_comment, GeneratedFile, Generator};
use std::path::PathBuf;
use tracing::warn;

const TYPE_MAP: &[(&str, &str)] = &[
    ("unsigned int", "uint32"),
    ("int", "int32"),
    ("unsigned long", "uint32"),
    ("long", "int32"),
    ("unsigned long long", "uint64"),
    ("long long", "int64"),
    ("char", "string"),
];

// keyed by the translated PascalCase field name
const TYPE_OVERRIDE: &[(&str, &str)] = &[
    ("PacketLength", "time.Duration"),
    ("PacketInterleaving", "bool"),
    ("TargetLatency", "time.Duration"),
    ("LatencyTolerance", "time.Duration"),
    ("NoPlaybackTimeout", "time.Duration"),
    ("ChoppyPlaybackTimeout", "time.Duration"),
    ("ReuseAddress", "bool"),
];

// hand-written comment replacing the converted one, keyed by the
// translated name
const COMMENT_OVERRIDE: &[(&str, &str)] = &[
    (
        "ContextConfig",
        "// Context configuration.\n\
         // You can zero-initialize this struct to get a default config.\n\
         // See also Context.\n",
    ),
    (
        "SenderConfig",
        "// Sender configuration.\n\
         // You can zero-initialize this struct to get a default config.\n\
         // See also Sender.\n",
    ),
    (
        "ReceiverConfig",
        "// Receiver configuration.\n\
         // You can zero-initialize this struct to get a default config.\n\
         // See also Receiver.\n",
    ),
];

fn lookup<'a>(table: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn strip_roc(name: &str) -> &str {
    name.strip_prefix("roc_").unwrap_or(name)
}

pub struct GoGenerator<'a> {
    api: &'a ApiRoot,
    autogen: String,
}

impl<'a> GoGenerator<'a> {
    pub fn new(api: &'a ApiRoot) -> Self {
        Self {
            autogen: autogen_comment(&api.git_info),
            api,
        }
    }

    fn go_path(&self, go_name: &str, dummy: bool) -> PathBuf {
        if dummy {
            PathBuf::from(format!("roc/{go_name}_DUMMY.go"))
        } else {
            PathBuf::from(format!("roc/{go_name}.go"))
        }
    }

    fn enum_value_name(&self, roc_value_name: &str) -> String {
        let lower = roc_value_name.to_lowercase();
        to_pascal_case(strip_roc(&lower))
    }

    fn struct_field_type(&self, field: &StructField, go_field_name: &str) -> String {
        if field.ty.starts_with("roc") {
            return to_pascal_case(strip_roc(&field.ty));
        }
        if let Some(ty) = lookup(TYPE_OVERRIDE, go_field_name) {
            return ty.to_string();
        }
        lookup(TYPE_MAP, &field.ty)
            .map(str::to_string)
            .unwrap_or_else(|| field.ty.clone())
    }

    fn comment_for(&self, go_name: &str, doc: &DocComment) -> String {
        match lookup(COMMENT_OVERRIDE, go_name) {
            Some(text) => text.to_string(),
            None => self.format_comment(doc, ""),
        }
    }

    /// Render a comment as `//` lines at the given indent, reflowed to 80
    /// columns. Blocks after the first are separated by an empty `//` line;
    /// list bullets get a hanging indent.
    fn format_comment(&self, doc: &DocComment, indent: &str) -> String {
        let indent_line = format!("{indent}// ");

        let mut out = String::new();
        for (i, block) in doc.blocks.iter().enumerate() {
            if i != 0 {
                out.push_str(&format!("{indent}//\n"));
            }
            let text = self.block_to_string(block);
            for part in text.split('\n') {
                let subsequent = if part.starts_with(" - ") {
                    format!("{indent_line}   ")
                } else {
                    indent_line.clone()
                };
                let part = part.replace("( ", "(").replace(" )", ")");
                for line in wrap(&part, 80, &indent_line, &subsequent) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
        out
    }

    fn block_to_string(&self, block: &DocBlock) -> String {
        let mut parts: Vec<String> = Vec::new();
        for item in &block.items {
            match item {
                DocItem::Text(text) | DocItem::Bold(text) | DocItem::Emphasis(text) => {
                    parts.push(text.clone());
                }
                DocItem::Ref(token) | DocItem::Code(token) => {
                    parts.push(self.ref_to_string(token));
                }
                DocItem::See => parts.push("See".to_string()),
                DocItem::List(blocks) => {
                    let mut ul = String::from("\n");
                    for li in blocks {
                        ul.push_str(&format!(" - {}\n", self.block_to_string(li)));
                    }
                    ul.push('\n');
                    parts.push(ul);
                }
            }
        }
        parts.join(" ").replace(" ,", ",").replace(" .", ".")
    }

    /// A resolved reference becomes the translated Go identifier; anything
    /// else passes through verbatim.
    fn ref_to_string(&self, token: &str) -> String {
        match self.api.doc_refs.get(token) {
            Some(DocRef::Enum(name))
            | Some(DocRef::Struct(name))
            | Some(DocRef::Class(name))
            | Some(DocRef::Typedef(name)) => to_pascal_case(strip_roc(name)),
            Some(DocRef::EnumValue { name, .. }) => {
                to_pascal_case(name.strip_prefix("ROC_").unwrap_or(name))
            }
            Some(DocRef::StructField(name)) => to_pascal_case(name),
            Some(DocRef::ClassMethod {
                class_name,
                method_name,
            }) => {
                let class = to_pascal_case(strip_roc(class_name));
                if method_name == "open" {
                    format!("Open{class}()")
                } else {
                    format!("{class}.{}()", to_pascal_case(method_name))
                }
            }
            None => token.to_string(),
        }
    }
}

impl Generator for GoGenerator<'_> {
    fn generate_enum(&self, def: &EnumDefinition) -> GeneratedFile {
        let go_name = strip_roc(&def.name);
        let go_type_name = to_pascal_case(go_name);

        let mut out = String::new();
        out.push_str(&self.autogen);
        out.push('\n');
        out.push_str("package roc\n\n");
        out.push_str(&self.comment_for(&go_type_name, &def.doc));

        let roc_prefix = self
            .api
            .enum_prefixes
            .get(&def.name)
            .map(String::as_str)
            .unwrap_or("");
        let lower_prefix = roc_prefix.to_lowercase();
        let trimmed_prefix = strip_roc(&lower_prefix);
        let go_prefix = to_pascal_case(trimmed_prefix.strip_suffix('_').unwrap_or(trimmed_prefix));

        out.push_str("//\n");
        out.push_str(&format!(
            "//go:generate stringer -type {go_type_name} -trimprefix {go_prefix} -output {go_name}_string.go\n"
        ));
        out.push_str(&format!("type {go_type_name} int\n\n"));
        out.push_str("const (\n");

        for (i, value) in def.values.iter().enumerate() {
            if i != 0 {
                out.push('\n');
            }
            out.push_str(&self.format_comment(&value.doc, "\t"));
            out.push_str(&format!(
                "\t{} {go_type_name} = {}\n",
                self.enum_value_name(&value.name),
                value.value
            ));
        }

        out.push_str(")\n");

        GeneratedFile {
            path: self.go_path(go_name, false),
            content: out,
        }
    }

    fn generate_struct(&self, def: &StructDefinition) -> GeneratedFile {
        let go_name = strip_roc(&def.name);
        let go_type_name = to_pascal_case(go_name);

        let fields: Vec<(String, String)> = def
            .fields
            .iter()
            .map(|field| {
                let lower = field.name.to_lowercase();
                let field_name = to_pascal_case(strip_roc(&lower));
                let field_type = self.struct_field_type(field, &field_name);
                (field_name, field_type)
            })
            .collect();

        let needs_time = fields.iter().any(|(_, ty)| ty.starts_with("time."));

        let mut out = String::new();
        out.push_str(&self.autogen);
        out.push('\n');
        out.push_str("package roc\n\n");

        if needs_time {
            out.push_str("import (\n\t\"time\"\n)\n\n");
        }

        out.push_str(&self.comment_for(&go_type_name, &def.doc));
        out.push_str(&format!("type {go_type_name} struct {{\n"));

        for (i, field) in def.fields.iter().enumerate() {
            let (field_name, field_type) = &fields[i];
            if i != 0 {
                out.push('\n');
            }
            out.push_str(&self.format_comment(&field.doc, "\t"));
            out.push_str(&format!("\t{field_name} {field_type}\n"));
        }

        out.push_str("}\n");

        GeneratedFile {
            path: self.go_path(go_name, false),
            content: out,
        }
    }

    fn generate_class(&self, def: &ClassDefinition) -> GeneratedFile {
        warn!(
            "class generation is not fully supported yet, emitting scaffold: {}",
            def.name
        );

        let go_name = strip_roc(&def.name);
        let go_type_name = to_pascal_case(go_name);

        let mut out = String::new();
        out.push_str(&self.autogen);
        out.push('\n');
        out.push_str("package roc\n\n");
        out.push_str(&self.comment_for(&go_type_name, &def.doc));
        out.push_str("//\n");
        out.push_str(&format!("type {go_type_name} struct {{\n"));
        out.push_str("}\n");
        out.push('\n');

        for method in &def.methods {
            let class_prefix = format!("{}_", def.name);
            let bare = method
                .name
                .strip_prefix(&class_prefix)
                .unwrap_or(&method.name);
            let mut go_method_name = to_pascal_case(bare);
            if go_method_name == "Open" {
                go_method_name = format!("Open{go_type_name}");
            }

            out.push_str(&self.format_comment(&method.doc, ""));
            out.push_str(&format!("func {go_method_name}() {{\n"));
            out.push_str("// TODO: implement; fix signature\n");
            out.push_str("}\n");
            out.push('\n');
        }

        GeneratedFile {
            path: self.go_path(go_name, true),
            content: out,
        }
    }
}
