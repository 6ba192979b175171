//! Target generators — trait-based dispatch plus the declaration-order
//! driver that walks the model and writes each artifact.

pub mod go;
pub mod java;
mod wrap;

use crate::model::{ApiRoot, ClassDefinition, EnumDefinition, GitInfo, StructDefinition};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which binding ecosystem to generate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Java,
    Go,
}

/// One rendered artifact: a path relative to the target's output directory
/// plus the complete file text.
#[derive(Debug)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

/// One entry point per definition kind. Implementations are pure readers of
/// the shared [`ApiRoot`]; the driver owns all file I/O.
pub trait Generator {
    fn generate_enum(&self, def: &EnumDefinition) -> GeneratedFile;
    fn generate_struct(&self, def: &StructDefinition) -> GeneratedFile;
    /// May emit a partial-capability scaffold rather than a complete binding.
    fn generate_class(&self, def: &ClassDefinition) -> GeneratedFile;
}

pub fn create_generator<'a>(target: Target, api: &'a ApiRoot) -> Box<dyn Generator + 'a> {
    match target {
        Target::Java => Box::new(java::JavaGenerator::new(api)),
        Target::Go => Box::new(go::GoGenerator::new(api)),
    }
}

/// Walk every definition in declaration order and write one file each.
/// The output directory itself must already exist.
pub fn generate_files(generator: &dyn Generator, api: &ApiRoot, output_dir: &Path) -> Result<()> {
    if !output_dir.is_dir() {
        bail!("output directory doesn't exist: {}", output_dir.display());
    }

    for def in api.enums.values() {
        write_file(output_dir, generator.generate_enum(def))?;
    }
    for def in api.structs.values() {
        write_file(output_dir, generator.generate_struct(def))?;
    }
    for def in api.classes.values() {
        write_file(output_dir, generator.generate_class(def))?;
    }

    Ok(())
}

fn write_file(output_dir: &Path, file: GeneratedFile) -> Result<()> {
    let path = output_dir.join(&file.path);
    debug!("writing {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(&path, &file.content).with_context(|| format!("failed to write {}", path.display()))
}

/// Fixed-format provenance header identifying the generator and the exact
/// source revision. Written at the top of every generated file.
pub(crate) fn autogen_comment(git_info: &GitInfo) -> String {
    format!(
        "// Code generated by rocgen from roc-streaming/bindgen\n\
         // roc-toolkit git tag: {}, commit: {}\n",
        git_info.tag, git_info.commit
    )
}
