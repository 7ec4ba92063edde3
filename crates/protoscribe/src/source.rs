//! Entry point from compiled descriptors to schema source.
//!
//! [`ProtoSource`] owns one resolved [`FileDescriptor`] and renders it. It can
//! be built from raw `FileDescriptorProto` bytes, from a decoded record, from a
//! `prost-reflect` pool, or directly from a tree built by the caller. Every
//! failure surfaces while constructing it; rendering cannot fail.

use crate::descriptor::resolve::resolve_file;
use crate::descriptor::{FileDescriptor, Syntax};
use crate::error::{Error, Result};
use crate::printer::{PrinterConfig, SchemaPrinter};
use bytes::Buf;
use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use std::fmt::Write as FmtWrite;
use std::path::Path;
use tracing::debug;

/// A resolved schema file ready to be rendered
#[derive(Debug, Clone)]
pub struct ProtoSource {
    /// The resolved file descriptor
    descriptor: FileDescriptor,
    /// Configuration
    config: PrinterConfig,
}

impl ProtoSource {
    /// Creates a new source from raw `FileDescriptorProto` bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::decode(data)
    }

    /// Creates a new source by decoding a `FileDescriptorProto` from a buffer
    pub fn decode(buf: impl Buf) -> Result<Self> {
        let proto = FileDescriptorProto::decode(buf)?;
        debug!("Decoded descriptor for {}", proto.name());
        Self::from_proto(&proto)
    }

    /// Creates a new source from a decoded `FileDescriptorProto`
    pub fn from_proto(proto: &FileDescriptorProto) -> Result<Self> {
        Ok(Self::from_descriptor(resolve_file(proto)?))
    }

    /// Creates a new source from a file held by a `prost-reflect` pool
    pub fn from_reflect(file: &prost_reflect::FileDescriptor) -> Result<Self> {
        Self::from_proto(file.file_descriptor_proto())
    }

    /// Creates a new source from the named file of a descriptor pool
    pub fn from_pool(pool: &DescriptorPool, name: &str) -> Result<Self> {
        let file = pool
            .get_file_by_name(name)
            .ok_or_else(|| Error::file_not_found(name))?;
        Self::from_reflect(&file)
    }

    /// Creates a new source from an already resolved tree
    pub fn from_descriptor(descriptor: FileDescriptor) -> Self {
        Self {
            descriptor,
            config: PrinterConfig::default(),
        }
    }

    /// Creates a new source with custom config
    pub fn with_config(mut self, config: PrinterConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the declared path of the file
    pub fn filename(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns a suggested output path for the rendered source.
    ///
    /// A `go_package` of the form `import/path;package_name` places the file
    /// under `import/path`, with `.`, `..` and repeated separators cleaned
    /// out of the joined path. Otherwise the declared path is returned
    /// unchanged.
    pub fn suggested_path(&self) -> String {
        let declared = self.descriptor.name.as_str();

        let Some((import_path, _)) = self
            .descriptor
            .options
            .go_package
            .as_deref()
            .and_then(|go_package| go_package.split_once(';'))
        else {
            return declared.to_string();
        };

        let base = Path::new(declared)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(declared);

        clean_join(import_path, base)
    }

    /// Returns the proto syntax version
    pub fn syntax(&self) -> Syntax {
        self.descriptor.syntax
    }

    /// Returns the resolved file descriptor
    pub fn descriptor(&self) -> &FileDescriptor {
        &self.descriptor
    }

    /// Consumes the source, returning the resolved file descriptor
    pub fn into_descriptor(self) -> FileDescriptor {
        self.descriptor
    }

    /// Render the schema source as a string
    pub fn render(&self) -> String {
        self.printer().render()
    }

    /// Render the schema source with a one-off config
    pub fn render_with(&self, config: &PrinterConfig) -> String {
        SchemaPrinter::new(&self.descriptor)
            .with_config(config.clone())
            .render()
    }

    /// Write the schema source to a writer
    pub fn write_to(&self, w: &mut impl FmtWrite) -> std::fmt::Result {
        self.printer().write_to(w)
    }

    fn printer(&self) -> SchemaPrinter<'_> {
        SchemaPrinter::new(&self.descriptor).with_config(self.config.clone())
    }
}

/// Decodes a serialized `FileDescriptorSet` into one source per file.
///
/// Files are returned in set order. Any file that fails to resolve fails the
/// whole set.
pub fn decode_set(data: &[u8]) -> Result<Vec<ProtoSource>> {
    let set = FileDescriptorSet::decode(data)?;
    debug!("Decoded descriptor set with {} files", set.file.len());

    set.file.iter().map(ProtoSource::from_proto).collect()
}

/// Joins two slash-separated paths and lexically cleans the result
fn clean_join(dir: &str, file: &str) -> String {
    let rooted = dir.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in dir.split('/').chain(file.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|&last| last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
