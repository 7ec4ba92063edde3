//! # protoscribe
//!
//! A library for reconstructing `.proto` schema source from compiled file descriptors.
//!
//! This crate provides the core functionality for:
//! - Decoding binary `FileDescriptorProto` records (and whole descriptor sets)
//! - Resolving them into a navigable, type-bound descriptor tree
//! - Printing that tree back out as schema source that recompiles to an
//!   equivalent descriptor
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`descriptor`]: The resolved descriptor tree and its construction
//! - [`printer`]: Schema source printing
//! - [`source`]: The decode, resolve and render pipeline
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use protoscribe::ProtoSource;
//! use std::fs;
//!
//! // A FileDescriptorProto, e.g. extracted from a binary
//! let data = fs::read("./descriptor.bin")?;
//!
//! let source = ProtoSource::from_bytes(&data)?;
//! println!("// {}", source.suggested_path());
//! println!("{}", source.render());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Callers that already hold a tree can skip decoding entirely:
//!
//! ```
//! use protoscribe::descriptor::{FileDescriptor, Syntax};
//!
//! let file = FileDescriptor {
//!     syntax: Syntax::Proto3,
//!     package: "example".into(),
//!     ..Default::default()
//! };
//! assert_eq!(
//!     protoscribe::render(&file),
//!     "syntax = \"proto3\";\n\npackage example;\n\n"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod descriptor;
pub mod error;
pub mod printer;
pub mod source;

// Re-export primary types for convenience
pub use descriptor::FileDescriptor;
pub use error::{Error, ErrorKind, Result};
pub use printer::{render, PrinterConfig, SchemaPrinter};
pub use source::{decode_set, ProtoSource};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum valid protobuf field number (2^29 - 1)
/// Used for `reserved X to max` ranges
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;
