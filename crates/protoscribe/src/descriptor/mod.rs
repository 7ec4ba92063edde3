//! Resolved descriptor tree.
//!
//! These types are the navigable, type-bound form of a single schema file.
//! They are built once (usually by [`resolve`](resolve::resolve_file) from a
//! decoded `FileDescriptorProto`) and are read-only from then on. All type
//! references are stored as fully-qualified names without the leading dot.

pub mod resolve;

use std::fmt;

/// Proto syntax version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// Legacy proto2 syntax
    #[default]
    Proto2,
    /// Modern proto3 syntax
    Proto3,
}

impl Syntax {
    /// Returns the syntax declaration string
    pub fn as_str(&self) -> &'static str {
        match self {
            Syntax::Proto2 => "proto2",
            Syntax::Proto3 => "proto3",
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete schema file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDescriptor {
    /// Declared path of the file, e.g. `foo/bar.proto`
    pub name: String,
    /// Syntax mode
    pub syntax: Syntax,
    /// Dot-qualified package name, possibly empty
    pub package: String,
    /// Imports in declaration order
    pub imports: Vec<Import>,
    /// Top-level messages
    pub messages: Vec<Message>,
    /// Top-level enums
    pub enums: Vec<Enum>,
    /// Services
    pub services: Vec<Service>,
    /// Top-level extension fields
    pub extensions: Vec<Extension>,
    /// File-level options
    pub options: FileOptions,
}

/// How an import is re-exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportKind {
    /// Plain `import`
    #[default]
    Plain,
    /// `import public`, re-exported to importers of this file
    Public,
    /// `import weak`
    Weak,
}

/// An imported file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Path of the imported file
    pub path: String,
    /// Re-export mode
    pub kind: ImportKind,
}

impl Import {
    /// Creates a plain import
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ImportKind::Plain,
        }
    }

    /// Creates a public import
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ImportKind::Public,
        }
    }
}

/// A span of numbers stored with an exclusive end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedRange {
    /// First number in the range
    pub start: i32,
    /// One past the last number in the range
    pub end: i32,
}

impl ReservedRange {
    /// Creates a range from its stored (end-exclusive) bounds
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Returns the inclusive display bounds.
    ///
    /// Inverted bounds are swapped before the exclusive end is converted.
    pub fn inclusive(&self) -> (i32, i32) {
        let (start, end) = if self.start > self.end {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        (start, end.saturating_sub(1))
    }
}

/// A message definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    /// Short name
    pub name: String,
    /// Fully-qualified name
    pub full_name: String,
    /// Nested messages, excluding synthesized map entries and group bodies
    pub messages: Vec<Message>,
    /// Nested enums
    pub enums: Vec<Enum>,
    /// Fields in declaration order, oneof members included
    pub fields: Vec<Field>,
    /// Oneofs in declaration order
    pub oneofs: Vec<Oneof>,
    /// Reserved field-number ranges
    pub reserved_ranges: Vec<ReservedRange>,
    /// Reserved field names
    pub reserved_names: Vec<String>,
    /// Extension number ranges
    pub extension_ranges: Vec<ReservedRange>,
    /// Extension fields declared inside this message
    pub extensions: Vec<Extension>,
}

impl Message {
    /// Fields that do not belong to any oneof
    pub fn plain_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.oneof.is_none())
    }

    /// Member fields of a oneof of this message, in declaration order
    pub fn oneof_fields<'a>(&'a self, oneof: &'a Oneof) -> impl Iterator<Item = &'a Field> {
        oneof.fields.iter().filter_map(|&i| self.fields.get(i))
    }
}

/// Scalar field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `double`
    Double,
    /// `float`
    Float,
    /// `int64`
    Int64,
    /// `uint64`
    Uint64,
    /// `int32`
    Int32,
    /// `fixed64`
    Fixed64,
    /// `fixed32`
    Fixed32,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// `bytes`
    Bytes,
    /// `uint32`
    Uint32,
    /// `sfixed32`
    Sfixed32,
    /// `sfixed64`
    Sfixed64,
    /// `sint32`
    Sint32,
    /// `sint64`
    Sint64,
}

impl ScalarKind {
    /// Returns the keyword used in schema source
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Int32 => "int32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
        }
    }
}

/// The type of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A scalar kind
    Scalar(ScalarKind),
    /// Reference to a message by full name
    Message(String),
    /// Reference to an enum by full name
    Enum(String),
    /// A synthesized map type
    Map {
        /// Key type, always scalar
        key: ScalarKind,
        /// Value type
        value: Box<FieldType>,
    },
    /// A legacy proto2 group, carrying the body it declares
    Group(Box<Message>),
}

impl FieldType {
    /// Returns true for map-typed fields
    pub fn is_map(&self) -> bool {
        matches!(self, FieldType::Map { .. })
    }
}

/// Field multiplicity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// At most one value
    #[default]
    Singular,
    /// Any number of values
    Repeated,
    /// Exactly one value; legal only in proto2
    Required,
}

/// A field definition
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Declared field number
    pub number: i32,
    /// Field type
    pub ty: FieldType,
    /// Multiplicity
    pub cardinality: Cardinality,
    /// Whether the source carried an explicit `optional` keyword
    pub optional_keyword: bool,
    /// Default value as stored in the descriptor
    pub default: Option<String>,
    /// json_name, only when it differs from the derived one
    pub json_name: Option<String>,
    /// Index into the enclosing message's oneofs
    pub oneof: Option<usize>,
    /// Explicit `packed` option
    pub packed: Option<bool>,
    /// `deprecated = true`
    pub deprecated: bool,
}

impl Field {
    /// Creates a singular field with no options
    pub fn new(name: impl Into<String>, number: i32, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            number,
            ty,
            cardinality: Cardinality::Singular,
            optional_keyword: false,
            default: None,
            json_name: None,
            oneof: None,
            packed: None,
            deprecated: false,
        }
    }
}

/// A oneof group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Oneof {
    /// Oneof name
    pub name: String,
    /// Indices of member fields in the enclosing message's field list
    pub fields: Vec<usize>,
    /// Compiler-generated wrapper for a proto3 `optional` field
    pub synthetic: bool,
}

/// An extension field together with the message it extends
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    /// Full name of the extended message
    pub extendee: String,
    /// The extension field
    pub field: Field,
}

/// An enum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name
    pub name: String,
    /// Numeric value
    pub number: i32,
    /// `deprecated = true`
    pub deprecated: bool,
}

impl EnumValue {
    /// Creates a value with no options
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
            deprecated: false,
        }
    }
}

/// An enum definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enum {
    /// Short name
    pub name: String,
    /// Fully-qualified name
    pub full_name: String,
    /// Values in declaration order
    pub values: Vec<EnumValue>,
    /// `option allow_alias = true`
    pub allow_alias: bool,
    /// Reserved value ranges, inclusive on both ends
    pub reserved_ranges: Vec<(i32, i32)>,
    /// Reserved value names
    pub reserved_names: Vec<String>,
}

/// A service definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    /// Service name
    pub name: String,
    /// Methods in declaration order
    pub methods: Vec<Method>,
}

/// An RPC method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Full name of the request message
    pub input_type: String,
    /// Full name of the response message
    pub output_type: String,
    /// Request is a stream
    pub client_streaming: bool,
    /// Response is a stream
    pub server_streaming: bool,
}

/// `optimize_for` modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeMode {
    /// `SPEED`
    Speed,
    /// `CODE_SIZE`
    CodeSize,
    /// `LITE_RUNTIME`
    LiteRuntime,
}

impl OptimizeMode {
    /// Returns the identifier used in schema source
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizeMode::Speed => "SPEED",
            OptimizeMode::CodeSize => "CODE_SIZE",
            OptimizeMode::LiteRuntime => "LITE_RUNTIME",
        }
    }
}

/// File-level options that can be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    /// `java_package`
    pub java_package: Option<String>,
    /// `java_outer_classname`
    pub java_outer_classname: Option<String>,
    /// `java_multiple_files`
    pub java_multiple_files: Option<bool>,
    /// `java_string_check_utf8`
    pub java_string_check_utf8: Option<bool>,
    /// `optimize_for`
    pub optimize_for: Option<OptimizeMode>,
    /// `go_package`
    pub go_package: Option<String>,
    /// `cc_generic_services`
    pub cc_generic_services: Option<bool>,
    /// `java_generic_services`
    pub java_generic_services: Option<bool>,
    /// `py_generic_services`
    pub py_generic_services: Option<bool>,
    /// `deprecated`
    pub deprecated: Option<bool>,
    /// `cc_enable_arenas`
    pub cc_enable_arenas: Option<bool>,
    /// `objc_class_prefix`
    pub objc_class_prefix: Option<String>,
    /// `csharp_namespace`
    pub csharp_namespace: Option<String>,
    /// `swift_prefix`
    pub swift_prefix: Option<String>,
    /// `php_class_prefix`
    pub php_class_prefix: Option<String>,
    /// `php_namespace`
    pub php_namespace: Option<String>,
    /// `php_metadata_namespace`
    pub php_metadata_namespace: Option<String>,
    /// `ruby_package`
    pub ruby_package: Option<String>,
}
