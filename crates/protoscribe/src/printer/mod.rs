//! Schema source printing.
//!
//! [`SchemaPrinter`] walks a resolved [`FileDescriptor`] depth-first and writes
//! the equivalent `.proto` source. The layout follows the reference compiler:
//!
//! 1. `syntax`, `package`, file options, imports
//! 2. services
//! 3. messages, each body ordered as reserved names, reserved ranges,
//!    extension ranges, nested messages, nested enums, plain fields, proto3
//!    `optional` fields, oneofs, extensions
//! 4. enums
//! 5. top-level extensions
//!
//! Proto2 groups are written inline as `group Name = N { ... }` with the
//! body they declare. Output is deterministic: the same tree always yields
//! the same bytes.

mod literal;
mod options;
mod writer;

use crate::descriptor::{
    Cardinality, Enum, Extension, Field, FieldType, FileDescriptor, ImportKind, Message, Method,
    Service, Syntax,
};
use crate::MAX_FIELD_NUMBER;
use std::fmt::{Result, Write};
use tracing::trace;
use writer::IndentWriter;

/// Configuration for schema printing
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Indentation string (default: 2 spaces)
    pub indent: String,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

impl PrinterConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent(mut self, s: impl Into<String>) -> Self {
        self.indent = s.into();
        self
    }
}

/// Renders a file descriptor as schema source with the default config
pub fn render(file: &FileDescriptor) -> String {
    SchemaPrinter::new(file).render()
}

/// Prints one [`FileDescriptor`] as `.proto` source
#[derive(Debug)]
pub struct SchemaPrinter<'a> {
    file: &'a FileDescriptor,
    config: PrinterConfig,
}

impl<'a> SchemaPrinter<'a> {
    /// Creates a printer for a file with the default config
    pub fn new(file: &'a FileDescriptor) -> Self {
        Self {
            file,
            config: PrinterConfig::default(),
        }
    }

    /// Replaces the printer config
    pub fn with_config(mut self, config: PrinterConfig) -> Self {
        self.config = config;
        self
    }

    /// Renders the schema source as a string
    pub fn render(&self) -> String {
        let mut output = String::new();
        self.write_to(&mut output).expect("String write cannot fail");
        output
    }

    /// Writes the schema source to a writer
    pub fn write_to(&self, w: &mut impl Write) -> Result {
        let mut emitter = Emitter {
            w: IndentWriter::new(w, &self.config.indent),
            syntax: self.file.syntax,
        };
        emitter.file(self.file)
    }
}

/// Structural position of a field being printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldContext {
    /// Directly in a message body or extend block
    NotInOneof,
    /// Member of an authored oneof
    InOneof,
    /// Sole member of a synthetic oneof, printed at message level
    InSyntheticOneof,
}

struct Emitter<'a, W: Write> {
    w: IndentWriter<'a, W>,
    syntax: Syntax,
}

impl<W: Write> Emitter<'_, W> {
    fn file(&mut self, file: &FileDescriptor) -> Result {
        self.w.line(format_args!("syntax = \"{}\";", file.syntax))?;
        self.w.blank()?;

        if !file.package.is_empty() {
            self.w.line(format_args!("package {};", file.package))?;
            self.w.blank()?;
        }

        self.file_options(file)?;
        self.imports(file)?;

        for service in &file.services {
            self.service(service)?;
        }

        for message in &file.messages {
            self.message(message)?;
        }

        for enum_type in &file.enums {
            self.enum_type(enum_type)?;
        }

        self.extensions(&file.extensions)
    }

    fn file_options(&mut self, file: &FileDescriptor) -> Result {
        let mut wrote_option = false;

        for (key, value) in options::present(&file.options) {
            self.w.line(format_args!("option {} = {};", key, value))?;
            wrote_option = true;
        }

        if wrote_option {
            self.w.blank()?;
        }

        Ok(())
    }

    fn imports(&mut self, file: &FileDescriptor) -> Result {
        if file.imports.is_empty() {
            return Ok(());
        }

        for import in &file.imports {
            let modifier = match import.kind {
                ImportKind::Public => "public ",
                ImportKind::Weak => "weak ",
                ImportKind::Plain => "",
            };
            self.w
                .line(format_args!("import {}\"{}\";", modifier, import.path))?;
        }

        self.w.blank()
    }

    fn service(&mut self, service: &Service) -> Result {
        self.w.open(format_args!("service {} {{", service.name))?;

        for method in &service.methods {
            self.method(method)?;
        }

        self.w.close()?;
        self.w.blank()
    }

    fn method(&mut self, method: &Method) -> Result {
        let stream = |streaming: bool| if streaming { "stream " } else { "" };

        self.w.line(format_args!(
            "rpc {} ({}.{}) returns ({}.{}) {{}}",
            method.name,
            stream(method.client_streaming),
            method.input_type,
            stream(method.server_streaming),
            method.output_type
        ))
    }

    fn message(&mut self, message: &Message) -> Result {
        self.w.open(format_args!("message {} {{", message.name))?;
        self.message_body(message)?;
        self.w.close()?;
        self.w.blank()
    }

    fn message_body(&mut self, message: &Message) -> Result {
        for name in &message.reserved_names {
            self.w.line(format_args!("reserved \"{}\";", name))?;
        }

        for range in &message.reserved_ranges {
            let (start, end) = range.inclusive();
            self.w.line(format_args!(
                "reserved {};",
                literal::range(start, end, MAX_FIELD_NUMBER as i32)
            ))?;
        }

        for range in &message.extension_ranges {
            let (start, end) = range.inclusive();
            self.w.line(format_args!(
                "extensions {};",
                literal::range(start, end, MAX_FIELD_NUMBER as i32)
            ))?;
        }

        for nested in &message.messages {
            self.message(nested)?;
        }

        for enum_type in &message.enums {
            self.enum_type(enum_type)?;
        }

        for field in message.plain_fields() {
            self.field(field, FieldContext::NotInOneof)?;
        }

        // Recompiled, these become plain fields ahead of every oneof block
        for oneof in message.oneofs.iter().filter(|o| o.synthetic) {
            for field in message.oneof_fields(oneof) {
                self.field(field, FieldContext::InSyntheticOneof)?;
            }
        }

        for oneof in message.oneofs.iter().filter(|o| !o.synthetic) {
            if oneof.fields.is_empty() {
                trace!("Skipping empty oneof {}.{}", message.full_name, oneof.name);
                continue;
            }

            self.w.open(format_args!("oneof {} {{", oneof.name))?;
            for field in message.oneof_fields(oneof) {
                self.field(field, FieldContext::InOneof)?;
            }
            self.w.close()?;
        }

        self.extensions(&message.extensions)
    }

    fn field(&mut self, field: &Field, context: FieldContext) -> Result {
        let modifier = self.modifier(field, context);

        if let FieldType::Group(body) = &field.ty {
            self.w.open(format_args!(
                "{}group {} = {}{} {{",
                modifier,
                body.name,
                field.number,
                field_options(field)
            ))?;
            self.message_body(body)?;
            return self.w.close();
        }

        self.w.line(format_args!(
            "{}{} {} = {}{};",
            modifier,
            literal::type_name(&field.ty),
            field.name,
            field.number,
            field_options(field)
        ))
    }

    fn modifier(&self, field: &Field, context: FieldContext) -> &'static str {
        if context != FieldContext::NotInOneof {
            return "";
        }

        if field.optional_keyword {
            "optional "
        } else if field.cardinality == Cardinality::Repeated && !field.ty.is_map() {
            "repeated "
        } else if field.cardinality == Cardinality::Required && self.syntax == Syntax::Proto2 {
            "required "
        } else {
            ""
        }
    }

    fn enum_type(&mut self, enum_type: &Enum) -> Result {
        self.w.open(format_args!("enum {} {{", enum_type.name))?;

        if enum_type.allow_alias {
            self.w.line(format_args!("option allow_alias = true;"))?;
        }

        for name in &enum_type.reserved_names {
            self.w.line(format_args!("reserved \"{}\";", name))?;
        }

        for &(start, end) in &enum_type.reserved_ranges {
            self.w.line(format_args!(
                "reserved {};",
                literal::range(start, end, i32::MAX)
            ))?;
        }

        for value in &enum_type.values {
            let deprecated = if value.deprecated {
                " [deprecated = true]"
            } else {
                ""
            };
            self.w
                .line(format_args!("{} = {}{};", value.name, value.number, deprecated))?;
        }

        self.w.close()?;
        self.w.blank()
    }

    /// Writes extension fields, one `extend` block per run of equal extendees
    fn extensions(&mut self, extensions: &[Extension]) -> Result {
        let mut rest = extensions;

        while let Some(first) = rest.first() {
            let len = rest
                .iter()
                .take_while(|e| e.extendee == first.extendee)
                .count();
            let (group, tail) = rest.split_at(len);

            self.w.open(format_args!("extend .{} {{", first.extendee))?;
            for extension in group {
                self.field(&extension.field, FieldContext::NotInOneof)?;
            }
            self.w.close()?;
            self.w.blank()?;

            rest = tail;
        }

        Ok(())
    }
}

/// The bracketed option clause after a field number, or an empty string
fn field_options(field: &Field) -> String {
    let mut options = Vec::new();

    if let Some(default) = &field.default {
        options.push(format!(
            "default = {}",
            literal::default_value(&field.ty, default)
        ));
    }

    if let Some(json_name) = &field.json_name {
        options.push(format!(
            "json_name=\"{}\"",
            literal::escape_string(json_name)
        ));
    }

    if let Some(packed) = field.packed {
        options.push(format!("packed = {}", packed));
    }

    if field.deprecated {
        options.push("deprecated = true".to_string());
    }

    if options.is_empty() {
        String::new()
    } else {
        format!(" [{}]", options.join(", "))
    }
}
