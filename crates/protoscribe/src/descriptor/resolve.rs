//! Binding a decoded `FileDescriptorProto` into a [`FileDescriptor`] tree.
//!
//! Resolution works on a single file. Type references that start with a dot
//! are taken as fully qualified. References without one are searched for from
//! the innermost enclosing scope outward among the types this file declares;
//! anything not found is kept as written, provided the descriptor says whether
//! it is a message or an enum.
//!
//! Map entry messages and group bodies are folded into the fields that use
//! them and never appear as nested messages of their own.

use super::{
    Cardinality, Enum, EnumValue, Extension, Field, FieldType, FileDescriptor, FileOptions, Import,
    ImportKind, Message, Method, Oneof, OptimizeMode, ReservedRange, ScalarKind, Service, Syntax,
};
use crate::error::{Error, Result};
use crate::MAX_FIELD_NUMBER;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::file_options::OptimizeMode as ProtoOptimizeMode;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    ServiceDescriptorProto,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

impl TryFrom<&str> for Syntax {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "" | "proto2" => Ok(Syntax::Proto2),
            "proto3" => Ok(Syntax::Proto3),
            _ => Err(Error::UnsupportedSyntax {
                syntax: value.to_string(),
            }),
        }
    }
}

/// Resolves a decoded file descriptor record into a navigable tree
pub fn resolve_file(proto: &FileDescriptorProto) -> Result<FileDescriptor> {
    let resolver = Resolver::new(proto)?;
    let file = resolver.resolve()?;

    debug!(
        "Resolved {} ({}): {} messages, {} enums, {} services",
        file.name,
        file.syntax,
        file.messages.len(),
        file.enums.len(),
        file.services.len()
    );

    Ok(file)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolKind {
    Message,
    Enum,
}

/// Nested types folded into the fields of one scope, by full name
type Folded<'a> = HashMap<String, &'a DescriptorProto>;

struct Resolver<'a> {
    proto: &'a FileDescriptorProto,
    syntax: Syntax,
    symbols: HashMap<String, SymbolKind>,
}

impl<'a> Resolver<'a> {
    fn new(proto: &'a FileDescriptorProto) -> Result<Self> {
        let syntax = Syntax::try_from(proto.syntax())?;

        let mut symbols = HashMap::new();
        for message in &proto.message_type {
            collect_message_symbols(message, proto.package(), &mut symbols);
        }
        for enum_type in &proto.enum_type {
            symbols.insert(qualify(proto.package(), enum_type.name()), SymbolKind::Enum);
        }

        Ok(Self {
            proto,
            syntax,
            symbols,
        })
    }

    fn resolve(&self) -> Result<FileDescriptor> {
        let package = self.proto.package();

        let groups = self.group_bodies(&self.proto.extension, package);
        let (messages, folded) = self.nested_messages(&self.proto.message_type, &groups, package)?;
        let enums = self
            .proto
            .enum_type
            .iter()
            .map(|e| enum_type(e, package))
            .collect::<Result<Vec<_>>>()?;
        let services = self
            .proto
            .service
            .iter()
            .map(|s| self.service(s))
            .collect::<Result<Vec<_>>>()?;
        let extensions = self
            .proto
            .extension
            .iter()
            .map(|f| self.extension(f, package, &folded))
            .collect::<Result<Vec<_>>>()?;

        Ok(FileDescriptor {
            name: self.proto.name().to_string(),
            syntax: self.syntax,
            package: package.to_string(),
            imports: imports(self.proto),
            messages,
            enums,
            services,
            extensions,
            options: self
                .proto
                .options
                .as_ref()
                .map(file_options)
                .unwrap_or_default(),
        })
    }

    fn message(&self, message: &DescriptorProto, scope: &str) -> Result<Message> {
        if message.name().is_empty() {
            return Err(Error::missing_name(format!("message in '{}'", scope)));
        }
        let full_name = qualify(scope, message.name());

        let groups = self.group_bodies(message.field.iter().chain(&message.extension), &full_name);
        let (messages, folded) = self.nested_messages(&message.nested_type, &groups, &full_name)?;

        let enums = message
            .enum_type
            .iter()
            .map(|e| enum_type(e, &full_name))
            .collect::<Result<Vec<_>>>()?;

        let mut oneofs = message
            .oneof_decl
            .iter()
            .map(|o| {
                if o.name().is_empty() {
                    return Err(Error::missing_name(format!("oneof in '{}'", full_name)));
                }
                Ok(Oneof {
                    name: o.name().to_string(),
                    fields: Vec::new(),
                    synthetic: false,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut fields = Vec::with_capacity(message.field.len());
        for (i, proto_field) in message.field.iter().enumerate() {
            let mut field = self.field(proto_field, &full_name, &folded)?;

            if let Some(index) = proto_field.oneof_index {
                let oneof = usize::try_from(index)
                    .ok()
                    .and_then(|idx| oneofs.get_mut(idx).map(|o| (idx, o)));
                let Some((idx, oneof)) = oneof else {
                    return Err(Error::InvalidOneofIndex {
                        field: qualify(&full_name, proto_field.name()),
                        index,
                    });
                };
                oneof.fields.push(i);
                field.oneof = Some(idx);
            }

            fields.push(field);
        }

        for oneof in &mut oneofs {
            oneof.synthetic = match oneof.fields.as_slice() {
                [only] => message.field[*only].proto3_optional(),
                _ => false,
            };
        }

        let extensions = message
            .extension
            .iter()
            .map(|f| self.extension(f, &full_name, &folded))
            .collect::<Result<Vec<_>>>()?;

        Ok(Message {
            name: message.name().to_string(),
            messages,
            enums,
            fields,
            oneofs,
            reserved_ranges: message
                .reserved_range
                .iter()
                .map(|r| ReservedRange::new(r.start(), r.end()))
                .collect(),
            reserved_names: message.reserved_name.clone(),
            extension_ranges: message
                .extension_range
                .iter()
                .map(|r| ReservedRange::new(r.start(), r.end()))
                .collect(),
            extensions,
            full_name,
        })
    }

    /// Resolves the nested messages of a scope, setting aside map entries and group bodies
    fn nested_messages<'p>(
        &self,
        nested: &'p [DescriptorProto],
        groups: &HashSet<String>,
        scope: &str,
    ) -> Result<(Vec<Message>, Folded<'p>)> {
        let mut messages = Vec::new();
        let mut folded = Folded::new();

        for message in nested {
            let full_name = qualify(scope, message.name());
            if is_map_entry(message) {
                trace!("Hiding map entry {}", full_name);
            } else if groups.contains(&full_name) {
                trace!("Folding group body {}", full_name);
            } else {
                messages.push(self.message(message, scope)?);
                continue;
            }
            folded.insert(full_name, message);
        }

        Ok((messages, folded))
    }

    /// Full names of the messages declared as group bodies by `fields`
    fn group_bodies<'f>(
        &self,
        fields: impl IntoIterator<Item = &'f FieldDescriptorProto>,
        scope: &str,
    ) -> HashSet<String> {
        fields
            .into_iter()
            .filter(|f| f.r#type == Some(Type::Group as i32))
            .map(|f| self.bind(f.type_name(), scope).0)
            .collect()
    }

    fn field(
        &self,
        field: &FieldDescriptorProto,
        scope: &str,
        folded: &Folded<'_>,
    ) -> Result<Field> {
        if field.name().is_empty() {
            return Err(Error::missing_name(format!("field in '{}'", scope)));
        }
        let full_name = qualify(scope, field.name());

        let number = field.number();
        if number < 1 || number as u32 > MAX_FIELD_NUMBER {
            return Err(Error::InvalidFieldNumber {
                field: full_name,
                number,
                max: MAX_FIELD_NUMBER,
            });
        }

        let cardinality = match field.label() {
            Label::Repeated => Cardinality::Repeated,
            Label::Required => Cardinality::Required,
            Label::Optional => Cardinality::Singular,
        };

        let optional_keyword = field.proto3_optional()
            || (self.syntax == Syntax::Proto2
                && field.label() == Label::Optional
                && field.oneof_index.is_none());

        let ty = self.field_type(field, scope, &full_name, folded)?;

        let json_name = field
            .json_name
            .as_deref()
            .filter(|json_name| *json_name != default_json_name(field.name()))
            .map(str::to_string);

        let options = field.options.as_ref();

        Ok(Field {
            name: field.name().to_string(),
            number,
            ty,
            cardinality,
            optional_keyword,
            default: field.default_value.clone(),
            json_name,
            oneof: None,
            packed: options.and_then(|o| o.packed),
            deprecated: options.and_then(|o| o.deprecated).unwrap_or(false),
        })
    }

    fn field_type(
        &self,
        field: &FieldDescriptorProto,
        scope: &str,
        full_name: &str,
        folded: &Folded<'_>,
    ) -> Result<FieldType> {
        let type_name = field.type_name();
        let (target, known) = self.bind(type_name, scope);

        let kind = match field.r#type {
            Some(_) => {
                let ty = field.r#type();
                if let Some(scalar) = scalar_kind(ty) {
                    return Ok(FieldType::Scalar(scalar));
                }
                if ty == Type::Enum {
                    SymbolKind::Enum
                } else {
                    SymbolKind::Message
                }
            }
            None => known.ok_or_else(|| Error::unresolved_type(full_name, type_name))?,
        };

        if target.is_empty() {
            return Err(Error::unresolved_type(full_name, type_name));
        }

        if field.r#type == Some(Type::Group as i32) {
            let body = folded
                .get(&target)
                .ok_or_else(|| Error::unresolved_type(full_name, type_name))?;
            return Ok(FieldType::Group(Box::new(self.message(body, scope)?)));
        }

        match kind {
            SymbolKind::Enum => Ok(FieldType::Enum(target)),
            SymbolKind::Message => match folded.get(&target) {
                Some(entry) if field.label() == Label::Repeated && is_map_entry(entry) => {
                    self.map_type(entry, &target)
                }
                _ => Ok(FieldType::Message(target)),
            },
        }
    }

    fn map_type(&self, entry: &DescriptorProto, entry_name: &str) -> Result<FieldType> {
        let member = |number: i32, role: &str| {
            entry
                .field
                .iter()
                .find(|f| f.number() == number)
                .ok_or_else(|| Error::malformed_map_entry(entry_name, format!("missing {} field", role)))
        };
        let key_field = member(1, "key")?;
        let value_field = member(2, "value")?;

        let no_entries = Folded::new();
        let key_name = qualify(entry_name, key_field.name());
        let key = match self.field_type(key_field, entry_name, &key_name, &no_entries)? {
            FieldType::Scalar(kind) => kind,
            _ => return Err(Error::malformed_map_entry(entry_name, "key is not a scalar")),
        };
        let value_name = qualify(entry_name, value_field.name());
        let value = self.field_type(value_field, entry_name, &value_name, &no_entries)?;

        Ok(FieldType::Map {
            key,
            value: Box::new(value),
        })
    }

    fn extension(
        &self,
        field: &FieldDescriptorProto,
        scope: &str,
        folded: &Folded<'_>,
    ) -> Result<Extension> {
        let (extendee, _) = self.bind(field.extendee(), scope);
        if extendee.is_empty() {
            return Err(Error::unresolved_type(
                qualify(scope, field.name()),
                field.extendee(),
            ));
        }

        let mut field_def = self.field(field, scope, folded)?;
        if let Some(json_name) = field_def.json_name.take() {
            trace!("Dropping json_name {} on extension {}", json_name, field_def.name);
        }
        field_def.optional_keyword = field.proto3_optional()
            || (self.syntax == Syntax::Proto2 && field.label() == Label::Optional);

        Ok(Extension {
            extendee,
            field: field_def,
        })
    }

    fn service(&self, service: &ServiceDescriptorProto) -> Result<Service> {
        if service.name().is_empty() {
            return Err(Error::missing_name("service"));
        }
        let package = self.proto.package();
        let service_name = qualify(package, service.name());

        let methods = service
            .method
            .iter()
            .map(|method| {
                if method.name().is_empty() {
                    return Err(Error::missing_name(format!("method in '{}'", service_name)));
                }
                let method_name = qualify(&service_name, method.name());
                let bind = |type_name: &str| {
                    let (target, _) = self.bind(type_name, package);
                    if target.is_empty() {
                        Err(Error::unresolved_type(&method_name, type_name))
                    } else {
                        Ok(target)
                    }
                };

                Ok(Method {
                    name: method.name().to_string(),
                    input_type: bind(method.input_type())?,
                    output_type: bind(method.output_type())?,
                    client_streaming: method.client_streaming(),
                    server_streaming: method.server_streaming(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Service {
            name: service.name().to_string(),
            methods,
        })
    }

    /// Binds a type reference to a full name, reporting its kind if the file declares it
    fn bind(&self, type_name: &str, scope: &str) -> (String, Option<SymbolKind>) {
        if let Some(absolute) = type_name.strip_prefix('.') {
            return (absolute.to_string(), self.symbols.get(absolute).copied());
        }
        if type_name.is_empty() {
            return (String::new(), None);
        }

        let mut scope = scope;
        loop {
            let candidate = qualify(scope, type_name);
            if let Some(kind) = self.symbols.get(&candidate) {
                return (candidate, Some(*kind));
            }
            if scope.is_empty() {
                break;
            }
            scope = scope.rfind('.').map_or("", |i| &scope[..i]);
        }

        (type_name.to_string(), None)
    }
}

fn collect_message_symbols(
    message: &DescriptorProto,
    scope: &str,
    symbols: &mut HashMap<String, SymbolKind>,
) {
    let full_name = qualify(scope, message.name());
    for nested in &message.nested_type {
        collect_message_symbols(nested, &full_name, symbols);
    }
    for enum_type in &message.enum_type {
        symbols.insert(qualify(&full_name, enum_type.name()), SymbolKind::Enum);
    }
    symbols.insert(full_name, SymbolKind::Message);
}

fn enum_type(enum_type: &EnumDescriptorProto, scope: &str) -> Result<Enum> {
    if enum_type.name().is_empty() {
        return Err(Error::missing_name(format!("enum in '{}'", scope)));
    }

    Ok(Enum {
        name: enum_type.name().to_string(),
        full_name: qualify(scope, enum_type.name()),
        values: enum_type
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name().to_string(),
                number: v.number(),
                deprecated: v
                    .options
                    .as_ref()
                    .and_then(|o| o.deprecated)
                    .unwrap_or(false),
            })
            .collect(),
        allow_alias: enum_type
            .options
            .as_ref()
            .and_then(|o| o.allow_alias)
            .unwrap_or(false),
        reserved_ranges: enum_type
            .reserved_range
            .iter()
            .map(|r| (r.start(), r.end()))
            .collect(),
        reserved_names: enum_type.reserved_name.clone(),
    })
}

fn imports(proto: &FileDescriptorProto) -> Vec<Import> {
    let public_deps: HashSet<_> = proto.public_dependency.iter().map(|&i| i as usize).collect();
    let weak_deps: HashSet<_> = proto.weak_dependency.iter().map(|&i| i as usize).collect();

    proto
        .dependency
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let kind = if public_deps.contains(&i) {
                ImportKind::Public
            } else if weak_deps.contains(&i) {
                ImportKind::Weak
            } else {
                ImportKind::Plain
            };
            Import {
                path: path.clone(),
                kind,
            }
        })
        .collect()
}

fn file_options(opts: &prost_types::FileOptions) -> FileOptions {
    FileOptions {
        java_package: opts.java_package.clone(),
        java_outer_classname: opts.java_outer_classname.clone(),
        java_multiple_files: opts.java_multiple_files,
        java_string_check_utf8: opts.java_string_check_utf8,
        optimize_for: opts.optimize_for.map(|_| match opts.optimize_for() {
            ProtoOptimizeMode::Speed => OptimizeMode::Speed,
            ProtoOptimizeMode::CodeSize => OptimizeMode::CodeSize,
            ProtoOptimizeMode::LiteRuntime => OptimizeMode::LiteRuntime,
        }),
        go_package: opts.go_package.clone(),
        cc_generic_services: opts.cc_generic_services,
        java_generic_services: opts.java_generic_services,
        py_generic_services: opts.py_generic_services,
        deprecated: opts.deprecated,
        cc_enable_arenas: opts.cc_enable_arenas,
        objc_class_prefix: opts.objc_class_prefix.clone(),
        csharp_namespace: opts.csharp_namespace.clone(),
        swift_prefix: opts.swift_prefix.clone(),
        php_class_prefix: opts.php_class_prefix.clone(),
        php_namespace: opts.php_namespace.clone(),
        php_metadata_namespace: opts.php_metadata_namespace.clone(),
        ruby_package: opts.ruby_package.clone(),
    }
}

fn is_map_entry(message: &DescriptorProto) -> bool {
    message
        .options
        .as_ref()
        .and_then(|o| o.map_entry)
        .unwrap_or(false)
}

/// Scalar kind of a wire type; `None` for the ones named by reference
fn scalar_kind(ty: Type) -> Option<ScalarKind> {
    let kind = match ty {
        Type::Double => ScalarKind::Double,
        Type::Float => ScalarKind::Float,
        Type::Int64 => ScalarKind::Int64,
        Type::Uint64 => ScalarKind::Uint64,
        Type::Int32 => ScalarKind::Int32,
        Type::Fixed64 => ScalarKind::Fixed64,
        Type::Fixed32 => ScalarKind::Fixed32,
        Type::Bool => ScalarKind::Bool,
        Type::String => ScalarKind::String,
        Type::Bytes => ScalarKind::Bytes,
        Type::Uint32 => ScalarKind::Uint32,
        Type::Sfixed32 => ScalarKind::Sfixed32,
        Type::Sfixed64 => ScalarKind::Sfixed64,
        Type::Sint32 => ScalarKind::Sint32,
        Type::Sint64 => ScalarKind::Sint64,
        Type::Group | Type::Message | Type::Enum => return None,
    };
    Some(kind)
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

/// The json_name the compiler derives from a field name (lowerCamelCase)
pub(crate) fn default_json_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = false;

    for c in name.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{
        descriptor_proto::ReservedRange as ProtoReservedRange, FieldOptions, MessageOptions,
        MethodDescriptorProto, OneofDescriptorProto,
    };

    fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.into()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(ty as i32),
            json_name: Some(default_json_name(name)),
            ..Default::default()
        }
    }

    fn typed(mut f: FieldDescriptorProto, type_name: &str) -> FieldDescriptorProto {
        f.type_name = Some(type_name.into());
        f
    }

    fn file(syntax: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("test.proto".into()),
            package: Some("pkg".into()),
            syntax: Some(syntax.into()),
            message_type: messages,
            ..Default::default()
        }
    }

    #[test]
    fn test_syntax() {
        assert_eq!(Syntax::try_from("").unwrap(), Syntax::Proto2);
        assert_eq!(Syntax::try_from("proto2").unwrap(), Syntax::Proto2);
        assert_eq!(Syntax::try_from("proto3").unwrap(), Syntax::Proto3);
        assert!(Syntax::try_from("editions").is_err());
    }

    #[test]
    fn test_default_json_name() {
        assert_eq!(default_json_name("hello_world"), "helloWorld");
        assert_eq!(default_json_name("my_field_name"), "myFieldName");
        assert_eq!(default_json_name("simple"), "simple");
    }

    #[test]
    fn test_map_entry_desugaring() {
        let entry = DescriptorProto {
            name: Some("TagsEntry".into()),
            field: vec![
                field("key", 1, Type::String),
                typed(field("value", 2, Type::Message), ".pkg.Foo"),
            ],
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut tags = typed(field("tags", 1, Type::Message), ".pkg.Holder.TagsEntry");
        tags.label = Some(Label::Repeated as i32);
        let holder = DescriptorProto {
            name: Some("Holder".into()),
            field: vec![tags],
            nested_type: vec![entry],
            ..Default::default()
        };
        let foo = DescriptorProto {
            name: Some("Foo".into()),
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto3", vec![holder, foo])).unwrap();
        let holder = &resolved.messages[0];
        assert!(holder.messages.is_empty());
        assert_eq!(
            holder.fields[0].ty,
            FieldType::Map {
                key: ScalarKind::String,
                value: Box::new(FieldType::Message("pkg.Foo".into())),
            }
        );
    }

    #[test]
    fn test_group_body_is_folded() {
        let body = DescriptorProto {
            name: Some("Result".into()),
            field: vec![field("url", 2, Type::String)],
            ..Default::default()
        };
        let mut result = typed(field("result", 1, Type::Group), ".pkg.Search.Result");
        result.label = Some(Label::Repeated as i32);
        let search = DescriptorProto {
            name: Some("Search".into()),
            field: vec![result],
            nested_type: vec![body],
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto2", vec![search])).unwrap();
        let search = &resolved.messages[0];
        assert!(search.messages.is_empty());
        assert_eq!(search.fields[0].cardinality, Cardinality::Repeated);
        let FieldType::Group(body) = &search.fields[0].ty else {
            panic!("expected a group, got {:?}", search.fields[0].ty);
        };
        assert_eq!(body.full_name, "pkg.Search.Result");
        assert_eq!(body.fields[0].name, "url");
    }

    #[test]
    fn test_extension_group_body_is_folded() {
        let target = DescriptorProto {
            name: Some("Target".into()),
            ..Default::default()
        };
        let note = DescriptorProto {
            name: Some("Note".into()),
            field: vec![field("text", 1, Type::String)],
            ..Default::default()
        };
        let mut proto = file("proto2", vec![target, note]);
        let mut ext = typed(field("note", 100, Type::Group), ".pkg.Note");
        ext.extendee = Some(".pkg.Target".into());
        proto.extension = vec![ext];

        let resolved = resolve_file(&proto).unwrap();
        let names: Vec<_> = resolved.messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Target"]);
        assert!(matches!(
            &resolved.extensions[0].field.ty,
            FieldType::Group(body) if body.full_name == "pkg.Note"
        ));
    }

    #[test]
    fn test_group_without_body() {
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![typed(field("lost", 1, Type::Group), ".pkg.M.Lost")],
            ..Default::default()
        };

        let err = resolve_file(&file("proto2", vec![message])).unwrap_err();
        assert!(matches!(err, Error::UnresolvedType { .. }));
    }

    #[test]
    fn test_synthetic_oneof_and_optional_keyword() {
        let mut name = field("name", 1, Type::String);
        name.oneof_index = Some(0);
        name.proto3_optional = Some(true);
        let message = DescriptorProto {
            name: Some("Person".into()),
            field: vec![name, field("age", 2, Type::Int32)],
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("_name".into()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto3", vec![message])).unwrap();
        let person = &resolved.messages[0];
        assert!(person.oneofs[0].synthetic);
        assert_eq!(person.oneofs[0].fields, vec![0]);
        assert!(person.fields[0].optional_keyword);
        assert_eq!(person.fields[0].oneof, Some(0));
        assert!(!person.fields[1].optional_keyword);
    }

    #[test]
    fn test_proto2_optional_keyword() {
        let mut choice = field("choice", 2, Type::Int32);
        choice.oneof_index = Some(0);
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![field("plain", 1, Type::Int32), choice],
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("kind".into()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto2", vec![message])).unwrap();
        let m = &resolved.messages[0];
        assert!(m.fields[0].optional_keyword);
        assert!(!m.fields[1].optional_keyword);
        assert!(!m.oneofs[0].synthetic);
    }

    #[test]
    fn test_relative_type_names() {
        let inner = DescriptorProto {
            name: Some("Inner".into()),
            ..Default::default()
        };
        let mut untyped = field("sibling", 2, Type::Message);
        untyped.r#type = None;
        untyped.type_name = Some("Inner".into());
        let outer = DescriptorProto {
            name: Some("Outer".into()),
            field: vec![typed(field("inner", 1, Type::Message), "Inner"), untyped],
            nested_type: vec![inner],
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto3", vec![outer])).unwrap();
        let outer = &resolved.messages[0];
        assert_eq!(outer.fields[0].ty, FieldType::Message("pkg.Outer.Inner".into()));
        assert_eq!(outer.fields[1].ty, FieldType::Message("pkg.Outer.Inner".into()));
    }

    #[test]
    fn test_unresolved_untyped_reference() {
        let mut f = field("other", 1, Type::Message);
        f.r#type = None;
        f.type_name = Some("Elsewhere".into());
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![f],
            ..Default::default()
        };

        let err = resolve_file(&file("proto3", vec![message])).unwrap_err();
        assert!(matches!(err, Error::UnresolvedType { .. }));
    }

    #[test]
    fn test_json_name_override() {
        let mut renamed = field("user_id", 1, Type::Int64);
        renamed.json_name = Some("uid".into());
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![renamed, field("display_name", 2, Type::String)],
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto3", vec![message])).unwrap();
        assert_eq!(resolved.messages[0].fields[0].json_name.as_deref(), Some("uid"));
        assert_eq!(resolved.messages[0].fields[1].json_name, None);
    }

    #[test]
    fn test_invalid_oneof_index() {
        let mut f = field("a", 1, Type::Int32);
        f.oneof_index = Some(3);
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![f],
            ..Default::default()
        };

        let err = resolve_file(&file("proto3", vec![message])).unwrap_err();
        assert!(matches!(err, Error::InvalidOneofIndex { index: 3, .. }));
    }

    #[test]
    fn test_invalid_field_number() {
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![field("a", 0, Type::Int32)],
            ..Default::default()
        };

        let err = resolve_file(&file("proto3", vec![message])).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldNumber { number: 0, .. }));
    }

    #[test]
    fn test_unsupported_syntax() {
        let err = resolve_file(&file("editions", vec![])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSyntax { .. }));
    }

    #[test]
    fn test_imports_and_options() {
        let mut proto = file("proto3", vec![]);
        proto.dependency = vec!["a.proto".into(), "b.proto".into(), "c.proto".into()];
        proto.public_dependency = vec![1];
        proto.weak_dependency = vec![2];
        proto.options = Some(prost_types::FileOptions {
            go_package: Some("example.com/pkg;pkg".into()),
            optimize_for: Some(ProtoOptimizeMode::LiteRuntime as i32),
            ..Default::default()
        });

        let resolved = resolve_file(&proto).unwrap();
        let kinds: Vec<_> = resolved.imports.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, [ImportKind::Plain, ImportKind::Public, ImportKind::Weak]);
        assert_eq!(resolved.options.optimize_for, Some(OptimizeMode::LiteRuntime));
        assert_eq!(
            resolved.options.go_package.as_deref(),
            Some("example.com/pkg;pkg")
        );
    }

    #[test]
    fn test_reserved_and_field_options() {
        let mut packed = field("values", 1, Type::Int32);
        packed.label = Some(Label::Repeated as i32);
        packed.options = Some(FieldOptions {
            packed: Some(false),
            deprecated: Some(true),
            ..Default::default()
        });
        let message = DescriptorProto {
            name: Some("M".into()),
            field: vec![packed],
            reserved_range: vec![ProtoReservedRange {
                start: Some(4),
                end: Some(8),
            }],
            reserved_name: vec!["old".into()],
            ..Default::default()
        };

        let resolved = resolve_file(&file("proto2", vec![message])).unwrap();
        let m = &resolved.messages[0];
        assert_eq!(m.reserved_ranges, vec![ReservedRange::new(4, 8)]);
        assert_eq!(m.reserved_names, vec!["old".to_string()]);
        assert_eq!(m.fields[0].cardinality, Cardinality::Repeated);
        assert_eq!(m.fields[0].packed, Some(false));
        assert!(m.fields[0].deprecated);
        assert!(!m.fields[0].optional_keyword);
    }

    #[test]
    fn test_service_methods() {
        let mut proto = file(
            "proto3",
            vec![DescriptorProto {
                name: Some("Req".into()),
                ..Default::default()
            }],
        );
        proto.service = vec![ServiceDescriptorProto {
            name: Some("Api".into()),
            method: vec![MethodDescriptorProto {
                name: Some("Call".into()),
                input_type: Some("Req".into()),
                output_type: Some(".other.Resp".into()),
                server_streaming: Some(true),
                ..Default::default()
            }],
            ..Default::default()
        }];

        let resolved = resolve_file(&proto).unwrap();
        let method = &resolved.services[0].methods[0];
        assert_eq!(method.input_type, "pkg.Req");
        assert_eq!(method.output_type, "other.Resp");
        assert!(!method.client_streaming);
        assert!(method.server_streaming);
    }

    #[test]
    fn test_extension_drops_json_name() {
        let target = DescriptorProto {
            name: Some("Target".into()),
            ..Default::default()
        };
        let mut proto = file("proto2", vec![target]);
        let mut ext = field("ext_value", 100, Type::Int32);
        ext.extendee = Some(".pkg.Target".into());
        ext.json_name = Some("custom".into());
        proto.extension = vec![ext];

        let resolved = resolve_file(&proto).unwrap();
        let ext = &resolved.extensions[0];
        assert_eq!(ext.extendee, "pkg.Target");
        assert_eq!(ext.field.json_name, None);
        assert!(ext.field.optional_keyword);
    }
}
