//! The file options that can be rendered, in canonical order.

use super::literal::escape_string;
use crate::descriptor::{FileOptions, OptimizeMode};
use std::fmt;

/// How to read one option from [`FileOptions`]
#[derive(Clone, Copy)]
pub(crate) enum Accessor {
    Str(fn(&FileOptions) -> Option<&str>),
    Bool(fn(&FileOptions) -> Option<bool>),
    Mode(fn(&FileOptions) -> Option<OptimizeMode>),
}

/// One entry of the option table
pub(crate) struct FileOption {
    pub(crate) key: &'static str,
    pub(crate) accessor: Accessor,
}

/// A present option value, formatted as a schema literal
pub(crate) enum OptionValue<'a> {
    Str(&'a str),
    Bool(bool),
    Mode(OptimizeMode),
}

impl fmt::Display for OptionValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Str(s) => write!(f, "\"{}\"", escape_string(s)),
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Mode(mode) => f.write_str(mode.as_str()),
        }
    }
}

/// Options in `descriptor.proto` field order; anything else is not rendered
pub(crate) const FILE_OPTIONS: &[FileOption] = &[
    FileOption {
        key: "java_package",
        accessor: Accessor::Str(|o| o.java_package.as_deref()),
    },
    FileOption {
        key: "java_outer_classname",
        accessor: Accessor::Str(|o| o.java_outer_classname.as_deref()),
    },
    FileOption {
        key: "java_multiple_files",
        accessor: Accessor::Bool(|o| o.java_multiple_files),
    },
    FileOption {
        key: "java_string_check_utf8",
        accessor: Accessor::Bool(|o| o.java_string_check_utf8),
    },
    FileOption {
        key: "optimize_for",
        accessor: Accessor::Mode(|o| o.optimize_for),
    },
    FileOption {
        key: "go_package",
        accessor: Accessor::Str(|o| o.go_package.as_deref()),
    },
    FileOption {
        key: "cc_generic_services",
        accessor: Accessor::Bool(|o| o.cc_generic_services),
    },
    FileOption {
        key: "java_generic_services",
        accessor: Accessor::Bool(|o| o.java_generic_services),
    },
    FileOption {
        key: "py_generic_services",
        accessor: Accessor::Bool(|o| o.py_generic_services),
    },
    FileOption {
        key: "deprecated",
        accessor: Accessor::Bool(|o| o.deprecated),
    },
    FileOption {
        key: "cc_enable_arenas",
        accessor: Accessor::Bool(|o| o.cc_enable_arenas),
    },
    FileOption {
        key: "objc_class_prefix",
        accessor: Accessor::Str(|o| o.objc_class_prefix.as_deref()),
    },
    FileOption {
        key: "csharp_namespace",
        accessor: Accessor::Str(|o| o.csharp_namespace.as_deref()),
    },
    FileOption {
        key: "swift_prefix",
        accessor: Accessor::Str(|o| o.swift_prefix.as_deref()),
    },
    FileOption {
        key: "php_class_prefix",
        accessor: Accessor::Str(|o| o.php_class_prefix.as_deref()),
    },
    FileOption {
        key: "php_namespace",
        accessor: Accessor::Str(|o| o.php_namespace.as_deref()),
    },
    FileOption {
        key: "php_metadata_namespace",
        accessor: Accessor::Str(|o| o.php_metadata_namespace.as_deref()),
    },
    FileOption {
        key: "ruby_package",
        accessor: Accessor::Str(|o| o.ruby_package.as_deref()),
    },
];

impl FileOption {
    pub(crate) fn value<'a>(&self, options: &'a FileOptions) -> Option<OptionValue<'a>> {
        match self.accessor {
            Accessor::Str(get) => get(options).map(OptionValue::Str),
            Accessor::Bool(get) => get(options).map(OptionValue::Bool),
            Accessor::Mode(get) => get(options).map(OptionValue::Mode),
        }
    }
}

/// Present options as `(key, value)` pairs, in table order
pub(crate) fn present(
    options: &FileOptions,
) -> impl Iterator<Item = (&'static str, OptionValue<'_>)> {
    FILE_OPTIONS
        .iter()
        .filter_map(move |opt| opt.value(options).map(|value| (opt.key, value)))
}
