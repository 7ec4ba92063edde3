//! Error types for the protoscribe library.
//!
//! Every failure happens before printing starts: either the binary payload
//! does not decode as a `FileDescriptorProto`, or the decoded record cannot be
//! resolved into a navigable [`FileDescriptor`](crate::descriptor::FileDescriptor)
//! tree. Rendering itself is infallible.

use thiserror::Error;

/// Result type alias for protoscribe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The binary payload is not a valid descriptor record
    Decode,
    /// The decoded record cannot be turned into a descriptor tree
    Resolution,
}

/// Error type for all protoscribe operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to decode the binary descriptor payload
    #[error("failed to decode file descriptor: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The descriptor declares a syntax mode other than proto2 or proto3
    #[error("unsupported proto syntax: '{syntax}'")]
    UnsupportedSyntax {
        /// The unsupported syntax string
        syntax: String,
    },

    /// A declaration that must be named has no name
    #[error("{element} has no name")]
    MissingName {
        /// What kind of element was unnamed, with its location if known
        element: String,
    },

    /// Field number outside the legal range
    #[error("invalid field number {number} on '{field}': must be between 1 and {max}")]
    InvalidFieldNumber {
        /// Fully-qualified field name
        field: String,
        /// The invalid field number
        number: i32,
        /// Maximum valid field number
        max: u32,
    },

    /// A field points at a oneof that does not exist
    #[error("field '{field}' refers to missing oneof #{index}")]
    InvalidOneofIndex {
        /// Fully-qualified field name
        field: String,
        /// The out-of-range oneof index
        index: i32,
    },

    /// A type reference could not be bound to a message or enum
    #[error("cannot resolve type '{type_name}' referenced by '{field}'")]
    UnresolvedType {
        /// The referencing field or method
        field: String,
        /// The type name as stored in the descriptor
        type_name: String,
    },

    /// A synthesized map entry message has an unexpected shape
    #[error("malformed map entry '{entry}': {reason}")]
    MalformedMapEntry {
        /// Fully-qualified name of the entry message
        entry: String,
        /// What is wrong with it
        reason: String,
    },

    /// A file was requested from a descriptor pool that does not hold it
    #[error("file '{name}' not found in descriptor pool")]
    FileNotFound {
        /// The requested file name
        name: String,
    },
}

impl Error {
    /// Creates a new missing name error
    pub fn missing_name(element: impl Into<String>) -> Self {
        Self::MissingName {
            element: element.into(),
        }
    }

    /// Creates a new unresolved type error
    pub fn unresolved_type(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnresolvedType {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates a new malformed map entry error
    pub fn malformed_map_entry(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMapEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new file not found error
    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::FileNotFound { name: name.into() }
    }

    /// Returns whether this error came from decoding or from resolution
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            _ => ErrorKind::Resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use prost_types::FileDescriptorProto;

    #[test]
    fn test_error_display() {
        let err = Error::unresolved_type("pkg.Foo.bar", "Missing");
        assert!(err.to_string().contains("pkg.Foo.bar"));
        assert!(err.to_string().contains("'Missing'"));
    }

    #[test]
    fn test_error_kind() {
        let decode = FileDescriptorProto::decode(&[0xffu8][..]).unwrap_err();
        assert_eq!(Error::from(decode).kind(), ErrorKind::Decode);
        assert_eq!(
            Error::UnsupportedSyntax {
                syntax: "editions".into()
            }
            .kind(),
            ErrorKind::Resolution
        );
        assert_eq!(Error::file_not_found("a.proto").kind(), ErrorKind::Resolution);
    }
}
