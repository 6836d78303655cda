//! Error types for structure model operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::definition::StructureKind;

/// HL7 error condition codes (HL7 table 0357).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MessageAccepted,
    SegmentSequenceError,
    RequiredFieldMissing,
    DataTypeError,
    TableValueNotFound,
    UnsupportedMessageType,
    UnsupportedEventCode,
    UnsupportedProcessingId,
    UnsupportedVersionId,
    UnknownKeyIdentifier,
    DuplicateKeyIdentifier,
    ApplicationRecordLocked,
    ApplicationInternalError,
}

impl ErrorCode {
    /// Numeric value as sent in ERR-3 / MSA-6.
    pub fn value(&self) -> u16 {
        match self {
            ErrorCode::MessageAccepted => 0,
            ErrorCode::SegmentSequenceError => 100,
            ErrorCode::RequiredFieldMissing => 101,
            ErrorCode::DataTypeError => 102,
            ErrorCode::TableValueNotFound => 103,
            ErrorCode::UnsupportedMessageType => 200,
            ErrorCode::UnsupportedEventCode => 201,
            ErrorCode::UnsupportedProcessingId => 202,
            ErrorCode::UnsupportedVersionId => 203,
            ErrorCode::UnknownKeyIdentifier => 204,
            ErrorCode::DuplicateKeyIdentifier => 205,
            ErrorCode::ApplicationRecordLocked => 206,
            ErrorCode::ApplicationInternalError => 207,
        }
    }

    /// Description as it appears in the HL7 table.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MessageAccepted => "Message accepted",
            ErrorCode::SegmentSequenceError => "Segment sequence error",
            ErrorCode::RequiredFieldMissing => "Required field missing",
            ErrorCode::DataTypeError => "Data type error",
            ErrorCode::TableValueNotFound => "Table value not found",
            ErrorCode::UnsupportedMessageType => "Unsupported message type",
            ErrorCode::UnsupportedEventCode => "Unsupported event code",
            ErrorCode::UnsupportedProcessingId => "Unsupported processing id",
            ErrorCode::UnsupportedVersionId => "Unsupported version id",
            ErrorCode::UnknownKeyIdentifier => "Unknown key identifier",
            ErrorCode::DuplicateKeyIdentifier => "Duplicate key identifier",
            ErrorCode::ApplicationRecordLocked => "Application record locked",
            ErrorCode::ApplicationInternalError => "Application internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value(), self.as_str())
    }
}

/// Coarse classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A slot name or field number that the node does not declare.
    UnknownName,
    /// A repetition request that breaks contiguity or cardinality.
    Arity,
    /// A declared type could not be constructed.
    Instantiation,
    /// Missing message-level configuration such as the version.
    Configuration,
    /// Generated definitions that disagree with the runtime.
    Definition,
}

/// Errors raised by group and segment operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("{name} does not exist in the group {group}")]
    UnknownStructure { group: String, name: String },

    #[error("segment {segment} has no field {number}")]
    UnknownField { segment: String, number: usize },

    #[error(
        "can't get repetition {requested} of {name}: there are currently only {current} repetitions"
    )]
    RepetitionGap {
        name: String,
        requested: usize,
        current: usize,
    },

    #[error("can't create another repetition of {name}: it is non-repeating")]
    NonRepeating { name: String },

    #[error("can't create repetition #{max} of {name}: maximum repetitions is {max}")]
    RepetitionLimit { name: String, max: usize },

    #[error("index {index} is out of bounds for {name} ({len} repetitions)")]
    IndexOutOfBounds {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("can't instantiate {type_name}: {source}")]
    Instantiation {
        type_name: String,
        #[source]
        source: Box<ModelError>,
    },

    #[error("the message owning {structure} has no version; structures can't be resolved by name")]
    MissingVersion { structure: String },

    #[error("{name} is not a {expected}")]
    WrongKind {
        name: String,
        expected: StructureKind,
    },

    #[error("invalid definition: {0}")]
    Definition(String),
}

impl ModelError {
    pub(crate) fn instantiation(type_name: &str, source: ModelError) -> Self {
        ModelError::Instantiation {
            type_name: type_name.to_string(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::UnknownStructure { .. } | ModelError::UnknownField { .. } => {
                ErrorKind::UnknownName
            }
            ModelError::RepetitionGap { .. }
            | ModelError::NonRepeating { .. }
            | ModelError::RepetitionLimit { .. }
            | ModelError::IndexOutOfBounds { .. } => ErrorKind::Arity,
            ModelError::Instantiation { .. } => ErrorKind::Instantiation,
            ModelError::MissingVersion { .. } => ErrorKind::Configuration,
            ModelError::WrongKind { .. } | ModelError::Definition(_) => ErrorKind::Definition,
        }
    }

    /// HL7 error condition reported for this error.
    ///
    /// Almost every failure here points at a mismatch between generated
    /// definitions and the runtime, so it surfaces as an internal error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ModelError::MissingVersion { .. } => ErrorCode::UnsupportedVersionId,
            _ => ErrorCode::ApplicationInternalError,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
