//! Runtime structure model for HL7 v2.x messages.
//!
//! A message is a tree of groups and segments. Groups hold named child slots
//! in grammar order, segments hold numbered field slots, and every slot keeps
//! its repetitions in the order they were created. Repetitions are
//! materialised on demand and only contiguously: repetition `n + 1` exists
//! only once repetition `n` does.

pub mod context;
pub mod definition;
pub mod error;
pub mod group;
pub mod message;
pub mod naming;
pub mod options;
mod print;
pub mod registry;
pub mod repetition;
pub mod segment;
pub mod structure;
pub mod value;
pub mod version;

pub use context::{ModelContext, NoValidation, ValidationContext};
pub use definition::{
    ArgValue, FieldArg, FieldConstructor, FieldInit, FieldSpec, FieldType, GroupShape,
    SegmentShape, StructureKind, StructureType,
};
pub use error::{ErrorCode, ErrorKind, ModelError, Result};
pub use group::{Group, StructureItem};
pub use message::Message;
pub use options::{DEFAULT_EXTENSION_FIELD_LENGTH, ModelOptions};
pub use registry::{ModelClassFactory, TypeRegistry};
pub use repetition::Cardinality;
pub use segment::{FieldItem, Segment};
pub use structure::{GroupRef, SegmentRef, Structure};
pub use value::{FieldValue, GENERIC_TYPE_NAME, GenericComposite, GenericPrimitive, VARIES_TYPE_NAME, Varies};
pub use version::Hl7Version;
