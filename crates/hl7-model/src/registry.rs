//! Class resolution: mapping structure and datatype names to definitions.
//!
//! The model consults a [`ModelClassFactory`] when it has to turn a name into
//! a type at runtime: non-standard segments appended by name, messages
//! created by name, and the datatype of synthesised extension fields.
//! [`TypeRegistry`] is the in-memory implementation that generated code (or a
//! test) fills at startup.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use hl7_model::{Hl7Version, Message, ModelClassFactory, StructureType, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register_segment(Hl7Version::V2_5, StructureType::generic_segment("ZPI"))
//!     .unwrap();
//! assert!(registry.segment_type("zpi", Hl7Version::V2_5).is_some());
//!
//! let message = Message::for_name("ADT_A01", Hl7Version::V2_5, Rc::new(registry)).unwrap();
//! assert!(message.is_generic());
//! ```

use std::collections::HashMap;

use crate::definition::{FieldType, StructureKind, StructureType};
use crate::error::{ModelError, Result};
use crate::version::Hl7Version;

/// Resolves names to structure and datatype definitions for a version.
pub trait ModelClassFactory {
    fn message_type(&self, name: &str, version: Hl7Version) -> Option<StructureType>;

    fn group_type(&self, name: &str, version: Hl7Version) -> Option<StructureType>;

    fn segment_type(&self, name: &str, version: Hl7Version) -> Option<StructureType>;

    fn field_type(&self, name: &str, version: Hl7Version) -> Option<FieldType>;

    /// Datatype of fields synthesised past a segment's declared field count.
    fn extension_field_type(&self, _version: Option<Hl7Version>) -> Result<FieldType> {
        Ok(FieldType::varies())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RegistryKey {
    version: Hl7Version,
    name: String,
}

impl RegistryKey {
    fn new(version: Hl7Version, name: &str) -> Self {
        Self {
            version,
            name: name.trim().to_ascii_uppercase(),
        }
    }
}

/// Definitions indexed by version and case-insensitive simple name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    messages: HashMap<RegistryKey, StructureType>,
    groups: HashMap<RegistryKey, StructureType>,
    segments: HashMap<RegistryKey, StructureType>,
    datatypes: HashMap<RegistryKey, FieldType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn expect_kind(structure_type: &StructureType, expected: StructureKind) -> Result<()> {
        if structure_type.kind() == expected {
            Ok(())
        } else {
            Err(ModelError::WrongKind {
                name: structure_type.name().to_string(),
                expected,
            })
        }
    }

    /// Registers a message definition under its simple name.
    ///
    /// A definition already registered under that name is replaced.
    pub fn register_message(
        &mut self,
        version: Hl7Version,
        structure_type: StructureType,
    ) -> Result<()> {
        Self::expect_kind(&structure_type, StructureKind::Group)?;
        let key = RegistryKey::new(version, structure_type.simple_name());
        self.messages.insert(key, structure_type);
        Ok(())
    }

    pub fn register_group(
        &mut self,
        version: Hl7Version,
        structure_type: StructureType,
    ) -> Result<()> {
        Self::expect_kind(&structure_type, StructureKind::Group)?;
        let key = RegistryKey::new(version, structure_type.simple_name());
        self.groups.insert(key, structure_type);
        Ok(())
    }

    pub fn register_segment(
        &mut self,
        version: Hl7Version,
        structure_type: StructureType,
    ) -> Result<()> {
        Self::expect_kind(&structure_type, StructureKind::Segment)?;
        let key = RegistryKey::new(version, structure_type.simple_name());
        self.segments.insert(key, structure_type);
        Ok(())
    }

    pub fn register_datatype(&mut self, version: Hl7Version, field_type: FieldType) {
        let key = RegistryKey::new(version, field_type.name());
        self.datatypes.insert(key, field_type);
    }

    /// Message definitions registered for `version`, sorted by name.
    pub fn messages(&self, version: Hl7Version) -> Vec<&StructureType> {
        let mut messages: Vec<&StructureType> = self
            .messages
            .iter()
            .filter(|(key, _)| key.version == version)
            .map(|(_, structure_type)| structure_type)
            .collect();
        messages.sort_by(|a, b| a.simple_name().cmp(b.simple_name()));
        messages
    }

    /// Versions with at least one registered message, oldest first.
    pub fn versions(&self) -> Vec<Hl7Version> {
        let mut versions: Vec<Hl7Version> = self.messages.keys().map(|key| key.version).collect();
        versions.sort();
        versions.dedup();
        versions
    }

    /// Total number of registered definitions of all kinds.
    pub fn len(&self) -> usize {
        self.messages.len() + self.groups.len() + self.segments.len() + self.datatypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModelClassFactory for TypeRegistry {
    fn message_type(&self, name: &str, version: Hl7Version) -> Option<StructureType> {
        self.messages.get(&RegistryKey::new(version, name)).cloned()
    }

    fn group_type(&self, name: &str, version: Hl7Version) -> Option<StructureType> {
        self.groups.get(&RegistryKey::new(version, name)).cloned()
    }

    fn segment_type(&self, name: &str, version: Hl7Version) -> Option<StructureType> {
        self.segments.get(&RegistryKey::new(version, name)).cloned()
    }

    fn field_type(&self, name: &str, version: Hl7Version) -> Option<FieldType> {
        self.datatypes.get(&RegistryKey::new(version, name)).cloned()
    }
}
