use std::rc::Rc;

use crate::context::{ModelContext, ValidationContext};
use crate::definition::{StructureKind, StructureType};
use crate::error::{ModelError, Result};
use crate::group::Group;
use crate::registry::ModelClassFactory;
use crate::structure::{GroupRef, Structure};
use crate::version::Hl7Version;

/// A message: the root group together with its shared context.
#[derive(Debug, Clone)]
pub struct Message {
    root: GroupRef,
}

impl Message {
    /// Creates an empty message of `structure_type` for `version`.
    pub fn new(
        structure_type: &StructureType,
        version: Hl7Version,
        factory: Rc<dyn ModelClassFactory>,
    ) -> Result<Self> {
        Self::from_context(
            structure_type,
            ModelContext::new(factory).with_version(version),
        )
    }

    /// Creates an empty message using `context` for options and validation.
    ///
    /// The message name recorded in the context is replaced by the simple name
    /// of `structure_type`.
    pub fn from_context(structure_type: &StructureType, context: ModelContext) -> Result<Self> {
        if structure_type.kind() != StructureKind::Group {
            return Err(ModelError::WrongKind {
                name: structure_type.name().to_string(),
                expected: StructureKind::Group,
            });
        }
        let context = context.with_message_name(structure_type.simple_name());
        let root = Group::create(structure_type, Rc::new(context))?;
        Ok(Self { root })
    }

    /// A message with no declared children, for message types the
    /// definitions don't know.
    pub fn generic(
        name: &str,
        version: Hl7Version,
        factory: Rc<dyn ModelClassFactory>,
    ) -> Result<Self> {
        Self::new(&StructureType::generic_group(name), version, factory)
    }

    /// Resolves `name` through the factory, falling back to a generic message.
    pub fn for_name(
        name: &str,
        version: Hl7Version,
        factory: Rc<dyn ModelClassFactory>,
    ) -> Result<Self> {
        match factory.message_type(name, version) {
            Some(structure_type) => Self::new(&structure_type, version, factory),
            None => Self::generic(name, version, factory),
        }
    }

    pub fn root(&self) -> &GroupRef {
        &self.root
    }

    pub fn name(&self) -> String {
        self.root.borrow().name().to_string()
    }

    pub fn version(&self) -> Option<Hl7Version> {
        self.context().version()
    }

    pub fn context(&self) -> Rc<ModelContext> {
        Rc::clone(self.root.borrow().context())
    }

    pub fn validation_context(&self) -> Rc<dyn ValidationContext> {
        self.context().validation()
    }

    pub fn is_generic(&self) -> bool {
        self.root.borrow().structure_type().is_generic()
    }

    pub fn get(&self, name: &str, rep: usize) -> Result<Structure> {
        self.root.borrow_mut().get(name, rep)
    }

    pub fn add_new(&self, name: &str) -> Result<Structure> {
        self.root.borrow_mut().add_new(name)
    }

    /// Adds a slot for a non-standard segment at the end of the message.
    pub fn append_unknown(&self, name: &str) -> Result<String> {
        self.root.borrow_mut().append_unknown(name)
    }

    pub fn print_structure(&self) -> String {
        self.root.borrow().print_structure()
    }
}
