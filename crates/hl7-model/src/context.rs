use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::{ModelError, Result};
use crate::options::ModelOptions;
use crate::registry::ModelClassFactory;
use crate::version::Hl7Version;

/// Validation settings carried by a message.
///
/// The model never interprets it; it is handed through to whoever validates.
pub trait ValidationContext: fmt::Debug {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Validation context of messages that are not validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl ValidationContext for NoValidation {
    fn name(&self) -> &str {
        "none"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Message-level state shared by every group and segment of one message.
#[derive(Clone)]
pub struct ModelContext {
    message_name: Option<String>,
    version: Option<Hl7Version>,
    factory: Rc<dyn ModelClassFactory>,
    validation: Rc<dyn ValidationContext>,
    options: ModelOptions,
}

impl ModelContext {
    /// A context with no message name, no version and default options.
    pub fn new(factory: Rc<dyn ModelClassFactory>) -> Self {
        Self {
            message_name: None,
            version: None,
            factory,
            validation: Rc::new(NoValidation),
            options: ModelOptions::default(),
        }
    }

    #[must_use]
    pub fn with_message_name(mut self, name: impl Into<String>) -> Self {
        self.message_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: Hl7Version) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: Rc<dyn ValidationContext>) -> Self {
        self.validation = validation;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    pub fn message_name(&self) -> Option<&str> {
        self.message_name.as_deref()
    }

    pub fn version(&self) -> Option<Hl7Version> {
        self.version
    }

    /// Returns the version, or a configuration error naming `structure`.
    pub fn require_version(&self, structure: &str) -> Result<Hl7Version> {
        self.version.ok_or_else(|| ModelError::MissingVersion {
            structure: structure.to_string(),
        })
    }

    pub fn factory(&self) -> &dyn ModelClassFactory {
        self.factory.as_ref()
    }

    pub fn shared_factory(&self) -> Rc<dyn ModelClassFactory> {
        Rc::clone(&self.factory)
    }

    pub fn validation(&self) -> Rc<dyn ValidationContext> {
        Rc::clone(&self.validation)
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("message_name", &self.message_name)
            .field("version", &self.version)
            .field("validation", &self.validation.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
