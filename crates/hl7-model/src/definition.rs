//! Type definitions the model instantiates.
//!
//! Generated message code is represented by plain data: a [`StructureType`]
//! pairs a type name with a shape function that declares children in grammar
//! order, and a [`FieldType`] pairs a datatype name with its constructor.
//! Types that the definitions don't know about use the generic variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::ModelContext;
use crate::error::{ModelError, Result};
use crate::group::Group;
use crate::naming::simple_name;
use crate::repetition::Cardinality;
use crate::segment::Segment;
use crate::value::{FieldValue, GenericPrimitive, Varies};

/// Declares the children of a freshly created group.
pub type GroupShape = fn(&mut Group) -> Result<()>;

/// Declares the fields of a freshly created segment.
pub type SegmentShape = fn(&mut Segment) -> Result<()>;

/// Builds a field value from its constructor arguments.
pub type FieldConstructor = fn(&FieldInit<'_>) -> Result<Box<dyn FieldValue>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Group,
    Segment,
}

impl StructureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureKind::Group => "group",
            StructureKind::Segment => "segment",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Shape {
    Group(GroupShape),
    Segment(SegmentShape),
    Generic(StructureKind),
}

/// A group or segment type that a slot instantiates.
#[derive(Clone)]
pub struct StructureType {
    name: String,
    shape: Shape,
}

impl StructureType {
    /// A group type whose children are declared by `shape`.
    pub fn group(name: impl Into<String>, shape: GroupShape) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Group(shape),
        }
    }

    /// A segment type whose fields are declared by `shape`.
    pub fn segment(name: impl Into<String>, shape: SegmentShape) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Segment(shape),
        }
    }

    /// An untyped group that keeps `name` and starts without children.
    pub fn generic_group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Generic(StructureKind::Group),
        }
    }

    /// An untyped segment that keeps `name` and starts without fields.
    pub fn generic_segment(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Generic(StructureKind::Segment),
        }
    }

    /// Full type name as registered, possibly qualified.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn kind(&self) -> StructureKind {
        match self.shape {
            Shape::Group(_) => StructureKind::Group,
            Shape::Segment(_) => StructureKind::Segment,
            Shape::Generic(kind) => kind,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.shape, Shape::Generic(_))
    }

    pub(crate) fn shape(&self) -> Shape {
        self.shape
    }
}

impl PartialEq for StructureType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind() == other.kind()
            && self.is_generic() == other.is_generic()
    }
}

impl fmt::Debug for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureType")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("generic", &self.is_generic())
            .finish()
    }
}

/// A recorded constructor argument of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldArg {
    /// Replaced by the owning message when the value is created.
    Message,
    Integer(i64),
    Text(String),
}

/// A constructor argument as handed to a [`FieldConstructor`].
#[derive(Debug, Clone, Copy)]
pub enum ArgValue<'a> {
    Message(&'a ModelContext),
    Integer(i64),
    Text(&'a str),
}

impl ArgValue<'_> {
    fn describe(&self) -> &'static str {
        match self {
            ArgValue::Message(_) => "message",
            ArgValue::Integer(_) => "integer",
            ArgValue::Text(_) => "text",
        }
    }
}

/// Arguments for creating one field value.
///
/// Holds the recorded constructor arguments with the owning message
/// substituted, followed by the field description when one is declared.
#[derive(Debug)]
pub struct FieldInit<'a> {
    type_name: &'a str,
    context: &'a ModelContext,
    args: Vec<ArgValue<'a>>,
}

impl<'a> FieldInit<'a> {
    pub(crate) fn new(
        type_name: &'a str,
        context: &'a ModelContext,
        recorded: &'a [FieldArg],
        description: Option<&'a str>,
    ) -> Self {
        let mut args: Vec<ArgValue<'a>> = recorded
            .iter()
            .map(|arg| match arg {
                FieldArg::Message => ArgValue::Message(context),
                FieldArg::Integer(value) => ArgValue::Integer(*value),
                FieldArg::Text(value) => ArgValue::Text(value.as_str()),
            })
            .collect();
        if let Some(description) = description {
            args.push(ArgValue::Text(description));
        }
        Self {
            type_name,
            context,
            args,
        }
    }

    pub fn type_name(&self) -> &'a str {
        self.type_name
    }

    pub fn context(&self) -> &'a ModelContext {
        self.context
    }

    pub fn args(&self) -> &[ArgValue<'a>] {
        &self.args
    }

    fn arg(&self, index: usize, expected: &str) -> Result<ArgValue<'a>> {
        self.args.get(index).copied().ok_or_else(|| {
            ModelError::Definition(format!(
                "{} expects a {expected} argument at position {index}, got {} arguments",
                self.type_name,
                self.args.len()
            ))
        })
    }

    fn mismatch(&self, index: usize, expected: &str, found: ArgValue<'_>) -> ModelError {
        ModelError::Definition(format!(
            "{} expects a {expected} argument at position {index}, found {}",
            self.type_name,
            found.describe()
        ))
    }

    pub fn message_arg(&self, index: usize) -> Result<&'a ModelContext> {
        match self.arg(index, "message")? {
            ArgValue::Message(context) => Ok(context),
            other => Err(self.mismatch(index, "message", other)),
        }
    }

    pub fn integer_arg(&self, index: usize) -> Result<i64> {
        match self.arg(index, "integer")? {
            ArgValue::Integer(value) => Ok(value),
            other => Err(self.mismatch(index, "integer", other)),
        }
    }

    pub fn text_arg(&self, index: usize) -> Result<&'a str> {
        match self.arg(index, "text")? {
            ArgValue::Text(value) => Ok(value),
            other => Err(self.mismatch(index, "text", other)),
        }
    }
}

/// A datatype that field slots instantiate.
#[derive(Clone)]
pub struct FieldType {
    name: String,
    constructor: FieldConstructor,
}

impl FieldType {
    pub fn new(name: impl Into<String>, constructor: FieldConstructor) -> Self {
        Self {
            name: name.into(),
            constructor,
        }
    }

    /// Runtime-typed value; expects the owning message as first argument.
    pub fn varies() -> Self {
        Self::new(crate::value::VARIES_TYPE_NAME, construct_varies)
    }

    /// Untyped string placeholder for an unknown datatype.
    pub fn generic() -> Self {
        Self::new(crate::value::GENERIC_TYPE_NAME, construct_primitive)
    }

    /// String-valued datatype reporting `name`, e.g. `ST` or `ID`.
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(name, construct_primitive)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn construct(&self, init: &FieldInit<'_>) -> Result<Box<dyn FieldValue>> {
        (self.constructor)(init)
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldType").field("name", &self.name).finish()
    }
}

fn construct_varies(init: &FieldInit<'_>) -> Result<Box<dyn FieldValue>> {
    init.message_arg(0)?;
    Ok(Box::new(Varies::new()))
}

fn construct_primitive(init: &FieldInit<'_>) -> Result<Box<dyn FieldValue>> {
    Ok(Box::new(GenericPrimitive::typed(init.type_name())))
}

/// Declaration of one segment field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) field_type: FieldType,
    pub(crate) required: bool,
    pub(crate) max_repetitions: Cardinality,
    pub(crate) length: usize,
    pub(crate) constructor_args: Vec<FieldArg>,
    pub(crate) description: Option<String>,
}

impl FieldSpec {
    /// Optional, single, unlimited length, constructed with the owning message.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            max_repetitions: Cardinality::SINGLE,
            length: 0,
            constructor_args: vec![FieldArg::Message],
            description: None,
        }
    }

    /// Slot synthesised for a field past the declared count.
    pub fn extension(field_type: FieldType, length: usize) -> Self {
        Self {
            max_repetitions: Cardinality::Unbounded,
            length,
            ..Self::new(field_type)
        }
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Max repetitions; zero or less means unbounded.
    #[must_use]
    pub fn max_repetitions(mut self, max: i32) -> Self {
        self.max_repetitions = Cardinality::from_max_repetitions(max);
        self
    }

    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub fn args(mut self, args: Vec<FieldArg>) -> Self {
        self.constructor_args = args;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::registry::TypeRegistry;

    fn context() -> ModelContext {
        ModelContext::new(Rc::new(TypeRegistry::new()))
    }

    #[test]
    fn generic_types_keep_their_name() {
        let segment = StructureType::generic_segment("ZZZ");
        assert_eq!(segment.kind(), StructureKind::Segment);
        assert!(segment.is_generic());
        assert_eq!(segment.simple_name(), "ZZZ");

        let group = StructureType::generic_group("custom::ZGRP");
        assert_eq!(group.kind(), StructureKind::Group);
        assert_eq!(group.simple_name(), "ZGRP");
    }

    #[test]
    fn message_argument_is_substituted() {
        let context = context();
        let recorded = vec![FieldArg::Message, FieldArg::Integer(104)];
        let init = FieldInit::new("ID", &context, &recorded, Some("Set ID"));
        assert!(init.message_arg(0).is_ok());
        assert_eq!(init.integer_arg(1).expect("table"), 104);
        assert_eq!(init.text_arg(2).expect("description"), "Set ID");
        assert_eq!(init.args().len(), 3);
    }

    #[test]
    fn mismatched_argument_is_a_definition_error() {
        let context = context();
        let recorded = vec![FieldArg::Integer(1)];
        let init = FieldInit::new("*", &context, &recorded, None);
        let error = init.message_arg(0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid definition: * expects a message argument at position 0, found integer"
        );
        assert!(init.text_arg(3).is_err());
    }

    #[test]
    fn varies_requires_the_message() {
        let context = context();
        let without: Vec<FieldArg> = Vec::new();
        let init = FieldInit::new("*", &context, &without, None);
        assert!(FieldType::varies().construct(&init).is_err());

        let with = vec![FieldArg::Message];
        let init = FieldInit::new("*", &context, &with, None);
        let value = FieldType::varies().construct(&init).expect("varies");
        assert!(value.downcast_ref::<Varies>().is_some());
    }

    #[test]
    fn primitive_reports_its_name() {
        let context = context();
        let args = vec![FieldArg::Message];
        let field_type = FieldType::primitive("ST");
        let init = FieldInit::new(field_type.name(), &context, &args, None);
        let value = field_type.construct(&init).expect("primitive");
        assert_eq!(value.type_name(), "ST");
    }
}
