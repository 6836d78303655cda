//! Segments: numbered field slots, each holding repetitions of one datatype.
//!
//! Field numbers start at 1. Requesting a field past the declared count adds
//! extension slots up to that number unless
//! [`ModelOptions::extend_segments`](crate::ModelOptions) is off.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::context::ModelContext;
use crate::definition::{FieldArg, FieldInit, FieldSpec, FieldType, StructureKind, StructureType};
use crate::error::{ModelError, Result};
use crate::group::Group;
use crate::repetition::{Cardinality, Repetitions};
use crate::structure::{GroupRef, SegmentRef, Structure};
use crate::value::FieldValue;

/// One declared field of a segment with its repetitions.
#[derive(Debug)]
pub struct FieldItem {
    field_type: FieldType,
    required: bool,
    length: usize,
    constructor_args: Vec<FieldArg>,
    description: Option<String>,
    instances: Repetitions<Box<dyn FieldValue>>,
}

impl FieldItem {
    fn new(spec: FieldSpec) -> Self {
        Self {
            field_type: spec.field_type,
            required: spec.required,
            length: spec.length,
            constructor_args: spec.constructor_args,
            description: spec.description,
            instances: Repetitions::new(spec.max_repetitions),
        }
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn max_repetitions(&self) -> Cardinality {
        self.instances.cardinality()
    }

    /// Max length; zero means unlimited.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn constructor_args(&self) -> &[FieldArg] {
        &self.constructor_args
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn instances(&self) -> &[Box<dyn FieldValue>] {
        self.instances.as_slice()
    }
}

fn create_value(
    field_type: &FieldType,
    args: &[FieldArg],
    description: Option<&str>,
    context: &ModelContext,
) -> Result<Box<dyn FieldValue>> {
    let init = FieldInit::new(field_type.name(), context, args, description);
    field_type
        .construct(&init)
        .map_err(|error| ModelError::instantiation(field_type.name(), error))
}

#[derive(Debug)]
pub struct Segment {
    name: String,
    structure_type: StructureType,
    parent: Weak<RefCell<Group>>,
    context: Rc<ModelContext>,
    fields: Vec<FieldItem>,
}

impl Segment {
    pub(crate) fn new_ref(
        name: String,
        structure_type: StructureType,
        parent: Weak<RefCell<Group>>,
        context: Rc<ModelContext>,
    ) -> SegmentRef {
        Rc::new(RefCell::new(Segment {
            name,
            structure_type,
            parent,
            context,
            fields: Vec::new(),
        }))
    }

    /// Creates a segment of `structure_type` outside any group.
    pub fn create(structure_type: &StructureType, context: Rc<ModelContext>) -> Result<SegmentRef> {
        match Structure::instantiate(structure_type, Weak::new(), context)? {
            Structure::Segment(segment) => Ok(segment),
            Structure::Group(_) => Err(ModelError::WrongKind {
                name: structure_type.name().to_string(),
                expected: StructureKind::Segment,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn structure_type(&self) -> &StructureType {
        &self.structure_type
    }

    pub fn parent(&self) -> Option<GroupRef> {
        self.parent.upgrade()
    }

    pub fn context(&self) -> &Rc<ModelContext> {
        &self.context
    }

    pub fn fields(&self) -> &[FieldItem] {
        &self.fields
    }

    /// Declares the next field and returns its number.
    pub fn add_field(&mut self, spec: FieldSpec) -> usize {
        self.fields.push(FieldItem::new(spec));
        self.fields.len()
    }

    /// Number of declared (or synthesised) fields.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    fn label(&self, number: usize) -> String {
        format!("{}-{number}", self.name)
    }

    fn unknown_field(&self, number: usize) -> ModelError {
        ModelError::UnknownField {
            segment: self.name.clone(),
            number,
        }
    }

    fn item(&self, number: usize) -> Result<&FieldItem> {
        number
            .checked_sub(1)
            .and_then(|index| self.fields.get(index))
            .ok_or_else(|| self.unknown_field(number))
    }

    fn index_of(&self, number: usize) -> Result<usize> {
        match number.checked_sub(1) {
            Some(index) if index < self.fields.len() => Ok(index),
            _ => Err(self.unknown_field(number)),
        }
    }

    /// Adds extension fields so that field `number` exists.
    ///
    /// A failure to resolve the extension datatype is logged and otherwise
    /// ignored; the caller then sees an unknown field.
    fn ensure_fields(&mut self, number: usize) {
        let declared = self.fields.len();
        if number <= declared || !self.context.options().extend_segments {
            return;
        }
        let field_type = match self
            .context
            .factory()
            .extension_field_type(self.context.version())
        {
            Ok(field_type) => field_type,
            Err(error) => {
                warn!(segment = %self.name, number, %error, "can't add extension fields");
                return;
            }
        };
        let length = self.context.options().extension_field_length;
        while self.fields.len() < number {
            self.add_field(FieldSpec::extension(field_type.clone(), length));
        }
        debug!(
            segment = %self.name,
            declared,
            fields = number,
            field_type = field_type.name(),
            "added extension fields"
        );
    }

    /// All repetitions of field `number` created so far.
    pub fn field(&mut self, number: usize) -> Result<&[Box<dyn FieldValue>]> {
        self.ensure_fields(number);
        let index = self.index_of(number)?;
        Ok(self.fields[index].instances.as_slice())
    }

    /// Returns repetition `rep` of field `number`, creating it if `rep` is the
    /// next repetition.
    pub fn field_rep(&mut self, number: usize, rep: usize) -> Result<&mut dyn FieldValue> {
        self.ensure_fields(number);
        let index = self.index_of(number)?;
        let label = self.label(number);
        let context = &self.context;
        let FieldItem {
            field_type,
            constructor_args,
            description,
            instances,
            ..
        } = &mut self.fields[index];
        let value = instances.get_or_create(&label, rep, || {
            create_value(field_type, constructor_args, description.as_deref(), context)
        })?;
        Ok(&mut **value)
    }

    /// Creates a repetition of field `number` at position `index`.
    pub fn insert_field_repetition(
        &mut self,
        number: usize,
        index: usize,
    ) -> Result<&mut dyn FieldValue> {
        let field = self.index_of(number)?;
        let label = self.label(number);
        let context = &self.context;
        let FieldItem {
            field_type,
            constructor_args,
            description,
            instances,
            ..
        } = &mut self.fields[field];
        let value = instances.insert_new(&label, index, || {
            create_value(field_type, constructor_args, description.as_deref(), context)
        })?;
        Ok(&mut **value)
    }

    /// Removes and returns repetition `index` of field `number`.
    pub fn remove_field_repetition(
        &mut self,
        number: usize,
        index: usize,
    ) -> Result<Box<dyn FieldValue>> {
        let field = self.index_of(number)?;
        let label = self.label(number);
        self.fields[field].instances.remove_at(&label, index)
    }

    pub fn is_field_required(&self, number: usize) -> Result<bool> {
        Ok(self.item(number)?.required)
    }

    pub fn max_repetitions(&self, number: usize) -> Result<Cardinality> {
        Ok(self.item(number)?.max_repetitions())
    }

    pub fn field_length(&self, number: usize) -> Result<usize> {
        Ok(self.item(number)?.length)
    }

    pub fn field_type(&self, number: usize) -> Result<&FieldType> {
        Ok(&self.item(number)?.field_type)
    }

    pub fn field_description(&self, number: usize) -> Result<Option<&str>> {
        Ok(self.item(number)?.description())
    }

    pub fn constructor_args(&self, number: usize) -> Result<&[FieldArg]> {
        Ok(&self.item(number)?.constructor_args)
    }

    /// Field descriptions in field order, `None` where none is declared.
    pub fn field_descriptions(&self) -> Vec<Option<&str>> {
        self.fields.iter().map(FieldItem::description).collect()
    }

    /// Number of fields holding at least one non-empty repetition.
    pub fn populated_fields(&self) -> usize {
        self.fields
            .iter()
            .filter(|item| item.instances.iter().any(|value| !value.is_empty()))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }

    /// Drops every field repetition; declared fields stay.
    pub fn clear(&mut self) {
        for item in &mut self.fields {
            item.instances.clear();
        }
    }
}
