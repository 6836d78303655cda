//! Field values held by segments.
//!
//! Concrete datatypes live outside this crate; the model only needs to create
//! them and keep them in order. The generic values below stand in for
//! datatypes that are unknown to the definitions.

use std::any::Any;
use std::fmt;

/// Type name reported by generic placeholder values.
pub const GENERIC_TYPE_NAME: &str = "UNKNOWN";

/// Type name reported by [`Varies`].
pub const VARIES_TYPE_NAME: &str = "*";

/// A datatype instance stored in a segment field.
pub trait FieldValue: fmt::Debug + Any {
    /// Datatype name, e.g. `ST` or `CWE`.
    fn type_name(&self) -> &str;

    fn is_empty(&self) -> bool;

    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn FieldValue + 'a {
    pub fn downcast_ref<T: FieldValue>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: FieldValue>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Unconstrained string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericPrimitive {
    type_name: Option<String>,
    value: Option<String>,
}

impl GenericPrimitive {
    pub fn new() -> Self {
        Self::default()
    }

    /// A primitive reporting `type_name` instead of [`GENERIC_TYPE_NAME`].
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            value: None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }
}

impl FieldValue for GenericPrimitive {
    fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or(GENERIC_TYPE_NAME)
    }

    fn is_empty(&self) -> bool {
        self.value.as_deref().is_none_or(str::is_empty)
    }

    fn clear(&mut self) {
        self.value = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Composite of unknown shape; components appear as they are requested.
#[derive(Debug, Default)]
pub struct GenericComposite {
    components: Vec<Varies>,
}

impl GenericComposite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[Varies] {
        &self.components
    }

    /// Returns component `index` (zero based), adding empty components up to it.
    pub fn component(&mut self, index: usize) -> &mut Varies {
        while self.components.len() <= index {
            self.components.push(Varies::new());
        }
        &mut self.components[index]
    }
}

impl FieldValue for GenericComposite {
    fn type_name(&self) -> &str {
        GENERIC_TYPE_NAME
    }

    fn is_empty(&self) -> bool {
        self.components.iter().all(Varies::is_empty)
    }

    fn clear(&mut self) {
        self.components.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Value whose datatype is decided at runtime.
///
/// Holds an empty [`GenericPrimitive`] until other data is set.
#[derive(Debug)]
pub struct Varies {
    data: Box<dyn FieldValue>,
}

impl Default for Varies {
    fn default() -> Self {
        Self {
            data: Box::new(GenericPrimitive::new()),
        }
    }
}

impl Varies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &dyn FieldValue {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> &mut dyn FieldValue {
        self.data.as_mut()
    }

    pub fn set_data(&mut self, data: Box<dyn FieldValue>) {
        self.data = data;
    }

    /// Sets a string value, replacing non-primitive data.
    pub fn set_value(&mut self, value: impl Into<String>) {
        match self.data.downcast_mut::<GenericPrimitive>() {
            Some(primitive) => primitive.set_value(value),
            None => {
                let mut primitive = GenericPrimitive::new();
                primitive.set_value(value);
                self.data = Box::new(primitive);
            }
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.data
            .downcast_ref::<GenericPrimitive>()
            .and_then(GenericPrimitive::value)
    }
}

impl FieldValue for Varies {
    fn type_name(&self) -> &str {
        VARIES_TYPE_NAME
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
