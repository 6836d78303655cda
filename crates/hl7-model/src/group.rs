//! Groups: ordered, named slots of child structures.
//!
//! The order in which a group's definition declares its slots is the message
//! grammar for that group. Each slot keeps its descriptor together with the
//! repetitions materialised so far; repetitions are created on first access.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::context::ModelContext;
use crate::definition::{StructureKind, StructureType};
use crate::error::{ModelError, Result};
use crate::naming::{structure_name, unique_name};
use crate::print::render_group;
use crate::repetition::{Cardinality, Repetitions};
use crate::structure::{GroupRef, SegmentRef, Structure};

/// One declared child slot of a group.
#[derive(Debug)]
pub struct StructureItem {
    name: String,
    required: bool,
    structure_type: StructureType,
    instances: Repetitions<Structure>,
}

impl StructureItem {
    fn new(name: String, structure_type: StructureType, required: bool, repeating: bool) -> Self {
        Self {
            name,
            required,
            structure_type,
            instances: Repetitions::new(Cardinality::from_repeating(repeating)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_repeating(&self) -> bool {
        self.instances.cardinality().is_repeating()
    }

    pub fn structure_type(&self) -> &StructureType {
        &self.structure_type
    }

    pub fn instances(&self) -> &[Structure] {
        self.instances.as_slice()
    }
}

#[derive(Debug)]
pub struct Group {
    name: String,
    structure_type: StructureType,
    parent: Weak<RefCell<Group>>,
    self_ref: Weak<RefCell<Group>>,
    context: Rc<ModelContext>,
    items: Vec<StructureItem>,
}

impl Group {
    pub(crate) fn new_ref(
        name: String,
        structure_type: StructureType,
        parent: Weak<RefCell<Group>>,
        context: Rc<ModelContext>,
    ) -> GroupRef {
        Rc::new_cyclic(|self_ref| {
            RefCell::new(Group {
                name,
                structure_type,
                parent,
                self_ref: self_ref.clone(),
                context,
                items: Vec::new(),
            })
        })
    }

    /// Creates a parentless group of `structure_type`.
    pub fn create(structure_type: &StructureType, context: Rc<ModelContext>) -> Result<GroupRef> {
        match Structure::instantiate(structure_type, Weak::new(), context)? {
            Structure::Group(group) => Ok(group),
            Structure::Segment(_) => Err(ModelError::WrongKind {
                name: structure_type.name().to_string(),
                expected: StructureKind::Group,
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

    pub fn items(&self) -> &[StructureItem] {
        &self.items
    }

    fn item(&self, name: &str) -> Result<&StructureItem> {
        self.items
            .iter()
            .find(|item| item.name == name)
            .ok_or_else(|| ModelError::UnknownStructure {
                group: self.name.clone(),
                name: name.to_string(),
            })
    }

    fn item_mut(&mut self, name: &str) -> Result<&mut StructureItem> {
        let group = &self.name;
        self.items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| ModelError::UnknownStructure {
                group: group.clone(),
                name: name.to_string(),
            })
    }

    fn insert_item(
        &mut self,
        structure_type: StructureType,
        required: bool,
        repeating: bool,
        index: usize,
        candidate: Option<&str>,
    ) -> String {
        let candidate = match candidate {
            Some(name) => name.to_string(),
            None => structure_name(&structure_type, self.context.message_name()),
        };
        let name = unique_name(&candidate, |name| {
            self.items.iter().any(|item| item.name == name)
        });
        self.items.insert(
            index,
            StructureItem::new(name.clone(), structure_type, required, repeating),
        );
        name
    }

    /// Declares a child slot after the existing ones and returns its name.
    ///
    /// The name comes from the type's simple name (group types lose the
    /// message name prefix); clashes get a numeric suffix: `NTE`, `NTE2`, ...
    pub fn declare(
        &mut self,
        structure_type: StructureType,
        required: bool,
        repeating: bool,
    ) -> String {
        let index = self.items.len();
        self.insert_item(structure_type, required, repeating, index, None)
    }

    /// Declares a child slot at `index` among the existing slots.
    pub fn declare_at(
        &mut self,
        structure_type: StructureType,
        required: bool,
        repeating: bool,
        index: usize,
    ) -> Result<String> {
        self.check_slot_index(index)?;
        Ok(self.insert_item(structure_type, required, repeating, index, None))
    }

    fn check_slot_index(&self, index: usize) -> Result<()> {
        if index > self.items.len() {
            return Err(ModelError::IndexOutOfBounds {
                name: self.name.clone(),
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Adds a slot for a segment the definitions don't declare, after all others.
    pub fn append_unknown(&mut self, name: &str) -> Result<String> {
        let index = self.items.len();
        self.insert_unknown(name, index)
    }

    /// Adds a slot for a segment the definitions don't declare, at `index`.
    ///
    /// The segment type is resolved through the factory for the message
    /// version, falling back to a generic segment. One instance is created up
    /// front so an unusable type fails here rather than on first access. The
    /// slot is optional and repeating.
    pub fn insert_unknown(&mut self, name: &str, index: usize) -> Result<String> {
        self.check_slot_index(index)?;
        let version = self.context.require_version(&self.name)?;
        let structure_type = match self.context.factory().segment_type(name, version) {
            Some(structure_type) => structure_type,
            None if self.context.options().unknown_segments_as_generic => {
                debug!(group = %self.name, segment = name, %version, "using generic segment");
                StructureType::generic_segment(name)
            }
            None => {
                return Err(ModelError::UnknownStructure {
                    group: self.name.clone(),
                    name: name.to_string(),
                });
            }
        };
        Structure::instantiate(
            &structure_type,
            self.self_ref.clone(),
            Rc::clone(&self.context),
        )?;
        let slot = self.insert_item(structure_type, false, true, index, Some(name));
        debug!(group = %self.name, slot = %slot, index, "added non-standard segment slot");
        Ok(slot)
    }

    /// Returns repetition `rep` of slot `name`, creating it if `rep` is the
    /// next repetition.
    ///
    /// Existing repetitions are returned as is. A new repetition can only be
    /// created at the end, and only for repeating slots or empty ones.
    pub fn get(&mut self, name: &str, rep: usize) -> Result<Structure> {
        let parent = self.self_ref.clone();
        let context = Rc::clone(&self.context);
        let item = self.item_mut(name)?;
        let instance = item.instances.get_or_create(&item.name, rep, || {
            Structure::instantiate(&item.structure_type, parent, context)
        })?;
        Ok(instance.clone())
    }

    /// Shorthand for `get(name, 0)`.
    pub fn get_first(&mut self, name: &str) -> Result<Structure> {
        self.get(name, 0)
    }

    fn expect_kind(&self, name: &str, expected: StructureKind) -> Result<()> {
        if self.item(name)?.structure_type.kind() == expected {
            Ok(())
        } else {
            Err(ModelError::WrongKind {
                name: name.to_string(),
                expected,
            })
        }
    }

    /// Like [`Group::get`] for a slot that holds groups.
    pub fn get_group(&mut self, name: &str, rep: usize) -> Result<GroupRef> {
        self.expect_kind(name, StructureKind::Group)?;
        match self.get(name, rep)? {
            Structure::Group(group) => Ok(group),
            Structure::Segment(_) => Err(ModelError::WrongKind {
                name: name.to_string(),
                expected: StructureKind::Group,
            }),
        }
    }

    /// Like [`Group::get`] for a slot that holds segments.
    pub fn get_segment(&mut self, name: &str, rep: usize) -> Result<SegmentRef> {
        self.expect_kind(name, StructureKind::Segment)?;
        match self.get(name, rep)? {
            Structure::Segment(segment) => Ok(segment),
            Structure::Group(_) => Err(ModelError::WrongKind {
                name: name.to_string(),
                expected: StructureKind::Segment,
            }),
        }
    }

    /// Appends a new repetition to slot `name`.
    pub fn add_new(&mut self, name: &str) -> Result<Structure> {
        let parent = self.self_ref.clone();
        let context = Rc::clone(&self.context);
        let item = self.item_mut(name)?;
        let instance = item.instances.push_new(&item.name, || {
            Structure::instantiate(&item.structure_type, parent, context)
        })?;
        Ok(instance.clone())
    }

    /// Creates a new repetition of slot `name` at position `index`.
    pub fn insert_repetition(&mut self, name: &str, index: usize) -> Result<Structure> {
        let parent = self.self_ref.clone();
        let context = Rc::clone(&self.context);
        let item = self.item_mut(name)?;
        let instance = item.instances.insert_new(&item.name, index, || {
            Structure::instantiate(&item.structure_type, parent, context)
        })?;
        Ok(instance.clone())
    }

    /// Removes `instance` from slot `name`.
    ///
    /// Returns `false` when the slot exists but doesn't hold that instance.
    pub fn remove_instance(&mut self, name: &str, instance: &Structure) -> Result<bool> {
        let group = self.name.clone();
        let item = self.item_mut(name)?;
        let removed = item
            .instances
            .remove_where(|candidate| candidate.ptr_eq(instance))
            .is_some();
        if !removed {
            warn!(group = %group, slot = name, "structure to remove is not a repetition of this slot");
        }
        Ok(removed)
    }

    /// Removes and returns repetition `index` of slot `name`.
    pub fn remove_at(&mut self, name: &str, index: usize) -> Result<Structure> {
        let item = self.item_mut(name)?;
        item.instances.remove_at(&item.name, index)
    }

    /// Slot names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }

    /// All materialised repetitions of slot `name`.
    pub fn all_instances(&self, name: &str) -> Result<&[Structure]> {
        Ok(self.item(name)?.instances.as_slice())
    }

    /// Number of materialised repetitions of slot `name`.
    pub fn reps(&self, name: &str) -> Result<usize> {
        Ok(self.item(name)?.instances.len())
    }

    pub fn is_required(&self, name: &str) -> Result<bool> {
        Ok(self.item(name)?.required)
    }

    pub fn is_repeating(&self, name: &str) -> Result<bool> {
        Ok(self.item(name)?.is_repeating())
    }

    pub fn is_group(&self, name: &str) -> Result<bool> {
        Ok(self.item(name)?.structure_type.kind() == StructureKind::Group)
    }

    /// Type declared for slot `name`.
    pub fn class_of(&self, name: &str) -> Result<&StructureType> {
        Ok(&self.item(name)?.structure_type)
    }

    /// True when no slot holds a non-empty repetition.
    pub fn is_empty(&self) -> bool {
        self.items
            .iter()
            .all(|item| item.instances.iter().all(Structure::is_empty))
    }

    /// Drops every materialised repetition; the declared slots stay.
    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.instances.clear();
        }
    }

    /// Renders the materialised tree below this group.
    pub fn print_structure(&self) -> String {
        let mut lines = Vec::new();
        render_group(self, &self.name, 0, &mut lines);
        lines.join("\n")
    }
}
