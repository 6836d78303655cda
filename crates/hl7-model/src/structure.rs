use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::context::ModelContext;
use crate::definition::{Shape, StructureKind, StructureType};
use crate::error::{ModelError, Result};
use crate::group::Group;
use crate::naming::structure_name;
use crate::segment::Segment;

pub type GroupRef = Rc<RefCell<Group>>;
pub type SegmentRef = Rc<RefCell<Segment>>;

/// A materialised group or segment.
///
/// Cloning yields another handle to the same node; use [`Structure::ptr_eq`]
/// to compare identity.
#[derive(Debug, Clone)]
pub enum Structure {
    Group(GroupRef),
    Segment(SegmentRef),
}

impl Structure {
    /// Creates an instance of `structure_type` as a child of `parent`.
    pub(crate) fn instantiate(
        structure_type: &StructureType,
        parent: Weak<RefCell<Group>>,
        context: Rc<ModelContext>,
    ) -> Result<Structure> {
        let name = structure_name(structure_type, context.message_name());
        trace!(structure = %name, type_name = structure_type.name(), "instantiating structure");
        match structure_type.shape() {
            Shape::Group(shape) => {
                let group = Group::new_ref(name, structure_type.clone(), parent, context);
                shape(&mut group.borrow_mut())
                    .map_err(|error| ModelError::instantiation(structure_type.name(), error))?;
                Ok(Structure::Group(group))
            }
            Shape::Segment(shape) => {
                let segment = Segment::new_ref(name, structure_type.clone(), parent, context);
                shape(&mut segment.borrow_mut())
                    .map_err(|error| ModelError::instantiation(structure_type.name(), error))?;
                Ok(Structure::Segment(segment))
            }
            Shape::Generic(StructureKind::Group) => Ok(Structure::Group(Group::new_ref(
                name,
                structure_type.clone(),
                parent,
                context,
            ))),
            Shape::Generic(StructureKind::Segment) => Ok(Structure::Segment(Segment::new_ref(
                name,
                structure_type.clone(),
                parent,
                context,
            ))),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::Group(_) => StructureKind::Group,
            Structure::Segment(_) => StructureKind::Segment,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Structure::Group(group) => group.borrow().name().to_string(),
            Structure::Segment(segment) => segment.borrow().name().to_string(),
        }
    }

    /// True when both handles point at the same node.
    pub fn ptr_eq(&self, other: &Structure) -> bool {
        match (self, other) {
            (Structure::Group(a), Structure::Group(b)) => Rc::ptr_eq(a, b),
            (Structure::Segment(a), Structure::Segment(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_group(&self) -> Option<&GroupRef> {
        match self {
            Structure::Group(group) => Some(group),
            Structure::Segment(_) => None,
        }
    }

    pub fn as_segment(&self) -> Option<&SegmentRef> {
        match self {
            Structure::Segment(segment) => Some(segment),
            Structure::Group(_) => None,
        }
    }

    pub fn parent(&self) -> Option<GroupRef> {
        match self {
            Structure::Group(group) => group.borrow().parent(),
            Structure::Segment(segment) => segment.borrow().parent(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Structure::Group(group) => group.borrow().is_empty(),
            Structure::Segment(segment) => segment.borrow().is_empty(),
        }
    }
}
