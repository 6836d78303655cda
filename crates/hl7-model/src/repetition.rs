//! Repetition store shared by structure slots and field slots.
//!
//! Repetitions grow contiguously: repetition `n + 1` can only be created once
//! repetition `n` exists, and never past the slot's cardinality.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Upper bound on the number of repetitions a slot may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    Bounded(usize),
    Unbounded,
}

impl Cardinality {
    /// Cardinality of a non-repeating slot.
    pub const SINGLE: Cardinality = Cardinality::Bounded(1);

    /// Maps a declared max repetition count; zero or less means unbounded.
    pub fn from_max_repetitions(max: i32) -> Self {
        match usize::try_from(max) {
            Ok(max) if max > 0 => Cardinality::Bounded(max),
            _ => Cardinality::Unbounded,
        }
    }

    pub fn from_repeating(repeating: bool) -> Self {
        if repeating {
            Cardinality::Unbounded
        } else {
            Cardinality::SINGLE
        }
    }

    pub fn max(&self) -> Option<usize> {
        match self {
            Cardinality::Bounded(max) => Some(*max),
            Cardinality::Unbounded => None,
        }
    }

    pub fn is_repeating(&self) -> bool {
        !matches!(self, Cardinality::Bounded(max) if *max <= 1)
    }

    /// True when a slot holding `count` repetitions may take one more.
    pub fn has_room(&self, count: usize) -> bool {
        match self {
            Cardinality::Bounded(max) => count < *max,
            Cardinality::Unbounded => true,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Repetitions<T> {
    items: Vec<T>,
    cardinality: Cardinality,
}

impl<T> Repetitions<T> {
    pub(crate) fn new(cardinality: Cardinality) -> Self {
        Self {
            items: Vec::new(),
            cardinality,
        }
    }

    pub(crate) fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    fn ensure_room(&self, name: &str) -> Result<()> {
        match self.cardinality {
            Cardinality::Bounded(max) if self.items.len() >= max => Err(if max <= 1 {
                ModelError::NonRepeating {
                    name: name.to_string(),
                }
            } else {
                ModelError::RepetitionLimit {
                    name: name.to_string(),
                    max,
                }
            }),
            _ => Ok(()),
        }
    }

    /// Returns repetition `rep`, creating it when `rep` is the next index.
    pub(crate) fn get_or_create(
        &mut self,
        name: &str,
        rep: usize,
        create: impl FnOnce() -> Result<T>,
    ) -> Result<&mut T> {
        let current = self.items.len();
        if rep > current {
            return Err(ModelError::RepetitionGap {
                name: name.to_string(),
                requested: rep,
                current,
            });
        }
        if rep == current {
            self.ensure_room(name)?;
            let item = create()?;
            self.items.push(item);
        }
        Ok(&mut self.items[rep])
    }

    pub(crate) fn push_new(
        &mut self,
        name: &str,
        create: impl FnOnce() -> Result<T>,
    ) -> Result<&mut T> {
        let index = self.items.len();
        self.insert_new(name, index, create)
    }

    pub(crate) fn insert_new(
        &mut self,
        name: &str,
        index: usize,
        create: impl FnOnce() -> Result<T>,
    ) -> Result<&mut T> {
        if index > self.items.len() {
            return Err(ModelError::IndexOutOfBounds {
                name: name.to_string(),
                index,
                len: self.items.len(),
            });
        }
        self.ensure_room(name)?;
        let item = create()?;
        self.items.insert(index, item);
        Ok(&mut self.items[index])
    }

    pub(crate) fn remove_at(&mut self, name: &str, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(ModelError::IndexOutOfBounds {
                name: name.to_string(),
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub(crate) fn remove_where(&mut self, matches: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.items.iter().position(matches)?;
        Some(self.items.remove(index))
    }
}
