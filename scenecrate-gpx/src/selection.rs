//! Current selection of the scene

use crate::representation::{RepresentationId, SelectionOwner};

/// Ordered set of selected owners
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    owners: Vec<SelectionOwner>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `owner` if it is not selected, deselect it otherwise.
    /// Returns `true` if the owner is selected afterwards.
    pub fn toggle(&mut self, owner: SelectionOwner) -> bool {
        match self.owners.iter().position(|selected| *selected == owner) {
            Some(index) => {
                self.owners.remove(index);
                false
            }
            None => {
                self.owners.push(owner);
                true
            }
        }
    }

    pub fn contains(&self, owner: &SelectionOwner) -> bool {
        self.owners.contains(owner)
    }

    pub fn clear(&mut self) {
        self.owners.clear();
    }

    /// Drop every owner belonging to `representation`; returns how many were removed
    pub fn remove_representation(&mut self, representation: RepresentationId) -> usize {
        let before = self.owners.len();
        self.owners.retain(|owner| owner.representation() != representation);
        before - self.owners.len()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionOwner> + '_ {
        self.owners.iter()
    }
}
