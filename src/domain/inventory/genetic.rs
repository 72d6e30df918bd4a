use serde::Serialize;

use crate::domain::foundation::{GeneticId, ValidationError};

/// Editable fields of a strain record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneticDetails {
    pub name: String,
    pub parents: String,
    pub bank: String,
    pub owner: String,
    pub clone_stock: i64,
}

impl GeneticDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parents(mut self, parents: impl Into<String>) -> Self {
        self.parents = parents.into();
        self
    }

    pub fn with_bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = bank.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_clone_stock(mut self, clone_stock: i64) -> Self {
        self.clone_stock = clone_stock;
        self
    }

    /// Trims text fields; the name is required and the stock starts at zero or more.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.clone_stock < 0 {
            return Err(ValidationError::out_of_range(
                "clone_stock",
                0,
                i64::MAX,
                self.clone_stock,
            ));
        }
        Ok(Self {
            name,
            parents: self.parents.trim().to_string(),
            bank: self.bank.trim().to_string(),
            owner: self.owner.trim().to_string(),
            clone_stock: self.clone_stock,
        })
    }
}

/// A strain with its clone stock.
///
/// Stock changes are signed increments applied by the store, so a stored
/// value may fall below zero when clones are taken from an empty stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Genetic {
    pub id: GeneticId,
    pub name: String,
    pub parents: String,
    pub bank: String,
    pub owner: String,
    pub clone_stock: i64,
}

impl Genetic {
    pub fn from_details(id: GeneticId, details: GeneticDetails) -> Self {
        Self {
            id,
            name: details.name,
            parents: details.parents,
            bank: details.bank,
            owner: details.owner,
            clone_stock: details.clone_stock,
        }
    }
}
