use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, SeedId, ValidationError};

/// Fields of a new seed-bank entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDetails {
    pub name: String,
    pub bank: String,
    pub quantity: u32,
}

impl SeedDetails {
    pub fn new(name: impl Into<String>, bank: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            bank: bank.into(),
            quantity,
        }
    }

    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.quantity == 0 {
            return Err(ValidationError::out_of_range(
                "quantity",
                1,
                u32::MAX as i64,
                0,
            ));
        }
        Ok(Self {
            name,
            bank: self.bank.trim().to_string(),
            quantity: self.quantity,
        })
    }
}

/// A seed-bank entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seed {
    pub id: SeedId,
    pub name: String,
    pub bank: String,
    pub quantity: u32,
}

impl Seed {
    pub fn from_details(id: SeedId, details: SeedDetails) -> Self {
        Self {
            id,
            name: details.name,
            bank: details.bank,
            quantity: details.quantity,
        }
    }

    /// Checks that `requested` seeds can be germinated from this entry.
    pub fn check_germination(&self, requested: u32) -> Result<(), DomainError> {
        if requested == 0 {
            return Err(ValidationError::out_of_range(
                "quantity",
                1,
                self.quantity as i64,
                0,
            )
            .into());
        }
        if requested > self.quantity {
            return Err(DomainError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Cannot germinate {} seeds, only {} available",
                    requested, self.quantity
                ),
            )
            .with_detail("seed_id", self.id.to_string())
            .with_detail("available", self.quantity.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(quantity: u32) -> Seed {
        Seed::from_details(
            SeedId::new("s1").unwrap(),
            SeedDetails::new("Amnesia", "Dutch", quantity),
        )
    }

    #[test]
    fn germination_within_stock_is_allowed() {
        assert!(seed(5).check_germination(5).is_ok());
        assert!(seed(5).check_germination(1).is_ok());
    }

    #[test]
    fn germinating_more_than_available_is_rejected() {
        let err = seed(3).check_germination(4).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn germinating_nothing_is_rejected() {
        let err = seed(3).check_germination(0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn new_entries_need_name_and_quantity() {
        assert!(SeedDetails::new("", "b", 1).normalized().is_err());
        assert!(SeedDetails::new("x", "b", 0).normalized().is_err());
        assert_eq!(
            SeedDetails::new(" x ", " b ", 2).normalized().unwrap(),
            SeedDetails::new("x", "b", 2)
        );
    }
}
