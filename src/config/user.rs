//! Signed-in account configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::UserId;

/// The account whose journal the binary reports on.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub user_id: String,
}

impl UserConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.id().map(|_| ())
    }

    pub fn id(&self) -> Result<UserId, ValidationError> {
        UserId::new(self.user_id.trim()).map_err(|_| ValidationError::MissingRequired("user.user_id"))
    }
}
