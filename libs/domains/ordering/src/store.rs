//! In-memory line-item store.
//!
//! Vector of profiles with stable ids: insertion order is display order, and
//! resolution functions stay pure transforms over a snapshot of this store.
//! Nothing here is persisted.

use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderingError, OrderingResult};
use crate::models::{CreateServiceProfile, ServiceProfile, UpdateServiceProfile};

#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: Vec<ServiceProfile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new line item.
    pub fn add(&mut self, input: CreateServiceProfile) -> OrderingResult<ServiceProfile> {
        input.validate()?;
        let profile = ServiceProfile::new(input);
        tracing::debug!(profile_id = %profile.id, kind = %profile.kind, "Added line item");
        self.profiles.push(profile.clone());
        Ok(profile)
    }

    pub fn get(&self, id: Uuid) -> Option<&ServiceProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Apply a field-level edit to an existing line item.
    pub fn update(
        &mut self,
        id: Uuid,
        update: UpdateServiceProfile,
    ) -> OrderingResult<ServiceProfile> {
        update.validate()?;
        let profile = self
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(OrderingError::ProfileNotFound(id))?;
        profile.apply(update);
        Ok(profile.clone())
    }

    /// Remove a line item; returns the removed profile.
    pub fn remove(&mut self, id: Uuid) -> OrderingResult<ServiceProfile> {
        let position = self
            .profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or(OrderingError::ProfileNotFound(id))?;
        Ok(self.profiles.remove(position))
    }

    /// Drop every line item (form reset).
    pub fn reset(&mut self) {
        self.profiles.clear();
    }

    pub fn profiles(&self) -> &[ServiceProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
