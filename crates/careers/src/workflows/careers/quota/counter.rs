use std::sync::Arc;

use super::super::domain::CareerStatus;
use super::super::repository::{CareerStore, RepositoryError};

/// Counts the careers that currently occupy an organization's job slots.
pub struct ActiveCareerCounter<C> {
    store: Arc<C>,
}

impl<C> ActiveCareerCounter<C>
where
    C: CareerStore + 'static,
{
    pub fn new(store: Arc<C>) -> Self {
        Self { store }
    }

    /// `org_ref` is compared verbatim with each career's stored organization reference.
    pub async fn count(&self, org_ref: &str) -> Result<u64, RepositoryError> {
        self.store
            .count_by_status(org_ref, &CareerStatus::ACTIVE_SET)
            .await
    }
}
