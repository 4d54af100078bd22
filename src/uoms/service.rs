use std::sync::Arc;
use validator::Validate;

use crate::config::MutationPolicy;
use crate::error::ApiError;
use crate::uoms::{NewUom, Uom, UomInput, UomStore};

/// Service layer for unit-of-measure CRUD
#[derive(Clone)]
pub struct UomService {
    uoms: Arc<dyn UomStore>,
    mutation: MutationPolicy,
}

impl UomService {
    pub fn new(uoms: Arc<dyn UomStore>, mutation: MutationPolicy) -> Self {
        Self { uoms, mutation }
    }

    pub async fn create_uom(&self, user_id: i32, input: UomInput) -> Result<Uom, ApiError> {
        input.validate()?;

        let uom = self
            .uoms
            .create(NewUom {
                name: input.name,
                user_id,
            })
            .await?;

        tracing::info!(uom_id = uom.id, user_id, "Unit created");
        Ok(uom)
    }

    pub async fn get_uom(&self, id: i32) -> Result<Uom, ApiError> {
        self.uoms
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Uom", id))
    }

    pub async fn list_uoms(&self) -> Result<Vec<Uom>, ApiError> {
        Ok(self.uoms.find_all().await?)
    }

    pub async fn update_uom(&self, id: i32, caller: i32, input: UomInput) -> Result<Uom, ApiError> {
        input.validate()?;

        let existing = self.get_uom(id).await?;
        self.authorize(&existing, caller)?;

        let uom = self
            .uoms
            .update(id, &input.name)
            .await?
            .ok_or_else(|| ApiError::not_found("Uom", id))?;

        tracing::info!(uom_id = id, caller, "Unit updated");
        Ok(uom)
    }

    pub async fn delete_uom(&self, id: i32, caller: i32) -> Result<(), ApiError> {
        let existing = self.get_uom(id).await?;
        self.authorize(&existing, caller)?;

        if !self.uoms.delete(id).await? {
            return Err(ApiError::not_found("Uom", id));
        }

        tracing::info!(uom_id = id, caller, "Unit deleted");
        Ok(())
    }

    fn authorize(&self, uom: &Uom, caller: i32) -> Result<(), ApiError> {
        if self.mutation.permits(uom.user_id, caller) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Only the unit's creator may modify it".to_string()))
        }
    }
}
