use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use ratingsapp_auth::gate;
use ratingsapp_core::errors::{AppError, ErrorCode};
use ratingsapp_core::system::{ADMIN_ROLE_LABEL, USER_ROLE_LABEL};
use ratingsapp_core::validation::{Scope, Validator, run_validation};
use ratingsapp_db::{RoleRepository, StoreError, constraints};
use ratingsapp_models::Role;

use crate::utils::rules;

#[derive(Debug, Clone, Copy)]
pub enum RoleStep {
    IdReset,
    NotSystemRole,
    LabelRequired,
    LabelNotReserved,
    NormalizeLabel,
    LabelLength,
}

const CREATE_STEPS: &[RoleStep] = &[
    RoleStep::IdReset,
    RoleStep::LabelRequired,
    RoleStep::LabelNotReserved,
    RoleStep::NormalizeLabel,
    RoleStep::LabelLength,
];

const UPDATE_STEPS: &[RoleStep] = &[
    RoleStep::NotSystemRole,
    RoleStep::LabelNotReserved,
    RoleStep::LabelRequired,
    RoleStep::NormalizeLabel,
    RoleStep::LabelLength,
];

const DELETE_STEPS: &[RoleStep] = &[RoleStep::NotSystemRole];

#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    /// Creates a role after running the create pipeline.
    ///
    /// The client-supplied id is discarded and the label is stored normalized.
    ///
    /// # Arguments
    ///
    /// * `role` - The decoded request body
    ///
    /// # Returns
    ///
    /// Returns the stored role with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a `validation_error` when a field rule fails. A label that is taken, or
    /// that names a system role, is reported as `{"label": "is_duplicate"}`.
    #[instrument(skip(self, role), fields(label = %role.label))]
    pub async fn create(&self, mut role: Role) -> Result<Role, AppError> {
        run_validation(self, &mut role, CREATE_STEPS).await?;
        self.roles.create(&mut role).await.map_err(translate_write)?;

        info!(role_id = role.id, "role created");
        Ok(role)
    }

    /// Replaces the label and permissions of role `id`.
    ///
    /// # Errors
    ///
    /// Returns `read_only` for the system roles, `not_found` for an unknown id, and a
    /// `validation_error` when a field rule fails.
    #[instrument(skip(self, role))]
    pub async fn update(&self, id: i64, mut role: Role) -> Result<Role, AppError> {
        role.id = id;
        run_validation(self, &mut role, UPDATE_STEPS).await?;
        self.roles.update(&role).await.map_err(translate_write)?;

        info!(role_id = id, "role updated");
        Ok(role)
    }

    /// Deletes role `id`. A role still assigned to a principal is `in_use`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut role = Role {
            id,
            ..Default::default()
        };
        run_validation(self, &mut role, DELETE_STEPS).await?;

        self.roles.delete(id).await.map_err(|err| match err {
            StoreError::ForeignKey(_) => AppError::from(ErrorCode::InUse),
            other => other.into(),
        })?;

        info!(role_id = id, "role deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Role, AppError> {
        Ok(self.roles.by_id(id).await?)
    }

    /// Lists every role, or only those in `ids`. Unknown ids are skipped.
    #[instrument(skip(self))]
    pub async fn list(&self, ids: Option<&[i64]>) -> Result<Vec<Role>, AppError> {
        Ok(self.roles.by_ids(ids).await?)
    }
}

#[async_trait]
impl Validator<Role> for RoleService {
    type Step = RoleStep;

    fn scope(&self, step: RoleStep) -> Scope {
        match step {
            RoleStep::IdReset | RoleStep::NotSystemRole => Scope::Record,
            _ => Scope::Field("label"),
        }
    }

    async fn check(&self, step: RoleStep, role: &mut Role) -> Result<(), AppError> {
        match step {
            RoleStep::IdReset => role.id = 0,
            RoleStep::NotSystemRole => gate::ensure_role_mutable(role.id)?,
            RoleStep::LabelRequired => rules::required(&role.label)?,
            RoleStep::LabelNotReserved => {
                let label = rules::normalize_label(&role.label);
                if label == ADMIN_ROLE_LABEL || label == USER_ROLE_LABEL {
                    return Err(ErrorCode::IsDuplicate.into());
                }
            }
            RoleStep::NormalizeLabel => role.label = rules::normalize_label(&role.label),
            RoleStep::LabelLength => rules::min_len(&role.label, rules::MIN_LABEL_LEN)?,
        }
        Ok(())
    }
}

fn translate_write(err: StoreError) -> AppError {
    match err {
        StoreError::Unique(constraint) if constraint == constraints::ROLES_PKEY => {
            AppError::field("id", ErrorCode::IdTaken)
        }
        StoreError::Unique(constraint) if constraint == constraints::ROLES_LABEL_KEY => {
            AppError::field("label", ErrorCode::IsDuplicate)
        }
        other => other.into(),
    }
}
