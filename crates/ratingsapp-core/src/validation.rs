//! Ordered validation pipeline.
//!
//! A resource validator declares its steps as a `Copy` enum and exposes them as
//! const slices, one per operation. [`run_validation`] walks a slice in order and
//! applies these rules:
//!
//! - A [`Scope::Field`] step is skipped once its field already holds an error, so
//!   the first error recorded for a field wins.
//! - A [`Scope::Record`] step only runs while no field errors exist. Its error is
//!   returned unchanged and stops the pipeline.
//! - A field step failing with [`AppError::Validation`] merges the nested fields
//!   under `"<field>.<nested>"`. A field step failing with [`AppError::Public`]
//!   records the code under the field.
//! - [`AppError::Internal`] from any step stops the pipeline immediately.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::errors::{AppError, ValidationErrors};

/// What a validation step is checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Whole-record step (session or model level).
    Record,
    /// Step bound to a single field name.
    Field(&'static str),
}

#[async_trait]
pub trait Validator<T: Send>: Sync {
    type Step: Copy + Send + Sync + Debug;

    fn scope(&self, step: Self::Step) -> Scope;

    /// Runs one step. Steps may mutate the record (normalization, server-owned
    /// fields, state fetched for later steps).
    async fn check(&self, step: Self::Step, record: &mut T) -> Result<(), AppError>;
}

pub async fn run_validation<T, V>(
    validator: &V,
    record: &mut T,
    steps: &[V::Step],
) -> Result<(), AppError>
where
    T: Send,
    V: Validator<T> + ?Sized,
{
    let mut errors = ValidationErrors::new();

    for &step in steps {
        match validator.scope(step) {
            Scope::Record => {
                if !errors.is_empty() {
                    continue;
                }
                validator.check(step, record).await?;
            }
            Scope::Field(field) => {
                if errors.contains(field) {
                    continue;
                }
                match validator.check(step, record).await {
                    Ok(()) => {}
                    Err(AppError::Validation(nested)) => errors.merge_nested(field, nested),
                    Err(AppError::Public(code)) => errors.insert(field, code),
                    Err(err @ AppError::Internal(_)) => {
                        tracing::debug!(?step, field, "validation step failed internally");
                        return Err(err);
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
