use super::*;

impl AccessGateway {
    /// Validates and stores a new record.
    ///
    /// An invalid submission is returned as [`AppError::ValidationFailed`] and
    /// never reaches the store.
    pub async fn add(
        &self,
        caller: &Caller,
        record_type: &str,
        input: &FormInput,
    ) -> AppResult<Record> {
        let record_type = self.catalog.require(record_type)?;
        self.policy
            .require(caller, record_type.logical_name(), Operation::Add)?;

        let validated = match self.validator.validate(record_type, input).await? {
            ValidationResult::Valid(validated) => validated,
            ValidationResult::Invalid(errors) => return Err(AppError::ValidationFailed(errors)),
        };

        let record = self
            .store
            .insert(
                record_type.logical_name(),
                validated.fields,
                validated.status,
            )
            .await?;

        Self::audit(
            caller,
            AuditAction::RecordCreated,
            record_type.logical_name(),
            record.id(),
        );

        Ok(record)
    }

    /// Applies a partial update to an existing record.
    ///
    /// Existence is checked before the `change` grant, so a missing record is
    /// reported as not found even to callers without the grant.
    pub async fn update(
        &self,
        caller: &Caller,
        record_type: &str,
        id: RecordId,
        input: &FormInput,
    ) -> AppResult<Record> {
        let record_type = self.catalog.require(record_type)?;
        let existing = self.store.get(record_type.logical_name(), id).await?;
        self.policy
            .require(caller, record_type.logical_name(), Operation::Change)?;

        let validated = match self
            .validator
            .validate_update(record_type, &existing, input)
            .await?
        {
            ValidationResult::Valid(validated) => validated,
            ValidationResult::Invalid(errors) => return Err(AppError::ValidationFailed(errors)),
        };

        let record = self
            .store
            .update(
                record_type.logical_name(),
                id,
                validated.fields,
                validated.status,
            )
            .await?;

        Self::audit(
            caller,
            AuditAction::RecordUpdated,
            record_type.logical_name(),
            id,
        );

        Ok(record)
    }

    /// Physically removes a record. References to it are left untouched.
    pub async fn delete(&self, caller: &Caller, record_type: &str, id: RecordId) -> AppResult<()> {
        let record_type = self.catalog.require(record_type)?;
        if self
            .store
            .find_status(record_type.logical_name(), id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "{} {} does not exist",
                record_type.logical_name(),
                id
            )));
        }
        self.policy
            .require(caller, record_type.logical_name(), Operation::Delete)?;

        self.store.delete(record_type.logical_name(), id).await?;

        Self::audit(
            caller,
            AuditAction::RecordDeleted,
            record_type.logical_name(),
            id,
        );

        Ok(())
    }
}
