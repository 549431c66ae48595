use super::*;
use crate::{MAX_RECORD_LIST_LIMIT, RecordListQuery, RecordScan, RecordSearch};

impl AccessGateway {
    /// Lists one page of records of a type in the type's list ordering.
    ///
    /// Search text is matched against the type's search fields; blank
    /// search text is ignored.
    pub async fn list(
        &self,
        caller: &Caller,
        record_type: &str,
        query: RecordListQuery,
    ) -> AppResult<Vec<Record>> {
        let record_type = self.catalog.require(record_type)?;
        self.policy
            .require(caller, record_type.logical_name(), Operation::View)?;

        let scan = list_scan(record_type, query)?;
        self.store.list(record_type.logical_name(), &scan).await
    }

    /// Returns one record.
    pub async fn get(&self, caller: &Caller, record_type: &str, id: RecordId) -> AppResult<Record> {
        let record_type = self.catalog.require(record_type)?;
        self.policy
            .require(caller, record_type.logical_name(), Operation::View)?;

        self.store.get(record_type.logical_name(), id).await
    }
}

fn list_scan(record_type: &RecordType, query: RecordListQuery) -> AppResult<RecordScan> {
    if query.limit == 0 {
        return Err(AppError::Validation(
            "record list limit must be greater than zero".to_owned(),
        ));
    }
    if query.limit > MAX_RECORD_LIST_LIMIT {
        return Err(AppError::Validation(format!(
            "record list limit must not exceed {MAX_RECORD_LIST_LIMIT}"
        )));
    }

    let search = query
        .search
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .map(|text| RecordSearch {
            text,
            fields: record_type.search_fields().to_vec(),
        });

    Ok(RecordScan {
        ordering: record_type.ordering(),
        status: query.status,
        search,
        limit: query.limit,
        offset: query.offset,
    })
}
