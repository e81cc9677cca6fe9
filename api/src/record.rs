/// A persisted backend record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordRef {
    pub model: String,
    pub id: i64,
}

impl RecordRef {
    pub fn new(model: impl Into<String>, id: i64) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

/// A field on `record` that holds the identifier linked to a visible code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedField {
    pub record: RecordRef,
    pub field: String,
}

impl LinkedField {
    pub fn new(record: RecordRef, field: impl Into<String>) -> Self {
        Self {
            record,
            field: field.into(),
        }
    }
}
