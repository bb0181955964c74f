use core_types::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("No {kind} with id {id}")]
    NotFound { kind: EntityKind, id: i32 },

    #[error("Show references missing {kind} {id}")]
    DanglingReference { kind: EntityKind, id: i32 },

    #[error("Database error: {0}")]
    Persistence(#[from] database::DbError),
}
