pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::EntityKind;
pub use error::CoreError;
pub use structs::{
    Artist, EntityCard, NameMatch, NewArtist, NewShow, NewVenue, SearchResults, Show, ShowView,
    Venue, format_start_time,
};
