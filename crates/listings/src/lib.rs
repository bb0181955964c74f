//! Read-side logic of the catalog: splitting a venue's or artist's shows into
//! past and upcoming, name search, and the page projections built on both.
//!
//! Every operation takes the store explicitly and holds no state between calls.

pub mod error;
pub mod pages;
pub mod partition;
pub mod search;

pub use error::ListingError;
pub use pages::{
    Area, ArtistDetail, ShowCard, VenueDetail, VenueSummary, artist_detail, artist_directory,
    show_board, venue_detail, venues_by_area,
};
pub use partition::{PartitionedShows, Timing, classify, partition_shows};
pub use search::search;
