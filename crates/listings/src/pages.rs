//! Page-level projections built on top of the partitioner: the venue and artist
//! detail pages, the venue index grouped by area, and the show board.

use crate::error::ListingError;
use crate::partition::{PartitionedShows, Timing, classify, partition_existing};
use chrono::{DateTime, Utc};
use core_types::{Artist, EntityCard, EntityKind, NameMatch, ShowView, Venue, format_start_time};
use database::CatalogStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ShowView>,
    pub upcoming_shows: Vec<ShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ShowView>,
    pub upcoming_shows: Vec<ShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// All venues sharing one city and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// One row of the show board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowCard {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

pub async fn venue_detail(
    store: &dyn CatalogStore,
    venue_id: i32,
    reference_time: DateTime<Utc>,
) -> Result<VenueDetail, ListingError> {
    let venue = store
        .get_venue(venue_id)
        .await?
        .ok_or(ListingError::NotFound {
            kind: EntityKind::Venue,
            id: venue_id,
        })?;
    let PartitionedShows { past, upcoming } =
        partition_existing(store, venue_id, EntityKind::Venue, reference_time).await?;

    Ok(VenueDetail {
        venue,
        past_shows_count: past.len(),
        upcoming_shows_count: upcoming.len(),
        past_shows: past,
        upcoming_shows: upcoming,
    })
}

pub async fn artist_detail(
    store: &dyn CatalogStore,
    artist_id: i32,
    reference_time: DateTime<Utc>,
) -> Result<ArtistDetail, ListingError> {
    let artist = store
        .get_artist(artist_id)
        .await?
        .ok_or(ListingError::NotFound {
            kind: EntityKind::Artist,
            id: artist_id,
        })?;
    let PartitionedShows { past, upcoming } =
        partition_existing(store, artist_id, EntityKind::Artist, reference_time).await?;

    Ok(ArtistDetail {
        artist,
        past_shows_count: past.len(),
        upcoming_shows_count: upcoming.len(),
        past_shows: past,
        upcoming_shows: upcoming,
    })
}

/// Groups venues by `(city, state)`, ordered by state then city. Venues inside
/// an area keep the store's `id` order.
pub async fn venues_by_area(
    store: &dyn CatalogStore,
    reference_time: DateTime<Utc>,
) -> Result<Vec<Area>, ListingError> {
    let venues = store.list_venues().await?;
    let shows = store.list_shows().await?;

    let mut upcoming: HashMap<i32, usize> = HashMap::new();
    for show in &shows {
        if classify(&show.start_time, &reference_time) == Some(Timing::Upcoming) {
            *upcoming.entry(show.venue_id).or_default() += 1;
        }
    }

    let mut areas: BTreeMap<(String, String), Vec<VenueSummary>> = BTreeMap::new();
    for venue in venues {
        areas
            .entry((venue.state, venue.city))
            .or_default()
            .push(VenueSummary {
                id: venue.id,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            });
    }

    Ok(areas
        .into_iter()
        .map(|((state, city), venues)| Area {
            city,
            state,
            venues,
        })
        .collect())
}

/// Every show with its venue and artist names, in the store's fetch order.
pub async fn show_board(store: &dyn CatalogStore) -> Result<Vec<ShowCard>, ListingError> {
    let shows = store.list_shows().await?;
    let venue_ids: Vec<i32> = shows.iter().map(|s| s.venue_id).collect();
    let artist_ids: Vec<i32> = shows.iter().map(|s| s.artist_id).collect();
    let venues = card_index(store.cards(EntityKind::Venue, &venue_ids).await?);
    let artists = card_index(store.cards(EntityKind::Artist, &artist_ids).await?);

    shows
        .iter()
        .map(|show| {
            let venue = venues
                .get(&show.venue_id)
                .ok_or(ListingError::DanglingReference {
                    kind: EntityKind::Venue,
                    id: show.venue_id,
                })?;
            let artist = artists
                .get(&show.artist_id)
                .ok_or(ListingError::DanglingReference {
                    kind: EntityKind::Artist,
                    id: show.artist_id,
                })?;
            Ok(ShowCard {
                venue_id: venue.id,
                venue_name: venue.name.clone(),
                artist_id: artist.id,
                artist_name: artist.name.clone(),
                artist_image_link: artist.image_link.clone(),
                start_time: format_start_time(&show.start_time),
            })
        })
        .collect()
}

/// Every artist as an `{id, name}` pair, in `id` order.
pub async fn artist_directory(store: &dyn CatalogStore) -> Result<Vec<NameMatch>, ListingError> {
    Ok(store
        .list_artists()
        .await?
        .into_iter()
        .map(|a| NameMatch {
            id: a.id,
            name: a.name,
        })
        .collect())
}

fn card_index(cards: Vec<EntityCard>) -> HashMap<i32, EntityCard> {
    cards.into_iter().map(|c| (c.id, c)).collect()
}
