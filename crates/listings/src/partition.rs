use crate::error::ListingError;
use chrono::{DateTime, Utc};
use core_types::{EntityCard, EntityKind, ShowView};
use database::CatalogStore;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Where a show falls relative to the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
}

/// Strict comparison: a show starting exactly at `reference` is neither past nor upcoming.
pub fn classify(start_time: &DateTime<Utc>, reference: &DateTime<Utc>) -> Option<Timing> {
    match start_time.cmp(reference) {
        Ordering::Less => Some(Timing::Past),
        Ordering::Greater => Some(Timing::Upcoming),
        Ordering::Equal => None,
    }
}

/// The shows of one venue or artist, split around a reference time.
/// Both lists keep the store's fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionedShows {
    pub past: Vec<ShowView>,
    pub upcoming: Vec<ShowView>,
}

/// Splits the shows of `entity_id` into past and upcoming, each enriched with
/// the counterpart's display card.
///
/// Fails with `ListingError::NotFound` before any classification when the root
/// entity does not exist.
pub async fn partition_shows(
    store: &dyn CatalogStore,
    entity_id: i32,
    kind: EntityKind,
    reference_time: DateTime<Utc>,
) -> Result<PartitionedShows, ListingError> {
    if !store.exists(kind, entity_id).await? {
        return Err(ListingError::NotFound {
            kind,
            id: entity_id,
        });
    }
    partition_existing(store, entity_id, kind, reference_time).await
}

/// Same as `partition_shows` for a root entity the caller has already loaded.
pub(crate) async fn partition_existing(
    store: &dyn CatalogStore,
    entity_id: i32,
    kind: EntityKind,
    reference_time: DateTime<Utc>,
) -> Result<PartitionedShows, ListingError> {
    let shows = store.shows_for(kind, entity_id).await?;

    // One batched lookup for every distinct counterpart instead of one per show.
    let counterpart = kind.counterpart();
    let ids: Vec<i32> = shows
        .iter()
        .map(|s| counterpart_id(kind, s.venue_id, s.artist_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let cards: HashMap<i32, EntityCard> = store
        .cards(counterpart, &ids)
        .await?
        .into_iter()
        .map(|card| (card.id, card))
        .collect();

    let mut partitioned = PartitionedShows::default();
    for show in &shows {
        let Some(timing) = classify(&show.start_time, &reference_time) else {
            continue;
        };
        let id = counterpart_id(kind, show.venue_id, show.artist_id);
        let card = cards.get(&id).ok_or(ListingError::DanglingReference {
            kind: counterpart,
            id,
        })?;
        let view = ShowView::new(card, &show.start_time);
        match timing {
            Timing::Past => partitioned.past.push(view),
            Timing::Upcoming => partitioned.upcoming.push(view),
        }
    }

    tracing::debug!(
        %kind,
        entity_id,
        total = shows.len(),
        past = partitioned.past.len(),
        upcoming = partitioned.upcoming.len(),
        "Partitioned shows."
    );
    Ok(partitioned)
}

fn counterpart_id(kind: EntityKind, venue_id: i32, artist_id: i32) -> i32 {
    match kind {
        EntityKind::Venue => artist_id,
        EntityKind::Artist => venue_id,
    }
}
