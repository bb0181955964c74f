use crate::DbError;
use crate::store::CatalogStore;
use async_trait::async_trait;
use core_types::{
    Artist, EntityCard, EntityKind, NameMatch, NewArtist, NewShow, NewVenue, Show, Venue,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    venues: Vec<Venue>,
    artists: Vec<Artist>,
    shows: Vec<Show>,
}

/// A process-local `CatalogStore` with the same ordering guarantees as the
/// PostgreSQL repository. Used by tests and by the `--demo` flag.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails as if the pool had been closed.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::ConnectionError(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

fn next_id(ids: impl Iterator<Item = i32>) -> i32 {
    ids.max().unwrap_or(0) + 1
}

fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn insert_venue(&self, venue: &NewVenue) -> Result<Venue, DbError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let created = Venue {
            id: next_id(tables.venues.iter().map(|v| v.id)),
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genres.clone(),
            image_link: venue.image_link.clone(),
            facebook_link: venue.facebook_link.clone(),
            website: venue.website.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        };
        tables.venues.push(created.clone());
        Ok(created)
    }

    async fn insert_artist(&self, artist: &NewArtist) -> Result<Artist, DbError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let created = Artist {
            id: next_id(tables.artists.iter().map(|a| a.id)),
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genres.clone(),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            website: artist.website.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        };
        tables.artists.push(created.clone());
        Ok(created)
    }

    async fn insert_show(&self, show: &NewShow) -> Result<Show, DbError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        if !tables.venues.iter().any(|v| v.id == show.venue_id) {
            return Err(DbError::InvalidReference(EntityKind::Venue, show.venue_id));
        }
        if !tables.artists.iter().any(|a| a.id == show.artist_id) {
            return Err(DbError::InvalidReference(EntityKind::Artist, show.artist_id));
        }
        let created = Show {
            id: next_id(tables.shows.iter().map(|s| s.id)),
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            start_time: show.start_time,
        };
        tables.shows.push(created.clone());
        Ok(created)
    }

    async fn get_venue(&self, id: i32) -> Result<Option<Venue>, DbError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.venues.iter().find(|v| v.id == id).cloned())
    }

    async fn get_artist(&self, id: i32) -> Result<Option<Artist>, DbError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.artists.iter().find(|a| a.id == id).cloned())
    }

    async fn exists(&self, kind: EntityKind, id: i32) -> Result<bool, DbError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(match kind {
            EntityKind::Venue => tables.venues.iter().any(|v| v.id == id),
            EntityKind::Artist => tables.artists.iter().any(|a| a.id == id),
        })
    }

    async fn list_venues(&self) -> Result<Vec<Venue>, DbError> {
        self.check_available()?;
        Ok(self.tables.lock().await.venues.clone())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, DbError> {
        self.check_available()?;
        Ok(self.tables.lock().await.artists.clone())
    }

    async fn list_shows(&self) -> Result<Vec<Show>, DbError> {
        self.check_available()?;
        let mut shows = self.tables.lock().await.shows.clone();
        shows.sort_by_key(|s| (s.start_time, s.id));
        Ok(shows)
    }

    async fn shows_for(&self, kind: EntityKind, id: i32) -> Result<Vec<Show>, DbError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut shows: Vec<Show> = tables
            .shows
            .iter()
            .filter(|s| match kind {
                EntityKind::Venue => s.venue_id == id,
                EntityKind::Artist => s.artist_id == id,
            })
            .cloned()
            .collect();
        shows.sort_by_key(|s| (s.start_time, s.id));
        Ok(shows)
    }

    async fn cards(&self, kind: EntityKind, ids: &[i32]) -> Result<Vec<EntityCard>, DbError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let cards = match kind {
            EntityKind::Venue => tables
                .venues
                .iter()
                .filter(|v| ids.contains(&v.id))
                .map(|v| EntityCard {
                    id: v.id,
                    name: v.name.clone(),
                    image_link: v.image_link.clone(),
                })
                .collect(),
            EntityKind::Artist => tables
                .artists
                .iter()
                .filter(|a| ids.contains(&a.id))
                .map(|a| EntityCard {
                    id: a.id,
                    name: a.name.clone(),
                    image_link: a.image_link.clone(),
                })
                .collect(),
        };
        Ok(cards)
    }

    async fn search_by_name(
        &self,
        kind: EntityKind,
        term: &str,
    ) -> Result<Vec<NameMatch>, DbError> {
        self.check_available()?;
        let needle = term.to_lowercase();
        let tables = self.tables.lock().await;
        let matches = match kind {
            EntityKind::Venue => tables
                .venues
                .iter()
                .filter(|v| name_contains(&v.name, &needle))
                .map(|v| NameMatch {
                    id: v.id,
                    name: v.name.clone(),
                })
                .collect(),
            EntityKind::Artist => tables
                .artists
                .iter()
                .filter(|a| name_contains(&a.name, &needle))
                .map(|a| NameMatch {
                    id: a.id,
                    name: a.name.clone(),
                })
                .collect(),
        };
        Ok(matches)
    }
}
