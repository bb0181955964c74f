use crate::DbError;
use crate::store::{CatalogStore, escape_like};
use async_trait::async_trait;
use core_types::{
    Artist, EntityCard, EntityKind, NameMatch, NewArtist, NewShow, NewVenue, Show, Venue,
};
use sqlx::postgres::PgPool;

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, genres, image_link, \
     facebook_link, website, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, \
     facebook_link, website, seeking_venue, seeking_description";

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Venue => "venues",
        EntityKind::Artist => "artists",
    }
}

fn show_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Venue => "venue_id",
        EntityKind::Artist => "artist_id",
    }
}

/// Translates a foreign-key violation on `shows` into the side that failed to resolve.
fn map_show_insert_error(err: sqlx::Error, show: &NewShow) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return match db_err.constraint() {
                Some(c) if c.contains("artist") => {
                    DbError::InvalidReference(EntityKind::Artist, show.artist_id)
                }
                _ => DbError::InvalidReference(EntityKind::Venue, show.venue_id),
            };
        }
    }
    err.into()
}

#[async_trait]
impl CatalogStore for DbRepository {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn insert_venue(&self, venue: &NewVenue) -> Result<Venue, DbError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO venues (
                name, city, state, address, phone, genres, image_link,
                facebook_link, website, seeking_talent, seeking_description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {VENUE_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Venue>(&sql)
            .bind(&venue.name)
            .bind(&venue.city)
            .bind(&venue.state)
            .bind(&venue.address)
            .bind(&venue.phone)
            .bind(&venue.genres)
            .bind(&venue.image_link)
            .bind(&venue.facebook_link)
            .bind(&venue.website)
            .bind(venue.seeking_talent)
            .bind(&venue.seeking_description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn insert_artist(&self, artist: &NewArtist) -> Result<Artist, DbError> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            r#"
            INSERT INTO artists (
                name, city, state, phone, genres, image_link,
                facebook_link, website, seeking_venue, seeking_description
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ARTIST_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Artist>(&sql)
            .bind(&artist.name)
            .bind(&artist.city)
            .bind(&artist.state)
            .bind(&artist.phone)
            .bind(&artist.genres)
            .bind(&artist.image_link)
            .bind(&artist.facebook_link)
            .bind(&artist.website)
            .bind(artist.seeking_venue)
            .bind(&artist.seeking_description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn insert_show(&self, show: &NewShow) -> Result<Show, DbError> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Show>(
            r#"
            INSERT INTO shows (venue_id, artist_id, start_time)
            VALUES ($1, $2, $3)
            RETURNING id, venue_id, artist_id, start_time
            "#,
        )
        .bind(show.venue_id)
        .bind(show.artist_id)
        .bind(show.start_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_show_insert_error(e, show))?;
        tx.commit().await?;
        Ok(created)
    }

    async fn get_venue(&self, id: i32) -> Result<Option<Venue>, DbError> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1");
        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(venue)
    }

    async fn get_artist(&self, id: i32) -> Result<Option<Artist>, DbError> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = $1");
        let artist = sqlx::query_as::<_, Artist>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(artist)
    }

    async fn exists(&self, kind: EntityKind, id: i32) -> Result<bool, DbError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", table(kind));
        let found = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }

    async fn list_venues(&self) -> Result<Vec<Venue>, DbError> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id ASC");
        let venues = sqlx::query_as::<_, Venue>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(venues)
    }

    async fn list_artists(&self) -> Result<Vec<Artist>, DbError> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id ASC");
        let artists = sqlx::query_as::<_, Artist>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(artists)
    }

    async fn list_shows(&self) -> Result<Vec<Show>, DbError> {
        let shows = sqlx::query_as::<_, Show>(
            "SELECT id, venue_id, artist_id, start_time FROM shows ORDER BY start_time ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(shows)
    }

    async fn shows_for(&self, kind: EntityKind, id: i32) -> Result<Vec<Show>, DbError> {
        let sql = format!(
            r#"
            SELECT id, venue_id, artist_id, start_time
            FROM shows
            WHERE {} = $1
            ORDER BY start_time ASC, id ASC
            "#,
            show_key(kind)
        );
        let shows = sqlx::query_as::<_, Show>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(shows)
    }

    async fn cards(&self, kind: EntityKind, ids: &[i32]) -> Result<Vec<EntityCard>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, name, image_link FROM {} WHERE id = ANY($1) ORDER BY id ASC",
            table(kind)
        );
        let cards = sqlx::query_as::<_, EntityCard>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(cards)
    }

    async fn search_by_name(
        &self,
        kind: EntityKind,
        term: &str,
    ) -> Result<Vec<NameMatch>, DbError> {
        let sql = format!(
            r#"SELECT id, name FROM {} WHERE name ILIKE $1 ESCAPE '\' ORDER BY id ASC"#,
            table(kind)
        );
        let pattern = format!("%{}%", escape_like(term));
        let matches = sqlx::query_as::<_, NameMatch>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(matches)
    }
}
