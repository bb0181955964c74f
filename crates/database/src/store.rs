use crate::DbError;
use async_trait::async_trait;
use core_types::{
    Artist, EntityCard, EntityKind, NameMatch, NewArtist, NewShow, NewVenue, Show, Venue,
};

/// The persistence contract the listing logic is written against.
///
/// Implementations are authoritative: callers never retry a failed call. Every
/// list-returning method has a stable fetch order so that repeated reads over
/// unchanged data yield identical output:
///
/// - venues, artists and name matches come back in `id` order;
/// - shows come back ordered by `start_time`, then `id`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short name of the backend, used in log fields.
    fn backend_tag(&self) -> &'static str;

    async fn insert_venue(&self, venue: &NewVenue) -> Result<Venue, DbError>;

    async fn insert_artist(&self, artist: &NewArtist) -> Result<Artist, DbError>;

    /// Fails with `DbError::InvalidReference` when either side of the show is missing.
    async fn insert_show(&self, show: &NewShow) -> Result<Show, DbError>;

    async fn get_venue(&self, id: i32) -> Result<Option<Venue>, DbError>;

    async fn get_artist(&self, id: i32) -> Result<Option<Artist>, DbError>;

    async fn exists(&self, kind: EntityKind, id: i32) -> Result<bool, DbError>;

    async fn list_venues(&self) -> Result<Vec<Venue>, DbError>;

    async fn list_artists(&self) -> Result<Vec<Artist>, DbError>;

    async fn list_shows(&self) -> Result<Vec<Show>, DbError>;

    /// All shows whose `kind` foreign key equals `id`.
    async fn shows_for(&self, kind: EntityKind, id: i32) -> Result<Vec<Show>, DbError>;

    /// Batch lookup of display cards. Unknown ids are skipped.
    async fn cards(&self, kind: EntityKind, ids: &[i32]) -> Result<Vec<EntityCard>, DbError>;

    /// Case-insensitive substring match on the name column. An empty term matches everything.
    async fn search_by_name(&self, kind: EntityKind, term: &str)
    -> Result<Vec<NameMatch>, DbError>;
}

/// Escapes LIKE metacharacters so the term is matched literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(escape_like("band"), "band");
        assert_eq!(escape_like("100%_\\"), "100\\%\\_\\\\");
    }
}
