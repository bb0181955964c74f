use crate::error::ListingError;
use core_types::{EntityKind, SearchResults};
use database::CatalogStore;

/// Case-insensitive substring search on venue or artist names.
///
/// The term is matched as given, whitespace included. An empty term matches every record. No matches is an empty result, not an error.
pub async fn search(
    store: &dyn CatalogStore,
    term: &str,
    kind: EntityKind,
) -> Result<SearchResults, ListingError> {
    let matches = store.search_by_name(kind, term).await?;
    tracing::debug!(%kind, term, count = matches.len(), "Name search.");
    Ok(SearchResults::from(matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_artist, add_venue};
    use database::InMemoryStore;

    async fn artists() -> InMemoryStore {
        let store = InMemoryStore::new();
        for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
            add_artist(&store, name).await;
        }
        store
    }

    fn names(results: &SearchResults) -> Vec<&str> {
        results.results.iter().map(|m| m.name.as_str()).collect()
    }

    #[tokio::test]
    async fn single_letter_matches_all_artists() {
        let store = artists().await;
        let results = search(&store, "a", EntityKind::Artist).await.unwrap();
        assert_eq!(results.count, 3);
        assert_eq!(
            names(&results),
            vec!["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"]
        );
    }

    #[tokio::test]
    async fn band_matches_one_artist() {
        let store = artists().await;
        let results = search(&store, "band", EntityKind::Artist).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.results[0].name, "The Wild Sax Band");
        assert_eq!(results.results[0].id, 3);
    }

    #[tokio::test]
    async fn matching_ignores_case() {
        let store = artists().await;
        let upper = search(&store, "BAND", EntityKind::Artist).await.unwrap();
        let lower = search(&store, "band", EntityKind::Artist).await.unwrap();
        assert_eq!(upper, lower);
    }

    #[tokio::test]
    async fn empty_term_returns_everything() {
        let store = InMemoryStore::new();
        add_venue(&store, "The Musical Hop").await;
        add_venue(&store, "The Dueling Pianos Bar").await;
        add_artist(&store, "Guns N Petals").await;

        let results = search(&store, "", EntityKind::Venue).await.unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(results.count, store.list_venues().await.unwrap().len());
    }

    #[tokio::test]
    async fn no_match_is_empty() {
        let store = artists().await;
        let results = search(&store, "orchestra", EntityKind::Artist).await.unwrap();
        assert_eq!(results.count, 0);
        assert!(results.results.is_empty());
    }

    #[tokio::test]
    async fn only_names_are_searched() {
        let store = InMemoryStore::new();
        add_venue(&store, "The Musical Hop").await;
        // Every fixture venue is in San Francisco; the city must not match.
        let results = search(&store, "francisco", EntityKind::Venue).await.unwrap();
        assert_eq!(results.count, 0);
    }

    #[tokio::test]
    async fn whitespace_is_part_of_the_term() {
        let store = InMemoryStore::new();
        add_artist(&store, "Metallica").await;
        add_artist(&store, "The Wild Sax Band").await;

        let results = search(&store, " ", EntityKind::Artist).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(names(&results), vec!["The Wild Sax Band"]);

        let trailing = search(&store, "Sax ", EntityKind::Artist).await.unwrap();
        assert_eq!(trailing.count, 1);
        let none = search(&store, "Band ", EntityKind::Artist).await.unwrap();
        assert_eq!(none.count, 0);
    }
}
