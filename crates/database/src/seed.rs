use crate::DbError;
use crate::store::CatalogStore;
use chrono::{DateTime, Duration, Utc};
use core_types::{NewArtist, NewShow, NewVenue};

fn venue(name: &str, city: &str, state: &str, address: &str, genres: &[&str]) -> NewVenue {
    NewVenue {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: address.to_string(),
        phone: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        image_link: None,
        facebook_link: None,
        website: None,
        seeking_talent: false,
        seeking_description: None,
    }
}

fn artist(name: &str, city: &str, state: &str, genres: &[&str]) -> NewArtist {
    NewArtist {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        image_link: None,
        facebook_link: None,
        website: None,
        seeking_venue: false,
        seeking_description: None,
    }
}

/// Populates an empty store with a small demo catalog.
///
/// Show times are placed relative to `now` so that every venue page has both
/// past and upcoming entries. Does nothing when venues already exist.
pub async fn seed_demo(store: &dyn CatalogStore, now: DateTime<Utc>) -> Result<(), DbError> {
    if !store.list_venues().await?.is_empty() {
        tracing::debug!("Catalog already populated; skipping demo seed.");
        return Ok(());
    }

    let mut musical_hop = venue(
        "The Musical Hop",
        "San Francisco",
        "CA",
        "1015 Folsom Street",
        &["Jazz", "Reggae", "Swing", "Classical", "Folk"],
    );
    musical_hop.seeking_talent = true;
    musical_hop.seeking_description = Some(
        "We are on the lookout for a local artist to play every two weeks.".to_string(),
    );
    let musical_hop = store.insert_venue(&musical_hop).await?;
    let dueling_pianos = store
        .insert_venue(&venue(
            "The Dueling Pianos Bar",
            "New York",
            "NY",
            "335 Delancey Street",
            &["Classical", "R&B", "Hip-Hop"],
        ))
        .await?;
    let park_square = store
        .insert_venue(&venue(
            "Park Square Live Music & Coffee",
            "San Francisco",
            "CA",
            "34 Whiskey Moore Ave",
            &["Rock n Roll", "Jazz", "Classical", "Folk"],
        ))
        .await?;

    let mut guns_n_petals = artist("Guns N Petals", "San Francisco", "CA", &["Rock n Roll"]);
    guns_n_petals.seeking_venue = true;
    let guns_n_petals = store.insert_artist(&guns_n_petals).await?;
    let matt_quevedo = store
        .insert_artist(&artist("Matt Quevedo", "New York", "NY", &["Jazz"]))
        .await?;
    let wild_sax = store
        .insert_artist(&artist(
            "The Wild Sax Band",
            "San Francisco",
            "CA",
            &["Jazz", "Classical"],
        ))
        .await?;

    let schedule = [
        (musical_hop.id, guns_n_petals.id, now - Duration::days(400)),
        (park_square.id, matt_quevedo.id, now - Duration::days(30)),
        (park_square.id, wild_sax.id, now + Duration::days(14)),
        (park_square.id, wild_sax.id, now + Duration::days(21)),
        (dueling_pianos.id, guns_n_petals.id, now + Duration::days(60)),
    ];
    for (venue_id, artist_id, start_time) in schedule {
        store
            .insert_show(&NewShow {
                venue_id,
                artist_id,
                start_time,
            })
            .await?;
    }

    tracing::info!(backend = store.backend_tag(), "Seeded demo catalog.");
    Ok(())
}
