use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The display format used for every show start time handed to the presentation layer.
const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_start_time(start_time: &DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

// ==============================================================================
// Catalog records
// ==============================================================================

/// A row from the `venues` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// A row from the `artists` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Artist {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// A row from the `shows` table: one artist playing one venue at one time.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: i32,
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

// ==============================================================================
// Display projections
// ==============================================================================

/// The minimal projection of the entity on the other side of a show.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct EntityCard {
    pub id: i32,
    pub name: String,
    pub image_link: Option<String>,
}

/// One classified show as seen from its venue or artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowView {
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: String,
}

impl ShowView {
    pub fn new(card: &EntityCard, start_time: &DateTime<Utc>) -> Self {
        Self {
            counterpart_id: card.id,
            counterpart_name: card.name.clone(),
            counterpart_image_link: card.image_link.clone(),
            start_time: format_start_time(start_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct NameMatch {
    pub id: i32,
    pub name: String,
}

/// The response of a name search. `count` always equals `results.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub count: usize,
    pub results: Vec<NameMatch>,
}

impl From<Vec<NameMatch>> for SearchResults {
    fn from(results: Vec<NameMatch>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

// ==============================================================================
// Creation payloads
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl NewVenue {
    /// Normalizes the submitted fields and rejects anything that cannot be listed.
    pub fn validate(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: state_code(self.state)?,
            address: required("address", self.address)?,
            phone: optional(self.phone),
            genres: genres(self.genres),
            image_link: link("image_link", self.image_link)?,
            facebook_link: link("facebook_link", self.facebook_link)?,
            website: link("website", self.website)?,
            seeking_talent: self.seeking_talent,
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl NewArtist {
    /// Normalizes the submitted fields and rejects anything that cannot be listed.
    pub fn validate(self) -> Result<Self, CoreError> {
        Ok(Self {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: state_code(self.state)?,
            phone: optional(self.phone),
            genres: genres(self.genres),
            image_link: link("image_link", self.image_link)?,
            facebook_link: link("facebook_link", self.facebook_link)?,
            website: link("website", self.website)?,
            seeking_venue: self.seeking_venue,
            seeking_description: optional(self.seeking_description),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShow {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

impl NewShow {
    pub fn validate(self) -> Result<Self, CoreError> {
        if self.venue_id <= 0 {
            return Err(invalid("venue_id", "must be a positive id"));
        }
        if self.artist_id <= 0 {
            return Err(invalid("artist_id", "must be a positive id"));
        }
        Ok(self)
    }
}

// --- Field helpers ---

fn invalid(field: &str, reason: &str) -> CoreError {
    CoreError::InvalidInput(field.to_string(), reason.to_string())
}

fn required(field: &str, value: String) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn state_code(value: String) -> Result<String, CoreError> {
    let code = required("state", value)?.to_ascii_uppercase();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("state", "must be a two-letter state code"));
    }
    Ok(code)
}

fn genres(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

fn link(field: &str, value: Option<String>) -> Result<Option<String>, CoreError> {
    match optional(value) {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(Some(url)),
        Some(_) => Err(invalid(field, "must start with http:// or https://")),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn musical_hop() -> NewVenue {
        NewVenue {
            name: " The Musical Hop ".to_string(),
            city: "San Francisco".to_string(),
            state: "ca".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            genres: vec!["Jazz".to_string(), "  ".to_string(), " Swing ".to_string()],
            image_link: None,
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
            website: Some("".to_string()),
            seeking_talent: true,
            seeking_description: None,
        }
    }

    #[test]
    fn venue_validation_normalizes_fields() {
        let venue = musical_hop().validate().expect("valid venue");
        assert_eq!(venue.name, "The Musical Hop");
        assert_eq!(venue.state, "CA");
        assert_eq!(venue.genres, vec!["Jazz", "Swing"]);
        assert_eq!(venue.website, None);
    }

    #[test]
    fn venue_without_address_is_rejected() {
        let mut venue = musical_hop();
        venue.address = "   ".to_string();
        assert_eq!(
            venue.validate(),
            Err(CoreError::InvalidInput(
                "address".to_string(),
                "is required".to_string()
            ))
        );
    }

    #[test]
    fn artist_rejects_bad_state_and_link() {
        let artist = NewArtist {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "California".to_string(),
            phone: None,
            genres: vec!["Rock n Roll".to_string()],
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_venue: true,
            seeking_description: None,
        };
        assert!(matches!(
            artist.clone().validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "state"
        ));

        let artist = NewArtist {
            state: "CA".to_string(),
            website: Some("www.gunsnpetalsband.com".to_string()),
            ..artist
        };
        assert!(matches!(
            artist.validate(),
            Err(CoreError::InvalidInput(field, _)) if field == "website"
        ));
    }

    #[test]
    fn show_requires_positive_ids() {
        let show = NewShow {
            venue_id: 0,
            artist_id: 4,
            start_time: Utc::now(),
        };
        assert!(show.validate().is_err());
    }

    #[test]
    fn new_venue_deserializes_with_defaults() {
        let venue: NewVenue = serde_json::from_str(
            r#"{"name":"Park Square","city":"San Francisco","state":"CA","address":"34 Whiskey Moore Ave"}"#,
        )
        .expect("payload");
        assert!(venue.genres.is_empty());
        assert!(!venue.seeking_talent);
        assert_eq!(venue.phone, None);
    }

    #[test]
    fn show_view_formats_start_time() {
        let card = EntityCard {
            id: 5,
            name: "Matt Quevedo".to_string(),
            image_link: None,
        };
        let start = Utc.with_ymd_and_hms(2019, 6, 15, 23, 0, 0).unwrap();
        let view = ShowView::new(&card, &start);
        assert_eq!(view.counterpart_id, 5);
        assert_eq!(view.start_time, "2019-06-15 23:00:00");
    }
}
