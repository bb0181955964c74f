use crate::{AppState, error::AppError};
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use core_types::{
    Artist, EntityKind, NameMatch, NewArtist, NewShow, NewVenue, SearchResults, Show, Venue,
};
use listings::{Area, ArtistDetail, ShowCard, VenueDetail};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

/// Search results together with the term that produced them.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub search_term: String,
    #[serde(flatten)]
    pub results: SearchResults,
}

async fn run_search(
    state: &AppState,
    form: SearchForm,
    kind: EntityKind,
) -> Result<Json<SearchPage>, AppError> {
    let results = listings::search(state.store.as_ref(), &form.search_term, kind).await?;
    Ok(Json(SearchPage {
        search_term: form.search_term,
        results,
    }))
}

// ==============================================================================
// Venues
// ==============================================================================

/// # GET /api/venues
/// Venues grouped by city and state.
pub async fn list_venues(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Area>>, AppError> {
    let areas = listings::venues_by_area(state.store.as_ref(), Utc::now()).await?;
    Ok(Json(areas))
}

/// # POST /api/venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage>, AppError> {
    run_search(&state, form, EntityKind::Venue).await
}

/// # GET /api/venues/:venue_id
pub async fn show_venue(
    Path(venue_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<VenueDetail>, AppError> {
    let detail = listings::venue_detail(state.store.as_ref(), venue_id, Utc::now()).await?;
    Ok(Json(detail))
}

/// # POST /api/venues
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewVenue>,
) -> Result<(StatusCode, Json<Venue>), AppError> {
    let payload = payload.validate()?;
    let venue = state.store.insert_venue(&payload).await?;
    tracing::info!(venue_id = venue.id, name = %venue.name, "Venue was successfully listed.");
    Ok((StatusCode::CREATED, Json(venue)))
}

// ==============================================================================
// Artists
// ==============================================================================

/// # GET /api/artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NameMatch>>, AppError> {
    let artists = listings::artist_directory(state.store.as_ref()).await?;
    Ok(Json(artists))
}

/// # POST /api/artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage>, AppError> {
    run_search(&state, form, EntityKind::Artist).await
}

/// # GET /api/artists/:artist_id
pub async fn show_artist(
    Path(artist_id): Path<i32>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ArtistDetail>, AppError> {
    let detail = listings::artist_detail(state.store.as_ref(), artist_id, Utc::now()).await?;
    Ok(Json(detail))
}

/// # POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewArtist>,
) -> Result<(StatusCode, Json<Artist>), AppError> {
    let payload = payload.validate()?;
    let artist = state.store.insert_artist(&payload).await?;
    tracing::info!(artist_id = artist.id, name = %artist.name, "Artist was successfully listed.");
    Ok((StatusCode::CREATED, Json(artist)))
}

// ==============================================================================
// Shows
// ==============================================================================

/// # GET /api/shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowCard>>, AppError> {
    let board = listings::show_board(state.store.as_ref()).await?;
    Ok(Json(board))
}

/// # POST /api/shows
/// Rejects shows whose venue or artist does not exist with 400.
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewShow>,
) -> Result<(StatusCode, Json<Show>), AppError> {
    let payload = payload.validate()?;
    let show = state.store.insert_show(&payload).await?;
    tracing::info!(
        show_id = show.id,
        venue_id = show.venue_id,
        artist_id = show.artist_id,
        "Show was successfully listed."
    );
    Ok((StatusCode::CREATED, Json(show)))
}
