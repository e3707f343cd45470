use tracing::{info, warn};

use crate::error::UserError;
use crate::messages;
use crate::models::MovieDetails;
use crate::omdb::OmdbApi;

/// Loads a title for the details page. The identifier is passed through as-is.
pub async fn load_details(api: &dyn OmdbApi, imdb_id: &str) -> Result<MovieDetails, UserError> {
    match api.details(imdb_id).await {
        Ok(details) => {
            info!("Loaded details for {} ('{}')", imdb_id, details.summary.title);
            Ok(details)
        }
        Err(err) => {
            warn!("Details lookup for {} failed: {}", imdb_id, err);
            Err(err.into_user_error(messages::MOVIE_NOT_FOUND))
        }
    }
}
