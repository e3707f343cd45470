use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// OMDb's placeholder for missing values, notably posters.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFlag {
    #[serde(rename = "True")]
    True,
    #[serde(rename = "False")]
    False,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster: String,
}

impl MovieSummary {
    /// Poster URL, or `None` when OMDb has no image for the title.
    pub fn poster_url(&self) -> Option<&str> {
        let poster = self.poster.trim();
        (!poster.is_empty() && poster != NOT_AVAILABLE).then_some(poster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "Runtime", skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "Country", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "Language", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "Actors", skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
}

impl MovieDetails {
    pub fn genres(&self) -> Vec<&str> {
        self.genre
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty() && *g != NOT_AVAILABLE)
            .collect()
    }
}

/// Envelope returned by `?s=` lookups, as sent by OMDb.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Response")]
    pub response: ResponseFlag,
    #[serde(rename = "Search", default, skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<MovieSummary>>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn found(movies: Vec<MovieSummary>) -> Self {
        Self {
            response: ResponseFlag::True,
            search: Some(movies),
            error: None,
        }
    }

    pub fn not_found(message: Option<&str>) -> Self {
        Self {
            response: ResponseFlag::False,
            search: None,
            error: message.map(str::to_string),
        }
    }

    /// Results in API order, or `NotFound` carrying the upstream message.
    pub fn into_result(self) -> Result<Vec<MovieSummary>, SearchError> {
        match (self.response, self.search) {
            (ResponseFlag::True, Some(movies)) => Ok(movies),
            _ => Err(SearchError::NotFound {
                message: self.error,
            }),
        }
    }
}

/// Envelope returned by `?i=` lookups. A failed lookup carries only
/// `Response` and `Error`, so every field is optional here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailsResponse {
    #[serde(rename = "Response")]
    pub response: Option<ResponseFlag>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Actors", default)]
    pub actors: Option<String>,
}

impl DetailsResponse {
    pub fn not_found(message: Option<&str>) -> Self {
        Self {
            response: Some(ResponseFlag::False),
            error: message.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn into_result(self) -> Result<MovieDetails, SearchError> {
        match self.response {
            Some(ResponseFlag::True) => {}
            Some(ResponseFlag::False) => {
                return Err(SearchError::NotFound {
                    message: self.error,
                })
            }
            None => {
                return Err(SearchError::Malformed {
                    reason: "missing Response field".to_string(),
                })
            }
        }

        Ok(MovieDetails {
            summary: MovieSummary {
                imdb_id: required(self.imdb_id, "imdbID")?,
                title: required(self.title, "Title")?,
                year: required(self.year, "Year")?,
                poster: self.poster.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            },
            genre: required(self.genre, "Genre")?,
            director: required(self.director, "Director")?,
            plot: required(self.plot, "Plot")?,
            imdb_rating: required(self.imdb_rating, "imdbRating")?,
            runtime: applicable(self.runtime),
            country: applicable(self.country),
            language: applicable(self.language),
            actors: applicable(self.actors),
        })
    }
}

impl From<MovieDetails> for DetailsResponse {
    fn from(details: MovieDetails) -> Self {
        Self {
            response: Some(ResponseFlag::True),
            error: None,
            imdb_id: Some(details.summary.imdb_id),
            title: Some(details.summary.title),
            year: Some(details.summary.year),
            poster: Some(details.summary.poster),
            genre: Some(details.genre),
            director: Some(details.director),
            plot: Some(details.plot),
            imdb_rating: Some(details.imdb_rating),
            runtime: details.runtime,
            country: details.country,
            language: details.language,
            actors: details.actors,
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, SearchError> {
    value.ok_or_else(|| SearchError::Malformed {
        reason: format!("missing {field} field"),
    })
}

fn applicable(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != NOT_AVAILABLE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_search_order_and_ignores_extra_fields() {
        let value = json!({
            "Search": [
                { "Title": "Batman Begins", "Year": "2005", "imdbID": "tt0372784", "Type": "movie", "Poster": "https://img/1.jpg" },
                { "Title": "Batman", "Year": "1989", "imdbID": "tt0096895", "Type": "movie", "Poster": "N/A" }
            ],
            "totalResults": "2",
            "Response": "True"
        });
        let envelope: SearchResponse = serde_json::from_value(value).expect("search envelope");
        let movies = envelope.into_result().expect("movies");
        let ids: Vec<_> = movies.iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt0372784", "tt0096895"]);
        assert_eq!(movies[0].poster_url(), Some("https://img/1.jpg"));
        assert_eq!(movies[1].poster_url(), None);
    }

    #[test]
    fn false_response_carries_upstream_error() {
        let value = json!({ "Response": "False", "Error": "Too many results." });
        let envelope: SearchResponse = serde_json::from_value(value).expect("search envelope");
        match envelope.into_result() {
            Err(SearchError::NotFound { message }) => {
                assert_eq!(message.as_deref(), Some("Too many results."))
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn true_response_without_results_is_not_found() {
        let value = json!({ "Response": "True" });
        let envelope: SearchResponse = serde_json::from_value(value).expect("search envelope");
        assert!(matches!(
            envelope.into_result(),
            Err(SearchError::NotFound { message: None })
        ));
    }

    #[test]
    fn rejects_unknown_discriminator() {
        let value = json!({ "Response": "Maybe" });
        assert!(serde_json::from_value::<SearchResponse>(value).is_err());
    }

    #[test]
    fn details_drop_not_applicable_optionals() {
        let value = json!({
            "Title": "Heat",
            "Year": "1995",
            "imdbID": "tt0113277",
            "Poster": "N/A",
            "Genre": "Action, Crime, Drama",
            "Director": "Michael Mann",
            "Plot": "A group of high-end professional thieves...",
            "imdbRating": "8.3",
            "Runtime": "170 min",
            "Country": "N/A",
            "Actors": "Al Pacino, Robert De Niro",
            "Response": "True"
        });
        let envelope: DetailsResponse = serde_json::from_value(value).expect("details envelope");
        let details = envelope.into_result().expect("details");
        assert_eq!(details.genres(), vec!["Action", "Crime", "Drama"]);
        assert_eq!(details.runtime.as_deref(), Some("170 min"));
        assert_eq!(details.country, None);
        assert_eq!(details.language, None);
        assert_eq!(details.summary.poster_url(), None);
    }

    #[test]
    fn genres_tolerate_loose_separators() {
        let mut details: MovieDetails = serde_json::from_value(json!({
            "imdbID": "tt1", "Title": "Loose", "Year": "2001", "Poster": "N/A",
            "Genre": "Drama,Thriller ,, N/A", "Director": "Someone", "Plot": "N/A",
            "imdbRating": "N/A"
        }))
        .expect("details");
        assert_eq!(details.genres(), vec!["Drama", "Thriller"]);
        details.genre = NOT_AVAILABLE.to_string();
        assert!(details.genres().is_empty());
    }

    #[test]
    fn details_missing_required_field_is_malformed() {
        let value = json!({ "Response": "True", "imdbID": "tt1", "Title": "Only a title" });
        let envelope: DetailsResponse = serde_json::from_value(value).expect("details envelope");
        assert!(matches!(
            envelope.into_result(),
            Err(SearchError::Malformed { .. })
        ));
    }

    #[test]
    fn details_false_response_is_not_found() {
        let value = json!({ "Response": "False", "Error": "Incorrect IMDb ID." });
        let envelope: DetailsResponse = serde_json::from_value(value).expect("details envelope");
        match envelope.into_result() {
            Err(err) => assert_eq!(err.user_message("fallback"), "Incorrect IMDb ID."),
            Ok(details) => panic!("expected failure, got {:?}", details),
        }
    }
}
