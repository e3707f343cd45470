//! Fetch an OMDb envelope and print it next to its validated form.
//! Usage:
//!   cargo run --bin omdb_props -- search <query...>
//!   cargo run --bin omdb_props -- movie <imdb_id>
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use moviesearch::messages;
use moviesearch::omdb::{OmdbApi, OmdbClient};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Lookup {
    Search,
    Movie,
}

impl FromStr for Lookup {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "search" => Ok(Lookup::Search),
            "movie" => Ok(Lookup::Movie),
            _ => Err(anyhow::anyhow!("lookup must be 'search' or 'movie'")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let mut args = env::args().skip(1);
    let lookup: Lookup = args
        .next()
        .context("usage: omdb_props <search|movie> <query|imdb_id>")?
        .parse()?;
    let term = args.collect::<Vec<_>>().join(" ");
    if term.trim().is_empty() {
        anyhow::bail!("missing query or IMDb id");
    }

    let client = OmdbClient::from_env()?;
    match lookup {
        Lookup::Search => {
            let envelope = client.search_movies(&term).await?;
            println!("--- envelope ---");
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            println!("--- validated ---");
            match envelope.into_result() {
                Ok(movies) => {
                    for (i, movie) in movies.iter().enumerate() {
                        println!(
                            "{:>2}. {} ({}) [{}] poster={}",
                            i + 1,
                            movie.title,
                            movie.year,
                            movie.imdb_id,
                            movie.poster_url().unwrap_or("-")
                        );
                    }
                }
                Err(err) => println!("{} -> {}", err, err.user_message(messages::NO_MOVIES_FOUND)),
            }
        }
        Lookup::Movie => {
            let envelope = client.movie_details(term.trim()).await?;
            println!("--- envelope ---");
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            println!("--- validated ---");
            match envelope.into_result() {
                Ok(details) => {
                    println!("{}", serde_json::to_string_pretty(&details)?);
                    println!("genres: {:?}", details.genres());
                }
                Err(err) => println!("{} -> {}", err, err.user_message(messages::MOVIE_NOT_FOUND)),
            }
        }
    }
    Ok(())
}
