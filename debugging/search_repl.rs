//! Debounced search from the terminal.
//! Each stdin line replaces the current query; results are printed once input
//! has been idle for the debounce interval. `:movie <imdb_id>` prints a title's
//! details, `:quit` exits. Piped input is flushed before exiting:
//!   printf 'b\nba\nbatman\n' | cargo run --bin movie_search_repl
//! Requires OMDB_API_KEY in the environment (.env supported).

use anyhow::Result;
use dotenvy::dotenv;
use moviesearch::details::load_details;
use moviesearch::models::MovieDetails;
use moviesearch::omdb::{OmdbApi, OmdbClient};
use moviesearch::search::{SearchConfig, SearchController, SearchPhase, SearchState};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn render(state: &SearchState) {
    match state.phase() {
        SearchPhase::Loading => println!("... searching '{}'", state.query),
        SearchPhase::Failure => {
            println!("! {}", state.error.as_deref().unwrap_or_default())
        }
        SearchPhase::Success => {
            println!("{} result(s) for '{}':", state.movies.len(), state.query);
            for movie in &state.movies {
                println!("  {} ({}) [{}]", movie.title, movie.year, movie.imdb_id);
            }
        }
        SearchPhase::Idle if state.is_empty_result() => println!("(no results)"),
        SearchPhase::Idle => println!("(cleared)"),
    }
}

fn render_details(details: &MovieDetails) {
    println!("{} ({})  IMDb {}", details.summary.title, details.summary.year, details.imdb_rating);
    if let Some(runtime) = &details.runtime {
        println!("  runtime:  {}", runtime);
    }
    println!("  genres:   {}", details.genres().join(" | "));
    println!("  director: {}", details.director);
    for (label, value) in [
        ("actors", &details.actors),
        ("country", &details.country),
        ("language", &details.language),
    ] {
        if let Some(value) = value {
            println!("  {:<9} {}", format!("{}:", label), value);
        }
    }
    println!("  {}", details.plot);
    if let Some(poster) = details.summary.poster_url() {
        println!("  poster:   {}", poster);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let api: Arc<dyn OmdbApi> = Arc::new(OmdbClient::from_env()?);
    let controller = SearchController::new(Arc::clone(&api), SearchConfig::default());

    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        let mut last: Option<SearchState> = None;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            let unchanged = last.as_ref().is_some_and(|prev| {
                prev.phase() == state.phase()
                    && prev.movies == state.movies
                    && prev.error == state.error
            });
            if !unchanged {
                render(&state);
            }
            last = Some(state);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interrupted = false;
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == ":quit" {
            interrupted = true;
            break;
        }
        if let Some(id) = trimmed.strip_prefix(":movie ") {
            match load_details(api.as_ref(), id.trim()).await {
                Ok(details) => render_details(&details),
                Err(err) => println!("! {}", err.message),
            }
            continue;
        }
        controller.set_query(line);
    }

    if !interrupted {
        // Let the last query fire and settle.
        tokio::time::sleep(controller.debounce_delay() + Duration::from_millis(50)).await;
        let mut settled = controller.subscribe();
        let _ = settled.wait_for(|s| !s.is_loading).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    controller.shutdown();
    printer.abort();
    Ok(())
}
