//! Google Maps place collection: breadth-first nearby search across category
//! filters, two-tier selection, per-place detail fetch, and flattening into
//! the places/reviews tables.

mod clean;
mod client;
mod collect;
mod details;
mod error;
mod select;
mod types;

pub use clean::{flatten_place, flatten_reviews, run_clean_places};
pub use client::NearbySearchClient;
pub use collect::{run_collect_places, CollectParams};
pub use details::PlaceDetailsClient;
pub use error::PlacesError;
pub use select::pick_top_places;
pub use types::PlaceCandidate;
