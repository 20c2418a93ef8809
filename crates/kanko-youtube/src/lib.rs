//! YouTube collection pipeline: windowed search, detail enrichment, and
//! transcript fetching.

mod captions;
mod client;
mod duration;
mod enrich;
mod error;
mod search;
mod transcript;
mod types;

pub use captions::{run_captions, CaptionParams};
pub use client::YouTubeClient;
pub use duration::parse_iso8601_duration;
pub use enrich::{run_enrich, EnrichParams};
pub use error::{TranscriptError, YouTubeError};
pub use search::{collect_windowed_search, run_search, year_windows};
pub use transcript::TranscriptClient;
pub use types::{SearchItem, SearchPage, VideoItem};
