//! File-backed repositories for the pipeline's hand-off tables.
//!
//! Every component reads and writes through a [`DataRoot`] rather than
//! hard-coded paths. Tables are JSON arrays of typed records and round-trip
//! exactly: re-reading a written file reproduces the same records.

mod error;
mod merge;
mod root;
mod types;

pub use error::StoreError;
pub use merge::{dedup_keyed_first_wins, merge_keyed_new_wins};
pub use root::DataRoot;
pub use types::{
    CaptionedVideoRecord, EnrichedVideoRecord, PlaceRow, ReviewRow, SearchResultItem,
};
