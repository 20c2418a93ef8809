use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::types::{
    CaptionedVideoRecord, EnrichedVideoRecord, PlaceRow, ReviewRow, SearchResultItem,
};

/// Root of the on-disk layout:
///
/// ```text
/// <base>/data/raw/search/<query>_search.json
/// <base>/data/raw/place_details.json
/// <base>/data/processed/{youtube_video_details,youtube_captions,
///                        gmap_places,gmap_reviews}.json
/// <base>/outputs/generated_{video_report.txt,tourism_report.txt,
///                           tourism_report.md}
/// ```
///
/// Directories are created on first save. Loading a file that does not exist
/// yields the empty collection for the processed tables; the raw place
/// details are required by their consumer and loading them from a missing
/// file is an error.
#[derive(Debug, Clone)]
pub struct DataRoot {
    base: PathBuf,
}

impl DataRoot {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn search_dir(&self) -> PathBuf {
        self.base.join("data").join("raw").join("search")
    }

    fn raw_dir(&self) -> PathBuf {
        self.base.join("data").join("raw")
    }

    fn processed_dir(&self) -> PathBuf {
        self.base.join("data").join("processed")
    }

    fn output_dir(&self) -> PathBuf {
        self.base.join("outputs")
    }

    /// Path of the persisted search-result collection for one query.
    /// Spaces in the query are replaced with underscores.
    #[must_use]
    pub fn search_results_path(&self, query: &str) -> PathBuf {
        let filename = format!("{query}_search.json").replace(' ', "_");
        self.search_dir().join(filename)
    }

    /// Load the persisted collection for `query`.
    ///
    /// A missing file is an empty collection. A file that fails to parse is
    /// also treated as empty (with a warning) so a truncated earlier write
    /// cannot wedge subsequent runs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on read failures other than not-found.
    pub fn load_search_results(&self, query: &str) -> Result<Vec<SearchResultItem>, StoreError> {
        let path = self.search_results_path(query);
        let Some(content) = read_optional(&path)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&content) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "search-result file is corrupt, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite the persisted collection for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    pub fn save_search_results(
        &self,
        query: &str,
        items: &[SearchResultItem],
    ) -> Result<(), StoreError> {
        write_json(&self.search_results_path(query), items)
    }

    /// Load and concatenate every persisted search-result file, in sorted
    /// filename order for determinism.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or parse failure of an individual file.
    pub fn load_all_search_results(&self) -> Result<Vec<SearchResultItem>, StoreError> {
        let dir = self.search_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with("_search.json"))
            })
            .collect();
        paths.sort();

        let mut all = Vec::new();
        for path in paths {
            let items: Vec<SearchResultItem> = read_json(&path)?;
            tracing::debug!(path = %path.display(), count = items.len(), "loaded search file");
            all.extend(items);
        }
        Ok(all)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the file is missing, unreadable, or invalid.
    pub fn load_place_details(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        read_json(&self.raw_dir().join("place_details.json"))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    pub fn save_place_details(&self, details: &[serde_json::Value]) -> Result<(), StoreError> {
        write_json(&self.raw_dir().join("place_details.json"), details)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or parse failure.
    pub fn load_video_details(&self) -> Result<Vec<EnrichedVideoRecord>, StoreError> {
        read_json_or_empty(&self.processed_dir().join("youtube_video_details.json"))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    pub fn save_video_details(&self, records: &[EnrichedVideoRecord]) -> Result<(), StoreError> {
        write_json(
            &self.processed_dir().join("youtube_video_details.json"),
            records,
        )
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or parse failure.
    pub fn load_captions(&self) -> Result<Vec<CaptionedVideoRecord>, StoreError> {
        read_json_or_empty(&self.processed_dir().join("youtube_captions.json"))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    pub fn save_captions(&self, records: &[CaptionedVideoRecord]) -> Result<(), StoreError> {
        write_json(&self.processed_dir().join("youtube_captions.json"), records)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or parse failure.
    pub fn load_places(&self) -> Result<Vec<PlaceRow>, StoreError> {
        read_json_or_empty(&self.processed_dir().join("gmap_places.json"))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    pub fn save_places(&self, rows: &[PlaceRow]) -> Result<(), StoreError> {
        write_json(&self.processed_dir().join("gmap_places.json"), rows)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or parse failure.
    pub fn load_reviews(&self) -> Result<Vec<ReviewRow>, StoreError> {
        read_json_or_empty(&self.processed_dir().join("gmap_reviews.json"))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O or serialization failure.
    pub fn save_reviews(&self, rows: &[ReviewRow]) -> Result<(), StoreError> {
        write_json(&self.processed_dir().join("gmap_reviews.json"), rows)
    }

    /// Persist the video report, overwriting any previous run's output.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on write failure.
    pub fn save_video_report(&self, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.output_dir().join("generated_video_report.txt");
        write_text(&path, text)?;
        Ok(path)
    }

    /// Persist the place report plus its line-wrapped rendering.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on write failure.
    pub fn save_place_report(
        &self,
        text: &str,
        wrapped: &str,
    ) -> Result<(PathBuf, PathBuf), StoreError> {
        let text_path = self.output_dir().join("generated_tourism_report.txt");
        let wrapped_path = self.output_dir().join("generated_tourism_report.md");
        write_text(&text_path, text)?;
        write_text(&wrapped_path, wrapped)?;
        Ok((text_path, wrapped_path))
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

fn read_json_or_empty<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    match read_optional(path)? {
        None => Ok(Vec::new()),
        Some(content) => serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize {
        path: path.display().to_string(),
        source: e,
    })?;
    write_text(path, &body)
}

fn write_text(path: &Path, body: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, body).map_err(|e| StoreError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
