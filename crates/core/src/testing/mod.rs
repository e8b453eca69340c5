//! Testing utilities and mock implementations of the collaborator traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use seafarer_core::testing::{fixtures, MockDownloadClient, MockIndexer};
//!
//! let indexer = MockIndexer::new();
//! indexer
//!     .add_results("The Office S01 1080p", vec![fixtures::season_pack("The.Office", 1)])
//!     .await;
//! let client = MockDownloadClient::new();
//!
//! let engine = AcquisitionEngine::new(Arc::new(indexer), Arc::new(client), config);
//! ```

mod mock_download_client;
mod mock_indexer;

pub use mock_download_client::{MockDownloadClient, RecordedSubmission};
pub use mock_indexer::{MockIndexer, RecordedQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::indexer::RawResult;

    pub const GIB: u64 = 1024 * 1024 * 1024;

    /// A raw result with a magnet link derived from the title.
    pub fn raw_result(title: &str, size_gb: u64, seeders: u32) -> RawResult {
        let slug: String = title
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        RawResult {
            title: title.to_string(),
            link: format!("magnet:?xt=urn:btih:{}&dn={}", slug, urlencoding::encode(title)),
            size_bytes: size_gb * GIB,
            seeders,
            catalog_id: None,
            categories: vec![],
        }
    }

    /// A 1080p season bundle, e.g. `The.Office.S02.Complete.1080p.WEB-DL`.
    pub fn season_pack(show: &str, season: u32) -> RawResult {
        let mut result = raw_result(
            &format!("{}.S{:02}.Complete.1080p.WEB-DL", show, season),
            12,
            300,
        );
        result.categories = vec![5000];
        result
    }

    /// A 1080p single episode, e.g. `The.Office.S01E03.1080p.WEB-DL.x264`.
    pub fn episode(show: &str, season: u32, episode: u32) -> RawResult {
        let mut result = raw_result(
            &format!("{}.S{:02}E{:02}.1080p.WEB-DL.x264", show, season, episode),
            4,
            150,
        );
        result.categories = vec![5000];
        result
    }

    /// A 1080p movie release with a catalog id.
    pub fn movie(title: &str, year: u32, catalog_id: u64) -> RawResult {
        let mut result = raw_result(&format!("{}.{}.1080p.BluRay.x264", title, year), 8, 250);
        result.catalog_id = Some(catalog_id);
        result.categories = vec![2000];
        result
    }
}
