//! Download client abstraction.
//!
//! This module provides a `DownloadClient` trait for handing fetch links
//! (magnet URIs or .torrent URLs) to a BitTorrent client (qBittorrent,
//! Deluge).

mod deluge;
mod qbittorrent;
mod types;

pub use deluge::DelugeClient;
pub use qbittorrent::QBittorrentClient;
pub use types::*;
