//! Per-level mech music catalog.
//!
//! A static mapping from evolution level to a YouTube track, consumed by
//! the Discord integration when the mech levels up.

use serde_json::{Value, json};

use crate::domain::entities::{MAX_LEVEL, MIN_LEVEL};
use crate::error::AppError;

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Track {
    pub level: u8,
    pub title: &'static str,
    pub url: &'static str,
}

const CATALOG: [Track; 11] = [
    Track { level: 1, title: "Boot Sequence", url: "https://www.youtube.com/watch?v=ddc-lvl-01" },
    Track { level: 2, title: "First Steps", url: "https://www.youtube.com/watch?v=ddc-lvl-02" },
    Track { level: 3, title: "Gears Engaged", url: "https://www.youtube.com/watch?v=ddc-lvl-03" },
    Track { level: 4, title: "Steel Cadence", url: "https://www.youtube.com/watch?v=ddc-lvl-04" },
    Track { level: 5, title: "Plasma Drift", url: "https://www.youtube.com/watch?v=ddc-lvl-05" },
    Track { level: 6, title: "Titan March", url: "https://www.youtube.com/watch?v=ddc-lvl-06" },
    Track { level: 7, title: "Storm Surge", url: "https://www.youtube.com/watch?v=ddc-lvl-07" },
    Track { level: 8, title: "Fusion Core", url: "https://www.youtube.com/watch?v=ddc-lvl-08" },
    Track { level: 9, title: "Quantum Choir", url: "https://www.youtube.com/watch?v=ddc-lvl-09" },
    Track { level: 10, title: "Omega Protocol", url: "https://www.youtube.com/watch?v=ddc-lvl-10" },
    Track { level: 11, title: "Ascension", url: "https://www.youtube.com/watch?v=ddc-lvl-11" },
];

/// Serves the static music catalog.
pub struct MechMusicService;

impl MechMusicService {
    pub fn new() -> Self {
        Self
    }

    /// Track for one level.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for a level outside 1..=11.
    pub fn track(&self, level: u8) -> Result<Track, AppError> {
        CATALOG
            .iter()
            .find(|track| track.level == level)
            .copied()
            .ok_or_else(|| {
                AppError::not_found(
                    format!("YouTube URL not found for Mech Level {level}"),
                    json!({ "level": level, "min": MIN_LEVEL, "max": MAX_LEVEL }),
                )
            })
    }

    /// The full catalog.
    pub fn info(&self) -> Value {
        json!({
            "total_tracks": CATALOG.len(),
            "platform": "YouTube",
            "tracks": CATALOG
                .iter()
                .map(|track| {
                    json!({
                        "level": track.level,
                        "title": track.title,
                        "url": track.url,
                    })
                })
                .collect::<Vec<_>>(),
        })
    }
}

impl Default for MechMusicService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_has_a_track() {
        let service = MechMusicService::new();
        for level in MIN_LEVEL..=MAX_LEVEL {
            let track = service.track(level).unwrap();
            assert_eq!(track.level, level);
            assert!(track.url.starts_with("https://www.youtube.com/"));
        }
    }

    #[test]
    fn test_out_of_range_level_is_not_found() {
        let service = MechMusicService::new();
        for level in [0, 12, 200] {
            let result = service.track(level);
            assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
        }
    }

    #[test]
    fn test_info_lists_all_tracks() {
        let info = MechMusicService::new().info();
        assert_eq!(info["total_tracks"], 11);
        assert_eq!(info["tracks"].as_array().unwrap().len(), 11);
    }
}
