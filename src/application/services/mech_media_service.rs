//! Procedural mech rendering: live GIF animations and static display
//! images.
//!
//! The mech is drawn from rectangles onto an RGBA canvas; no asset files
//! are involved. Display images are rendered once per (level, kind) and
//! kept on disk, animations are cached in memory for a short TTL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::webp::WebPEncoder;
use image::{Delay, ExtendedColorType, Frame, Rgba, RgbaImage};
use serde_json::{Value, json};
use tokio::fs;

use crate::application::services::mech_service::frame_delay_ms;
use crate::domain::entities::{MAX_LEVEL, MIN_LEVEL, MechState};
use crate::error::AppError;
use crate::infrastructure::cache::TtlCache;

const CANVAS_W: u32 = 240;
const CANVAS_H: u32 = 180;
const FRAME_COUNT: usize = 8;

/// Body color per level, dark to bright as the mech evolves.
const PALETTE: [[u8; 3]; 11] = [
    [105, 105, 105],
    [119, 136, 153],
    [176, 196, 222],
    [100, 149, 237],
    [65, 105, 225],
    [60, 179, 113],
    [255, 165, 0],
    [255, 99, 71],
    [199, 21, 133],
    [148, 0, 211],
    [255, 215, 0],
];

const SHADOW_COLOR: [u8; 3] = [40, 40, 48];
const BACKGROUND: [u8; 3] = [16, 16, 24];

/// Static display image kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    /// Dark silhouette shown for levels not yet reached.
    Shadow,
    /// Full-color render for unlocked levels.
    Unlocked,
}

impl DisplayKind {
    pub fn from_path_value(value: &str) -> Option<Self> {
        match value {
            "shadow" => Some(Self::Shadow),
            "unlocked" => Some(Self::Unlocked),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shadow => "shadow",
            Self::Unlocked => "unlocked",
        }
    }
}

/// Rendered bytes plus serving metadata.
#[derive(Debug, Clone)]
pub struct RenderedMedia {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Renders and caches mech media.
pub struct MechMediaService {
    display_dir: PathBuf,
    animation_cache: TtlCache<String, RenderedMedia>,
}

impl MechMediaService {
    pub fn new(data_dir: &Path, animation_ttl: Duration) -> Self {
        Self {
            display_dir: data_dir.join("mech_display"),
            animation_cache: TtlCache::new(animation_ttl),
        }
    }

    /// Animated GIF for the current mech state.
    pub async fn live_animation(&self, state: &MechState) -> Result<RenderedMedia, AppError> {
        // Bucketing power keeps the cache effective while decay ticks.
        let key = format!("live:{}:{}", state.level, state.power / 10);
        if let Some((media, _)) = self.animation_cache.get(&key).await {
            return Ok(media);
        }

        let media = render_animation(state.level, state.speed, false)?;
        self.animation_cache.insert(key, media.clone()).await;
        Ok(media)
    }

    /// Animated GIF for the test tool; carries a thank-you banner.
    pub fn test_animation(&self, level: u8, speed: f64) -> Result<RenderedMedia, AppError> {
        render_animation(level.clamp(MIN_LEVEL, MAX_LEVEL), speed, true)
    }

    /// Static WebP display image, rendered on first request and kept on
    /// disk as `mech_{level}_{kind}.webp`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a level outside 1..=11.
    pub async fn display_image(
        &self,
        level: u8,
        kind: DisplayKind,
    ) -> Result<RenderedMedia, AppError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(AppError::bad_request(
                "Invalid level. Must be 1-11.",
                json!({ "level": level }),
            ));
        }

        let filename = format!("mech_{level}_{}.webp", kind.as_str());
        let path = self.display_dir.join(&filename);

        match fs::read(&path).await {
            Ok(bytes) => {
                return Ok(RenderedMedia {
                    bytes,
                    content_type: "image/webp",
                    filename,
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Unreadable display cache {}: {e}", path.display());
            }
        }

        let bytes = render_display_webp(level, kind)?;

        // Persisting is best-effort; serving the render matters more.
        if let Err(e) = fs::create_dir_all(&self.display_dir).await {
            tracing::warn!("Failed to create display cache dir: {e}");
        } else if let Err(e) = fs::write(&path, &bytes).await {
            tracing::warn!("Failed to persist display image: {e}");
        }

        Ok(RenderedMedia {
            bytes,
            content_type: "image/webp",
            filename,
        })
    }

    /// Lists the on-disk display images.
    pub async fn display_info(&self) -> Result<Value, AppError> {
        let mut cached_images = serde_json::Map::new();
        let mut total_cached = 0usize;

        if let Ok(mut entries) = fs::read_dir(&self.display_dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let name = entry.file_name().to_string_lossy().to_string();
                let Some((level, kind)) = parse_display_filename(&name) else {
                    continue;
                };
                let size_bytes = entry.metadata().await.map(|m| m.len()).unwrap_or(0);
                total_cached += 1;

                let level_entry = cached_images
                    .entry(level.to_string())
                    .or_insert_with(|| json!({}));
                level_entry[kind] = json!({
                    "available": true,
                    "size_bytes": size_bytes,
                    "url": format!("/api/mech/display/{level}/{kind}"),
                });
            }
        }

        Ok(json!({
            "available_levels": (MIN_LEVEL..=MAX_LEVEL).collect::<Vec<u8>>(),
            "available_types": ["shadow", "unlocked"],
            "cached_images": cached_images,
            "total_cached": total_cached,
            "cache_directory": self.display_dir.display().to_string(),
        }))
    }

    /// Drops all rendered display images; used by the mech full reset.
    pub async fn purge_display_cache(&self) {
        if let Err(e) = fs::remove_dir_all(&self.display_dir).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to purge display cache: {e}");
        }
        self.animation_cache.invalidate_all().await;
    }
}

/// Parses `mech_{level}_{kind}.webp`.
fn parse_display_filename(name: &str) -> Option<(u8, &str)> {
    let stem = name.strip_suffix(".webp")?;
    let rest = stem.strip_prefix("mech_")?;
    let (level_str, kind) = rest.split_once('_')?;
    let level: u8 = level_str.parse().ok()?;
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        return None;
    }
    matches!(kind, "shadow" | "unlocked").then_some((level, kind))
}

fn map_image_error(e: image::ImageError) -> AppError {
    tracing::error!("Mech render failed: {e}");
    AppError::internal(
        "Animation generation failed",
        json!({ "reason": e.to_string() }),
    )
}

fn render_animation(level: u8, speed: f64, banner: bool) -> Result<RenderedMedia, AppError> {
    let delay_ms = frame_delay_ms(speed);
    let mut frames = Vec::with_capacity(FRAME_COUNT);

    for i in 0..FRAME_COUNT {
        let phase = i as f32 / FRAME_COUNT as f32;
        let mut canvas = RgbaImage::from_pixel(CANVAS_W, CANVAS_H, rgba(BACKGROUND));
        draw_mech(&mut canvas, level, phase, false);
        if banner && i % 2 == 0 {
            // Pulsing thank-you banner along the top edge
            fill_rect(&mut canvas, 20, 8, CANVAS_W as i64 - 40, 14, rgba([255, 215, 0]));
        }
        frames.push(Frame::from_parts(
            canvas,
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        ));
    }

    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut bytes);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(map_image_error)?;
        encoder.encode_frames(frames).map_err(map_image_error)?;
    }

    Ok(RenderedMedia {
        bytes,
        content_type: "image/gif",
        filename: format!("mech_level_{level}.gif"),
    })
}

fn render_display_webp(level: u8, kind: DisplayKind) -> Result<Vec<u8>, AppError> {
    let mut canvas = RgbaImage::from_pixel(CANVAS_W, CANVAS_H, rgba(BACKGROUND));
    draw_mech(&mut canvas, level, 0.25, kind == DisplayKind::Shadow);

    let mut bytes = Vec::new();
    WebPEncoder::new_lossless(&mut bytes)
        .encode(canvas.as_raw(), CANVAS_W, CANVAS_H, ExtendedColorType::Rgba8)
        .map_err(map_image_error)?;
    Ok(bytes)
}

/// Draws the mech for one animation phase. The body grows with the level
/// and bobs over the walk cycle; legs alternate each half-phase.
fn draw_mech(canvas: &mut RgbaImage, level: u8, phase: f32, silhouette: bool) {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
    let body = if silhouette {
        rgba(SHADOW_COLOR)
    } else {
        rgba(PALETTE[level as usize - 1])
    };
    let trim = if silhouette {
        rgba(SHADOW_COLOR)
    } else {
        rgba([230, 230, 240])
    };

    let bob = ((phase * std::f32::consts::TAU).sin() * 4.0) as i64;
    let stride = if phase < 0.5 { 6 } else { -6 };

    let body_w = 40 + level as i64 * 6;
    let body_h = 34 + level as i64 * 4;
    let cx = CANVAS_W as i64 / 2;
    let body_x = cx - body_w / 2;
    let body_y = 90 - body_h / 2 + bob;

    // Torso and head
    fill_rect(canvas, body_x, body_y, body_w, body_h, body);
    let head_w = body_w / 2;
    fill_rect(canvas, cx - head_w / 2, body_y - 18, head_w, 16, body);

    // Eyes stay lit on unlocked renders
    if !silhouette {
        let eye_y = body_y - 14;
        fill_rect(canvas, cx - head_w / 4 - 2, eye_y, 4, 4, trim);
        fill_rect(canvas, cx + head_w / 4 - 2, eye_y, 4, 4, trim);
    }

    // Arms
    fill_rect(canvas, body_x - 8, body_y + 4 - stride / 2, 8, body_h / 2, body);
    fill_rect(canvas, body_x + body_w, body_y + 4 + stride / 2, 8, body_h / 2, body);

    // Legs alternate with the walk cycle
    let leg_y = body_y + body_h;
    fill_rect(canvas, cx - body_w / 4 - 4 + stride, leg_y, 8, 24, body);
    fill_rect(canvas, cx + body_w / 4 - 4 - stride, leg_y, 8, 24, body);

    // Level pips under the mech
    for pip in 0..level as i64 {
        fill_rect(canvas, 20 + pip * 12, CANVAS_H as i64 - 16, 8, 6, trim);
    }
}

fn rgba(color: [u8; 3]) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

/// Clipped rectangle fill.
fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, color: Rgba<u8>) {
    for py in y.max(0)..(y + h).min(canvas.height() as i64) {
        for px in x.max(0)..(x + w).min(canvas.width() as i64) {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}
