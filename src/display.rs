use crate::player::PlaybackState;
use tracing::info;

pub const NO_SONG_TEXT: &str = "No song playing";

// Trailing gap shown between the end and the restart of a scrolling label.
const MARQUEE_PAD: &str = "   ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    Url(String),
    Fallback,
}

/// Everything the presentation layer needs for one refresh: one image
/// reference, two text fields, one control label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUpdate {
    pub artwork: Artwork,
    pub track_text: String,
    pub artist_text: String,
    pub control_label: &'static str,
}

/// Map a fetched playback state (or its absence) onto display fields.
pub fn reconcile(state: Option<PlaybackState>) -> DisplayUpdate {
    let Some(state) = state else {
        return DisplayUpdate {
            artwork: Artwork::Fallback,
            track_text: NO_SONG_TEXT.to_string(),
            artist_text: String::new(),
            control_label: "Play",
        };
    };
    let control_label = if state.is_playing { "Pause" } else { "Play" };
    let track_text = state
        .track_name
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| NO_SONG_TEXT.to_string());
    let artist_text = state
        .artist_names
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    let artwork = state
        .album_art_url
        .map(Artwork::Url)
        .unwrap_or(Artwork::Fallback);
    DisplayUpdate {
        artwork,
        track_text,
        artist_text,
        control_label,
    }
}

/// Infinite circular rotation of a padded label, one character per step.
/// The presentation layer pulls frames at its own cadence; a fresh marquee
/// restarts from the original text.
#[derive(Debug, Clone)]
pub struct Marquee {
    buf: Vec<char>,
}

impl Marquee {
    pub fn new(text: &str) -> Self {
        Self {
            buf: format!("{}{}", text, MARQUEE_PAD).chars().collect(),
        }
    }

    /// A marquee for labels longer than `threshold` characters; shorter
    /// labels fit as-is and get none.
    pub fn for_label(text: &str, threshold: usize) -> Option<Self> {
        let trimmed = text.trim();
        (trimmed.chars().count() > threshold).then(|| Self::new(trimmed))
    }
}

impl Iterator for Marquee {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let frame: String = self.buf.iter().collect();
        if self.buf.len() > 1 {
            self.buf.rotate_left(1);
        }
        Some(frame)
    }
}

/// Consumer of reconciled updates. The real kiosk renders them; headless runs
/// and tests use lighter sinks.
pub trait DisplaySink {
    fn apply(&mut self, update: DisplayUpdate);
}

/// Sink that just logs each update, for running without a display attached.
pub struct LogSink;

impl DisplaySink for LogSink {
    fn apply(&mut self, update: DisplayUpdate) {
        info!(
            "display: {} - {} [{}]",
            update.track_text, update.artist_text, update.control_label
        );
    }
}
