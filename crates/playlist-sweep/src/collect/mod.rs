//! Deduplicating collection of playlist items across scroll batches.
//!
//! Consecutive scroll windows overlap, so the same items are extracted many
//! times. [`CollectedSet::ingest`] keeps the first sighting of each video id
//! and drops everything else, which makes replaying a batch a no-op.

pub mod item;

pub use item::{Item, RawItem, Toggle};

use std::collections::HashSet;
use tracing::{debug, info};

/// Query-string key holding the video id.
pub const VIDEO_ID_KEY: &str = "v";

/// Extract the video id from a link's query string.
///
/// Works for absolute and relative links. Links without a non-empty `v`
/// parameter (shortened `youtu.be/<id>` links included) yield `None`.
pub fn video_id(link: &str) -> Option<String> {
    let without_fragment = link.split('#').next().unwrap_or(link);
    let (_, query) = without_fragment.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == VIDEO_ID_KEY)
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

/// Unique items in first-discovery order.
#[derive(Debug, Default, Clone)]
pub struct CollectedSet {
    items: Vec<Item>,
    seen: HashSet<String>,
}

impl CollectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the unseen items of a batch. Returns how many were added.
    pub fn ingest(&mut self, batch: impl IntoIterator<Item = RawItem>) -> usize {
        let mut added = 0;
        for raw in batch {
            let Some(id) = video_id(&raw.link) else {
                debug!(link = %raw.link, "dropping item without video id");
                continue;
            };
            if !self.seen.insert(id.clone()) {
                continue;
            }
            info!(id = %id, "found new video: {}", raw.title);
            self.items.push(Item::from_raw(raw, id));
            added += 1;
        }
        added
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
