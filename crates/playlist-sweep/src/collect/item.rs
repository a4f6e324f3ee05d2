//! Playlist item records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One item as rendered on the page, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    /// View count as displayed, e.g. "1.2M views".
    pub metric_text: String,
    /// Relative or absolute age as displayed, e.g. "3 years ago".
    pub age_text: String,
    pub link: String,
    pub thumbnail_url: String,
}

/// Manual curation flag, set by whoever edits the exported sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toggle {
    #[default]
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl Toggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deduplicated playlist entry.
///
/// Field order here is the field order of the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(rename = "views")]
    pub metric_text: String,
    #[serde(rename = "age")]
    pub age_text: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub link: String,
    pub id: String,
    pub toggle: Toggle,
}

impl Item {
    pub fn from_raw(raw: RawItem, id: String) -> Self {
        Self {
            title: raw.title,
            metric_text: raw.metric_text,
            age_text: raw.age_text,
            thumbnail_url: raw.thumbnail_url,
            link: raw.link,
            id,
            toggle: Toggle::default(),
        }
    }

    /// Cells in tabular column order: title, age, views, thumbnail, link, id, toggle.
    pub fn row(&self) -> [&str; 7] {
        [
            &self.title,
            &self.age_text,
            &self.metric_text,
            &self.thumbnail_url,
            &self.link,
            &self.id,
            self.toggle.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names_and_order() {
        let item = Item::from_raw(
            RawItem {
                title: "T".into(),
                metric_text: "5 views".into(),
                age_text: "1 day ago".into(),
                link: "/watch?v=A".into(),
                thumbnail_url: "https://i.ytimg.com/a.jpg".into(),
            },
            "A".into(),
        );
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"title":"T","views":"5 views","age":"1 day ago","thumbnail":"https://i.ytimg.com/a.jpg","link":"/watch?v=A","id":"A","toggle":"ON"}"#
        );
    }

    #[test]
    fn test_row_order() {
        let item = Item {
            title: "t".into(),
            metric_text: "m".into(),
            age_text: "a".into(),
            thumbnail_url: "th".into(),
            link: "l".into(),
            id: "i".into(),
            toggle: Toggle::Off,
        };
        assert_eq!(item.row(), ["t", "a", "m", "th", "l", "i", "OFF"]);
    }
}
