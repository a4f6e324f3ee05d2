//! Structured extraction of playlist items from the rendered page.
//!
//! The structured query returns a loosely-typed tree. It is coerced into
//! [`RawItem`]s here and never travels further.

pub mod agentql;

use crate::collect::RawItem;
use crate::error::ExtractionError;
use crate::renderer::RenderContext;
use serde_json::Value;
use tracing::debug;

/// Declarative query for the visible playlist entries.
pub const PLAYLIST_QUERY: &str = r#"
{
    videos[] {
        title
        views
        age
        link
        thumbnail
    }
}
"#;

/// Extracts raw playlist items from the current page state.
#[derive(Debug, Clone)]
pub struct PlaylistExtractor {
    query: String,
}

impl Default for PlaylistExtractor {
    fn default() -> Self {
        Self::new(PLAYLIST_QUERY)
    }
}

impl PlaylistExtractor {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Query the page and coerce the response into raw items.
    pub async fn extract(
        &self,
        context: &dyn RenderContext,
    ) -> Result<Vec<RawItem>, ExtractionError> {
        let response = context
            .query_structured(&self.query)
            .await
            .map_err(|e| ExtractionError::Query(format!("{e:#}")))?;
        let items = parse_videos(&response)?;
        debug!(count = items.len(), "extracted raw items");
        Ok(items)
    }
}

/// Validate a `{ videos: [...] }` tree into raw items.
pub fn parse_videos(response: &Value) -> Result<Vec<RawItem>, ExtractionError> {
    let Some(root) = response.as_object() else {
        return Err(ExtractionError::MalformedResponse(format!(
            "expected an object at the root, got {}",
            type_name(response)
        )));
    };

    let videos = match root.get("videos") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(videos)) => videos,
        Some(other) => {
            return Err(ExtractionError::MalformedResponse(format!(
                "expected 'videos' to be an array, got {}",
                type_name(other)
            )))
        }
    };

    Ok(videos
        .iter()
        .filter_map(Value::as_object)
        .map(|video| RawItem {
            title: text_field(video.get("title")),
            metric_text: text_field(video.get("views")),
            age_text: text_field(video.get("age")),
            link: text_field(video.get("link")),
            thumbnail_url: text_field(video.get("thumbnail")),
        })
        .collect())
}

/// Strings verbatim, other scalars as JSON text, null/missing as empty.
fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
