//! Wire model of the General OCR V2 response.
//!
//! ```json
//! { "images": [ {
//!     "inferResult": "SUCCESS",
//!     "fields": [ { "inferText": "Hello",
//!                   "boundingPoly": { "vertices": [ {"x": 10, "y": 5}, ... ] } } ],
//!     "title": { "inferText": "..." }
//! } ] }
//! ```
//!
//! Every member is optional on the wire; missing vertex coordinates read as 0.
//! Unknown members (confidence scores, line-break flags) are ignored.

use crate::pipeline::fragment::{BoundingBox, Fragment};
use crate::pipeline::PageContent;
use serde::{Deserialize, Serialize};

/// Top-level OCR response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// One entry per page, in document order.
    #[serde(default)]
    pub images: Vec<OcrImage>,
}

/// Recognition result for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `SUCCESS`, `FAILURE` or `ERROR`. Absent is treated as success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infer_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<OcrField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<OcrField>,
}

/// One recognised text unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrField {
    #[serde(default)]
    pub infer_text: String,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingPoly {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl OcrImage {
    /// `Err(detail)` when the service reports this page as unrecognised.
    pub fn status(&self) -> Result<(), String> {
        match self.infer_result.as_deref() {
            None | Some("SUCCESS") => Ok(()),
            Some(result) => Err(match self.message.as_deref() {
                Some(msg) if !msg.is_empty() => format!("{result}: {msg}"),
                _ => result.to_string(),
            }),
        }
    }

    /// What this page contributes to the layout pipeline.
    ///
    /// `fields` wins over `title` whenever present, even when empty.
    pub fn content(&self) -> PageContent {
        if let Some(fields) = &self.fields {
            PageContent::Fragments(fields.iter().map(Fragment::from).collect())
        } else if let Some(title) = &self.title {
            PageContent::Title(title.infer_text.clone())
        } else {
            PageContent::Empty
        }
    }
}

impl From<&OcrField> for Fragment {
    fn from(field: &OcrField) -> Self {
        let bounds =
            BoundingBox::from_vertices(field.bounding_poly.vertices.iter().map(|v| (v.x, v.y)));
        Fragment::new(field.infer_text.clone(), bounds)
    }
}
