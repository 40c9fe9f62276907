use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A published feed entry. Created once, never updated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub name: String,
    pub prompt: String,
    /// Inline base64 payload (or data URL) exactly as the client sent it.
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

/// A validated post that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub name: String,
    pub prompt: String,
    pub photo: String,
}

/// Base64 image payload as produced by the generation API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ImageData(pub String);

impl ImageData {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shapes the generation API is known to answer with, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationBody {
    SinglePhoto(String),
    PhotoList(Vec<String>),
    Empty,
}

impl GenerationBody {
    /// Classifies a raw upstream JSON body.
    ///
    /// A non-empty `photo` string wins, then a `photos` array, then the
    /// `data[].b64_json` form used by OpenAI. A list only counts when its
    /// first entry is a non-empty string. Anything else is `Empty`.
    pub fn from_json(body: &serde_json::Value) -> Self {
        if let Some(photo) = body.get("photo").and_then(|p| p.as_str()) {
            if !photo.is_empty() {
                return GenerationBody::SinglePhoto(photo.to_string());
            }
        }

        if let Some(items) = body.get("photos").and_then(|p| p.as_array()) {
            if let Some(photos) = leading_list(items.iter().map(|item| item.as_str())) {
                return GenerationBody::PhotoList(photos);
            }
        }

        if let Some(items) = body.get("data").and_then(|d| d.as_array()) {
            let entries = items.iter().map(|item| item.get("b64_json").and_then(|b| b.as_str()));
            if let Some(photos) = leading_list(entries) {
                return GenerationBody::PhotoList(photos);
            }
        }

        GenerationBody::Empty
    }
}

/// Keeps the list only if entry 0 is a usable image; later entries are carried as-is.
fn leading_list<'a>(mut entries: impl Iterator<Item = Option<&'a str>>) -> Option<Vec<String>> {
    let first = entries.next().flatten().filter(|s| !s.is_empty())?;
    let mut photos = vec![first.to_string()];
    photos.extend(entries.flatten().map(str::to_string));
    Some(photos)
}

/// Output dimensions accepted by the edit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Small => "256x256",
            ImageSize::Medium => "512x512",
            ImageSize::Large => "1024x1024",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "256x256" => Some(ImageSize::Small),
            "512x512" => Some(ImageSize::Medium),
            "1024x1024" => Some(ImageSize::Large),
            _ => None,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded, validated input for the inpainting API.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPayload {
    pub image: Vec<u8>,
    pub mask: Vec<u8>,
    pub prompt: String,
    pub n: u32,
    pub size: ImageSize,
}

// --- Request / response bodies ---

#[derive(Deserialize, Debug, Default)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Serialize, Debug)]
pub struct GenerateImageResponse {
    pub photo: ImageData,
}

#[derive(Deserialize, Debug, Default)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub photo: String,
}

/// Raw edit body. Everything is optional so that missing fields produce the
/// endpoint's own 400 message instead of a deserialization rejection.
#[derive(Deserialize, Debug, Default)]
pub struct EditImageRequest {
    pub image: Option<String>,
    pub mask: Option<String>,
    pub prompt: Option<String>,
    pub n: Option<u32>,
    pub size: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: &'static str,
}
