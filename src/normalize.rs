use crate::models::{GenerationBody, ImageData};

/// Picks the single image to show from a generation body.
///
/// Only the first entry of a list is kept. `None` means the call succeeded
/// but produced nothing usable.
pub fn normalize(body: GenerationBody) -> Option<ImageData> {
    match body {
        GenerationBody::SinglePhoto(photo) => Some(ImageData(photo)),
        GenerationBody::PhotoList(photos) => photos.into_iter().next().map(ImageData),
        GenerationBody::Empty => None,
    }
}
