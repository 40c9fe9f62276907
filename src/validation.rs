use crate::errors::ValidationError;
use crate::models::{CreatePostRequest, EditImageRequest, EditPayload, ImageSize, NewPost};
use base64::{engine::general_purpose, Engine as _};

/// Upper bound the inpainting API accepts for `n`.
pub const MAX_EDIT_COUNT: u32 = 10;

/// Rejects prompts that are empty once trimmed.
pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    Ok(())
}

/// Checks a publish request. `name` is accepted as-is, even when empty.
pub fn validate_post(request: CreatePostRequest) -> Result<NewPost, ValidationError> {
    validate_prompt(&request.prompt)?;
    if request.photo.trim().is_empty() {
        return Err(ValidationError::MissingPhoto);
    }
    Ok(NewPost {
        name: request.name,
        prompt: request.prompt,
        photo: request.photo,
    })
}

/// Checks and decodes an edit request into the bytes sent upstream.
pub fn validate_edit(request: EditImageRequest) -> Result<EditPayload, ValidationError> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let (Some(image), Some(mask), Some(prompt)) =
        (present(request.image), present(request.mask), present(request.prompt))
    else {
        return Err(ValidationError::MissingEditFields);
    };

    let n = request.n.unwrap_or(1);
    if n == 0 || n > MAX_EDIT_COUNT {
        return Err(ValidationError::InvalidCount { got: n, max: MAX_EDIT_COUNT });
    }

    let size = match request.size {
        Some(raw) => ImageSize::parse(&raw).ok_or(ValidationError::UnsupportedSize(raw))?,
        None => ImageSize::default(),
    };

    Ok(EditPayload {
        image: decode_image(&image, "image")?,
        mask: decode_image(&mask, "mask")?,
        prompt,
        n,
        size,
    })
}

/// Decodes bare base64 or a `data:<mime>;base64,<payload>` URL.
pub fn decode_image(raw: &str, field: &'static str) -> Result<Vec<u8>, ValidationError> {
    let trimmed = raw.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or(ValidationError::InvalidBase64(field))?,
        None => trimmed,
    };

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| ValidationError::InvalidBase64(field))?;
    if bytes.is_empty() {
        return Err(ValidationError::InvalidBase64(field));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_request(image: Option<&str>, mask: Option<&str>, prompt: Option<&str>) -> EditImageRequest {
        EditImageRequest {
            image: image.map(str::to_string),
            mask: mask.map(str::to_string),
            prompt: prompt.map(str::to_string),
            n: None,
            size: None,
        }
    }

    #[test]
    fn blank_prompts_are_rejected() {
        for prompt in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(validate_prompt(prompt), Err(ValidationError::EmptyPrompt), "{prompt:?}");
        }
        assert!(validate_prompt(" sunflowers ").is_ok());
    }

    #[test]
    fn post_name_may_be_empty() {
        let post = validate_post(CreatePostRequest {
            name: String::new(),
            prompt: "cat".into(),
            photo: "XYZ".into(),
        })
        .unwrap();
        assert_eq!(post.name, "");
        assert_eq!(post.photo, "XYZ");
    }

    #[test]
    fn post_requires_prompt_then_photo() {
        let no_prompt = CreatePostRequest { name: "a".into(), prompt: "".into(), photo: "XYZ".into() };
        assert_eq!(validate_post(no_prompt), Err(ValidationError::EmptyPrompt));

        let no_photo = CreatePostRequest { name: "a".into(), prompt: "cat".into(), photo: "  ".into() };
        assert_eq!(validate_post(no_photo), Err(ValidationError::MissingPhoto));
    }

    #[test]
    fn edit_requires_all_three_fields() {
        let cases = [
            edit_request(None, Some("bQ=="), Some("p")),
            edit_request(Some("aQ=="), None, Some("p")),
            edit_request(Some("aQ=="), Some("bQ=="), None),
            edit_request(Some(""), Some("bQ=="), Some("p")),
        ];
        for case in cases {
            assert_eq!(validate_edit(case), Err(ValidationError::MissingEditFields));
        }
    }

    #[test]
    fn edit_defaults_and_decoding() {
        let payload = validate_edit(edit_request(Some("aGVsbG8="), Some("data:image/png;base64,bWFzaw=="), Some("add a hat")))
            .unwrap();
        assert_eq!(payload.image, b"hello");
        assert_eq!(payload.mask, b"mask");
        assert_eq!(payload.n, 1);
        assert_eq!(payload.size, ImageSize::Large);
    }

    #[test]
    fn edit_rejects_bad_base64_size_and_count() {
        let bad_image = edit_request(Some("not base64!"), Some("bQ=="), Some("p"));
        assert_eq!(validate_edit(bad_image), Err(ValidationError::InvalidBase64("image")));

        let mut bad_size = edit_request(Some("aQ=="), Some("bQ=="), Some("p"));
        bad_size.size = Some("640x480".into());
        assert_eq!(validate_edit(bad_size), Err(ValidationError::UnsupportedSize("640x480".into())));

        let mut zero = edit_request(Some("aQ=="), Some("bQ=="), Some("p"));
        zero.n = Some(0);
        assert_eq!(validate_edit(zero), Err(ValidationError::InvalidCount { got: 0, max: MAX_EDIT_COUNT }));

        let mut too_many = edit_request(Some("aQ=="), Some("bQ=="), Some("p"));
        too_many.n = Some(MAX_EDIT_COUNT + 1);
        assert_eq!(
            validate_edit(too_many),
            Err(ValidationError::InvalidCount { got: 11, max: MAX_EDIT_COUNT })
        );

        let mut at_limit = edit_request(Some("aQ=="), Some("bQ=="), Some("p"));
        at_limit.n = Some(MAX_EDIT_COUNT);
        assert_eq!(validate_edit(at_limit).unwrap().n, 10);
    }
}
