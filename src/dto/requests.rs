use crate::models::{Post, PostError};
use serde::Deserialize;
use validator::Validate;

/// Fields submitted by the compose form (or the JSON API).
///
/// Everything is optional at this stage so that a well-encoded body always
/// deserializes; presence is checked by [`NewCheep::try_from`].
#[derive(Debug, Default, Deserialize)]
pub struct CheepFields {
    pub text: Option<String>,
    pub url: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Validate)]
pub struct NewCheep {
    #[validate(length(min = 1, max = 280, message = "Cheep text must be 1-280 characters"))]
    pub text: String,
    #[validate(url(message = "Cheep url is not a valid URL"))]
    pub url: Option<String>,
    #[validate(length(max = 2048, message = "File reference is too long"))]
    pub file: Option<String>,
}

impl TryFrom<CheepFields> for NewCheep {
    type Error = PostError;

    fn try_from(fields: CheepFields) -> Result<Self, Self::Error> {
        // Browsers submit empty strings for untouched optional inputs.
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let cheep = Self {
            text: fields
                .text
                .map(|text| text.trim().to_string())
                .ok_or(PostError::MissingField("text"))?,
            url: non_empty(fields.url),
            file: non_empty(fields.file),
        };

        cheep
            .validate()
            .map_err(|e| PostError::Invalid(e.to_string()))?;

        Ok(cheep)
    }
}

impl NewCheep {
    /// Stamp the cheep with its write time.
    pub fn into_post(self, time: i64) -> Post {
        Post {
            text: self.text,
            time,
            url: self.url,
            file: self.file,
            likes: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub emailaddress: String,
    pub password: String,
}

/// `GET /login?invalid`
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub invalid: Option<String>,
}

impl LoginQuery {
    pub fn is_invalid(&self) -> bool {
        self.invalid.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(text: Option<&str>, url: Option<&str>, file: Option<&str>) -> CheepFields {
        CheepFields {
            text: text.map(String::from),
            url: url.map(String::from),
            file: file.map(String::from),
        }
    }

    #[test]
    fn builds_cheep_from_text_only() {
        let cheep = NewCheep::try_from(fields(Some("hello"), None, None)).unwrap();
        assert_eq!(cheep.text, "hello");
        assert!(cheep.url.is_none());
        assert!(cheep.file.is_none());
    }

    #[test]
    fn missing_text_is_rejected() {
        let err = NewCheep::try_from(fields(None, Some("https://a.b"), None)).unwrap_err();
        assert_eq!(err, PostError::MissingField("text"));
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = NewCheep::try_from(fields(Some(""), None, None)).unwrap_err();
        assert!(matches!(err, PostError::Invalid(_)));
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        for text in ["   ", "\n\t", " \r\n "] {
            let err = NewCheep::try_from(fields(Some(text), None, None)).unwrap_err();
            assert!(matches!(err, PostError::Invalid(_)), "{text:?} was accepted");
        }
    }

    #[test]
    fn text_is_trimmed() {
        let cheep = NewCheep::try_from(fields(Some("  hi there \n"), None, None)).unwrap();
        assert_eq!(cheep.text, "hi there");
    }

    #[test]
    fn bad_url_is_rejected() {
        let err = NewCheep::try_from(fields(Some("hi"), Some("not a url"), None)).unwrap_err();
        assert!(matches!(err, PostError::Invalid(_)));
    }

    #[test]
    fn blank_optional_inputs_are_dropped() {
        let cheep = NewCheep::try_from(fields(Some("hi"), Some(""), Some("  "))).unwrap();
        assert!(cheep.url.is_none());
        assert!(cheep.file.is_none());
    }

    #[test]
    fn into_post_stamps_time() {
        let cheep =
            NewCheep::try_from(fields(Some("hi"), Some("https://example.com"), Some("a.png")))
                .unwrap();
        let post = cheep.into_post(1234);
        assert_eq!(post.time, 1234);
        assert_eq!(post.url.as_deref(), Some("https://example.com"));
        assert_eq!(post.file.as_deref(), Some("a.png"));
        assert_eq!(post.likes, None);
    }

    #[test]
    fn login_query_flag() {
        assert!(LoginQuery { invalid: Some(String::new()) }.is_invalid());
        assert!(!LoginQuery::default().is_invalid());
    }
}
