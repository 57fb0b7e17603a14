use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single cheep as it lives in the `cheeps` collection.
///
/// `time` is milliseconds since the Unix epoch, assigned by the server when
/// the cheep is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostError {
    #[error("cheep must be an object")]
    NotAnObject,
    #[error("cheep is missing `{0}`")]
    MissingField(&'static str),
    #[error("cheep field `{0}` has the wrong type")]
    WrongType(&'static str),
    #[error("{0}")]
    Invalid(String),
}

impl Post {
    pub fn new(text: String, time: i64) -> Self {
        Self {
            text,
            time,
            url: None,
            file: None,
            likes: None,
        }
    }

    /// Likes shown in the feed. Older documents never had the field.
    pub fn like_count(&self) -> u64 {
        self.likes.unwrap_or(0)
    }
}

impl TryFrom<&Value> for Post {
    type Error = PostError;

    fn try_from(record: &Value) -> Result<Self, Self::Error> {
        let object = record.as_object().ok_or(PostError::NotAnObject)?;

        let text = object
            .get("text")
            .ok_or(PostError::MissingField("text"))?
            .as_str()
            .ok_or(PostError::WrongType("text"))?
            .to_string();

        let time = object
            .get("time")
            .ok_or(PostError::MissingField("time"))?
            .as_i64()
            .ok_or(PostError::WrongType("time"))?;

        let optional_str = |key: &'static str| -> Result<Option<String>, PostError> {
            match object.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(PostError::WrongType(key)),
            }
        };

        let likes = match object.get("likes") {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_u64().ok_or(PostError::WrongType("likes"))?),
        };

        Ok(Self {
            text,
            time,
            url: optional_str("url")?,
            file: optional_str("file")?,
            likes,
        })
    }
}

/// Whether a raw document has the shape of a cheep.
pub fn is_post(record: &Value) -> bool {
    Post::try_from(record).is_ok()
}
