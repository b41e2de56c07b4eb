use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 300;
pub const CONTENT_MAX_CHARS: usize = 63206;

/// The kind of media a post carries. Stored and serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MultimediaType {
    Text,
    Image,
    Video,
    Livestream,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown multimedia type: {0}")]
pub struct UnknownMultimediaType(pub String);

impl MultimediaType {
    pub const ALL: [MultimediaType; 4] = [
        MultimediaType::Text,
        MultimediaType::Image,
        MultimediaType::Video,
        MultimediaType::Livestream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MultimediaType::Text => "text",
            MultimediaType::Image => "image",
            MultimediaType::Video => "video",
            MultimediaType::Livestream => "livestream",
        }
    }
}

impl fmt::Display for MultimediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Exact, case-sensitive match: "Text" is not a valid type.
impl FromStr for MultimediaType {
    type Err = UnknownMultimediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MultimediaType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownMultimediaType(s.to_string()))
    }
}

impl ToSql for MultimediaType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MultimediaType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Soft-delete state of a post. `Invalid` is terminal: such posts stay in
/// storage but are never returned by reads or existence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostState {
    #[default]
    Valid,
    Invalid,
}

impl PostState {
    /// Value of the `is_invalid` column for this state.
    pub fn flag(&self) -> i64 {
        match self {
            PostState::Valid => 0,
            PostState::Invalid => 1,
        }
    }
}

impl ToSql for PostState {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.flag()))
    }
}

impl FromSql for PostState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_i64()? {
            0 => Ok(PostState::Valid),
            1 => Ok(PostState::Invalid),
            other => Err(FromSqlError::OutOfRange(other)),
        }
    }
}

/// A multimedia post as stored, keyed by field name rather than column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultimediaPost {
    #[serde(rename = "mid")]
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MultimediaType,
    #[serde(rename = "date_published")]
    pub published_at: DateTime<Utc>,
    pub author_id: i64,
    #[serde(skip)]
    pub state: PostState,
}

/// Validated attributes for a new post. The author has passed the structural
/// checks but its existence is verified against the database at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMultimedia {
    pub title: String,
    pub content: String,
    pub kind: MultimediaType,
    pub author_id: i64,
}

/// Validated attributes for an edit. Type and author are immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct MultimediaEdit {
    pub title: String,
    pub content: String,
}

/// Body returned under the `Multimedia` key after a soft delete.
#[derive(Debug, Serialize)]
pub struct RemovalConfirmation {
    pub mid: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardUser {
    pub id: i64,
    pub username: String,
}

pub mod db_operations;
