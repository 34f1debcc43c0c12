use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Which content entity a rating, review, comment, or favorite points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Artist,
    Album,
    Song,
}

impl TargetKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Song => "song",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "artist" => Some(Self::Artist),
            "album" => Some(Self::Album),
            "song" => Some(Self::Song),
            _ => None,
        }
    }
}

impl From<TargetKind> for String {
    fn from(kind: TargetKind) -> String {
        kind.as_str().to_string()
    }
}

/// A validated reference to exactly one content entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRef {
    pub kind: TargetKind,
    pub id: i32,
}

impl ContentRef {
    pub fn new(kind: TargetKind, id: i32) -> Self {
        Self { kind, id }
    }

    /// Build from the three polymorphic FK columns, rejecting anything
    /// other than exactly one set id.
    pub fn from_ids(
        artist_id: Option<i32>,
        album_id: Option<i32>,
        song_id: Option<i32>,
    ) -> Result<Self> {
        match (artist_id, album_id, song_id) {
            (Some(id), None, None) => Ok(Self::new(TargetKind::Artist, id)),
            (None, Some(id), None) => Ok(Self::new(TargetKind::Album, id)),
            (None, None, Some(id)) => Ok(Self::new(TargetKind::Song, id)),
            (None, None, None) => Err(AppError::Validation(
                "One of artist_id, album_id, or song_id must be set".to_string(),
            )),
            _ => Err(AppError::Validation(
                "Only one of artist_id, album_id, or song_id may be set".to_string(),
            )),
        }
    }

    pub fn from_kind_str(kind: &str, id: i32) -> Result<Self> {
        TargetKind::from_str(kind)
            .map(|kind| Self::new(kind, id))
            .ok_or_else(|| AppError::Validation(format!("Unknown target kind: {}", kind)))
    }

    pub fn artist_id(&self) -> Option<i32> {
        matches!(self.kind, TargetKind::Artist).then_some(self.id)
    }

    pub fn album_id(&self) -> Option<i32> {
        matches!(self.kind, TargetKind::Album).then_some(self.id)
    }

    pub fn song_id(&self) -> Option<i32> {
        matches!(self.kind, TargetKind::Song).then_some(self.id)
    }
}
