use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The host's item type tag.
///
/// Names follow the host's wire spelling so they can be compared against
/// `includeItemTypes` values and serialized into `Type` fields unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Plain folder
    Folder,
    /// Library root (movies, shows, collections, ...)
    CollectionFolder,
    /// Per-user root that holds the library roots
    UserRootFolder,
    /// A collection grouping of items
    BoxSet,
    Movie,
    Series,
    Season,
    Episode,
    Playlist,
    MusicAlbum,
    Audio,
}

impl ItemKind {
    pub const ALL: [ItemKind; 11] = [
        ItemKind::Folder,
        ItemKind::CollectionFolder,
        ItemKind::UserRootFolder,
        ItemKind::BoxSet,
        ItemKind::Movie,
        ItemKind::Series,
        ItemKind::Season,
        ItemKind::Episode,
        ItemKind::Playlist,
        ItemKind::MusicAlbum,
        ItemKind::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Folder => "Folder",
            ItemKind::CollectionFolder => "CollectionFolder",
            ItemKind::UserRootFolder => "UserRootFolder",
            ItemKind::BoxSet => "BoxSet",
            ItemKind::Movie => "Movie",
            ItemKind::Series => "Series",
            ItemKind::Season => "Season",
            ItemKind::Episode => "Episode",
            ItemKind::Playlist => "Playlist",
            ItemKind::MusicAlbum => "MusicAlbum",
            ItemKind::Audio => "Audio",
        }
    }

    pub fn is_collection_folder(&self) -> bool {
        matches!(self, ItemKind::CollectionFolder)
    }

    /// Kinds that hold other items rather than being playable.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ItemKind::Folder
                | ItemKind::CollectionFolder
                | ItemKind::UserRootFolder
                | ItemKind::BoxSet
                | ItemKind::Series
                | ItemKind::Season
                | ItemKind::Playlist
                | ItemKind::MusicAlbum
        )
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ModelError;

    /// Case-insensitive, the way the host binds enum query values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownItemKind(s.to_string()))
    }
}
