use super::model::{Album, Catalog, Track};

/// An album kept by a search, with the songs that remain visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumMatch<'a> {
    pub album: &'a Album,
    pub songs: Vec<&'a Track>,
}

fn contains(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

impl Catalog {
    /// Case-insensitive substring search over albums and songs.
    ///
    /// An album whose name or artist matches keeps all its songs; any other
    /// album keeps only the songs whose title, artist or album match, and is
    /// dropped when none do. A blank term returns everything.
    pub fn search(&self, term: &str) -> Vec<AlbumMatch<'_>> {
        let term = term.trim().to_lowercase();

        self.albums()
            .iter()
            .filter_map(|album| {
                let album_hit = contains(&album.album, &term) || contains(&album.artist, &term);
                let songs: Vec<&Track> = album
                    .songs
                    .iter()
                    .filter(|s| {
                        album_hit
                            || contains(&s.title, &term)
                            || contains(&s.artist, &term)
                            || contains(&s.album, &term)
                    })
                    .collect();
                (!songs.is_empty()).then_some(AlbumMatch { album, songs })
            })
            .collect()
    }
}
