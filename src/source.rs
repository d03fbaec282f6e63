//! Source-catalog collaborator interface.
//!
//! The raw source connector lives outside this crate; the engine only needs
//! an ordered sequence of records per playlist reference, each already
//! carrying its playlist title.

use crate::error::CatalogError;
use crate::models::TrackRecord;

/// Source-catalog collaborator: yields the ordered tracks of one playlist
/// reference (URL or id), each carrying its playlist_title.
pub trait PlaylistSource {
    fn playlist_tracks(&self, reference: &str) -> Result<Vec<TrackRecord>, CatalogError>;
}

/// Extract the playlist id from a source playlist URL.
///
/// The reference must carry a `list=` parameter; its absence fails this
/// single lookup without aborting the surrounding batch.
pub fn playlist_id_from_url(url: &str) -> Result<String, CatalogError> {
    let (_, rest) = url.split_once("list=").ok_or_else(|| {
        CatalogError::InputFormat(format!("playlist URL must contain 'list=' parameter: {}", url))
    })?;
    let id = rest.split('&').next().unwrap_or("");
    if id.is_empty() {
        return Err(CatalogError::InputFormat(format!(
            "playlist URL carries an empty 'list=' parameter: {}",
            url
        )));
    }
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_list_parameter() {
        assert_eq!(
            playlist_id_from_url("https://music.example.com/playlist?list=PLabc123").unwrap(),
            "PLabc123"
        );
    }

    #[test]
    fn test_strips_trailing_parameters() {
        assert_eq!(
            playlist_id_from_url("https://music.example.com/playlist?list=PLabc123&si=xyz").unwrap(),
            "PLabc123"
        );
    }

    #[test]
    fn test_missing_parameter_is_input_format_error() {
        let err = playlist_id_from_url("https://music.example.com/playlist?id=nope").unwrap_err();
        assert!(matches!(err, CatalogError::InputFormat(_)));
    }

    #[test]
    fn test_empty_parameter_is_input_format_error() {
        let err = playlist_id_from_url("https://music.example.com/playlist?list=").unwrap_err();
        assert!(matches!(err, CatalogError::InputFormat(_)));
    }
}
