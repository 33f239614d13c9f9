//! Google Drive share links turned into embeddable Markdown.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Drive file ids are long runs of URL-safe characters.
static FILE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-A-Za-z0-9_]{25,}").unwrap_or_else(|err| panic!("invalid drive id pattern: {err}"))
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriveLinkError {
    #[error("no Google Drive file id found in {0:?}")]
    MissingId(String),
}

/// Extract the file id from a Drive share URL.
///
/// # Errors
/// Returns [`DriveLinkError::MissingId`] when the URL has no id-shaped run.
pub fn file_id(url: &str) -> Result<&str, DriveLinkError> {
    FILE_ID
        .find(url)
        .map(|m| m.as_str())
        .ok_or_else(|| DriveLinkError::MissingId(url.to_string()))
}

/// Markdown for an inline thumbnail of a Drive image.
///
/// # Errors
/// Propagates [`file_id`] failures.
pub fn image_markdown(url: &str) -> Result<String, DriveLinkError> {
    let id = file_id(url)?;
    Ok(format!(
        "![Image](https://drive.google.com/thumbnail?id={id}&sz=w1000)"
    ))
}

/// Markdown for a download button pointing at a Drive file.
///
/// # Errors
/// Propagates [`file_id`] failures.
pub fn file_button_markdown(url: &str) -> Result<String, DriveLinkError> {
    let id = file_id(url)?;
    Ok(format!(
        "[<button> [Button Name] </button>](https://drive.google.com/uc?export=download&id={id})"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARE_URL: &str =
        "https://drive.google.com/file/d/1AbCdEfGhIjKlMnOpQrStUvWxYz012345/view?usp=sharing";

    #[test]
    fn test_file_id_extracted_from_share_url() {
        assert_eq!(
            file_id(SHARE_URL).unwrap(),
            "1AbCdEfGhIjKlMnOpQrStUvWxYz012345"
        );
    }

    #[test]
    fn test_file_id_from_open_url_query() {
        let url = "https://drive.google.com/open?id=0B-abcdefghijklmnopqrstuvwxyz";
        assert_eq!(file_id(url).unwrap(), "0B-abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn test_non_ascii_words_are_not_ids() {
        let url = "https://drive.google.com/file/d/ünïcödéünïcödéünïcödéünïcödé/view";
        assert!(file_id(url).is_err());
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let err = file_id("https://drive.google.com/short").unwrap_err();
        assert_eq!(
            err,
            DriveLinkError::MissingId("https://drive.google.com/short".to_string())
        );
    }

    #[test]
    fn test_image_markdown_uses_thumbnail_endpoint() {
        assert_eq!(
            image_markdown(SHARE_URL).unwrap(),
            "![Image](https://drive.google.com/thumbnail?id=1AbCdEfGhIjKlMnOpQrStUvWxYz012345&sz=w1000)"
        );
    }

    #[test]
    fn test_file_button_markdown_uses_download_endpoint() {
        let md = file_button_markdown(SHARE_URL).unwrap();
        assert!(md.starts_with("[<button> [Button Name] </button>]("));
        assert!(md.ends_with("uc?export=download&id=1AbCdEfGhIjKlMnOpQrStUvWxYz012345)"));
    }
}
