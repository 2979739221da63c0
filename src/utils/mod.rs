use url::Url;

use crate::domain::AppError;

/// User input that parsed as an absolute URL, kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUrl {
    raw: String,
}

impl MediaUrl {
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Check user input is an absolute URL before anything touches the network
pub fn parse_media_url(input: &str) -> Result<MediaUrl, AppError> {
    Url::parse(input).map_err(|_| AppError::InvalidUrl)?;
    Ok(MediaUrl {
        raw: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_media_url() {
        let url = parse_media_url("https://youtube.com/watch?v=abc").unwrap();
        assert_eq!(url.as_str(), "https://youtube.com/watch?v=abc");
    }

    #[test]
    fn test_keeps_input_unnormalized() {
        let url = parse_media_url("https://youtube.com").unwrap();
        assert_eq!(url.as_str(), "https://youtube.com");
    }

    #[test]
    fn test_rejects_non_urls() {
        for input in ["not a url", "", "youtube.com/watch?v=abc", "/relative/path", "://missing"] {
            assert_eq!(parse_media_url(input), Err(AppError::InvalidUrl), "{input}");
        }
    }
}
