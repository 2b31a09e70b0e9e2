//! Artwork and avatar image URLs.

use serde::Serialize;
use url::Url;

/// Size variants served by the artwork CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// 16x16
    Mini,
    /// 20x20
    Tiny,
    /// 32x32
    Small,
    /// 47x47
    Badge,
    T67x67,
    /// 100x100, the size the API returns by default
    Large,
    T300x300,
    /// 400x400
    Crop,
    T500x500,
    /// As uploaded
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Mini => "mini",
            ImageSize::Tiny => "tiny",
            ImageSize::Small => "small",
            ImageSize::Badge => "badge",
            ImageSize::T67x67 => "t67x67",
            ImageSize::Large => "large",
            ImageSize::T300x300 => "t300x300",
            ImageSize::Crop => "crop",
            ImageSize::T500x500 => "t500x500",
            ImageSize::Original => "original",
        }
    }
}

/// Image URL as returned by the API, with access to its sized variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageUrls {
    pub base_url: Option<Url>,
}

impl ImageUrls {
    pub fn new(base_url: Option<Url>) -> Self {
        Self { base_url }
    }

    /// URL of the requested size.
    ///
    /// The API returns the `large` variant (`...-large.jpg`); other sizes are
    /// obtained by swapping that token. URLs without the token are returned
    /// unchanged.
    pub fn url(&self, size: ImageSize) -> Option<Url> {
        let base = self.base_url.as_ref()?;
        let path = base.path();

        // Only the file name carries the size token
        let file_start = path.rfind('/').map_or(0, |slash| slash + 1);
        let Some(pos) = path[file_start..]
            .rfind("-large")
            .map(|offset| file_start + offset)
        else {
            return Some(base.clone());
        };

        let mut resized = base.clone();
        let new_path = format!(
            "{}-{}{}",
            &path[..pos],
            size.as_str(),
            &path[pos + "-large".len()..]
        );
        resized.set_path(&new_path);
        Some(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resizes_large_token() {
        let urls = ImageUrls::new(Some(
            Url::parse("https://i1.sndcdn.com/artworks-000042-abc-large.jpg?client_id=x").unwrap(),
        ));

        assert_eq!(
            urls.url(ImageSize::T500x500).unwrap().as_str(),
            "https://i1.sndcdn.com/artworks-000042-abc-t500x500.jpg?client_id=x"
        );
        assert_eq!(
            urls.url(ImageSize::Large).unwrap(),
            urls.base_url.clone().unwrap()
        );
    }

    #[test]
    fn test_without_token_or_base() {
        let plain = ImageUrls::new(Some(Url::parse("https://example.com/a.png").unwrap()));
        assert_eq!(
            plain.url(ImageSize::Mini).unwrap().as_str(),
            "https://example.com/a.png"
        );
        assert!(ImageUrls::default().url(ImageSize::Mini).is_none());
    }

    #[test]
    fn test_directory_segments_are_not_resized() {
        let in_dir = ImageUrls::new(Some(Url::parse("https://example.com/x-large/a.jpg").unwrap()));
        assert_eq!(
            in_dir.url(ImageSize::Crop).unwrap().as_str(),
            "https://example.com/x-large/a.jpg"
        );

        let both = ImageUrls::new(Some(
            Url::parse("https://example.com/x-large/avatar-large.png").unwrap(),
        ));
        assert_eq!(
            both.url(ImageSize::Crop).unwrap().as_str(),
            "https://example.com/x-large/avatar-crop.png"
        );
    }
}
