//! Photo page scraper.
//!
//! Pulls the image URL, title and artist out of a single photo page using fixed
//! selectors. Any missing element or transport failure is reported the same way
//! to callers; there is no retry and no caching.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;

pub const IMAGE_SELECTOR: &str = r#"meta[content^="https://live.staticflickr.com/"]"#;
pub const TITLE_SELECTOR: &str = "h1.photo-title";
pub const ARTIST_SELECTOR: &str = "a.owner-name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPhoto {
    pub image: String,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no element matches `{0}`")]
    Missing(&'static str),
    #[error("invalid selector `{0}`")]
    Selector(&'static str),
}

/// Where new posts get their image, title and artist from.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ScrapedPhoto, ScrapeError>;
}

#[derive(Clone, Default)]
pub struct FlickrScraper {
    client: Client,
}

impl FlickrScraper {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl PhotoSource for FlickrScraper {
    async fn fetch(&self, url: &str) -> Result<ScrapedPhoto, ScrapeError> {
        let body = self.client.get(url).send().await?.text().await?;
        parse_photo_page(&body)
    }
}

/// Extracts the photo fields from a page. Fails if any selector matches nothing.
pub fn parse_photo_page(html: &str) -> Result<ScrapedPhoto, ScrapeError> {
    let document = Html::parse_document(html);

    let image = document
        .select(&selector(IMAGE_SELECTOR)?)
        .next()
        .and_then(|el| el.value().attr("content"))
        .ok_or(ScrapeError::Missing(IMAGE_SELECTOR))?
        .to_string();

    let title = first_text(&document, TITLE_SELECTOR)?;
    let artist = first_text(&document, ARTIST_SELECTOR)?;

    Ok(ScrapedPhoto { image, title, artist })
}

fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css))
}

fn first_text(document: &Html, css: &'static str) -> Result<String, ScrapeError> {
    document
        .select(&selector(css)?)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or(ScrapeError::Missing(css))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTO_PAGE: &str = r#"
        <html>
          <head>
            <meta property="og:site_name" content="Flickr">
            <meta property="og:image" content="https://live.staticflickr.com/65535/5123_abc_b.jpg">
            <meta name="twitter:image" content="https://live.staticflickr.com/65535/5123_abc_z.jpg">
          </head>
          <body>
            <h1 class="photo-title meta-field">
              Morning fog over the bay
            </h1>
            <div class="attribution">
              <a class="owner-name truncate" href="/photos/someone/"> Jane Doe </a>
            </div>
          </body>
        </html>
    "#;

    #[test]
    fn extracts_first_match_for_each_field() {
        let photo = parse_photo_page(PHOTO_PAGE).unwrap();
        assert_eq!(
            photo,
            ScrapedPhoto {
                image: "https://live.staticflickr.com/65535/5123_abc_b.jpg".into(),
                title: "Morning fog over the bay".into(),
                artist: "Jane Doe".into(),
            }
        );
    }

    #[test]
    fn image_from_other_cdn_is_not_accepted() {
        let page = PHOTO_PAGE.replace("https://live.staticflickr.com", "https://cdn.example.com");
        assert!(matches!(
            parse_photo_page(&page),
            Err(ScrapeError::Missing(IMAGE_SELECTOR))
        ));
    }

    #[test]
    fn missing_title_fails() {
        let page = PHOTO_PAGE.replace("photo-title", "headline");
        assert!(matches!(
            parse_photo_page(&page),
            Err(ScrapeError::Missing(TITLE_SELECTOR))
        ));
    }

    #[test]
    fn missing_artist_fails() {
        let page = PHOTO_PAGE.replace("owner-name", "user-link");
        assert!(matches!(
            parse_photo_page(&page),
            Err(ScrapeError::Missing(ARTIST_SELECTOR))
        ));
    }

    #[test]
    fn unrelated_page_fails() {
        assert!(parse_photo_page("<html><body><p>Not found</p></body></html>").is_err());
    }
}
