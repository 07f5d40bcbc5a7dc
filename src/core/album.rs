//! Random images from image-host albums for the macro commands.

use crate::errors::Result;
use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;

const IMGUR_API: &str = "https://api.imgur.com/3";

/// One image in an album.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AlbumImage {
    /// Direct link to the image
    pub link: String,
    /// Optional caption, doubles as a lookup key
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    data: Vec<AlbumImage>,
}

/// Thin client for the Imgur album API.
#[derive(Debug, Clone)]
pub struct ImgurClient {
    http: reqwest::Client,
    client_id: String,
}

impl ImgurClient {
    /// Creates a client authenticating with an application client id.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
        }
    }

    /// Fetches every image in one album.
    pub async fn album_images(&self, album_id: &str) -> Result<Vec<AlbumImage>> {
        let response: AlbumResponse = self
            .http
            .get(format!("{IMGUR_API}/album/{album_id}/images"))
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!(album_id, count = response.data.len(), "Fetched album");
        Ok(response.data)
    }

    /// Fetches and concatenates several albums.
    pub async fn images_from(&self, album_ids: &[String]) -> Result<Vec<AlbumImage>> {
        let mut images = Vec::new();
        for album_id in album_ids {
            images.extend(self.album_images(album_id).await?);
        }
        Ok(images)
    }
}

/// Picks a random image, unless `key` matches an image's description
/// (case-insensitively), in which case that image wins.
pub fn choose_image<'a, R>(images: &'a [AlbumImage], key: Option<&str>, rng: &mut R) -> Option<&'a AlbumImage>
where
    R: Rng + ?Sized,
{
    if let Some(key) = key.map(str::to_lowercase) {
        let keyed = images.iter().find(|image| {
            image
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase() == key)
        });
        if keyed.is_some() {
            return keyed;
        }
    }
    images.choose(rng)
}
