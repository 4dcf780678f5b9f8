//! Image host gateway used for review photos.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::api::attachment::ImageAttachment;
use crate::api::error::ReviewError;

use super::ImageHost;
use super::client::build_http_client;
use super::http_utils::{decode, send};

/// Upload preset configured on the image host for review photos.
pub const DEFAULT_UPLOAD_PRESET: &str = "review_photos";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Unsigned multipart uploader for a Cloudinary-style image host.
#[derive(Debug, Clone)]
pub struct HttpImageHost {
    client: Client,
    upload_url: Url,
    upload_preset: String,
}

impl HttpImageHost {
    /// Creates an uploader for the given endpoint and preset.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] when `upload_url` does not parse or
    /// an error if the HTTP client cannot be built.
    pub fn new(
        upload_url: &str,
        upload_preset: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ReviewError> {
        let client = build_http_client(timeout)?;
        Self::with_client(client, upload_url, upload_preset)
    }

    /// Creates an uploader that shares an existing client.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] when `upload_url` does not parse.
    pub fn with_client(
        client: Client,
        upload_url: &str,
        upload_preset: impl Into<String>,
    ) -> Result<Self, ReviewError> {
        let url =
            Url::parse(upload_url).map_err(|error| ReviewError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            client,
            upload_url: url,
            upload_preset: upload_preset.into(),
        })
    }

    fn form_for(&self, image: &ImageAttachment) -> Result<Form, ReviewError> {
        let mut part = Part::bytes(image.bytes().to_vec()).file_name(image.file_name().to_owned());
        if let Some(mime) = image.content_type() {
            part = part
                .mime_str(mime)
                .map_err(|error| ReviewError::Configuration {
                    message: format!("invalid content type '{mime}': {error}"),
                })?;
        }

        Ok(Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone()))
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, image: &ImageAttachment) -> Result<String, ReviewError> {
        let operation = "upload image";
        let form = self.form_for(image)?;
        tracing::debug!(
            "{operation}: POST {} ({} bytes)",
            self.upload_url,
            image.len()
        );

        let request = self.client.post(self.upload_url.clone()).multipart(form);
        let response = send(operation, request).await?;
        let body: UploadResponse = decode(operation, response).await?;

        body.secure_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ReviewError::Api {
                message: format!(
                    "{operation} response for '{}' did not contain secure_url",
                    image.file_name()
                ),
            })
    }
}
