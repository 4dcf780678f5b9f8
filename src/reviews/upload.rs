//! All-or-nothing upload of draft photos.

use crate::api::attachment::ImageAttachment;
use crate::api::error::ReviewError;
use crate::api::gateway::ImageHost;

/// Uploads `images` one at a time, in order, returning their hosted URLs.
///
/// The first failure stops the batch; URLs already collected are discarded
/// and the caller must not create the review.
pub(crate) async fn upload_all<Images>(
    host: &Images,
    images: &[ImageAttachment],
) -> Result<Vec<String>, ReviewError>
where
    Images: ImageHost + ?Sized,
{
    let total = images.len();
    let mut urls = Vec::with_capacity(total);

    for image in images {
        match host.upload(image).await {
            Ok(url) => urls.push(url),
            Err(error) => {
                tracing::warn!(
                    "upload of '{}' failed after {} of {total} images: {error}",
                    image.file_name(),
                    urls.len()
                );
                return Err(ReviewError::PartialUploadFailure {
                    uploaded: urls.len(),
                    total,
                    message: error.to_string(),
                });
            }
        }
    }

    Ok(urls)
}
