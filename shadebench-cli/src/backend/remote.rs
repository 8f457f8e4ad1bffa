//! Remote Backend
//!
//! One stateless HTTP round-trip per transform: encode the buffer as a
//! standalone PNG, POST it as a multipart field, decode the PNG that
//! comes back. Exactly one attempt per call; retries are the caller's
//! business.

use crate::backend::{Backend, BackendError};
use reqwest::blocking::{Client, multipart};
use shadebench_core::{BackendId, RasterImage};

/// Grayscale execution delegated to the remote filter service.
pub struct RemoteBackend {
    endpoint: String,
    client: Client,
}

impl RemoteBackend {
    /// Create a backend posting to `endpoint`.
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }

}

impl Backend for RemoteBackend {
    fn id(&self) -> BackendId {
        BackendId::Remote
    }

    fn transform(&mut self, image: RasterImage) -> Result<RasterImage, BackendError> {
        let png = image.encode_png();

        let part = multipart::Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Remote {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;

        let out = RasterImage::decode(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        if out.width() != image.width() || out.height() != image.height() {
            return Err(BackendError::Decode(format!(
                "remote returned a {}x{} image, expected {}x{}",
                out.width(),
                out.height(),
                image.width(),
                image.height()
            )));
        }

        Ok(out)
    }
}
