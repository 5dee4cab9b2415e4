use std::io::Read;

use crate::error::WebhookError;

/// What the decoder needs from an inbound HTTP request.
pub trait InboundRequest {
    /// Raw value of the header `name`, which need not be valid text.
    fn header(&self, name: &str) -> Option<&[u8]>;

    /// `None` when the request carries no readable body.
    fn body_reader(&mut self) -> Option<&mut dyn Read>;
}

impl<B: Read> InboundRequest for http::Request<B> {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers().get(name).map(http::HeaderValue::as_bytes)
    }

    fn body_reader(&mut self) -> Option<&mut dyn Read> {
        Some(self.body_mut())
    }
}

/// Reads `body` to the end, failing once more than `max_size` bytes arrive.
///
/// At most `max_size + 1` bytes are pulled from the stream.
pub fn read_limited<R: Read>(body: R, max_size: usize) -> Result<Vec<u8>, WebhookError> {
    let ceiling = (max_size as u64).saturating_add(1);
    let mut data = Vec::new();
    body.take(ceiling)
        .read_to_end(&mut data)
        .map_err(WebhookError::Read)?;

    if data.len() > max_size {
        return Err(WebhookError::TooLarge { limit: max_size });
    }
    Ok(data)
}
