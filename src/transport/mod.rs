pub mod http;
pub mod transport_model;

use crate::transport::transport_model::{RawResponse, Request};
use crate::ui::error::ClientError;

/// Anything that can carry a request to the server and bring back the raw reply.
///
/// `Err` means the exchange itself broke; an HTTP error status is still `Ok`.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<RawResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<RawResponse, ClientError> {
        (**self).send(request)
    }
}
