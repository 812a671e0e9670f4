//! Traits describing the external capabilities the pipeline depends on.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use std::io::Error as IoError;

use crate::model::{HouseNumberEntry, ResolvedAddress, StreetEntry, StreetId};
use crate::region::TextRegion;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the address source, image source, or recognizer.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The source answered with a payload that could not be understood.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The source did not return a schedule image for the address.
    #[error("No schedule image available for this address")]
    MissingImage,
    /// The text recognizer failed.
    #[error("Recognition error: {0}")]
    Recognition(String),
    /// Local I/O failed, e.g. while running the recognizer.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

#[async_trait]
/// Source of street and house-number enumerations.
pub trait AddressCatalogPort: Send + Sync {
    /// Streets matching `query`; sources without server-side search return all streets.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the payload is malformed.
    async fn streets(&self, query: &str) -> Result<Vec<StreetEntry>, PortError>;

    /// House-number variants of a street.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the payload is malformed.
    async fn house_numbers(&self, street: &StreetId) -> Result<Vec<HouseNumberEntry>, PortError>;
}

#[async_trait]
/// Source of the rendered schedule image for an address.
pub trait ScheduleImagePort: Send + Sync {
    /// PNG bytes of the schedule for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::MissingImage`] when the source has no image, or another
    /// [`PortError`] when the request fails.
    async fn schedule_image(&self, address: &ResolvedAddress) -> Result<Vec<u8>, PortError>;
}

#[async_trait]
/// Optical character recognition over raster images.
pub trait TextRecognizer: Send + Sync {
    /// Text regions found in `image`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Recognition`] or [`PortError::Io`] when recognition fails.
    async fn recognize(&self, image: &[u8]) -> Result<Vec<TextRegion>, PortError>;
}
