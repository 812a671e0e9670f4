//! Failures of the resolution and extraction pipeline.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Conditions under which an address or schedule cannot be produced.
pub enum LookupError {
    /// No street scored above the acceptance threshold.
    #[error("Street '{street}' not found")]
    StreetNotFound {
        /// Street name as given by the user.
        street: String,
    },
    /// The street matched but none of its house numbers did.
    #[error("House number '{number}' not found on {street}")]
    HouseNumberNotFound {
        /// Name of the matched street.
        street: String,
        /// House number as given by the user.
        number: String,
    },
    /// The schedule image yielded no usable collection records.
    #[error("No schedule data found in the recognized image")]
    NoScheduleDataFound,
}
