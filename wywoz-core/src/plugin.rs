//! Bundle of ports implementing the sources for a single city.

use std::sync::Arc;

use crate::model::CityMeta;
use crate::ports::{AddressCatalogPort, ScheduleImagePort};

/// Collection of ports implementing a provider for a single city.
#[derive(Clone)]
pub struct CityPlugin {
    /// Static metadata describing the city.
    pub meta: CityMeta,
    /// Implementation for enumerating streets and house numbers.
    pub catalog_port: Arc<dyn AddressCatalogPort>,
    /// Implementation for fetching schedule images.
    pub image_port: Arc<dyn ScheduleImagePort>,
}
