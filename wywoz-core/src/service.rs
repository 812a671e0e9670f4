//! High-level service facade combining the city ports, the recognizer, and the pipeline.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::catalog::{HouseNumberCatalog, StreetCatalog};
use crate::config::PipelineConfig;
use crate::decoder::ScheduleImageDecoder;
use crate::error::LookupError;
use crate::extractor::DateWasteExtractor;
use crate::model::{CityMeta, DateRange, ResolvedAddress};
use crate::plugin::CityPlugin;
use crate::ports::{PortError, TextRecognizer};
use crate::region::TextRegion;
use crate::resolver::{AddressResolver, assemble};
use crate::schedule::ScheduleModel;

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by [`WywozService`].
pub enum ServiceError {
    /// The address or schedule could not be derived from the source data.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// A port failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

#[derive(Debug, Clone)]
/// Schedule for an address together with the image it was read from.
pub struct ScheduleLookup {
    /// PNG bytes as returned by the image source.
    pub image: Vec<u8>,
    /// Structured schedule.
    pub schedule: ScheduleModel,
}

/// Public entry point for resolving addresses and reading their schedules.
pub struct WywozService {
    plugin: CityPlugin,
    recognizer: Arc<dyn TextRecognizer>,
    config: PipelineConfig,
}

impl WywozService {
    /// Create a new service for one city.
    #[must_use]
    pub fn new(
        plugin: CityPlugin,
        recognizer: Arc<dyn TextRecognizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            plugin,
            recognizer,
            config,
        }
    }

    /// City served by this service.
    #[must_use]
    pub fn city(&self) -> &CityMeta {
        &self.plugin.meta
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve a raw street and house number against the city's catalogs.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Lookup`] when the street or house number is unknown,
    /// or [`ServiceError::Port`] when the catalog source fails.
    pub async fn resolve_address(
        &self,
        raw_street: &str,
        raw_number: &str,
    ) -> Result<ResolvedAddress, ServiceError> {
        let resolver = AddressResolver::from_config(&self.config);

        let streets = StreetCatalog::new(self.plugin.catalog_port.streets(raw_street).await?);
        tracing::debug!(query = raw_street, candidates = streets.len(), "loaded streets");
        let street = resolver.resolve_street(&streets, raw_street)?;

        let house_numbers = HouseNumberCatalog::new(
            self.plugin
                .catalog_port
                .house_numbers(&street.id)
                .await?,
        );
        let house_number = resolver.resolve_house_number(street, &house_numbers, raw_number)?;

        let address = assemble(street, house_number, raw_number);
        tracing::info!(
            address = %address.display_address,
            street_id = %address.street.id,
            house_number_id = %address.house_number.id,
            "resolved address"
        );
        Ok(address)
    }

    /// Resolve the address, fetch its schedule image, and structure the recognized text.
    ///
    /// The expected schedule window is derived from `today` and the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when resolution, a port, or extraction fails.
    pub async fn schedule_for(
        &self,
        raw_street: &str,
        raw_number: &str,
        today: NaiveDate,
    ) -> Result<ScheduleLookup, ServiceError> {
        let address = self.resolve_address(raw_street, raw_number).await?;
        let image = self.schedule_image(&address).await?;
        let schedule = self.read_schedule(address, &image, today).await?;
        Ok(ScheduleLookup { image, schedule })
    }

    /// Fetch the schedule image of a resolved address.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Port`] when the image source fails or has no image.
    pub async fn schedule_image(
        &self,
        address: &ResolvedAddress,
    ) -> Result<Vec<u8>, ServiceError> {
        let image = self.plugin.image_port.schedule_image(address).await?;
        tracing::debug!(bytes = image.len(), "fetched schedule image");
        Ok(image)
    }

    /// Recognize `image` and structure its text into the schedule of `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Port`] when recognition fails, or
    /// [`ServiceError::Lookup`] when the image yields no records.
    pub async fn read_schedule(
        &self,
        address: ResolvedAddress,
        image: &[u8],
        today: NaiveDate,
    ) -> Result<ScheduleModel, ServiceError> {
        let regions = self.recognizer.recognize(image).await?;
        tracing::debug!(regions = regions.len(), "recognized text regions");

        let schedule = self
            .structure(address, &regions, self.config.window(today))
            .inspect_err(|err| tracing::warn!(error = %err, "schedule image yielded no records"))?;
        tracing::info!(
            records = schedule.total_count(),
            waste_types = schedule.waste_types().len(),
            "structured schedule"
        );
        Ok(schedule)
    }

    /// Run the pure part of the pipeline over already recognized regions.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NoScheduleDataFound`] when no records can be extracted.
    pub fn structure(
        &self,
        address: ResolvedAddress,
        regions: &[TextRegion],
        window: DateRange,
    ) -> Result<ScheduleModel, LookupError> {
        let ordered = ScheduleImageDecoder::from_config(&self.config).order(regions);
        let records = DateWasteExtractor::new(self.config.locale, window).extract(&ordered)?;
        Ok(ScheduleModel::build(address, records))
    }
}
