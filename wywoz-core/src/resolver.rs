//! Turns a raw street and house number into canonical upstream identifiers.

use crate::catalog::{HouseNumberCatalog, StreetCatalog};
use crate::config::PipelineConfig;
use crate::error::LookupError;
use crate::model::{HouseNumberEntry, ResolvedAddress, StreetEntry};

/// Resolves addresses against catalogs supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver {
    street_threshold: f64,
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl AddressResolver {
    /// Resolver accepting streets scoring at least `street_threshold`.
    #[must_use]
    pub fn new(street_threshold: f64) -> Self {
        Self { street_threshold }
    }

    /// Resolver using the threshold from `config`.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.street_threshold)
    }

    /// Pick the street for `raw_street`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::StreetNotFound`] when the catalog is empty or no
    /// street reaches the threshold.
    pub fn resolve_street<'catalog>(
        &self,
        streets: &'catalog StreetCatalog,
        raw_street: &str,
    ) -> Result<&'catalog StreetEntry, LookupError> {
        streets
            .find(raw_street, self.street_threshold)
            .map(|found| found.entry)
            .ok_or_else(|| LookupError::StreetNotFound {
                street: raw_street.trim().to_owned(),
            })
    }

    /// Pick the house number for `raw_number` on an already resolved street.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::HouseNumberNotFound`] when no variant matches.
    pub fn resolve_house_number<'catalog>(
        &self,
        street: &StreetEntry,
        house_numbers: &'catalog HouseNumberCatalog,
        raw_number: &str,
    ) -> Result<&'catalog HouseNumberEntry, LookupError> {
        house_numbers
            .find(raw_number)
            .ok_or_else(|| LookupError::HouseNumberNotFound {
                street: street.name.clone(),
                number: raw_number.trim().to_owned(),
            })
    }

    /// Resolve both parts; `house_numbers_for` supplies the catalog of the matched street.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::StreetNotFound`] or [`LookupError::HouseNumberNotFound`].
    pub fn resolve<F>(
        &self,
        streets: &StreetCatalog,
        house_numbers_for: F,
        raw_street: &str,
        raw_number: &str,
    ) -> Result<ResolvedAddress, LookupError>
    where
        F: FnOnce(&StreetEntry) -> HouseNumberCatalog,
    {
        let street = self.resolve_street(streets, raw_street)?;
        let house_numbers = house_numbers_for(street);
        let house_number = self.resolve_house_number(street, &house_numbers, raw_number)?;
        Ok(assemble(street, house_number, raw_number))
    }
}

/// Build the resolved address shown to the user as `<street> <number as typed>`.
#[must_use]
pub fn assemble(
    street: &StreetEntry,
    house_number: &HouseNumberEntry,
    raw_number: &str,
) -> ResolvedAddress {
    ResolvedAddress {
        street: street.clone(),
        house_number: house_number.clone(),
        display_address: format!("{} {}", street.name, raw_number.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HouseNumberId, StreetId};

    fn krakowska() -> (StreetCatalog, HouseNumberCatalog) {
        (
            StreetCatalog::new(vec![StreetEntry::new("39936", "Krakowska")]),
            HouseNumberCatalog::new(vec![HouseNumberEntry::new("840531", "1 DJ")]),
        )
    }

    #[test]
    fn krakowska_one_resolves_to_catalog_ids() {
        let (streets, houses) = krakowska();
        let resolved = AddressResolver::default()
            .resolve(&streets, |_| houses.clone(), "Krakowska", "1")
            .expect("address resolves");

        assert_eq!(resolved.street.id, StreetId("39936".to_owned()));
        assert_eq!(resolved.house_number.id, HouseNumberId("840531".to_owned()));
        assert_eq!(resolved.display_address, "Krakowska 1");
    }

    #[test]
    fn resolved_ids_come_from_the_supplied_catalogs() {
        let streets = StreetCatalog::new(vec![
            StreetEntry::new("1", "Długa"),
            StreetEntry::new("2", "Krótka"),
        ]);
        let houses = HouseNumberCatalog::new(vec![
            HouseNumberEntry::new("11", "2"),
            HouseNumberEntry::new("12", "4b"),
        ]);
        let resolver = AddressResolver::default();

        for (street, number) in [("Długa", "2"), ("krotka", "4b"), ("DŁUGA", "4B")] {
            let resolved = resolver
                .resolve(&streets, |_| houses.clone(), street, number)
                .expect("address resolves");
            assert!(streets.entries().contains(&resolved.street));
            assert!(houses.entries().contains(&resolved.house_number));
        }
    }

    #[test]
    fn unknown_street_is_reported() {
        let (streets, houses) = krakowska();
        let result =
            AddressResolver::default().resolve(&streets, |_| houses.clone(), "Wawelska", "1");
        assert_eq!(
            result,
            Err(LookupError::StreetNotFound {
                street: "Wawelska".to_owned()
            })
        );
    }

    #[test]
    fn unknown_house_number_is_reported_with_street_name() {
        let (streets, houses) = krakowska();
        let result =
            AddressResolver::default().resolve(&streets, |_| houses.clone(), "krakowska", " 7 ");
        assert_eq!(
            result,
            Err(LookupError::HouseNumberNotFound {
                street: "Krakowska".to_owned(),
                number: "7".to_owned(),
            })
        );
    }

    #[test]
    fn house_numbers_are_requested_for_the_matched_street() {
        let (streets, houses) = krakowska();
        let mut asked_for = None;
        let _resolved = AddressResolver::default().resolve(
            &streets,
            |street| {
                asked_for = Some(street.id.clone());
                houses.clone()
            },
            "Krakowska",
            "1",
        );
        assert_eq!(asked_for, Some(StreetId("39936".to_owned())));
    }
}
