//! Provider implementation for Kraków using the `kiedywywoz.pl` schedule image API.
//!
//! The API is a single endpoint taking form posts: a bare token lists all streets,
//! adding `ulica` lists the house numbers of that street, and adding `numer` as
//! well returns the rendered schedule as a base64 PNG data URL.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, REFERER};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, OnceCell};

use wywoz_core::{
    model::{CityId, CityMeta, HouseNumberEntry, ResolvedAddress, StreetEntry, StreetId},
    plugin::CityPlugin,
    ports::{AddressCatalogPort, PortError, ScheduleImagePort},
};

const BASE_URL: &str = "https://kiedywywoz.pl/API/harmo_img/";
/// Public token embedded in the MPO schedule page.
const TOKEN: &str = "OkkxhC6b9etJBAq7WTHJ0LhIglO18sip";
const PAGE_URL: &str = "https://harmonogram.mpo.krakow.pl/";
/// Name the API uses for the "nothing selected" option of its drop-downs.
const PLACEHOLDER: &str = "-Brak-";
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Ids come back as JSON strings or numbers depending on the list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl fmt::Display for RawId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(text) => formatter.write_str(text.trim()),
            RawId::Number(number) => write!(formatter, "{number}"),
        }
    }
}

/// Entry of the street and house number lists.
#[derive(Debug, Deserialize)]
struct NamedEntry {
    id: RawId,
    name: String,
}

impl NamedEntry {
    /// Trimmed id and name, or `None` for the placeholder and entries without an id.
    fn validated(self) -> Option<(String, String)> {
        let name = self.name.trim();
        let id = self.id.to_string();
        if name == PLACEHOLDER || name.is_empty() || id.is_empty() {
            return None;
        }
        Some((id, name.to_owned()))
    }
}

/// Answer to a schedule image request.
#[derive(Debug, Deserialize)]
struct ImageResponse {
    status: RawId,
    #[serde(default)]
    img: Option<String>,
}

/// Endpoint and credentials of the Kraków API.
#[derive(Debug, Clone)]
pub struct KrakowApi {
    client: Client,
    base_url: String,
    token: String,
}

impl KrakowApi {
    /// API client talking to the public endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, BASE_URL, TOKEN)
    }

    /// API client talking to another endpoint, e.g. a mock server.
    #[must_use]
    pub fn with_endpoint<U: Into<String>, T: Into<String>>(
        client: Client,
        base_url: U,
        token: T,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        fields: &[(&str, &str)],
    ) -> Result<T, PortError> {
        let mut form: Vec<(&str, &str)> = fields.to_vec();
        form.push(("token", self.token.as_str()));

        let req = self
            .client
            .post(&self.base_url)
            .header(REFERER, PAGE_URL)
            .header(ACCEPT, "*/*")
            .form(&form);

        fetch_json(req).await
    }
}

/// Street and house number enumeration for Kraków.
///
/// Both lists are fetched once per port and kept for its lifetime.
pub struct KrakowCatalogPort {
    api: KrakowApi,
    streets: OnceCell<Vec<StreetEntry>>,
    house_numbers: Mutex<HashMap<StreetId, Vec<HouseNumberEntry>>>,
}

impl KrakowCatalogPort {
    /// Create a new catalog port on top of `api`.
    #[must_use]
    pub fn new(api: KrakowApi) -> Self {
        Self {
            api,
            streets: OnceCell::new(),
            house_numbers: Mutex::new(HashMap::new()),
        }
    }

    async fn load_streets(&self) -> Result<Vec<StreetEntry>, PortError> {
        let raw: Vec<NamedEntry> = self.api.post_form(&[]).await?;
        let streets: Vec<StreetEntry> = raw
            .into_iter()
            .filter_map(NamedEntry::validated)
            .map(|(id, name)| StreetEntry::new(id, name))
            .collect();
        tracing::info!(count = streets.len(), "loaded Kraków street list");
        Ok(streets)
    }
}

#[async_trait]
impl AddressCatalogPort for KrakowCatalogPort {
    async fn streets(&self, _query: &str) -> Result<Vec<StreetEntry>, PortError> {
        // The API has no search; matching happens on the full list.
        let streets = self
            .streets
            .get_or_try_init(|| self.load_streets())
            .await?;
        Ok(streets.clone())
    }

    async fn house_numbers(&self, street: &StreetId) -> Result<Vec<HouseNumberEntry>, PortError> {
        if let Some(cached) = self.house_numbers.lock().await.get(street) {
            return Ok(cached.clone());
        }

        let raw: Vec<NamedEntry> = self
            .api
            .post_form(&[("ulica", street.0.as_str())])
            .await?;
        let entries: Vec<HouseNumberEntry> = raw
            .into_iter()
            .filter_map(NamedEntry::validated)
            .map(|(id, label)| HouseNumberEntry::new(id, label))
            .collect();
        tracing::debug!(street = %street, count = entries.len(), "loaded house numbers");

        self.house_numbers
            .lock()
            .await
            .insert(street.clone(), entries.clone());
        Ok(entries)
    }
}

/// Schedule image download for Kraków.
pub struct KrakowImagePort {
    api: KrakowApi,
}

impl KrakowImagePort {
    /// Create a new image port on top of `api`.
    #[must_use]
    pub fn new(api: KrakowApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ScheduleImagePort for KrakowImagePort {
    async fn schedule_image(&self, address: &ResolvedAddress) -> Result<Vec<u8>, PortError> {
        let response: ImageResponse = self
            .api
            .post_form(&[
                ("ulica", address.street.id.0.as_str()),
                ("numer", address.house_number.id.0.as_str()),
            ])
            .await?;

        if response.status.to_string() != "1" {
            tracing::warn!(
                status = %response.status,
                address = %address.display_address,
                "API reported no schedule"
            );
            return Err(PortError::MissingImage);
        }
        let data_url = response.img.ok_or(PortError::MissingImage)?;
        let image = decode_data_url(&data_url)?;
        tracing::debug!(bytes = image.len(), "decoded schedule image");
        Ok(image)
    }
}

/// Build the plugin bundle for the Kraków provider.
#[must_use]
pub fn plugin(client: Client) -> CityPlugin {
    plugin_for(KrakowApi::new(client))
}

/// Build the plugin bundle on top of an explicit API endpoint.
#[must_use]
pub fn plugin_for(api: KrakowApi) -> CityPlugin {
    let catalog_port = Arc::new(KrakowCatalogPort::new(api.clone()));
    let image_port = Arc::new(KrakowImagePort::new(api));

    CityPlugin {
        meta: city_meta(),
        catalog_port,
        image_port,
    }
}

fn city_meta() -> CityMeta {
    CityMeta {
        id: CityId(String::from("krakow")),
        name: String::from("Kraków"),
    }
}

/// Bytes of a PNG data URL; the API sometimes puts a space after the comma.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, PortError> {
    let payload = data_url
        .trim()
        .strip_prefix(DATA_URL_PREFIX)
        .unwrap_or(data_url)
        .trim();
    if payload.is_empty() {
        return Err(PortError::MissingImage);
    }
    BASE64
        .decode(payload)
        .map_err(|err| PortError::Decode(format!("schedule image is not valid base64: {err}")))
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
