use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::record::Record;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

/// Supplies the records of a session
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Record>>;
}

/// Fetches users from an HTTP endpoint shaped like
/// `{ "users": [ { "id", "firstName", "lastName", "birthDate", "address": { "city" } } ] }`.
pub struct HttpRecordSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRecordSource {
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            url: config.source_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        debug!("Fetching records from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        let payload: UsersPayload = serde_json::from_slice(&body)?;
        let records: Vec<Record> = payload.users.into_iter().map(Record::from).collect();

        info!("Fetched {} records from {}", records.len(), self.url);
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct UsersPayload {
    #[serde(default)]
    users: Vec<UserPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPayload {
    id: u64,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    birth_date: String,
    #[serde(default)]
    address: AddressPayload,
}

#[derive(Debug, Default, Deserialize)]
struct AddressPayload {
    #[serde(default)]
    city: String,
}

impl From<UserPayload> for Record {
    fn from(user: UserPayload) -> Self {
        Record {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            birth_date: user.birth_date,
            group_key: user.address.city,
        }
    }
}

/// In-memory source, handy for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticRecordSource {
    records: Vec<Record>,
}

impl StaticRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticRecordSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }
}
