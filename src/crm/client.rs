// ABOUTME: CRM REST client - OData listings, note/task/contact mutations, linked reads.
// ABOUTME: Mutations hand back the raw response; callers judge success themselves.

use reqwest::Response;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

use super::fetcher::{ODataPages, PaginatedFetcher};
use super::{
    ACTIVITY_COLUMNS, DATATABLE_PAGE_LENGTH, DataTableRequest, LINKED_PROPERTY_COLUMNS,
    NoteRequest, ODataPage, ODataQuery, Record, RecordBatch, TaskRequest,
};
use crate::config::CrmConfig;
use crate::error::CrmError;

/// Header carrying the CRM database the session has selected.
pub const SELECTED_DB_HEADER: &str = "x-selected-db";

pub const CONTACTS_ENTITY: &str = "Contacts";
pub const PROPERTIES_ENTITY: &str = "Properties";

/// Client for the CRM REST API.
///
/// Authentication headers are attached to every request from the config.
#[derive(Debug, Clone)]
pub struct CrmClient {
    api_base: String,
    http: reqwest::Client,
}

impl CrmClient {
    pub fn new(config: &CrmConfig) -> Result<Self, CrmError> {
        let mut builder = reqwest::Client::builder()
            .default_headers(default_headers(config)?)
            .user_agent(format!("realnex-rs/{}", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        reqwest::Url::parse(&config.api_base)
            .map_err(|e| CrmError::Config(format!("invalid api base '{}': {}", config.api_base, e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    /// Build from `REALNEX_*` environment variables.
    pub fn from_env() -> Result<Self, crate::Error> {
        let config = CrmConfig::from_env()?;
        Ok(Self::new(&config)?)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Fetch one page of an OData entity set.
    #[instrument(level = "debug", skip(self, query))]
    pub async fn odata_page(
        &self,
        entity: &str,
        query: &ODataQuery,
        skip: u64,
    ) -> Result<RecordBatch, CrmError> {
        let url = self.url(&format!("/api/v1/CrmOData/{}", urlencoding::encode(entity)));
        let response = self.http.get(url).query(&query.params(skip)).send().await?;
        let page: ODataPage = parse_json(response).await?;
        debug!(rows = page.value.len(), "page fetched");
        Ok(page.value)
    }

    /// Fetch every contact record.
    pub async fn fetch_contacts(&self) -> Result<Option<Vec<Record>>, CrmError> {
        PaginatedFetcher::default()
            .fetch_all(&ODataPages::new(self, CONTACTS_ENTITY))
            .await
    }

    /// Fetch every property record.
    pub async fn fetch_properties(&self) -> Result<Option<Vec<Record>>, CrmError> {
        PaginatedFetcher::default()
            .fetch_all(&ODataPages::new(self, PROPERTIES_ENTITY))
            .await
    }

    /// Post a history note on a contact.
    #[instrument(level = "debug", skip(self, subject, notes))]
    pub async fn add_note(
        &self,
        contact_key: &str,
        date: &str,
        subject: &str,
        notes: &str,
    ) -> Result<Response, CrmError> {
        let url = self.url(&format!(
            "/api/v1/Crm/object/{}/history",
            urlencoding::encode(contact_key)
        ));
        let body = NoteRequest::new(date, subject, notes);
        Ok(self.http.post(url).json(&body).send().await?)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_contact(&self, contact_key: &str) -> Result<Response, CrmError> {
        let url = self.url(&format!(
            "/api/v1/Crm/contact/{}",
            urlencoding::encode(contact_key)
        ));
        Ok(self.http.delete(url).send().await?)
    }

    /// Post a task event on a contact.
    #[instrument(level = "debug", skip(self, task))]
    pub async fn add_task(&self, contact_key: &str, task: &TaskRequest) -> Result<Response, CrmError> {
        let url = self.url(&format!(
            "/api/v1/Crm/object/{}/event",
            urlencoding::encode(contact_key)
        ));
        Ok(self.http.post(url).json(task).send().await?)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_task(&self, task_key: &str) -> Result<Response, CrmError> {
        let url = self.url(&format!("/api/v1/Crm/event/{}", urlencoding::encode(task_key)));
        Ok(self.http.delete(url).send().await?)
    }

    /// List properties linked to a contact.
    #[instrument(level = "debug", skip(self))]
    pub async fn linked_properties(&self, contact_key: &str) -> Result<serde_json::Value, CrmError> {
        let path = format!(
            "/api/v1/Crm/object/{}/properties/datatable",
            urlencoding::encode(contact_key)
        );
        self.datatable(&path, &DataTableRequest::new(LINKED_PROPERTY_COLUMNS, DATATABLE_PAGE_LENGTH))
            .await
    }

    /// List activities (history and events) recorded on a contact.
    #[instrument(level = "debug", skip(self))]
    pub async fn activities(&self, contact_key: &str) -> Result<serde_json::Value, CrmError> {
        let path = format!(
            "/api/v1/Crm/object/{}/events/datatable",
            urlencoding::encode(contact_key)
        );
        self.datatable(&path, &DataTableRequest::new(ACTIVITY_COLUMNS, DATATABLE_PAGE_LENGTH))
            .await
    }

    /// POST a DataTable request to `path` and return the parsed body.
    pub async fn datatable(
        &self,
        path: &str,
        request: &DataTableRequest,
    ) -> Result<serde_json::Value, CrmError> {
        let response = self.http.post(self.url(path)).json(request).send().await?;
        parse_json(response).await
    }

    /// Read selected fields of one property record.
    #[instrument(level = "debug", skip(self, fields))]
    pub async fn property_fields(
        &self,
        property_key: &str,
        fields: &[&str],
    ) -> Result<serde_json::Value, CrmError> {
        let query = ODataQuery::new()
            .filter(format!("Key eq '{}'", property_key.replace('\'', "''")))
            .select(fields.iter().copied());

        let mut params = query.params(0);
        params.retain(|(name, _)| *name != "$skip");

        let url = self.url(&format!("/api/v1/CrmOData/{}", PROPERTIES_ENTITY));
        let response = self.http.get(url).query(&params).send().await?;
        parse_json(response).await
    }
}

fn default_headers(config: &CrmConfig) -> Result<HeaderMap, CrmError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut auth = header_value("authorization", &format!("Bearer {}", config.token))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    if let Some(cookie) = &config.cookie {
        let mut value = header_value("cookie", cookie)?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }
    if let Some(db) = &config.selected_db {
        headers.insert(
            HeaderName::from_static(SELECTED_DB_HEADER),
            header_value(SELECTED_DB_HEADER, db)?,
        );
    }
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, CrmError> {
    HeaderValue::from_str(value)
        .map_err(|e| CrmError::Config(format!("invalid {} header: {}", name, e)))
}

async fn parse_json<T>(response: Response) -> Result<T, CrmError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(CrmError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
