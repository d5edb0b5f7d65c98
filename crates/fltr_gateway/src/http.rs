use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::{
    FieldOption, Gateway, GatewayError, GatewayResult, QueryRequest,
    SearchResult,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to a remote record service over JSON.
///
/// The service exposes one POST endpoint per operation: `fields`,
/// `picklist` and `query`, relative to the base url.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldsParams<'a> {
    object_api_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields_names: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PicklistParams<'a> {
    field_api_name: &'a str,
    object_api_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryParams<'a> {
    fields_names: &'a [String],
    lookup_search_string: String,
    object_api_name: &'a str,
    row_limit: usize,
}

/// Error body the service sends with a non-success status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(Self {
            base_url: with_trailing_slash(base_url),
            client,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> GatewayResult<Url> {
        self.base_url
            .join(name)
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    async fn post<B, T>(&self, name: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(name)?;
        tracing::debug!(%url, "calling record service");

        let response = self.client.post(url).json(body).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn check_status(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, "record service returned an error");
    Err(service_error(&body))
}

fn service_error(body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty());
    GatewayError::Service { message }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    #[tracing::instrument(skip(self))]
    async fn fetch_filterable_fields(
        &self,
        object_type: &str,
        field_names: Option<&[String]>,
    ) -> GatewayResult<Vec<FieldOption>> {
        let params = FieldsParams {
            object_api_name: object_type,
            fields_names: field_names.filter(|names| !names.is_empty()),
        };
        self.post("fields", &params).await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_picklist_values(
        &self,
        object_type: &str,
        field_api_name: &str,
    ) -> GatewayResult<Vec<String>> {
        let params = PicklistParams {
            field_api_name,
            object_api_name: object_type,
        };
        self.post("picklist", &params).await
    }

    #[tracing::instrument(skip(self, request))]
    async fn execute_query(
        &self,
        object_type: &str,
        fields_to_return: &[String],
        request: &QueryRequest,
        row_limit: usize,
    ) -> GatewayResult<SearchResult> {
        let params = QueryParams {
            fields_names: fields_to_return,
            lookup_search_string: serde_json::to_string(request)?,
            object_api_name: object_type,
            row_limit,
        };
        self.post("query", &params).await
    }
}
