use async_trait::async_trait;
use jira_agile_auth::Credentials;
use jira_agile_config::ClientConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::error::{ApiError, Result};
use crate::models::{Board, Issue, Sprint};
use crate::pagination::{BoardPage, IssuePage, Page, PageParams, SprintPage};
use crate::transport::{HttpTransport, RawResponse, RequestDescriptor, Transport};

pub const API_PREFIX: &str = "rest/agile/1.0/";

/// Characters that would end or corrupt a query value. JQL operators stay readable.
const QUERY_VALUE: &AsciiSet = &CONTROLS.add(b'%').add(b'&').add(b'#').add(b'+');

/// Filter and field selection for [`AgileApi::issue_page`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    pub jql: Option<String>,
    pub fields: Vec<String>,
}

impl IssueQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jql(mut self, jql: impl Into<String>) -> Self {
        self.jql = Some(jql.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Read operations of the Jira Agile API. Each call fetches a single page.
#[async_trait]
pub trait AgileApi: Send + Sync {
    async fn board_page(&self, page: PageParams) -> Result<BoardPage>;

    async fn sprint_page(&self, board_id: &str, page: PageParams) -> Result<SprintPage>;

    async fn issue_page<F>(
        &self,
        sprint_id: &str,
        query: &IssueQuery,
        page: PageParams,
    ) -> Result<IssuePage<F>>
    where
        F: DeserializeOwned + Send;

    async fn list_boards(&self, page: PageParams) -> Result<Vec<Board>> {
        Ok(self.board_page(page).await?.into_items())
    }

    async fn list_sprints_for_board(&self, board_id: &str, page: PageParams) -> Result<Vec<Sprint>> {
        Ok(self.sprint_page(board_id, page).await?.into_items())
    }

    async fn list_issues_for_sprint<F>(
        &self,
        sprint_id: &str,
        query: &IssueQuery,
        page: PageParams,
    ) -> Result<Vec<Issue<F>>>
    where
        F: DeserializeOwned + Send,
    {
        Ok(self
            .issue_page::<F>(sprint_id, query, page)
            .await?
            .into_items())
    }
}

/// Client for `<base>/rest/agile/1.0/`. Holds no per-call state, so one
/// instance can serve concurrent calls.
#[derive(Clone, Debug)]
pub struct AgileClient<T = HttpTransport> {
    base_url: Url,
    credentials: Credentials,
    transport: T,
}

impl AgileClient<HttpTransport> {
    pub fn new(
        base_url: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::from_config(&ClientConfig::new(base_url.as_ref(), username, password))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.user_agent, config.timeout)?;
        Self::with_transport(&config.base_url, config.credentials.clone(), transport)
    }
}

impl<T: Transport> AgileClient<T> {
    pub fn with_transport(
        base_url: impl AsRef<str>,
        credentials: Credentials,
        transport: T,
    ) -> Result<Self> {
        Ok(Self {
            base_url: api_base(base_url.as_ref())?,
            credentials,
            transport,
        })
    }

    /// Absolute endpoint every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build_request(&self, method: Method, path: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor {
            method,
            path: path.into(),
            authorization: self.credentials.basic_auth_header(),
            timeout: None,
        }
    }

    pub async fn execute(&self, request: &RequestDescriptor) -> RawResponse {
        self.transport.execute(&self.base_url, request).await
    }

    async fn get_page<I: DeserializeOwned>(&self, path: String, page: PageParams) -> Result<Page<I>> {
        let mut request = self.build_request(Method::GET, path);
        request.timeout = page.timeout;

        let response = self.execute(&request).await;
        let data: Page<I> = assert_and_decode(response, StatusCode::OK)?;

        debug!(path = %request.path, items = data.len(), "Decoded page");
        Ok(data)
    }
}

#[async_trait]
impl<T: Transport> AgileApi for AgileClient<T> {
    async fn board_page(&self, page: PageParams) -> Result<BoardPage> {
        self.get_page(boards_path(&page), page)
            .await
            .inspect_err(|e| error!(error = %e, "Could not load boards"))
    }

    async fn sprint_page(&self, board_id: &str, page: PageParams) -> Result<SprintPage> {
        let result = match sprints_path(board_id, &page) {
            Ok(path) => self.get_page(path, page).await,
            Err(e) => Err(e),
        };
        result.inspect_err(|e| error!(board_id, error = %e, "Could not load sprints"))
    }

    async fn issue_page<F>(
        &self,
        sprint_id: &str,
        query: &IssueQuery,
        page: PageParams,
    ) -> Result<IssuePage<F>>
    where
        F: DeserializeOwned + Send,
    {
        let result = match issues_path(sprint_id, query, &page) {
            Ok(path) => self.get_page(path, page).await,
            Err(e) => Err(e),
        };
        result.inspect_err(|e| error!(sprint_id, error = %e, "Could not load issues"))
    }
}

/// Resolve the API prefix against `base_url`, failing on anything that is not
/// an absolute URL able to carry paths.
pub fn api_base(base_url: &str) -> Result<Url> {
    let invalid = |message: String| ApiError::InvalidConfiguration { message };

    let base = Url::parse(base_url.trim())
        .map_err(|e| invalid(format!("Invalid base URL {base_url:?}: {e}")))?;

    if base.cannot_be_a_base() {
        return Err(invalid(format!(
            "Base URL {base_url:?} cannot carry a path"
        )));
    }

    base.join(API_PREFIX)
        .map_err(|e| invalid(format!("Invalid base URL {base_url:?}: {e}")))
}

/// Check the transport outcome and status, then decode the body as JSON.
pub fn assert_and_decode<T: DeserializeOwned>(response: RawResponse, expected: StatusCode) -> Result<T> {
    if let Some(source) = response.transport_error {
        return Err(ApiError::Transport { source });
    }

    if response.status != expected.as_u16() {
        return Err(ApiError::UnexpectedStatus {
            status: response.status,
            status_text: response.status_text,
            body: response.body,
        });
    }

    serde_json::from_str(&response.body).map_err(ApiError::decode)
}

pub(crate) fn boards_path(page: &PageParams) -> String {
    format!("board?{}", page.query())
}

pub(crate) fn sprints_path(board_id: &str, page: &PageParams) -> Result<String> {
    let board_id = require_id("board", board_id)?;
    Ok(format!(
        "board/{}/sprint?{}",
        urlencoding::encode(board_id),
        page.query()
    ))
}

pub(crate) fn issues_path(sprint_id: &str, query: &IssueQuery, page: &PageParams) -> Result<String> {
    let sprint_id = require_id("sprint", sprint_id)?;
    let mut path = format!(
        "sprint/{}/issue?{}",
        urlencoding::encode(sprint_id),
        page.query()
    );

    if let Some(jql) = query.jql.as_deref().filter(|jql| !jql.is_empty()) {
        path.push_str("&jql=");
        path.push_str(&escape_query_value(jql));
    }

    if !query.fields.is_empty() {
        let fields: Vec<String> = query
            .fields
            .iter()
            .map(|field| escape_query_value(field))
            .collect();
        path.push_str("&fields=");
        path.push_str(&fields.join(","));
    }

    Ok(path)
}

fn require_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::invalid_argument(format!(
            "{kind} id must not be empty"
        )));
    }
    // Dot segments would be resolved away by the URL join.
    if id == "." || id == ".." {
        return Err(ApiError::invalid_argument(format!(
            "{kind} id {id:?} is not a valid path segment"
        )));
    }
    Ok(id)
}

fn escape_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
