//! Client for the Jira Agile REST API (`rest/agile/1.0`): boards, sprints and
//! the issues inside a sprint.
//!
//! ```no_run
//! use jira_agile_api::{AgileApi, AgileClient, IssueQuery, PageParams};
//!
//! # async fn run() -> jira_agile_api::Result<()> {
//! let client = AgileClient::new("https://example.atlassian.net", "user", "token")?;
//!
//! for board in client.list_boards(PageParams::default()).await? {
//!     let sprints = client
//!         .list_sprints_for_board(&board.id, PageParams::default())
//!         .await?;
//!     for sprint in sprints.iter().filter(|s| s.is_active()) {
//!         let query = IssueQuery::new().jql("status = Open").fields(["summary"]);
//!         let issues = client
//!             .list_issues_for_sprint::<serde_json::Value>(&sprint.id, &query, PageParams::default())
//!             .await?;
//!         println!("{}: {} open issues", sprint.name, issues.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod jql;
pub mod models;
pub mod pagination;
pub mod transport;

pub use client::{api_base, assert_and_decode, AgileApi, AgileClient, IssueQuery, API_PREFIX};
pub use error::{ApiError, Result};
pub use jira_agile_auth::Credentials;
pub use jira_agile_config::ClientConfig;
pub use jql::{JqlBuilder, SortOrder};
pub use models::{BasicIssueFields, Board, Issue, NamedValue, Sprint, SprintState, User, Worklog};
pub use pagination::{BoardPage, IssuePage, Page, PageParams, SprintPage, WorklogPage};
pub use transport::{HttpTransport, RawResponse, RequestDescriptor, Transport};
