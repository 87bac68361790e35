use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Jira sends some identifiers as numbers and others as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> Self {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// Parse a timestamp in the formats Jira uses, e.g. `2015-04-11T15:22:00.000+10:00`
/// or `2015-04-11T15:22:00.000+1000`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub board_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
    Future,
    Active,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub state: SprintState,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub complete_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub origin_board_id: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
}

impl Sprint {
    pub fn starts_at(&self) -> Option<DateTime<FixedOffset>> {
        self.start_date.as_deref().and_then(parse_timestamp)
    }

    pub fn ends_at(&self) -> Option<DateTime<FixedOffset>> {
        self.end_date.as_deref().and_then(parse_timestamp)
    }

    pub fn completed_at(&self) -> Option<DateTime<FixedOffset>> {
        self.complete_date.as_deref().and_then(parse_timestamp)
    }

    pub fn is_active(&self) -> bool {
        self.state == SprintState::Active
    }
}

/// An issue whose `fields` object is decoded into a caller-chosen shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue<F = serde_json::Value> {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
    pub fields: F,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
}

/// Commonly requested issue fields. Request them with
/// `IssueQuery::new().fields(BasicIssueFields::FIELD_NAMES)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicIssueFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<NamedValue>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default, rename = "issuetype")]
    pub issue_type: Option<NamedValue>,
    #[serde(default)]
    pub priority: Option<NamedValue>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

impl BasicIssueFields {
    pub const FIELD_NAMES: [&'static str; 7] = [
        "summary",
        "status",
        "assignee",
        "issuetype",
        "priority",
        "created",
        "updated",
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub issue_id: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub time_spent_seconds: i64,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub started: Option<String>,
}

impl Worklog {
    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        self.started.as_deref().and_then(parse_timestamp)
    }
}
