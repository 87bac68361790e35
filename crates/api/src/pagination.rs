use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Board, Issue, Sprint, Worklog};

pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Which page to request. Each call fetches exactly one page; advancing is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub start_at: u32,
    pub max_results: u32,
    /// Per-call deadline handed to the HTTP layer as is.
    pub timeout: Option<Duration>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            start_at: 0,
            max_results: DEFAULT_MAX_RESULTS,
            timeout: None,
        }
    }
}

impl PageParams {
    pub fn new(start_at: u32, max_results: u32) -> Self {
        Self {
            start_at,
            max_results,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn query(&self) -> String {
        format!("startAt={}&maxResults={}", self.start_at, self.max_results)
    }
}

/// One page of a list result. The item list may be missing or null on the wire,
/// in which case the page holds no items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(rename = "startAt", default)]
    pub start_at: Option<u32>,
    #[serde(rename = "maxResults", default)]
    pub max_results: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(rename = "isLast", default)]
    pub is_last: Option<bool>,
    #[serde(
        default,
        alias = "boards",
        alias = "sprints",
        alias = "issues",
        alias = "worklogs"
    )]
    values: Option<Vec<T>>,
}

pub type BoardPage = Page<Board>;
pub type SprintPage = Page<Sprint>;
pub type IssuePage<F> = Page<Issue<F>>;
pub type WorklogPage = Page<Worklog>;

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            start_at: None,
            max_results: None,
            total: None,
            is_last: None,
            values: None,
        }
    }
}

impl<T> Page<T> {
    pub fn items(&self) -> &[T] {
        self.values.as_deref().unwrap_or(&[])
    }

    pub fn into_items(self) -> Vec<T> {
        self.values.unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_next(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        if let Some(is_last) = self.is_last {
            return !is_last;
        }

        if let (Some(start), Some(total)) = (self.start_at, self.total) {
            return start.saturating_add(self.len() as u32) < total;
        }

        false
    }

    /// Parameters for the following page, or `None` once this page is the last one.
    /// The per-call timeout of `current` is carried over.
    pub fn next_params(&self, current: PageParams) -> Option<PageParams> {
        if !self.has_next() {
            return None;
        }

        let start = self.start_at.unwrap_or(current.start_at);
        Some(PageParams {
            start_at: start.saturating_add(self.len() as u32),
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = PageParams::default();
        assert_eq!(params.query(), "startAt=0&maxResults=50");
        assert!(params.timeout.is_none());
    }

    #[test]
    fn test_query_encodes_given_values() {
        for (start, max) in [(0, 0), (0, 1), (17, 50), (1000, 250), (u32::MAX, u32::MAX)] {
            let query = PageParams::new(start, max).query();
            assert_eq!(query, format!("startAt={start}&maxResults={max}"));
        }
    }

    #[test]
    fn test_missing_list_is_empty() {
        let page: BoardPage = serde_json::from_str(r#"{"isLast":true,"total":0}"#).unwrap();
        assert!(page.items().is_empty());
        assert!(page.into_items().is_empty());
    }

    #[test]
    fn test_null_list_is_empty() {
        let page: SprintPage = serde_json::from_str(r#"{"sprints":null,"startAt":0}"#).unwrap();
        assert_eq!(page.len(), 0);
        assert!(page.is_last());
    }

    #[test]
    fn test_list_field_names() {
        let boards: BoardPage =
            serde_json::from_str(r#"{"values":[{"id":1,"name":"A","type":"scrum"}]}"#).unwrap();
        assert_eq!(boards.len(), 1);

        let boards: BoardPage =
            serde_json::from_str(r#"{"boards":[{"id":"2","name":"B","type":"kanban"}]}"#).unwrap();
        assert_eq!(boards.items()[0].id, "2");

        let worklogs: WorklogPage = serde_json::from_str(
            r#"{"startAt":0,"maxResults":1,"total":1,"worklogs":[
                {"id":"1","issueId":"10","timeSpentSeconds":60}
            ]}"#,
        )
        .unwrap();
        assert_eq!(worklogs.items()[0].time_spent_seconds, 60);
        assert!(!worklogs.has_next());
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Card {
        id: u32,
    }

    #[test]
    fn test_items_need_no_default() {
        let page: Page<Card> =
            serde_json::from_str(r#"{"values":[{"id":7}],"isLast":true}"#).unwrap();
        assert_eq!(page.into_items(), vec![Card { id: 7 }]);

        let page: BoardPage = serde_json::from_str(r#"{"isLast":true}"#).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_has_next_from_is_last() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"values":[1,2],"isLast":false,"startAt":0}"#).unwrap();
        assert!(page.has_next());

        let page: Page<u32> =
            serde_json::from_str(r#"{"values":[1,2],"isLast":true,"startAt":0}"#).unwrap();
        assert!(!page.has_next());
    }

    #[test]
    fn test_has_next_from_total() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"values":[1,2],"startAt":0,"total":5}"#).unwrap();
        assert!(page.has_next());

        let page: Page<u32> =
            serde_json::from_str(r#"{"values":[4,5],"startAt":3,"total":5}"#).unwrap();
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_page_is_last_even_if_flag_says_otherwise() {
        let page: Page<u32> = serde_json::from_str(r#"{"values":[],"isLast":false}"#).unwrap();
        assert!(page.is_last());
        assert!(page.next_params(PageParams::default()).is_none());
    }

    #[test]
    fn test_next_params_advances_by_items_received() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"values":[1,2,3],"startAt":10,"isLast":false}"#).unwrap();
        let current = PageParams::new(10, 50).with_timeout(Duration::from_secs(3));
        let next = page.next_params(current).unwrap();
        assert_eq!(next.start_at, 13);
        assert_eq!(next.max_results, 50);
        assert_eq!(next.timeout, Some(Duration::from_secs(3)));
    }
}
