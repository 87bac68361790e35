/// Builds a JQL filter for [`IssueQuery::jql`](crate::IssueQuery::jql).
#[derive(Debug, Clone, Default)]
pub struct JqlBuilder {
    conditions: Vec<String>,
    order_by: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl JqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field = "value"`
    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.conditions
            .push(format!("{} = {}", field, Self::value(field, value)));
        self
    }

    /// `field != "value"`
    pub fn not_eq(mut self, field: &str, value: &str) -> Self {
        self.conditions
            .push(format!("{} != {}", field, Self::value(field, value)));
        self
    }

    /// `field IN ("a", "b")`; an empty list adds nothing.
    pub fn in_list<S: AsRef<str>>(mut self, field: &str, values: &[S]) -> Self {
        if values.is_empty() {
            return self;
        }

        let quoted: Vec<String> = values.iter().map(|v| Self::quote(v.as_ref())).collect();
        self.conditions
            .push(format!("{} IN ({})", field, quoted.join(", ")));
        self
    }

    /// `field ~ "text"`
    pub fn contains(mut self, field: &str, text: &str) -> Self {
        self.conditions
            .push(format!("{} ~ {}", field, Self::quote(text)));
        self
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        let direction = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        self.order_by.push(format!("{} {}", field, direction));
        self
    }

    /// Joins conditions with `AND`. An empty builder yields an empty string,
    /// which the issue query treats as no filter.
    pub fn finish(self) -> String {
        let mut jql = self.conditions.join(" AND ");
        if !self.order_by.is_empty() {
            if !jql.is_empty() {
                jql.push(' ');
            }
            jql.push_str("ORDER BY ");
            jql.push_str(&self.order_by.join(", "));
        }
        jql
    }

    fn quote(value: &str) -> String {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    }

    fn value(field: &str, value: &str) -> String {
        match (field, value) {
            ("assignee" | "reporter" | "creator", "@me") => "currentUser()".to_string(),
            (_, "EMPTY" | "empty") => "EMPTY".to_string(),
            _ => Self::quote(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder() {
        assert_eq!(JqlBuilder::new().finish(), "");
    }

    #[test]
    fn test_eq_quotes_value() {
        let jql = JqlBuilder::new().eq("status", "In Progress").finish();
        assert_eq!(jql, "status = \"In Progress\"");
    }

    #[test]
    fn test_current_user_shorthand() {
        let jql = JqlBuilder::new().eq("assignee", "@me").finish();
        assert_eq!(jql, "assignee = currentUser()");
    }

    #[test]
    fn test_not_eq_empty() {
        let jql = JqlBuilder::new().not_eq("assignee", "EMPTY").finish();
        assert_eq!(jql, "assignee != EMPTY");
    }

    #[test]
    fn test_in_list() {
        let jql = JqlBuilder::new()
            .in_list("status", &["Open", "Reopened"])
            .finish();
        assert_eq!(jql, "status IN (\"Open\", \"Reopened\")");

        let jql = JqlBuilder::new().in_list::<&str>("status", &[]).finish();
        assert_eq!(jql, "");
    }

    #[test]
    fn test_escaping() {
        let jql = JqlBuilder::new()
            .contains("summary", "say \"hi\" C:\\tmp")
            .finish();
        assert_eq!(jql, "summary ~ \"say \\\"hi\\\" C:\\\\tmp\"");
    }

    #[test]
    fn test_conditions_and_order() {
        let jql = JqlBuilder::new()
            .eq("issuetype", "Bug")
            .in_list("priority", &["High", "Highest"])
            .order_by("rank", SortOrder::Asc)
            .order_by("created", SortOrder::Desc)
            .finish();
        assert_eq!(
            jql,
            "issuetype = \"Bug\" AND priority IN (\"High\", \"Highest\") ORDER BY rank ASC, created DESC"
        );
    }

    #[test]
    fn test_order_only() {
        let jql = JqlBuilder::new().order_by("rank", SortOrder::Asc).finish();
        assert_eq!(jql, "ORDER BY rank ASC");
    }
}
