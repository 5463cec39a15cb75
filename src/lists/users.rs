use serde_json::Value;

use super::pagination::{PageRange, Pager};
use crate::models::UserProfile;
use crate::stats::as_rows;

pub const USERS_PER_PAGE: usize = 8;

/// Searchable, paginated user list with at most one expanded row.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<UserProfile>,
    query: String,
    pager: Pager,
    expanded: Option<usize>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl UserDirectory {
    pub fn new(users: Vec<UserProfile>) -> Self {
        Self {
            users,
            query: String::new(),
            pager: Pager::new(USERS_PER_PAGE),
            expanded: None,
        }
    }

    /// Build from the raw `GET /users/list` payload.
    pub fn from_payload(payload: &Value) -> Self {
        let users = as_rows(payload)
            .iter()
            .enumerate()
            .map(|(id, row)| UserProfile::from_value(id, row))
            .collect();
        Self::new(users)
    }

    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the search text; always returns to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pager.reset();
    }

    /// Case-insensitive substring match on name or email.
    pub fn filtered(&self) -> Vec<&UserProfile> {
        let needle = self.query.to_lowercase();
        self.users
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn visible(&self) -> Vec<&UserProfile> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn range(&self) -> PageRange {
        self.pager.range(self.filtered().len())
    }

    pub fn next_page(&mut self) {
        let len = self.filtered().len();
        self.pager.next(len);
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }

    pub fn go_to_page(&mut self, page: usize) {
        let len = self.filtered().len();
        self.pager.go_to(page, len);
    }

    /// Expand `id`, collapsing whatever was open; toggling the open row closes it.
    pub fn toggle_expanded(&mut self, id: usize) {
        self.expanded = if self.expanded == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn expanded(&self) -> Option<&UserProfile> {
        self.expanded
            .and_then(|id| self.users.iter().find(|u| u.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directory(n: usize) -> UserDirectory {
        let rows: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "name": format!("User{i}"),
                    "email": format!("user{i}@Example.com"),
                })
            })
            .collect();
        UserDirectory::from_payload(&Value::Array(rows))
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_email() {
        let mut dir = UserDirectory::from_payload(&json!([
            { "name": "Kim Minsu", "email": "minsu@corp.kr" },
            { "name": "Lee", "email": "LEE.HANA@mail.com" },
            { "name": "Park", "email": "park@corp.kr" }
        ]));
        dir.set_query("KIM");
        assert_eq!(dir.filtered().len(), 1);
        dir.set_query("hana");
        assert_eq!(dir.filtered()[0].name, "Lee");
        dir.set_query("corp");
        assert_eq!(dir.filtered().len(), 2);
        dir.set_query("");
        assert_eq!(dir.filtered().len(), 3);
    }

    #[test]
    fn pages_of_eight_and_query_resets_page() {
        let mut dir = directory(19);
        assert_eq!(dir.total_pages(), 3);
        dir.next_page();
        dir.next_page();
        dir.next_page();
        assert_eq!(dir.page(), 3);
        assert_eq!(dir.visible().len(), 3);
        assert_eq!(dir.range().first, 17);

        dir.set_query("user1");
        assert_eq!(dir.page(), 1);
        // user1, user10..user18
        assert_eq!(dir.filtered().len(), 10);
        assert_eq!(dir.visible().len(), 8);
    }

    #[test]
    fn single_expanded_row() {
        let mut dir = directory(3);
        dir.toggle_expanded(0);
        assert_eq!(dir.expanded().map(|u| u.id), Some(0));
        dir.toggle_expanded(2);
        assert_eq!(dir.expanded().map(|u| u.id), Some(2));
        dir.toggle_expanded(2);
        assert!(dir.expanded().is_none());
    }

    #[test]
    fn malformed_payload_is_empty() {
        let dir = UserDirectory::from_payload(&json!({ "users": [] }));
        assert!(dir.users().is_empty());
        assert_eq!(dir.total_pages(), 0);
        assert!(dir.visible().is_empty());
    }
}
