// Collection filters
//
// `GET /{collection}.json` takes arbitrary equality filters as query
// parameters (`player_id=...`, `site=...`) plus `page` / `per_page` paging.

use crate::model::EntityId;

/// Query-string filters for a collection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter. A repeated key replaces the earlier value.
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn player_id(self, id: &EntityId) -> Self {
        self.filter("player_id", id)
    }

    pub fn site_id(self, id: &EntityId) -> Self {
        self.filter("site_id", id)
    }

    /// 1-based page number.
    pub fn page(self, page: u32) -> Self {
        self.filter("page", page)
    }

    pub fn per_page(self, per_page: u32) -> Self {
        self.filter("per_page", per_page)
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
