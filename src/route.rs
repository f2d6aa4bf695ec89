use std::collections::HashMap;

pub const ID_PARAM: &str = "id";
/// Route value meaning "create a new record" rather than "load one".
pub const ADD_SENTINEL: &str = "add";

/// One emission of the route's parameter stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap(HashMap<String, String>);

impl ParamMap {
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut params = Self::default();
        params.insert(ID_PARAM, id);
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get(ID_PARAM)
    }

}

/// Where a navigation URL leads, relative to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// The collection listing. Going there leaves the editor.
    Collection,
    /// A single record, fed back to the editor as a route emission.
    Detail(ParamMap),
}

impl RouteTarget {
    /// Matches `url` against `{collection}` and `{collection}/{id}`.
    pub fn from_url(url: &str, collection: &str) -> Option<Self> {
        let rest = url.trim_matches('/').strip_prefix(collection)?;
        if rest.is_empty() {
            return Some(Self::Collection);
        }
        let id = rest.strip_prefix('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Self::Detail(ParamMap::with_id(id)))
    }
}

pub fn is_add_sentinel(id: &str) -> bool {
    id.eq_ignore_ascii_case(ADD_SENTINEL)
}
