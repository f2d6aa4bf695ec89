use serde::{Deserialize, Serialize};

/// One entry of the read-only gender lookup list.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Gender {
    pub id: String,
    pub description: String,
}

impl Gender {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}
