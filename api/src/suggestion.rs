use serde::Deserialize;
use serde::Serialize;

/// One origin-code suggestion returned by the memo search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Identifier written to the linked field on commit.
    pub id: i64,
    /// Code written to the visible field on commit.
    pub code: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Suggestion {
    pub fn new(id: i64, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            display_name: None,
        }
    }

    /// Text shown in the dropdown.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.code)
    }
}
