use serde::Serialize;
use serde_json::{Map, Value};

/// A structured operator message: a short `msg` plus whatever context the
/// decision point has at hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMessage {
    pub msg: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogMessage {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Discord renders this as a highlighted JSON block.
    pub fn to_code_block(&self) -> serde_json::Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(format!("```json\n{json}```"))
    }
}
