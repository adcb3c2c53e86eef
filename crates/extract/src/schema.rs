use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names the extraction prompt asks for, in prompt order.
pub const FIELD_NAMES: [&str; 21] = [
    "txn_id",
    "description",
    "clean_description",
    "merchant_name",
    "merchant_type",
    "payment_channel",
    "amount",
    "type",
    "date",
    "weekday",
    "time_of_day",
    "balance_after_txn",
    "category",
    "subcategory",
    "transaction_mode",
    "is_recurring",
    "recurrence_interval",
    "confidence_score",
    "is_high_value",
    "is_suspicious",
    "embedding_version",
];

/// One parsed transaction: field name -> value, in the order the model
/// returned them. Values are never coerced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord {
    fields: Map<String, Value>,
}

impl TransactionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated key keeps its original position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), Value::String(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Expected fields the model left out.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        FIELD_NAMES
            .iter()
            .copied()
            .filter(|name| !self.fields.contains_key(*name))
            .collect()
    }
}

/// Output of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Trimmed reply text as returned by the model
    pub reply: String,
    pub record: TransactionRecord,
}
