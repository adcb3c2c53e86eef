pub mod schema;
pub mod parser;
pub mod llm;
pub mod prompt;

pub use schema::{Extraction, TransactionRecord, FIELD_NAMES};
pub use parser::parse_reply;
pub use llm::ChatClient;

use anyhow::{Context, Result};
use tracing::{info, warn};

pub struct Extractor {
    llm_client: ChatClient,
}

impl Extractor {
    pub fn new(llm_client: ChatClient) -> Self {
        Self { llm_client }
    }

    /// Extract transaction fields from one free-text notification
    pub async fn extract_from_text(&self, text: &str) -> Result<Extraction> {
        let prompt = prompt::build_extraction_prompt(text);

        let reply = self.llm_client
            .complete(&prompt)
            .await
            .context("Failed to extract transaction details")?;

        let record = parse_reply(&reply);

        let missing = record.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Reply is missing expected fields");
        }
        info!(fields = record.len(), "Parsed transaction record");

        Ok(Extraction { reply, record })
    }

    pub fn llm_client(&self) -> &ChatClient {
        &self.llm_client
    }
}
