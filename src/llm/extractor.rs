use crate::error::{BillingError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::SYSTEM_PROMPT_EXTRACTION;
use crate::llm::types::{Content, DocumentPayload};
use crate::schema::ExtractedContract;
use log::info;

/// Extracts contract fields from uploaded SOW documents.
///
/// Best-effort by design: any field the model cannot find stays `None` and
/// defaults apply downstream via [`ExtractedContract::into_contract`]. A
/// failed or malformed response is surfaced as
/// [`BillingError::ExtractionFailed`] without touching caller state, so
/// manual entry remains available.
pub struct ContractExtractor {
    client: GeminiClient,
    model: String,
    system_prompt: String,
}

impl ContractExtractor {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: SYSTEM_PROMPT_EXTRACTION.to_string(),
        }
    }

    /// Swap in a custom prompt (e.g., for vendor-specific SOW templates).
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub async fn extract(&self, documents: &[DocumentPayload]) -> Result<ExtractedContract> {
        let mut manifest = String::from(
            "Extract the contract fields from the attached documents.\n\
             Attached files, in order:\n",
        );
        for (i, doc) in documents.iter().enumerate() {
            manifest.push_str(&format!("{}. \"{}\"\n", i + 1, doc.display_name));
        }

        info!(
            "extracting contract fields from {} document(s)",
            documents.len()
        );

        let schema = ExtractedContract::response_schema()?;
        let raw_json = self
            .client
            .generate_json(
                &self.model,
                &self.system_prompt,
                vec![Content::user_with_documents(manifest, documents)],
                Some(schema),
            )
            .await?;

        serde_json::from_str(&raw_json).map_err(|e| {
            BillingError::ExtractionFailed(format!("response did not match schema: {}", e))
        })
    }
}
