//! Completion requests

use crate::error::GenerationError;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model capability tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelTier {
    /// Small, fast model
    #[default]
    Simple,
    /// Large general model
    Advanced,
    /// Small reasoning model
    ReasoningSimple,
    /// Large reasoning model
    ReasoningAdvanced,
}

impl ModelTier {
    /// Model name sent to the completion endpoint
    #[inline]
    #[must_use]
    pub const fn model_name(self) -> &'static str {
        match self {
            Self::Simple => "gpt-4o-mini",
            Self::Advanced => "gpt-4o",
            Self::ReasoningSimple => "o3-mini",
            Self::ReasoningAdvanced => "o1",
        }
    }
}

/// Plain text completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Instruction sent as the system message
    pub system_instruction: String,
    /// Content sent as the user message
    pub user_text: String,
    /// Model tier
    pub tier: ModelTier,
}

impl CompletionRequest {
    /// Create request on the simple tier
    #[inline]
    #[must_use]
    pub fn new(system_instruction: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_text: user_text.into(),
            tier: ModelTier::Simple,
        }
    }

    /// With model tier
    #[inline]
    #[must_use]
    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    /// Constrain the output to a schema
    #[inline]
    #[must_use]
    pub fn structured(self, schema: OutputSchema) -> StructuredRequest {
        StructuredRequest {
            completion: self,
            schema,
        }
    }
}

/// Named JSON schema the output must follow
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Schema name
    pub name: String,
    /// What the output represents
    pub description: String,
    /// JSON schema document
    pub schema: Value,
}

impl OutputSchema {
    /// Derive a strict schema from a Rust type
    ///
    /// Subschemas are inlined; the `$schema` and `title` keys are dropped since
    /// strict structured output rejects them. Mark the type
    /// `#[serde(deny_unknown_fields)]` to forbid extra properties.
    ///
    /// # Errors
    /// - `GenerationError::InvalidRequest` if the schema cannot be encoded
    pub fn for_type<T: JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let settings = SchemaSettings::draft07().with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        });
        let root = settings.into_generator().into_root_schema_for::<T>();

        let mut schema = serde_json::to_value(root)
            .map_err(|e| GenerationError::InvalidRequest(format!("schema encoding: {e}")))?;
        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
            map.remove("title");
        }

        Ok(Self {
            name: name.into(),
            description: description.into(),
            schema,
        })
    }
}

/// Completion request constrained to a schema
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRequest {
    /// Instruction, content and tier
    pub completion: CompletionRequest,
    /// Output schema
    pub schema: OutputSchema,
}
