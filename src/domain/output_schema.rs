use serde_json::Value;

use super::ValidationError;

/// JSON schema the model is asked to answer in.
///
/// A schema object carrying both `output_schema` and `rephrased_question` supplies the
/// question itself; the caller's question is then ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema(Value);

impl OutputSchema {
    pub fn new(schema: Value) -> Result<Self, ValidationError> {
        if !schema.is_object() {
            return Err(ValidationError::InvalidOutputSchema);
        }
        Ok(Self(schema))
    }

    /// The schema the answer must follow.
    pub fn schema(&self) -> &Value {
        match (self.0.get("output_schema"), self.rephrased_question()) {
            (Some(schema), Some(_)) => schema,
            _ => &self.0,
        }
    }

    fn rephrased_question(&self) -> Option<&str> {
        self.0.get("output_schema")?;
        self.0.get("rephrased_question").and_then(Value::as_str)
    }

    /// The question to ask: the rephrased one when present, else `question`.
    pub fn question<'a>(&'a self, question: &'a str) -> &'a str {
        self.rephrased_question().unwrap_or(question)
    }

    /// Wraps `message` in the schema instructions sent to the model.
    pub fn apply(&self, message: &str) -> String {
        format!(
            "Given the following schema:\n<schema>{}</schema>\n\
             Answer this question as accurately as possible.\n\
             <question>{message}</question>",
            self.schema()
        )
    }
}
