use serde::{Deserialize, Serialize};

use crate::core::errors::{Error, Result};

/// Immutable description of one external analyzer: its name and the
/// program plus fixed arguments used to invoke it. The target path is
/// appended to `invocation` at run time.
///
/// Deserialization goes through the same validation as [`AnalyzerDefinition::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDefinition")]
pub struct AnalyzerDefinition {
    name: String,
    invocation: Vec<String>,
}

#[derive(Deserialize)]
struct RawDefinition {
    name: String,
    invocation: Vec<String>,
}

impl TryFrom<RawDefinition> for AnalyzerDefinition {
    type Error = Error;

    fn try_from(raw: RawDefinition) -> Result<Self> {
        Self::new(raw.name, raw.invocation)
    }
}

impl AnalyzerDefinition {
    /// Validate and build a definition. Both the name and the invocation
    /// must be non-empty, and the program (first element) must not be blank.
    pub fn new(name: impl Into<String>, invocation: Vec<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_definition("analyzer name must not be empty"));
        }
        match invocation.first() {
            None => {
                return Err(Error::invalid_definition(format!(
                    "analyzer `{}` has an empty invocation",
                    name
                )))
            }
            Some(program) if program.trim().is_empty() => {
                return Err(Error::invalid_definition(format!(
                    "analyzer `{}` has a blank program name",
                    name
                )))
            }
            Some(_) => {}
        }

        Ok(Self { name, invocation })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invocation(&self) -> &[String] {
        &self.invocation
    }

    pub fn program(&self) -> &str {
        // Non-empty by construction
        &self.invocation[0]
    }

    pub fn fixed_args(&self) -> &[String] {
        &self.invocation[1..]
    }

    /// The invocation rendered as a single display string.
    pub fn command_line(&self) -> String {
        self.invocation.join(" ")
    }
}
