//! Positional binder: unclassified tokens → named slots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::args::error::ArgsError;

/// A named, ordered binding target for non-flag tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalSlot {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    /// Field of the typed view that receives the value. Defaults to `name`.
    #[serde(default)]
    pub target_field: Option<String>,
}

impl PositionalSlot {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            target_field: None,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            target_field: None,
        }
    }

    pub fn target(mut self, field: impl Into<String>) -> Self {
        self.target_field = Some(field.into());
        self
    }

    pub fn field(&self) -> &str {
        self.target_field.as_deref().unwrap_or(&self.name)
    }
}

/// Outcome of binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    /// Slot name → token.
    pub values: BTreeMap<String, String>,
    /// Target field → token.
    pub fields: BTreeMap<String, String>,
    /// Tokens left after every slot is filled, in original order.
    pub overflow: Vec<String>,
}

impl Binding {
    pub fn bound(&self) -> usize {
        self.values.len()
    }
}

/// Bind tokens to slots.
///
/// Required slots are satisfied first; optional slots take what is left, in
/// declaration order. Tokens are assigned to the chosen slots left to right.
/// Fewer tokens than required slots is an error; extra tokens overflow.
pub fn bind_positionals(
    slots: &[PositionalSlot],
    tokens: Vec<String>,
) -> Result<Binding, ArgsError> {
    if let Some(missing) = slots.iter().filter(|s| s.required).nth(tokens.len()) {
        return Err(ArgsError::MissingPositionalArg {
            slot: missing.name.clone(),
        });
    }
    let required = slots.iter().filter(|s| s.required).count();

    let mut optional_budget = tokens.len() - required;
    let filled: Vec<&PositionalSlot> = slots
        .iter()
        .filter(|slot| {
            if slot.required {
                true
            } else if optional_budget > 0 {
                optional_budget -= 1;
                true
            } else {
                false
            }
        })
        .collect();

    let mut tokens = tokens.into_iter();
    let mut binding = Binding::default();
    for slot in filled {
        // `filled` never outnumbers the tokens.
        let Some(token) = tokens.next() else { break };
        tracing::debug!(slot = %slot.name, value = %token, "bound positional");
        binding.fields.insert(slot.field().to_string(), token.clone());
        binding.values.insert(slot.name.clone(), token);
    }
    binding.overflow = tokens.collect();
    Ok(binding)
}
