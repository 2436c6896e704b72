//! Options assembler: resolved flags + positionals + pass-through in one place.
//!
//! Pure copying. No value is resolved or parsed here.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::args::classifier::{ArgumentToken, ClassifyResult, TokenClass};
use crate::args::positional::Binding;
use crate::args::resolver::{ResolvedFlagValue, Source};
use crate::args::value::FlagValue;

/// Everything one command invocation resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub command: String,
    pub resolved_flags: BTreeMap<String, ResolvedFlagValue>,
    /// Slot name → token.
    pub positionals: BTreeMap<String, String>,
    /// Target field → token, for the typed views.
    #[serde(skip)]
    pub fields: BTreeMap<String, String>,
    /// Arguments for the wrapped tool, verbatim and in order.
    pub pass_through_args: Vec<String>,
    /// The original argument vector.
    pub raw_args: Vec<String>,
    /// Tokens taken by this engine: flags, flag values, the separator and bound positionals.
    pub consumed_tokens: usize,
}

impl ParseResult {
    pub fn value(&self, flag: &str) -> Option<&FlagValue> {
        self.resolved_flags.get(flag).map(|r| &r.value)
    }

    pub fn source(&self, flag: &str) -> Option<Source> {
        self.resolved_flags.get(flag).map(|r| r.source)
    }

    pub fn string(&self, flag: &str) -> Option<&str> {
        self.value(flag).and_then(FlagValue::as_str)
    }

    pub fn bool(&self, flag: &str) -> Option<bool> {
        self.value(flag).and_then(FlagValue::as_bool)
    }

    pub fn int(&self, flag: &str) -> Option<i64> {
        self.value(flag).and_then(FlagValue::as_int)
    }

    pub fn list(&self, flag: &str) -> Option<&[String]> {
        self.value(flag).and_then(FlagValue::as_list)
    }

    pub fn positional(&self, slot: &str) -> Option<&str> {
        self.positionals.get(slot).map(String::as_str)
    }

    pub fn field(&self, target: &str) -> Option<&str> {
        self.fields.get(target).map(String::as_str)
    }
}

/// Builder for a [`ParseResult`].
#[derive(Debug, Clone)]
pub struct OptionsAssembler {
    command: String,
    raw_args: Vec<String>,
    resolved_flags: BTreeMap<String, ResolvedFlagValue>,
    binding: Binding,
    tokens: Vec<ArgumentToken>,
    classifier_consumed: usize,
}

impl OptionsAssembler {
    /// Start from the original arguments of `command`.
    pub fn new(command: impl Into<String>, raw_args: &[String]) -> Self {
        Self {
            command: command.into(),
            raw_args: raw_args.to_vec(),
            resolved_flags: BTreeMap::new(),
            binding: Binding::default(),
            tokens: Vec::new(),
            classifier_consumed: 0,
        }
    }

    /// From the classifier: token classes and consumed flag tokens.
    pub fn with_classified(mut self, classified: &ClassifyResult) -> Self {
        self.tokens = classified.tokens.clone();
        self.classifier_consumed = classified.consumed_count();
        self
    }

    /// From the resolver.
    pub fn with_flags(mut self, resolved: BTreeMap<String, ResolvedFlagValue>) -> Self {
        self.resolved_flags = resolved;
        self
    }

    /// From the positional binder.
    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.binding = binding;
        self
    }

    /// Build the final result.
    ///
    /// Tool flags and overflow positionals keep their relative order and go in
    /// front of the separator tail.
    pub fn build(self) -> ParseResult {
        let consumed_tokens = self.classifier_consumed + self.binding.bound();

        // Overflow is always the trailing run of unclassified tokens.
        let unclassified = self
            .tokens
            .iter()
            .filter(|t| t.class == TokenClass::Unclassified)
            .count();
        let mut skip_bound = unclassified.saturating_sub(self.binding.overflow.len());
        let mut pass_through_args = Vec::new();
        let mut tail = Vec::new();
        for token in self.tokens {
            match token.class {
                TokenClass::ToolArg => pass_through_args.push(token.raw),
                TokenClass::Unclassified if skip_bound > 0 => skip_bound -= 1,
                TokenClass::Unclassified => pass_through_args.push(token.raw),
                TokenClass::PassThrough => tail.push(token.raw),
                _ => {}
            }
        }
        pass_through_args.extend(tail);

        debug_assert_eq!(
            pass_through_args.len() + consumed_tokens,
            self.raw_args.len(),
            "every token is either consumed or passed through"
        );

        ParseResult {
            command: self.command,
            resolved_flags: self.resolved_flags,
            positionals: self.binding.values,
            fields: self.binding.fields,
            pass_through_args,
            raw_args: self.raw_args,
            consumed_tokens,
        }
    }
}
