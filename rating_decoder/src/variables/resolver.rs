//! Variable description lookup
//!
//! Resolution order: the owning entity's dependency list (numeric id or
//! custom id), then the program input dictionary (key), then the raw token.

use super::grammar::{parse_variable, VariableRef};
use crate::program::{Dependency, InputDefinition};

/// Read-only view of the tables a token may be resolved against.
///
/// Either part may be absent; with both absent every token resolves to
/// itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupContext<'a> {
    pub dependencies: Option<&'a [Dependency]>,
    pub inputs: Option<&'a [InputDefinition]>,
}

impl<'a> LookupContext<'a> {
    pub fn new(
        dependencies: Option<&'a [Dependency]>,
        inputs: Option<&'a [InputDefinition]>,
    ) -> Self {
        Self {
            dependencies,
            inputs,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_none() && self.inputs.is_none()
    }
}

fn dependency_matches(dependency: &Dependency, token: &str, var: Option<&VariableRef>) -> bool {
    let id = var.map(|v| v.id as i64);

    let index_match = dependency.index.as_ref().is_some_and(|index| {
        index.as_integer().is_some_and(|n| Some(n) == id) || index.to_string() == token
    });

    let custom_match = dependency.custom_id.as_deref().is_some_and(|custom| {
        custom == token || custom.trim().parse::<i64>().ok().is_some_and(|n| Some(n) == id)
    });

    index_match || custom_match
}

/// Describe a token using the lookup context, falling back to the token itself
pub fn describe(token: &str, context: &LookupContext<'_>) -> String {
    let parsed = parse_variable(token).ok();

    if let Some(dependencies) = context.dependencies {
        if let Some(dependency) = dependencies
            .iter()
            .find(|d| dependency_matches(d, token, parsed.as_ref()))
        {
            return dependency.description.clone();
        }
    }

    if let Some(inputs) = context.inputs {
        let bare = parsed.map(|v| v.key());
        if let Some(input) = inputs
            .iter()
            .find(|i| i.key == token || Some(&i.key) == bare.as_ref())
        {
            return input.description.clone();
        }
    }

    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dependencies() -> Vec<Dependency> {
        vec![
            Dependency::new(47, "Territory Factor"),
            Dependency::new(900, "Unused").with_custom_id("5369"),
        ]
    }

    fn inputs() -> Vec<InputDefinition> {
        vec![
            InputDefinition::new("GI_84", "Base Rate"),
            InputDefinition::new("GC_47", "Shadowed by dependency"),
        ]
    }

    #[test]
    fn test_dependency_wins_over_inputs() {
        let deps = dependencies();
        let inputs = inputs();
        let context = LookupContext::new(Some(&deps), Some(&inputs));

        assert_eq!(describe("GC_47", &context), "Territory Factor");
        assert_eq!(describe("GR_5369", &context), "Unused");
    }

    #[test]
    fn test_input_lookup_strips_marker() {
        let inputs = inputs();
        let context = LookupContext::new(None, Some(&inputs));

        assert_eq!(describe("GI_84", &context), "Base Rate");
        assert_eq!(describe("~GI_84", &context), "Base Rate");
    }

    #[test]
    fn test_fallback_to_raw_token() {
        let deps = dependencies();
        let context = LookupContext::new(Some(&deps), None);
        assert_eq!(describe("GI_1", &context), "GI_1");
        assert_eq!(describe("[Y]", &context), "[Y]");
        assert_eq!(describe("GI_47", &LookupContext::empty()), "GI_47");
    }

    #[test]
    fn test_describe_is_idempotent() {
        let deps = dependencies();
        let context = LookupContext::new(Some(&deps), None);
        let first = describe("GC_47", &context);
        let second = describe("GC_47", &context);
        assert_eq!(first, second);
        assert!(LookupContext::empty().is_empty());
        assert!(!context.is_empty());
    }
}
