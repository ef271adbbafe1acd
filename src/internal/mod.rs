/// Module that counts capturing groups and renumbers backreferences.
pub(crate) mod capture_groups;

/// Module that provides the CompiledRule type.
mod compiled_rule;
pub use compiled_rule::CompiledRule;

/// Module that provides the CompiledRuleSet type.
mod compiled_rule_set;
pub(crate) use compiled_rule_set::CompiledRuleSet;

/// Module that turns rule patterns into pattern text.
pub(crate) mod normalize;
