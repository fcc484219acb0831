//! Policy engine for per-collection merge strategies
//!
//! Evaluates strategy rules from configuration to pick the merge strategy
//! for a collection. Rules are matched using glob patterns over collection
//! names in first-match-wins order.

use glob::Pattern;
use tracing::{debug, trace};

use campushub_core::config::StrategyRuleConfig;

use crate::resolver::MergeStrategy;
use crate::ConflictError;

/// Validates one strategy rule's glob pattern and strategy name
pub fn validate_rule(rule: &StrategyRuleConfig) -> Result<(), ConflictError> {
    Pattern::new(&rule.pattern).map_err(|e| ConflictError::InvalidPattern {
        pattern: rule.pattern.clone(),
        reason: e.to_string(),
    })?;

    MergeStrategy::parse(&rule.strategy).ok_or_else(|| ConflictError::InvalidPattern {
        pattern: rule.pattern.clone(),
        reason: format!(
            "invalid strategy '{}'; valid: server_wins, client_wins, last_write_wins, manual",
            rule.strategy
        ),
    })?;

    Ok(())
}

/// Engine that evaluates per-collection strategy rules
pub struct PolicyEngine {
    rules: Vec<(Pattern, MergeStrategy)>,
    default_strategy: MergeStrategy,
}

impl PolicyEngine {
    /// Creates a PolicyEngine from the default strategy string and a list
    /// of rules
    ///
    /// Invalid rules are logged and skipped. An unparsable default falls
    /// back to [`MergeStrategy::LastWriteWins`].
    pub fn new(default_strategy: &str, rules: &[StrategyRuleConfig]) -> Self {
        let default = MergeStrategy::parse(default_strategy).unwrap_or_default();

        let compiled_rules: Vec<(Pattern, MergeStrategy)> = rules
            .iter()
            .filter_map(|rule| {
                let pattern = match Pattern::new(&rule.pattern) {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::warn!(
                            pattern = %rule.pattern,
                            error = %e,
                            "Skipping invalid strategy rule pattern"
                        );
                        return None;
                    }
                };
                let strategy = match MergeStrategy::parse(&rule.strategy) {
                    Some(s) => s,
                    None => {
                        tracing::warn!(
                            strategy = %rule.strategy,
                            "Skipping invalid strategy rule"
                        );
                        return None;
                    }
                };
                Some((pattern, strategy))
            })
            .collect();

        debug!(
            rules_count = compiled_rules.len(),
            default = %default,
            "PolicyEngine initialized"
        );

        Self {
            rules: compiled_rules,
            default_strategy: default,
        }
    }

    /// Evaluates the policy for a given collection name
    ///
    /// Uses first-match-wins: the first rule whose glob matches determines
    /// the strategy. If no rule matches, returns the default strategy.
    pub fn evaluate(&self, collection: &str) -> MergeStrategy {
        for (pattern, strategy) in &self.rules {
            if pattern.matches(collection) {
                trace!(
                    collection = %collection,
                    pattern = %pattern,
                    strategy = %strategy,
                    "Strategy rule matched"
                );
                return *strategy;
            }
        }

        trace!(
            collection = %collection,
            default = %self.default_strategy,
            "No strategy rule matched, using default"
        );
        self.default_strategy
    }

    /// Returns the default merge strategy
    pub fn default_strategy(&self) -> MergeStrategy {
        self.default_strategy
    }

    /// Returns the number of compiled rules
    pub fn rules_count(&self) -> usize {
        self.rules.len()
    }
}
