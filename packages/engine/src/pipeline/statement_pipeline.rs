use crate::observe::{LogObserver, RewriteObserver, RuleReport, RuleStatus};
use crate::RewriteConfig;

use super::registry::{statement_rules, RuleOutcome};

/// Threads a statement through every rewrite rule in registry order.
///
/// Rewriting is total. Rules work on whatever prefix of the statement
/// tokenizes; a rule that cannot read the statement at all reports itself as
/// skipped and hands its input to the next rule unchanged.
#[derive(Debug, Clone, Copy)]
pub struct StatementPipeline<'a> {
    config: &'a RewriteConfig,
}

impl<'a> StatementPipeline<'a> {
    pub fn new(config: &'a RewriteConfig) -> Self {
        Self { config }
    }

    pub fn rewrite(&self, sql: &str) -> String {
        self.rewrite_observed(sql, &mut LogObserver)
    }

    pub fn rewrite_observed(&self, sql: &str, observer: &mut dyn RewriteObserver) -> String {
        let mut statement = sql.to_string();
        for rule in statement_rules() {
            let status = match rule.apply(&statement, self.config) {
                Ok(RuleOutcome::Changed(rewritten)) => {
                    statement = rewritten;
                    RuleStatus::Changed
                }
                Ok(RuleOutcome::NoChange) => RuleStatus::NoChange,
                Ok(RuleOutcome::NotApplicable) => RuleStatus::NotApplicable,
                Err(err) => RuleStatus::Skipped(err.message),
            };
            observer.on_rule(RuleReport {
                rule: *rule,
                status: &status,
                statement: &statement,
            });
        }
        statement
    }
}
