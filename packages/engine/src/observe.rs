use serde::Serialize;

use crate::RewriteRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RuleStatus {
    NotApplicable,
    NoChange,
    Changed,
    /// The rule could not read the statement and passed it through as is.
    Skipped(String),
}

/// One rule's result within a pipeline run. `statement` is the text after
/// the rule ran.
#[derive(Debug, Clone, Copy)]
pub struct RuleReport<'a> {
    pub rule: RewriteRule,
    pub status: &'a RuleStatus,
    pub statement: &'a str,
}

pub trait RewriteObserver {
    fn on_rule(&mut self, report: RuleReport<'_>);
}

/// Forwards rule reports to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RewriteObserver for LogObserver {
    fn on_rule(&mut self, report: RuleReport<'_>) {
        match report.status {
            RuleStatus::Skipped(reason) => {
                log::warn!("rewrite rule {} skipped: {reason}", report.rule.name());
            }
            status => {
                log::debug!("rewrite rule {}: {status:?}", report.rule.name());
            }
        }
        log::trace!("statement after {}: {}", report.rule.name(), report.statement);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub rule: RewriteRule,
    #[serde(flatten)]
    pub status: RuleStatus,
    pub statement: String,
}

/// Keeps every report of a run, for callers that want to show their work.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteTrace {
    pub entries: Vec<TraceEntry>,
}

impl RewriteTrace {
    pub fn changed_rules(&self) -> impl Iterator<Item = RewriteRule> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.status == RuleStatus::Changed)
            .map(|entry| entry.rule)
    }
}

impl RewriteObserver for RewriteTrace {
    fn on_rule(&mut self, report: RuleReport<'_>) {
        self.entries.push(TraceEntry {
            rule: report.rule,
            status: report.status.clone(),
            statement: report.statement.to_string(),
        });
    }
}
