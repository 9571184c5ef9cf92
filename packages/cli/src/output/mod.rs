use comfy_table::{presets::UTF8_BORDERS_ONLY, Cell, ContentArrangement, Row, Table};
use geosql_engine::{ConnectParams, EngineProfile, RewriteTrace, RuleStatus};
use serde_json::Value as JsonValue;

pub fn print_rewrite_table(rewritten: &str, trace: &RewriteTrace) {
    println!("{}", rewrite_table(trace));
    println!("{rewritten}");
}

pub fn print_rewrite_json(original: &str, rewritten: &str, trace: &RewriteTrace) {
    let payload = rewrite_json(original, rewritten, trace);
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_catalogs_table(profile: &EngineProfile, params: &ConnectParams) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["catalog", "default"]);
    for name in profile.catalog_names() {
        let marker = if name.eq_ignore_ascii_case(profile.default_catalog()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![Cell::new(name), Cell::new(marker)]);
    }
    println!("{table}");

    for (key, value) in &params.args {
        println!("{key}={value}");
    }
    if let Some(database) = &params.database {
        println!("database={database}");
    }
}

pub fn print_catalogs_json(profile: &EngineProfile, params: &ConnectParams) {
    let payload = serde_json::json!({
        "engine": profile.engine,
        "default_catalog": profile.default_catalog(),
        "catalogs": profile.catalog_names(),
        "connect_params": params,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
    );
}

fn rewrite_table(trace: &RewriteTrace) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["rule", "status", "statement"]);
    for entry in &trace.entries {
        table.add_row(Row::from(vec![
            Cell::new(entry.rule.name()),
            Cell::new(status_text(&entry.status)),
            Cell::new(&entry.statement),
        ]));
    }
    table
}

fn rewrite_json(original: &str, rewritten: &str, trace: &RewriteTrace) -> JsonValue {
    serde_json::json!({
        "original": original,
        "rewritten": rewritten,
        "rules": trace.entries,
    })
}

fn status_text(status: &RuleStatus) -> String {
    match status {
        RuleStatus::NotApplicable => "not applicable".to_string(),
        RuleStatus::NoChange => "no change".to_string(),
        RuleStatus::Changed => "changed".to_string(),
        RuleStatus::Skipped(reason) => format!("skipped: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{rewrite_json, rewrite_table, status_text};
    use geosql_engine::{
        EngineProfile, RewriteObserver, RewriteRule, RewriteTrace, RuleReport, RuleStatus,
        StatementPipeline,
    };

    fn traced(sql: &str) -> (String, RewriteTrace) {
        let config = EngineProfile::default().rewrite_config(Some("lake"));
        let mut trace = RewriteTrace::default();
        let rewritten = StatementPipeline::new(&config).rewrite_observed(sql, &mut trace);
        (rewritten, trace)
    }

    #[test]
    fn json_payload_lists_rules_with_status() {
        let sql = "SELECT ST_AsGeoJSON(geom) AS \"g\" FROM parcels GROUP BY g";
        let (rewritten, trace) = traced(sql);
        let payload = rewrite_json(sql, &rewritten, &trace);

        assert_eq!(payload["original"], sql);
        assert_eq!(
            payload["rewritten"],
            "SELECT ST_AsGeoJSON(geom) AS `g` FROM lake.parcels"
        );
        let rules = payload["rules"].as_array().expect("rules should be an array");
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0]["rule"], "namespace_qualifier");
        assert_eq!(rules[0]["status"], "changed");
        assert_eq!(rules[1]["rule"], "aggregate_alias_sanitizer");
        assert_eq!(rules[1]["status"], "no_change");
    }

    #[test]
    fn skipped_rules_carry_their_reason() {
        let mut trace = RewriteTrace::default();
        trace.on_rule(RuleReport {
            rule: RewriteRule::NamespaceQualifier,
            status: &RuleStatus::Skipped("token location 1:9 does not map".to_string()),
            statement: "SELECT 1",
        });
        let payload = rewrite_json("SELECT 1", "SELECT 1", &trace);
        assert_eq!(payload["rules"][0]["status"], "skipped");
        assert_eq!(payload["rules"][0]["detail"], "token location 1:9 does not map");
    }

    #[test]
    fn unterminated_literal_still_reports_rewrites() {
        let (rewritten, trace) = traced("SELECT a FROM t WHERE b = 'open");
        assert_eq!(rewritten, "SELECT a FROM lake.t WHERE b = 'open");
        let payload = rewrite_json("", &rewritten, &trace);
        assert_eq!(payload["rules"][0]["status"], "changed");
    }

    #[test]
    fn table_has_one_row_per_rule() {
        let (_, trace) = traced("SELECT a FROM t");
        let rendered = rewrite_table(&trace).to_string();
        assert!(rendered.contains("namespace_qualifier"));
        assert!(rendered.contains("geo_aggregation_stripper"));
        assert_eq!(status_text(&RuleStatus::Skipped("x".to_string())), "skipped: x");
    }
}
