use geosql_engine::{
    normalize_alias_quotes, qualify, rewrite, strip_geo_group_by, EngineProfile, RewriteRule,
    RewriteTrace, RuleStatus, StatementPipeline,
};

#[test]
fn qualification_covers_from_and_join() {
    let rewritten = qualify("SELECT * FROM orders JOIN users ON x", "catalog1");
    assert!(rewritten.contains("FROM catalog1.orders"));
    assert!(rewritten.contains("JOIN catalog1.users"));
}

#[test]
fn qualification_does_not_double_prefix() {
    let rewritten = qualify("SELECT * FROM catalog1.orders", "catalog1");
    assert_eq!(rewritten, "SELECT * FROM catalog1.orders");
    assert!(!rewritten.contains("catalog1.catalog1"));
}

#[test]
fn qualification_is_idempotent() {
    let samples = [
        "SELECT * FROM orders JOIN users ON x",
        "SELECT * FROM catalog1.orders",
        "SELECT * FROM overture.places WHERE id IN (SELECT id FROM flagged)",
        "SELECT EXTRACT(YEAR FROM ts) FROM events",
        "",
    ];
    for sql in samples {
        let once = qualify(sql, "catalog1");
        assert_eq!(qualify(&once, "catalog1"), once, "qualify not idempotent for {sql:?}");
    }
}

#[test]
fn alias_quotes_become_backticks() {
    let rewritten = normalize_alias_quotes("SELECT 1 AS \"count\"");
    assert!(rewritten.contains("AS `count`"));
    assert!(!rewritten.contains("AS \"count\""));
}

#[test]
fn geo_group_by_with_alias_is_removed() {
    let rewritten = strip_geo_group_by("SELECT ST_AsGeoJSON(geom) AS g FROM t GROUP BY g");
    assert!(!rewritten.contains("GROUP BY"));
    assert!(rewritten.starts_with("SELECT ST_AsGeoJSON(geom) AS g FROM t"));
}

#[test]
fn conventional_geojson_group_by_is_removed() {
    let rewritten = strip_geo_group_by(
        "SELECT ST_AsGeoJSON(geometry) AS geojson, names FROM places GROUP BY geojson LIMIT 10",
    );
    assert!(!rewritten.contains("GROUP BY geojson"));
    assert_eq!(
        rewritten,
        "SELECT ST_AsGeoJSON(geometry) AS geojson, names FROM places LIMIT 10"
    );
}

#[test]
fn non_geometry_group_by_survives() {
    let rewritten = strip_geo_group_by("SELECT a, count(*) FROM t GROUP BY a");
    assert!(rewritten.contains("GROUP BY a"));
}

#[test]
fn full_pipeline_end_to_end() {
    let rewritten = rewrite(
        "SELECT ST_AsGeoJSON(geom) AS \"g\" FROM parcels GROUP BY g",
        "wherobots_open_data",
    );
    assert_eq!(
        rewritten,
        "SELECT ST_AsGeoJSON(geom) AS `g` FROM wherobots_open_data.parcels"
    );
}

#[test]
fn qualified_names_survive_whitespace_normalization() {
    let rewritten = rewrite(
        "SELECT\n  ST_AsGeoJSON(p.geom)   AS geojson,\n  COUNT(*) AS \"COUNT(*)\"\nFROM\n  overture.places p\nJOIN zones z ON p.zone = z.id\nGROUP BY geojson",
        "wherobots_open_data",
    );
    assert_eq!(
        rewritten,
        "SELECT ST_AsGeoJSON(p.geom) AS geojson, COUNT(*) AS `COUNT(*)` FROM wherobots_open_data.overture.places p JOIN wherobots_open_data.zones z ON p.zone = z.id"
    );
}

#[test]
fn rewrite_only_requotes_aggregate_aliases() {
    assert_eq!(
        rewrite("SELECT COUNT(*) AS \"COUNT(*)\" FROM t", "ns"),
        "SELECT COUNT(*) AS `COUNT(*)` FROM ns.t"
    );

    let config = EngineProfile::default().rewrite_config(Some("ns"));
    assert_eq!(
        StatementPipeline::new(&config).rewrite("SELECT COUNT(*) AS \"COUNT(*)\" FROM t"),
        "SELECT COUNT(*) AS count_rows FROM ns.t"
    );
}

#[test]
fn backslash_escaped_quotes_do_not_stop_rewriting() {
    let config = EngineProfile::default().rewrite_config(Some("ns"));
    let mut trace = RewriteTrace::default();
    let rewritten = StatementPipeline::new(&config).rewrite_observed(
        "SELECT name FROM places WHERE name = 'O\\'Brien' GROUP BY geojson",
        &mut trace,
    );

    assert_eq!(
        rewritten,
        "SELECT name FROM ns.places WHERE name = 'O\\'Brien'"
    );
    assert!(trace
        .entries
        .iter()
        .all(|entry| !matches!(entry.status, RuleStatus::Skipped(_))));
}

#[test]
fn unterminated_input_is_rewritten_up_to_the_break() {
    assert_eq!(
        rewrite("SELECT  'x FROM t GROUP BY geojson", "ns"),
        "SELECT 'x FROM t"
    );
    assert_eq!(
        rewrite("SELECT a\n FROM t GROUP BY geojson /* open", "ns"),
        "SELECT a FROM ns.t /* open"
    );
    assert_eq!(
        rewrite("SELECT a FROM t WHERE b = \"open", "ns"),
        "SELECT a FROM ns.t WHERE b = \"open"
    );
}

#[test]
fn numeric_prefixed_tables_are_qualified() {
    assert_eq!(qualify("SELECT 1 FROM 2t", "ns"), "SELECT 1 FROM ns.2t");
    let once = qualify("SELECT * FROM 2024_sales JOIN t ON true", "ns");
    assert_eq!(once, "SELECT * FROM ns.2024_sales JOIN ns.t ON true");
    assert_eq!(qualify(&once, "ns"), once);
}

#[test]
fn literals_are_preserved_through_the_pipeline() {
    let rewritten = rewrite(
        "SELECT name FROM places WHERE note = 'FROM x JOIN y GROUP BY geojson AS \"q\"'",
        "ns",
    );
    assert_eq!(
        rewritten,
        "SELECT name FROM ns.places WHERE note = 'FROM x JOIN y GROUP BY geojson AS \"q\"'"
    );
}

#[test]
fn empty_statement_stays_empty() {
    assert_eq!(rewrite("", "ns"), "");
}

#[test]
fn profile_catalogs_count_as_qualified() {
    let config = EngineProfile::default().rewrite_config(None);
    let rewritten = StatementPipeline::new(&config)
        .rewrite("SELECT * FROM wherobots_pro_data.foursquare.places JOIN wherobots.tmp ON true JOIN b ON true");
    assert_eq!(
        rewritten,
        "SELECT * FROM wherobots_pro_data.foursquare.places JOIN wherobots.tmp ON true JOIN wherobots_open_data.b ON true"
    );
}

#[test]
fn trace_reports_changed_rules() {
    let config = EngineProfile::default().rewrite_config(Some("lake"));
    let mut trace = RewriteTrace::default();
    let rewritten = StatementPipeline::new(&config).rewrite_observed(
        "SELECT ST_AsGeoJSON(geom) AS \"g\" FROM parcels GROUP BY g",
        &mut trace,
    );

    assert_eq!(rewritten, "SELECT ST_AsGeoJSON(geom) AS `g` FROM lake.parcels");
    assert_eq!(trace.entries.len(), 4);
    assert_eq!(
        trace.changed_rules().collect::<Vec<_>>(),
        vec![
            RewriteRule::NamespaceQualifier,
            RewriteRule::AliasQuoteNormalizer,
            RewriteRule::GeoAggregationStripper,
        ]
    );
    assert_eq!(trace.entries[1].status, RuleStatus::NoChange);
    assert_eq!(trace.entries[3].statement, rewritten);
}
