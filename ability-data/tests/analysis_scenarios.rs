use ability_data::analysis::{analyze_complexity, analyze_elements, analyze_melee};
use ability_data::numbers::count_to_f64;
use ability_data::stats::shannon_entropy;
use ability_data::{
    AbilityRecord, AnalysisConfig, DatasetSource, Recommendation, ScoringConfig, Verdict, analyze,
    load_dataset, walk_record,
};
use serde_json::{Value, json};

fn record(name: &str, primitives: [&str; 2], script: Value) -> AbilityRecord {
    AbilityRecord::from_value(&json!({
        "name": name,
        "description": "",
        "color": "white",
        "ability": {
            "primitives": primitives,
            "effects": [{"script": script}],
            "cooldown": 5,
        },
    }))
    .unwrap()
}

fn on_hit_chain(depth: usize) -> Value {
    let mut node = json!({"action": "damage", "args": {"amount": 1}});
    for _ in 0..depth {
        node = json!({"action": "damage", "args": {"amount": 1}, "on_hit": [node]});
    }
    json!([node])
}

#[test]
fn chain_of_three_reports_depth_three() {
    let records = vec![record("Chain", ["fire", "ice"], on_hit_chain(3))];
    let complexity = analyze_complexity(&records);
    assert_eq!(complexity.max_nesting_depth, 3);
    assert_eq!(complexity.min_nesting_depth, 3);
    assert_eq!(walk_record(&records[0]).count(), 4);
}

#[test]
fn walker_visits_every_node_with_edge_depth() {
    let script = json!([
        {"action": "damage", "on_hit": [
            {"action": "apply_status", "args": {"status": "burn"}},
            {"action": "damage", "on_hit": [{"action": "knockback"}]},
        ]},
        {"action": "spawn_melee"},
    ]);
    let rec = record("Tree", ["air", "earth"], script);
    let steps: Vec<(String, usize)> = walk_record(&rec)
        .map(|step| (step.node.action.clone(), step.depth))
        .collect();
    assert_eq!(
        steps,
        vec![
            ("damage".to_string(), 0),
            ("apply_status".to_string(), 1),
            ("damage".to_string(), 1),
            ("knockback".to_string(), 2),
            ("spawn_melee".to_string(), 0),
        ]
    );
}

#[test]
fn records_without_melee_have_no_melee_section() {
    let records = vec![
        record("A", ["fire", "fire"], json!([{"action": "damage"}])),
        record("B", ["ice", "fire"], json!([{"action": "apply_status"}])),
    ];
    assert!(analyze_melee(&records).is_none());
    assert!(analyze(&records, &AnalysisConfig::default()).melee.is_none());
}

#[test]
fn coverage_tracks_unique_pairs_over_twenty_eight() {
    let elements = ["fire", "ice", "air", "earth", "water", "light", "dark", "metal"];
    let mut records = Vec::new();
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            records.push(record("pair", [*a, *b], json!([])));
        }
    }
    let analysis = analyze_elements(&records[..7], &ScoringConfig::default());
    assert_eq!(analysis.unique_combinations, 7);
    assert!((analysis.coverage_percent - 25.0).abs() < 1e-9);

    let full = analyze_elements(&records, &ScoringConfig::default());
    assert_eq!(full.unique_combinations, 28);
    assert!((full.coverage_percent - 100.0).abs() < 1e-9);
    assert!((full.evenness_percent - 100.0).abs() < 1e-9);
}

#[test]
fn entropy_stays_within_bounds() {
    for counts in [vec![1_usize], vec![3, 1], vec![5, 5, 5, 5], vec![100, 1, 1, 1, 7]] {
        let entropy = shannon_entropy(counts.iter().copied());
        let bound = count_to_f64(counts.len()).log2();
        assert!(entropy >= 0.0);
        assert!(entropy <= bound + 1e-12, "{counts:?}: {entropy} > {bound}");
    }
}

#[test]
fn full_report_scores_a_small_varied_dataset() {
    let records = vec![
        record(
            "Frost Nova",
            ["ice", "air"],
            json!([{"action": "apply_status", "args": {"status": "freeze", "duration": 2}}]),
        ),
        record(
            "Magma Fist",
            ["fire", "earth"],
            json!([
                {"action": "spawn_melee", "args": {"shape": "arc", "movement": "dash"}},
                {"action": "damage", "args": {"amount": 20}, "on_hit": [
                    {"action": "apply_status", "args": {"status": "burn", "duration": 3}},
                ]},
            ]),
        ),
        record("Gust", ["air", "ice"], json!([{"action": "damage", "args": {"amount": 8}}])),
    ];
    let report = analyze(&records, &AnalysisConfig::default());

    assert_eq!(report.total_entries, 3);
    assert_eq!(report.elements.unique_combinations, 2);
    assert_eq!(report.actions.unique_sequences, 3);
    assert!((report.actions.sequence_diversity_percent - 100.0).abs() < 1e-9);
    assert_eq!(report.status_effects.unique_statuses, 2);
    assert_eq!(report.complexity.max_nesting_depth, 1);
    let melee = report.melee.as_ref().unwrap();
    assert_eq!(melee.shape_movement_combos.unique(), 1);

    let cooldown = report.parameters.cooldown.as_ref().unwrap();
    assert_eq!(cooldown.count, 3);
    assert_eq!(cooldown.unique_values, 1);

    assert!(report.score.overall >= 0.0 && report.score.overall <= 100.0);
    assert_eq!(
        report.score.verdict,
        Verdict::from_score(report.score.overall, &Default::default())
    );
    assert!(matches!(
        report.recommendations[0],
        Recommendation::SampleSize(_)
    ));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_entries"], 3);
    assert_eq!(json["score"]["verdict"], json!(report.score.verdict));
}

#[test]
fn loader_falls_back_to_raw_when_fixed_is_missing() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("ability-data-loader-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    let raw = dir.join("ability_data_training.jsonl");
    // Missing color and cooldown: enough for analysis, not for repair.
    std::fs::write(
        &raw,
        r#"{"name":"Loose","ability":{"primitives":["fire","ice"],"effects":[{"script":[]}]}} {"name":"#,
    )
    .unwrap();

    let dataset = load_dataset(&dir.join("ability_data_training_fixed.json"), &raw).unwrap();
    assert_eq!(dataset.source, DatasetSource::RawFallback(raw));
    assert_eq!(dataset.records.len(), 1);
    assert!((dataset.records[0].ability.cooldown() - 0.0).abs() < f64::EPSILON);
}
