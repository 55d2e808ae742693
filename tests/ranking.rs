// tests/ranking.rs

use std::collections::BTreeMap;
use supply_insights::io::reporting::write_rankings;
use supply_insights::io::suppliers::{generate_suppliers, read_suppliers, write_suppliers};
use supply_insights::{
    rank, rank_with_orientation, AppConfig, Criterion, CriterionSpec, SupplierFilter,
    SupplierRecord,
};

#[test]
fn generated_table_ranks_after_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suppliers.csv");
    write_suppliers(&path, &generate_suppliers(42).unwrap()).unwrap();
    let suppliers = read_suppliers(&path).unwrap();

    let (specs, weights) = AppConfig::default().ranking_criteria();
    let results = rank_with_orientation(&suppliers, &specs, &weights).unwrap();
    assert_eq!(results.len(), 20);
    assert_eq!(results[0].rank, 1);
    assert!(results.windows(2).all(|w| w[0].closeness >= w[1].closeness));
    assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.closeness)));

    let out = dir.path().join("ranking.csv");
    write_rankings(&out, &results, &suppliers).unwrap();
    assert_eq!(csv::Reader::from_path(&out).unwrap().records().count(), 20);
}

#[test]
fn missing_criterion_column_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("suppliers.csv");
    std::fs::write(&path, "id,name,price,quality\nA,Alpha,7,8\nB,Beta,9,6\n").unwrap();
    let suppliers = read_suppliers(&path).unwrap();

    let ok = rank(&suppliers, &[Criterion::Price, Criterion::Quality], &[0.5, 0.5]).unwrap();
    assert_eq!(ok.len(), 2);

    let err = rank(&suppliers, &[Criterion::Price, Criterion::Delivery], &[0.5, 0.5]).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn filter_then_rank_prefers_cheaper_under_cost_orientation() {
    let make = |id: &str, region: &str, price: f64, quality: f64| {
        let scores = BTreeMap::from([(Criterion::Price, price), (Criterion::Quality, quality)]);
        SupplierRecord::new(id, id, "home", region, price, 100, 10, scores).unwrap()
    };
    let suppliers = vec![
        make("A", "south", 40.0, 8.0),
        make("B", "south", 20.0, 8.0),
        make("C", "east", 10.0, 9.0),
    ];
    let filter = SupplierFilter {
        region: Some("south".into()),
        ..Default::default()
    };
    let candidates = filter.apply(&suppliers);
    assert_eq!(candidates.len(), 2);

    let specs = [CriterionSpec::cost(Criterion::Price), CriterionSpec::benefit(Criterion::Quality)];
    let results = rank_with_orientation(&candidates, &specs, &[1.0, 1.0]).unwrap();
    assert_eq!(results[0].supplier_id, "B");
    assert_eq!(results[0].closeness, 1.0);
    assert_eq!(results[1].closeness, 0.0);

    let empty = SupplierFilter {
        region: Some("north".into()),
        ..Default::default()
    }
    .apply(&suppliers);
    assert!(rank(&empty, &[Criterion::Price], &[1.0]).unwrap_err().is_invalid_input());
}
