use pretty_assertions::assert_eq;

use screen_risk::output::{format_json, format_ratio, format_tsv};
use screen_risk::patient::{MarkerReading, PatientContext, Trimester};
use screen_risk::scoring::{evaluate, validate_tables, Evaluation, RiskCategory};
use screen_risk::tables::{Analyte, Condition, ReferenceTables};
use screen_risk::{ErrorKind, ScreeningError};

fn first_trimester(free_hcg: f64) -> Evaluation {
    let patient = PatientContext::new(30, 12, Trimester::First).with_weight(65.0);
    let readings = [
        MarkerReading::new(Analyte::Nt, 1.4),
        MarkerReading::new(Analyte::PappA, 1.4),
        MarkerReading::new(Analyte::FreeBetaHcg, free_hcg),
    ];
    evaluate(&ReferenceTables::default(), Trimester::First, &patient, &readings).unwrap()
}

#[test]
fn builtin_tables_validate() {
    assert!(validate_tables(&ReferenceTables::default()).is_ok());
}

#[test]
fn markers_at_median_give_base_risk() {
    let evaluation = first_trimester(80.0);

    let ratios: Vec<f64> = evaluation.markers.iter().map(|m| m.ratio).collect();
    assert_eq!(ratios, vec![1.0, 1.0, 1.0]);

    let downs = evaluation.risk(Condition::Downs).unwrap();
    assert_eq!(downs.probability, 1.0 / 800.0);
    assert_eq!(format_ratio(downs.probability), "1:800");
    assert_eq!(downs.category, RiskCategory::LowModerate);
}

#[test]
fn elevated_free_hcg_takes_top_band() {
    let evaluation = first_trimester(320.0);

    assert_eq!(evaluation.marker(Analyte::FreeBetaHcg).unwrap().ratio, 4.0);
    let downs = evaluation.risk(Condition::Downs).unwrap();
    assert_eq!(downs.probability, (1.0 / 800.0) * 2.5);
    assert_eq!(format_ratio(downs.probability), "1:320");
    assert!(!downs.capped);

    // Turner reacts to the same marker through its own ladder
    let turner = evaluation.risk(Condition::Turner).unwrap();
    assert_eq!(turner.probability, (1.0 / 2500.0) * 3.0);
}

#[test]
fn elevated_afp_overrides_ntd_risk() {
    for age in [20, 30, 45] {
        let patient = PatientContext::new(age, 18, Trimester::Second);
        let readings = [
            MarkerReading::new(Analyte::Afp, 135.0),
            MarkerReading::new(Analyte::TotalHcg, 44_000.0),
            MarkerReading::new(Analyte::Ue3, 1.6),
        ];
        let evaluation =
            evaluate(&ReferenceTables::default(), Trimester::Second, &patient, &readings).unwrap();

        assert_eq!(evaluation.marker(Analyte::Afp).unwrap().ratio, 3.0);
        let ntd = evaluation.risk(Condition::Ntd).unwrap();
        assert_eq!(ntd.probability, 0.01);
        assert_eq!(format_ratio(ntd.probability), "1:100");
    }
}

#[test]
fn quad_correction_applies_to_trisomies() {
    let patient = PatientContext::new(30, 18, Trimester::Second);
    let readings = [
        MarkerReading::new(Analyte::Afp, 45.0),
        MarkerReading::new(Analyte::TotalHcg, 55_000.0),
        MarkerReading::new(Analyte::Ue3, 4.0),
    ];
    let evaluation =
        evaluate(&ReferenceTables::default(), Trimester::Second, &patient, &readings).unwrap();

    // Total hCG MoM 2.5 -> x1.8
    assert_eq!(evaluation.marker(Analyte::TotalHcg).unwrap().ratio, 2.5);
    assert_eq!(
        evaluation.risk(Condition::Downs).unwrap().probability,
        (1.0 / 800.0) * 1.8
    );
    assert_eq!(
        evaluation.risk(Condition::Patau).unwrap().probability,
        (1.0 / 5000.0) * (1.8 * 1.3)
    );
    assert_eq!(
        evaluation.risk(Condition::Turner).unwrap().probability,
        1.0 / 2500.0
    );
}

#[test]
fn missing_second_trimester_marker_skips_quad() {
    let patient = PatientContext::new(30, 18, Trimester::Second);
    let readings = [
        MarkerReading::new(Analyte::Afp, 45.0),
        MarkerReading::new(Analyte::TotalHcg, 55_000.0),
    ];
    let evaluation =
        evaluate(&ReferenceTables::default(), Trimester::Second, &patient, &readings).unwrap();
    assert_eq!(
        evaluation.risk(Condition::Downs).unwrap().probability,
        1.0 / 800.0
    );
}

#[test]
fn out_of_window_week_is_invalid_input() {
    let patient = PatientContext::new(30, 16, Trimester::First);
    let err = evaluate(&ReferenceTables::default(), Trimester::First, &patient, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn missing_table_is_configuration_error() {
    let mut tables = ReferenceTables::default();
    tables.base_prevalence = screen_risk::tables::BasePrevalence::new(Default::default());
    let patient = PatientContext::new(30, 12, Trimester::First);
    let err = evaluate(&tables, Trimester::First, &patient, &[]).unwrap_err();
    assert_eq!(err, ScreeningError::MissingPrevalence(Condition::Downs));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn tsv_and_json_outputs_agree() {
    let evaluation = first_trimester(320.0);
    let patient = PatientContext::new(30, 12, Trimester::First).with_weight(65.0);

    let tsv = format_tsv(&evaluation.risks);
    let downs_row: Vec<&str> = tsv.lines().next().unwrap().split('\t').collect();
    assert_eq!(downs_row[0], "downs");
    assert_eq!(downs_row[2], "1:320");

    let json = format_json(&evaluation, &patient, chrono::Utc::now()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["risks"][0]["odds"], "1:320");
    assert_eq!(value["risks"][0]["label"], downs_row[3]);
}

fn first_trimester_week10_papp_a(papp_a: f64) -> Evaluation {
    let patient = PatientContext::new(30, 10, Trimester::First);
    let readings = [MarkerReading::new(Analyte::PappA, papp_a)];
    evaluate(&ReferenceTables::default(), Trimester::First, &patient, &readings).unwrap()
}

#[test]
fn papp_a_just_below_threshold_takes_lower_band() {
    // 0.295 MoM rounds to 0.29, inside '<0.3'
    let evaluation = first_trimester_week10_papp_a(0.295);
    assert_eq!(evaluation.marker(Analyte::PappA).unwrap().ratio, 0.29);
    assert_eq!(
        evaluation.risk(Condition::Downs).unwrap().probability,
        (1.0 / 800.0) * 3.0
    );

    // 0.495 MoM rounds to 0.49, inside '<0.5'
    let evaluation = first_trimester_week10_papp_a(0.495);
    assert_eq!(evaluation.marker(Analyte::PappA).unwrap().ratio, 0.49);
    assert_eq!(
        evaluation.risk(Condition::Downs).unwrap().probability,
        (1.0 / 800.0) * 1.5
    );
}

#[test]
fn low_afp_near_threshold_reduces_ntd_risk() {
    let patient = PatientContext::new(30, 17, Trimester::Second);
    let readings = [MarkerReading::new(Analyte::Afp, 19.8)];
    let evaluation =
        evaluate(&ReferenceTables::default(), Trimester::Second, &patient, &readings).unwrap();

    assert_eq!(evaluation.marker(Analyte::Afp).unwrap().ratio, 0.49);
    assert_eq!(
        evaluation.risk(Condition::Ntd).unwrap().probability,
        (1.0 / 1000.0) * 0.7
    );
}
