use std::io::IsTerminal;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::patient::PatientContext;
use crate::scoring::{Evaluation, MomResult, RiskBand, RiskCategory, RiskResult};
use crate::tables::{Condition, RangeStatus};

/// Format a probability as a "1:N" odds string.
/// N is 1/p truncated, with thousands separated by a space ("1:1 428").
/// Non-positive probabilities render as "1:∞".
pub fn format_ratio(probability: f64) -> String {
    if probability.is_nan() || probability <= 0.0 {
        return "1:∞".to_string();
    }
    let n = (1.0 / probability).trunc() as u64;
    format!("1:{}", group_thousands(n))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Percentage with enough precision to distinguish small risks ("0.125%")
pub fn format_percent(probability: f64) -> String {
    format!("{:.3}%", probability * 100.0)
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

fn paint_category(category: RiskCategory, text: &str) -> String {
    match category.band() {
        RiskBand::Critical => text.red().bold().to_string(),
        RiskBand::High => text.red().to_string(),
        RiskBand::Medium => text.yellow().to_string(),
        RiskBand::Low => text.green().to_string(),
        RiskBand::Unknown => text.dimmed().to_string(),
    }
}

fn condition_title(condition: Condition) -> String {
    format!("{} ({})", condition.name(), condition.karyotype())
}

/// Format one row per condition: name, odds, percentage, category.
/// Name column: 32 chars, left-aligned. Odds column: 10 chars, right-aligned.
pub fn format_risk_table(evaluation: &Evaluation, use_colors: bool) -> String {
    if evaluation.risks.is_empty() {
        return "No risks computed.".to_string();
    }

    let highest = evaluation.highest_risk().map(|r| r.condition);

    evaluation
        .risks
        .iter()
        .map(|risk| {
            let title = format!("{:<32}", condition_title(risk.condition));
            let odds = format!("{:>10}", format_ratio(risk.probability));
            let percent = format!("{:>8}", format_percent(risk.probability));
            let mut label = risk.category.label().to_string();
            if risk.capped {
                label.push_str(" (capped)");
            }
            let marker = if Some(risk.condition) == highest { "*" } else { " " };

            if use_colors {
                format!(
                    "{} {}  {}  {}  {}",
                    marker.bold(),
                    title,
                    odds.bold(),
                    percent.dimmed(),
                    paint_category(risk.category, &label)
                )
            } else {
                format!("{} {}  {}  {}  {}", marker, title, odds, percent, label)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn range_label(range: RangeStatus) -> &'static str {
    match range {
        RangeStatus::Low => "low",
        RangeStatus::Normal => "normal",
        RangeStatus::High => "high",
    }
}

fn format_marker_line(marker: &MomResult, use_colors: bool) -> String {
    let name = format!("{:<11}", marker.analyte.label());
    let measured = format!("{:>9.2}", marker.measured);
    let mom = format!("MoM {:>5.2}", marker.ratio);
    let mut notes = range_label(marker.range).to_string();
    if marker.weight_corrected {
        notes.push_str(", weight-corrected");
    }
    if marker.above_cutoff == Some(true) {
        notes.push_str(", above cutoff");
    }

    if use_colors {
        let notes = match marker.range {
            RangeStatus::Normal => notes.green().to_string(),
            RangeStatus::Low | RangeStatus::High => notes.yellow().to_string(),
        };
        format!("{}  {}  {}  {}", name.bold(), measured, mom, notes)
    } else {
        format!("{}  {}  {}  {}", name, measured, mom, notes)
    }
}

/// Format normalised markers, one per line, in input order
pub fn format_marker_table(markers: &[MomResult], use_colors: bool) -> String {
    markers
        .iter()
        .map(|m| format_marker_line(m, use_colors))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full human-readable report: patient line, markers, risks
pub fn format_report(evaluation: &Evaluation, patient: &PatientContext, use_colors: bool) -> String {
    let mut header = format!(
        "Age {}, week {} ({} trimester)",
        patient.age, patient.gestational_week, evaluation.trimester
    );
    if let Some(bmi) = evaluation.bmi {
        header.push_str(&format!(", BMI {:.1} ({})", bmi.value, bmi.category.label()));
    }

    let mut sections = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];
    if !evaluation.markers.is_empty() {
        sections.push(format_marker_table(&evaluation.markers, use_colors));
    }
    sections.push(format_risk_table(evaluation, use_colors));
    sections.join("\n\n")
}

/// Format risks as tab-separated values for scripting
/// Columns: condition, probability, odds, category (no headers, no colors)
pub fn format_tsv(risks: &[RiskResult]) -> String {
    risks
        .iter()
        .map(|risk| {
            format!(
                "{}\t{}\t{}\t{}",
                risk.condition.key(),
                risk.probability,
                format_ratio(risk.probability),
                risk.category.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format sampled age curves as a grid: one row per age, one column per condition
pub fn format_curve(curves: &[(Condition, Vec<(u32, f64)>)]) -> String {
    let Some((_, first)) = curves.first() else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(first.len() + 1);
    let header: Vec<String> = curves
        .iter()
        .map(|(condition, _)| format!("{:>8}", condition.key()))
        .collect();
    lines.push(format!("age{}", header.join("")));

    for (row, (age, _)) in first.iter().enumerate() {
        let cells: Vec<String> = curves
            .iter()
            .map(|(_, points)| match points.get(row) {
                Some((_, m)) => format!("{:>8.2}", m),
                None => format!("{:>8}", "-"),
            })
            .collect();
        lines.push(format!("{:>3}{}", age, cells.join("")));
    }
    lines.join("\n")
}

#[derive(Debug, Serialize)]
struct RiskRow<'a> {
    condition: Condition,
    name: &'static str,
    karyotype: &'static str,
    probability: f64,
    odds: String,
    category: RiskCategory,
    label: &'static str,
    band: RiskBand,
    color: &'static str,
    capped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    age_multiplier: Option<f64>,
    factors: &'a [crate::scoring::FactorContribution],
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    evaluated_at: DateTime<Utc>,
    patient: &'a PatientContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    bmi: Option<crate::patient::Bmi>,
    markers: &'a [MomResult],
    risks: Vec<RiskRow<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highest_risk: Option<Condition>,
}

/// Pretty-printed JSON report stamped with `evaluated_at`
pub fn format_json(
    evaluation: &Evaluation,
    patient: &PatientContext,
    evaluated_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    let report = JsonReport {
        evaluated_at,
        patient,
        bmi: evaluation.bmi,
        markers: &evaluation.markers,
        risks: evaluation
            .risks
            .iter()
            .map(|risk| RiskRow {
                condition: risk.condition,
                name: risk.condition.name(),
                karyotype: risk.condition.karyotype(),
                probability: risk.probability,
                odds: format_ratio(risk.probability),
                category: risk.category,
                label: risk.category.label(),
                band: risk.category.band(),
                color: risk.category.color(),
                capped: risk.capped,
                age_multiplier: risk.age_multiplier,
                factors: &risk.factors,
            })
            .collect(),
        highest_risk: evaluation.highest_risk().map(|r| r.condition),
    };
    serde_json::to_string_pretty(&report)
}
