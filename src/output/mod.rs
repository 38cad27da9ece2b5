pub mod formatter;

pub use formatter::{
    format_curve, format_json, format_marker_table, format_percent, format_ratio, format_report,
    format_risk_table, format_tsv, should_use_colors,
};
