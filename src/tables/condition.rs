use serde::{Deserialize, Serialize};
use std::fmt;

/// Conditions the engine produces a risk estimate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Downs,
    Edwards,
    Patau,
    Turner,
    Ntd,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Downs,
        Condition::Edwards,
        Condition::Patau,
        Condition::Turner,
        Condition::Ntd,
    ];

    /// Conditions whose prior is scaled by maternal age
    pub const AGE_SCALED: [Condition; 4] = [
        Condition::Downs,
        Condition::Edwards,
        Condition::Patau,
        Condition::Turner,
    ];

    pub fn is_age_scaled(self) -> bool {
        self != Condition::Ntd
    }

    pub fn key(self) -> &'static str {
        match self {
            Condition::Downs => "downs",
            Condition::Edwards => "edwards",
            Condition::Patau => "patau",
            Condition::Turner => "turner",
            Condition::Ntd => "ntd",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Condition::Downs => "Down syndrome",
            Condition::Edwards => "Edwards syndrome",
            Condition::Patau => "Patau syndrome",
            Condition::Turner => "Turner syndrome",
            Condition::Ntd => "Neural tube defect",
        }
    }

    /// Karyotype or defect class shown next to the name
    pub fn karyotype(self) -> &'static str {
        match self {
            Condition::Downs => "Trisomy 21",
            Condition::Edwards => "Trisomy 18",
            Condition::Patau => "Trisomy 13",
            Condition::Turner => "45,X",
            Condition::Ntd => "NTD",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
