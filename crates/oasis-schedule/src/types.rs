use serde::{Deserialize, Serialize};

/// How often a repeating habit comes due. Closed set — there are no custom
/// intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepetitionKind {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for RepetitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RepetitionKind::Daily => "daily",
            RepetitionKind::Weekly => "weekly",
            RepetitionKind::Monthly => "monthly",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RepetitionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RepetitionKind::Daily),
            "weekly" => Ok(RepetitionKind::Weekly),
            "monthly" => Ok(RepetitionKind::Monthly),
            other => Err(format!("unknown repetition kind: {other}")),
        }
    }
}
