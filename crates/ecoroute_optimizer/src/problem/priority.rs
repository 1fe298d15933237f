use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Delivery priority tier. Anything that is not a known tier is `Unclassified`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    Express,
    Standard,
    #[default]
    Unclassified,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::Express,
        Priority::Standard,
        Priority::Unclassified,
    ];

    /// Cost of leaving an order of this tier unvisited.
    pub const fn drop_penalty(self) -> i64 {
        match self {
            Priority::Urgent => 200_000,
            Priority::Express => 100_000,
            Priority::Standard => 10_000,
            Priority::Unclassified => 10_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::Express => "express",
            Priority::Standard => "standard",
            Priority::Unclassified => "unclassified",
        }
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "urgent" => Priority::Urgent,
            "express" => Priority::Express,
            "standard" => Priority::Standard,
            _ => Priority::Unclassified,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(Priority::from(" URGENT "), Priority::Urgent);
        assert_eq!(Priority::from("Express"), Priority::Express);
        assert_eq!(Priority::from("standard"), Priority::Standard);
        assert_eq!(Priority::from("0"), Priority::Unclassified);
        assert_eq!(Priority::from(""), Priority::Unclassified);
    }

    #[test]
    fn test_penalties_are_strictly_ordered() {
        assert!(Priority::Urgent.drop_penalty() > Priority::Express.drop_penalty());
        assert!(Priority::Express.drop_penalty() > Priority::Standard.drop_penalty());
        assert_eq!(
            Priority::Standard.drop_penalty(),
            Priority::Unclassified.drop_penalty()
        );
    }

    #[test]
    fn test_penalties_follow_tier_order() {
        for pair in Priority::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].drop_penalty() >= pair[1].drop_penalty());
        }
    }
}
