use serde::{Deserialize, Serialize};

/// The side a team argues in a single debate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "proposition")]
    Proposition,
    #[serde(rename = "opposition")]
    Opposition,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Proposition => Side::Opposition,
            Side::Opposition => Side::Proposition,
        }
    }

    /// The human-readable name of the side.
    pub fn name(self, short: bool) -> &'static str {
        match (self, short) {
            (Side::Proposition, true) => "Prop",
            (Side::Proposition, false) => "Proposition",
            (Side::Opposition, true) => "Opp",
            (Side::Opposition, false) => "Opposition",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name(false))
    }
}

#[cfg(test)]
#[test]
fn test_side_names() {
    assert_eq!(Side::Proposition.name(true), "Prop");
    assert_eq!(Side::Opposition.to_string(), "Opposition");
    assert_eq!(Side::Opposition.opposite(), Side::Proposition);
    assert_eq!(
        serde_json::to_string(&Side::Proposition).unwrap(),
        "\"proposition\""
    );
}
