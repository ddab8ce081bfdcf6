pub mod answers;
pub mod quiz;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Practice,
    Test,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Practice => "practice",
            Mode::Test => "test",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Practice => "Practice",
            Mode::Test => "Test",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Test).unwrap(), "\"test\"");
        let mode: Mode = serde_json::from_str("\"practice\"").unwrap();
        assert_eq!(mode, Mode::Practice);
        assert!(serde_json::from_str::<Mode>("\"exam\"").is_err());
    }
}
