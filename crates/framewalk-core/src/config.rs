use serde::{Deserialize, Serialize};

/// How much per-record detail dissectors render.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    #[default]
    Terse,
    Verbose,
    VeryVerbose,
}

impl Verbosity {
    /// Map a `-v` count onto a level; anything above 2 is treated as 2.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Terse,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Verbosity::Terse => 0,
            Verbosity::Verbose => 1,
            Verbosity::VeryVerbose => 2,
        }
    }
}

/// Rendering policy passed into every dissection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DissectOptions {
    /// Resolve addresses and ports to names instead of printing them numerically.
    pub resolve_names: bool,
    pub verbosity: Verbosity,
    /// Print link-layer addresses on the link-layer line.
    pub emit_link_addresses: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels_clamp() {
        assert_eq!(Verbosity::from_level(0), Verbosity::Terse);
        assert_eq!(Verbosity::from_level(1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_level(7), Verbosity::VeryVerbose);
        assert_eq!(Verbosity::from_level(7).level(), 2);
    }

    #[test]
    fn options_default_is_numeric_and_terse() {
        let options = DissectOptions::default();
        assert!(!options.resolve_names);
        assert_eq!(options.verbosity, Verbosity::Terse);
        assert!(!options.emit_link_addresses);
    }

    #[test]
    fn options_round_trip_through_json() {
        let options = DissectOptions {
            resolve_names: true,
            verbosity: Verbosity::VeryVerbose,
            emit_link_addresses: true,
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"very_verbose\""));
        let parsed: DissectOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, options);
    }
}
