//! The recognised `setoption` knobs (`spec.md` section 4.5) and the
//! option list advertised to the host in response to `uci`.

use std::fmt;

/// One configuration knob the host can set with `setoption name X value
/// Y`. Matched case-insensitively against the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptionName {
    Threads,
    MultiPv,
    PlayBad,
    StartAgro,
    SyzygyPath,
    Ponder,
}

impl OptionName {
    /// Matches a `setoption` name case-insensitively. Returns `None` for
    /// anything not in the recognised set; the caller replies `info
    /// option '<name>' not found`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "threads" => Some(Self::Threads),
            "multipv" => Some(Self::MultiPv),
            "playbad" => Some(Self::PlayBad),
            "startagro" => Some(Self::StartAgro),
            "syzygypath" => Some(Self::SyzygyPath),
            "ponder" => Some(Self::Ponder),
            _ => None,
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Threads => "Threads",
            Self::MultiPv => "MultiPV",
            Self::PlayBad => "PlayBad",
            Self::StartAgro => "StartAgro",
            Self::SyzygyPath => "SyzygyPath",
            Self::Ponder => "Ponder",
        };
        write!(f, "{name}")
    }
}

/// Parses a UCI boolean option value (`true`/`false`, case-insensitive).
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// The option advertised in response to `uci`: `option name <n> type <t>
/// default <v> [min <m> max <M>]`.
pub struct OptionAdvert {
    pub name: &'static str,
    pub kind: &'static str,
    pub default: &'static str,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl fmt::Display for OptionAdvert {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "option name {} type {} default {}", self.name, self.kind, self.default)?;
        if let (Some(min), Some(max)) = (self.min, self.max) {
            write!(f, " min {min} max {max}")?;
        }
        Ok(())
    }
}

/// The full option list, in advertisement order.
pub const ADVERTISED_OPTIONS: &[OptionAdvert] = &[
    OptionAdvert { name: "Threads", kind: "spin", default: "1", min: Some(1), max: Some(512) },
    OptionAdvert { name: "MultiPV", kind: "spin", default: "4", min: Some(1), max: Some(32) },
    OptionAdvert { name: "PlayBad", kind: "check", default: "false", min: None, max: None },
    OptionAdvert { name: "StartAgro", kind: "check", default: "false", min: None, max: None },
    OptionAdvert { name: "SyzygyPath", kind: "string", default: "<empty>", min: None, max: None },
    OptionAdvert { name: "Ponder", kind: "check", default: "false", min: None, max: None },
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn option_names_are_case_insensitive() {
        assert_eq!(OptionName::parse("threads"), Some(OptionName::Threads));
        assert_eq!(OptionName::parse("PLAYBAD"), Some(OptionName::PlayBad));
        assert_eq!(OptionName::parse("SyzygyPath"), Some(OptionName::SyzygyPath));
        assert_eq!(OptionName::parse("nonsense"), None);
    }

    #[test]
    fn bool_parsing() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nonsense"));
    }

    #[test]
    fn advert_formats_min_max_when_present() {
        let advert = &ADVERTISED_OPTIONS[0];
        assert_eq!(advert.to_string(), "option name Threads type spin default 1 min 1 max 512");
    }
}
