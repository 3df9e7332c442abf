//! Print formats and paper finishes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing format or finish identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The identifier is not one of the supported print formats.
    #[error("unknown print format: {0}")]
    UnknownFormat(String),

    /// The identifier is not one of the supported paper finishes.
    #[error("unknown paper finish: {0}")]
    UnknownFinish(String),
}

/// Print size, in centimetres.
///
/// The set is closed: adding a size means updating the price catalog and the
/// storefront together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Format {
    /// 9x13 cm
    #[serde(rename = "9x13")]
    Cm9x13,

    /// 10x15 cm, the storefront default
    #[default]
    #[serde(rename = "10x15")]
    Cm10x15,

    /// 13x18 cm
    #[serde(rename = "13x18")]
    Cm13x18,

    /// 15x21 cm (A5)
    #[serde(rename = "15x21")]
    Cm15x21,

    /// 20x30 cm
    #[serde(rename = "20x30")]
    Cm20x30,

    /// 30x45 cm
    #[serde(rename = "30x45")]
    Cm30x45,
}

impl Format {
    /// Every supported format, smallest first.
    pub const ALL: [Format; 6] = [
        Format::Cm9x13,
        Format::Cm10x15,
        Format::Cm13x18,
        Format::Cm15x21,
        Format::Cm20x30,
        Format::Cm30x45,
    ];

    /// Return the identifier used by the storefront and settings store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Format::Cm9x13 => "9x13",
            Format::Cm10x15 => "10x15",
            Format::Cm13x18 => "13x18",
            Format::Cm15x21 => "15x21",
            Format::Cm20x30 => "20x30",
            Format::Cm30x45 => "30x45",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Storefront labels sometimes carry the unit ("10x15 cm").
        let id = trimmed.strip_suffix("cm").map_or(trimmed, str::trim_end);

        Format::ALL
            .into_iter()
            .find(|format| format.as_str() == id)
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

/// Paper finish. Carried through to fulfilment; it never affects price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    /// Glossy paper
    #[default]
    Glossy,

    /// Matte paper
    Matte,
}

impl Finish {
    /// Return the lowercase identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Finish::Glossy => "glossy",
            Finish::Matte => "matte",
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Finish {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glossy" => Ok(Finish::Glossy),
            "matte" => Ok(Finish::Matte),
            _ => Err(FormatError::UnknownFinish(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn format_round_trips_through_its_identifier() -> TestResult {
        for format in Format::ALL {
            assert_eq!(format.as_str().parse::<Format>()?, format);
        }

        Ok(())
    }

    #[test]
    fn format_parses_storefront_labels_with_unit() -> TestResult {
        assert_eq!("13x18 cm".parse::<Format>()?, Format::Cm13x18);
        assert_eq!(" 30x45cm ".parse::<Format>()?, Format::Cm30x45);

        Ok(())
    }

    #[test]
    fn format_rejects_unknown_identifiers() {
        assert_eq!(
            "11x11".parse::<Format>(),
            Err(FormatError::UnknownFormat("11x11".to_string()))
        );
    }

    #[test]
    fn default_format_is_10x15() {
        assert_eq!(Format::default(), Format::Cm10x15);
    }

    #[test]
    fn format_deserializes_from_identifier() -> TestResult {
        let format: Format = serde_json::from_str("\"20x30\"")?;

        assert_eq!(format, Format::Cm20x30);
        assert_eq!(serde_json::to_string(&Format::Cm9x13)?, "\"9x13\"");

        Ok(())
    }

    #[test]
    fn finish_parses_case_insensitively() -> TestResult {
        assert_eq!("Glossy".parse::<Finish>()?, Finish::Glossy);
        assert_eq!("MATTE".parse::<Finish>()?, Finish::Matte);
        assert!(matches!(
            "satin".parse::<Finish>(),
            Err(FormatError::UnknownFinish(_))
        ));

        Ok(())
    }
}
