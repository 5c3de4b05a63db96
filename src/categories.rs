//! Closed-set categorical values carried by [crate::network::Node]s and [crate::properties::Connection]s.
//!
//! Every category implements [Categorical], which exposes the allowed (lowercase) names and a
//! case-insensitive parser returning [HmnError::InvalidValue] for anything outside the set.
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::HmnError;

pub trait Categorical: Sized + Copy + 'static {
    /// Human readable name of the category, used in error messages.
    const KIND: &'static str;

    fn variants() -> &'static [Self];

    /// The canonical lowercase name of this value.
    fn name(&self) -> &'static str;

    fn allowed_values() -> Vec<&'static str> {
        Self::variants().iter().map(|v| v.name()).collect()
    }

    fn is_allowed(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    fn parse(value: &str) -> Result<Self, HmnError> {
        Self::variants()
            .iter()
            .find(|v| v.name().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| HmnError::invalid_value(Self::KIND, value))
    }
}

macro_rules! categorical_impls {
    ($ty:ty) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl FromStr for $ty {
            type Err = HmnError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Categorical>::parse(s)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = HmnError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                <$ty as Categorical>::parse(s)
            }
        }
    };
}

pub(crate) use categorical_impls;

/// Which endpoint of an edge a [crate::properties::Connection] describes.
///
/// A `Source` connection's trust is the source's trust in the sink, and its trustworthiness is
/// the sink's perception of the source. A `Sink` connection reads the other way around.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Source,
    Sink,
}

impl Role {
    pub fn opposite(&self) -> Role {
        match self {
            Role::Source => Role::Sink,
            Role::Sink => Role::Source,
        }
    }
}

impl Categorical for Role {
    const KIND: &'static str = "connection role";

    fn variants() -> &'static [Self] {
        &[Role::Source, Role::Sink]
    }

    fn name(&self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Sink => "sink",
        }
    }
}

categorical_impls!(Role);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Agender,
    Androgyne,
    #[default]
    Other,
}

impl Categorical for Gender {
    const KIND: &'static str = "gender";

    fn variants() -> &'static [Self] {
        &[
            Gender::Female,
            Gender::Male,
            Gender::Agender,
            Gender::Androgyne,
            Gender::Other,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Agender => "agender",
            Gender::Androgyne => "androgyne",
            Gender::Other => "other",
        }
    }
}

categorical_impls!(Gender);

/// Collective vs individualistic cultural orientation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Culture {
    Collective,
    Individualistic,
    #[default]
    Other,
}

impl Categorical for Culture {
    const KIND: &'static str = "culture";

    fn variants() -> &'static [Self] {
        &[Culture::Collective, Culture::Individualistic, Culture::Other]
    }

    fn name(&self) -> &'static str {
        match self {
            Culture::Collective => "collective",
            Culture::Individualistic => "individualistic",
            Culture::Other => "other",
        }
    }
}

categorical_impls!(Culture);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SexualOrientation {
    Heterosexual,
    Bisexual,
    Gay,
    Lesbian,
    Asexual,
    #[default]
    Other,
}

impl Categorical for SexualOrientation {
    const KIND: &'static str = "sexual orientation";

    fn variants() -> &'static [Self] {
        &[
            SexualOrientation::Heterosexual,
            SexualOrientation::Bisexual,
            SexualOrientation::Gay,
            SexualOrientation::Lesbian,
            SexualOrientation::Asexual,
            SexualOrientation::Other,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            SexualOrientation::Heterosexual => "heterosexual",
            SexualOrientation::Bisexual => "bisexual",
            SexualOrientation::Gay => "gay",
            SexualOrientation::Lesbian => "lesbian",
            SexualOrientation::Asexual => "asexual",
            SexualOrientation::Other => "other",
        }
    }
}

categorical_impls!(SexualOrientation);

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("SINK".parse::<Role>().unwrap(), Role::Sink);
        assert_eq!("sink".parse::<Role>().unwrap(), Role::Sink);
        assert_eq!(Role::try_from("Source").unwrap(), Role::Source);
        assert_eq!(Role::Source.opposite(), Role::Sink);
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "lateral".parse::<Role>().unwrap_err();
        assert_eq!(
            err,
            HmnError::InvalidValue {
                kind: "connection role".to_string(),
                value: "lateral".to_string()
            }
        );
        assert!(!Gender::is_allowed("robot"));
        assert!(Culture::parse("").is_err());
        assert!(Role::parse(" sink ").is_err());
        assert!(!Gender::is_allowed("female\n"));
    }

    #[test]
    fn test_allowed_values() {
        assert_eq!(Role::allowed_values(), vec!["source", "sink"]);
        assert_eq!(
            Gender::allowed_values(),
            vec!["female", "male", "agender", "androgyne", "other"]
        );
        assert_eq!(
            Culture::allowed_values(),
            vec!["collective", "individualistic", "other"]
        );
        assert_eq!(SexualOrientation::allowed_values().len(), 6);
        for value in SexualOrientation::allowed_values() {
            let parsed = SexualOrientation::parse(&value.to_uppercase()).unwrap();
            assert_eq!(parsed.to_string(), value);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Gender::Androgyne).unwrap(), "\"androgyne\"");
        let role: Role = serde_json::from_str("\"sink\"").unwrap();
        assert_eq!(role, Role::Sink);
    }
}
