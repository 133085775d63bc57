//! Policy Side Value Object
//!
//! Naming transforms can apply to the manifest key (the input side), to the
//! recorded output path (the output side), to both, or to neither. Config
//! files spell this as `false | true | "input" | "output"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which side of a manifest entry a naming transform applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Off,
    Input,
    Output,
    Both,
}

impl Side {
    /// Whether the manifest key is transformed
    pub fn covers_input(self) -> bool {
        matches!(self, Side::Input | Side::Both)
    }

    /// Whether the recorded output path is transformed
    pub fn covers_output(self) -> bool {
        matches!(self, Side::Output | Side::Both)
    }

    pub fn is_off(self) -> bool {
        self == Side::Off
    }
}

impl From<bool> for Side {
    fn from(enabled: bool) -> Self {
        if enabled {
            Side::Both
        } else {
            Side::Off
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Off => "false",
            Side::Input => "input",
            Side::Output => "output",
            Side::Both => "true",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "false" | "0" | "off" | "no" => Ok(Side::Off),
            "true" | "1" | "on" | "yes" | "both" => Ok(Side::Both),
            "input" => Ok(Side::Input),
            "output" => Ok(Side::Output),
            other => Err(format!(
                "invalid side '{}': expected true, false, \"input\" or \"output\"",
                other
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SideDe {
    Flag(bool),
    Name(String),
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match SideDe::deserialize(deserializer)? {
            SideDe::Flag(enabled) => Ok(Side::from(enabled)),
            SideDe::Name(name) => match name.as_str() {
                "input" => Ok(Side::Input),
                "output" => Ok(Side::Output),
                other => Err(serde::de::Error::custom(format!(
                    "expected true, false, \"input\" or \"output\", found \"{}\"",
                    other
                ))),
            },
        }
    }
}

impl Serialize for Side {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Side::Off => serializer.serialize_bool(false),
            Side::Both => serializer.serialize_bool(true),
            Side::Input => serializer.serialize_str("input"),
            Side::Output => serializer.serialize_str("output"),
        }
    }
}
