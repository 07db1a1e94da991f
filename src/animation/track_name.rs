use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The transform property a track animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    Position,   // xyz
    Quaternion, // xyzw
    Scale,      // xyz
}

impl TrackProperty {
    /// Number of numeric components per sample.
    #[inline]
    #[must_use]
    pub fn components(self) -> usize {
        match self {
            Self::Position | Self::Scale => 3,
            Self::Quaternion => 4,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Quaternion => "quaternion",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for TrackProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackProperty {
    type Err = TrackNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(Self::Position),
            "quaternion" => Ok(Self::Quaternion),
            "scale" => Ok(Self::Scale),
            other => Err(TrackNameError::UnsupportedProperty(other.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackNameError {
    #[error("track name has no '.' separating bone and property")]
    MissingSeparator,

    #[error("track name has an empty bone identifier")]
    EmptyBone,

    #[error("track name has an empty property")]
    EmptyProperty,

    #[error("unsupported track property '{0}'")]
    UnsupportedProperty(String),
}

/// Borrowed view of a `[prefix:]bone.property` track name.
///
/// The property is everything after the last `.`, so bone identifiers that
/// contain dots (`Bone.001.quaternion`) keep them. The prefix is everything up
/// to the last `:` of the bone part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackName<'a> {
    pub prefix: Option<&'a str>,
    pub bone: &'a str,
    pub property: TrackProperty,
}

impl<'a> TrackName<'a> {
    pub fn parse(name: &'a str) -> Result<Self, TrackNameError> {
        let (qualified_bone, property) = name
            .rsplit_once('.')
            .ok_or(TrackNameError::MissingSeparator)?;

        if property.is_empty() {
            return Err(TrackNameError::EmptyProperty);
        }

        let (prefix, bone) = match qualified_bone.rsplit_once(':') {
            Some((prefix, bone)) => (Some(prefix), bone),
            None => (None, qualified_bone),
        };

        if bone.is_empty() {
            return Err(TrackNameError::EmptyBone);
        }

        Ok(Self {
            prefix,
            bone,
            property: property.parse()?,
        })
    }

    /// The bone identifier including its prefix, as it appeared in the name.
    #[must_use]
    pub fn qualified_bone(&self) -> String {
        match self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.bone),
            None => self.bone.to_string(),
        }
    }
}

/// Builds the `<node>.<property>` name used to address a destination node.
#[inline]
#[must_use]
pub fn track_name(node_name: &str, property: TrackProperty) -> String {
    format!("{node_name}.{property}")
}
