//! The closed vocabulary of condition types, statuses and reasons this
//! controller reads and writes.
//!
//! New conditions are added by widening these enums; free-form types and
//! reasons are never produced.

use std::{fmt, str::FromStr};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionType {
    NotImplemented,
    ResolvedRefs,
    /// Reported on a GatewayClass rather than on routes.
    Admitted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Reason {
    NotImplemented,
    PathMatchType,
    HeaderMatchType,
    HttpRouteFilterType,
    Degraded,
    Valid,
    ErrorsExist,
    GatewayAllowMismatch,
    Invalid,
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown condition type: {0}")]
    ConditionType(String),

    #[error("unknown condition status: {0}")]
    ConditionStatus(String),

    #[error("unknown condition reason: {0}")]
    Reason(String),
}

// === impl ConditionType ===

impl ConditionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotImplemented => "NotImplemented",
            Self::ResolvedRefs => "ResolvedRefs",
            Self::Admitted => "Admitted",
        }
    }

    /// The reasons that may accompany this condition type.
    pub const fn reasons(&self) -> &'static [Reason] {
        match self {
            Self::NotImplemented => &[Reason::NotImplemented],
            Self::ResolvedRefs => &[
                Reason::PathMatchType,
                Reason::HeaderMatchType,
                Reason::HttpRouteFilterType,
                Reason::Degraded,
                Reason::Valid,
                Reason::ErrorsExist,
                Reason::GatewayAllowMismatch,
            ],
            Self::Admitted => &[Reason::Valid, Reason::Invalid],
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotImplemented" => Ok(Self::NotImplemented),
            "ResolvedRefs" => Ok(Self::ResolvedRefs),
            "Admitted" => Ok(Self::Admitted),
            _ => Err(ParseError::ConditionType(s.to_string())),
        }
    }
}

// === impl ConditionStatus ===

impl ConditionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<bool> for ConditionStatus {
    fn from(b: bool) -> Self {
        if b {
            Self::True
        } else {
            Self::False
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(Self::True),
            "False" => Ok(Self::False),
            "Unknown" => Ok(Self::Unknown),
            _ => Err(ParseError::ConditionStatus(s.to_string())),
        }
    }
}

// === impl Reason ===

impl Reason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotImplemented => "NotImplemented",
            Self::PathMatchType => "PathMatchType",
            Self::HeaderMatchType => "HeaderMatchType",
            Self::HttpRouteFilterType => "HTTPRouteFilterType",
            Self::Degraded => "Degraded",
            Self::Valid => "Valid",
            Self::ErrorsExist => "ErrorsExist",
            Self::GatewayAllowMismatch => "GatewayAllowMismatch",
            Self::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reason {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotImplemented" => Ok(Self::NotImplemented),
            "PathMatchType" => Ok(Self::PathMatchType),
            "HeaderMatchType" => Ok(Self::HeaderMatchType),
            "HTTPRouteFilterType" => Ok(Self::HttpRouteFilterType),
            "Degraded" => Ok(Self::Degraded),
            "Valid" => Ok(Self::Valid),
            "ErrorsExist" => Ok(Self::ErrorsExist),
            "GatewayAllowMismatch" => Ok(Self::GatewayAllowMismatch),
            "Invalid" => Ok(Self::Invalid),
            _ => Err(ParseError::Reason(s.to_string())),
        }
    }
}
