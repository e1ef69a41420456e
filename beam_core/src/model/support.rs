//! Supports (restraints) along the beam

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clamp_position;
use crate::errors::{DiagramError, DiagramResult};

/// Support condition at a point on the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SupportKind {
    /// Pinned support - restrains translation, allows rotation
    Pin,
    /// Roller support - restrains the vertical direction only
    Roller,
    /// Fixed support - restrains translation and rotation
    Fixed,
}

impl SupportKind {
    /// All available support kinds for UI selection
    pub const ALL: [SupportKind; 3] = [SupportKind::Pin, SupportKind::Roller, SupportKind::Fixed];

    /// Returns true if this support restrains rotation
    pub fn restrains_rotation(&self) -> bool {
        matches!(self, SupportKind::Fixed)
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportKind::Pin => "Pin",
            SupportKind::Roller => "Roller",
            SupportKind::Fixed => "Fixed",
        }
    }

    /// Wire/JSON code
    pub fn code(&self) -> &'static str {
        match self {
            SupportKind::Pin => "pin",
            SupportKind::Roller => "roller",
            SupportKind::Fixed => "fixed",
        }
    }
}

impl FromStr for SupportKind {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pin" | "pinned" => Ok(SupportKind::Pin),
            "roller" => Ok(SupportKind::Roller),
            "fixed" => Ok(SupportKind::Fixed),
            other => Err(DiagramError::unknown_kind("support", other)),
        }
    }
}

impl TryFrom<String> for SupportKind {
    type Error = DiagramError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SupportKind> for String {
    fn from(kind: SupportKind) -> Self {
        kind.code().to_string()
    }
}

impl std::fmt::Display for SupportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A restraint at a position along the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub kind: SupportKind,

    /// Distance from the left end (m)
    pub position: f64,
}

impl Support {
    pub fn new(kind: SupportKind, position: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
        }
    }

    /// Copy with the position clamped onto `[0, length]`
    pub fn clamped(&self, length: f64) -> Support {
        Support {
            position: clamp_position(self.position, length),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> DiagramResult<()> {
        if !self.position.is_finite() {
            return Err(DiagramError::invalid_input(
                "support.position",
                self.position.to_string(),
                "Position must be a finite number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_kind_parse() {
        assert_eq!("pin".parse::<SupportKind>().unwrap(), SupportKind::Pin);
        assert_eq!(" Roller ".parse::<SupportKind>().unwrap(), SupportKind::Roller);
        assert_eq!("FIXED".parse::<SupportKind>().unwrap(), SupportKind::Fixed);

        let err = "hinge".parse::<SupportKind>().unwrap_err();
        assert_eq!(err, DiagramError::unknown_kind("support", "hinge"));
    }

    #[test]
    fn test_support_kind_serialization() {
        let json = serde_json::to_string(&SupportKind::Roller).unwrap();
        assert_eq!(json, "\"roller\"");
        let kind: SupportKind = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(kind, SupportKind::Fixed);
    }

    #[test]
    fn test_support_clamped() {
        let support = Support::new(SupportKind::Pin, 25.0);
        assert_eq!(support.clamped(20.0).position, 20.0);
        assert_eq!(Support::new(SupportKind::Pin, f64::NAN).clamped(20.0).position, 0.0);
    }

    #[test]
    fn test_support_validate() {
        assert!(Support::new(SupportKind::Fixed, 3.0).validate().is_ok());
        assert!(Support::new(SupportKind::Fixed, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_restrains_rotation() {
        assert!(SupportKind::Fixed.restrains_rotation());
        assert!(!SupportKind::Pin.restrains_rotation());
    }
}
