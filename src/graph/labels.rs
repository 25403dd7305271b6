//! Enumerated attribute values
//!
//! Every enumeration serializes as its string label, never as a numeric code.

use serde::{Deserialize, Serialize};

/// Material classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    Concrete,
    Steel,
    Timber,
    Aluminium,
    Masonry,
    #[default]
    Other,
}

/// Cross-section profile shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionShape {
    Rectangular,
    Circular,
    #[serde(rename = "I")]
    IShape,
    Tube,
    Angle,
    Channel,
    Tee,
    #[default]
    General,
}

/// Structural role of a curve member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveMemberType {
    Beam,
    Column,
    Bracing,
    Rib,
    Truss,
    #[default]
    General,
}

/// Structural role of a surface member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceMemberType {
    Plate,
    Wall,
    Shell,
    #[default]
    General,
}

/// Where a curve member's analytical line sits relative to its section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemLine {
    #[default]
    Centre,
    Top,
    Bottom,
    Left,
    Right,
}

/// Where a surface member's analytical plane sits relative to its thickness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemPlane {
    #[default]
    Centre,
    Top,
    Bottom,
}

/// Length unit, serialized as its symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimetre,
    #[serde(rename = "cm")]
    Centimetre,
    #[default]
    #[serde(rename = "m")]
    Metre,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "ft")]
    Foot,
}

impl LengthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimetre => "mm",
            LengthUnit::Centimetre => "cm",
            LengthUnit::Metre => "m",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
        }
    }
}

/// Which end of a curve member a connection represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberEnd {
    Start,
    End,
}

impl MemberEnd {
    pub fn label(&self) -> &'static str {
        match self {
            MemberEnd::Start => "Start",
            MemberEnd::End => "End",
        }
    }
}
