//! Concrete entity records
//!
//! Each record is a flat attribute holder. Records carry no identity or
//! lifecycle behaviour of their own: identity is chosen per kind in
//! [`super::identity`], and relationships live in the model.

use super::entity::{Domain, EntityHandle};
use super::labels::{
    CurveMemberType, LengthUnit, MaterialType, SectionShape, SurfaceMemberType, SystemLine,
    SystemPlane,
};
use serde::{Deserialize, Serialize};

/// Kind tag of a concrete entity record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Point3D,
    LineSegment,
    ArcSegment,
    Storey,
    Material,
    CrossSection,
    Beam,
    Column,
    Wall,
    Slab,
    PointConnection,
    CurveMember,
    SurfaceMember,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Point3D => "Point3D",
            EntityKind::LineSegment => "LineSegment",
            EntityKind::ArcSegment => "ArcSegment",
            EntityKind::Storey => "Storey",
            EntityKind::Material => "Material",
            EntityKind::CrossSection => "CrossSection",
            EntityKind::Beam => "Beam",
            EntityKind::Column => "Column",
            EntityKind::Wall => "Wall",
            EntityKind::Slab => "Slab",
            EntityKind::PointConnection => "PointConnection",
            EntityKind::CurveMember => "CurveMember",
            EntityKind::SurfaceMember => "SurfaceMember",
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            EntityKind::Point3D | EntityKind::LineSegment | EntityKind::ArcSegment => {
                Domain::Geometry
            }
            EntityKind::Storey => Domain::Functional,
            EntityKind::Material | EntityKind::CrossSection => Domain::Shared,
            EntityKind::Beam | EntityKind::Column | EntityKind::Wall | EntityKind::Slab => {
                Domain::Physical
            }
            EntityKind::PointConnection | EntityKind::CurveMember | EntityKind::SurfaceMember => {
                Domain::StructuralAnalytical
            }
        }
    }

    pub fn is_segment(&self) -> bool {
        matches!(self, EntityKind::LineSegment | EntityKind::ArcSegment)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed access to one variant of [`EntityAttributes`]
pub trait EntityRecord: Into<EntityAttributes> {
    const KIND: EntityKind;

    fn from_attributes(attributes: &EntityAttributes) -> Option<&Self>;

    fn from_attributes_mut(attributes: &mut EntityAttributes) -> Option<&mut Self>;
}

macro_rules! entity_records {
    ($($kind:ident),* $(,)?) => {
        /// Kind-specific attributes of an entity
        ///
        /// Serialized with an `entityKind` tag so that the attributes can be
        /// flattened into an exchange-document node.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "entityKind")]
        pub enum EntityAttributes {
            $($kind($kind),)*
        }

        impl EntityAttributes {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(EntityAttributes::$kind(_) => EntityKind::$kind,)*
                }
            }

            /// Every numeric attribute paired with its field name
            pub(crate) fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
                match self {
                    $(EntityAttributes::$kind(record) => record.numeric_fields(),)*
                }
            }
        }

        $(
            impl From<$kind> for EntityAttributes {
                fn from(record: $kind) -> Self {
                    EntityAttributes::$kind(record)
                }
            }

            impl EntityRecord for $kind {
                const KIND: EntityKind = EntityKind::$kind;

                fn from_attributes(attributes: &EntityAttributes) -> Option<&Self> {
                    match attributes {
                        EntityAttributes::$kind(record) => Some(record),
                        _ => None,
                    }
                }

                fn from_attributes_mut(attributes: &mut EntityAttributes) -> Option<&mut Self> {
                    match attributes {
                        EntityAttributes::$kind(record) => Some(record),
                        _ => None,
                    }
                }
            }
        )*
    };
}

entity_records! {
    Point3D,
    LineSegment,
    ArcSegment,
    Storey,
    Material,
    CrossSection,
    Beam,
    Column,
    Wall,
    Slab,
    PointConnection,
    CurveMember,
    SurfaceMember,
}

fn push_triple(out: &mut Vec<(&'static str, f64)>, field: &'static str, value: [f64; 3]) {
    out.extend(value.iter().map(|v| (field, *v)));
}

// === Geometry ===

/// A point in model space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn coordinates(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("x", self.x), ("y", self.y), ("z", self.z)]
    }
}

/// Straight segment of a member's path
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineSegment {
    pub start: [f64; 3],
    pub end: [f64; 3],
}

impl LineSegment {
    pub fn new(start: [f64; 3], end: [f64; 3]) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut out = Vec::with_capacity(6);
        push_triple(&mut out, "start", self.start);
        push_triple(&mut out, "end", self.end);
        out
    }
}

/// Circular arc through three points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArcSegment {
    pub start: [f64; 3],
    pub intermediate: [f64; 3],
    pub end: [f64; 3],
}

impl ArcSegment {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut out = Vec::with_capacity(9);
        push_triple(&mut out, "start", self.start);
        push_triple(&mut out, "intermediate", self.intermediate);
        push_triple(&mut out, "end", self.end);
        out
    }
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(p, q)| (q - p) * (q - p))
        .sum::<f64>()
        .sqrt()
}

// === Functional / shared ===

/// Building level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Storey {
    pub elevation: f64,
    pub height: f64,
    pub length_unit: LengthUnit,
}

impl Storey {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("elevation", self.elevation), ("height", self.height)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Material {
    pub material_type: MaterialType,
    pub grade: String,
    pub elastic_modulus: f64,
    pub shear_modulus: f64,
    pub poisson_ratio: f64,
    pub density: f64,
    pub thermal_expansion: f64,
}

impl Material {
    pub fn new(material_type: MaterialType, grade: impl Into<String>) -> Self {
        Self {
            material_type,
            grade: grade.into(),
            ..Default::default()
        }
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("elasticModulus", self.elastic_modulus),
            ("shearModulus", self.shear_modulus),
            ("poissonRatio", self.poisson_ratio),
            ("density", self.density),
            ("thermalExpansion", self.thermal_expansion),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrossSection {
    pub shape: SectionShape,
    pub area: f64,
    pub second_moment_y: f64,
    pub second_moment_z: f64,
    pub torsional_constant: f64,
    pub length_unit: LengthUnit,
}

impl CrossSection {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("area", self.area),
            ("secondMomentY", self.second_moment_y),
            ("secondMomentZ", self.second_moment_z),
            ("torsionalConstant", self.torsional_constant),
        ]
    }
}

// === Physical ===

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Beam {
    pub length: f64,
    /// Rotation about the member axis, in degrees
    pub rotation: f64,
}

impl Beam {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("length", self.length), ("rotation", self.rotation)]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Column {
    pub length: f64,
    pub rotation: f64,
}

impl Column {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("length", self.length), ("rotation", self.rotation)]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Wall {
    pub thickness: f64,
    pub area: f64,
}

impl Wall {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("thickness", self.thickness), ("area", self.area)]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Slab {
    pub thickness: f64,
    pub area: f64,
}

impl Slab {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("thickness", self.thickness), ("area", self.area)]
    }
}

// === Structural analytical ===

/// Analytical node
///
/// `point` and `storey` start unset unless supplied at construction and may be
/// assigned later through the model. In exchange documents they are carried
/// by `ConnectionToPoint` and `ElementToStorey` edges rather than node fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointConnection {
    #[serde(skip)]
    pub point: Option<EntityHandle>,
    #[serde(skip)]
    pub storey: Option<EntityHandle>,
}

impl PointConnection {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        Vec::new()
    }
}

/// Analytical line element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurveMember {
    pub member_type: CurveMemberType,
    pub system_line: SystemLine,
    pub length: f64,
    pub local_axis_y: [f64; 3],
    pub local_axis_z: [f64; 3],
}

impl Default for CurveMember {
    fn default() -> Self {
        Self {
            member_type: CurveMemberType::default(),
            system_line: SystemLine::default(),
            length: 0.0,
            local_axis_y: [0.0, 1.0, 0.0],
            local_axis_z: [0.0, 0.0, 1.0],
        }
    }
}

impl CurveMember {
    pub fn new(member_type: CurveMemberType, length: f64) -> Self {
        Self {
            member_type,
            length,
            ..Default::default()
        }
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![("length", self.length)];
        push_triple(&mut out, "localAxisY", self.local_axis_y);
        push_triple(&mut out, "localAxisZ", self.local_axis_z);
        out
    }
}

/// Analytical surface element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceMember {
    pub surface_type: SurfaceMemberType,
    pub system_plane: SystemPlane,
    pub thickness: f64,
}

impl SurfaceMember {
    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("thickness", self.thickness)]
    }
}
