//! Diagram data types: entities, attributes and relationships.
//!
//! Everything here is plain data. Ownership lives in
//! [`DiagramStore`](crate::DiagramStore); history actions carry clones.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2D point or vector. Which space it lives in (screen or diagram) is up
/// to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (other - self).length()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Entity identifier, displayed as `column-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column-{}", self.0)
    }
}

/// Attribute identifier.
///
/// Seeded attributes are `field-N-1` / `field-N-2`; attributes added later embed
/// the owning entity id and a creation timestamp, so an id stays unique even
/// when the attribute is removed and re-added through undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub String);

impl AttributeId {
    pub fn seeded(entity: EntityId, ordinal: u32) -> Self {
        Self(format!("field-{}-{}", entity.0, ordinal))
    }

    pub fn timestamped(entity: EntityId, millis: u64) -> Self {
        Self(format!("field-{}-{}", entity, millis))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relationship identifier, displayed as `rel-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipId(pub u32);

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributeType {
    Int,
    #[default]
    String,
    Boolean,
    Date,
    Text,
    Float,
}

impl AttributeType {
    pub const ALL: [AttributeType; 6] = [
        AttributeType::Int,
        AttributeType::String,
        AttributeType::Boolean,
        AttributeType::Date,
        AttributeType::Text,
        AttributeType::Float,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeType::Int => "int",
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
            AttributeType::Text => "text",
            AttributeType::Float => "float",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
    pub attr_type: AttributeType,
    pub is_primary: bool,
}

impl Attribute {
    pub fn new(id: AttributeId, name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            id,
            name: name.into(),
            attr_type,
            is_primary: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

/// A placed table.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub z_index: i32,
}

impl Entity {
    /// New entity seeded with an `id` primary key and a `name` column.
    pub fn seeded(id: EntityId, position: Point, width: f32, height: f32, z_index: i32) -> Self {
        Self {
            id,
            name: format!("Table {}", id.0),
            attributes: vec![
                Attribute::new(AttributeId::seeded(id, 1), "id", AttributeType::Int).primary(),
                Attribute::new(AttributeId::seeded(id, 2), "name", AttributeType::String),
            ],
            position,
            width,
            height,
            z_index,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn attribute(&self, id: &AttributeId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| &a.id == id)
    }

    pub fn attribute_index(&self, id: &AttributeId) -> Option<usize> {
        self.attributes.iter().position(|a| &a.id == id)
    }
}

/// One end of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub entity: EntityId,
    pub attribute: AttributeId,
}

impl Endpoint {
    pub fn new(entity: EntityId, attribute: impl Into<AttributeId>) -> Self {
        Self {
            entity,
            attribute: attribute.into(),
        }
    }
}

impl From<String> for AttributeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Cardinality of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelationshipType {
    OneToOne,
    #[default]
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// Which end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl RelationshipType {
    /// Cycle order used when a relationship is clicked.
    pub const CYCLE: [RelationshipType; 4] = [
        RelationshipType::OneToOne,
        RelationshipType::OneToMany,
        RelationshipType::ManyToOne,
        RelationshipType::ManyToMany,
    ];

    pub fn next(self) -> Self {
        let i = Self::CYCLE.iter().position(|t| *t == self).unwrap_or(0);
        Self::CYCLE[(i + 1) % Self::CYCLE.len()]
    }

    /// Cardinality at the `from` and `to` ends.
    pub fn ends(self) -> (Cardinality, Cardinality) {
        match self {
            RelationshipType::OneToOne => (Cardinality::One, Cardinality::One),
            RelationshipType::OneToMany => (Cardinality::One, Cardinality::Many),
            RelationshipType::ManyToOne => (Cardinality::Many, Cardinality::One),
            RelationshipType::ManyToMany => (Cardinality::Many, Cardinality::Many),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "one-to-one",
            RelationshipType::OneToMany => "one-to-many",
            RelationshipType::ManyToOne => "many-to-one",
            RelationshipType::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: RelationshipId,
    pub from: Endpoint,
    pub to: Endpoint,
    pub rel_type: RelationshipType,
}

impl Relationship {
    pub fn touches_entity(&self, entity: EntityId) -> bool {
        self.from.entity == entity || self.to.entity == entity
    }

    pub fn touches_attribute(&self, entity: EntityId, attribute: &AttributeId) -> bool {
        (self.from.entity == entity && &self.from.attribute == attribute)
            || (self.to.entity == entity && &self.to.attribute == attribute)
    }
}
