use std::{
    fmt,
    hash::{Hash, Hasher},
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::Packaging;

/// Closed set of product kinds.
///
/// Every encoding writes the symbolic name, so the discriminant order carries
/// no meaning and may change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductKind {
    #[default]
    Hard,
    Soft,
    Chewy,
    Gummy,
}

impl ProductKind {
    /// Symbolic name, as written by the markup backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Hard => "Hard",
            ProductKind::Soft => "Soft",
            ProductKind::Chewy => "Chewy",
            ProductKind::Gummy => "Gummy",
        }
    }

    /// Inverse of [`ProductKind::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Hard" => Some(ProductKind::Hard),
            "Soft" => Some(ProductKind::Soft),
            "Chewy" => Some(ProductKind::Chewy),
            "Gummy" => Some(ProductKind::Gummy),
            _ => None,
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common fields shared by every product variant, embedded by value.
///
/// None of the fields is validated: an empty name, a negative weight or an
/// out-of-range sugar content are accepted as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub weight: f64,
    pub kind: ProductKind,
    pub packaging: Packaging,
    pub sugar_content: f64,
}

impl ProductInfo {
    // Identity covers name, weight and kind only. Packaging, sugar content
    // and variant extras never participate: deduplication and the round-trip
    // tests rely on exactly these three fields.
    fn identity_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && OrderedFloat(self.weight) == OrderedFloat(other.weight)
            && self.kind == other.kind
    }

    fn identity_hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        OrderedFloat(self.weight).hash(state);
        self.kind.hash(state);
    }
}

/// Capability of anything that can be eaten.
pub trait Edible {
    fn eat(&self) -> String;
}

/// Concrete product variant: a candy with a flavor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candy {
    #[serde(flatten)]
    pub info: ProductInfo,
    pub flavor: String,
}

impl Candy {
    pub fn new(
        name: impl Into<String>,
        weight: f64,
        flavor: impl Into<String>,
        kind: ProductKind,
        packaging: Packaging,
        sugar_content: f64,
    ) -> Self {
        Self {
            info: ProductInfo {
                name: name.into(),
                weight,
                kind,
                packaging,
                sugar_content,
            },
            flavor: flavor.into(),
        }
    }
}

// Equality/hash are hand-written on purpose: deriving them would drag
// flavor/packaging/sugar_content into the identity.
impl PartialEq for Candy {
    fn eq(&self, other: &Self) -> bool {
        self.info.identity_eq(&other.info)
    }
}

// Total thanks to OrderedFloat in identity_eq (NaN == NaN).
impl Eq for Candy {}

impl Hash for Candy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.identity_hash(state);
    }
}

impl fmt::Display for Candy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Weight: {}, Flavor: {}, Kind: {}, Packaging: {}",
            self.info.name, self.info.weight, self.flavor, self.info.kind, self.info.packaging
        )
    }
}

impl Edible for Candy {
    fn eat(&self) -> String {
        format!("You are eating {} flavored candy", self.flavor)
    }
}

/// Polymorphic product.
///
/// A single concrete variant exists today, but nothing may assume that: the
/// tagged backend dispatches on the type tag and new variants slot into the
/// existing match arms.
#[derive(Debug, Clone)]
pub enum Product {
    Candy(Candy),
}

impl Product {
    /// Common fields of whichever variant this is.
    pub fn info(&self) -> &ProductInfo {
        match self {
            Product::Candy(c) => &c.info,
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.info().identity_eq(other.info())
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info().identity_hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Candy(c) => fmt::Display::fmt(c, f),
        }
    }
}

impl Edible for Product {
    fn eat(&self) -> String {
        match self {
            Product::Candy(c) => c.eat(),
        }
    }
}
