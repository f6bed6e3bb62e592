use std::fmt;

use serde::{Deserialize, Serialize};

/// Packaging of a product: material plus outer dimensions in centimeters.
///
/// Plain value type, compared and formatted by value. The core never mutates
/// it after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packaging {
    pub material: String,
    pub width: f64,
    pub height: f64,
}

impl Packaging {
    pub fn new(material: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            material: material.into(),
            width,
            height,
        }
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Material: {}, Width: {} cm, Height: {} cm",
            self.material, self.width, self.height
        )
    }
}
