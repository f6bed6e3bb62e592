pub mod packaging;
pub mod product;

pub use packaging::Packaging;
pub use product::{Candy, Edible, Product, ProductInfo, ProductKind};
