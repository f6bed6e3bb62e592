/// Format backends implementing the codec contract (binary, SOAP, JSON, XML).
pub mod codec;
/// Demo configuration loading.
pub mod config;
/// Domain value model: products, kinds, packaging.
pub mod domain;
/// Common error types: codec failures, markup parsing.
pub mod error;
/// Markup document tree: writer, parser and queries.
pub mod markup;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Codec contract and the four format backends.
pub use codec::{
    BinaryCodec, BinaryDecode, BinaryEncode, Codec, JsonCodec, SoapCodec, TaggedDecode,
    TaggedEncode, XmlCodec, XmlDecode, XmlEncode,
};
/// config
pub use config::Settings;
/// Domain types: products and their parts.
pub use domain::{Candy, Edible, Packaging, Product, ProductInfo, ProductKind};
/// Operation errors and result types.
pub use error::{CodecError, CodecResult, ParseError};
/// Markup tree and query facility.
pub use markup::{
    descendants, parse_document, select_path, select_where, write_document, CmpOp, Condition,
    ConditionError, Descendants, Element, PathSelect, WhereSelect,
};
