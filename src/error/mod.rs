pub mod codec;
pub mod markup;

pub use codec::{CodecError, CodecResult};
pub use markup::ParseError;
