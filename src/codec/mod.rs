//! Кодеки: четыре независимых бэкенда одного контракта.
//!
//! ## Модули
//!
//! - [`binary`] — компактный бинарный формат (магия, версия, тег типа)
//! - [`soap`] — markup с тегом типа на каждом узле, полиморфный декодинг
//! - [`json`] — текстовый структурный формат поверх serde_json
//! - [`xml`] — markup по статической раскладке полей, вход для запросов
//! - [`tags`] — константы бинарного формата
//!
//! Бэкенд выбирает вызывающая сторона; round-trip гарантирован только в
//! пределах одного бэкенда.

pub mod binary;
pub mod json;
pub mod soap;
pub mod tags;
pub mod xml;

pub use binary::{BinaryCodec, BinaryDecode, BinaryEncode};
pub use json::JsonCodec;
pub use soap::{SoapCodec, TaggedDecode, TaggedEncode};
pub use xml::{XmlCodec, XmlDecode, XmlEncode};

use std::path::Path;

use crate::CodecResult;

/// Format-specific serialize/deserialize of typed values.
///
/// One logical document per call. There is no partial-write recovery: a
/// failed serialize may leave a truncated artifact behind. The file handle is
/// owned by the call and released on every exit path.
pub trait Codec<T> {
    /// Writes `value` as one document at `path`, replacing previous content.
    fn serialize(&self, value: &T, path: &Path) -> CodecResult<()>;

    /// Reads back one document written by this same backend.
    fn deserialize(&self, path: &Path) -> CodecResult<T>;
}
