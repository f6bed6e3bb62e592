//! Константы бинарного формата.
//!
//! Поток открывается магией, версией и однобайтовым тегом корневого типа;
//! проверяются все три, поэтому чужой документ падает с понятной ошибкой,
//! а не читается в мусор.

use crate::CodecError;

/// «Магическое» начало файла: ASCII-буквы «ZFR».
pub const FILE_MAGIC: &[u8; 3] = b"ZFR";

/// Packaging
pub const TAG_PACKAGING: u8 = 0x01;
/// Candy
pub const TAG_CANDY: u8 = 0x02;
/// Последовательность значений одного типа
pub const TAG_SEQ: u8 = 0x03;

/// Поддерживаемые версии бинарного формата.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    V1 = 1,
}

impl TryFrom<u8> for FormatVersion {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, CodecError> {
        match value {
            1 => Ok(FormatVersion::V1),
            other => Err(CodecError::Malformed(format!(
                "Unsupported format version: {other}"
            ))),
        }
    }
}

/// Текущая версия формата, как число.
pub const FORMAT_VERSION: u8 = FormatVersion::V1 as u8;
