//! Бинарный бэкенд.
//!
//! Компактная раскладка: поля в порядке объявления, числа фиксированной
//! ширины в big-endian, строки с u32-префиксом длины. Схемы в потоке нет —
//! тип на стороне чтения обязан совпадать с типом на стороне записи,
//! несовпадение тега в заголовке даёт [`CodecError::Malformed`].
//!
//! Самый быстрый и наименее переносимый формат: не предназначен для обмена
//! между процессами или версиями.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use super::{
    tags::{FormatVersion, FILE_MAGIC, FORMAT_VERSION, TAG_CANDY, TAG_PACKAGING, TAG_SEQ},
    Codec,
};
use crate::{
    domain::{Candy, Packaging, ProductInfo, ProductKind},
    CodecError, CodecResult,
};

/// Запись значения в бинарный поток (тело, без заголовка файла).
pub trait BinaryEncode {
    /// Root type tag, written once in the stream header.
    fn type_tag() -> u8;

    fn encode<W: Write>(&self, w: &mut W) -> CodecResult<()>;
}

/// Чтение значения из бинарного потока (тело, без заголовка файла).
pub trait BinaryDecode: Sized {
    /// Root type tag expected in the stream header.
    fn type_tag() -> u8;

    fn decode<R: Read>(r: &mut R) -> CodecResult<Self>;
}

/// Бинарный бэкенд контракта [`Codec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryCodec;

impl<T: BinaryEncode + BinaryDecode> Codec<T> for BinaryCodec {
    fn serialize(&self, value: &T, path: &Path) -> CodecResult<()> {
        debug!(path = %path.display(), "binary serialize");
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        write_header(&mut w, <T as BinaryEncode>::type_tag())?;
        value.encode(&mut w)?;
        w.flush()?;
        Ok(())
    }

    fn deserialize(&self, path: &Path) -> CodecResult<T> {
        debug!(path = %path.display(), "binary deserialize");
        let file = File::open(path)?;
        let mut r = BufReader::new(file);
        read_header(&mut r, <T as BinaryDecode>::type_tag())?;
        T::decode(&mut r)
    }
}

/// Записывает заголовок потока: магия, версия, тег корневого типа.
pub fn write_header<W: Write>(w: &mut W, tag: u8) -> CodecResult<()> {
    w.write_all(FILE_MAGIC)?;
    w.write_u8(FORMAT_VERSION)?;
    w.write_u8(tag)?;
    Ok(())
}

/// Проверяет заголовок потока против ожидаемого тега корневого типа.
pub fn read_header<R: Read>(r: &mut R, expected: u8) -> CodecResult<()> {
    let mut magic = [0u8; 3];
    r.read_exact(&mut magic)?;
    if &magic != FILE_MAGIC {
        return Err(CodecError::Malformed("Bad file magic".into()));
    }
    FormatVersion::try_from(r.read_u8()?)?;
    let tag = r.read_u8()?;
    if tag != expected {
        return Err(CodecError::Malformed(format!(
            "Type tag mismatch: expected {expected:#04x}, found {tag:#04x}"
        )));
    }
    Ok(())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> CodecResult<()> {
    let bytes = s.as_bytes();
    w.write_u32::<BigEndian>(bytes.len() as u32)?;
    w.write_all(bytes)?;
    Ok(())
}

fn read_str<R: Read>(r: &mut R) -> CodecResult<String> {
    let len = r.read_u32::<BigEndian>()? as usize;
    let mut buf = vec![0; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| CodecError::Malformed(format!("Invalid UTF-8 string: {e}")))
}

// Вид — один байт; символьное имя здесь не нужно, это не markup.
fn write_kind<W: Write>(w: &mut W, kind: ProductKind) -> CodecResult<()> {
    let byte = match kind {
        ProductKind::Hard => 0,
        ProductKind::Soft => 1,
        ProductKind::Chewy => 2,
        ProductKind::Gummy => 3,
    };
    w.write_u8(byte)?;
    Ok(())
}

fn read_kind<R: Read>(r: &mut R) -> CodecResult<ProductKind> {
    match r.read_u8()? {
        0 => Ok(ProductKind::Hard),
        1 => Ok(ProductKind::Soft),
        2 => Ok(ProductKind::Chewy),
        3 => Ok(ProductKind::Gummy),
        other => Err(CodecError::Malformed(format!(
            "Unknown product kind byte {other:#04x}"
        ))),
    }
}

impl BinaryEncode for Packaging {
    fn type_tag() -> u8 {
        TAG_PACKAGING
    }

    fn encode<W: Write>(&self, w: &mut W) -> CodecResult<()> {
        write_str(w, &self.material)?;
        w.write_f64::<BigEndian>(self.width)?;
        w.write_f64::<BigEndian>(self.height)?;
        Ok(())
    }
}

impl BinaryDecode for Packaging {
    fn type_tag() -> u8 {
        TAG_PACKAGING
    }

    fn decode<R: Read>(r: &mut R) -> CodecResult<Self> {
        Ok(Packaging {
            material: read_str(r)?,
            width: r.read_f64::<BigEndian>()?,
            height: r.read_f64::<BigEndian>()?,
        })
    }
}

impl BinaryEncode for Candy {
    fn type_tag() -> u8 {
        TAG_CANDY
    }

    fn encode<W: Write>(&self, w: &mut W) -> CodecResult<()> {
        write_str(w, &self.info.name)?;
        w.write_f64::<BigEndian>(self.info.weight)?;
        write_kind(w, self.info.kind)?;
        self.info.packaging.encode(w)?;
        w.write_f64::<BigEndian>(self.info.sugar_content)?;
        write_str(w, &self.flavor)?;
        Ok(())
    }
}

impl BinaryDecode for Candy {
    fn type_tag() -> u8 {
        TAG_CANDY
    }

    fn decode<R: Read>(r: &mut R) -> CodecResult<Self> {
        let info = ProductInfo {
            name: read_str(r)?,
            weight: r.read_f64::<BigEndian>()?,
            kind: read_kind(r)?,
            packaging: Packaging::decode(r)?,
            sugar_content: r.read_f64::<BigEndian>()?,
        };
        Ok(Candy {
            info,
            flavor: read_str(r)?,
        })
    }
}

impl<T: BinaryEncode> BinaryEncode for Vec<T> {
    fn type_tag() -> u8 {
        TAG_SEQ
    }

    fn encode<W: Write>(&self, w: &mut W) -> CodecResult<()> {
        // Тег элементов дублируется в теле: заголовок файла несёт только
        // TAG_SEQ, а читатель обязан проверить и тип элементов.
        w.write_u8(T::type_tag())?;
        w.write_u32::<BigEndian>(self.len() as u32)?;
        for item in self {
            item.encode(w)?;
        }
        Ok(())
    }
}

impl<T: BinaryDecode> BinaryDecode for Vec<T> {
    fn type_tag() -> u8 {
        TAG_SEQ
    }

    fn decode<R: Read>(r: &mut R) -> CodecResult<Self> {
        let elem = r.read_u8()?;
        if elem != T::type_tag() {
            return Err(CodecError::Malformed(format!(
                "Sequence element tag mismatch: expected {:#04x}, found {elem:#04x}",
                T::type_tag()
            )));
        }
        let len = r.read_u32::<BigEndian>()? as usize;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(r)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::domain::ProductKind;

    fn lollipop() -> Candy {
        Candy::new(
            "Lollipop",
            50.0,
            "Strawberry",
            ProductKind::Hard,
            Packaging::new("Plastic", 5.0, 10.0),
            40.0,
        )
    }

    #[test]
    fn test_candy_body_roundtrip() {
        let candy = lollipop();
        let mut buf = Vec::new();
        candy.encode(&mut buf).unwrap();

        let mut cursor = Cursor::new(buf);
        let back = Candy::decode(&mut cursor).unwrap();
        assert_eq!(back, candy);
        // Identity equality ignores these, so check them directly.
        assert_eq!(back.flavor, "Strawberry");
        assert_eq!(back.info.packaging, candy.info.packaging);
        assert_eq!(back.info.sugar_content, 40.0);
    }

    #[test]
    fn test_header_roundtrip() {
        let mut buf = Vec::new();
        write_header(&mut buf, TAG_CANDY).unwrap();
        read_header(&mut Cursor::new(buf), TAG_CANDY).unwrap();
    }

    #[test]
    fn test_header_bad_magic() {
        let err = read_header(&mut Cursor::new(b"BAD\x01\x02".to_vec()), TAG_CANDY).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_header_bad_version() {
        let mut buf = Vec::new();
        buf.extend(FILE_MAGIC);
        buf.push(FORMAT_VERSION + 1);
        buf.push(TAG_CANDY);
        let err = read_header(&mut Cursor::new(buf), TAG_CANDY).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_header_tag_mismatch() {
        let mut buf = Vec::new();
        write_header(&mut buf, TAG_PACKAGING).unwrap();
        let err = read_header(&mut Cursor::new(buf), TAG_CANDY).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_truncated_body_is_io_error() {
        let candy = lollipop();
        let mut buf = Vec::new();
        candy.encode(&mut buf).unwrap();
        buf.truncate(buf.len() - 4);

        let err = Candy::decode(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_unknown_kind_byte() {
        let err = read_kind(&mut Cursor::new(vec![9u8])).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn test_sequence_roundtrip() {
        let items = vec![lollipop(), Candy::default()];
        let mut buf = Vec::new();
        items.encode(&mut buf).unwrap();

        let back = Vec::<Candy>::decode(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, items);
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn test_sequence_element_tag_mismatch() {
        let items = vec![Packaging::new("Foil", 1.0, 2.0)];
        let mut buf = Vec::new();
        items.encode(&mut buf).unwrap();

        let err = Vec::<Candy>::decode(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }
}
