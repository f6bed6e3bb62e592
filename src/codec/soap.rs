//! Тегированный markup-бэкенд («SOAP-стиль»).
//!
//! Тег каждого узла несёт квалифицированное имя типа, принадлежность к полю
//! записана в атрибуте `field`. Единственный бэкенд, который восстанавливает
//! конкретный вариант через полиморфный слот: документ с `zefir.Candy`
//! декодируется в `Product::Candy`, даже если запрошен `Product`.
//! Незарегистрированный тег типа — [`CodecError::UnknownType`].

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use super::Codec;
use crate::{
    domain::{Candy, Packaging, Product, ProductInfo, ProductKind},
    markup::{parse_document, write_document, Element},
    CodecError, CodecResult,
};

/// Квалифицированные теги доменных типов.
pub const TYPE_CANDY: &str = "zefir.Candy";
pub const TYPE_PACKAGING: &str = "zefir.Packaging";
pub const TYPE_KIND: &str = "zefir.ProductKind";
/// Теги скалярных узлов.
pub const TYPE_STRING: &str = "string";
pub const TYPE_DOUBLE: &str = "double";

/// Кодирование узла с тегом типа.
pub trait TaggedEncode {
    /// Qualified type tag of this value's node.
    fn type_tag(&self) -> &'static str;

    fn encode_tagged(&self) -> Element;
}

/// Декодирование узла по тегу типа.
pub trait TaggedDecode: Sized {
    fn decode_tagged(el: &Element) -> CodecResult<Self>;
}

/// Тегированный markup-бэкенд контракта [`Codec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SoapCodec;

impl<T: TaggedEncode + TaggedDecode> Codec<T> for SoapCodec {
    fn serialize(&self, value: &T, path: &Path) -> CodecResult<()> {
        debug!(path = %path.display(), tag = value.type_tag(), "tagged serialize");
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        write_document(&mut w, &value.encode_tagged())?;
        w.flush()?;
        Ok(())
    }

    fn deserialize(&self, path: &Path) -> CodecResult<T> {
        debug!(path = %path.display(), "tagged deserialize");
        let text = fs::read_to_string(path)?;
        let doc = parse_document(&text)?;
        T::decode_tagged(&doc)
    }
}

fn scalar(tag: &str, field: &str, text: impl Into<String>) -> Element {
    let mut el = Element::with_text(tag, text);
    el.set_attr("field", field);
    el
}

fn field_child<'a>(el: &'a Element, field: &'static str) -> CodecResult<&'a Element> {
    el.children
        .iter()
        .find(|c| c.attr("field") == Some(field))
        .ok_or(CodecError::MissingField(field))
}

fn field_text(el: &Element, field: &'static str) -> CodecResult<String> {
    Ok(field_child(el, field)?.text().to_owned())
}

fn field_f64(el: &Element, field: &'static str) -> CodecResult<f64> {
    let text = field_text(el, field)?;
    text.trim()
        .parse()
        .map_err(|_| CodecError::Malformed(format!("Field {field} is not a number: {text:?}")))
}

fn expect_tag(el: &Element, tag: &str) -> CodecResult<()> {
    if el.name != tag {
        return Err(CodecError::Malformed(format!(
            "Expected {tag} node, found {}",
            el.name
        )));
    }
    Ok(())
}

impl TaggedEncode for Packaging {
    fn type_tag(&self) -> &'static str {
        TYPE_PACKAGING
    }

    fn encode_tagged(&self) -> Element {
        let mut el = Element::new(TYPE_PACKAGING);
        el.push(scalar(TYPE_STRING, "material", &self.material));
        el.push(scalar(TYPE_DOUBLE, "width", self.width.to_string()));
        el.push(scalar(TYPE_DOUBLE, "height", self.height.to_string()));
        el
    }
}

impl TaggedDecode for Packaging {
    fn decode_tagged(el: &Element) -> CodecResult<Self> {
        expect_tag(el, TYPE_PACKAGING)?;
        Ok(Packaging {
            material: field_text(el, "material")?,
            width: field_f64(el, "width")?,
            height: field_f64(el, "height")?,
        })
    }
}

impl TaggedEncode for Candy {
    fn type_tag(&self) -> &'static str {
        TYPE_CANDY
    }

    fn encode_tagged(&self) -> Element {
        let mut el = Element::new(TYPE_CANDY);
        el.push(scalar(TYPE_STRING, "name", &self.info.name));
        el.push(scalar(TYPE_DOUBLE, "weight", self.info.weight.to_string()));
        el.push(scalar(TYPE_KIND, "kind", self.info.kind.as_str()));
        let mut packaging = self.info.packaging.encode_tagged();
        packaging.set_attr("field", "packaging");
        el.push(packaging);
        el.push(scalar(
            TYPE_DOUBLE,
            "sugar_content",
            self.info.sugar_content.to_string(),
        ));
        el.push(scalar(TYPE_STRING, "flavor", &self.flavor));
        el
    }
}

impl TaggedDecode for Candy {
    fn decode_tagged(el: &Element) -> CodecResult<Self> {
        expect_tag(el, TYPE_CANDY)?;
        let kind_text = field_text(el, "kind")?;
        let kind = ProductKind::from_name(&kind_text)
            .ok_or_else(|| CodecError::Malformed(format!("Unknown product kind {kind_text:?}")))?;
        let info = ProductInfo {
            name: field_text(el, "name")?,
            weight: field_f64(el, "weight")?,
            kind,
            packaging: Packaging::decode_tagged(field_child(el, "packaging")?)?,
            sugar_content: field_f64(el, "sugar_content")?,
        };
        Ok(Candy {
            info,
            flavor: field_text(el, "flavor")?,
        })
    }
}

impl TaggedEncode for Product {
    fn type_tag(&self) -> &'static str {
        match self {
            Product::Candy(c) => c.type_tag(),
        }
    }

    fn encode_tagged(&self) -> Element {
        match self {
            Product::Candy(c) => c.encode_tagged(),
        }
    }
}

impl TaggedDecode for Product {
    // Реестр известных типов: диспетчеризация по тегу корня.
    fn decode_tagged(el: &Element) -> CodecResult<Self> {
        match el.name.as_str() {
            TYPE_CANDY => Ok(Product::Candy(Candy::decode_tagged(el)?)),
            other => Err(CodecError::UnknownType(other.to_string())),
        }
    }
}
