//! Markup-бэкенд по статической раскладке типа («XML-стиль»).
//!
//! Каждое поле — дочерний элемент с именем поля, в порядке объявления;
//! последовательность заворачивается в синтетический корень `ArrayOf<Тип>`.
//! Тегов типа в документе нет, конкретный тип нужен с обеих сторон.
//! Именно этот формат читает фасилити запросов.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use tracing::debug;

use super::Codec;
use crate::{
    domain::{Candy, Packaging, ProductInfo, ProductKind},
    markup::{parse_document, write_document, Element},
    CodecError, CodecResult,
};

/// Кодирование в элемент по раскладке полей.
pub trait XmlEncode {
    /// Element name of this type; also names the items of an `ArrayOf`
    /// wrapper.
    fn element_name() -> String;

    fn to_element(&self) -> Element;
}

/// Декодирование из элемента по раскладке полей.
pub trait XmlDecode: Sized {
    /// Element name expected at the root.
    fn element_name() -> String;

    fn from_element(el: &Element) -> CodecResult<Self>;
}

/// Markup-бэкенд контракта [`Codec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

impl<T: XmlEncode + XmlDecode> Codec<T> for XmlCodec {
    fn serialize(&self, value: &T, path: &Path) -> CodecResult<()> {
        debug!(path = %path.display(), "xml serialize");
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        write_document(&mut w, &value.to_element())?;
        w.flush()?;
        Ok(())
    }

    fn deserialize(&self, path: &Path) -> CodecResult<T> {
        debug!(path = %path.display(), "xml deserialize");
        let text = fs::read_to_string(path)?;
        let doc = parse_document(&text)?;
        let expected = <T as XmlDecode>::element_name();
        if doc.name != expected {
            return Err(CodecError::Malformed(format!(
                "Expected {expected} document, found {}",
                doc.name
            )));
        }
        T::from_element(&doc)
    }
}

fn require_child<'a>(el: &'a Element, name: &'static str) -> CodecResult<&'a Element> {
    el.child(name).ok_or(CodecError::MissingField(name))
}

fn child_text(el: &Element, name: &'static str) -> CodecResult<String> {
    Ok(require_child(el, name)?.text().to_owned())
}

fn child_f64(el: &Element, name: &'static str) -> CodecResult<f64> {
    let text = child_text(el, name)?;
    text.trim()
        .parse()
        .map_err(|_| CodecError::Malformed(format!("Element {name} is not a number: {text:?}")))
}

impl XmlEncode for Packaging {
    fn element_name() -> String {
        "Packaging".into()
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new(<Self as XmlEncode>::element_name());
        el.push(Element::with_text("Material", &self.material));
        el.push(Element::with_text("Width", self.width.to_string()));
        el.push(Element::with_text("Height", self.height.to_string()));
        el
    }
}

impl XmlDecode for Packaging {
    fn element_name() -> String {
        "Packaging".into()
    }

    fn from_element(el: &Element) -> CodecResult<Self> {
        Ok(Packaging {
            material: child_text(el, "Material")?,
            width: child_f64(el, "Width")?,
            height: child_f64(el, "Height")?,
        })
    }
}

impl XmlEncode for Candy {
    fn element_name() -> String {
        "Candy".into()
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new(<Self as XmlEncode>::element_name());
        el.push(Element::with_text("Name", &self.info.name));
        el.push(Element::with_text("Weight", self.info.weight.to_string()));
        el.push(Element::with_text("Kind", self.info.kind.as_str()));
        el.push(self.info.packaging.to_element());
        el.push(Element::with_text(
            "SugarContent",
            self.info.sugar_content.to_string(),
        ));
        el.push(Element::with_text("Flavor", &self.flavor));
        el
    }
}

impl XmlDecode for Candy {
    fn element_name() -> String {
        "Candy".into()
    }

    fn from_element(el: &Element) -> CodecResult<Self> {
        let kind_text = child_text(el, "Kind")?;
        let kind = ProductKind::from_name(&kind_text)
            .ok_or_else(|| CodecError::Malformed(format!("Unknown product kind {kind_text:?}")))?;
        let info = ProductInfo {
            name: child_text(el, "Name")?,
            weight: child_f64(el, "Weight")?,
            kind,
            packaging: Packaging::from_element(require_child(el, "Packaging")?)?,
            sugar_content: child_f64(el, "SugarContent")?,
        };
        Ok(Candy {
            info,
            flavor: child_text(el, "Flavor")?,
        })
    }
}

impl<T: XmlEncode> XmlEncode for Vec<T> {
    fn element_name() -> String {
        format!("ArrayOf{}", T::element_name())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new(Self::element_name());
        for item in self {
            el.push(item.to_element());
        }
        el
    }
}

impl<T: XmlDecode> XmlDecode for Vec<T> {
    fn element_name() -> String {
        format!("ArrayOf{}", T::element_name())
    }

    fn from_element(el: &Element) -> CodecResult<Self> {
        let item_name = T::element_name();
        el.children
            .iter()
            .filter(|c| c.name == item_name)
            .map(T::from_element)
            .collect()
    }
}
