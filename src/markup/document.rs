// Copyright 2025 Zefir

//! Запись и разбор markup-документов.
//!
//! Документ — дерево элементов [`Element`]: имя тега, атрибуты, дочерние
//! элементы и текстовое содержимое. Запись добавляет XML-декларацию и
//! двухпробельные отступы; разбор — рекурсивный спуск по байтовому курсору
//! с позициями в ошибках. Комментарии и декларация пропускаются, сущности
//! `&amp; &lt; &gt; &quot; &apos;` декодируются.

use std::io::{self, Write};

use crate::error::ParseError;

/// Maximum element nesting (matches what any sane document here needs).
pub const MAX_DEPTH: usize = 64;

/// Один узел дерева разметки.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Leaf element carrying only text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Text content of this element ("" when none).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text content of the first child with the given tag name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text())
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }
}

// -----------------------------------------------------------------------------
//  Запись
// -----------------------------------------------------------------------------

/// Записывает документ: XML-декларация и дерево `root` с отступами.
pub fn write_document<W: Write>(w: &mut W, root: &Element) -> io::Result<()> {
    w.write_all(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n")?;
    write_element(w, root, 0)?;
    w.write_all(b"\n")
}

fn write_element<W: Write>(w: &mut W, el: &Element, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    write!(w, "{indent}<{}", el.name)?;
    for (name, value) in &el.attrs {
        write!(w, " {name}=\"{}\"", escape_attr(value))?;
    }

    if el.children.is_empty() && el.text.is_empty() {
        return write!(w, " />");
    }
    if el.children.is_empty() {
        return write!(w, ">{}</{}>", escape_text(&el.text), el.name);
    }

    // Элементы с детьми: каждый ребёнок на своей строке.
    writeln!(w, ">")?;
    for child in &el.children {
        write_element(w, child, depth + 1)?;
        writeln!(w)?;
    }
    write!(w, "{indent}</{}>", el.name)
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// -----------------------------------------------------------------------------
//  Разбор
// -----------------------------------------------------------------------------

/// Разбирает документ в дерево элементов.
///
/// Принимает ровно один корневой элемент; декларация `<?...?>` и комментарии
/// пропускаются, содержимое после корня — ошибка.
pub fn parse_document(input: &str) -> Result<Element, ParseError> {
    let mut parser = Parser {
        data: input.as_bytes(),
        pos: 0,
    };
    parser.skip_misc()?;
    if parser.peek() != Some(b'<') {
        return Err(ParseError::NoRoot);
    }
    let root = parser.parse_element(0)?;
    parser.skip_misc()?;
    if parser.pos < parser.data.len() {
        return Err(ParseError::TrailingContent { pos: parser.pos });
    }
    Ok(root)
}

struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<u8, ParseError> {
        let b = self.peek().ok_or(ParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        let b = self.bump()?;
        if b != expected {
            return Err(ParseError::UnexpectedChar {
                found: b as char,
                pos: self.pos - 1,
            });
        }
        Ok(())
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    /// Пропускает пробелы, декларации `<?...?>` и комментарии `<!--...-->`.
    fn skip_misc(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            if self.data[self.pos..].starts_with(b"<?") {
                self.skip_until(b"?>")?;
            } else if self.data[self.pos..].starts_with(b"<!--") {
                self.skip_until(b"-->")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_until(&mut self, marker: &[u8]) -> Result<(), ParseError> {
        while self.pos < self.data.len() {
            if self.data[self.pos..].starts_with(marker) {
                self.pos += marker.len();
                return Ok(());
            }
            self.pos += 1;
        }
        Err(ParseError::UnexpectedEof)
    }

    fn read_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(ParseError::BadTagName { pos: start });
        }
        // Имя тега всегда ASCII, проверено выше.
        Ok(String::from_utf8_lossy(&self.data[start..self.pos]).into_owned())
    }

    fn parse_element(&mut self, depth: usize) -> Result<Element, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                pos: self.pos,
            });
        }

        self.expect(b'<')?;
        let name = self.read_name()?;
        let mut el = Element::new(&name);

        // Атрибуты до '>' или '/>'.
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>')?;
                    return Ok(el);
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    let attr_name = self.read_name()?;
                    self.skip_ws();
                    self.expect(b'=')?;
                    self.skip_ws();
                    self.expect(b'"')?;
                    let value = self.read_until_quote()?;
                    el.set_attr(attr_name, value);
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }

        // Содержимое: текст, дети, комментарии — до закрывающего тега.
        // Текст копируется байтами: вход — валидный UTF-8, границы символов
        // не рвутся.
        let mut text: Vec<u8> = Vec::new();
        loop {
            if self.data[self.pos..].starts_with(b"<!--") {
                self.skip_until(b"-->")?;
                continue;
            }
            if self.data[self.pos..].starts_with(b"</") {
                self.pos += 2;
                let close_pos = self.pos;
                let close = self.read_name()?;
                if close != name {
                    return Err(ParseError::MismatchedTag {
                        expected: name,
                        found: close,
                        pos: close_pos,
                    });
                }
                self.skip_ws();
                self.expect(b'>')?;
                let text = String::from_utf8_lossy(&text);
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    el.set_text(trimmed);
                }
                return Ok(el);
            }
            match self.peek() {
                Some(b'<') => el.push(self.parse_element(depth + 1)?),
                Some(b'&') => {
                    let ch = self.read_entity()?;
                    let mut utf8 = [0u8; 4];
                    text.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                }
                Some(b) => {
                    text.push(b);
                    self.pos += 1;
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
    }

    fn read_until_quote(&mut self) -> Result<String, ParseError> {
        let mut value: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(String::from_utf8_lossy(&value).into_owned());
                }
                Some(b'&') => {
                    let ch = self.read_entity()?;
                    let mut utf8 = [0u8; 4];
                    value.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                }
                Some(b) => {
                    value.push(b);
                    self.pos += 1;
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
    }

    fn read_entity(&mut self) -> Result<char, ParseError> {
        let start = self.pos;
        self.expect(b'&')?;
        let mut entity = String::new();
        loop {
            match self.bump()? {
                b';' => break,
                b if entity.len() < 8 => entity.push(b as char),
                _ => return Err(ParseError::InvalidEntity { pos: start }),
            }
        }
        match entity.as_str() {
            "amp" => Ok('&'),
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "quot" => Ok('"'),
            "apos" => Ok('\''),
            _ => Err(ParseError::InvalidEntity { pos: start }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaf_with_text() {
        let doc = parse_document("<Name>Gummy Bear</Name>").unwrap();
        assert_eq!(doc.name, "Name");
        assert_eq!(doc.text(), "Gummy Bear");
        assert!(doc.children.is_empty());
    }

    #[test]
    fn test_parse_nested() {
        let doc = parse_document(
            "<Candy><Name>Lollipop</Name><Weight>50</Weight></Candy>",
        )
        .unwrap();
        assert_eq!(doc.children.len(), 2);
        assert_eq!(doc.child_text("Name"), Some("Lollipop"));
        assert_eq!(doc.child_text("Weight"), Some("50"));
    }

    #[test]
    fn test_parse_attributes() {
        let doc = parse_document(r#"<double field="weight">50</double>"#).unwrap();
        assert_eq!(doc.attr("field"), Some("weight"));
        assert_eq!(doc.text(), "50");
    }

    #[test]
    fn test_parse_self_closing() {
        let doc = parse_document(r#"<Packaging material="Foil" />"#).unwrap();
        assert_eq!(doc.attr("material"), Some("Foil"));
        assert!(doc.children.is_empty());
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_parse_skips_declaration_and_comments() {
        let doc = parse_document(
            "<?xml version=\"1.0\"?>\n<!-- dump -->\n<Name><!-- x -->Bar</Name>",
        )
        .unwrap();
        assert_eq!(doc.text(), "Bar");
    }

    #[test]
    fn test_parse_entities() {
        let doc = parse_document("<Name>M&amp;M &lt;mini&gt;</Name>").unwrap();
        assert_eq!(doc.text(), "M&M <mini>");
    }

    #[test]
    fn test_mismatched_close_tag() {
        let err = parse_document("<Candy><Name>x</Weight></Candy>").unwrap_err();
        assert!(matches!(err, ParseError::MismatchedTag { .. }));
    }

    #[test]
    fn test_truncated_document() {
        let err = parse_document("<Candy><Name>x</Name>").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEof);
    }

    #[test]
    fn test_trailing_content() {
        let err = parse_document("<Name>x</Name><Name>y</Name>").unwrap_err();
        assert!(matches!(err, ParseError::TrailingContent { .. }));
    }

    #[test]
    fn test_empty_input_has_no_root() {
        assert_eq!(parse_document("  \n"), Err(ParseError::NoRoot));
    }

    #[test]
    fn test_unknown_entity() {
        let err = parse_document("<Name>&nbsp;</Name>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidEntity { .. }));
    }

    #[test]
    fn test_write_then_parse_roundtrip() {
        let mut root = Element::new("Candy");
        root.set_attr("field", "product");
        root.push(Element::with_text("Name", "M&M <mini>"));
        let mut pack = Element::new("Packaging");
        pack.push(Element::with_text("Material", "Foil"));
        root.push(pack);

        let mut buf = Vec::new();
        write_document(&mut buf, &root).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("<?xml"));

        let parsed = parse_document(&text).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_depth_limit() {
        let mut doc = String::new();
        for _ in 0..=MAX_DEPTH + 1 {
            doc.push_str("<a>");
        }
        for _ in 0..=MAX_DEPTH + 1 {
            doc.push_str("</a>");
        }
        let err = parse_document(&doc).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { .. }));
    }
}
