// Copyright 2025 Zefir

//! Запросы по дереву разметки.
//!
//! Три формы выборки, все ленивые и в порядке документа:
//!
//! - [`select_path`] — абсолютный путь из имён элементов
//!   (`"ArrayOfCandy/Candy/Name"`);
//! - [`select_where`] — путь до родителя плюс числовое условие на текст
//!   именованного ребёнка (`"SugarContent > 30"`);
//! - [`descendants`] — все элементы с данным именем на любой глубине.
//!
//! Пустой результат — не ошибка. Итераторы клонируются, так что запрос
//! можно перезапустить с начала.

use std::str::FromStr;

use thiserror::Error;

use super::Element;

/// Selects elements matching an absolute path of tag names.
///
/// The first segment must match the root's name; each following segment
/// descends one level. Matching is structural only.
pub fn select_path<'a>(root: &'a Element, path: &str) -> PathSelect<'a> {
    let segments: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    let mut stack = Vec::new();
    if let Some(first) = segments.first() {
        if root.name == *first {
            stack.push((root, 0));
        }
    }
    PathSelect { stack, segments }
}

/// Selects elements matching `path` whose named child satisfies `cond`.
///
/// An element with an absent or non-numeric child simply fails the
/// comparison and is excluded; that is never an error.
pub fn select_where<'a>(root: &'a Element, path: &str, cond: &Condition) -> WhereSelect<'a> {
    WhereSelect {
        inner: select_path(root, path),
        cond: cond.clone(),
    }
}

/// Selects every element named `name`, anywhere in the tree, in document
/// order (the root itself included when it matches).
pub fn descendants<'a>(root: &'a Element, name: &str) -> Descendants<'a> {
    Descendants {
        stack: vec![root],
        name: name.to_owned(),
    }
}

/// Ленивый обход по пути. Стек хранит пары (элемент, индекс сегмента).
#[derive(Debug, Clone)]
pub struct PathSelect<'a> {
    stack: Vec<(&'a Element, usize)>,
    segments: Vec<String>,
}

impl<'a> Iterator for PathSelect<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some((el, idx)) = self.stack.pop() {
            if idx + 1 == self.segments.len() {
                return Some(el);
            }
            let next = &self.segments[idx + 1];
            // В обратном порядке, чтобы стек отдавал детей по порядку документа.
            for child in el.children.iter().rev() {
                if child.name == *next {
                    self.stack.push((child, idx + 1));
                }
            }
        }
        None
    }
}

/// Выборка по пути, отфильтрованная условием.
#[derive(Debug, Clone)]
pub struct WhereSelect<'a> {
    inner: PathSelect<'a>,
    cond: Condition,
}

impl<'a> Iterator for WhereSelect<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        self.inner.by_ref().find(|el| self.cond.matches(el))
    }
}

/// Обход всех потомков с данным именем.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
    name: String,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(el) = self.stack.pop() {
            for child in el.children.iter().rev() {
                self.stack.push(child);
            }
            if el.name == self.name {
                return Some(el);
            }
        }
        None
    }
}

/// Numeric comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConditionError {
    #[error("Empty condition")]
    Empty,

    #[error("No comparison operator in condition {0:?}")]
    MissingOp(String),

    #[error("Invalid numeric threshold {0:?}")]
    BadThreshold(String),
}

/// Numeric predicate over a named child element, e.g. `SugarContent > 30`.
///
/// Both the child's text and the threshold compare as f64.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub child: String,
    pub op: CmpOp,
    pub threshold: f64,
}

impl Condition {
    pub fn new(child: impl Into<String>, op: CmpOp, threshold: f64) -> Self {
        Self {
            child: child.into(),
            op,
            threshold,
        }
    }

    /// Разбор текстовой формы: имя ребёнка, оператор, порог.
    pub fn parse(input: &str) -> Result<Self, ConditionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ConditionError::Empty);
        }

        // Двухсимвольные операторы раньше односимвольных.
        const OPS: [(&str, CmpOp); 8] = [
            (">=", CmpOp::Ge),
            ("<=", CmpOp::Le),
            ("!=", CmpOp::Ne),
            ("==", CmpOp::Eq),
            (">", CmpOp::Gt),
            ("<", CmpOp::Lt),
            ("=", CmpOp::Eq),
            ("<>", CmpOp::Ne),
        ];
        let (pos, op_text, op) = OPS
            .iter()
            .filter_map(|(text, op)| input.find(text).map(|pos| (pos, *text, *op)))
            .min_by_key(|(pos, text, _)| (*pos, usize::MAX - text.len()))
            .ok_or_else(|| ConditionError::MissingOp(input.to_string()))?;

        let child = input[..pos].trim();
        if child.is_empty() {
            return Err(ConditionError::MissingOp(input.to_string()));
        }
        let rest = input[pos + op_text.len()..].trim();
        let threshold: f64 = rest
            .parse()
            .map_err(|_| ConditionError::BadThreshold(rest.to_string()))?;

        Ok(Self::new(child, op, threshold))
    }

    /// Проверка элемента: текст ребёнка разбирается как f64; отсутствующий
    /// или нечисловой ребёнок просто не проходит сравнение.
    pub fn matches(&self, el: &Element) -> bool {
        let Some(text) = el.child_text(&self.child) else {
            return false;
        };
        let Ok(actual) = text.trim().parse::<f64>() else {
            return false;
        };
        match self.op {
            CmpOp::Lt => actual < self.threshold,
            CmpOp::Le => actual <= self.threshold,
            CmpOp::Gt => actual > self.threshold,
            CmpOp::Ge => actual >= self.threshold,
            CmpOp::Eq => actual == self.threshold,
            CmpOp::Ne => actual != self.threshold,
        }
    }
}

impl FromStr for Condition {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::parse(s)
    }
}
