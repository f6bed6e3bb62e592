//! Дерево разметки и запросы по нему.
//!
//! ## Модули
//!
//! - [`document`] — узел [`Element`], запись и разбор документа
//! - [`query`] — выборка по пути, по предикату и по имени потомка
//!
//! Используется markup-бэкендами и фасилити запросов поверх записанных
//! XML-документов.

pub mod document;
pub mod query;

pub use document::{parse_document, write_document, Element};
pub use query::{
    descendants, select_path, select_where, CmpOp, Condition, ConditionError, Descendants,
    PathSelect, WhereSelect,
};
