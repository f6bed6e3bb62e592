//! Текстовый структурный бэкенд поверх serde_json.
//!
//! Имена полей отображаются один-в-один, enum'ы пишутся символьным именем.
//! Тегов типа нет: полиморфный слот этим бэкендом не восстановить, на
//! стороне чтения нужен конкретный тип. NaN/Infinity отдельно не
//! обрабатываются — serde_json сам отказывает при записи.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::Codec;
use crate::CodecResult;

/// JSON-бэкенд контракта [`Codec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec {
    fn serialize(&self, value: &T, path: &Path) -> CodecResult<()> {
        debug!(path = %path.display(), "json serialize");
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer(&mut w, value)?;
        w.flush()?;
        Ok(())
    }

    fn deserialize(&self, path: &Path) -> CodecResult<T> {
        debug!(path = %path.display(), "json deserialize");
        let file = File::open(path)?;
        let r = BufReader::new(file);
        Ok(serde_json::from_reader(r)?)
    }
}
