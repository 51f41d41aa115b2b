//! JSON file helpers shared by the dataset store and model persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Serializes `value` as compact JSON.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_with(path, |writer| serde_json::to_writer(writer, value))
}

/// Serializes `value` as pretty-printed JSON.
pub fn save_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    write_with(path, |writer| serde_json::to_writer_pretty(writer, value))
}

/// Deserializes a value from a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| Error::Serialization { path: path.to_path_buf(), source: e })
}

fn write_with<F>(path: &Path, encode: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> serde_json::Result<()>,
{
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer).map_err(|e| Error::Serialization { path: path.to_path_buf(), source: e })?;
    writer.flush().map_err(|e| Error::io(path, e))
}
