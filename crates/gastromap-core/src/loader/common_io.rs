// crates/gastromap-core/src/loader/common_io.rs
use crate::error::{MapError, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// Opens a dataset file, transparently gunzipping `*.gz` files when the
/// `compact` feature is enabled.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        MapError::fetch(path.display().to_string(), format!("dataset not found: {e}"))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        if is_gzip(path) {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}

#[cfg_attr(not(feature = "compact"), allow(dead_code))]
pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Reads the whole dataset into a string.
///
/// Bytes that are not UTF-8, or a broken gzip stream, make the dataset
/// unparseable rather than unreachable.
pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    let mut stream = open_stream(path)?;
    let mut text = String::new();
    stream.read_to_string(&mut text).map_err(|e| match e.kind() {
        ErrorKind::InvalidData | ErrorKind::InvalidInput | ErrorKind::UnexpectedEof => {
            MapError::parse(path.display().to_string(), e)
        }
        _ => MapError::Io(e),
    })?;
    Ok(text)
}
