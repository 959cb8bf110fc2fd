//! The precomputed hand rank table the evaluator walks.
//!
//! The asset is a flat array of 32,487,834 native-endian `i32` values. It is
//! read once, owned by whoever loaded it and shared by reference with every
//! evaluator and worker thread; nothing writes to it after loading.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use byteorder::{NativeEndian, ReadBytesExt};

use crate::error::{EvalError, EvalResult};

/// Number of entries in the table.
pub const TABLE_LEN: usize = 32_487_834;

/// File name looked up next to the executable when no path is configured.
pub const TABLE_FILE_NAME: &str = "HandRanks.dat";

/// Environment variable naming the table file.
pub const TABLE_PATH_ENV: &str = "HANDRANKS_PATH";

/// Read access to a table that follows the evaluator's indexing contract.
///
/// `None` means the index lies outside the table.
pub trait RankTable: Sync {
    fn entry(&self, index: usize) -> Option<i32>;
}

pub struct HandRankTable {
    entries: Box<[i32]>,
}

impl HandRankTable {
    /// Loads the whole table from `path`, failing if the file is missing,
    /// short, or longer than [`TABLE_LEN`] entries.
    pub fn load(path: impl AsRef<Path>) -> EvalResult<HandRankTable> {
        let path = path.as_ref();
        let started = Instant::now();
        let io_error = |source| EvalError::TableIo {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let expected = (TABLE_LEN * std::mem::size_of::<i32>()) as u64;
        let found = file.metadata().map_err(io_error)?.len();
        if found != expected {
            return Err(EvalError::TableSize {
                path: path.to_path_buf(),
                expected,
                found,
            });
        }

        let mut entries = vec![0i32; TABLE_LEN];
        BufReader::new(file)
            .read_i32_into::<NativeEndian>(&mut entries)
            .map_err(io_error)?;

        log::info!(
            "{:<32}{} ({:.2?})",
            "loaded hand rank table",
            path.display(),
            started.elapsed()
        );
        Ok(HandRankTable {
            entries: entries.into_boxed_slice(),
        })
    }

    /// Wraps an in-memory table. The length must be exactly [`TABLE_LEN`].
    pub fn from_entries(entries: Vec<i32>) -> EvalResult<HandRankTable> {
        if entries.len() != TABLE_LEN {
            return Err(EvalError::CorruptEvaluationTable(format!(
                "expected {} entries, got {}",
                TABLE_LEN,
                entries.len()
            )));
        }
        Ok(HandRankTable {
            entries: entries.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RankTable for HandRankTable {
    #[inline]
    fn entry(&self, index: usize) -> Option<i32> {
        self.entries.get(index).copied()
    }
}

/// Resolves where to load the table from: an explicit path, then
/// `HANDRANKS_PATH`, then `HandRanks.dat` beside the running executable.
pub fn resolve_table_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Some(path) = std::env::var_os(TABLE_PATH_ENV) {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .map(|exe| exe.with_file_name(TABLE_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from(TABLE_FILE_NAME))
}
