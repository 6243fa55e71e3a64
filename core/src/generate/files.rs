//! Output sinks for generated units: a file on disk, or an in-memory buffer handed to a
//! flush callback.

use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

pub struct MemFile {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

pub type MemFlush = Arc<dyn Fn(&MemFile) + Sync + Send>;

pub enum FileOrMem {
    File(std::fs::File),
    Mem { state: MemFile, flush: MemFlush },
}

impl FileOrMem {
    pub fn new<P: Into<PathBuf>>(
        path: P,
        mem: bool,
    ) -> std::io::Result<Self> {
        let path = path.into();
        Ok(if mem {
            Self::Mem {
                flush: Arc::new(|_| {}),
                state: MemFile { path, data: vec![] },
            }
        } else {
            Self::File(std::fs::File::create(path)?)
        })
    }

    /// Replaces the flush callback. Has no effect on disk files.
    pub fn with_flush(
        &mut self,
        new_fn: MemFlush,
    ) {
        if let Self::Mem { flush, .. } = self {
            *flush = new_fn;
        }
    }
}

impl Write for FileOrMem {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> std::io::Result<usize> {
        match self {
            Self::File(f) => f.write(buf),
            Self::Mem { state, .. } => {
                state.data.extend_from_slice(buf);
                Ok(buf.len())
            },
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::File(f) => f.flush(),
            Self::Mem { state, flush } => {
                (flush)(state);
                Ok(())
            },
        }
    }
}

/// Collects memory flushes by path. The last flush of a path wins.
#[derive(Default, Clone)]
pub struct MemCollector {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mem_flush(&self) -> MemFlush {
        let files = self.files.clone();
        Arc::new(move |mem| {
            tracing::trace!(
                path = %mem.path.display(),
                bytes = mem.data.len(),
                "flushing generated unit to memory"
            );
            files
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(mem.path.clone(), mem.data.clone());
        })
    }

    pub fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn text(
        &self,
        path: impl AsRef<Path>,
    ) -> Option<String> {
        self.files()
            .get(path.as_ref())
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }
}
