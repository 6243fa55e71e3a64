//! Generation driver: loads source documents, writes one generated unit per union, and
//! runs the analyzer and assist over the same compilation.

pub mod files;
pub mod sources;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use rayon::iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use unionize_errors::{CompilerError, FilesystemError};
use unionize_syntax::{Compilation, SourceDocument};

use crate::{
    Error, Result,
    analyze::Analyzer,
    assist::Assist,
    config::UnionizeConfig,
    extract::{Extraction, Extractor},
    generate::files::{FileOrMem, MemFlush},
    model::Union,
    synth::Synthesizer,
};

pub struct Generation {
    pub config: UnionizeConfig,
    pub documents: Vec<SourceDocument>,
}

impl Generation {
    /// Loads every document matched by the configured sources.
    #[tracing::instrument(skip_all)]
    pub fn new(config: UnionizeConfig) -> Result<Self> {
        let documents = config
            .sources
            .paths()?
            .into_par_iter()
            .map(SourceDocument::from_path)
            .collect::<unionize_syntax::Result<Vec<_>>>()?;

        tracing::debug!(documents = documents.len(), "loaded source documents");
        Ok(Self::from_documents(config, documents))
    }

    pub fn from_documents(
        config: UnionizeConfig,
        documents: Vec<SourceDocument>,
    ) -> Self {
        Self { config, documents }
    }

    pub fn compilation(&self) -> Compilation<'_> {
        Compilation::new(&self.documents)
    }

    pub fn extract(&self) -> Extraction {
        Extractor::new(&self.config).extract_all(&self.compilation())
    }

    /// Synthesizes and writes every union, returning the written paths.
    ///
    /// Units of healthy unions are written even when other declarations fail to extract;
    /// the failures are returned together afterwards.
    #[tracing::instrument(skip_all, fields(output = %self.config.output_dir.display(), mem = self.config.mem))]
    pub fn generate_all(
        &self,
        mem_flush: Option<MemFlush>,
    ) -> Result<Vec<PathBuf>> {
        let Extraction { unions, failures } = self.extract();
        let synthesizer = Synthesizer::new(&self.config);

        if !self.config.mem && !unions.is_empty() {
            std::fs::create_dir_all(&self.config.output_dir).map_err(Error::from_with_source_init(
                self.config
                    .output_dir
                    .display()
                    .to_string(),
            ))?;
        }

        let results = unions
            .par_iter()
            .map(|union| self.write_unit(&synthesizer, union, mem_flush.clone()))
            .collect::<Vec<_>>();

        let mut written = vec![];
        let mut errors = failures;
        for result in results {
            match result {
                Ok(path) => written.push(path),
                Err(err) => errors.push(err.into()),
            }
        }

        match errors.len() {
            0 => Ok(written),
            1 => Err(Error::Compiler(errors.remove(0))),
            n => {
                tracing::error!(errors = n, written = written.len(), "generation finished with errors");
                Err(Error::Compiler(CompilerError::Multiple(errors)))
            },
        }
    }

    fn write_unit(
        &self,
        synthesizer: &Synthesizer,
        union: &Union,
        mem_flush: Option<MemFlush>,
    ) -> Result<PathBuf> {
        let unit = synthesizer.synthesize(union)?;
        let path = self
            .config
            .output_dir
            .join(&unit.file_name);
        let src = path.display().to_string();

        let mut out = FileOrMem::new(&path, self.config.mem).map_err(Error::from_with_source_init(src.clone()))?;
        if let Some(flush) = mem_flush {
            out.with_flush(flush);
        }
        out.write_all(unit.text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(Error::from_with_source_init(src.clone()))?;

        tracing::info!(union = %union.descriptor.qualified, path = %src, "wrote generated unit");
        Ok(path)
    }

    /// Runs the initialization analyzer over every document.
    #[tracing::instrument(skip_all)]
    pub fn check(&self) -> Vec<CompilerError> {
        Analyzer::new(&self.config).analyze(&self.compilation())
    }

    /// Finds a loaded document by its path or host file name.
    pub fn document(
        &self,
        path: &Path,
    ) -> Option<&SourceDocument> {
        self.documents
            .iter()
            .find(|doc| doc.path == path || Path::new(&doc.source_name()) == path)
    }

    /// Applies every offered fix to the document at `path`, last call site first.
    ///
    /// Offers are recomputed after each edit. Every applied fix consumes the diagnostic it
    /// resolves, so the loop ends once no diagnostic yields an offer.
    #[tracing::instrument(skip(self))]
    pub fn fix(
        &self,
        path: &Path,
    ) -> Result<SourceDocument> {
        let Some(doc) = self.document(path) else {
            return Err(FilesystemError::not_found(path.display().to_string())
                .unlocated()
                .build()
                .into());
        };

        let compilation = self.compilation();
        let assist = Assist::new(&self.config);

        let mut current = doc.clone();
        let mut applied = 0usize;
        while let Some(fix) = assist
            .fixes(&compilation, &current)
            .into_iter()
            .max_by_key(|fix| fix.edit.span.start)
        {
            current = fix.apply(&current)?;
            applied += 1;
        }

        tracing::info!(document = %doc.source_name(), applied, "applied union case completions");
        Ok(current)
    }
}
