use std::{collections::BTreeSet, path::PathBuf};

use unionize_errors::CompilerError;

/// Expands `include` globs and drops every path matching an `exclude` glob.
pub fn match_paths(
    include: &[String],
    exclude: &[String],
) -> crate::Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    for pattern in include {
        for path in glob::glob(pattern).map_err(CompilerError::from)? {
            found.insert(path.map_err(CompilerError::from)?);
        }
    }

    let excluded = exclude
        .iter()
        .map(|pattern| glob::Pattern::new(pattern))
        .collect::<Result<Vec<_>, _>>()
        .map_err(CompilerError::from)?;

    Ok(found
        .into_iter()
        .filter(|path| {
            let skip = excluded
                .iter()
                .any(|pattern| pattern.matches_path(path));
            if skip {
                tracing::trace!(path = %path.display(), "excluded from sources");
            } else {
                tracing::trace!(path = %path.display(), "including in sources");
            }
            !skip
        })
        .collect())
}
