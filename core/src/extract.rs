//! Union Model Extractor.

use std::collections::BTreeSet;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use unionize_errors::{CompilerError, ExtractionError};
use unionize_syntax::{Attribute, Compilation, DeclId, TypeDecl, TypeKind};

use crate::{
    config::UnionizeConfig,
    model::{TypeDescriptor, Union, UnionCase, UnionCaseParameter},
};

/// A declaration that satisfies every union eligibility rule.
#[derive(Debug, Clone, Copy)]
pub struct Eligible<'a> {
    pub decl: &'a TypeDecl,
    pub marker: &'a Attribute,
    pub cases: &'a TypeDecl,
}

impl Eligible<'_> {
    pub fn allow_default(&self) -> bool {
        self.marker
            .bool_arg("AllowDefault")
            .unwrap_or(false)
    }
}

/// Output of [`Extractor::extract_all`].
#[derive(Debug, Default)]
pub struct Extraction {
    pub unions: Vec<Union>,
    pub failures: Vec<CompilerError>,
}

#[derive(Debug, Clone, Copy)]
pub struct Extractor<'c> {
    config: &'c UnionizeConfig,
}

impl<'c> Extractor<'c> {
    pub fn new(config: &'c UnionizeConfig) -> Self {
        Self { config }
    }

    /// Eligibility test shared by extraction, analysis and the assist.
    pub fn eligible<'a>(
        &self,
        decl: &'a TypeDecl,
    ) -> Option<Eligible<'a>> {
        let marker = decl.attribute(&self.config.marker)?;
        if !decl.modifiers.partial || !matches!(decl.kind, TypeKind::Struct | TypeKind::Class) {
            return None;
        }

        let mut case_lists = decl
            .nested_types()
            .filter(|nested| nested.kind == TypeKind::Interface && nested.name == self.config.case_list);
        let cases = case_lists.next()?;
        if case_lists.next().is_some() {
            return None;
        }

        Some(Eligible {
            decl,
            marker,
            cases,
        })
    }

    /// Builds the union model for one declaration.
    ///
    /// `Ok(None)` means the declaration is not a union.
    pub fn extract(
        &self,
        compilation: &Compilation<'_>,
        id: DeclId,
    ) -> Result<Option<Union>, CompilerError> {
        let declared = compilation.declared_type(id);
        let Some(eligible) = self.eligible(declared.decl) else {
            return Ok(None);
        };

        let descriptor = TypeDescriptor::declared(&declared);
        let in_scope = declared
            .parents
            .iter()
            .chain(std::iter::once(&declared.decl))
            .flat_map(|decl| decl.type_parameters.iter().map(String::as_str))
            .collect::<Vec<_>>();

        let document = declared.document;
        let attach = |err: CompilerError| err.with_source(document.source_name(), document.text.clone());

        let mut cases = vec![];
        let mut seen_cases = BTreeSet::new();
        for method in eligible
            .cases
            .methods()
            .filter(|method| method.returns.is_void())
        {
            if !seen_cases.insert(method.name.as_str()) {
                return Err(attach(
                    ExtractionError::duplicate_case(&descriptor.qualified, &method.name)
                        .at_opt(method.span),
                ));
            }

            let mut parameters = vec![];
            let mut seen_params = BTreeSet::new();
            for param in &method.parameters {
                if !seen_params.insert(param.name.as_str()) {
                    return Err(attach(
                        ExtractionError::duplicate_parameter(
                            &descriptor.qualified,
                            &method.name,
                            &param.name,
                        )
                        .at_opt(method.span),
                    ));
                }

                let Some(ty) = &param.ty else {
                    tracing::error!(
                        union = %descriptor.qualified,
                        case = %method.name,
                        parameter = %param.name,
                        "case parameter has no bound type"
                    );
                    return Err(attach(
                        ExtractionError::unresolved_parameter(
                            &descriptor.qualified,
                            &method.name,
                            &param.name,
                        )
                        .at_opt(method.span),
                    ));
                };

                parameters.push(UnionCaseParameter {
                    name: param.name.clone(),
                    ty: TypeDescriptor::resolve(ty, &in_scope),
                });
            }

            cases.push(UnionCase {
                name: method.name.clone(),
                parameters,
            });
        }

        tracing::trace!(
            union = %descriptor.qualified,
            cases = cases.len(),
            "extracted union"
        );

        Ok(Some(Union {
            name: declared.decl.name.clone(),
            allow_default: eligible.allow_default(),
            descriptor,
            cases,
        }))
    }

    /// Extracts every declaration of the compilation in parallel.
    ///
    /// Unions keep document and declaration order. Zero-case unions are dropped, and a
    /// definition declared as a union more than once is extracted from its first declaration.
    pub fn extract_all(
        &self,
        compilation: &Compilation<'_>,
    ) -> Extraction {
        let results = compilation
            .declarations()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|id| (id, self.extract(compilation, id)))
            .collect::<Vec<_>>();

        let mut extraction = Extraction::default();
        let mut keys = BTreeSet::new();
        for (id, result) in results {
            match result {
                Ok(Some(union)) if union.cases.is_empty() => {
                    tracing::debug!(union = %union.descriptor.qualified, "skipping union without cases");
                },
                Ok(Some(union)) => {
                    if keys.insert(compilation.key(id)) {
                        extraction.unions.push(union);
                    } else {
                        tracing::debug!(
                            union = %union.descriptor.qualified,
                            "union already extracted from another declaration"
                        );
                    }
                },
                Ok(None) => {},
                Err(err) => extraction.failures.push(err),
            }
        }
        extraction
    }
}
