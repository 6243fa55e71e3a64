//! Declaration index over a set of source documents.

use std::collections::BTreeMap;

use crate::{SourceDocument, TypeDecl, TypeRef, type_ref::definition_segment};

/// Index of a declaration within a [`Compilation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl DeclId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Entry<'a> {
    document: usize,
    decl: &'a TypeDecl,
    parent: Option<DeclId>,
    key: String,
}

/// A declaration with its namespace and enclosing declarations, outermost first.
#[derive(Debug, Clone)]
pub struct DeclaredType<'a> {
    pub id: DeclId,
    pub document: &'a SourceDocument,
    pub namespace: Option<&'a str>,
    pub decl: &'a TypeDecl,
    pub parents: Vec<&'a TypeDecl>,
}

/// An immutable view over documents with every declaration, nested ones included,
/// indexed by the key of its original definition.
#[derive(Debug)]
pub struct Compilation<'a> {
    documents: &'a [SourceDocument],
    entries: Vec<Entry<'a>>,
    by_key: BTreeMap<String, Vec<DeclId>>,
}

impl<'a> Compilation<'a> {
    pub fn new(documents: &'a [SourceDocument]) -> Self {
        let mut compilation = Self {
            documents,
            entries: vec![],
            by_key: BTreeMap::new(),
        };

        for (doc_idx, document) in documents.iter().enumerate() {
            let prefix = document
                .namespace
                .clone()
                .unwrap_or_default();
            for decl in &document.types {
                compilation.index(doc_idx, decl, None, &prefix);
            }
        }

        tracing::trace!(
            documents = documents.len(),
            declarations = compilation.entries.len(),
            "indexed compilation"
        );
        compilation
    }

    fn index(
        &mut self,
        document: usize,
        decl: &'a TypeDecl,
        parent: Option<DeclId>,
        prefix: &str,
    ) {
        let segment = definition_segment(&decl.name, decl.arity());
        let key = if prefix.is_empty() {
            segment
        } else {
            format!("{prefix}.{segment}")
        };

        let id = DeclId(self.entries.len());
        self.entries.push(Entry {
            document,
            decl,
            parent,
            key: key.clone(),
        });
        self.by_key
            .entry(key.clone())
            .or_default()
            .push(id);

        for nested in decl.nested_types() {
            self.index(document, nested, Some(id), &key);
        }
    }

    pub fn documents(&self) -> &'a [SourceDocument] {
        self.documents
    }

    pub fn declarations(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.entries.len()).map(DeclId)
    }

    pub fn decl(
        &self,
        id: DeclId,
    ) -> &'a TypeDecl {
        self.entries[id.0].decl
    }

    pub fn document(
        &self,
        id: DeclId,
    ) -> &'a SourceDocument {
        &self.documents[self.entries[id.0].document]
    }

    pub fn parent(
        &self,
        id: DeclId,
    ) -> Option<DeclId> {
        self.entries[id.0].parent
    }

    /// Definition key, e.g. ``Demo.Outer`1.Shape``.
    pub fn key(
        &self,
        id: DeclId,
    ) -> &str {
        &self.entries[id.0].key
    }

    /// Every declaration of the original definition behind `ty`.
    ///
    /// Partial types may be declared several times. A reference is looked up in the
    /// namespace of the referencing document first, then as written.
    pub fn declarations_of(
        &self,
        ty: &TypeRef,
        namespace: Option<&str>,
    ) -> Vec<DeclId> {
        let Some(key) = ty.definition_key() else {
            return vec![];
        };

        namespace
            .and_then(|ns| self.by_key.get(&format!("{ns}.{key}")))
            .or_else(|| self.by_key.get(&key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn declared_type(
        &self,
        id: DeclId,
    ) -> DeclaredType<'a> {
        let mut parents = vec![];
        let mut cursor = self.entries[id.0].parent;
        while let Some(parent) = cursor {
            let entry = &self.entries[parent.0];
            parents.push(entry.decl);
            cursor = entry.parent;
        }
        parents.reverse();

        let document = self.document(id);
        DeclaredType {
            id,
            document,
            namespace: document.namespace.as_deref(),
            decl: self.entries[id.0].decl,
            parents,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Member, TypeKind};

    fn documents() -> Vec<SourceDocument> {
        let mut shape = TypeDecl::new("Shape", TypeKind::Struct);
        shape.type_parameters = vec!["T".into()];
        shape
            .members
            .push(Member::Type(TypeDecl::new("Cases", TypeKind::Interface)));

        let mut outer = TypeDecl::new("Outer", TypeKind::Class);
        outer.members.push(Member::Type(shape));

        let first = SourceDocument {
            namespace: Some("Demo".into()),
            types: vec![outer],
            ..Default::default()
        };

        let second = SourceDocument {
            namespace: Some("Demo".into()),
            types: vec![TypeDecl::new("Outer", TypeKind::Class)],
            ..Default::default()
        };

        vec![first, second]
    }

    #[test]
    fn indexes_nested_declarations() {
        let docs = documents();
        let compilation = Compilation::new(&docs);

        let keys = compilation
            .declarations()
            .map(|id| compilation.key(id).to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "Demo.Outer",
                "Demo.Outer.Shape`1",
                "Demo.Outer.Shape`1.Cases",
                "Demo.Outer"
            ]
        );
    }

    #[test]
    fn partial_declarations_share_a_key() {
        let docs = documents();
        let compilation = Compilation::new(&docs);
        let ids = compilation.declarations_of(&TypeRef::parse("Demo.Outer").unwrap(), None);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn unqualified_lookup_uses_namespace() {
        let docs = documents();
        let compilation = Compilation::new(&docs);
        let ty = TypeRef::parse("Outer.Shape<int>").unwrap();

        assert!(compilation.declarations_of(&ty, None).is_empty());
        let ids = compilation.declarations_of(&ty, Some("Demo"));
        assert_eq!(ids.len(), 1);
        assert_eq!(compilation.decl(ids[0]).name, "Shape");

        assert!(
            compilation
                .declarations_of(&TypeRef::parse("Outer.Shape").unwrap(), Some("Demo"))
                .is_empty()
        );
    }

    #[test]
    fn document_namespace_shadows_global_declarations() {
        let global = SourceDocument {
            types: vec![TypeDecl::new("Shape", TypeKind::Class)],
            ..Default::default()
        };
        let scoped = SourceDocument {
            namespace: Some("Demo".into()),
            types: vec![TypeDecl::new("Shape", TypeKind::Struct)],
            ..Default::default()
        };
        let docs = vec![global, scoped];
        let compilation = Compilation::new(&docs);
        let ty = TypeRef::parse("Shape").unwrap();

        let ids = compilation.declarations_of(&ty, Some("Demo"));
        assert_eq!(ids.len(), 1);
        assert_eq!(compilation.key(ids[0]), "Demo.Shape");

        let ids = compilation.declarations_of(&ty, Some("Other"));
        assert_eq!(compilation.key(ids[0]), "Shape");
        assert_eq!(compilation.declarations_of(&ty, None).len(), 1);
    }

    #[test]
    fn parents_are_outermost_first() {
        let docs = documents();
        let compilation = Compilation::new(&docs);
        let cases = compilation
            .declarations()
            .find(|id| compilation.decl(*id).name == "Cases")
            .unwrap();

        let declared = compilation.declared_type(cases);
        assert_eq!(declared.namespace, Some("Demo"));
        assert_eq!(
            declared
                .parents
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Outer", "Shape"]
        );
        assert_eq!(compilation.parent(cases).map(|p| p.index()), Some(1));
    }
}
