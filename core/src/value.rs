//! Executable model of the generated value representation.
//!
//! A [`UnionValue`] is a tag plus an opaque payload whose shape is fixed by the tag. The
//! only producers are [`UnionType::construct`] and [`UnionType::singleton`], and the only
//! reader is the tag-dispatching [`Matcher`], mirroring the generated factories and `Match`.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use unionize_errors::{CompilerError, ValueError};

use crate::model::Union;

#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),
    Tuple(Vec<Value>),
    Union(UnionValue),
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // bitwise, so equality stays reflexive for NaN and agrees with `Hash`
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::Union(a), Self::Union(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(v) => v.hash(state),
            Self::Int(v) => v.hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Str(v) => v.hash(state),
            Self::Tuple(v) => v.hash(state),
            Self::Union(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            },
            Self::Union(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<UnionValue> for Value {
    fn from(v: UnionValue) -> Self {
        Self::Union(v)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct Shape {
    name: String,
    cases: Vec<(String, usize)>,
}

/// Factory for values of one union.
#[derive(Debug, Clone)]
pub struct UnionType {
    shape: Arc<Shape>,
}

impl UnionType {
    pub fn new(union: &Union) -> Self {
        Self {
            shape: Arc::new(Shape {
                name: union.descriptor.qualified.clone(),
                cases: union
                    .cases
                    .iter()
                    .map(|case| (case.name.clone(), case.arity()))
                    .collect(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shape.name
    }

    fn tag_of(
        &self,
        case: &str,
    ) -> Result<usize, CompilerError> {
        self.shape
            .cases
            .iter()
            .position(|(name, _)| name == case)
            .ok_or_else(|| {
                ValueError::unknown_case(&self.shape.name, case)
                    .unlocated()
                    .build()
            })
    }

    /// Builds a value of `case`, packing `args` as its payload.
    pub fn construct(
        &self,
        case: &str,
        args: Vec<Value>,
    ) -> Result<UnionValue, CompilerError> {
        let tag = self.tag_of(case)?;
        let expected = self.shape.cases[tag].1;
        if args.len() != expected {
            return Err(
                ValueError::arity_mismatch(&self.shape.name, case, expected, args.len())
                    .unlocated()
                    .build(),
            );
        }

        Ok(UnionValue {
            shape: self.shape.clone(),
            tag,
            payload: (expected > 0).then_some(args),
        })
    }

    /// The shared instance of a nullary case.
    pub fn singleton(
        &self,
        case: &str,
    ) -> Result<UnionValue, CompilerError> {
        self.construct(case, vec![])
    }
}

#[derive(Debug, Clone)]
pub struct UnionValue {
    shape: Arc<Shape>,
    tag: usize,
    payload: Option<Vec<Value>>,
}

impl UnionValue {
    pub fn tag(&self) -> usize {
        self.tag
    }

    pub fn case_name(&self) -> &str {
        &self.shape.cases[self.tag].0
    }

    pub fn union_name(&self) -> &str {
        &self.shape.name
    }

    pub fn matcher<'v, R>(&'v self) -> Matcher<'v, R> {
        Matcher {
            value: self,
            handlers: Vec::new(),
            error: None,
        }
    }
}

impl PartialEq for UnionValue {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.shape.name == other.shape.name
            && self.tag == other.tag
            && self.payload == other.payload
    }
}

impl Eq for UnionValue {}

impl Hash for UnionValue {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.shape.name.hash(state);
        self.tag.hash(state);
        self.payload.hash(state);
    }
}

impl fmt::Display for UnionValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}.{}", self.shape.name, self.case_name())?;
        if let Some(payload) = &self.payload {
            write!(f, "{}", Value::Tuple(payload.clone()))?;
        }
        Ok(())
    }
}

type Handler<'v, R> = Box<dyn FnOnce(&[Value]) -> R + 'v>;

/// Dispatch over a [`UnionValue`], one handler per case.
pub struct Matcher<'v, R> {
    value: &'v UnionValue,
    handlers: Vec<(usize, Handler<'v, R>)>,
    error: Option<CompilerError>,
}

impl<'v, R> Matcher<'v, R> {
    /// Registers the handler for `case`. It receives the payload in parameter order.
    pub fn on(
        mut self,
        case: &str,
        handler: impl FnOnce(&[Value]) -> R + 'v,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }

        let shape = &self.value.shape;
        match shape
            .cases
            .iter()
            .position(|(name, _)| name == case)
        {
            None => {
                self.error = Some(
                    ValueError::unknown_case(&shape.name, case)
                        .unlocated()
                        .build(),
                );
            },
            Some(tag) if self.handlers.iter().any(|(t, _)| *t == tag) => {
                self.error = Some(
                    ValueError::duplicate_handler(&shape.name, case)
                        .unlocated()
                        .build(),
                );
            },
            Some(tag) => {
                let handler: Handler<'v, R> = Box::new(handler);
                self.handlers.push((tag, handler));
            },
        }
        self
    }

    fn invoke(
        value: &UnionValue,
        handler: Handler<'v, R>,
    ) -> R {
        handler(value.payload.as_deref().unwrap_or(&[]))
    }

    /// Exhaustive dispatch: every case needs a handler.
    pub fn run(self) -> Result<R, CompilerError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let shape = &self.value.shape;
        let missing = shape
            .cases
            .iter()
            .enumerate()
            .filter(|(tag, _)| !self.handlers.iter().any(|(t, _)| t == tag))
            .map(|(_, (name, _))| name.as_str())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ValueError::missing_handlers(&shape.name, missing)
                .unlocated()
                .build());
        }

        let value = self.value;
        match self
            .handlers
            .into_iter()
            .find(|(tag, _)| *tag == value.tag)
        {
            Some((_, handler)) => Ok(Self::invoke(value, handler)),
            None => Err(unionize_errors::InternalError::unreachable("dispatch without handler").into()),
        }
    }

    /// Dispatch with a fallback for cases without a handler. Needs more than one case.
    pub fn run_with_default(
        self,
        default: impl FnOnce() -> R,
    ) -> Result<R, CompilerError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let shape = &self.value.shape;
        if shape.cases.len() <= 1 {
            return Err(ValueError::default_unavailable(&shape.name)
                .unlocated()
                .build());
        }

        let value = self.value;
        Ok(
            match self
                .handlers
                .into_iter()
                .find(|(tag, _)| *tag == value.tag)
            {
                Some((_, handler)) => Self::invoke(value, handler),
                None => default(),
            },
        )
    }
}
