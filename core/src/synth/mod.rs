//! Code Synthesizer.
//!
//! Emits one generated unit per union: the enclosing types re-opened as partials, a private
//! tag enumeration with an opaque payload slot, one factory per case, `Match` and
//! `MatchWithDefault` dispatch, and value equality.

pub mod emit;

use unionize_errors::CompilerError;

use crate::{
    config::UnionizeConfig,
    model::{Union, UnionCase},
};

pub use emit::{Emit, Node, Printer};

/// Maximum tuple arity before the remainder nests in the trailing slot.
const TUPLE_SLOTS: usize = 7;

const TAG: &str = "Tag";
const TAG_FIELD: &str = "_tag";
const DATA_FIELD: &str = "_data";
const DEFAULT_CALLBACK: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub file_name: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Synthesizer {
    indent_width: usize,
    generated_suffix: String,
}

impl Synthesizer {
    pub fn new(config: &UnionizeConfig) -> Self {
        Self {
            indent_width: config.indent_width,
            generated_suffix: config.generated_suffix.clone(),
        }
    }

    pub fn file_name(
        &self,
        union: &Union,
    ) -> String {
        format!("{}{}", union.descriptor.file_stem(), self.generated_suffix)
    }

    /// Emits the generated unit for `union`.
    ///
    /// The union must come from extraction: cases are unique and non-empty.
    pub fn synthesize(
        &self,
        union: &Union,
    ) -> Result<GeneratedSource, CompilerError> {
        let mut nodes = vec![
            Node::line("// <auto-generated/>"),
            Node::line("#nullable enable"),
            Node::Blank,
        ];
        if let Some(namespace) = &union.descriptor.namespace {
            nodes.push(Node::line(format!("namespace {namespace};")));
            nodes.push(Node::Blank);
        }

        let self_ty = union.descriptor.self_reference();
        let mut decl = Node::block(
            format!(
                "{} : System.IEquatable<{self_ty}>",
                union.descriptor.declaration_header()?
            ),
            UnionEmitter::new(union).members(),
        );

        for parent in union.descriptor.parents.iter().rev() {
            decl = Node::block(parent.declaration_header()?, vec![decl]);
        }
        nodes.push(decl);

        Ok(GeneratedSource {
            file_name: self.file_name(union),
            text: emit::print(&nodes, self.indent_width),
        })
    }
}

fn tuple_type(types: &[String]) -> String {
    if types.len() <= TUPLE_SLOTS {
        format!("System.ValueTuple<{}>", types.join(", "))
    } else {
        let (head, rest) = types.split_at(TUPLE_SLOTS);
        format!("System.ValueTuple<{}, {}>", head.join(", "), tuple_type(rest))
    }
}

fn pack(
    names: &[String],
    types: &[String],
) -> String {
    if names.len() <= TUPLE_SLOTS {
        format!("System.ValueTuple.Create({})", names.join(", "))
    } else {
        let (head, rest) = names.split_at(TUPLE_SLOTS);
        format!(
            "new {}({}, {})",
            tuple_type(types),
            head.join(", "),
            pack(rest, &types[TUPLE_SLOTS..])
        )
    }
}

/// Accessor for the `index`th packed value of `data`, following `.Rest` past seven slots.
fn item_access(index: usize) -> String {
    let mut access = String::from("data");
    for _ in 0..index / TUPLE_SLOTS {
        access.push_str(".Rest");
    }
    format!("{access}.Item{}", index % TUPLE_SLOTS + 1)
}

struct UnionEmitter<'u> {
    union: &'u Union,
    self_ty: String,
}

impl<'u> UnionEmitter<'u> {
    fn new(union: &'u Union) -> Self {
        Self {
            union,
            self_ty: union.descriptor.self_reference(),
        }
    }

    fn members(&self) -> Vec<Node> {
        let mut sections = vec![
            vec![self.tag_enum()],
            self.fields(),
            vec![self.constructor()],
        ];
        sections.extend(
            self.union
                .cases
                .iter()
                .map(|case| vec![self.factory(case)]),
        );
        sections.push(vec![self.match_fn()]);
        if self.union.has_default_dispatch() {
            sections.push(vec![self.match_with_default()]);
        }
        sections.extend(self.equality());

        let mut members = vec![];
        for (idx, section) in sections.into_iter().enumerate() {
            if idx > 0 {
                members.push(Node::Blank);
            }
            members.extend(section);
        }
        members
    }

    fn tag_enum(&self) -> Node {
        Node::block(
            format!("private enum {TAG} : {}", self.union.tag_repr().keyword()),
            self.union
                .cases
                .iter()
                .map(|case| Node::line(format!("{},", case.name)))
                .collect(),
        )
    }

    fn fields(&self) -> Vec<Node> {
        vec![
            Node::line(format!("private readonly {TAG} {TAG_FIELD};")),
            Node::line(format!("private readonly object? {DATA_FIELD};")),
        ]
    }

    fn constructor(&self) -> Node {
        Node::block(
            format!(
                "private {}({TAG} tag, object? data = default)",
                self.union.descriptor.name
            ),
            vec![
                Node::line(format!("{TAG_FIELD} = tag;")),
                Node::line(format!("{DATA_FIELD} = data;")),
            ],
        )
    }

    fn parameter_types(case: &UnionCase) -> Vec<String> {
        case.parameters
            .iter()
            .map(|param| param.ty.qualified.clone())
            .collect()
    }

    fn factory(
        &self,
        case: &UnionCase,
    ) -> Node {
        let self_ty = &self.self_ty;
        if case.is_nullary() {
            return Node::line(format!(
                "public static readonly {self_ty} {name} = new {self_ty}({TAG}.{name});",
                name = case.name
            ));
        }

        let types = Self::parameter_types(case);
        let names = case
            .parameters
            .iter()
            .map(|param| param.name.clone())
            .collect::<Vec<_>>();
        let params = case
            .parameters
            .iter()
            .map(|param| format!("{} {}", param.ty.qualified, param.name))
            .collect::<Vec<_>>()
            .join(", ");

        Node::block(
            format!("public static {self_ty} {}({params})", case.name),
            vec![Node::line(format!(
                "return new {self_ty}({TAG}.{}, {});",
                case.name,
                pack(&names, &types)
            ))],
        )
    }

    fn callback_type(case: &UnionCase) -> String {
        let mut args = Self::parameter_types(case);
        args.push("TResult".into());
        format!("System.Func<{}>", args.join(", "))
    }

    /// Unpacks the payload and invokes the case callback.
    fn dispatch_body(
        case: &UnionCase,
        guard: Option<Node>,
    ) -> Vec<Node> {
        let mut body: Vec<Node> = guard.into_iter().collect();
        if case.is_nullary() {
            body.push(Node::line(format!("return {}();", case.name)));
            return body;
        }

        let types = Self::parameter_types(case);
        body.push(Node::line(format!(
            "var data = ({}){DATA_FIELD}!;",
            tuple_type(&types)
        )));
        let args = (0..case.arity())
            .map(item_access)
            .collect::<Vec<_>>()
            .join(", ");
        body.push(Node::line(format!("return {}({args});", case.name)));
        body
    }

    fn match_fn(&self) -> Node {
        let params = self
            .union
            .cases
            .iter()
            .map(|case| format!("{} {}", Self::callback_type(case), case.name))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sections = vec![];
        for case in &self.union.cases {
            sections.push(Node::line(format!("case {TAG}.{}:", case.name)));
            if case.is_nullary() {
                sections.push(Node::Indented(Self::dispatch_body(case, None)));
            } else {
                sections.push(Node::scope(Self::dispatch_body(case, None)));
            }
        }
        sections.push(Node::line("default:"));
        sections.push(Node::Indented(vec![Node::line(format!(
            "throw new System.ArgumentOutOfRangeException(nameof({TAG_FIELD}), {TAG_FIELD}, null);"
        ))]));

        Node::block(
            format!("public TResult Match<TResult>({params})"),
            vec![Node::block(format!("switch ({TAG_FIELD})"), sections)],
        )
    }

    fn match_with_default(&self) -> Node {
        let params = std::iter::once(format!("System.Func<TResult> {DEFAULT_CALLBACK}"))
            .chain(
                self.union
                    .cases
                    .iter()
                    .map(|case| format!("{}? {} = null", Self::callback_type(case), case.name)),
            )
            .collect::<Vec<_>>()
            .join(", ");

        let mut sections = vec![];
        for case in &self.union.cases {
            sections.push(Node::line(format!("case {TAG}.{}:", case.name)));
            let guard = Node::line(format!("if ({} == null) goto default;", case.name));
            sections.push(Node::scope(Self::dispatch_body(case, Some(guard))));
        }
        sections.push(Node::line("default:"));
        sections.push(Node::Indented(vec![Node::line(format!(
            "return {DEFAULT_CALLBACK}();"
        ))]));

        Node::block(
            format!("public TResult MatchWithDefault<TResult>({params})"),
            vec![Node::block(format!("switch ({TAG_FIELD})"), sections)],
        )
    }

    fn equality(&self) -> Vec<Vec<Node>> {
        let self_ty = &self.self_ty;
        let payload_eq = format!(
            "{TAG_FIELD} == other.{TAG_FIELD} && object.Equals({DATA_FIELD}, other.{DATA_FIELD})"
        );

        let (typed_eq, op_eq, op_ne) = if self.union.is_class() {
            (
                Node::block(
                    format!("public bool Equals({self_ty}? other)"),
                    vec![Node::line(format!("return other is not null && {payload_eq};"))],
                ),
                Node::block(
                    format!("public static bool operator ==({self_ty}? left, {self_ty}? right)"),
                    vec![Node::line(
                        "return left is null ? right is null : left.Equals(right);",
                    )],
                ),
                Node::block(
                    format!("public static bool operator !=({self_ty}? left, {self_ty}? right)"),
                    vec![Node::line("return !(left == right);")],
                ),
            )
        } else {
            (
                Node::block(
                    format!("public bool Equals({self_ty} other)"),
                    vec![Node::line(format!("return {payload_eq};"))],
                ),
                Node::block(
                    format!("public static bool operator ==({self_ty} left, {self_ty} right)"),
                    vec![Node::line("return left.Equals(right);")],
                ),
                Node::block(
                    format!("public static bool operator !=({self_ty} left, {self_ty} right)"),
                    vec![Node::line("return !left.Equals(right);")],
                ),
            )
        };

        vec![
            vec![typed_eq],
            vec![Node::block(
                "public override bool Equals(object? obj)",
                vec![Node::line(format!(
                    "return obj is {self_ty} other && Equals(other);"
                ))],
            )],
            vec![Node::block(
                "public override int GetHashCode()",
                vec![Node::line(format!(
                    "return System.HashCode.Combine({TAG_FIELD}, {DATA_FIELD});"
                ))],
            )],
            vec![op_eq],
            vec![op_ne],
        ]
    }
}
