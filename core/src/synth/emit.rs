//! Structured emitter: a tree of [`Node`]s pretty-printed by a [`Printer`].

/// Deepest indentation the printer will produce. Deeper nesting prints flush at this level.
pub const MAX_DEPTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Line(String),
    Blank,
    /// `header`, then the body between braces on their own lines.
    Block { header: String, body: Vec<Node> },
    /// Body one level deeper, without braces (switch sections).
    Indented(Vec<Node>),
}

impl Node {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    pub fn block(
        header: impl Into<String>,
        body: Vec<Node>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
        }
    }

    /// A braced block without header text.
    pub fn scope(body: Vec<Node>) -> Self {
        Self::Block {
            header: String::new(),
            body,
        }
    }
}

pub trait Emit {
    fn emit(
        &self,
        p: &mut Printer,
    );
}

impl Emit for Node {
    fn emit(
        &self,
        p: &mut Printer,
    ) {
        match self {
            Self::Line(text) => p.line(text),
            Self::Blank => p.blank(),
            Self::Block { header, body } => {
                if !header.is_empty() {
                    p.line(header);
                }
                p.open_block();
                p.write_all(body);
                p.close_block();
            },
            Self::Indented(body) => {
                p.indent();
                p.write_all(body);
                p.dedent();
            },
        }
    }
}

impl<T: Emit> Emit for [T] {
    fn emit(
        &self,
        p: &mut Printer,
    ) {
        for item in self {
            item.emit(p);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Printer {
    pub buf: String,
    pub indent_level: usize,
    pub indent_width: usize,
}

impl Printer {
    pub fn new(indent_width: usize) -> Self {
        Self {
            buf: String::with_capacity(4096),
            indent_level: 0,
            indent_width,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level = self.indent_level.saturating_add(1);
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Printed depth. Nesting past [`MAX_DEPTH`] is tracked but not printed.
    pub fn depth(&self) -> usize {
        self.indent_level.min(MAX_DEPTH)
    }

    pub fn line(
        &mut self,
        text: &str,
    ) {
        for _ in 0..self.depth() * self.indent_width {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn open_block(&mut self) {
        self.line("{");
        self.indent();
    }

    pub fn close_block(&mut self) {
        self.dedent();
        self.line("}");
    }

    pub fn write<W: Emit + ?Sized>(
        &mut self,
        w: &W,
    ) {
        w.emit(self);
    }

    pub fn write_all(
        &mut self,
        nodes: &[Node],
    ) {
        self.write(nodes);
    }
}

pub fn print(
    nodes: &[Node],
    indent_width: usize,
) -> String {
    let mut p = Printer::new(indent_width);
    p.write(nodes);
    p.buf
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prints_nested_blocks() {
        let nodes = vec![
            Node::line("// header"),
            Node::Blank,
            Node::block(
                "class A",
                vec![
                    Node::line("int x;"),
                    Node::block("switch (x)", vec![
                        Node::line("case 0:"),
                        Node::Indented(vec![Node::line("break;")]),
                    ]),
                ],
            ),
        ];

        unionize_testing::assert_snapshot!(print(&nodes, 2), @r"
        // header

        class A
        {
          int x;
          switch (x)
          {
            case 0:
              break;
          }
        }
        ");
    }

    #[test]
    fn depth_saturates() {
        let mut node = Node::line("leaf");
        for _ in 0..(MAX_DEPTH + 10) {
            node = Node::scope(vec![node]);
        }

        let printed = print(&[node], 1);
        let deepest = printed
            .lines()
            .map(|line| line.len() - line.trim_start().len())
            .max()
            .unwrap();
        assert_eq!(deepest, MAX_DEPTH);

        let mut p = Printer::new(4);
        p.dedent();
        assert_eq!(p.indent_level, 0);
    }

    #[test]
    fn dedent_past_saturation_restores_outer_depth() {
        let mut p = Printer::new(1);
        for _ in 0..(MAX_DEPTH + 10) {
            p.indent();
        }
        assert_eq!(p.depth(), MAX_DEPTH);

        for _ in 0..15 {
            p.dedent();
        }
        p.line("}");
        assert_eq!(p.buf, format!("{}}}\n", " ".repeat(MAX_DEPTH - 5)));
    }
}
