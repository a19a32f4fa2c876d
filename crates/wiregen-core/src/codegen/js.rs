//! JavaScript intermediate representation and emitter.
//!
//! Code is generated as a small tagged-variant AST of statements and
//! expressions, then printed by [`emit`]. The IR decouples what to
//! generate (scope walking, dispatch, guards) from how to print it, while
//! the emitter pins the exact layout the wire-codec runtime's consumers
//! expect: four-space indentation inside function bodies, single-line
//! `if (cond) stmt;` forms, and order-preserving multi-line enum maps.
//!
//! The IR only carries the statement shapes the generator produces; it is
//! not a general-purpose JavaScript AST.

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lit {
    /// Integer literal
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// Boolean literal
    Bool(bool),
    /// String literal (escaped on emission)
    Str(String),
    /// The `undefined` value
    Undefined,
}

/// A binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    /// `+`
    Add,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    /// `!=`
    LooseNe,
    /// `&&`
    And,
}

impl BinOp {
    fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::LooseNe => "!=",
            BinOp::And => "&&",
        }
    }
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    /// A bare identifier
    Ident(String),
    /// A literal
    Lit(Lit),
    /// Property access `object.property`
    Member(Box<Expr>, String),
    /// Subscript access `object[index]`
    Index(Box<Expr>, Box<Expr>),
    /// Call `callee(args...)`
    Call(Box<Expr>, Vec<Expr>),
    /// Binary operation `lhs op rhs`
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// Assignment `target = value` (an expression, so bindings chain)
    Assign(Box<Expr>, Box<Expr>),
    /// Inline object literal with bare keys `{a: 1, b: []}`
    Object(Vec<(String, Expr)>),
    /// Array literal
    Array(Vec<Expr>),
    /// Function expression
    Func {
        /// Parameter names
        params: Vec<&'static str>,
        /// Body statements
        body: Vec<Stmt>,
    },
    /// Order-preserving multi-line map of quoted names to integers
    /// (the enum export shape)
    ValueMap(Vec<(String, i64)>),
}

impl Expr {
    /// A bare identifier.
    pub(crate) fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// A possibly-dotted name, built as a member chain.
    pub(crate) fn name(qualified: &str) -> Self {
        let mut parts = qualified.split('.');
        let mut expr = Expr::ident(parts.next().unwrap_or_default());
        for part in parts {
            expr = expr.member(part);
        }
        expr
    }

    /// An integer literal.
    pub(crate) fn int(value: i64) -> Self {
        Expr::Lit(Lit::Int(value))
    }

    /// The `undefined` literal.
    pub(crate) fn undefined() -> Self {
        Expr::Lit(Lit::Undefined)
    }

    /// Property access on this expression.
    pub(crate) fn member(self, property: impl Into<String>) -> Self {
        Expr::Member(Box::new(self), property.into())
    }

    /// Subscript access on this expression.
    pub(crate) fn index(self, index: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(index))
    }

    /// Call of this expression.
    pub(crate) fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call(Box::new(self), args)
    }

    /// Assignment with this expression as the target.
    pub(crate) fn assign(self, value: Expr) -> Self {
        Expr::Assign(Box::new(self), Box::new(value))
    }

    /// Binary operation.
    pub(crate) fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stmt {
    /// Expression statement `expr;`
    Expr(Expr),
    /// Variable declaration `var name = init;`
    Var(String, Expr),
    /// Single-armed conditional `if (cond) then;` with an optional
    /// `else`/`else if` continuation
    If {
        /// Condition
        cond: Expr,
        /// Single statement executed when the condition holds
        then: Box<Stmt>,
        /// Chained alternative (`If` prints as `else if`)
        alt: Option<Box<Stmt>>,
    },
    /// Counted loop `for (var i = 0; i < limit; i++) body`
    For {
        /// Whether the index variable is declared here (`var i`) or
        /// reuses an earlier declaration
        declare: bool,
        /// Index variable name
        index: String,
        /// Loop bound expression
        limit: Expr,
        /// Single body statement
        body: Box<Stmt>,
    },
    /// Return statement
    Return(Expr),
    /// Section banner comment naming an emitted type
    Banner(String),
    /// Blank separator line
    Blank,
}

/// Prints a statement sequence as JavaScript source.
pub(crate) fn emit(stmts: &[Stmt]) -> String {
    let mut emitter = Emitter::new();
    for stmt in stmts {
        emitter.stmt(stmt);
    }
    emitter.finish()
}

const INDENT: &str = "    ";

struct Emitter {
    out: String,
    indent: usize,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn pad(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Banner(name) => {
                self.out.push_str("\n// ");
                self.out.push_str(name);
                self.out.push(' ');
                self.out.push_str(&"=".repeat(40));
                self.out.push_str("\n\n");
            }
            Stmt::Blank => self.out.push('\n'),
            Stmt::Var(name, init) => {
                self.pad();
                self.out.push_str("var ");
                self.out.push_str(name);
                self.out.push_str(" = ");
                self.expr(init);
                self.out.push_str(";\n");
            }
            Stmt::Expr(expr) => {
                self.pad();
                self.expr(expr);
                self.out.push_str(";\n");
            }
            Stmt::Return(expr) => {
                self.pad();
                self.out.push_str("return ");
                self.expr(expr);
                self.out.push_str(";\n");
            }
            Stmt::If { .. } => self.if_chain(stmt),
            Stmt::For { .. } => {
                self.pad();
                self.inline(stmt);
                self.out.push_str(";\n");
            }
        }
    }

    /// Prints an `if`/`else if` chain, one branch per line.
    fn if_chain(&mut self, mut stmt: &Stmt) {
        let mut keyword = "if";
        loop {
            let Stmt::If { cond, then, alt } = stmt else {
                self.pad();
                self.out.push_str("else ");
                self.inline(stmt);
                self.out.push_str(";\n");
                return;
            };
            self.pad();
            self.out.push_str(keyword);
            self.out.push_str(" (");
            self.expr(cond);
            self.out.push_str(") ");
            self.inline(then);
            self.out.push_str(";\n");
            match alt {
                Some(next) => {
                    keyword = "else if";
                    stmt = next;
                }
                None => return,
            }
        }
    }

    /// Prints a statement in single-statement position, without
    /// indentation or terminator. Only the shapes the generator places
    /// there are supported.
    fn inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::Return(expr) => {
                self.out.push_str("return ");
                self.expr(expr);
            }
            Stmt::For {
                declare,
                index,
                limit,
                body,
            } => {
                self.out.push_str("for (");
                if *declare {
                    self.out.push_str("var ");
                }
                self.out.push_str(index);
                self.out.push_str(" = 0; ");
                self.out.push_str(index);
                self.out.push_str(" < ");
                self.expr(limit);
                self.out.push_str("; ");
                self.out.push_str(index);
                self.out.push_str("++) ");
                self.inline(body);
            }
            _ => unreachable!("statement kind not valid in single-statement position"),
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.out.push_str(name),
            Expr::Lit(lit) => self.lit(lit),
            Expr::Member(object, property) => {
                self.expr(object);
                self.out.push('.');
                self.out.push_str(property);
            }
            Expr::Index(object, index) => {
                self.expr(object);
                self.out.push('[');
                self.expr(index);
                self.out.push(']');
            }
            Expr::Call(callee, args) => {
                self.expr(callee);
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.out.push(')');
            }
            Expr::Binary(op, lhs, rhs) => {
                self.expr(lhs);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(rhs);
            }
            Expr::Assign(target, value) => {
                self.expr(target);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Expr::Object(props) => {
                self.out.push('{');
                for (i, (key, value)) in props.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(key);
                    self.out.push_str(": ");
                    self.expr(value);
                }
                self.out.push('}');
            }
            Expr::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(item);
                }
                self.out.push(']');
            }
            Expr::Func { params, body } => {
                self.out.push_str("function (");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(param);
                }
                self.out.push_str(") {\n");
                self.indent += 1;
                for stmt in body {
                    self.stmt(stmt);
                }
                self.indent -= 1;
                self.pad();
                self.out.push('}');
            }
            Expr::ValueMap(entries) => self.value_map(entries),
        }
    }

    fn lit(&mut self, lit: &Lit) {
        match lit {
            Lit::Int(value) => self.out.push_str(&value.to_string()),
            Lit::Float(value) => self.out.push_str(&value.to_string()),
            Lit::Bool(value) => self.out.push_str(if *value { "true" } else { "false" }),
            Lit::Str(value) => self.string(value),
            Lit::Undefined => self.out.push_str("undefined"),
        }
    }

    /// Prints the enum export shape: quoted keys, four-space inner
    /// indentation, closing brace at the current level.
    fn value_map(&mut self, entries: &[(String, i64)]) {
        if entries.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.indent += 1;
        for (i, (name, value)) in entries.iter().enumerate() {
            self.pad();
            self.string(name);
            self.out.push_str(": ");
            self.out.push_str(&value.to_string());
            if i + 1 < entries.len() {
                self.out.push(',');
            }
            self.out.push('\n');
        }
        self.indent -= 1;
        self.pad();
        self.out.push('}');
    }

    fn string(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                _ if (c as u32) < 0x20 => {
                    self.out.push_str(&format!("\\u{:04x}", c as u32));
                }
                _ => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chained_binding() {
        let stmt = Stmt::Var(
            "Example".to_string(),
            Expr::ident("exports")
                .member("Example")
                .assign(Expr::Object(Vec::new())),
        );
        assert_eq!(emit(&[stmt]), "var Example = exports.Example = {};\n");
    }

    #[test]
    fn test_if_else_chain() {
        let branch = |name: &str| {
            Stmt::Expr(
                Expr::ident("obj")
                    .member(name)
                    .assign(Expr::ident("pbf").member("readVarint").call(Vec::new())),
            )
        };
        let chain = Stmt::If {
            cond: Expr::bin(BinOp::StrictEq, Expr::ident("tag"), Expr::int(1)),
            then: Box::new(branch("a")),
            alt: Some(Box::new(Stmt::If {
                cond: Expr::bin(BinOp::StrictEq, Expr::ident("tag"), Expr::int(2)),
                then: Box::new(branch("b")),
                alt: None,
            })),
        };
        assert_eq!(
            emit(&[chain]),
            "if (tag === 1) obj.a = pbf.readVarint();\n\
             else if (tag === 2) obj.b = pbf.readVarint();\n"
        );
    }

    #[test]
    fn test_guarded_loop_is_one_line() {
        let stmt = Stmt::If {
            cond: Expr::ident("obj").member("items"),
            then: Box::new(Stmt::For {
                declare: true,
                index: "i".to_string(),
                limit: Expr::ident("obj").member("items").member("length"),
                body: Box::new(Stmt::Expr(Expr::ident("pbf").member("writeFloatField").call(
                    vec![
                        Expr::int(2),
                        Expr::ident("obj").member("items").index(Expr::ident("i")),
                    ],
                ))),
            }),
            alt: None,
        };
        assert_eq!(
            emit(&[stmt]),
            "if (obj.items) for (var i = 0; i < obj.items.length; i++) \
             pbf.writeFloatField(2, obj.items[i]);\n"
        );
    }

    #[test]
    fn test_function_bodies() {
        let read = Stmt::Expr(Expr::name("Example.read").assign(Expr::Func {
            params: vec!["pbf", "end"],
            body: vec![Stmt::Return(Expr::ident("pbf").member("readFields").call(
                vec![
                    Expr::name("Example._readField"),
                    Expr::Object(Vec::new()),
                    Expr::ident("end"),
                ],
            ))],
        }));
        assert_eq!(
            emit(&[read]),
            "Example.read = function (pbf, end) {\n\
             \x20   return pbf.readFields(Example._readField, {}, end);\n\
             };\n"
        );

        let empty = Stmt::Expr(Expr::name("Example.write").assign(Expr::Func {
            params: vec!["obj", "pbf"],
            body: Vec::new(),
        }));
        assert_eq!(emit(&[empty]), "Example.write = function (obj, pbf) {\n};\n");
    }

    #[test]
    fn test_value_map() {
        let map = Expr::ValueMap(vec![("UNKNOWN".to_string(), 0), ("POINT".to_string(), 1)]);
        assert_eq!(
            emit(&[Stmt::Expr(Expr::name("Kind").assign(map))]),
            "Kind = {\n    \"UNKNOWN\": 0,\n    \"POINT\": 1\n};\n"
        );
        assert_eq!(
            emit(&[Stmt::Expr(
                Expr::name("Kind").assign(Expr::ValueMap(Vec::new()))
            )]),
            "Kind = {};\n"
        );
    }

    #[test]
    fn test_banner() {
        assert_eq!(
            emit(&[Stmt::Banner("Example".to_string())]),
            format!("\n// Example {}\n\n", "=".repeat(40))
        );
    }

    #[test]
    fn test_string_escaping() {
        let stmt = Stmt::Expr(Expr::Lit(Lit::Str("a\"b\\c\nd\u{1}".to_string())));
        assert_eq!(emit(&[stmt]), "\"a\\\"b\\\\c\\nd\\u0001\";\n");
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(emit(&[Stmt::Expr(Expr::Lit(Lit::Float(1.5)))]), "1.5;\n");
        assert_eq!(emit(&[Stmt::Expr(Expr::Lit(Lit::Float(1.0)))]), "1;\n");
        assert_eq!(emit(&[Stmt::Expr(Expr::int(-7))]), "-7;\n");
    }
}
