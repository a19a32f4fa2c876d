//! Code generation: per-type emission and the top-level compiler.
//!
//! ## Architecture
//!
//! Compilation runs in one pass over the scope tree built by
//! [`crate::scope`]:
//!
//! 1. Build the scope tree (attaching resolved defaults)
//! 2. Walk every scope in declaration order, enums before messages,
//!    emitting IR statements per type
//! 3. Print the IR as the output unit
//!
//! For a message the emitter produces a reader entry point (dispatching
//! `(tag, wire-type)` pairs through the runtime's `readFields` driver into
//! a destination object with pre-initialized sequences and defaults), a
//! writer entry point applying every field's guarded write in declaration
//! order, and the export binding that makes nested types reachable as
//! qualified members of their top-level type. For an enum it produces a
//! single order-preserving name-to-integer map export.
//!
//! Duplicate wire tags are accepted as input: the reader's dispatch chain
//! preserves declaration order, so a repeated tag resolves to whichever
//! branch appears first.

mod dispatch;
mod field;
mod js;

use crate::error::Result;
use crate::schema::{Enum, Schema};
use crate::scope::{ScopeId, ScopeKind, ScopeTree};
use js::{BinOp, Expr, Stmt};
use tracing::debug;

/// Options for one compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Suppress reader emission
    pub no_read: bool,
    /// Suppress writer emission
    pub no_write: bool,
    /// Symbol under which top-level types are exported
    pub exports: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            no_read: false,
            no_write: false,
            exports: "exports".to_string(),
        }
    }
}

impl CompileOptions {
    /// Creates options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether reader emission is suppressed
    pub fn no_read(mut self, no_read: bool) -> Self {
        self.no_read = no_read;
        self
    }

    /// Sets whether writer emission is suppressed
    pub fn no_write(mut self, no_write: bool) -> Self {
        self.no_write = no_write;
        self
    }

    /// Sets the export symbol
    pub fn exports(mut self, symbol: impl Into<String>) -> Self {
        self.exports = symbol.into();
        self
    }
}

/// A compiled unit wrapped as an evaluable module body.
///
/// The source declares the export object, defines every generated binding
/// and returns the object; evaluating it as a function body (the loader's
/// job, out of scope here) yields the live module value.
#[derive(Debug, Clone)]
pub struct CompiledModule {
    source: String,
    exports: Vec<String>,
}

impl CompiledModule {
    /// Returns the module body source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the names of the top-level types bound into the export
    /// surface, in emission order.
    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    /// Consumes the module, returning its source.
    pub fn into_source(self) -> String {
        self.source
    }
}

/// Compiles a schema into a ready-to-evaluate module body with default
/// options.
pub fn compile(schema: &Schema) -> Result<CompiledModule> {
    let raw = compile_raw(schema, &CompileOptions::default())?;

    let mut source = String::from("var exports = {};\n");
    source.push_str(&raw);
    source.push('\n');
    source.push_str("return exports;\n");

    let exports = schema
        .enums
        .iter()
        .map(|e| e.name.clone())
        .chain(schema.messages.iter().map(|m| m.name.clone()))
        .collect();

    Ok(CompiledModule { source, exports })
}

/// Compiles a schema into the generated source text.
///
/// Fails with a generation error whenever a field's type cannot be
/// dispatched; there is no partial output.
pub fn compile_raw(schema: &Schema, options: &CompileOptions) -> Result<String> {
    let tree = ScopeTree::build(schema)?;

    let mut stmts = Vec::new();
    emit_scope(&tree, tree.root(), options, &mut stmts)?;

    debug!(
        "generated {} statements for {} top-level types",
        stmts.len(),
        tree.children(tree.root()).len()
    );
    Ok(format!("'use strict';\n{}", js::emit(&stmts)))
}

fn emit_scope(
    tree: &ScopeTree<'_>,
    id: ScopeId,
    options: &CompileOptions,
    out: &mut Vec<Stmt>,
) -> Result<()> {
    match tree.kind(id) {
        ScopeKind::Root => {}
        ScopeKind::Message { .. } => emit_message(tree, id, options, out)?,
        ScopeKind::Enum(node) => emit_enum(tree, id, options, node, out),
    }
    for child in tree.children(id) {
        emit_scope(tree, *child, options, out)?;
    }
    Ok(())
}

fn emit_message(
    tree: &ScopeTree<'_>,
    id: ScopeId,
    options: &CompileOptions,
    out: &mut Vec<Stmt>,
) -> Result<()> {
    let name = tree.emitted_name(id);
    let fields = tree.message_fields(id);

    out.push(Stmt::Banner(name.to_string()));
    out.push(export_binding(tree, id, options, Expr::Object(Vec::new())));
    out.push(Stmt::Blank);

    if !options.no_read {
        let mut dest = Vec::new();
        for rf in fields {
            dest.extend(field::dest_props(rf));
        }
        let read_fn = Expr::Func {
            params: vec!["pbf", "end"],
            body: vec![Stmt::Return(Expr::ident("pbf").member("readFields").call(
                vec![
                    Expr::name(name).member("_readField"),
                    Expr::Object(dest),
                    Expr::ident("end"),
                ],
            ))],
        };
        out.push(Stmt::Expr(Expr::name(name).member("read").assign(read_fn)));

        // Tag dispatch in declaration order; the chain is built back to
        // front so earlier fields end up as earlier branches
        let mut chain: Option<Stmt> = None;
        for rf in fields.iter().rev() {
            let read = field::read_expr(tree, id, rf)?;
            let f = rf.field;
            let action = if f.repeated && !f.is_packed() {
                Expr::ident("obj")
                    .member(f.name.as_str())
                    .member("push")
                    .call(vec![read])
            } else {
                Expr::ident("obj").member(f.name.as_str()).assign(read)
            };
            chain = Some(Stmt::If {
                cond: Expr::bin(
                    BinOp::StrictEq,
                    Expr::ident("tag"),
                    Expr::int(i64::from(f.tag)),
                ),
                then: Box::new(Stmt::Expr(action)),
                alt: chain.map(Box::new),
            });
        }
        let read_field_fn = Expr::Func {
            params: vec!["tag", "obj", "pbf"],
            body: chain.into_iter().collect(),
        };
        out.push(Stmt::Expr(
            Expr::name(name).member("_readField").assign(read_field_fn),
        ));
    }

    if !options.no_write {
        let mut body = Vec::with_capacity(fields.len());
        let mut loop_declared = false;
        for rf in fields {
            body.push(field::write_stmt(tree, id, rf, &mut loop_declared)?);
        }
        let write_fn = Expr::Func {
            params: vec!["obj", "pbf"],
            body,
        };
        out.push(Stmt::Expr(Expr::name(name).member("write").assign(write_fn)));
    }

    Ok(())
}

fn emit_enum(
    tree: &ScopeTree<'_>,
    id: ScopeId,
    options: &CompileOptions,
    node: &Enum,
    out: &mut Vec<Stmt>,
) {
    let map = Expr::ValueMap(
        node.values
            .iter()
            .map(|v| (v.name.clone(), v.value))
            .collect(),
    );
    out.push(Stmt::Blank);
    out.push(export_binding(tree, id, options, map));
}

/// Export binding for one type: top-level nodes declare a local and bind
/// into the export surface, nested nodes assign onto their enclosing
/// type's binding.
fn export_binding(
    tree: &ScopeTree<'_>,
    id: ScopeId,
    options: &CompileOptions,
    value: Expr,
) -> Stmt {
    let name = tree.emitted_name(id);
    if tree.scope(id).is_top_level() {
        Stmt::Var(
            name.to_string(),
            Expr::ident(options.exports.as_str())
                .member(name)
                .assign(value),
        )
    } else {
        Stmt::Expr(Expr::name(name).assign(value))
    }
}
