//! Per-field code generation.
//!
//! For one resolved field this module produces the read expression, the
//! guarded write statement, and the destination-object properties the
//! reader pre-initializes. Message- and enum-typed fields delegate to the
//! resolved scope's generated functions; scalars dispatch through the type
//! tables in [`super::dispatch`].

use super::dispatch;
use super::js::{BinOp, Expr, Lit, Stmt};
use crate::error::{Error, Result};
use crate::scope::{DefaultValue, ResolvedField, ScopeId, ScopeKind, ScopeTree};

fn pbf() -> Expr {
    Expr::ident("pbf")
}

fn obj_member(name: &str) -> Expr {
    Expr::ident("obj").member(name)
}

fn default_lit(value: &DefaultValue) -> Expr {
    Expr::Lit(match value {
        DefaultValue::Int(v) => Lit::Int(*v),
        DefaultValue::Float(v) => Lit::Float(*v),
        DefaultValue::Bool(v) => Lit::Bool(*v),
        DefaultValue::Str(v) => Lit::Str(v.clone()),
    })
}

fn unresolved(tree: &ScopeTree<'_>, scope: ScopeId, rf: &ResolvedField<'_>) -> Error {
    Error::unresolved_type(
        tree.emitted_name(scope),
        rf.field.name.as_str(),
        rf.field.type_name.as_str(),
    )
}

/// Read expression for one field.
///
/// Message-typed fields read a length-delimited sub-message by invoking
/// the nested type's generated reader bounded by a varint length prefix;
/// enum-typed fields read their integer value as a varint; scalars
/// dispatch on type, packed when applicable.
pub(super) fn read_expr(
    tree: &ScopeTree<'_>,
    scope: ScopeId,
    rf: &ResolvedField<'_>,
) -> Result<Expr> {
    let field = rf.field;
    if let Some(target) = tree.resolve(scope, &field.type_name) {
        return match tree.kind(target) {
            ScopeKind::Message { .. } => {
                let end = Expr::bin(
                    BinOp::Add,
                    pbf().member("readVarint").call(Vec::new()),
                    pbf().member("pos"),
                );
                Ok(Expr::name(tree.emitted_name(target))
                    .member("read")
                    .call(vec![pbf(), end]))
            }
            ScopeKind::Enum(_) => Ok(pbf().member("readVarint").call(Vec::new())),
            ScopeKind::Root => Err(unresolved(tree, scope, rf)),
        };
    }

    let scalar = field.scalar().ok_or_else(|| unresolved(tree, scope, rf))?;
    Ok(pbf()
        .member(dispatch::read_method(scalar, field.is_packed()))
        .call(Vec::new()))
}

/// Guarded write statement for one field.
///
/// `loop_declared` tracks whether an earlier repeated write in the same
/// writer already declared the loop index variable; later loops reuse it.
pub(super) fn write_stmt(
    tree: &ScopeTree<'_>,
    scope: ScopeId,
    rf: &ResolvedField<'_>,
    loop_declared: &mut bool,
) -> Result<Stmt> {
    let field = rf.field;

    let inner = if field.repeated && !field.is_packed() {
        let element = obj_member(&field.name).index(Expr::ident("i"));
        let call = write_call(tree, scope, rf, element)?;
        let declare = !*loop_declared;
        *loop_declared = true;
        Stmt::For {
            declare,
            index: "i".to_string(),
            limit: obj_member(&field.name).member("length"),
            body: Box::new(Stmt::Expr(call)),
        }
    } else {
        Stmt::Expr(write_call(tree, scope, rf, obj_member(&field.name))?)
    };

    Ok(Stmt::If {
        cond: guard(tree, scope, rf),
        then: Box::new(inner),
        alt: None,
    })
}

/// The write call for one value (either the whole field or one element of
/// a repeated field).
fn write_call(
    tree: &ScopeTree<'_>,
    scope: ScopeId,
    rf: &ResolvedField<'_>,
    value: Expr,
) -> Result<Expr> {
    let field = rf.field;
    let tag = Expr::int(i64::from(field.tag));

    if let Some(target) = tree.resolve(scope, &field.type_name) {
        return match tree.kind(target) {
            ScopeKind::Message { .. } => {
                let writer = Expr::name(tree.emitted_name(target)).member("write");
                Ok(pbf().member("writeMessage").call(vec![tag, writer, value]))
            }
            ScopeKind::Enum(_) => {
                let method = if field.is_packed() {
                    "writePackedVarint"
                } else {
                    "writeVarintField"
                };
                Ok(pbf().member(method).call(vec![tag, value]))
            }
            ScopeKind::Root => Err(unresolved(tree, scope, rf)),
        };
    }

    let scalar = field.scalar().ok_or_else(|| unresolved(tree, scope, rf))?;
    Ok(pbf()
        .member(dispatch::write_method(scalar, field.is_packed()))
        .call(vec![tag, value]))
}

/// Presence guard for one field's write.
///
/// Repeated and message-typed fields get the plain truthiness test. For
/// the rest, a suppressed default (bytes) needs the definedness test, a
/// falsy default is already covered by truthiness, and a truthy default
/// adds the inequality so wire bytes are omitted whenever the value
/// equals its default.
fn guard(tree: &ScopeTree<'_>, scope: ScopeId, rf: &ResolvedField<'_>) -> Expr {
    let field = rf.field;
    let value = obj_member(&field.name);

    let target_is_message = tree
        .resolve(scope, &field.type_name)
        .map(|id| matches!(tree.kind(id), ScopeKind::Message { .. }))
        .unwrap_or(false);

    if field.repeated || target_is_message {
        return value;
    }

    match &rf.default {
        Some(default) if default.is_falsy() => value,
        Some(default) => Expr::bin(
            BinOp::And,
            Expr::bin(BinOp::LooseNe, value.clone(), Expr::undefined()),
            Expr::bin(BinOp::StrictNe, value, default_lit(default)),
        ),
        None => Expr::bin(BinOp::LooseNe, value, Expr::undefined()),
    }
}

/// Destination-object properties contributed by one field: an empty
/// sequence for repeated non-packed fields, the default value for fields
/// carrying one.
pub(super) fn dest_props(rf: &ResolvedField<'_>) -> Vec<(String, Expr)> {
    let field = rf.field;
    let mut props = Vec::new();

    if field.repeated && !field.is_packed() {
        props.push((field.name.clone(), Expr::Array(Vec::new())));
    }
    if let Some(default) = &rf.default {
        props.push((field.name.clone(), default_lit(default)));
    }
    props
}
