//! Scope context tree for nested type resolution.
//!
//! This module builds a tree of lexical scopes mirroring the schema's
//! nesting, so that a field's type reference (possibly dotted, e.g.
//! `Outer.Inner`) can be resolved to the message or enum that defines it.
//!
//! ## Resolution rules
//!
//! Each path segment is looked up among the current scope's children first,
//! then outward through the enclosing scopes. A type nested more deeply
//! therefore shadows an outer type of the same name, while unqualified
//! references to siblings and ancestors still resolve. The lookup is an
//! explicit parent-link walk: every [`Scope`] carries an `enclosing` id and
//! the tree owns the arena, with no pointer graphs involved.
//!
//! ## Lifecycle
//!
//! [`ScopeTree::build`] runs two passes: the structure is created top-down,
//! then defaults are attached bottom-up as [`ResolvedField`] records owned
//! by the tree. The input [`Schema`] is never mutated.

mod defaults;

use crate::error::Result;
use crate::schema::{Enum, Message, Schema, SyntaxVersion};
use tracing::debug;

pub use defaults::{DefaultValue, ResolvedField};

/// Identifier of a scope within a [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// Node payload of a scope
#[derive(Debug)]
pub enum ScopeKind<'a> {
    /// The synthetic top-level scope
    Root,
    /// A message definition
    Message {
        /// The schema node
        node: &'a Message,
        /// Field descriptors enriched with resolved defaults
        /// (populated by the defaults pass)
        fields: Vec<ResolvedField<'a>>,
    },
    /// An enum definition
    Enum(&'a Enum),
}

/// One scope context: a plain node with an explicit enclosing reference
#[derive(Debug)]
pub struct Scope<'a> {
    /// Back-link for outward resolution (`None` for the root)
    enclosing: Option<ScopeId>,
    /// Simple name, as looked up from referencing scopes
    simple_name: String,
    /// Fully-qualified emitted name (enclosing chain joined with `.`)
    emitted_name: String,
    /// Whether the node is top-level (bound into the export surface)
    top_level: bool,
    /// Child scopes: nested enums first, then nested messages,
    /// declaration order preserved
    children: Vec<ScopeId>,
    /// Node payload
    kind: ScopeKind<'a>,
}

impl<'a> Scope<'a> {
    /// Returns the enclosing scope id, `None` for the root.
    pub fn enclosing(&self) -> Option<ScopeId> {
        self.enclosing
    }

    /// Returns the fully-qualified emitted name.
    pub fn emitted_name(&self) -> &str {
        &self.emitted_name
    }

    /// True when the node is top-level.
    pub fn is_top_level(&self) -> bool {
        self.top_level
    }

    /// Returns the node payload.
    pub fn kind(&self) -> &ScopeKind<'a> {
        &self.kind
    }
}

/// Lexical scope tree for one compilation
#[derive(Debug)]
pub struct ScopeTree<'a> {
    scopes: Vec<Scope<'a>>,
    syntax: SyntaxVersion,
}

impl<'a> ScopeTree<'a> {
    /// Builds the scope tree for a schema and attaches resolved defaults.
    pub fn build(schema: &'a Schema) -> Result<Self> {
        let root = Scope {
            enclosing: None,
            simple_name: String::new(),
            emitted_name: String::new(),
            top_level: false,
            children: Vec::new(),
            kind: ScopeKind::Root,
        };
        let mut tree = Self {
            scopes: vec![root],
            syntax: schema.syntax,
        };

        let root_id = tree.root();
        for nested in &schema.enums {
            tree.add_enum(root_id, nested);
        }
        for nested in &schema.messages {
            tree.add_message(root_id, nested);
        }

        tree.attach_defaults()?;

        debug!("built scope tree with {} scopes", tree.scopes.len());
        Ok(tree)
    }

    /// Returns the synthetic root scope id.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Returns the schema syntax version this tree was built for.
    pub fn syntax(&self) -> SyntaxVersion {
        self.syntax
    }

    /// Returns a scope by id.
    pub fn scope(&self, id: ScopeId) -> &Scope<'a> {
        &self.scopes[id.0]
    }

    /// Returns a scope's node payload.
    pub fn kind(&self, id: ScopeId) -> &ScopeKind<'a> {
        &self.scopes[id.0].kind
    }

    /// Returns a scope's fully-qualified emitted name.
    pub fn emitted_name(&self, id: ScopeId) -> &str {
        &self.scopes[id.0].emitted_name
    }

    /// Returns a scope's children in emission order.
    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        &self.scopes[id.0].children
    }

    /// Returns a message scope's resolved fields (empty for other kinds).
    pub fn message_fields(&self, id: ScopeId) -> &[ResolvedField<'a>] {
        match &self.scopes[id.0].kind {
            ScopeKind::Message { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Resolves a possibly-dotted type reference starting at `from`.
    ///
    /// The first segment is looked up among `from`'s children and then
    /// outward through enclosing scopes; each subsequent segment repeats
    /// the same rule starting from the scope found so far. Returns `None`
    /// when any segment fails to resolve.
    pub fn resolve(&self, from: ScopeId, path: &str) -> Option<ScopeId> {
        let mut current = from;
        for segment in path.split('.') {
            current = self.lookup(current, segment)?;
        }
        Some(current)
    }

    /// Looks up a single name: local children first, then outward.
    fn lookup(&self, from: ScopeId, name: &str) -> Option<ScopeId> {
        let mut scope = Some(from);
        while let Some(id) = scope {
            if let Some(child) = self.child_named(id, name) {
                return Some(child);
            }
            scope = self.scopes[id.0].enclosing;
        }
        None
    }

    fn child_named(&self, id: ScopeId, name: &str) -> Option<ScopeId> {
        self.scopes[id.0]
            .children
            .iter()
            .copied()
            .find(|child| self.scopes[child.0].simple_name == name)
    }

    fn add_message(&mut self, parent: ScopeId, node: &'a Message) -> ScopeId {
        let id = self.push_scope(
            parent,
            &node.name,
            ScopeKind::Message {
                node,
                fields: Vec::new(),
            },
        );
        for nested in &node.enums {
            self.add_enum(id, nested);
        }
        for nested in &node.messages {
            self.add_message(id, nested);
        }
        id
    }

    fn add_enum(&mut self, parent: ScopeId, node: &'a Enum) -> ScopeId {
        self.push_scope(parent, &node.name, ScopeKind::Enum(node))
    }

    fn push_scope(&mut self, parent: ScopeId, name: &str, kind: ScopeKind<'a>) -> ScopeId {
        let top_level = parent == self.root();
        let emitted_name = if top_level {
            name.to_string()
        } else {
            format!("{}.{}", self.scopes[parent.0].emitted_name, name)
        };

        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            enclosing: Some(parent),
            simple_name: name.to_string(),
            emitted_name,
            top_level,
            children: Vec::new(),
            kind,
        });
        self.scopes[parent.0].children.push(id);
        id
    }

    /// Attaches resolved defaults to every message scope, descendants
    /// before ancestors. Defaults are per-field with no cross-field
    /// dependency, so the order is a traversal convenience only.
    fn attach_defaults(&mut self) -> Result<()> {
        let mut order = Vec::with_capacity(self.scopes.len());
        self.post_order(self.root(), &mut order);

        for id in order {
            let node = match &self.scopes[id.0].kind {
                ScopeKind::Message { node, .. } => *node,
                _ => continue,
            };

            let mut resolved = Vec::with_capacity(node.fields.len());
            for field in &node.fields {
                resolved.push(defaults::resolve_field(self, id, field, self.syntax)?);
            }

            if let ScopeKind::Message { fields, .. } = &mut self.scopes[id.0].kind {
                *fields = resolved;
            }
        }
        Ok(())
    }

    fn post_order(&self, id: ScopeId, out: &mut Vec<ScopeId>) {
        for child in &self.scopes[id.0].children {
            self.post_order(*child, out);
        }
        out.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_emitted_names_and_top_level() {
        let schema = schema(
            r#"{
                "messages": [{
                    "name": "Outer",
                    "messages": [{"name": "Inner", "messages": [{"name": "Leaf"}]}]
                }]
            }"#,
        );
        let tree = ScopeTree::build(&schema).unwrap();

        let outer = tree.resolve(tree.root(), "Outer").unwrap();
        let inner = tree.resolve(tree.root(), "Outer.Inner").unwrap();
        let leaf = tree.resolve(tree.root(), "Outer.Inner.Leaf").unwrap();

        assert_eq!(tree.emitted_name(outer), "Outer");
        assert_eq!(tree.emitted_name(inner), "Outer.Inner");
        assert_eq!(tree.emitted_name(leaf), "Outer.Inner.Leaf");
        assert!(tree.scope(outer).is_top_level());
        assert!(!tree.scope(inner).is_top_level());
        assert_eq!(tree.scope(inner).enclosing(), Some(outer));
    }

    #[test]
    fn test_unqualified_reference_resolves_outward() {
        let schema = schema(
            r#"{
                "messages": [
                    {"name": "Outer", "messages": [{"name": "Inner"}]},
                    {"name": "Sibling"}
                ]
            }"#,
        );
        let tree = ScopeTree::build(&schema).unwrap();
        let outer = tree.resolve(tree.root(), "Outer").unwrap();
        let inner = tree.resolve(tree.root(), "Outer.Inner").unwrap();

        // Local child wins without qualification
        assert_eq!(tree.resolve(outer, "Inner"), Some(inner));
        // Enclosing scopes stay visible from nested scopes
        assert_eq!(
            tree.resolve(inner, "Sibling"),
            tree.resolve(tree.root(), "Sibling")
        );
        // A sibling top-level message reaches the nested type by full path
        let sibling = tree.resolve(tree.root(), "Sibling").unwrap();
        assert_eq!(tree.resolve(sibling, "Outer.Inner"), Some(inner));
    }

    #[test]
    fn test_deeper_scope_shadows_outer() {
        let schema = schema(
            r#"{
                "messages": [
                    {"name": "Thing"},
                    {"name": "Outer", "messages": [{"name": "Thing"}]}
                ]
            }"#,
        );
        let tree = ScopeTree::build(&schema).unwrap();
        let outer = tree.resolve(tree.root(), "Outer").unwrap();

        let shadowed = tree.resolve(outer, "Thing").unwrap();
        assert_eq!(tree.emitted_name(shadowed), "Outer.Thing");

        let top = tree.resolve(tree.root(), "Thing").unwrap();
        assert_eq!(tree.emitted_name(top), "Thing");
    }

    #[test]
    fn test_unresolvable_reference() {
        let schema = schema(r#"{"messages": [{"name": "Only"}]}"#);
        let tree = ScopeTree::build(&schema).unwrap();
        let only = tree.resolve(tree.root(), "Only").unwrap();

        assert_eq!(tree.resolve(only, "Missing"), None);
        assert_eq!(tree.resolve(only, "Only.Missing"), None);
    }

    #[test]
    fn test_children_order_enums_before_messages() {
        let schema = schema(
            r#"{
                "messages": [{
                    "name": "Outer",
                    "messages": [{"name": "A"}, {"name": "B"}],
                    "enums": [{"name": "Kind", "values": []}]
                }]
            }"#,
        );
        let tree = ScopeTree::build(&schema).unwrap();
        let outer = tree.resolve(tree.root(), "Outer").unwrap();

        let names: Vec<&str> = tree
            .children(outer)
            .iter()
            .map(|id| tree.emitted_name(*id))
            .collect();
        assert_eq!(names, vec!["Outer.Kind", "Outer.A", "Outer.B"]);
    }
}
