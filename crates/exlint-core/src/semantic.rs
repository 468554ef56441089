//! Semantic symbols and the host seam that resolves them.
//!
//! The engine never resolves names itself. It asks a [`SemanticModel`]
//! supplied by the host, and every lookup answers `None` when the host could
//! not resolve the node. [`SemanticIndex`] is an in-memory model a host can
//! populate directly.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::syntax::NodeId;

/// Upper bound on base-type chain walks, guarding against cyclic host data.
pub const MAX_BASE_CHAIN: usize = 256;

/// Handle to a type symbol owned by a [`SemanticModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a type id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A resolved type with single inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base: Option<TypeId>,
}

impl TypeSymbol {
    /// Creates a type symbol.
    #[must_use]
    pub fn new(name: impl Into<String>, base: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }

    /// Returns the simple type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the direct base type, or `None` at the root.
    #[must_use]
    pub const fn base(&self) -> Option<TypeId> {
        self.base
    }
}

/// A declared parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSymbol {
    name: String,
    type_name: String,
}

impl ParameterSymbol {
    /// Creates a parameter symbol.
    #[must_use]
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the simple name of the declared parameter type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// A resolved method or constructor.
///
/// # Example
///
/// ```
/// use exlint_core::{MethodSymbol, ParameterSymbol};
///
/// let ctor = MethodSymbol::new(
///     ".ctor",
///     vec![ParameterSymbol::new("String", "message")],
/// );
/// assert_eq!(ctor.parameter_index("message"), Some(0));
/// assert_eq!(ctor.parameter_index("paramName"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    name: String,
    parameters: Vec<ParameterSymbol>,
}

impl MethodSymbol {
    /// Creates a method symbol.
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: Vec<ParameterSymbol>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSymbol] {
        &self.parameters
    }

    /// Returns the position of the parameter with exactly this name.
    #[must_use]
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }
}

/// A compile-time constant value folded by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    /// A string constant, including `nameof(...)` results.
    String(String),
    /// An integral constant.
    Integer(i64),
    /// A boolean constant.
    Boolean(bool),
    /// The null literal.
    Null,
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(true) => f.write_str("True"),
            Self::Boolean(false) => f.write_str("False"),
            Self::Null => Ok(()),
        }
    }
}

/// Symbol, type and constant resolution supplied by the host front-end.
///
/// Implementations must be shareable across worker threads; the engine only
/// reads from them.
pub trait SemanticModel: Sync {
    /// Resolves the method or constructor invoked by a call node.
    fn resolve_method(&self, node: NodeId) -> Option<&MethodSymbol>;

    /// Resolves the static type of an expression or type reference.
    fn type_of(&self, node: NodeId) -> Option<TypeId>;

    /// Looks up a type symbol.
    fn type_symbol(&self, ty: TypeId) -> Option<&TypeSymbol>;

    /// Returns the folded constant value of an expression.
    fn constant_value(&self, node: NodeId) -> Option<ConstantValue>;

    /// Walks `ty` and then its base types, nearest first.
    ///
    /// The walk stops at the root, at an unknown id, or after
    /// [`MAX_BASE_CHAIN`] steps.
    fn base_chain(&self, ty: TypeId) -> BaseChain<'_>
    where
        Self: Sized,
    {
        BaseChain::new(self, ty)
    }
}

/// Iterator over a type and its ancestors, nearest first.
///
/// Returned by [`SemanticModel::base_chain`]; use [`BaseChain::new`] when
/// holding the model as a trait object.
pub struct BaseChain<'m> {
    model: &'m dyn SemanticModel,
    next: Option<TypeId>,
    remaining: usize,
}

impl<'m> BaseChain<'m> {
    /// Starts a walk at `ty`.
    #[must_use]
    pub fn new(model: &'m dyn SemanticModel, ty: TypeId) -> Self {
        Self {
            model,
            next: Some(ty),
            remaining: MAX_BASE_CHAIN,
        }
    }

    /// Returns `true` when the walk stopped at [`MAX_BASE_CHAIN`] while
    /// the chain still went on.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.remaining == 0 && self.next.is_some()
    }
}

impl fmt::Debug for BaseChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseChain")
            .field("next", &self.next)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl Iterator for BaseChain<'_> {
    type Item = TypeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.remaining = self.remaining.checked_sub(1)?;
        self.next = self.model.type_symbol(current).and_then(TypeSymbol::base);
        Some(current)
    }
}

/// In-memory [`SemanticModel`] populated by the host.
///
/// Base types must be declared before the types deriving from them, so
/// chains built through the index are always finite.
///
/// # Example
///
/// ```
/// use exlint_core::{NodeId, SemanticIndex, SemanticModel};
///
/// let mut index = SemanticIndex::new();
/// let exception = index.declare_type("Exception", None);
/// let io = index.declare_type("IOException", Some(exception));
/// index.bind_type(NodeId::from_raw(3), io);
///
/// assert_eq!(index.type_of(NodeId::from_raw(3)), Some(io));
/// let chain: Vec<_> = index.base_chain(io).collect();
/// assert_eq!(chain, vec![io, exception]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticIndex {
    types: Vec<TypeSymbol>,
    #[serde(default)]
    node_types: HashMap<NodeId, TypeId>,
    #[serde(default)]
    node_methods: HashMap<NodeId, MethodSymbol>,
    #[serde(default)]
    constants: HashMap<NodeId, ConstantValue>,
}

impl SemanticIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a type and returns its id.
    ///
    /// A `base` that was not declared by this index is dropped, making the
    /// new type a root.
    pub fn declare_type(&mut self, name: impl Into<String>, base: Option<TypeId>) -> TypeId {
        let known_base = base.filter(|b| self.type_symbol(*b).is_some());
        let raw = u32::try_from(self.types.len()).unwrap_or(u32::MAX);
        self.types.push(TypeSymbol::new(name, known_base));
        TypeId(raw)
    }

    /// Records the static type of a node.
    pub fn bind_type(&mut self, node: NodeId, ty: TypeId) {
        self.node_types.insert(node, ty);
    }

    /// Records the method or constructor invoked by a call node.
    pub fn bind_method(&mut self, node: NodeId, method: MethodSymbol) {
        self.node_methods.insert(node, method);
    }

    /// Records the folded constant value of an expression.
    pub fn bind_constant(&mut self, node: NodeId, value: ConstantValue) {
        self.constants.insert(node, value);
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl SemanticModel for SemanticIndex {
    fn resolve_method(&self, node: NodeId) -> Option<&MethodSymbol> {
        self.node_methods.get(&node)
    }

    fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    fn type_symbol(&self, ty: TypeId) -> Option<&TypeSymbol> {
        self.types.get(ty.0 as usize)
    }

    fn constant_value(&self, node: NodeId) -> Option<ConstantValue> {
        self.constants.get(&node).cloned()
    }
}
