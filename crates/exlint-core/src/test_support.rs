//! Fixture builder for C#-shaped syntax trees and their semantic index.
//!
//! Compiled for this crate's tests and, behind the `test-support` feature,
//! for downstream test suites. Every node is placed on its own source line:
//! node `#n` starts at zero-based line `n`, column 4, so rendered
//! diagnostics are easy to predict.

use std::collections::HashMap;

use crate::error::TreeError;
use crate::semantic::{ConstantValue, MethodSymbol, ParameterSymbol, SemanticIndex, TypeId};
use crate::span::{LineCol, Span};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree, TreeBuilder};

/// The framework exception types declared by
/// [`Fixture::with_standard_exceptions`], each with its base.
pub const STANDARD_EXCEPTIONS: &[(&str, Option<&str>)] = &[
    ("Exception", None),
    ("SystemException", Some("Exception")),
    ("ApplicationException", Some("Exception")),
    ("ArgumentException", Some("SystemException")),
    ("ArgumentNullException", Some("ArgumentException")),
    ("ArgumentOutOfRangeException", Some("ArgumentException")),
    ("InvalidOperationException", Some("SystemException")),
    ("FormatException", Some("SystemException")),
    ("KeyNotFoundException", Some("SystemException")),
    ("IOException", Some("SystemException")),
    ("FileNotFoundException", Some("IOException")),
];

const COLUMN: u32 = 4;
const LINE_WIDTH: u32 = 100;
const NODE_WIDTH: u32 = 10;

/// Expression passed as a call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValue<'a> {
    /// String literal, folded to a string constant.
    Str(&'a str),
    /// Integer literal, folded to an integer constant.
    Int(i64),
    /// `nameof(x)`, folded to the string constant `x`.
    NameOf(&'a str),
    /// Simple name with no constant value.
    Ident(&'a str),
    /// Member access with no constant value.
    Member(&'a str),
}

/// One call argument, optionally named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arg<'a> {
    name: Option<&'a str>,
    value: ArgValue<'a>,
}

impl<'a> Arg<'a> {
    /// A string literal argument.
    #[must_use]
    pub const fn string(value: &'a str) -> Self {
        Self::positional(ArgValue::Str(value))
    }

    /// An integer literal argument.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::positional(ArgValue::Int(value))
    }

    /// A `nameof(target)` argument.
    #[must_use]
    pub const fn name_of(target: &'a str) -> Self {
        Self::positional(ArgValue::NameOf(target))
    }

    /// A simple-name argument such as a caught exception variable.
    #[must_use]
    pub const fn ident(name: &'a str) -> Self {
        Self::positional(ArgValue::Ident(name))
    }

    /// A non-constant member access such as `request.Id`.
    #[must_use]
    pub const fn member(path: &'a str) -> Self {
        Self::positional(ArgValue::Member(path))
    }

    /// Turns the argument into a named argument.
    #[must_use]
    pub const fn named(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    const fn positional(value: ArgValue<'a>) -> Self {
        Self { name: None, value }
    }
}

/// An object creation `new T(...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct New<'a> {
    type_name: &'a str,
    arguments: Option<Vec<Arg<'a>>>,
    constructor: Option<Vec<(&'a str, &'a str)>>,
}

impl<'a> New<'a> {
    /// A creation of `type_name` with an empty argument list.
    #[must_use]
    pub const fn of(type_name: &'a str) -> Self {
        Self {
            type_name,
            arguments: Some(Vec::new()),
            constructor: None,
        }
    }

    /// Sets the call arguments.
    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = Arg<'a>>) -> Self {
        self.arguments = Some(args.into_iter().collect());
        self
    }

    /// Drops the argument list, as in `new T { ... }`.
    #[must_use]
    pub fn without_argument_list(mut self) -> Self {
        self.arguments = None;
        self
    }

    /// Binds the resolved constructor as `(type, name)` parameter pairs.
    #[must_use]
    pub fn constructor(mut self, parameters: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        self.constructor = Some(parameters.into_iter().collect());
        self
    }
}

/// A helper invocation `Callee(...)` whose result is thrown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'a> {
    callee: &'a str,
    arguments: Vec<Arg<'a>>,
    returns: Option<&'a str>,
}

impl<'a> Call<'a> {
    /// A call to `callee` without arguments.
    #[must_use]
    pub const fn to(callee: &'a str) -> Self {
        Self {
            callee,
            arguments: Vec::new(),
            returns: None,
        }
    }

    /// Sets the call arguments.
    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = Arg<'a>>) -> Self {
        self.arguments = args.into_iter().collect();
        self
    }

    /// Binds the static type returned by the call.
    #[must_use]
    pub const fn returns(mut self, type_name: &'a str) -> Self {
        self.returns = Some(type_name);
        self
    }
}

/// The shape of a catch clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catch<'a> {
    type_name: Option<&'a str>,
    variable: Option<&'a str>,
    filtered: bool,
}

impl<'a> Catch<'a> {
    /// A catch-all clause, `catch { ... }`.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            type_name: None,
            variable: None,
            filtered: false,
        }
    }

    /// A typed clause without a variable, `catch (T) { ... }`.
    #[must_use]
    pub const fn of(type_name: &'a str) -> Self {
        Self {
            type_name: Some(type_name),
            variable: None,
            filtered: false,
        }
    }

    /// Binds the caught exception to `variable`.
    #[must_use]
    pub const fn bind(mut self, variable: &'a str) -> Self {
        self.variable = Some(variable);
        self
    }

    /// Adds a `when (...)` filter.
    #[must_use]
    pub const fn when(mut self) -> Self {
        self.filtered = true;
        self
    }
}

/// Node ids produced for one throw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thrown {
    /// The throw statement or throw expression.
    pub throw: NodeId,
    /// The thrown operand.
    pub operand: Option<NodeId>,
    /// The type reference of a thrown object creation.
    pub type_reference: Option<NodeId>,
    /// The `Argument` nodes of the thrown call, in order.
    pub arguments: Vec<NodeId>,
}

/// A finished fixture.
#[derive(Debug, Clone)]
pub struct FixtureUnit {
    /// The syntax tree.
    pub tree: SyntaxTree,
    /// The semantic bindings made while building.
    pub model: SemanticIndex,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Member,
    TryBody,
    Handler,
    Node,
}

impl Frame {
    const fn depth(self) -> usize {
        match self {
            Self::Node => 1,
            Self::Member | Self::TryBody => 2,
            Self::Handler => 3,
        }
    }
}

/// Builds a syntax tree and semantic index in source order.
///
/// `begin_*` calls open a construct and [`end`](Self::end) closes the most
/// recent one. [`finish`](Self::finish) closes whatever is still open.
#[derive(Debug)]
pub struct Fixture {
    builder: TreeBuilder,
    model: SemanticIndex,
    types: HashMap<String, TypeId>,
    frames: Vec<Frame>,
    line: u32,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Starts a compilation unit holding one type declaration.
    #[must_use]
    pub fn new() -> Self {
        let mut fixture = Self {
            builder: TreeBuilder::new(),
            model: SemanticIndex::new(),
            types: HashMap::new(),
            frames: Vec::new(),
            line: 0,
        };
        fixture.open(SyntaxKind::CompilationUnit);
        fixture.open_text(SyntaxKind::TypeDeclaration, "Fixture");
        fixture
    }

    /// Starts a fixture with [`STANDARD_EXCEPTIONS`] declared.
    #[must_use]
    pub fn with_standard_exceptions() -> Self {
        let mut fixture = Self::new();
        for (name, base) in STANDARD_EXCEPTIONS {
            fixture.declare_type(name, *base);
        }
        fixture
    }

    /// Declares a type deriving from the already declared `base`.
    pub fn declare_type(&mut self, name: &str, base: Option<&str>) -> TypeId {
        let base_id = base.and_then(|b| self.type_id(b));
        let ty = self.model.declare_type(name, base_id);
        self.types.insert(name.to_owned(), ty);
        ty
    }

    /// Returns the id of a declared type.
    #[must_use]
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).copied()
    }

    /// Gives direct access to the semantic index for custom bindings.
    pub const fn model_mut(&mut self) -> &mut SemanticIndex {
        &mut self.model
    }

    /// Opens a method with `(type, name)` parameters and its body block.
    pub fn begin_method(&mut self, name: &str, parameters: &[(&str, &str)]) -> NodeId {
        self.begin_member(SyntaxKind::MethodDeclaration, name, parameters)
    }

    /// Opens a method, constructor or local function and its body block.
    pub fn begin_member(
        &mut self,
        kind: SyntaxKind,
        name: &str,
        parameters: &[(&str, &str)],
    ) -> NodeId {
        let member = self.open_text(kind, name);
        self.open(SyntaxKind::ParameterList);
        for (type_name, param_name) in parameters {
            self.open_text(SyntaxKind::Parameter, param_name);
            let type_ref = self.leaf_text(SyntaxKind::TypeReference, type_name);
            self.bind_declared_type(type_ref, type_name);
            self.close();
        }
        self.close();
        self.open(SyntaxKind::Block);
        self.frames.push(Frame::Member);
        member
    }

    /// Opens a `try` statement and its protected block.
    pub fn begin_try(&mut self) -> NodeId {
        let try_stmt = self.open(SyntaxKind::TryStatement);
        self.open(SyntaxKind::Block);
        self.frames.push(Frame::TryBody);
        try_stmt
    }

    /// Ends the protected block or previous handler and opens a catch clause.
    pub fn begin_catch(&mut self, catch: &Catch<'_>) -> NodeId {
        self.leave_try_part();
        let clause = self.open(SyntaxKind::CatchClause);
        if let Some(type_name) = catch.type_name {
            match catch.variable {
                Some(variable) => self.open_text(SyntaxKind::CatchDeclaration, variable),
                None => self.open(SyntaxKind::CatchDeclaration),
            };
            let type_ref = self.leaf_text(SyntaxKind::TypeReference, type_name);
            self.bind_declared_type(type_ref, type_name);
            self.close();
        }
        if catch.filtered {
            self.leaf(SyntaxKind::CatchFilter);
        }
        self.open(SyntaxKind::Block);
        self.frames.push(Frame::Handler);
        clause
    }

    /// Ends the protected block or previous handler and opens `finally`.
    pub fn begin_finally(&mut self) -> NodeId {
        self.leave_try_part();
        let clause = self.open(SyntaxKind::FinallyClause);
        self.open(SyntaxKind::Block);
        self.frames.push(Frame::Handler);
        clause
    }

    /// Opens an arbitrary node, such as a nested block or lambda.
    pub fn begin(&mut self, kind: SyntaxKind) -> NodeId {
        let node = self.open(kind);
        self.frames.push(Frame::Node);
        node
    }

    /// Closes the most recently opened construct.
    pub fn end(&mut self) {
        if let Some(frame) = self.frames.pop() {
            for _ in 0..frame.depth() {
                self.close();
            }
        }
    }

    /// Adds an expression statement with nothing to analyse.
    pub fn statement(&mut self) -> NodeId {
        self.leaf(SyntaxKind::ExpressionStatement)
    }

    /// Adds `throw new T(...);`.
    pub fn throw(&mut self, creation: &New<'_>) -> Thrown {
        let throw = self.open(SyntaxKind::ThrowStatement);
        let thrown = self.creation(throw, creation);
        self.close();
        thrown
    }

    /// Adds `value ?? throw new T(...);`.
    pub fn throw_expression(&mut self, creation: &New<'_>) -> Thrown {
        self.open(SyntaxKind::ExpressionStatement);
        self.open(SyntaxKind::BinaryExpression);
        self.leaf_text(SyntaxKind::Identifier, "value");
        let throw = self.open(SyntaxKind::ThrowExpression);
        let thrown = self.creation(throw, creation);
        self.close();
        self.close();
        self.close();
        thrown
    }

    /// Adds `throw Callee(...);`.
    pub fn throw_call(&mut self, call: &Call<'_>) -> Thrown {
        let throw = self.open(SyntaxKind::ThrowStatement);
        let invocation = self.open(SyntaxKind::Invocation);
        self.leaf_text(SyntaxKind::Identifier, call.callee);
        let arguments = self.argument_list(&call.arguments);
        self.close();
        if let Some(type_name) = call.returns {
            self.bind_declared_type(invocation, type_name);
        }
        self.close();
        Thrown {
            throw,
            operand: Some(invocation),
            type_reference: None,
            arguments,
        }
    }

    /// Adds `throw name;`, optionally binding the static type of `name`.
    pub fn throw_identifier(&mut self, name: &str, type_name: Option<&str>) -> Thrown {
        let throw = self.open(SyntaxKind::ThrowStatement);
        let ident = self.leaf_text(SyntaxKind::Identifier, name);
        if let Some(declared) = type_name {
            self.bind_declared_type(ident, declared);
        }
        self.close();
        Thrown {
            throw,
            operand: Some(ident),
            type_reference: None,
            arguments: Vec::new(),
        }
    }

    /// Adds a bare `throw;`.
    pub fn rethrow(&mut self) -> NodeId {
        self.leaf(SyntaxKind::ThrowStatement)
    }

    /// Closes everything still open and returns the tree and its bindings.
    ///
    /// # Errors
    ///
    /// Returns the [`TreeError`] recorded by the underlying builder.
    pub fn finish(mut self) -> Result<FixtureUnit, TreeError> {
        while !self.frames.is_empty() {
            self.end();
        }
        self.close();
        self.close();
        let tree = self.builder.finish()?;
        Ok(FixtureUnit {
            tree,
            model: self.model,
        })
    }

    fn leave_try_part(&mut self) {
        match self.frames.pop() {
            Some(Frame::TryBody) => self.close(),
            Some(Frame::Handler) => {
                self.close();
                self.close();
            }
            Some(other) => self.frames.push(other),
            None => {}
        }
    }

    fn creation(&mut self, throw: NodeId, creation: &New<'_>) -> Thrown {
        let object = self.open(SyntaxKind::ObjectCreation);
        let type_ref = self.leaf_text(SyntaxKind::TypeReference, creation.type_name);
        let arguments = match &creation.arguments {
            Some(args) => self.argument_list(args),
            None => Vec::new(),
        };
        self.close();
        self.bind_declared_type(object, creation.type_name);
        self.bind_declared_type(type_ref, creation.type_name);
        if let Some(parameters) = &creation.constructor {
            let symbols = parameters
                .iter()
                .map(|(type_name, name)| ParameterSymbol::new(*type_name, *name))
                .collect();
            self.model
                .bind_method(object, MethodSymbol::new(".ctor", symbols));
        }
        Thrown {
            throw,
            operand: Some(object),
            type_reference: Some(type_ref),
            arguments,
        }
    }

    fn argument_list(&mut self, args: &[Arg<'_>]) -> Vec<NodeId> {
        self.open(SyntaxKind::ArgumentList);
        let ids = args.iter().map(|arg| self.argument(*arg)).collect();
        self.close();
        ids
    }

    fn argument(&mut self, arg: Arg<'_>) -> NodeId {
        let node = match arg.name {
            Some(name) => self.open_text(SyntaxKind::Argument, name),
            None => self.open(SyntaxKind::Argument),
        };
        match arg.value {
            ArgValue::Str(value) => {
                let literal = self.leaf_text(SyntaxKind::Literal, &format!("\"{value}\""));
                self.model
                    .bind_constant(literal, ConstantValue::String(value.to_owned()));
            }
            ArgValue::Int(value) => {
                let literal = self.leaf_text(SyntaxKind::Literal, &value.to_string());
                self.model
                    .bind_constant(literal, ConstantValue::Integer(value));
            }
            ArgValue::NameOf(target) => {
                let call = self.open(SyntaxKind::Invocation);
                self.leaf_text(SyntaxKind::Identifier, "nameof");
                self.argument_list(&[Arg::ident(target)]);
                self.close();
                self.model
                    .bind_constant(call, ConstantValue::String(target.to_owned()));
            }
            ArgValue::Ident(name) => {
                self.leaf_text(SyntaxKind::Identifier, name);
            }
            ArgValue::Member(path) => {
                self.leaf_text(SyntaxKind::MemberAccess, path);
            }
        }
        self.close();
        node
    }

    fn bind_declared_type(&mut self, node: NodeId, type_name: &str) {
        if let Some(ty) = self.type_id(type_name) {
            self.model.bind_type(node, ty);
        }
    }

    fn next_span(&mut self) -> Span {
        let line = self.line;
        self.line = self.line.saturating_add(1);
        let start_byte = line.saturating_mul(LINE_WIDTH).saturating_add(COLUMN);
        Span::new(
            start_byte,
            start_byte.saturating_add(NODE_WIDTH),
            LineCol::new(line, COLUMN),
            LineCol::new(line, COLUMN.saturating_add(NODE_WIDTH)),
        )
    }

    fn open(&mut self, kind: SyntaxKind) -> NodeId {
        let span = self.next_span();
        self.builder.open(kind, span)
    }

    fn open_text(&mut self, kind: SyntaxKind, text: &str) -> NodeId {
        let span = self.next_span();
        self.builder.open_with_text(kind, span, text)
    }

    fn leaf(&mut self, kind: SyntaxKind) -> NodeId {
        let span = self.next_span();
        self.builder.leaf(kind, span)
    }

    fn leaf_text(&mut self, kind: SyntaxKind, text: &str) -> NodeId {
        let span = self.next_span();
        self.builder.leaf_with_text(kind, span, text)
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
