//! Type checker for the declaration subset.
//!
//! The checker answers three kinds of questions about a [`Program`]:
//!
//! - what type a type node denotes ([`Checker::type_from_type_node`]), with
//!   aliases, generics, conditional and mapped types evaluated;
//! - how to render a type back as a declaration type node
//!   ([`Checker::type_to_node`]);
//! - which semantic errors block emission ([`Checker::pre_emit_diagnostics`]).
//!
//! Types are interned in an arena owned by the checker and handed out as
//! [`TypeId`]s. All queries take `&self`; caches live behind `RefCell`s whose
//! borrows never span a call back into the checker.

mod check;
mod evaluate;
mod infer;
mod instantiate;
mod lower;
mod members;
mod node_builder;
mod relate;
mod scope;
mod types;
mod values;

#[cfg(test)]
mod checker_tests;
#[cfg(test)]
mod node_builder_tests;

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub use node_builder::NodeBuilderFlags;
pub(crate) use lower::{template_raw, template_text};
pub use types::{
    AliasRef, ElementKind, IndexInfo, MapperId, ObjectShape, Property, ShapeId, Signature,
    SignatureParam, StringMapping, TupleElement, TypeData, TypeId, TypeKind,
};

use crate::Diagnostics;
use crate::diagnostics::{DiagnosticKind, Span};
use crate::program::{NodeKey, Program, SymbolId, SymbolTable};
use types::{TypeTable, number_bits};

/// Nesting limit for instantiation and relation checks.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

#[derive(Debug, Clone, Copy)]
enum AliasState {
    Resolving { circular: bool },
    Resolved(TypeId),
}

pub struct Checker<'p> {
    program: &'p Program,
    strict_null_checks: bool,
    table: RefCell<TypeTable>,
    node_types: RefCell<HashMap<NodeKey, TypeId>>,
    alias_states: RefCell<HashMap<SymbolId, AliasState>>,
    /// `None` while the interface's heritage is being resolved.
    interface_shapes: RefCell<HashMap<SymbolId, Option<Rc<ObjectShape>>>>,
    decl_shapes: RefCell<HashMap<NodeKey, Rc<ObjectShape>>>,
    resolved_shapes: RefCell<HashMap<TypeId, Rc<ObjectShape>>>,
    instantiations: RefCell<HashMap<(TypeId, MapperId), TypeId>>,
    evaluations: RefCell<HashMap<(NodeKey, Option<MapperId>), TypeId>>,
    free_params: RefCell<HashMap<NodeKey, Rc<[SymbolId]>>>,
    generic: RefCell<HashMap<TypeId, bool>>,
    relations: RefCell<HashMap<(TypeId, TypeId), Option<bool>>>,
    relating: RefCell<HashSet<(TypeId, TypeId)>>,
    depth: Cell<u32>,
    depth_reported: Cell<bool>,
    /// Node whose checking triggered the current evaluation.
    site: Cell<Option<Span>>,
    diagnostics: RefCell<Diagnostics>,
}

impl std::fmt::Debug for Checker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("types", &self.table.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<'p> Checker<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            strict_null_checks: program.options().strict_null_checks(),
            table: RefCell::new(TypeTable::new()),
            node_types: RefCell::default(),
            alias_states: RefCell::default(),
            interface_shapes: RefCell::default(),
            decl_shapes: RefCell::default(),
            resolved_shapes: RefCell::default(),
            instantiations: RefCell::default(),
            evaluations: RefCell::default(),
            free_params: RefCell::default(),
            generic: RefCell::default(),
            relations: RefCell::default(),
            relating: RefCell::default(),
            depth: Cell::new(0),
            depth_reported: Cell::new(false),
            site: Cell::new(None),
            diagnostics: RefCell::default(),
        }
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    pub(crate) fn symbols(&self) -> &'p SymbolTable {
        self.program.symbols()
    }

    pub fn strict_null_checks(&self) -> bool {
        self.strict_null_checks
    }

    pub fn type_data(&self, id: TypeId) -> TypeData {
        self.table.borrow().get(id).clone()
    }

    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.table.borrow().get(id).kind.clone()
    }

    /// The alias a type was reached through, if any.
    pub fn alias_of(&self, id: TypeId) -> Option<AliasRef> {
        self.table.borrow().get(id).alias.clone()
    }

    pub(crate) fn intern(&self, kind: TypeKind) -> TypeId {
        self.table.borrow_mut().intern(TypeData { kind, alias: None })
    }

    /// Same type, reached through `alias` instead.
    pub(crate) fn with_alias(&self, id: TypeId, alias: Option<AliasRef>) -> TypeId {
        let kind = self.kind(id);
        self.table.borrow_mut().intern(TypeData { kind, alias })
    }

    /// Whether an alias may be attached to a type of this kind.
    pub(crate) fn can_carry_alias(&self, id: TypeId) -> bool {
        matches!(
            self.kind(id),
            TypeKind::Union(_)
                | TypeKind::Intersection(_)
                | TypeKind::Anonymous { .. }
                | TypeKind::Object(_)
                | TypeKind::Index(_)
                | TypeKind::IndexedAccess { .. }
                | TypeKind::Conditional { .. }
                | TypeKind::Mapped { .. }
        )
    }

    pub(crate) fn attach_alias(&self, id: TypeId, alias: AliasRef) -> TypeId {
        if self.can_carry_alias(id) {
            self.with_alias(id, Some(alias))
        } else {
            id
        }
    }

    pub(crate) fn string_literal(&self, value: &str) -> TypeId {
        self.intern(TypeKind::StringLiteral(value.to_string()))
    }

    pub(crate) fn number_literal(&self, value: f64) -> TypeId {
        self.intern(TypeKind::NumberLiteral(number_bits(value)))
    }

    pub(crate) fn bigint_literal(&self, digits: &str) -> TypeId {
        self.intern(TypeKind::BigIntLiteral(digits.to_string()))
    }

    pub(crate) fn param_type(&self, symbol: SymbolId) -> TypeId {
        self.intern(TypeKind::Param(symbol))
    }

    pub(crate) fn object_type(&self, shape: ObjectShape) -> TypeId {
        let id = self.table.borrow_mut().add_shape(shape);
        self.intern(TypeKind::Object(id))
    }

    pub(crate) fn shape(&self, id: ShapeId) -> Rc<ObjectShape> {
        self.table.borrow().shape(id)
    }

    pub(crate) fn make_mapper(&self, pairs: Vec<(SymbolId, TypeId)>) -> Option<MapperId> {
        if pairs.is_empty() {
            return None;
        }
        Some(self.table.borrow_mut().intern_mapper(pairs))
    }

    pub(crate) fn mapper_entries(&self, mapper: MapperId) -> Vec<(SymbolId, TypeId)> {
        self.table.borrow().mapper(mapper).to_vec()
    }

    pub(crate) fn map_symbol(&self, mapper: Option<MapperId>, symbol: SymbolId) -> Option<TypeId> {
        let mapper = mapper?;
        self.table
            .borrow()
            .mapper(mapper)
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, t)| *t)
    }

    /// `mapper` extended with (or overriding) one substitution.
    pub(crate) fn extend_mapper(
        &self,
        mapper: Option<MapperId>,
        symbol: SymbolId,
        ty: TypeId,
    ) -> Option<MapperId> {
        let mut pairs: Vec<_> = mapper
            .map(|m| self.mapper_entries(m))
            .unwrap_or_default()
            .into_iter()
            .filter(|(s, _)| *s != symbol)
            .collect();
        pairs.push((symbol, ty));
        self.make_mapper(pairs)
    }

    /// Runs `f` one level deeper, or returns `fallback` past the depth limit.
    pub(crate) fn nested<T>(&self, fallback: T, f: impl FnOnce() -> T) -> T {
        let depth = self.depth.get();
        if depth >= MAX_INSTANTIATION_DEPTH {
            self.report_depth_exceeded();
            return fallback;
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        result
    }

    fn report_depth_exceeded(&self) {
        if self.depth_reported.replace(true) {
            return;
        }
        let mut diagnostics = self.diagnostics.borrow_mut();
        match self.site.get() {
            Some(span) => diagnostics
                .report(DiagnosticKind::ExcessiveInstantiationDepth, span)
                .emit(),
            None => diagnostics
                .report_global(DiagnosticKind::ExcessiveInstantiationDepth)
                .emit(),
        }
    }

    pub(crate) fn report(&self, kind: DiagnosticKind, span: Span, args: &[&str]) {
        if self.program.source(span.source).is_default_lib() {
            return;
        }
        let mut diagnostics = self.diagnostics.borrow_mut();
        let builder = diagnostics.report(kind, span);
        if args.is_empty() {
            builder.emit();
        } else {
            builder.args(args).emit();
        }
    }
}
