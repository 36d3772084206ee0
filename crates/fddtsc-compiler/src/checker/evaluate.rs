//! Type operators: unions, intersections, `keyof`, indexed access, template
//! literals, string mappings, conditional and mapped types.
//!
//! Each operator normalizes eagerly when its operands are concrete and defers
//! to a dedicated [`TypeKind`] when they are generic; instantiation re-runs
//! the operator once the operands become concrete.

use std::rc::Rc;

use fddtsc_core::utils::{is_numeric_literal_name, js_number_to_string};

use super::Checker;
use super::scope::{Meaning, Resolution, owning_conditional};
use super::types::{
    ElementKind, IndexInfo, MapperId, ObjectShape, Property, StringMapping, TupleElement, TypeId,
    TypeKind,
};
use crate::parser::ast::{self, ConditionalType, InferType, MappedModifier, MappedType, TypeRef};
use crate::program::{NodeKey, SymbolFlags, SymbolId};
use crate::source_map::SourceId;

/// Why an indexed access has no type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AccessError {
    MissingProperty(String),
    NotIndexable,
}

/// Syntactic parts of a mapped type declaration.
struct MappedParts {
    file: SourceId,
    key: SymbolId,
    constraint: Option<ast::Type>,
    name_type: Option<ast::Type>,
    template: Option<ast::Type>,
    readonly: Option<MappedModifier>,
    optional: Option<MappedModifier>,
}

impl MappedParts {
    /// Operand `T` of a `keyof T` constraint.
    fn homomorphic_operand(&self) -> Option<ast::Type> {
        match &self.constraint {
            Some(ast::Type::Operator(op)) if op.operator() == "keyof" => op.ty(),
            _ => None,
        }
    }
}

impl<'p> Checker<'p> {
    pub(crate) fn get_union(&self, types: Vec<TypeId>) -> TypeId {
        let mut members = Vec::new();
        let (mut any, mut error, mut unknown) = (false, false, false);
        self.collect_union(types, &mut members, &mut any, &mut error, &mut unknown);
        if error {
            return TypeId::ERROR;
        }
        if any {
            return TypeId::ANY;
        }
        if unknown {
            return TypeId::UNKNOWN;
        }

        let has = |id| members.contains(&id);
        let (string, number, bigint) = (has(TypeId::STRING), has(TypeId::NUMBER), has(TypeId::BIGINT));
        let void = has(TypeId::VOID);
        members.retain(|&m| match self.kind(m) {
            TypeKind::StringLiteral(_) | TypeKind::TemplateLiteral { .. } | TypeKind::StringMapping { .. } => {
                !string
            }
            TypeKind::NumberLiteral(_) => !number,
            TypeKind::BigIntLiteral(_) => !bigint,
            TypeKind::Undefined => !void,
            _ => true,
        });
        if !self.strict_null_checks
            && members
                .iter()
                .any(|&m| !matches!(m, TypeId::NULL | TypeId::UNDEFINED))
        {
            members.retain(|&m| !matches!(m, TypeId::NULL | TypeId::UNDEFINED));
        }

        members.sort();
        match members.len() {
            0 => TypeId::NEVER,
            1 => members[0],
            _ => self.intern(TypeKind::Union(members)),
        }
    }

    fn collect_union(
        &self,
        types: Vec<TypeId>,
        out: &mut Vec<TypeId>,
        any: &mut bool,
        error: &mut bool,
        unknown: &mut bool,
    ) {
        for ty in types {
            match self.kind(ty) {
                TypeKind::Union(members) => self.collect_union(members, out, any, error, unknown),
                TypeKind::Never => {}
                TypeKind::Any => *any = true,
                TypeKind::Error => *error = true,
                TypeKind::Unknown => *unknown = true,
                _ => {
                    if !out.contains(&ty) {
                        out.push(ty);
                    }
                }
            }
        }
    }

    pub(crate) fn get_intersection(&self, types: Vec<TypeId>) -> TypeId {
        let mut members = Vec::new();
        for ty in types {
            self.collect_intersection(ty, &mut members);
        }
        if members.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if members.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        if members.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        members.retain(|&m| m != TypeId::UNKNOWN);

        if let Some(position) = members
            .iter()
            .position(|&m| matches!(self.kind(m), TypeKind::Union(_)))
            && let TypeKind::Union(variants) = self.kind(members[position])
        {
            let distributed = variants
                .into_iter()
                .map(|variant| {
                    let mut parts = members.clone();
                    parts[position] = variant;
                    self.get_intersection(parts)
                })
                .collect();
            return self.get_union(distributed);
        }

        if self.is_empty_intersection(&members) {
            return TypeId::NEVER;
        }
        self.remove_subsumed(&mut members);

        match members.len() {
            0 => TypeId::UNKNOWN,
            1 => members[0],
            _ => self.intern(TypeKind::Intersection(members)),
        }
    }

    fn collect_intersection(&self, ty: TypeId, out: &mut Vec<TypeId>) {
        match self.kind(ty) {
            TypeKind::Intersection(members) => {
                for member in members {
                    self.collect_intersection(member, out);
                }
            }
            _ => {
                if !out.contains(&ty) {
                    out.push(ty);
                }
            }
        }
    }

    /// Members whose value sets cannot overlap.
    fn is_empty_intersection(&self, members: &[TypeId]) -> bool {
        let domains: Vec<Domain> = members.iter().filter_map(|&m| self.domain(m)).collect();
        if domains.windows(2).any(|w| w[0] != w[1]) {
            return true;
        }
        if let Some(domain) = domains.first() {
            if members.contains(&TypeId::NON_PRIMITIVE) {
                return true;
            }
            let nullish = matches!(domain, Domain::Null | Domain::Undefined | Domain::Void);
            if nullish && self.strict_null_checks && members.iter().any(|&m| self.is_object_like(m)) {
                return true;
            }
        }
        let literals: Vec<TypeId> = members.iter().copied().filter(|&m| self.is_unit(m)).collect();
        if literals.windows(2).any(|w| w[0] != w[1]) {
            return true;
        }
        if let Some(&literal) = literals.first()
            && let TypeKind::StringLiteral(text) = self.kind(literal)
        {
            let matches = members.iter().all(|&m| match self.kind(m) {
                TypeKind::TemplateLiteral { texts, types } => {
                    self.match_template_literal(&text, &texts, &types).is_some()
                }
                TypeKind::StringMapping { mapping, .. } => mapping.apply(&text) == text,
                _ => true,
            });
            return !matches;
        }
        false
    }

    /// Drops primitives implied by a literal and empty object literals next to object types.
    fn remove_subsumed(&self, members: &mut Vec<TypeId>) {
        let has_literal = members.iter().any(|&m| self.is_unit(m));
        let has_template = members.iter().any(|&m| {
            matches!(
                self.kind(m),
                TypeKind::TemplateLiteral { .. } | TypeKind::StringMapping { .. }
            )
        });
        if has_literal {
            members.retain(|&m| {
                !matches!(
                    self.kind(m),
                    TypeKind::String
                        | TypeKind::Number
                        | TypeKind::BigInt
                        | TypeKind::TemplateLiteral { .. }
                        | TypeKind::StringMapping { .. }
                )
            });
        } else if has_template {
            members.retain(|&m| m != TypeId::STRING);
        }
        let objects = members
            .iter()
            .filter(|&&m| self.is_object_like(m) || m == TypeId::NON_PRIMITIVE)
            .count();
        if objects > 1 {
            let empty: Vec<TypeId> = members
                .iter()
                .copied()
                .filter(|&m| self.is_empty_object_literal(m))
                .collect();
            if empty.len() < objects {
                members.retain(|m| !empty.contains(m));
            }
        }
    }

    fn domain(&self, ty: TypeId) -> Option<Domain> {
        Some(match self.kind(ty) {
            TypeKind::String
            | TypeKind::StringLiteral(_)
            | TypeKind::TemplateLiteral { .. }
            | TypeKind::StringMapping { .. } => Domain::String,
            TypeKind::Number | TypeKind::NumberLiteral(_) => Domain::Number,
            TypeKind::BigInt | TypeKind::BigIntLiteral(_) => Domain::BigInt,
            TypeKind::False | TypeKind::True => Domain::Boolean,
            TypeKind::Symbol => Domain::Symbol,
            TypeKind::Null => Domain::Null,
            TypeKind::Undefined => Domain::Undefined,
            TypeKind::Void => Domain::Void,
            _ => return None,
        })
    }

    /// Literal types with exactly one value.
    pub(crate) fn is_unit(&self, ty: TypeId) -> bool {
        matches!(
            self.kind(ty),
            TypeKind::StringLiteral(_)
                | TypeKind::NumberLiteral(_)
                | TypeKind::BigIntLiteral(_)
                | TypeKind::False
                | TypeKind::True
                | TypeKind::Null
                | TypeKind::Undefined
        )
    }

    pub(crate) fn is_object_like(&self, ty: TypeId) -> bool {
        matches!(
            self.kind(ty),
            TypeKind::Interface { .. }
                | TypeKind::Anonymous { .. }
                | TypeKind::Object(_)
                | TypeKind::Tuple { .. }
                | TypeKind::FunctionValue(_)
        )
    }

    pub(crate) fn is_empty_object_literal(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), TypeKind::Anonymous { .. } | TypeKind::Object(_))
            && self.resolve_shape(ty).is_some_and(|s| s.is_empty())
    }

    /// `keyof ty`.
    pub(crate) fn get_index_type(&self, ty: TypeId) -> TypeId {
        match self.kind(ty) {
            TypeKind::Any | TypeKind::Never => self.property_key_type(),
            TypeKind::Error => TypeId::ERROR,
            TypeKind::Unknown
            | TypeKind::Null
            | TypeKind::Undefined
            | TypeKind::Void
            | TypeKind::NonPrimitive => TypeId::NEVER,
            TypeKind::Union(members) => {
                let keys = members.iter().map(|&m| self.get_index_type(m)).collect();
                self.get_intersection(keys)
            }
            TypeKind::Intersection(members) => {
                let keys = members.iter().map(|&m| self.get_index_type(m)).collect();
                self.get_union(keys)
            }
            TypeKind::Mapped { decl, mapper } => self.mapped_keys(ty, decl, mapper),
            TypeKind::Param(_)
            | TypeKind::Index(_)
            | TypeKind::IndexedAccess { .. }
            | TypeKind::Conditional { .. } => self.intern(TypeKind::Index(ty)),
            TypeKind::Tuple { elements, readonly } => {
                let mut keys: Vec<TypeId> = elements
                    .iter()
                    .enumerate()
                    .take_while(|(_, e)| matches!(e.kind, ElementKind::Required | ElementKind::Optional))
                    .map(|(i, _)| self.string_literal(&i.to_string()))
                    .collect();
                let array = self.array_type(self.tuple_element_union(&elements), readonly);
                keys.push(self.get_index_type(array));
                self.get_union(keys)
            }
            _ => {
                let apparent = self.apparent_type(ty);
                match self.resolve_shape(apparent) {
                    Some(shape) => self.shape_keys(&shape),
                    None => TypeId::NEVER,
                }
            }
        }
    }

    /// `string | number | symbol`.
    pub(crate) fn property_key_type(&self) -> TypeId {
        self.get_union(vec![TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL])
    }

    fn shape_keys(&self, shape: &ObjectShape) -> TypeId {
        let mut keys = Vec::new();
        for info in &shape.index_infos {
            if info.key == TypeId::STRING {
                keys.extend([TypeId::STRING, TypeId::NUMBER]);
            } else {
                keys.push(info.key);
            }
        }
        for property in &shape.properties {
            keys.push(self.property_name_type(property));
        }
        self.get_union(keys)
    }

    fn property_name_type(&self, property: &Property) -> TypeId {
        match property.name.parse::<f64>() {
            Ok(value) if property.numeric => self.number_literal(value),
            _ => self.string_literal(&property.name),
        }
    }

    /// `object[index]`, or the error type when the access is invalid.
    pub(crate) fn get_indexed_access(&self, object: TypeId, index: TypeId) -> TypeId {
        self.indexed_access(object, index).unwrap_or(TypeId::ERROR)
    }

    pub(crate) fn indexed_access(&self, object: TypeId, index: TypeId) -> Result<TypeId, AccessError> {
        if matches!(object, TypeId::ANY | TypeId::ERROR) {
            return Ok(object);
        }
        if index == TypeId::ERROR {
            return Ok(TypeId::ERROR);
        }
        if let TypeKind::Union(keys) = self.kind(index)
            && !self.is_deferred_operand(index)
        {
            let parts: Result<Vec<TypeId>, AccessError> =
                keys.iter().map(|&k| self.indexed_access(object, k)).collect();
            return Ok(self.get_union(parts?));
        }
        if self.is_deferred_operand(index) || self.is_deferred_operand(object) {
            if let TypeKind::Mapped { decl, mapper } = self.kind(object)
                && let Some(substituted) = self.substitute_mapped_template(decl, mapper, index)
            {
                return Ok(substituted);
            }
            return Ok(self.intern(TypeKind::IndexedAccess { object, index }));
        }
        if let TypeKind::Union(members) = self.kind(object) {
            let parts: Result<Vec<TypeId>, AccessError> =
                members.iter().map(|&m| self.indexed_access(m, index)).collect();
            return Ok(self.get_union(parts?));
        }
        match self.kind(index) {
            TypeKind::StringLiteral(name) => self.access_by_name(object, &name),
            TypeKind::NumberLiteral(bits) => {
                self.access_by_name(object, &js_number_to_string(f64::from_bits(bits)))
            }
            TypeKind::Never => Ok(TypeId::NEVER),
            TypeKind::Any => Ok(self
                .index_info_of(object, TypeId::STRING)
                .map(|i| i.ty)
                .unwrap_or(TypeId::ANY)),
            TypeKind::String | TypeKind::Number | TypeKind::Symbol => self
                .index_info_of(object, index)
                .map(|i| i.ty)
                .ok_or(AccessError::NotIndexable),
            _ => Err(AccessError::NotIndexable),
        }
    }

    fn access_by_name(&self, object: TypeId, name: &str) -> Result<TypeId, AccessError> {
        if let Some(property) = self.property_of_type(object, name) {
            return Ok(property.ty);
        }
        let key = if is_numeric_literal_name(name) {
            TypeId::NUMBER
        } else {
            TypeId::STRING
        };
        self.index_info_of(object, key)
            .map(|i| i.ty)
            .ok_or_else(|| AccessError::MissingProperty(name.to_string()))
    }

    /// Whether an operand must wait for instantiation before an operator can apply.
    pub(crate) fn is_deferred_operand(&self, ty: TypeId) -> bool {
        match self.kind(ty) {
            TypeKind::Param(_)
            | TypeKind::Index(_)
            | TypeKind::IndexedAccess { .. }
            | TypeKind::Conditional { .. }
            | TypeKind::Mapped { .. }
            | TypeKind::This => true,
            TypeKind::Union(members) | TypeKind::Intersection(members) => {
                members.iter().any(|&m| self.is_deferred_operand(m))
            }
            TypeKind::TemplateLiteral { types, .. } => types.iter().any(|&t| self.is_deferred_operand(t)),
            TypeKind::StringMapping { ty, .. } => self.is_deferred_operand(ty),
            TypeKind::Tuple { elements, .. } => elements.iter().any(|e| e.kind == ElementKind::Variadic),
            _ => false,
        }
    }

    /// Whether a type mentions a type parameter anywhere.
    pub(crate) fn is_generic(&self, ty: TypeId) -> bool {
        if let Some(&cached) = self.generic.borrow().get(&ty) {
            return cached;
        }
        let generic = match self.kind(ty) {
            TypeKind::Param(_)
            | TypeKind::Index(_)
            | TypeKind::IndexedAccess { .. }
            | TypeKind::Conditional { .. }
            | TypeKind::Mapped { .. }
            | TypeKind::This => true,
            TypeKind::Union(members) | TypeKind::Intersection(members) => {
                members.iter().any(|&m| self.is_generic(m))
            }
            TypeKind::TemplateLiteral { types, .. } => types.iter().any(|&t| self.is_generic(t)),
            TypeKind::StringMapping { ty, .. } => self.is_generic(ty),
            TypeKind::Interface { args, .. } => args.iter().any(|&a| self.is_generic(a)),
            TypeKind::Tuple { elements, .. } => elements.iter().any(|e| self.is_generic(e.ty)),
            TypeKind::Anonymous { decl, mapper } => self
                .free_params_of(decl)
                .iter()
                .any(|&p| self.map_symbol(mapper, p).is_none_or(|t| self.is_generic(t))),
            TypeKind::Object(shape) => {
                let shape = self.shape(shape);
                shape.properties.iter().any(|p| self.is_generic(p.ty))
                    || shape.index_infos.iter().any(|i| self.is_generic(i.ty))
                    || shape
                        .call_signatures
                        .iter()
                        .chain(&shape.construct_signatures)
                        .any(|s| {
                            self.is_generic(s.return_type) || s.params.iter().any(|p| self.is_generic(p.ty))
                        })
            }
            _ => false,
        };
        self.generic.borrow_mut().insert(ty, generic);
        generic
    }

    /// Type parameters a declaration node refers to but does not declare.
    pub(crate) fn free_params_of(&self, decl: NodeKey) -> Rc<[SymbolId]> {
        if let Some(params) = self.free_params.borrow().get(&decl) {
            return Rc::clone(params);
        }
        let mut params = Vec::new();
        if let Some(node) = self.program.node(decl) {
            let range = node.text_range();
            for reference in node.descendants().filter_map(TypeRef::cast) {
                let Some(name) = reference.name() else {
                    continue;
                };
                let segments = name.segments();
                let [segment] = segments.as_slice() else {
                    continue;
                };
                let Resolution::Found(symbol) =
                    self.resolve_name(decl.file, reference.as_cst(), segment.text(), Meaning::Type)
                else {
                    continue;
                };
                let data = self.symbols().get(symbol);
                let declared_inside = data
                    .declarations
                    .first()
                    .is_some_and(|d| d.file == decl.file && range.contains_range(d.node.text_range()));
                if data.flags.intersects(SymbolFlags::TYPE_PARAMETER)
                    && !declared_inside
                    && !params.contains(&symbol)
                {
                    params.push(symbol);
                }
            }
            // `infer` declarations bound by a conditional outside `decl` are free in it.
            for infer in node.descendants().filter_map(InferType::cast) {
                let bound_outside = owning_conditional(infer.as_cst())
                    .is_some_and(|owner| !range.contains_range(owner.text_range()));
                if !bound_outside {
                    continue;
                }
                let symbol = infer
                    .type_param()
                    .and_then(|p| self.symbols().node_symbol(NodeKey::of(decl.file, p.as_cst())));
                if let Some(symbol) = symbol
                    && !params.contains(&symbol)
                {
                    params.push(symbol);
                }
            }
        }
        let params: Rc<[SymbolId]> = params.into();
        self.free_params.borrow_mut().insert(decl, Rc::clone(&params));
        params
    }

    /// `mapper` limited to the parameters `decl` actually uses.
    pub(crate) fn restrict_mapper(&self, decl: NodeKey, mapper: Option<MapperId>) -> Option<MapperId> {
        let mapper = mapper?;
        let free = self.free_params_of(decl);
        let pairs = self
            .mapper_entries(mapper)
            .into_iter()
            .filter(|(symbol, _)| free.contains(symbol))
            .collect();
        self.make_mapper(pairs)
    }

    pub(crate) fn get_template_literal(&self, texts: Vec<String>, types: Vec<TypeId>) -> TypeId {
        if types.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        if types.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        if let Some(position) = types
            .iter()
            .position(|&t| matches!(self.kind(t), TypeKind::Union(_)))
            && let TypeKind::Union(variants) = self.kind(types[position])
        {
            let expanded = variants
                .into_iter()
                .map(|variant| {
                    let mut spans = types.clone();
                    spans[position] = variant;
                    self.get_template_literal(texts.clone(), spans)
                })
                .collect();
            return self.get_union(expanded);
        }

        let mut out_texts = vec![texts.first().cloned().unwrap_or_default()];
        let mut out_types = Vec::new();
        for (i, &ty) in types.iter().enumerate() {
            let tail = texts.get(i + 1).map(String::as_str).unwrap_or_default();
            if let Some(constant) = self.template_constant(ty) {
                push_last(&mut out_texts, &constant);
                push_last(&mut out_texts, tail);
            } else if let TypeKind::TemplateLiteral {
                texts: inner_texts,
                types: inner_types,
            } = self.kind(ty)
            {
                push_last(&mut out_texts, &inner_texts[0]);
                for (j, &inner) in inner_types.iter().enumerate() {
                    out_types.push(inner);
                    out_texts.push(inner_texts[j + 1].clone());
                }
                push_last(&mut out_texts, tail);
            } else {
                out_types.push(ty);
                out_texts.push(tail.to_string());
            }
        }

        if out_types.is_empty() {
            return self.string_literal(&out_texts[0]);
        }
        if out_types == [TypeId::STRING] && out_texts.iter().all(String::is_empty) {
            return TypeId::STRING;
        }
        self.intern(TypeKind::TemplateLiteral {
            texts: out_texts,
            types: out_types,
        })
    }

    /// Text a literal contributes when substituted into a template.
    fn template_constant(&self, ty: TypeId) -> Option<String> {
        Some(match self.kind(ty) {
            TypeKind::StringLiteral(text) => text,
            TypeKind::NumberLiteral(bits) => js_number_to_string(f64::from_bits(bits)),
            TypeKind::BigIntLiteral(digits) => digits,
            TypeKind::True => "true".to_string(),
            TypeKind::False => "false".to_string(),
            TypeKind::Null => "null".to_string(),
            TypeKind::Undefined => "undefined".to_string(),
            _ => return None,
        })
    }

    pub(crate) fn get_string_mapping(&self, mapping: StringMapping, ty: TypeId) -> TypeId {
        match self.kind(ty) {
            TypeKind::Union(members) => {
                let mapped = members
                    .iter()
                    .map(|&m| self.get_string_mapping(mapping, m))
                    .collect();
                self.get_union(mapped)
            }
            TypeKind::StringLiteral(text) => self.string_literal(&mapping.apply(&text)),
            TypeKind::Any | TypeKind::Error | TypeKind::Never => ty,
            TypeKind::StringMapping { mapping: inner, .. } if inner == mapping => ty,
            _ => self.intern(TypeKind::StringMapping { mapping, ty }),
        }
    }

    /// A conditional type node under `mapper`, evaluated or deferred.
    pub(crate) fn resolve_conditional(&self, decl: NodeKey, mapper: Option<MapperId>) -> TypeId {
        let mapper = self.restrict_mapper(decl, mapper);
        if let Some(&ty) = self.evaluations.borrow().get(&(decl, mapper)) {
            return ty;
        }
        let ty = self.nested(TypeId::ERROR, || self.compute_conditional(decl, mapper));
        self.evaluations.borrow_mut().insert((decl, mapper), ty);
        ty
    }

    fn compute_conditional(&self, decl: NodeKey, mapper: Option<MapperId>) -> TypeId {
        let Some(node) = self.program.node(decl).and_then(ConditionalType::cast) else {
            return TypeId::ERROR;
        };
        let file = decl.file;
        let check_node = node.check_type();

        if let Some(param) = check_node.as_ref().and_then(|n| self.naked_type_param(file, n))
            && let Some(actual) = self.map_symbol(mapper, param)
        {
            match self.kind(actual) {
                TypeKind::Union(members) => {
                    let results = members
                        .into_iter()
                        .map(|m| self.resolve_conditional(decl, self.extend_mapper(mapper, param, m)))
                        .collect();
                    return self.get_union(results);
                }
                TypeKind::Never => return TypeId::NEVER,
                _ => {}
            }
        }

        let defer = || self.intern(TypeKind::Conditional { decl, mapper });
        let check = self.instantiate(self.type_from_optional(file, check_node), mapper);
        if self.is_generic(check) {
            return defer();
        }
        let extends_node = self.type_from_optional(file, node.extends_type());

        let mut combined = mapper;
        let infer = self.infer_params(file, &node);
        if !infer.is_empty() {
            let target = self.instantiate(extends_node, mapper);
            let inferred = self.infer_types(&infer, check, target);
            for (&param, ty) in infer.iter().zip(inferred) {
                let ty = ty
                    .or_else(|| self.param_constraint(param))
                    .unwrap_or(TypeId::UNKNOWN);
                combined = self.extend_mapper(combined, param, ty);
            }
        }
        let extends = self.instantiate(extends_node, combined);
        if self.is_generic(extends) {
            return defer();
        }

        let true_branch = || self.instantiate(self.type_from_optional(file, node.true_type()), combined);
        let false_branch = || self.instantiate(self.type_from_optional(file, node.false_type()), mapper);
        if matches!(check, TypeId::ANY | TypeId::ERROR) {
            if matches!(extends, TypeId::ANY | TypeId::UNKNOWN) {
                return true_branch();
            }
            return self.get_union(vec![true_branch(), false_branch()]);
        }
        if self.is_assignable(check, extends) == Some(true) {
            true_branch()
        } else {
            false_branch()
        }
    }

    /// The type parameter `node` names, when it is a bare reference to one.
    pub(crate) fn naked_type_param(&self, file: SourceId, node: &ast::Type) -> Option<SymbolId> {
        let ast::Type::Reference(reference) = node else {
            return None;
        };
        if reference.type_args().is_some() {
            return None;
        }
        let name = reference.name()?;
        let segments = name.segments();
        let [segment] = segments.as_slice() else {
            return None;
        };
        match self.resolve_name(file, reference.as_cst(), segment.text(), Meaning::Type) {
            Resolution::Found(symbol)
                if self.symbols().get(symbol).flags.intersects(SymbolFlags::TYPE_PARAMETER) =>
            {
                Some(symbol)
            }
            _ => None,
        }
    }

    /// A mapped type node under `mapper`, evaluated or deferred.
    pub(crate) fn resolve_mapped(&self, decl: NodeKey, mapper: Option<MapperId>) -> TypeId {
        let mapper = self.restrict_mapper(decl, mapper);
        if let Some(&ty) = self.evaluations.borrow().get(&(decl, mapper)) {
            return ty;
        }
        let ty = self.nested(TypeId::ERROR, || self.compute_mapped(decl, mapper));
        self.evaluations.borrow_mut().insert((decl, mapper), ty);
        ty
    }

    fn mapped_parts(&self, decl: NodeKey) -> Option<MappedParts> {
        let node = MappedType::cast(self.program.node(decl)?)?;
        let param = node.type_param()?;
        let key = self.symbols().node_symbol(NodeKey::of(decl.file, param.as_cst()))?;
        Some(MappedParts {
            file: decl.file,
            key,
            constraint: param.constraint(),
            name_type: param.name_type(),
            template: node.type_annotation().and_then(|a| a.ty()),
            readonly: node.readonly_modifier(),
            optional: node.optional_modifier(),
        })
    }

    fn compute_mapped(&self, decl: NodeKey, mapper: Option<MapperId>) -> TypeId {
        let Some(parts) = self.mapped_parts(decl) else {
            return TypeId::ERROR;
        };
        let defer = || self.intern(TypeKind::Mapped { decl, mapper });

        if let Some(operand) = parts.homomorphic_operand() {
            let source = self.instantiate(self.type_from_type_node(parts.file, &operand), mapper);
            if let Some(param) = self.naked_type_param(parts.file, &operand) {
                if let TypeKind::Union(members) = self.kind(source) {
                    let results = members
                        .into_iter()
                        .map(|m| self.resolve_mapped(decl, self.extend_mapper(mapper, param, m)))
                        .collect();
                    return self.get_union(results);
                }
                if self.is_primitive(source) {
                    return source;
                }
                if self.is_deferred_operand(source) {
                    return defer();
                }
                if self.array_element_type(source).is_some() {
                    let readonly = self.modified(parts.readonly, self.is_readonly_array(source));
                    let ty = self.mapped_template(&parts, mapper, TypeId::NUMBER);
                    return self.array_type(self.adjust_optionality(&parts, ty), readonly);
                }
                if let TypeKind::Tuple { elements, readonly } = self.kind(source) {
                    return self.map_tuple(&parts, mapper, &elements, readonly);
                }
            }
            if self.is_deferred_operand(source) {
                return defer();
            }
            return self.map_homomorphic(&parts, mapper, source);
        }

        let constraint = self.instantiate(self.type_from_optional(parts.file, parts.constraint.clone()), mapper);
        if self.is_deferred_operand(constraint) {
            return defer();
        }
        let keys = match self.kind(constraint) {
            TypeKind::Union(members) => members,
            TypeKind::Never => Vec::new(),
            _ => vec![constraint],
        };
        let mut shape = ObjectShape::default();
        for key in keys {
            self.add_mapped_member(&parts, mapper, &mut shape, key, None);
        }
        self.object_type(shape)
    }

    fn map_homomorphic(&self, parts: &MappedParts, mapper: Option<MapperId>, source: TypeId) -> TypeId {
        let mut shape = ObjectShape::default();
        if source == TypeId::ANY {
            for key in [TypeId::STRING, TypeId::NUMBER, TypeId::SYMBOL] {
                self.add_mapped_member(parts, mapper, &mut shape, key, None);
            }
            return self.object_type(shape);
        }
        let keys = match self.kind(self.get_index_type(source)) {
            TypeKind::Union(members) => members,
            TypeKind::Never => Vec::new(),
            _ => vec![self.get_index_type(source)],
        };
        for key in keys {
            let modifiers = match self.kind(key) {
                TypeKind::StringLiteral(name) => self
                    .property_of_type(source, &name)
                    .map(|p| (p.optional, p.readonly)),
                TypeKind::NumberLiteral(bits) => self
                    .property_of_type(source, &js_number_to_string(f64::from_bits(bits)))
                    .map(|p| (p.optional, p.readonly)),
                _ => self
                    .index_info_of(source, key)
                    .map(|info| (false, info.readonly)),
            };
            self.add_mapped_member(parts, mapper, &mut shape, key, modifiers);
        }
        self.object_type(shape)
    }

    /// Adds the member produced by one key; `inherited` holds the source
    /// property's `(optional, readonly)` for homomorphic mappings.
    fn add_mapped_member(
        &self,
        parts: &MappedParts,
        mapper: Option<MapperId>,
        shape: &mut ObjectShape,
        key: TypeId,
        inherited: Option<(bool, bool)>,
    ) {
        let key_mapper = self.extend_mapper(mapper, parts.key, key);
        let name = match &parts.name_type {
            Some(node) => self.instantiate(self.type_from_type_node(parts.file, node), key_mapper),
            None => key,
        };
        let (inherited_optional, inherited_readonly) = inherited.unwrap_or_default();
        let optional = self.modified(parts.optional, inherited_optional);
        let readonly = self.modified(parts.readonly, inherited_readonly);
        let template = self.mapped_template(parts, mapper, key);
        let names = match self.kind(name) {
            TypeKind::Union(members) => members,
            _ => vec![name],
        };
        for name in names {
            match self.kind(name) {
                TypeKind::StringLiteral(_) | TypeKind::NumberLiteral(_) => {
                    let (text, numeric) = match self.kind(name) {
                        TypeKind::NumberLiteral(bits) => (js_number_to_string(f64::from_bits(bits)), true),
                        TypeKind::StringLiteral(text) => (text, false),
                        _ => continue,
                    };
                    if shape.property(&text).is_some() {
                        continue;
                    }
                    let ty = self.adjust_optionality(parts, template);
                    let ty = if optional { self.add_optionality(ty) } else { ty };
                    shape.properties.push(Property {
                        name: text,
                        ty,
                        optional,
                        readonly,
                        method: false,
                        numeric,
                    });
                }
                TypeKind::String
                | TypeKind::Number
                | TypeKind::Symbol
                | TypeKind::TemplateLiteral { .. } => {
                    if shape.index_info(name).is_none() {
                        shape.index_infos.push(IndexInfo {
                            key: name,
                            ty: template,
                            readonly,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn mapped_template(&self, parts: &MappedParts, mapper: Option<MapperId>, key: TypeId) -> TypeId {
        let key_mapper = self.extend_mapper(mapper, parts.key, key);
        match &parts.template {
            Some(node) => self.instantiate(self.type_from_type_node(parts.file, node), key_mapper),
            None => TypeId::ANY,
        }
    }

    /// Strips `undefined` from a template when `-?` removes optionality.
    fn adjust_optionality(&self, parts: &MappedParts, ty: TypeId) -> TypeId {
        if parts.optional != Some(MappedModifier::Remove) || !self.strict_null_checks {
            return ty;
        }
        match self.kind(ty) {
            TypeKind::Union(members) => {
                self.get_union(members.into_iter().filter(|&m| m != TypeId::UNDEFINED).collect())
            }
            TypeKind::Undefined => TypeId::NEVER,
            _ => ty,
        }
    }

    fn modified(&self, modifier: Option<MappedModifier>, inherited: bool) -> bool {
        match modifier {
            Some(MappedModifier::Add) => true,
            Some(MappedModifier::Remove) => false,
            None => inherited,
        }
    }

    fn map_tuple(
        &self,
        parts: &MappedParts,
        mapper: Option<MapperId>,
        elements: &[TupleElement],
        readonly: bool,
    ) -> TypeId {
        let mapped = elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let key = match element.kind {
                    ElementKind::Required | ElementKind::Optional => self.string_literal(&i.to_string()),
                    ElementKind::Rest | ElementKind::Variadic => TypeId::NUMBER,
                };
                let ty = self.mapped_template(parts, mapper, key);
                let kind = match (element.kind, parts.optional) {
                    (ElementKind::Required, Some(MappedModifier::Add)) => ElementKind::Optional,
                    (ElementKind::Optional, Some(MappedModifier::Remove)) => ElementKind::Required,
                    (kind, _) => kind,
                };
                let ty = self.adjust_optionality(parts, ty);
                TupleElement {
                    ty,
                    kind,
                    name: element.name.clone(),
                }
            })
            .collect();
        self.intern(TypeKind::Tuple {
            elements: mapped,
            readonly: self.modified(parts.readonly, readonly),
        })
    }

    /// `keyof` of a deferred mapped type: its constraint when keys are not renamed.
    fn mapped_keys(&self, ty: TypeId, decl: NodeKey, mapper: Option<MapperId>) -> TypeId {
        match self.mapped_parts(decl) {
            Some(parts) if parts.name_type.is_none() => {
                self.instantiate(self.type_from_optional(parts.file, parts.constraint), mapper)
            }
            _ => self.intern(TypeKind::Index(ty)),
        }
    }

    /// `{ [K in C]: X }[I]` as `X` with `K := I`, when no key renaming or
    /// added optionality stands in the way.
    fn substitute_mapped_template(&self, decl: NodeKey, mapper: Option<MapperId>, index: TypeId) -> Option<TypeId> {
        let parts = self.mapped_parts(decl)?;
        if parts.name_type.is_some() || parts.optional == Some(MappedModifier::Add) {
            return None;
        }
        Some(self.mapped_template(&parts, mapper, index))
    }

    pub(crate) fn is_primitive(&self, ty: TypeId) -> bool {
        self.domain(ty).is_some() || ty == TypeId::NEVER
    }

    /// Parts of a deferred mapped type for printing: key parameter, constraint,
    /// renaming, template and modifiers, all under `mapper`.
    pub(crate) fn mapped_view(&self, decl: NodeKey, mapper: Option<MapperId>) -> Option<MappedView> {
        let parts = self.mapped_parts(decl)?;
        let constraint = self.instantiate(self.type_from_optional(parts.file, parts.constraint.clone()), mapper);
        let name_type = parts
            .name_type
            .as_ref()
            .map(|n| self.instantiate(self.type_from_type_node(parts.file, n), mapper));
        let template = parts
            .template
            .as_ref()
            .map(|n| self.instantiate(self.type_from_type_node(parts.file, n), mapper));
        Some(MappedView {
            key: parts.key,
            constraint,
            name_type,
            template,
            readonly: parts.readonly,
            optional: parts.optional,
        })
    }

    /// Parts of a deferred conditional type for printing.
    pub(crate) fn conditional_view(&self, decl: NodeKey, mapper: Option<MapperId>) -> Option<ConditionalView> {
        let node = self.program.node(decl).and_then(ConditionalType::cast)?;
        let file = decl.file;
        let branch = |t: Option<ast::Type>| self.instantiate(self.type_from_optional(file, t), mapper);
        Some(ConditionalView {
            check: branch(node.check_type()),
            extends: branch(node.extends_type()),
            true_type: branch(node.true_type()),
            false_type: branch(node.false_type()),
            infer: self.infer_params(file, &node),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    String,
    Number,
    BigInt,
    Boolean,
    Symbol,
    Null,
    Undefined,
    Void,
}

#[derive(Debug, Clone)]
pub(crate) struct MappedView {
    pub key: SymbolId,
    pub constraint: TypeId,
    pub name_type: Option<TypeId>,
    pub template: Option<TypeId>,
    pub readonly: Option<MappedModifier>,
    pub optional: Option<MappedModifier>,
}

#[derive(Debug, Clone)]
pub(crate) struct ConditionalView {
    pub check: TypeId,
    pub extends: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
    pub infer: Vec<SymbolId>,
}

fn push_last(texts: &mut [String], text: &str) {
    if let Some(last) = texts.last_mut() {
        last.push_str(text);
    }
}
