//! Inference of `infer` declarations from a conditional's check type.

use super::Checker;
use super::types::{ElementKind, Signature, TupleElement, TypeId, TypeKind};
use crate::program::SymbolId;

#[derive(Default, Clone)]
struct Candidates {
    covariant: Vec<TypeId>,
    contravariant: Vec<TypeId>,
}

struct Inference<'a> {
    params: &'a [SymbolId],
    candidates: Vec<Candidates>,
}

impl<'p> Checker<'p> {
    /// Types for `params` that make `source` match `target`; `None` where
    /// nothing was inferred.
    pub(crate) fn infer_types(&self, params: &[SymbolId], source: TypeId, target: TypeId) -> Vec<Option<TypeId>> {
        let mut inference = Inference {
            params,
            candidates: vec![Candidates::default(); params.len()],
        };
        self.infer_from(&mut inference, source, target, false);
        inference
            .candidates
            .into_iter()
            .map(|c| {
                if !c.covariant.is_empty() {
                    Some(self.get_union(c.covariant))
                } else if !c.contravariant.is_empty() {
                    Some(self.get_intersection(c.contravariant))
                } else {
                    None
                }
            })
            .collect()
    }

    fn infer_from(&self, inference: &mut Inference<'_>, source: TypeId, target: TypeId, contra: bool) {
        self.nested((), || self.infer_from_inner(inference, source, target, contra));
    }

    fn infer_from_inner(&self, inference: &mut Inference<'_>, source: TypeId, target: TypeId, contra: bool) {
        let target_kind = self.kind(target);
        if let TypeKind::Param(symbol) = target_kind {
            if let Some(index) = inference.params.iter().position(|&p| p == symbol) {
                let slot = &mut inference.candidates[index];
                let list = if contra { &mut slot.contravariant } else { &mut slot.covariant };
                if !list.contains(&source) {
                    list.push(source);
                }
            }
            return;
        }

        match target_kind {
            TypeKind::Union(targets) => self.infer_to_union(inference, source, &targets, contra),
            TypeKind::Intersection(targets) => {
                for t in targets {
                    self.infer_from(inference, source, t, contra);
                }
            }
            TypeKind::TemplateLiteral { texts, types } => {
                let TypeKind::StringLiteral(text) = self.kind(source) else {
                    return;
                };
                let Some(pieces) = self.match_template_literal(&text, &texts, &types) else {
                    return;
                };
                for (piece, placeholder) in pieces.iter().zip(types) {
                    let inferred = self.template_piece_type(piece, placeholder);
                    self.infer_from(inference, inferred, placeholder, contra);
                }
            }
            TypeKind::Tuple { elements, .. } => match self.kind(source) {
                TypeKind::Tuple { elements: sources, .. } => {
                    self.infer_tuple(inference, &sources, &elements, contra)
                }
                _ => {
                    if let Some(element) = self.array_element_type(source) {
                        for e in elements {
                            self.infer_from(inference, element, e.ty, contra);
                        }
                    }
                }
            },
            TypeKind::Interface { symbol, args } => match self.kind(source) {
                TypeKind::Interface {
                    symbol: source_symbol,
                    args: source_args,
                } if source_symbol == symbol && source_args.len() == args.len() => {
                    for (s, t) in source_args.into_iter().zip(args) {
                        self.infer_from(inference, s, t, contra);
                    }
                }
                TypeKind::Tuple { elements, .. } if self.array_element_type(target).is_some() => {
                    if let Some(&arg) = args.first() {
                        self.infer_from(inference, self.tuple_element_union(&elements), arg, contra);
                    }
                }
                _ => self.infer_from_members(inference, source, target, contra),
            },
            TypeKind::Anonymous { .. } | TypeKind::Object(_) => {
                self.infer_from_members(inference, source, target, contra)
            }
            _ => {}
        }
    }

    fn infer_to_union(&self, inference: &mut Inference<'_>, source: TypeId, targets: &[TypeId], contra: bool) {
        let is_param = |t: TypeId| {
            matches!(self.kind(t), TypeKind::Param(p) if inference.params.contains(&p))
        };
        let naked: Vec<TypeId> = targets.iter().copied().filter(|&t| is_param(t)).collect();
        let others: Vec<TypeId> = targets.iter().copied().filter(|&t| !is_param(t)).collect();
        let sources = match self.kind(source) {
            TypeKind::Union(members) => members,
            _ => vec![source],
        };
        let mut unmatched = Vec::new();
        for s in sources {
            let matched = others
                .iter()
                .copied()
                .find(|&t| self.is_assignable(s, t) == Some(true) || self.same_structure(s, t));
            match matched {
                Some(t) => self.infer_from(inference, s, t, contra),
                None => unmatched.push(s),
            }
        }
        if let [param] = naked.as_slice() {
            if !unmatched.is_empty() {
                let rest = self.get_union(unmatched);
                self.infer_from(inference, rest, *param, contra);
            }
        } else {
            for t in others {
                self.infer_from(inference, source, t, contra);
            }
        }
    }

    /// Both are instances of the same generic interface or both are tuples.
    fn same_structure(&self, source: TypeId, target: TypeId) -> bool {
        match (self.kind(source), self.kind(target)) {
            (TypeKind::Interface { symbol: a, .. }, TypeKind::Interface { symbol: b, .. }) => a == b,
            (TypeKind::Tuple { .. }, TypeKind::Tuple { .. }) => true,
            _ => false,
        }
    }

    fn infer_tuple(
        &self,
        inference: &mut Inference<'_>,
        sources: &[TupleElement],
        targets: &[TupleElement],
        contra: bool,
    ) {
        let spread = targets
            .iter()
            .position(|e| matches!(e.kind, ElementKind::Rest | ElementKind::Variadic));
        let Some(spread) = spread else {
            for (s, t) in sources.iter().zip(targets) {
                self.infer_from(inference, s.ty, t.ty, contra);
            }
            return;
        };
        let after = targets.len() - spread - 1;
        if sources.len() < spread + after {
            return;
        }
        for (s, t) in sources[..spread].iter().zip(&targets[..spread]) {
            self.infer_from(inference, s.ty, t.ty, contra);
        }
        let tail_start = sources.len() - after;
        for (s, t) in sources[tail_start..].iter().zip(&targets[spread + 1..]) {
            self.infer_from(inference, s.ty, t.ty, contra);
        }
        let middle = &sources[spread..tail_start];
        let target = &targets[spread];
        match target.kind {
            ElementKind::Variadic => {
                let tuple = self.intern(TypeKind::Tuple {
                    elements: middle.to_vec(),
                    readonly: false,
                });
                self.infer_from(inference, tuple, target.ty, contra);
            }
            _ => {
                for s in middle {
                    self.infer_from(inference, s.ty, target.ty, contra);
                }
            }
        }
    }

    fn infer_from_members(&self, inference: &mut Inference<'_>, source: TypeId, target: TypeId, contra: bool) {
        let Some(target_shape) = self.resolve_shape(target) else {
            return;
        };
        let apparent = self.apparent_type(source);
        for property in &target_shape.properties {
            if let Some(found) = self.property_of_type(apparent, &property.name) {
                self.infer_from(inference, found.ty, property.ty, contra);
            }
        }
        let Some(source_shape) = self.resolve_shape(apparent) else {
            return;
        };
        if let (Some(s), Some(t)) = (
            source_shape.call_signatures.last(),
            target_shape.call_signatures.first(),
        ) {
            self.infer_from_signatures(inference, &self.base_signature(s), t, contra);
        }
        if let (Some(s), Some(t)) = (
            source_shape.construct_signatures.last(),
            target_shape.construct_signatures.first(),
        ) {
            self.infer_from_signatures(inference, &self.base_signature(s), t, contra);
        }
        for info in &target_shape.index_infos {
            if let Some(found) = self.index_info_of(apparent, info.key) {
                self.infer_from(inference, found.ty, info.ty, contra);
            }
        }
    }

    /// `signature` with its own type parameters replaced by their constraints.
    fn base_signature(&self, signature: &Signature) -> Signature {
        if signature.type_params.is_empty() {
            return signature.clone();
        }
        let pairs = signature
            .type_params
            .iter()
            .map(|&p| (p, self.param_constraint(p).unwrap_or(TypeId::UNKNOWN)))
            .collect();
        let mut base = self.instantiate_signature(signature, self.make_mapper(pairs));
        base.type_params.clear();
        base
    }

    fn infer_from_signatures(
        &self,
        inference: &mut Inference<'_>,
        source: &Signature,
        target: &Signature,
        contra: bool,
    ) {
        for (i, param) in target.params.iter().enumerate() {
            if param.rest {
                let elements = source.params[i.min(source.params.len())..]
                    .iter()
                    .map(|p| TupleElement {
                        ty: if p.rest {
                            self.array_element_type(p.ty).unwrap_or(p.ty)
                        } else {
                            p.ty
                        },
                        kind: if p.rest {
                            ElementKind::Rest
                        } else if p.optional {
                            ElementKind::Optional
                        } else {
                            ElementKind::Required
                        },
                        name: Some(p.name.clone()).filter(|n| !n.is_empty()),
                    })
                    .collect();
                let tuple = self.intern(TypeKind::Tuple {
                    elements,
                    readonly: false,
                });
                self.infer_from(inference, tuple, param.ty, !contra);
                break;
            }
            if let Some(s) = source.params.get(i) {
                self.infer_from(inference, s.ty, param.ty, !contra);
            }
        }
        self.infer_from(inference, source.return_type, target.return_type, contra);
    }

    /// Type inferred for a template placeholder from the text it matched.
    fn template_piece_type(&self, piece: &str, placeholder: TypeId) -> TypeId {
        let constraint = match self.kind(placeholder) {
            TypeKind::Param(symbol) => self.param_constraint(symbol),
            _ => None,
        };
        match constraint.map(|c| self.kind(c)) {
            Some(TypeKind::Number) if super::relate::is_valid_number_string(piece) => {
                match piece.trim().parse::<f64>() {
                    Ok(value) => self.number_literal(value),
                    Err(_) => self.string_literal(piece),
                }
            }
            _ => self.string_literal(piece),
        }
    }
}
