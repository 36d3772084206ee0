//! Substituting type arguments for type parameters.

use super::Checker;
use super::types::{AliasRef, ElementKind, MapperId, TupleElement, TypeId, TypeKind};

impl<'p> Checker<'p> {
    /// `ty` with every parameter in `mapper` replaced. Operators whose operands
    /// become concrete are evaluated on the way out.
    pub(crate) fn instantiate(&self, ty: TypeId, mapper: Option<MapperId>) -> TypeId {
        let Some(mapper) = mapper else {
            return ty;
        };
        if let Some(&cached) = self.instantiations.borrow().get(&(ty, mapper)) {
            return cached;
        }
        let result = self.nested(TypeId::ERROR, || self.instantiate_uncached(ty, mapper));
        self.instantiations.borrow_mut().insert((ty, mapper), result);
        result
    }

    fn instantiate_uncached(&self, ty: TypeId, mapper: MapperId) -> TypeId {
        let data = self.type_data(ty);
        let some = Some(mapper);
        let map = |t: TypeId| self.instantiate(t, some);
        let result = match data.kind {
            TypeKind::Param(symbol) => return self.map_symbol(some, symbol).unwrap_or(ty),
            TypeKind::Union(members) => self.get_union(members.into_iter().map(map).collect()),
            TypeKind::Intersection(members) => {
                self.get_intersection(members.into_iter().map(map).collect())
            }
            TypeKind::TemplateLiteral { texts, types } => {
                self.get_template_literal(texts, types.into_iter().map(map).collect())
            }
            TypeKind::StringMapping { mapping, ty: inner } => self.get_string_mapping(mapping, map(inner)),
            TypeKind::Interface { symbol, args } if !args.is_empty() => self.intern(TypeKind::Interface {
                symbol,
                args: args.into_iter().map(map).collect(),
            }),
            TypeKind::Tuple { elements, readonly } => {
                let mut out: Vec<TupleElement> = Vec::new();
                for element in elements {
                    let ty = map(element.ty);
                    if element.kind == ElementKind::Variadic {
                        self.push_spread(&mut out, ty, element.name);
                    } else {
                        out.push(TupleElement { ty, ..element });
                    }
                }
                self.intern(TypeKind::Tuple { elements: out, readonly })
            }
            TypeKind::Anonymous { decl, mapper: inner } => {
                let composed = self.compose(inner, mapper);
                self.intern(TypeKind::Anonymous {
                    decl,
                    mapper: self.restrict_mapper(decl, composed),
                })
            }
            TypeKind::Object(shape) => {
                let shape = self.shape(shape);
                let instantiated = self.instantiate_shape(&shape, some);
                self.object_type((*instantiated).clone())
            }
            TypeKind::Index(operand) => self.get_index_type(map(operand)),
            TypeKind::IndexedAccess { object, index } => self.get_indexed_access(map(object), map(index)),
            TypeKind::Conditional { decl, mapper: inner } => {
                self.resolve_conditional(decl, self.compose(inner, mapper))
            }
            TypeKind::Mapped { decl, mapper: inner } => self.resolve_mapped(decl, self.compose(inner, mapper)),
            _ => return ty,
        };
        match data.alias {
            Some(alias) => self.attach_alias(
                result,
                AliasRef {
                    symbol: alias.symbol,
                    args: alias.args.into_iter().map(map).collect(),
                },
            ),
            None => result,
        }
    }

    /// `inner` followed by `outer`: inner's targets instantiated by `outer`,
    /// plus `outer`'s own entries for parameters `inner` leaves alone.
    fn compose(&self, inner: Option<MapperId>, outer: MapperId) -> Option<MapperId> {
        let mut pairs: Vec<_> = inner
            .map(|m| self.mapper_entries(m))
            .unwrap_or_default()
            .into_iter()
            .map(|(symbol, ty)| (symbol, self.instantiate(ty, Some(outer))))
            .collect();
        for (symbol, ty) in self.mapper_entries(outer) {
            if !pairs.iter().any(|(s, _)| *s == symbol) {
                pairs.push((symbol, ty));
            }
        }
        self.make_mapper(pairs)
    }
}
