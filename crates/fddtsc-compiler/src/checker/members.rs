//! Members of object-like types: literals, interfaces, tuples and apparent types.

use std::rc::Rc;

use super::Checker;
use super::types::{
    ElementKind, IndexInfo, MapperId, ObjectShape, Property, Signature, SignatureParam,
    TupleElement, TypeId, TypeKind,
};
use crate::parser::SyntaxKind;
use crate::parser::ast::{self, InterfaceDecl, ParamList, ReturnType, TypeMember, TypeParamList};
use crate::program::{NodeKey, SymbolId};
use crate::source_map::SourceId;

impl<'p> Checker<'p> {
    /// Members of an object-like type. Primitives and type parameters have none
    /// of their own; see [`Checker::apparent_type`].
    pub(crate) fn resolve_shape(&self, ty: TypeId) -> Option<Rc<ObjectShape>> {
        if let Some(shape) = self.resolved_shapes.borrow().get(&ty) {
            return Some(Rc::clone(shape));
        }
        let shape = match self.kind(ty) {
            TypeKind::Object(id) => return Some(self.shape(id)),
            TypeKind::Anonymous { decl, mapper } => {
                let base = self.decl_shape(decl)?;
                self.instantiate_shape(&base, mapper)
            }
            TypeKind::Interface { symbol, args } => {
                let base = self.interface_shape(symbol);
                let params = self.declared_type_params(symbol);
                let mapper = self.make_mapper(params.into_iter().zip(args).collect());
                self.instantiate_shape(&base, mapper)
            }
            TypeKind::FunctionValue(symbol) => Rc::new(ObjectShape {
                call_signatures: self.function_signatures(symbol),
                ..ObjectShape::default()
            }),
            _ => return None,
        };
        self.resolved_shapes.borrow_mut().insert(ty, Rc::clone(&shape));
        Some(shape)
    }

    pub(crate) fn instantiate_shape(&self, shape: &Rc<ObjectShape>, mapper: Option<MapperId>) -> Rc<ObjectShape> {
        if mapper.is_none() {
            return Rc::clone(shape);
        }
        Rc::new(ObjectShape {
            properties: shape
                .properties
                .iter()
                .map(|p| Property {
                    ty: self.instantiate(p.ty, mapper),
                    ..p.clone()
                })
                .collect(),
            call_signatures: shape
                .call_signatures
                .iter()
                .map(|s| self.instantiate_signature(s, mapper))
                .collect(),
            construct_signatures: shape
                .construct_signatures
                .iter()
                .map(|s| self.instantiate_signature(s, mapper))
                .collect(),
            index_infos: shape
                .index_infos
                .iter()
                .map(|i| IndexInfo {
                    key: self.instantiate(i.key, mapper),
                    ty: self.instantiate(i.ty, mapper),
                    readonly: i.readonly,
                })
                .collect(),
        })
    }

    pub(crate) fn instantiate_signature(&self, signature: &Signature, mapper: Option<MapperId>) -> Signature {
        Signature {
            type_params: signature.type_params.clone(),
            params: signature
                .params
                .iter()
                .map(|p| SignatureParam {
                    ty: self.instantiate(p.ty, mapper),
                    ..p.clone()
                })
                .collect(),
            return_type: self.instantiate(signature.return_type, mapper),
        }
    }

    /// Generic members of an object, function or constructor type node.
    fn decl_shape(&self, decl: NodeKey) -> Option<Rc<ObjectShape>> {
        if let Some(shape) = self.decl_shapes.borrow().get(&decl) {
            return Some(Rc::clone(shape));
        }
        let file = decl.file;
        let shape = match ast::Type::cast(self.program.node(decl)?)? {
            ast::Type::Object(object) => self.members_shape(file, object.members()),
            ast::Type::Function(function) => ObjectShape {
                call_signatures: vec![self.signature_from(
                    file,
                    function.type_params(),
                    function.params(),
                    function.return_type(),
                )],
                ..ObjectShape::default()
            },
            ast::Type::Constructor(constructor) => ObjectShape {
                construct_signatures: vec![self.signature_from(
                    file,
                    constructor.type_params(),
                    constructor.params(),
                    constructor.return_type(),
                )],
                ..ObjectShape::default()
            },
            _ => return None,
        };
        let shape = Rc::new(shape);
        self.decl_shapes.borrow_mut().insert(decl, Rc::clone(&shape));
        Some(shape)
    }

    fn members_shape(&self, file: SourceId, members: impl Iterator<Item = TypeMember>) -> ObjectShape {
        let mut shape = ObjectShape::default();
        let mut methods: Vec<(usize, Vec<Signature>)> = Vec::new();
        for member in members {
            match member {
                TypeMember::Property(property) => {
                    let Some(name) = property.name().filter(|n| !n.is_raw()) else {
                        continue;
                    };
                    let text = name.text();
                    if shape.property(&text).is_some() {
                        continue;
                    }
                    let mut ty = property
                        .type_annotation()
                        .and_then(|a| a.ty())
                        .map(|t| self.type_from_type_node(file, &t))
                        .unwrap_or(TypeId::ANY);
                    if property.is_optional() {
                        ty = self.add_optionality(ty);
                    }
                    shape.properties.push(Property {
                        numeric: is_numeric_name(&name),
                        name: text,
                        ty,
                        optional: property.is_optional(),
                        readonly: property.is_readonly(),
                        method: false,
                    });
                }
                TypeMember::Method(method) => {
                    let Some(name) = method.name().filter(|n| !n.is_raw()) else {
                        continue;
                    };
                    let text = name.text();
                    let signature = self.signature_from(
                        file,
                        method.type_params(),
                        method.params(),
                        method.return_type(),
                    );
                    if let Some(index) = shape.properties.iter().position(|p| p.name == text) {
                        if let Some((_, signatures)) = methods.iter_mut().find(|(i, _)| *i == index) {
                            signatures.push(signature);
                        }
                        continue;
                    }
                    methods.push((shape.properties.len(), vec![signature]));
                    shape.properties.push(Property {
                        numeric: is_numeric_name(&name),
                        name: text,
                        ty: TypeId::ERROR,
                        optional: method.is_optional(),
                        readonly: false,
                        method: true,
                    });
                }
                TypeMember::Call(call) => shape.call_signatures.push(self.signature_from(
                    file,
                    call.type_params(),
                    call.params(),
                    call.return_type(),
                )),
                TypeMember::Construct(construct) => {
                    shape.construct_signatures.push(self.signature_from(
                        file,
                        construct.type_params(),
                        construct.params(),
                        construct.return_type(),
                    ))
                }
                TypeMember::Index(index) => {
                    let key = index
                        .param()
                        .and_then(|p| p.type_annotation())
                        .and_then(|a| a.ty())
                        .map(|t| self.type_from_type_node(file, &t))
                        .unwrap_or(TypeId::STRING);
                    let ty = index
                        .type_annotation()
                        .and_then(|a| a.ty())
                        .map(|t| self.type_from_type_node(file, &t))
                        .unwrap_or(TypeId::ANY);
                    shape.index_infos.push(IndexInfo {
                        key,
                        ty,
                        readonly: index.is_readonly(),
                    });
                }
            }
        }
        for (index, signatures) in methods {
            shape.properties[index].ty = self.object_type(ObjectShape {
                call_signatures: signatures,
                ..ObjectShape::default()
            });
        }
        shape
    }

    pub(crate) fn signature_from(
        &self,
        file: SourceId,
        type_params: Option<TypeParamList>,
        params: Option<ParamList>,
        return_type: Option<ReturnType>,
    ) -> Signature {
        let type_params = self.type_params_of(file, type_params);
        let params = params
            .iter()
            .flat_map(|list| list.params())
            .filter(|p| !p.is_this())
            .map(|p| SignatureParam {
                name: p.name().map(|n| n.text()).unwrap_or_default(),
                ty: p
                    .type_annotation()
                    .and_then(|a| a.ty())
                    .map(|t| self.type_from_type_node(file, &t))
                    .unwrap_or(TypeId::ANY),
                optional: p.is_optional() || p.initializer().is_some(),
                rest: p.is_rest(),
            })
            .collect();
        let return_type = match return_type {
            Some(ret) => match ret.predicate() {
                Some(predicate) if predicate.is_asserts() => TypeId::VOID,
                Some(_) => TypeId::BOOLEAN,
                None => self.type_from_optional(file, ret.ty()),
            },
            None => TypeId::ANY,
        };
        Signature {
            type_params,
            params,
            return_type,
        }
    }

    /// Merged members of every declaration of an interface, bases included.
    fn interface_shape(&self, symbol: SymbolId) -> Rc<ObjectShape> {
        match self.interface_shapes.borrow().get(&symbol) {
            Some(Some(shape)) => return Rc::clone(shape),
            Some(None) => return Rc::default(),
            None => {}
        }
        self.interface_shapes.borrow_mut().insert(symbol, None);

        let mut shape = ObjectShape::default();
        let declarations: Vec<_> = self
            .symbols()
            .get(symbol)
            .declarations_of(SyntaxKind::InterfaceDecl)
            .cloned()
            .collect();
        let interfaces: Vec<_> = declarations
            .iter()
            .filter_map(|d| Some((d.file, InterfaceDecl::cast(d.node.clone())?)))
            .collect();
        for (file, interface) in &interfaces {
            if let Some(body) = interface.body() {
                merge_shape(&mut shape, self.members_shape(*file, body.members()));
            }
        }
        for (file, interface) in &interfaces {
            for base in interface.heritage().iter().flat_map(|h| h.types()) {
                let base = self.type_from_type_node(*file, &ast::Type::Reference(base));
                if let Some(inherited) = self.resolve_shape(base) {
                    merge_shape(&mut shape, (*inherited).clone());
                }
            }
        }

        let shape = Rc::new(shape);
        self.interface_shapes
            .borrow_mut()
            .insert(symbol, Some(Rc::clone(&shape)));
        shape
    }

    /// Overload signatures of a function, or its implementation when it has none.
    pub(crate) fn function_signatures(&self, symbol: SymbolId) -> Vec<Signature> {
        let functions: Vec<_> = self
            .symbols()
            .get(symbol)
            .declarations_of(SyntaxKind::FunctionDecl)
            .filter_map(|d| Some((d.file, ast::FunctionDecl::cast(d.node.clone())?)))
            .collect();
        let has_overloads = functions.len() > 1 && functions.iter().any(|(_, f)| !f.has_body());
        functions
            .iter()
            .filter(|(_, f)| !has_overloads || !f.has_body())
            .map(|(file, f)| self.signature_from(*file, f.type_params(), f.params(), f.return_type()))
            .collect()
    }

    pub(crate) fn add_optionality(&self, ty: TypeId) -> TypeId {
        if self.strict_null_checks {
            self.get_union(vec![ty, TypeId::UNDEFINED])
        } else {
            ty
        }
    }

    /// The object type whose members a value of `ty` exposes.
    pub(crate) fn apparent_type(&self, ty: TypeId) -> TypeId {
        let global = |name| {
            self.global_type(name)
                .map(|symbol| self.intern(TypeKind::Interface { symbol, args: Vec::new() }))
                .unwrap_or(TypeId::ERROR)
        };
        match self.kind(ty) {
            TypeKind::String
            | TypeKind::StringLiteral(_)
            | TypeKind::TemplateLiteral { .. }
            | TypeKind::StringMapping { .. } => global("String"),
            TypeKind::Number | TypeKind::NumberLiteral(_) => global("Number"),
            TypeKind::False | TypeKind::True => global("Boolean"),
            TypeKind::Union(_) if ty == TypeId::BOOLEAN => global("Boolean"),
            TypeKind::Param(symbol) => match self.param_constraint(symbol) {
                Some(constraint) => self.apparent_type(constraint),
                None => TypeId::UNKNOWN,
            },
            _ => ty,
        }
    }

    /// Property `name` of `ty`, through unions, intersections, tuples and apparent types.
    pub(crate) fn property_of_type(&self, ty: TypeId, name: &str) -> Option<Property> {
        match self.kind(ty) {
            TypeKind::Union(members) => {
                let found: Option<Vec<Property>> =
                    members.iter().map(|&m| self.property_of_type(m, name)).collect();
                let found = found?;
                Some(Property {
                    name: name.to_string(),
                    ty: self.get_union(found.iter().map(|p| p.ty).collect()),
                    optional: found.iter().any(|p| p.optional),
                    readonly: found.iter().any(|p| p.readonly),
                    method: false,
                    numeric: found.iter().all(|p| p.numeric),
                })
            }
            TypeKind::Intersection(members) => {
                let found: Vec<Property> = members
                    .iter()
                    .filter_map(|&m| self.property_of_type(m, name))
                    .collect();
                if found.is_empty() {
                    return None;
                }
                Some(Property {
                    name: name.to_string(),
                    ty: self.get_intersection(found.iter().map(|p| p.ty).collect()),
                    optional: found.iter().all(|p| p.optional),
                    readonly: found.iter().any(|p| p.readonly),
                    method: false,
                    numeric: found.iter().all(|p| p.numeric),
                })
            }
            TypeKind::Tuple { elements, readonly } => self.tuple_property(&elements, readonly, name),
            TypeKind::Object(_)
            | TypeKind::Anonymous { .. }
            | TypeKind::Interface { .. }
            | TypeKind::FunctionValue(_) => self.resolve_shape(ty)?.property(name).cloned(),
            _ => {
                let apparent = self.apparent_type(ty);
                if apparent == ty {
                    return None;
                }
                self.property_of_type(apparent, name)
            }
        }
    }

    fn tuple_property(&self, elements: &[TupleElement], readonly: bool, name: &str) -> Option<Property> {
        let fixed = elements
            .iter()
            .all(|e| matches!(e.kind, ElementKind::Required | ElementKind::Optional));
        if let Ok(index) = name.parse::<usize>()
            && index.to_string() == name
            && let Some(element) = elements.get(index)
            && matches!(element.kind, ElementKind::Required | ElementKind::Optional)
        {
            let optional = element.kind == ElementKind::Optional;
            let ty = if optional { self.add_optionality(element.ty) } else { element.ty };
            return Some(Property {
                name: name.to_string(),
                ty,
                optional,
                readonly,
                method: false,
                numeric: false,
            });
        }
        if name == "length" {
            let ty = if fixed {
                self.number_literal(elements.len() as f64)
            } else {
                TypeId::NUMBER
            };
            return Some(Property {
                name: name.to_string(),
                ty,
                optional: false,
                readonly: true,
                method: false,
                numeric: false,
            });
        }
        let element = self.tuple_element_union(elements);
        let array = self.array_type(element, readonly);
        self.property_of_type(array, name)
    }

    pub(crate) fn tuple_element_union(&self, elements: &[TupleElement]) -> TypeId {
        let types = elements
            .iter()
            .map(|e| match e.kind {
                ElementKind::Variadic => self
                    .array_element_type(e.ty)
                    .unwrap_or_else(|| self.get_indexed_access(e.ty, TypeId::NUMBER)),
                ElementKind::Optional => self.add_optionality(e.ty),
                _ => e.ty,
            })
            .collect();
        self.get_union(types)
    }

    /// Index signature applying to `key` (`string` or `number`) on `ty`.
    pub(crate) fn index_info_of(&self, ty: TypeId, key: TypeId) -> Option<IndexInfo> {
        match self.kind(ty) {
            TypeKind::Tuple { elements, readonly } if key == TypeId::NUMBER => Some(IndexInfo {
                key,
                ty: self.tuple_element_union(&elements),
                readonly,
            }),
            TypeKind::Tuple { elements, readonly } => {
                let array = self.array_type(self.tuple_element_union(&elements), readonly);
                self.index_info_of(array, key)
            }
            TypeKind::Union(members) => {
                let infos: Option<Vec<IndexInfo>> =
                    members.iter().map(|&m| self.index_info_of(m, key)).collect();
                let infos = infos?;
                Some(IndexInfo {
                    key,
                    ty: self.get_union(infos.iter().map(|i| i.ty).collect()),
                    readonly: infos.iter().any(|i| i.readonly),
                })
            }
            TypeKind::Intersection(members) => {
                let infos: Vec<IndexInfo> = members
                    .iter()
                    .filter_map(|&m| self.index_info_of(m, key))
                    .collect();
                if infos.is_empty() {
                    return None;
                }
                Some(IndexInfo {
                    key,
                    ty: self.get_intersection(infos.iter().map(|i| i.ty).collect()),
                    readonly: infos.iter().all(|i| i.readonly),
                })
            }
            _ => {
                let apparent = self.apparent_type(ty);
                let shape = self.resolve_shape(apparent)?;
                let exact = shape.index_info(key).cloned();
                if key == TypeId::NUMBER {
                    exact.or_else(|| shape.index_info(TypeId::STRING).cloned())
                } else {
                    exact
                }
            }
        }
    }
}

fn merge_shape(into: &mut ObjectShape, from: ObjectShape) {
    for property in from.properties {
        if into.property(&property.name).is_none() {
            into.properties.push(property);
        }
    }
    into.call_signatures.extend(from.call_signatures);
    into.construct_signatures.extend(from.construct_signatures);
    for info in from.index_infos {
        if into.index_info(info.key).is_none() {
            into.index_infos.push(info);
        }
    }
}

fn is_numeric_name(name: &ast::Name) -> bool {
    name.token()
        .is_some_and(|t| t.kind() == SyntaxKind::NumberLiteral)
}
