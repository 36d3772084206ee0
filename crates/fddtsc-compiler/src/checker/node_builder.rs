//! Rendering types back into declaration type nodes.
//!
//! The builder walks a [`TypeId`] and produces a synthetic [`TypeNode`] that
//! prints as TypeScript would print the type in a declaration file. Named
//! types (aliases, interfaces, functions) are referenced by the shortest name
//! reachable from the enclosing file; everything else is spelled out
//! structurally.

use std::ops::BitOr;

use fddtsc_core::utils::property_name_text;

use super::Checker;
use super::scope::Meaning;
use super::types::{ElementKind, ObjectShape, Property, Signature, TypeId, TypeKind};
use crate::dts::factory;
use crate::dts::tree::{
    CallSignature, IndexSignature, Keyword, MappedModifier, MappedTypeNode, MethodSignature,
    Parameter, PropertySignature, Signature as SignatureNode, TemplateSpan, TupleMember,
    TupleMemberKind, TypeMember, TypeNode, TypeNodeKind, TypeOperatorKind, TypeParameter,
};
use crate::parser::SyntaxKind;
use crate::parser::ast;
use crate::program::{SymbolFlags, SymbolId, paths};
use crate::source_map::SourceId;

/// Output length after which unions and object members are elided.
const DEFAULT_MAXIMUM_TRUNCATION_LENGTH: usize = 160;
const NO_TRUNCATION_MAXIMUM_TRUNCATION_LENGTH: usize = 1_000_000;
/// Nesting limit for rendered types.
const MAX_RENDER_DEPTH: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeBuilderFlags(u32);

impl NodeBuilderFlags {
    pub const NONE: Self = Self(0);
    /// Never elide members, however long the output gets.
    pub const NO_TRUNCATION: Self = Self(1 << 0);
    /// The type is the right-hand side of an alias: its own alias is expanded.
    pub const IN_TYPE_ALIAS: Self = Self(1 << 1);
    /// Unreachable named types print as `import("./m").Name`.
    pub const USE_FULLY_QUALIFIED_TYPE: Self = Self(1 << 2);
    /// Reference aliases even when no local name reaches them.
    pub const USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE: Self = Self(1 << 3);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for NodeBuilderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// How a named type is spelled from the enclosing file.
enum EntityName {
    Local(Vec<String>),
    Import { module: String, qualifier: Vec<String> },
}

impl EntityName {
    fn reference(self, args: Vec<TypeNode>) -> TypeNode {
        match self {
            EntityName::Local(name) => factory::reference(name, args),
            EntityName::Import { module, qualifier } => factory::import_type(module, qualifier, args),
        }
    }

    fn len(&self) -> usize {
        match self {
            EntityName::Local(name) => name.iter().map(|s| s.len() + 1).sum(),
            EntityName::Import { module, qualifier } => {
                module.len() + qualifier.iter().map(|s| s.len() + 1).sum::<usize>() + 8
            }
        }
    }
}

struct BuildContext {
    flags: NodeBuilderFlags,
    enclosing: SourceId,
    in_type_alias: bool,
    depth: u32,
    approximate_length: usize,
    truncating: bool,
    /// Object-like types currently being spelled out.
    visiting: Vec<TypeId>,
    /// `infer` parameters of the extends clause being rendered.
    inferring: Vec<SymbolId>,
    /// `infer` parameters in scope (extends clause and true branch).
    infer_visible: Vec<SymbolId>,
}

impl BuildContext {
    fn check_truncation(&mut self) -> bool {
        if !self.truncating {
            let limit = if self.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
                NO_TRUNCATION_MAXIMUM_TRUNCATION_LENGTH
            } else {
                DEFAULT_MAXIMUM_TRUNCATION_LENGTH
            };
            self.truncating = self.approximate_length > limit;
        }
        self.truncating
    }

    fn elided_placeholder(&mut self) -> TypeNode {
        self.approximate_length += 3;
        if self.flags.contains(NodeBuilderFlags::NO_TRUNCATION) {
            factory::keyword(Keyword::Any)
        } else {
            factory::reference(vec!["...".to_string()], Vec::new())
        }
    }
}

impl<'p> Checker<'p> {
    /// Renders `ty` as seen from `enclosing`.
    ///
    /// Returns `None` when the type cannot be written down: rendering nested
    /// too deeply, an `infer` variable escaped its conditional, or a named
    /// type has no spelling under `flags`.
    pub fn type_to_node(&self, ty: TypeId, flags: NodeBuilderFlags, enclosing: SourceId) -> Option<TypeNode> {
        let mut cx = BuildContext {
            flags,
            enclosing,
            in_type_alias: flags.contains(NodeBuilderFlags::IN_TYPE_ALIAS),
            depth: 0,
            approximate_length: 0,
            truncating: false,
            visiting: Vec::new(),
            inferring: Vec::new(),
            infer_visible: Vec::new(),
        };
        self.render(ty, &mut cx)
    }

    /// Printed form of `ty` for messages.
    pub fn type_to_string(&self, ty: TypeId, enclosing: SourceId) -> String {
        let flags = NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE
            | NodeBuilderFlags::USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE;
        match self.type_to_node(ty, flags, enclosing) {
            Some(node) => crate::dts::printer::print_type(&node),
            None => "any".to_string(),
        }
    }

    fn render(&self, ty: TypeId, cx: &mut BuildContext) -> Option<TypeNode> {
        if cx.depth >= MAX_RENDER_DEPTH {
            return None;
        }
        cx.depth += 1;
        let node = self.render_inner(ty, cx);
        cx.depth -= 1;
        node
    }

    fn render_inner(&self, ty: TypeId, cx: &mut BuildContext) -> Option<TypeNode> {
        let in_type_alias = std::mem::replace(&mut cx.in_type_alias, false);
        let data = self.type_data(ty);

        if let Some(alias) = &data.alias
            && !in_type_alias
        {
            let outside = cx.flags.contains(NodeBuilderFlags::USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE);
            if let Some(entity) = self.entity_name(alias.symbol, Meaning::Type, cx, outside) {
                cx.approximate_length += entity.len();
                let args = self.render_list(&alias.args, cx)?;
                return Some(entity.reference(args));
            }
        }

        if ty == TypeId::BOOLEAN {
            return Some(keyword(Keyword::Boolean, cx));
        }

        let node = match data.kind {
            TypeKind::Any | TypeKind::Error => keyword(Keyword::Any, cx),
            TypeKind::Unknown => keyword(Keyword::Unknown, cx),
            TypeKind::Undefined => keyword(Keyword::Undefined, cx),
            TypeKind::Null => keyword(Keyword::Null, cx),
            TypeKind::String => keyword(Keyword::String, cx),
            TypeKind::Number => keyword(Keyword::Number, cx),
            TypeKind::BigInt => keyword(Keyword::BigInt, cx),
            TypeKind::Symbol => keyword(Keyword::Symbol, cx),
            TypeKind::Void => keyword(Keyword::Void, cx),
            TypeKind::Never => keyword(Keyword::Never, cx),
            TypeKind::NonPrimitive => keyword(Keyword::Object, cx),
            TypeKind::This => {
                cx.approximate_length += 4;
                TypeNode::synthetic(TypeNodeKind::This)
            }
            TypeKind::False => {
                cx.approximate_length += 5;
                factory::boolean_literal(false)
            }
            TypeKind::True => {
                cx.approximate_length += 4;
                factory::boolean_literal(true)
            }
            TypeKind::StringLiteral(value) => literal(factory::string_literal(&value), cx),
            TypeKind::NumberLiteral(bits) => literal(factory::number_literal(f64::from_bits(bits)), cx),
            TypeKind::BigIntLiteral(digits) => literal(factory::bigint_literal(&digits), cx),
            TypeKind::TemplateLiteral { texts, types } => {
                let head = escape_template_text(&texts[0]);
                cx.approximate_length += head.len() + 2;
                let mut spans = Vec::with_capacity(types.len());
                for (ty, text) in types.iter().zip(&texts[1..]) {
                    let ty = self.render(*ty, cx)?;
                    let text = escape_template_text(text);
                    cx.approximate_length += text.len() + 3;
                    spans.push(TemplateSpan { ty, text });
                }
                factory::template_literal(head, spans)
            }
            TypeKind::StringMapping { mapping, ty } => {
                cx.approximate_length += mapping.name().len();
                let arg = self.render(ty, cx)?;
                factory::reference(vec![mapping.name().to_string()], vec![arg])
            }
            TypeKind::Union(members) => {
                let formatted = format_union(&members);
                let mut nodes = self.render_list(&formatted, cx)?;
                match nodes.len() {
                    1 => nodes.pop()?,
                    _ => factory::union(nodes),
                }
            }
            TypeKind::Intersection(members) => {
                let mut nodes = self.render_list(&members, cx)?;
                match nodes.len() {
                    1 => nodes.pop()?,
                    _ => factory::intersection(nodes),
                }
            }
            TypeKind::Param(symbol) => self.param_node(symbol, cx)?,
            TypeKind::Interface { symbol, args } => self.interface_node(ty, symbol, &args, cx)?,
            TypeKind::Tuple { elements, readonly } => {
                let mut members = Vec::with_capacity(elements.len());
                for element in &elements {
                    cx.approximate_length += 2;
                    let rendered = self.render(element.ty, cx)?;
                    let (kind, ty) = match element.kind {
                        ElementKind::Required => (TupleMemberKind::Required, rendered),
                        ElementKind::Optional => (TupleMemberKind::Optional, rendered),
                        ElementKind::Rest => (TupleMemberKind::Rest, factory::array(rendered)),
                        ElementKind::Variadic => (TupleMemberKind::Rest, rendered),
                    };
                    members.push(TupleMember {
                        kind,
                        name: element.name.clone(),
                        ty,
                    });
                }
                let tuple = factory::tuple(members);
                if readonly {
                    cx.approximate_length += 9;
                    factory::type_operator(TypeOperatorKind::Readonly, tuple)
                } else {
                    tuple
                }
            }
            TypeKind::FunctionValue(symbol) => {
                match self.entity_name(symbol, Meaning::Value, cx, false) {
                    Some(EntityName::Local(name)) => {
                        cx.approximate_length += name.iter().map(|s| s.len()).sum::<usize>() + 7;
                        factory::type_query(name, Vec::new())
                    }
                    _ => self.object_node(ty, cx)?,
                }
            }
            TypeKind::Anonymous { .. } | TypeKind::Object(_) => self.object_node(ty, cx)?,
            TypeKind::Index(operand) => {
                cx.approximate_length += 6;
                let operand = self.render(operand, cx)?;
                factory::type_operator(TypeOperatorKind::Keyof, operand)
            }
            TypeKind::IndexedAccess { object, index } => {
                let object = self.render(object, cx)?;
                let index = self.render(index, cx)?;
                cx.approximate_length += 2;
                factory::indexed_access(object, index)
            }
            TypeKind::Conditional { decl, mapper } => {
                let view = self.conditional_view(decl, mapper)?;
                let check = self.render(view.check, cx)?;
                cx.approximate_length += 9;

                let saved_inferring = std::mem::replace(&mut cx.inferring, view.infer.clone());
                let visible = cx.infer_visible.len();
                cx.infer_visible.extend(view.infer.iter().copied());
                let extends = self.render(view.extends, cx);
                cx.inferring = saved_inferring;
                let extends = extends?;

                cx.approximate_length += 3;
                let true_type = self.render(view.true_type, cx);
                cx.infer_visible.truncate(visible);
                let true_type = true_type?;

                cx.approximate_length += 3;
                let false_type = self.render(view.false_type, cx)?;
                factory::conditional(check, extends, true_type, false_type)
            }
            TypeKind::Mapped { decl, mapper } => {
                let view = self.mapped_view(decl, mapper)?;
                let parameter = self.symbols().get(view.key).name.clone();
                cx.approximate_length += parameter.len() + 10;
                let constraint = self.render(view.constraint, cx)?;
                let name_type = match view.name_type {
                    Some(name_type) => Some(self.render(name_type, cx)?),
                    None => None,
                };
                let template = match view.template {
                    Some(template) => Some(self.render(template, cx)?),
                    None => None,
                };
                factory::mapped(MappedTypeNode {
                    readonly: view.readonly.map(mapped_modifier),
                    parameter,
                    constraint,
                    name_type,
                    optional: view.optional.map(mapped_modifier),
                    ty: template,
                })
            }
        };
        Some(node)
    }

    /// Renders `types` in order, eliding the middle once output gets long.
    fn render_list(&self, types: &[TypeId], cx: &mut BuildContext) -> Option<Vec<TypeNode>> {
        let mut nodes = Vec::with_capacity(types.len());
        for (i, &ty) in types.iter().enumerate() {
            if cx.check_truncation() && i + 2 < types.len() - 1 {
                let elided = format!("... {} more ...", types.len() - i);
                cx.approximate_length += elided.len();
                nodes.push(factory::reference(vec![elided], Vec::new()));
                nodes.push(self.render(types[types.len() - 1], cx)?);
                break;
            }
            cx.approximate_length += 2;
            nodes.push(self.render(ty, cx)?);
        }
        Some(nodes)
    }

    fn param_node(&self, symbol: SymbolId, cx: &mut BuildContext) -> Option<TypeNode> {
        let name = self.symbols().get(symbol).name.clone();
        cx.approximate_length += name.len();
        if cx.inferring.contains(&symbol) {
            cx.approximate_length += 6;
            let constraint = match self.param_constraint(symbol) {
                Some(constraint) => Some(self.render(constraint, cx)?),
                None => None,
            };
            return Some(factory::infer(name, constraint));
        }
        if self.is_infer_param(symbol) && !cx.infer_visible.contains(&symbol) {
            return None;
        }
        Some(factory::reference(vec![name], Vec::new()))
    }

    fn is_infer_param(&self, symbol: SymbolId) -> bool {
        self.symbols()
            .get(symbol)
            .declarations
            .first()
            .and_then(|d| d.node.parent())
            .is_some_and(|parent| parent.kind() == SyntaxKind::InferType)
    }

    fn interface_node(
        &self,
        ty: TypeId,
        symbol: SymbolId,
        args: &[TypeId],
        cx: &mut BuildContext,
    ) -> Option<TypeNode> {
        if let Some(element) = self.array_element_type(ty) {
            cx.approximate_length += 2;
            let element = self.render(element, cx)?;
            let array = factory::array(element);
            if self.is_readonly_array(ty) {
                cx.approximate_length += 9;
                return Some(factory::type_operator(TypeOperatorKind::Readonly, array));
            }
            return Some(array);
        }
        let entity = self.entity_name(symbol, Meaning::Type, cx, true)?;
        cx.approximate_length += entity.len();
        let args = self.render_list(args, cx)?;
        Some(entity.reference(args))
    }

    /// Object literal, or a function or constructor type when the shape is a
    /// single signature and nothing else.
    fn object_node(&self, ty: TypeId, cx: &mut BuildContext) -> Option<TypeNode> {
        if cx.visiting.contains(&ty) {
            return Some(cx.elided_placeholder());
        }
        let Some(shape) = self.resolve_shape(ty) else {
            return Some(keyword(Keyword::Any, cx));
        };
        cx.visiting.push(ty);
        let node = self.shape_node(&shape, cx);
        cx.visiting.pop();
        node
    }

    fn shape_node(&self, shape: &ObjectShape, cx: &mut BuildContext) -> Option<TypeNode> {
        let no_members = shape.properties.is_empty() && shape.index_infos.is_empty();
        if no_members && shape.construct_signatures.is_empty() && shape.call_signatures.len() == 1 {
            let signature = self.signature_node(&shape.call_signatures[0], cx)?;
            return Some(factory::function(signature));
        }
        if no_members && shape.call_signatures.is_empty() && shape.construct_signatures.len() == 1 {
            cx.approximate_length += 4;
            let signature = self.signature_node(&shape.construct_signatures[0], cx)?;
            return Some(factory::constructor(false, signature));
        }

        cx.approximate_length += 2;
        let mut members = Vec::new();
        for signature in &shape.call_signatures {
            members.push(TypeMember::Call(CallSignature {
                origin: None,
                signature: self.signature_node(signature, cx)?,
            }));
        }
        for signature in &shape.construct_signatures {
            cx.approximate_length += 4;
            members.push(TypeMember::Construct(CallSignature {
                origin: None,
                signature: self.signature_node(signature, cx)?,
            }));
        }
        for info in &shape.index_infos {
            cx.approximate_length += 5;
            members.push(TypeMember::Index(IndexSignature {
                origin: None,
                readonly: info.readonly,
                parameter: "x".to_string(),
                key: self.render(info.key, cx)?,
                ty: self.render(info.ty, cx)?,
            }));
        }
        let count = shape.properties.len();
        for (i, property) in shape.properties.iter().enumerate() {
            if cx.check_truncation() && i + 2 < count - 1 {
                members.push(TypeMember::Property(PropertySignature {
                    origin: None,
                    readonly: false,
                    name: format!("... {} more ...", count - i),
                    optional: false,
                    ty: None,
                }));
                self.push_property(&shape.properties[count - 1], &mut members, cx)?;
                break;
            }
            self.push_property(property, &mut members, cx)?;
        }
        Some(factory::object(members))
    }

    fn push_property(&self, property: &Property, members: &mut Vec<TypeMember>, cx: &mut BuildContext) -> Option<()> {
        let name = property_name_text(&property.name);
        cx.approximate_length += name.len() + 1;
        if property.method
            && let Some(shape) = self.resolve_shape(property.ty)
            && !shape.call_signatures.is_empty()
        {
            for signature in &shape.call_signatures {
                members.push(TypeMember::Method(MethodSignature {
                    origin: None,
                    name: name.clone(),
                    optional: property.optional,
                    signature: self.signature_node(signature, cx)?,
                }));
            }
            return Some(());
        }
        if property.readonly {
            cx.approximate_length += 9;
        }
        members.push(TypeMember::Property(PropertySignature {
            origin: None,
            readonly: property.readonly,
            name,
            optional: property.optional,
            ty: Some(self.render(property.ty, cx)?),
        }));
        Some(())
    }

    fn signature_node(&self, signature: &Signature, cx: &mut BuildContext) -> Option<SignatureNode> {
        let mut type_params = Vec::with_capacity(signature.type_params.len());
        for &param in &signature.type_params {
            type_params.push(self.type_parameter_node(param, cx)?);
        }
        let mut params = Vec::with_capacity(signature.params.len());
        for param in &signature.params {
            cx.approximate_length += param.name.len() + 2;
            params.push(Parameter {
                rest: param.rest,
                name: param.name.clone(),
                optional: param.optional,
                ty: Some(self.render(param.ty, cx)?),
            });
        }
        cx.approximate_length += 4;
        let return_type = self.render(signature.return_type, cx)?;
        Some(SignatureNode {
            type_params,
            params,
            return_type: Some(Box::new(return_type)),
        })
    }

    fn type_parameter_node(&self, param: SymbolId, cx: &mut BuildContext) -> Option<TypeParameter> {
        let name = self.symbols().get(param).name.clone();
        cx.approximate_length += name.len();
        let constraint = match self.param_constraint(param) {
            Some(constraint) => Some(self.render(constraint, cx)?),
            None => None,
        };
        let default = match self.param_default(param) {
            Some(default) => Some(self.render(default, cx)?),
            None => None,
        };
        Some(TypeParameter {
            name,
            is_const: false,
            constraint,
            default,
        })
    }

    /// Spelling of `symbol` from the enclosing file, tried in order: its own
    /// name, an import binding, a namespace import chain, and with
    /// `fully_qualified` an `import("...")` type.
    fn entity_name(
        &self,
        symbol: SymbolId,
        meaning: Meaning,
        cx: &BuildContext,
        fully_qualified: bool,
    ) -> Option<EntityName> {
        let symbols = self.symbols();
        let data = symbols.get(symbol);
        let declaring = data.declarations.first().map(|d| d.file);
        if declaring.is_some_and(|file| self.program.source(file).is_default_lib()) {
            return Some(EntityName::Local(vec![data.name.clone()]));
        }

        if let Some(name) = self.local_name(symbol, meaning, cx.enclosing) {
            return Some(EntityName::Local(vec![name]));
        }
        if let Some(path) = self.namespace_path(symbol, cx.enclosing) {
            return Some(EntityName::Local(path));
        }

        if !(fully_qualified && cx.flags.contains(NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE)) {
            return None;
        }
        let declaring = declaring?;
        let export = symbols.export_name_of(declaring, symbol)?;
        let from = self.program.source(cx.enclosing).path();
        let from_dir = from.parent().unwrap_or(from);
        let specifier = paths::module_specifier(from_dir, self.program.source(declaring).path());
        Some(EntityName::Import {
            module: fddtsc_core::utils::quote_string(&specifier),
            qualifier: vec![export],
        })
    }

    /// A single name in `file` that resolves to `symbol` with `meaning`.
    fn local_name(&self, symbol: SymbolId, meaning: Meaning, file: SourceId) -> Option<String> {
        let symbols = self.symbols();
        let name = &symbols.get(symbol).name;
        let locals = symbols.file(file).map(|f| &f.locals);

        match locals.and_then(|l| l.get(name)) {
            Some(&local) => {
                if symbols.resolve_alias(local) == Some(symbol) {
                    return Some(name.clone());
                }
            }
            None => {
                if symbols.globals().get(name) == Some(&symbol) {
                    return Some(name.clone());
                }
            }
        }

        // Renamed import bindings.
        locals?.iter().find_map(|(local_name, &id)| {
            let flags = symbols.get(id).flags;
            let resolves = flags.intersects(SymbolFlags::ALIAS) && symbols.resolve_alias(id) == Some(symbol);
            (resolves && meaning.matches(symbols.get(symbol).flags)).then(|| local_name.clone())
        })
    }

    /// `ns.Name` or `ns.inner.Name` through namespace imports of `file`.
    fn namespace_path(&self, symbol: SymbolId, file: SourceId) -> Option<Vec<String>> {
        let symbols = self.symbols();
        let locals = &symbols.file(file)?.locals;
        for (local_name, &id) in locals {
            let Some(module) = symbols
                .resolve_alias(id)
                .filter(|&target| target != id)
                .and_then(|target| symbols.get(target).module)
            else {
                continue;
            };
            if let Some(export) = symbols.export_name_of(module, symbol) {
                return Some(vec![local_name.clone(), export]);
            }
            for inner in symbols.export_names(module) {
                let Some(inner_module) = symbols
                    .export_of(module, &inner)
                    .and_then(|target| symbols.get(target).module)
                else {
                    continue;
                };
                if let Some(export) = symbols.export_name_of(inner_module, symbol) {
                    return Some(vec![local_name.clone(), inner, export]);
                }
            }
        }
        None
    }
}

fn keyword(keyword: Keyword, cx: &mut BuildContext) -> TypeNode {
    cx.approximate_length += keyword.as_str().len();
    factory::keyword(keyword)
}

fn literal(node: TypeNode, cx: &mut BuildContext) -> TypeNode {
    if let TypeNodeKind::Literal(text) = &node.kind {
        cx.approximate_length += text.len();
    }
    node
}

/// Union members in display order: `false | true` collapses to `boolean`,
/// and `null` and `undefined` move to the end.
fn format_union(members: &[TypeId]) -> Vec<TypeId> {
    let has_null = members.contains(&TypeId::NULL);
    let has_undefined = members.contains(&TypeId::UNDEFINED);
    let has_boolean = members.contains(&TypeId::FALSE) && members.contains(&TypeId::TRUE);
    let mut out = Vec::with_capacity(members.len());
    for &member in members {
        match member {
            TypeId::NULL | TypeId::UNDEFINED => {}
            TypeId::FALSE if has_boolean => out.push(TypeId::BOOLEAN),
            TypeId::TRUE if has_boolean => {}
            _ => out.push(member),
        }
    }
    if has_null {
        out.push(TypeId::NULL);
    }
    if has_undefined {
        out.push(TypeId::UNDEFINED);
    }
    out
}

fn mapped_modifier(modifier: ast::MappedModifier) -> MappedModifier {
    match modifier {
        ast::MappedModifier::Add => MappedModifier::Plain,
        ast::MappedModifier::Remove => MappedModifier::Remove,
    }
}

/// Escapes cooked template text for printing between backticks.
fn escape_template_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
