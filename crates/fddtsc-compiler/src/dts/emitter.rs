//! Declaration view of a source file.
//!
//! Types written in the source are copied as they are (their nodes carry the
//! source file in their [`Origin`]); statements are rebuilt without bodies or
//! non-literal initializers and keep only their position. In a module, only
//! exported declarations and what they reference survive, and imports are
//! trimmed to the bindings still in use.

use std::collections::{HashMap, HashSet};

use fddtsc_core::utils::quote_string;
use rowan::WalkEvent;
use tracing::trace;

use super::factory;
use super::tree::{
    CallSignature, DtsFile, ExportAssignment, ExportClause, ExportDeclaration, FunctionDeclaration,
    ImportDeclaration, IndexSignature, InterfaceDeclaration, Keyword, MappedModifier,
    MappedTypeNode, MethodSignature, Modifiers, Origin, Parameter, PropertySignature, Signature,
    Specifier, Statement, TemplateSpan, TupleMember, TupleMemberKind, TypeAliasDeclaration,
    TypeMember, TypeNode, TypeNodeKind, TypeOperatorKind, TypeParameter, VariableDeclaration,
    VariableStatement,
};
use crate::Diagnostics;
use crate::checker::{Checker, NodeBuilderFlags, TypeId};
use crate::diagnostics::{DiagnosticKind, Span};
use crate::parser::ast::{self, DeclarationKeyword, EntityName, ParamList, ReturnType, TypeParamList};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};
use crate::source_map::SourceId;

/// Builds the declaration tree of `file`.
///
/// Diagnostics are declaration-emit problems: values whose type cannot be
/// written down without inference the checker does not do.
pub fn emit_declarations(checker: &Checker<'_>, file: SourceId) -> (DtsFile, Diagnostics) {
    let mut emitter = Emitter {
        checker,
        file,
        diagnostics: Diagnostics::new(),
    };
    let statements = emitter.statements();
    (
        DtsFile {
            source: file,
            statements,
        },
        emitter.diagnostics,
    )
}

struct Emitter<'c, 'p> {
    checker: &'c Checker<'p>,
    file: SourceId,
    diagnostics: Diagnostics,
}

impl Emitter<'_, '_> {
    fn statements(&mut self) -> Vec<Statement> {
        let program = self.checker.program();
        let Some(root) = program.file(self.file).map(|f| f.root()) else {
            return Vec::new();
        };
        let sources: Vec<ast::Statement> = root.statements().collect();
        let is_module = root.is_module();
        let visible = if is_module {
            visible_names(&sources)
        } else {
            HashSet::new()
        };
        let overloaded = overloaded_functions(&sources);

        let kept: Vec<&ast::Statement> = sources
            .iter()
            .filter(|s| !is_module || is_kept(s, &visible))
            .filter(|s| match s {
                ast::Statement::Function(f) => !(f.has_body() && name_in(f.name(), &overloaded)),
                _ => true,
            })
            .collect();

        let mut used = HashSet::new();
        for statement in &kept {
            if !matches!(statement, ast::Statement::Import(_)) {
                collect_referenced_names(statement.as_cst(), &mut used);
            }
        }

        let mut out = Vec::new();
        let mut kept_private = false;
        for statement in kept {
            let converted = match statement {
                ast::Statement::Import(import) => self.import(import, &used),
                ast::Statement::Export(export) => Some(self.export(export)),
                ast::Statement::ExportAssignment(assignment) => {
                    Some(self.export_assignment(assignment))
                }
                ast::Statement::TypeAlias(alias) => Some(self.type_alias(alias)),
                ast::Statement::Interface(interface) => Some(self.interface(interface)),
                ast::Statement::Function(function) => Some(self.function(function)),
                ast::Statement::Variable(variable) => Some(self.variable(variable)),
            };
            let Some(converted) = converted else {
                continue;
            };
            if is_declaration(&converted) && !converted.is_module_indicator() {
                kept_private = true;
            }
            out.push(converted);
        }

        if is_module {
            let has_indicator = out.iter().any(Statement::is_module_indicator);
            let has_scope_marker = out
                .iter()
                .any(|s| matches!(s, Statement::Export(_) | Statement::ExportAssignment(_)));
            if !has_indicator || (kept_private && !has_scope_marker) {
                out.push(Statement::Export(ExportDeclaration {
                    origin: None,
                    type_only: false,
                    clause: ExportClause::Named(Vec::new()),
                    module: None,
                }));
            }
        }
        trace!(file = ?self.file, statements = out.len(), "declarations built");
        out
    }

    fn import(&self, import: &ast::ImportDecl, used: &HashSet<String>) -> Option<Statement> {
        let module = module_text(import.module_specifier())?;
        let origin = Some(Origin::rebuilt(import.as_cst()));
        let Some(clause) = import.clause() else {
            return Some(Statement::Import(ImportDeclaration {
                origin,
                type_only: false,
                default: None,
                namespace: None,
                named: None,
                module,
            }));
        };
        let default = clause
            .default_name()
            .map(|n| n.text())
            .filter(|n| used.contains(n));
        let namespace = clause
            .namespace()
            .and_then(|ns| ns.name())
            .map(|n| n.text())
            .filter(|n| used.contains(n));
        let named = clause.named().map(|named| {
            named
                .specifiers()
                .filter_map(|spec| specifier(spec.is_type_only(), spec.property_name(), spec.name()))
                .filter(|spec| used.contains(&spec.name))
                .collect::<Vec<_>>()
        });
        let named = named.filter(|n| !n.is_empty());
        if default.is_none() && namespace.is_none() && named.is_none() {
            return None;
        }
        Some(Statement::Import(ImportDeclaration {
            origin,
            type_only: import.is_type_only(),
            default,
            namespace,
            named,
            module,
        }))
    }

    fn export(&self, export: &ast::ExportDecl) -> Statement {
        let clause = match export.export_star() {
            Some(star) => ExportClause::Star(star.alias().map(|n| n.text())),
            None => ExportClause::Named(
                export
                    .named_exports()
                    .iter()
                    .flat_map(|n| n.specifiers())
                    .filter_map(|spec| specifier(spec.is_type_only(), spec.property_name(), spec.name()))
                    .collect(),
            ),
        };
        Statement::Export(ExportDeclaration {
            origin: Some(Origin::rebuilt(export.as_cst())),
            type_only: export.is_type_only(),
            clause,
            module: export.module_specifier().and_then(|m| module_text(Some(m))),
        })
    }

    fn export_assignment(&self, assignment: &ast::ExportAssignment) -> Statement {
        let expression = assignment
            .expression()
            .map(|e| {
                e.expression_tokens()
                    .iter()
                    .map(|t| t.text().to_string())
                    .collect::<String>()
            })
            .unwrap_or_default();
        Statement::ExportAssignment(ExportAssignment {
            origin: Some(Origin::rebuilt(assignment.as_cst())),
            is_default: assignment.is_default(),
            expression,
        })
    }

    fn type_alias(&self, alias: &ast::TypeAliasDecl) -> Statement {
        let modifiers = alias.modifiers();
        Statement::TypeAlias(TypeAliasDeclaration {
            origin: Some(Origin::rebuilt(alias.as_cst())),
            modifiers: Modifiers {
                export: modifiers.export,
                default: modifiers.default,
                declare: false,
            },
            name: alias.name().map(|n| n.text()).unwrap_or_default(),
            type_params: self.type_params(alias.type_params()),
            ty: self.optional_type(alias.ty()),
        })
    }

    fn interface(&self, interface: &ast::InterfaceDecl) -> Statement {
        let modifiers = interface.modifiers();
        let heritage = interface
            .heritage()
            .iter()
            .flat_map(|h| h.types())
            .map(|r| self.ty(&ast::Type::Reference(r)))
            .collect();
        let members = interface
            .body()
            .iter()
            .flat_map(|b| b.members())
            .map(|m| self.member(&m))
            .collect();
        Statement::Interface(InterfaceDeclaration {
            origin: Some(Origin::rebuilt(interface.as_cst())),
            modifiers: Modifiers {
                export: modifiers.export,
                default: modifiers.default,
                declare: false,
            },
            name: interface.name().map(|n| n.text()).unwrap_or_default(),
            type_params: self.type_params(interface.type_params()),
            heritage,
            members,
        })
    }

    fn function(&mut self, function: &ast::FunctionDecl) -> Statement {
        let modifiers = function.modifiers();
        let name = function.name();
        let mut signature = self.signature(function.type_params(), function.params(), function.return_type());
        if signature.return_type.is_none() {
            let inferred = self.inferred_return_type(function, name.as_ref());
            signature.return_type = Some(Box::new(inferred));
        }
        Statement::Function(FunctionDeclaration {
            origin: Some(Origin::rebuilt(function.as_cst())),
            modifiers: Modifiers {
                export: modifiers.export,
                default: modifiers.default,
                declare: !modifiers.default,
            },
            name: name.map(|n| n.text()).unwrap_or_default(),
            signature,
        })
    }

    /// `void` (or `Promise<void>`) for bodies that return nothing; anything
    /// else needs an annotation.
    fn inferred_return_type(&mut self, function: &ast::FunctionDecl, name: Option<&ast::Name>) -> TypeNode {
        let body = function
            .as_cst()
            .children()
            .find(|n| n.kind() == SyntaxKind::FunctionBody);
        let Some(body) = body else {
            return factory::keyword(Keyword::Any);
        };
        if returns_value(&body) {
            let range = name
                .map(|n| n.as_cst().text_range())
                .unwrap_or_else(|| function.as_cst().text_range());
            self.diagnostics
                .report(DiagnosticKind::ReturnTypeRequired, Span::new(self.file, range))
                .emit();
            return factory::keyword(Keyword::Any);
        }
        let void = factory::keyword(Keyword::Void);
        if function.is_async() {
            factory::reference(vec!["Promise".to_string()], vec![void])
        } else {
            void
        }
    }

    fn variable(&mut self, statement: &ast::VariableStatement) -> Statement {
        let modifiers = statement.modifiers();
        let keyword = statement.keyword();
        let declarations = statement
            .declarations()
            .map(|decl| self.variable_declaration(&decl, keyword))
            .collect();
        Statement::Variable(VariableStatement {
            origin: Some(Origin::rebuilt(statement.as_cst())),
            modifiers: Modifiers {
                export: modifiers.export,
                default: false,
                declare: true,
            },
            keyword,
            declarations,
        })
    }

    fn variable_declaration(&mut self, decl: &ast::VariableDecl, keyword: DeclarationKeyword) -> VariableDeclaration {
        let name = decl.name().map(|n| n.source_text()).unwrap_or_default();
        if let Some(ty) = decl.type_annotation().and_then(|a| a.ty()) {
            return VariableDeclaration {
                name,
                ty: Some(self.ty(&ty)),
                initializer: None,
            };
        }
        let initializer = decl.initializer();
        if keyword == DeclarationKeyword::Const
            && let Some(text) = initializer.as_ref().and_then(const_initializer_text)
        {
            return VariableDeclaration {
                name,
                ty: None,
                initializer: Some(text),
            };
        }
        let ty = match self.checker.variable_type(self.file, decl, keyword) {
            Some(ty) => self.render(ty),
            None if initializer.is_some() => {
                let range = decl
                    .name()
                    .map(|n| n.as_cst().text_range())
                    .unwrap_or_else(|| decl.as_cst().text_range());
                self.diagnostics
                    .report(DiagnosticKind::VariableTypeRequired, Span::new(self.file, range))
                    .emit();
                factory::keyword(Keyword::Any)
            }
            None => factory::keyword(Keyword::Any),
        };
        VariableDeclaration {
            name,
            ty: Some(ty),
            initializer: None,
        }
    }

    /// Checker type as a node; unrenderable types become `any`.
    fn render(&self, ty: TypeId) -> TypeNode {
        self.checker
            .type_to_node(ty, NodeBuilderFlags::NONE, self.file)
            .unwrap_or_else(|| factory::keyword(Keyword::Any))
    }

    fn type_params(&self, list: Option<TypeParamList>) -> Vec<TypeParameter> {
        list.iter()
            .flat_map(|l| l.params())
            .map(|p| TypeParameter {
                name: p.name().map(|n| n.text()).unwrap_or_default(),
                is_const: p.is_const(),
                constraint: p.constraint().map(|c| self.ty(&c)),
                default: p.default().map(|d| self.ty(&d)),
            })
            .collect()
    }

    fn signature(
        &self,
        type_params: Option<TypeParamList>,
        params: Option<ParamList>,
        return_type: Option<ReturnType>,
    ) -> Signature {
        let params = params
            .iter()
            .flat_map(|l| l.params())
            .map(|p| self.parameter(&p))
            .collect();
        Signature {
            type_params: self.type_params(type_params),
            params,
            return_type: return_type.map(|r| Box::new(self.return_type(&r))),
        }
    }

    fn parameter(&self, param: &ast::Param) -> Parameter {
        let name = param.name().map(|n| n.source_text()).unwrap_or_default();
        let initializer = param.initializer();
        let ty = match param.type_annotation().and_then(|a| a.ty()) {
            Some(ty) => self.ty(&ty),
            None => initializer
                .as_ref()
                .and_then(|i| self.checker.literal_initializer_type(i))
                .map(|t| self.render(self.checker.widen_literal(t)))
                .unwrap_or_else(|| factory::keyword(Keyword::Any)),
        };
        Parameter {
            rest: param.is_rest(),
            name,
            optional: param.is_optional() || (initializer.is_some() && !param.is_rest()),
            ty: Some(ty),
        }
    }

    fn return_type(&self, return_type: &ReturnType) -> TypeNode {
        let origin = Some(Origin::copied(self.file, return_type.as_cst()));
        if let Some(predicate) = return_type.predicate() {
            return TypeNode {
                kind: TypeNodeKind::Predicate {
                    asserts: predicate.is_asserts(),
                    parameter: predicate.parameter_name().map(|n| n.text()).unwrap_or_default(),
                    ty: predicate.ty().map(|t| Box::new(self.ty(&t))),
                },
                origin: Some(Origin::copied(self.file, predicate.as_cst())),
            };
        }
        match return_type.ty() {
            Some(ty) => self.ty(&ty),
            None => TypeNode {
                kind: TypeNodeKind::Keyword(Keyword::Any),
                origin,
            },
        }
    }

    fn optional_type(&self, node: Option<ast::Type>) -> TypeNode {
        match node {
            Some(node) => self.ty(&node),
            None => factory::keyword(Keyword::Any),
        }
    }

    /// Copies a source type node.
    fn ty(&self, node: &ast::Type) -> TypeNode {
        let kind = match node {
            ast::Type::Keyword(keyword) => {
                TypeNodeKind::Keyword(Keyword::from_text(&keyword.keyword()).unwrap_or(Keyword::Any))
            }
            ast::Type::Literal(literal) => {
                let text = literal.literal().map(|t| t.text().to_string()).unwrap_or_default();
                TypeNodeKind::Literal(if literal.is_negative() { format!("-{text}") } else { text })
            }
            ast::Type::TemplateLiteral(template) => TypeNodeKind::TemplateLiteral {
                head: template.head().map(|h| template_piece(&h)).unwrap_or_default(),
                spans: template
                    .spans()
                    .map(|span| TemplateSpan {
                        ty: self.optional_type(span.ty()),
                        text: span.literal().map(|l| template_piece(&l)).unwrap_or_default(),
                    })
                    .collect(),
            },
            ast::Type::Reference(reference) => TypeNodeKind::Reference {
                name: entity_segments(reference.name()),
                args: self.type_args(reference.type_args()),
            },
            ast::Type::Union(union) => TypeNodeKind::Union(union.types().map(|t| self.ty(&t)).collect()),
            ast::Type::Intersection(intersection) => {
                TypeNodeKind::Intersection(intersection.types().map(|t| self.ty(&t)).collect())
            }
            ast::Type::Array(array) => TypeNodeKind::Array(Box::new(self.optional_type(array.element()))),
            ast::Type::Tuple(tuple) => TypeNodeKind::Tuple(
                tuple
                    .elements()
                    .map(|element| self.tuple_member(element))
                    .collect(),
            ),
            ast::Type::Paren(paren) => TypeNodeKind::Paren(Box::new(self.optional_type(paren.inner()))),
            ast::Type::Function(function) => TypeNodeKind::Function(self.signature(
                function.type_params(),
                function.params(),
                function.return_type(),
            )),
            ast::Type::Constructor(constructor) => TypeNodeKind::Constructor {
                is_abstract: constructor.is_abstract(),
                signature: self.signature(
                    constructor.type_params(),
                    constructor.params(),
                    constructor.return_type(),
                ),
            },
            ast::Type::Object(object) => TypeNodeKind::Object(object.members().map(|m| self.member(&m)).collect()),
            ast::Type::Mapped(mapped) => {
                let param = mapped.type_param();
                TypeNodeKind::Mapped(Box::new(MappedTypeNode {
                    readonly: mapped.readonly_modifier().map(mapped_modifier),
                    parameter: param
                        .as_ref()
                        .and_then(|p| p.name())
                        .map(|n| n.text())
                        .unwrap_or_default(),
                    constraint: self.optional_type(param.as_ref().and_then(|p| p.constraint())),
                    name_type: param.as_ref().and_then(|p| p.name_type()).map(|t| self.ty(&t)),
                    optional: mapped.optional_modifier().map(mapped_modifier),
                    ty: mapped.type_annotation().and_then(|a| a.ty()).map(|t| self.ty(&t)),
                }))
            }
            ast::Type::IndexedAccess(access) => TypeNodeKind::IndexedAccess {
                object: Box::new(self.optional_type(access.object())),
                index: Box::new(self.optional_type(access.index())),
            },
            ast::Type::Operator(operator) => {
                let kind = match operator.operator().as_str() {
                    "keyof" => TypeOperatorKind::Keyof,
                    "unique" => TypeOperatorKind::Unique,
                    _ => TypeOperatorKind::Readonly,
                };
                TypeNodeKind::Operator {
                    operator: kind,
                    ty: Box::new(self.optional_type(operator.ty())),
                }
            }
            ast::Type::Query(query) => TypeNodeKind::Query {
                name: entity_segments(query.name()),
                args: self.type_args(query.type_args()),
            },
            ast::Type::Conditional(conditional) => TypeNodeKind::Conditional {
                check: Box::new(self.optional_type(conditional.check_type())),
                extends: Box::new(self.optional_type(conditional.extends_type())),
                true_type: Box::new(self.optional_type(conditional.true_type())),
                false_type: Box::new(self.optional_type(conditional.false_type())),
            },
            ast::Type::Infer(infer) => {
                let param = infer.type_param();
                TypeNodeKind::Infer {
                    name: param
                        .as_ref()
                        .and_then(|p| p.name())
                        .map(|n| n.text())
                        .unwrap_or_default(),
                    constraint: param
                        .and_then(|p| p.constraint())
                        .map(|c| Box::new(self.ty(&c))),
                }
            }
            ast::Type::This(_) => TypeNodeKind::This,
        };
        TypeNode {
            kind,
            origin: Some(Origin::copied(self.file, node.as_cst())),
        }
    }

    fn type_args(&self, list: Option<ast::TypeArgList>) -> Vec<TypeNode> {
        list.iter().flat_map(|l| l.types()).map(|t| self.ty(&t)).collect()
    }

    fn tuple_member(&self, element: ast::TupleElement) -> TupleMember {
        match element {
            ast::TupleElement::Plain(ty) => TupleMember {
                kind: TupleMemberKind::Required,
                name: None,
                ty: self.ty(&ty),
            },
            ast::TupleElement::Optional(optional) => TupleMember {
                kind: TupleMemberKind::Optional,
                name: None,
                ty: self.optional_type(optional.ty()),
            },
            ast::TupleElement::Rest(rest) => TupleMember {
                kind: TupleMemberKind::Rest,
                name: None,
                ty: self.optional_type(rest.ty()),
            },
            ast::TupleElement::Named(named) => TupleMember {
                kind: if named.is_rest() {
                    TupleMemberKind::Rest
                } else if named.is_optional() {
                    TupleMemberKind::Optional
                } else {
                    TupleMemberKind::Required
                },
                name: named.name().map(|n| n.text()),
                ty: self.optional_type(named.ty()),
            },
        }
    }

    fn member(&self, member: &ast::TypeMember) -> TypeMember {
        let origin = Some(Origin::copied(self.file, member.as_cst()));
        match member {
            ast::TypeMember::Property(property) => TypeMember::Property(PropertySignature {
                origin,
                readonly: property.is_readonly(),
                name: property.name().map(|n| n.source_text()).unwrap_or_default(),
                optional: property.is_optional(),
                ty: property.type_annotation().and_then(|a| a.ty()).map(|t| self.ty(&t)),
            }),
            ast::TypeMember::Method(method) => TypeMember::Method(MethodSignature {
                origin,
                name: method.name().map(|n| n.source_text()).unwrap_or_default(),
                optional: method.is_optional(),
                signature: self.signature(method.type_params(), method.params(), method.return_type()),
            }),
            ast::TypeMember::Call(call) => TypeMember::Call(CallSignature {
                origin,
                signature: self.signature(call.type_params(), call.params(), call.return_type()),
            }),
            ast::TypeMember::Construct(construct) => TypeMember::Construct(CallSignature {
                origin,
                signature: self.signature(construct.type_params(), construct.params(), construct.return_type()),
            }),
            ast::TypeMember::Index(index) => {
                let param = index.param();
                TypeMember::Index(IndexSignature {
                    origin,
                    readonly: index.is_readonly(),
                    parameter: param
                        .as_ref()
                        .and_then(|p| p.name())
                        .map(|n| n.text())
                        .unwrap_or_default(),
                    key: self.optional_type(
                        param.and_then(|p| p.type_annotation()).and_then(|a| a.ty()),
                    ),
                    ty: self.optional_type(index.type_annotation().and_then(|a| a.ty())),
                })
            }
        }
    }
}

fn is_declaration(statement: &Statement) -> bool {
    matches!(
        statement,
        Statement::TypeAlias(_) | Statement::Interface(_) | Statement::Function(_) | Statement::Variable(_)
    )
}

/// Names a declaration statement introduces.
fn declared_names(statement: &ast::Statement) -> Vec<String> {
    match statement {
        ast::Statement::TypeAlias(s) => s.name().map(|n| n.text()).into_iter().collect(),
        ast::Statement::Interface(s) => s.name().map(|n| n.text()).into_iter().collect(),
        ast::Statement::Function(s) => s.name().map(|n| n.text()).into_iter().collect(),
        ast::Statement::Variable(s) => s.declarations().filter_map(|d| d.name()).map(|n| n.text()).collect(),
        _ => Vec::new(),
    }
}

fn is_exported(statement: &ast::Statement) -> bool {
    match statement {
        ast::Statement::TypeAlias(s) => s.modifiers().export,
        ast::Statement::Interface(s) => s.modifiers().export,
        ast::Statement::Function(s) => s.modifiers().export,
        ast::Statement::Variable(s) => s.modifiers().export,
        _ => false,
    }
}

fn is_kept(statement: &ast::Statement, visible: &HashSet<String>) -> bool {
    match statement {
        ast::Statement::Import(_) | ast::Statement::Export(_) | ast::Statement::ExportAssignment(_) => true,
        _ => is_exported(statement) || declared_names(statement).iter().any(|n| visible.contains(n)),
    }
}

/// Local names reachable from the module's exports.
fn visible_names(statements: &[ast::Statement]) -> HashSet<String> {
    let mut by_name: HashMap<String, Vec<&ast::Statement>> = HashMap::new();
    for statement in statements {
        for name in declared_names(statement) {
            by_name.entry(name).or_default().push(statement);
        }
    }

    let mut pending: Vec<String> = Vec::new();
    let mut roots = HashSet::new();
    for statement in statements {
        match statement {
            ast::Statement::Export(export) if export.module_specifier().is_none() => {
                for spec in export.named_exports().iter().flat_map(|n| n.specifiers()) {
                    if let Some(local) = spec.property_name() {
                        pending.push(local.text());
                    }
                }
            }
            ast::Statement::ExportAssignment(_) => collect_referenced_names(statement.as_cst(), &mut roots),
            _ if is_exported(statement) => collect_referenced_names(statement.as_cst(), &mut roots),
            _ => {}
        }
    }
    pending.extend(roots);

    let mut visible = HashSet::new();
    while let Some(name) = pending.pop() {
        if !visible.insert(name.clone()) {
            continue;
        }
        for statement in by_name.get(&name).into_iter().flatten() {
            let mut referenced = HashSet::new();
            collect_referenced_names(statement.as_cst(), &mut referenced);
            pending.extend(referenced.into_iter().filter(|n| !visible.contains(n)));
        }
    }
    visible
}

/// First segments of type references, `typeof` queries, computed member keys
/// and exported identifiers under `node`, skipping function bodies and
/// initializers.
fn collect_referenced_names(node: &SyntaxNode, out: &mut HashSet<String>) {
    let mut walk = node.preorder();
    while let Some(event) = walk.next() {
        let WalkEvent::Enter(node) = event else {
            continue;
        };
        match node.kind() {
            SyntaxKind::FunctionBody => walk.skip_subtree(),
            SyntaxKind::Initializer => {
                let in_export = node
                    .parent()
                    .is_some_and(|p| p.kind() == SyntaxKind::ExportAssignment);
                if in_export && let Some(initializer) = ast::Initializer::cast(node.clone()) {
                    let tokens = initializer.expression_tokens();
                    if let [token] = tokens.as_slice()
                        && token.kind() == SyntaxKind::Ident
                    {
                        out.insert(token.text().to_string());
                    }
                }
                walk.skip_subtree();
            }
            SyntaxKind::EntityName => {
                if let Some(first) = EntityName::cast(node).and_then(|n| n.segments().into_iter().next()) {
                    out.insert(first.text().to_string());
                }
            }
            SyntaxKind::ExportSpecifier => {
                if let Some(local) = ast::ExportSpecifier::cast(node).and_then(|s| s.property_name()) {
                    out.insert(local.text());
                }
            }
            SyntaxKind::Name if is_member_name(&node) => {
                // `[key]` refers to the value `key`.
                let mut tokens = node
                    .descendants_with_tokens()
                    .filter_map(|e| e.into_token())
                    .filter(|t| !t.kind().is_trivia());
                if tokens.next().is_some_and(|t| t.kind() == SyntaxKind::BracketOpen)
                    && let Some(key) = tokens.next().filter(|t| t.kind() == SyntaxKind::Ident)
                {
                    out.insert(key.text().to_string());
                }
            }
            _ => {}
        }
    }
}

fn is_member_name(name: &SyntaxNode) -> bool {
    name.parent()
        .is_some_and(|p| matches!(p.kind(), SyntaxKind::PropertySig | SyntaxKind::MethodSig))
}

/// Function names declared more than once with at least one bodiless signature.
fn overloaded_functions(statements: &[ast::Statement]) -> HashSet<String> {
    let mut signatures: HashMap<String, (usize, bool)> = HashMap::new();
    for statement in statements {
        if let ast::Statement::Function(function) = statement
            && let Some(name) = function.name()
        {
            let entry = signatures.entry(name.text()).or_default();
            entry.0 += 1;
            entry.1 |= !function.has_body();
        }
    }
    signatures
        .into_iter()
        .filter(|(_, (count, bodiless))| *count > 1 && *bodiless)
        .map(|(name, _)| name)
        .collect()
}

fn name_in(name: Option<ast::Name>, set: &HashSet<String>) -> bool {
    name.is_some_and(|n| set.contains(&n.text()))
}

/// Whether a body has a `return` followed by an expression.
fn returns_value(body: &SyntaxNode) -> bool {
    let tokens: Vec<SyntaxToken> = body
        .descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !t.kind().is_trivia())
        .collect();
    tokens.windows(2).any(|pair| {
        pair[0].kind() == SyntaxKind::KwReturn
            && !matches!(pair[1].kind(), SyntaxKind::Semicolon | SyntaxKind::BraceClose)
    })
}

fn specifier(type_only: bool, property: Option<ast::Name>, name: Option<ast::Name>) -> Option<Specifier> {
    let name = name?.text();
    let property_name = property.map(|p| p.text()).filter(|p| *p != name);
    Some(Specifier {
        type_only,
        property_name,
        name,
    })
}

/// Module specifier as written, quotes included.
fn module_text(specifier: Option<ast::ModuleSpecifier>) -> Option<String> {
    let specifier = specifier?;
    let token = specifier
        .as_cst()
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == SyntaxKind::StringLiteral);
    Some(match token {
        Some(token) => token.text().to_string(),
        None => quote_string(&specifier.value()),
    })
}

/// Literal initializer text kept on `const` declarations: strings, numbers,
/// bigints and booleans, with `as const` dropped.
fn const_initializer_text(initializer: &ast::Initializer) -> Option<String> {
    let tokens = initializer.expression_tokens();
    let mut tokens: &[SyntaxToken] = &tokens;
    if let [rest @ .., as_kw, const_kw] = tokens
        && as_kw.text() == "as"
        && const_kw.kind() == SyntaxKind::KwConst
    {
        tokens = rest;
    }
    match tokens {
        [token] => match token.kind() {
            SyntaxKind::StringLiteral => Some(quote_string(&ast::string_literal_value(token.text()))),
            SyntaxKind::NumberLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::KwTrue
            | SyntaxKind::KwFalse => Some(token.text().to_string()),
            SyntaxKind::NoSubstitutionTemplate => Some(quote_string(&crate::checker::template_text(token.text()))),
            _ => None,
        },
        [minus, token]
            if minus.kind() == SyntaxKind::Minus
                && matches!(token.kind(), SyntaxKind::NumberLiteral | SyntaxKind::BigIntLiteral) =>
        {
            Some(format!("-{}", token.text()))
        }
        _ => None,
    }
}

fn entity_segments(name: Option<EntityName>) -> Vec<String> {
    name.map(|n| n.segments().iter().map(|s| s.text().to_string()).collect())
        .unwrap_or_default()
}

fn template_piece(token: &SyntaxToken) -> String {
    crate::checker::template_raw(token.text()).to_string()
}

fn mapped_modifier(modifier: ast::MappedModifier) -> MappedModifier {
    match modifier {
        ast::MappedModifier::Add => MappedModifier::Plain,
        ast::MappedModifier::Remove => MappedModifier::Remove,
    }
}
