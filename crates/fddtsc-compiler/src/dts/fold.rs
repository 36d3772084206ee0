//! Owned-tree folding.
//!
//! Each `Fold` method defaults to the free function of the same name, which
//! rebuilds the node from folded children. Implementors override the methods
//! for the nodes they rewrite and call the free function to keep descending.
//! A child that comes back different is re-parenthesized for its position.

use super::factory;
use super::tree::{
    DtsBundle, DtsFile, FunctionDeclaration, InterfaceDeclaration, MappedTypeNode, Parameter,
    Signature, Statement, TemplateSpan, TupleMember, TypeAliasDeclaration, TypeMember, TypeNode,
    TypeNodeKind, TypeOperatorKind, TypeParameter, VariableStatement,
};

pub trait Fold {
    fn fold_bundle(&mut self, bundle: DtsBundle) -> DtsBundle {
        fold_bundle(self, bundle)
    }

    fn fold_file(&mut self, file: DtsFile) -> DtsFile {
        fold_file(self, file)
    }

    fn fold_statement(&mut self, statement: Statement) -> Statement {
        fold_statement(self, statement)
    }

    fn fold_type_alias(&mut self, decl: TypeAliasDeclaration) -> TypeAliasDeclaration {
        fold_type_alias(self, decl)
    }

    fn fold_type(&mut self, ty: TypeNode) -> TypeNode {
        fold_type(self, ty)
    }

    fn fold_member(&mut self, member: TypeMember) -> TypeMember {
        fold_member(self, member)
    }
}

pub fn fold_bundle<F: Fold + ?Sized>(f: &mut F, bundle: DtsBundle) -> DtsBundle {
    DtsBundle {
        files: bundle.files.into_iter().map(|file| f.fold_file(file)).collect(),
    }
}

pub fn fold_file<F: Fold + ?Sized>(f: &mut F, file: DtsFile) -> DtsFile {
    DtsFile {
        source: file.source,
        statements: file
            .statements
            .into_iter()
            .map(|s| f.fold_statement(s))
            .collect(),
    }
}

pub fn fold_statement<F: Fold + ?Sized>(f: &mut F, statement: Statement) -> Statement {
    match statement {
        Statement::TypeAlias(decl) => Statement::TypeAlias(f.fold_type_alias(decl)),
        Statement::Interface(decl) => Statement::Interface(InterfaceDeclaration {
            type_params: fold_type_params(f, decl.type_params),
            heritage: decl.heritage.into_iter().map(|t| f.fold_type(t)).collect(),
            members: decl.members.into_iter().map(|m| f.fold_member(m)).collect(),
            ..decl
        }),
        Statement::Function(decl) => Statement::Function(FunctionDeclaration {
            signature: fold_signature(f, decl.signature),
            ..decl
        }),
        Statement::Variable(stmt) => Statement::Variable(VariableStatement {
            declarations: stmt
                .declarations
                .into_iter()
                .map(|mut d| {
                    d.ty = d.ty.map(|t| f.fold_type(t));
                    d
                })
                .collect(),
            ..stmt
        }),
        other @ (Statement::Import(_) | Statement::Export(_) | Statement::ExportAssignment(_)) => other,
    }
}

pub fn fold_type_alias<F: Fold + ?Sized>(f: &mut F, decl: TypeAliasDeclaration) -> TypeAliasDeclaration {
    TypeAliasDeclaration {
        type_params: fold_type_params(f, decl.type_params),
        ty: f.fold_type(decl.ty),
        ..decl
    }
}

pub fn fold_member<F: Fold + ?Sized>(f: &mut F, member: TypeMember) -> TypeMember {
    match member {
        TypeMember::Property(mut m) => {
            m.ty = m.ty.map(|t| f.fold_type(t));
            TypeMember::Property(m)
        }
        TypeMember::Method(mut m) => {
            m.signature = fold_signature(f, m.signature);
            TypeMember::Method(m)
        }
        TypeMember::Call(mut m) => {
            m.signature = fold_signature(f, m.signature);
            TypeMember::Call(m)
        }
        TypeMember::Construct(mut m) => {
            m.signature = fold_signature(f, m.signature);
            TypeMember::Construct(m)
        }
        TypeMember::Index(mut m) => {
            m.key = f.fold_type(m.key);
            m.ty = f.fold_type(m.ty);
            TypeMember::Index(m)
        }
    }
}

pub fn fold_signature<F: Fold + ?Sized>(f: &mut F, signature: Signature) -> Signature {
    Signature {
        type_params: fold_type_params(f, signature.type_params),
        params: signature
            .params
            .into_iter()
            .map(|p| Parameter {
                ty: p.ty.map(|t| f.fold_type(t)),
                ..p
            })
            .collect(),
        return_type: signature.return_type.map(|t| Box::new(f.fold_type(*t))),
    }
}

fn fold_type_params<F: Fold + ?Sized>(f: &mut F, params: Vec<TypeParameter>) -> Vec<TypeParameter> {
    params
        .into_iter()
        .map(|p| TypeParameter {
            constraint: p.constraint.map(|t| f.fold_type(t)),
            default: p.default.map(|t| f.fold_type(t)),
            ..p
        })
        .collect()
}

/// Folds `node`; a changed result goes through `rule` for its new position.
fn child<F: Fold + ?Sized>(f: &mut F, node: TypeNode, rule: fn(TypeNode) -> TypeNode) -> TypeNode {
    let original = node.clone();
    let folded = f.fold_type(node);
    if folded == original { folded } else { rule(folded) }
}

fn boxed<F: Fold + ?Sized>(f: &mut F, node: Box<TypeNode>, rule: fn(TypeNode) -> TypeNode) -> Box<TypeNode> {
    Box::new(child(f, *node, rule))
}

fn same(node: TypeNode) -> TypeNode {
    node
}

pub fn fold_type<F: Fold + ?Sized>(f: &mut F, ty: TypeNode) -> TypeNode {
    let origin = ty.origin;
    let kind = match ty.kind {
        kind @ (TypeNodeKind::Keyword(_) | TypeNodeKind::Literal(_) | TypeNodeKind::This) => kind,
        TypeNodeKind::TemplateLiteral { head, spans } => TypeNodeKind::TemplateLiteral {
            head,
            spans: spans
                .into_iter()
                .map(|s| TemplateSpan {
                    ty: f.fold_type(s.ty),
                    text: s.text,
                })
                .collect(),
        },
        TypeNodeKind::Reference { name, args } => TypeNodeKind::Reference {
            name,
            args: args.into_iter().map(|a| f.fold_type(a)).collect(),
        },
        TypeNodeKind::Import { module, qualifier, args } => TypeNodeKind::Import {
            module,
            qualifier,
            args: args.into_iter().map(|a| f.fold_type(a)).collect(),
        },
        TypeNodeKind::Union(types) => TypeNodeKind::Union(
            types
                .into_iter()
                .map(|t| child(f, t, factory::parenthesize_union_member))
                .collect(),
        ),
        TypeNodeKind::Intersection(types) => TypeNodeKind::Intersection(
            types
                .into_iter()
                .map(|t| child(f, t, factory::parenthesize_intersection_member))
                .collect(),
        ),
        TypeNodeKind::Array(element) => {
            TypeNodeKind::Array(boxed(f, element, factory::parenthesize_postfix_operand))
        }
        TypeNodeKind::Tuple(members) => TypeNodeKind::Tuple(
            members
                .into_iter()
                .map(|m| TupleMember {
                    ty: f.fold_type(m.ty),
                    ..m
                })
                .collect(),
        ),
        TypeNodeKind::Paren(inner) => TypeNodeKind::Paren(boxed(f, inner, same)),
        TypeNodeKind::Function(signature) => TypeNodeKind::Function(fold_signature(f, signature)),
        TypeNodeKind::Constructor {
            is_abstract,
            signature,
        } => TypeNodeKind::Constructor {
            is_abstract,
            signature: fold_signature(f, signature),
        },
        TypeNodeKind::Object(members) => {
            TypeNodeKind::Object(members.into_iter().map(|m| f.fold_member(m)).collect())
        }
        TypeNodeKind::Mapped(mapped) => {
            let MappedTypeNode {
                readonly,
                parameter,
                constraint,
                name_type,
                optional,
                ty,
            } = *mapped;
            TypeNodeKind::Mapped(Box::new(MappedTypeNode {
                readonly,
                parameter,
                constraint: f.fold_type(constraint),
                name_type: name_type.map(|t| f.fold_type(t)),
                optional,
                ty: ty.map(|t| f.fold_type(t)),
            }))
        }
        TypeNodeKind::IndexedAccess { object, index } => TypeNodeKind::IndexedAccess {
            object: boxed(f, object, factory::parenthesize_postfix_operand),
            index: boxed(f, index, same),
        },
        TypeNodeKind::Operator { operator, ty } => {
            let rule: fn(TypeNode) -> TypeNode = match operator {
                TypeOperatorKind::Readonly => readonly_operand,
                TypeOperatorKind::Keyof | TypeOperatorKind::Unique => {
                    factory::parenthesize_operator_operand
                }
            };
            TypeNodeKind::Operator {
                operator,
                ty: boxed(f, ty, rule),
            }
        }
        TypeNodeKind::Query { name, args } => TypeNodeKind::Query {
            name,
            args: args.into_iter().map(|a| f.fold_type(a)).collect(),
        },
        TypeNodeKind::Conditional {
            check,
            extends,
            true_type,
            false_type,
        } => TypeNodeKind::Conditional {
            check: boxed(f, check, factory::parenthesize_check_type),
            extends: boxed(f, extends, factory::parenthesize_extends_type),
            true_type: boxed(f, true_type, same),
            false_type: boxed(f, false_type, same),
        },
        TypeNodeKind::Infer { name, constraint } => TypeNodeKind::Infer {
            name,
            constraint: constraint.map(|c| boxed(f, c, same)),
        },
        TypeNodeKind::Predicate {
            asserts,
            parameter,
            ty,
        } => TypeNodeKind::Predicate {
            asserts,
            parameter,
            ty: ty.map(|t| boxed(f, t, same)),
        },
    };
    TypeNode { kind, origin }
}

fn readonly_operand(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Operator { .. } => factory::paren(ty),
        _ => factory::parenthesize_operator_operand(ty),
    }
}
