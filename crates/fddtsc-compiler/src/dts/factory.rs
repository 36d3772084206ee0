//! Constructors for synthesized declaration nodes.
//!
//! Composite constructors parenthesize their operands the way TypeScript's
//! printer expects, so a node built here always prints back to the same tree.

use fddtsc_core::utils::{js_number_to_string, quote_string};

use super::tree::{
    Keyword, MappedTypeNode, Signature, TemplateSpan, TupleMember, TypeAliasDeclaration,
    TypeMember, TypeNode, TypeNodeKind, TypeOperatorKind,
};

pub fn keyword(keyword: Keyword) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Keyword(keyword))
}

pub fn string_literal(value: &str) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Literal(quote_string(value)))
}

pub fn number_literal(value: f64) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Literal(js_number_to_string(value)))
}

/// `digits` without the `n` suffix, sign included.
pub fn bigint_literal(digits: &str) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Literal(format!("{digits}n")))
}

pub fn boolean_literal(value: bool) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Literal(value.to_string()))
}

pub fn template_literal(head: String, spans: Vec<TemplateSpan>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::TemplateLiteral { head, spans })
}

pub fn reference(name: Vec<String>, args: Vec<TypeNode>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Reference {
        name,
        args: type_arguments(args),
    })
}

pub fn import_type(module: String, qualifier: Vec<String>, args: Vec<TypeNode>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Import {
        module,
        qualifier,
        args: type_arguments(args),
    })
}

pub fn union(types: Vec<TypeNode>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Union(
        types.into_iter().map(parenthesize_union_member).collect(),
    ))
}

pub fn intersection(types: Vec<TypeNode>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Intersection(
        types.into_iter().map(parenthesize_intersection_member).collect(),
    ))
}

pub fn array(element: TypeNode) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Array(Box::new(parenthesize_postfix_operand(element))))
}

pub fn tuple(members: Vec<TupleMember>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Tuple(members))
}

pub fn function(signature: Signature) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Function(signature))
}

pub fn constructor(is_abstract: bool, signature: Signature) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Constructor {
        is_abstract,
        signature,
    })
}

pub fn object(members: Vec<TypeMember>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Object(members))
}

pub fn mapped(node: MappedTypeNode) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Mapped(Box::new(node)))
}

pub fn indexed_access(object: TypeNode, index: TypeNode) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::IndexedAccess {
        object: Box::new(parenthesize_postfix_operand(object)),
        index: Box::new(index),
    })
}

pub fn type_operator(operator: TypeOperatorKind, ty: TypeNode) -> TypeNode {
    let ty = match operator {
        TypeOperatorKind::Readonly => parenthesize_readonly_operand(ty),
        TypeOperatorKind::Keyof | TypeOperatorKind::Unique => parenthesize_operator_operand(ty),
    };
    TypeNode::synthetic(TypeNodeKind::Operator {
        operator,
        ty: Box::new(ty),
    })
}

pub fn type_query(name: Vec<String>, args: Vec<TypeNode>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Query { name, args })
}

pub fn conditional(check: TypeNode, extends: TypeNode, true_type: TypeNode, false_type: TypeNode) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Conditional {
        check: Box::new(parenthesize_check_type(check)),
        extends: Box::new(parenthesize_extends_type(extends)),
        true_type: Box::new(true_type),
        false_type: Box::new(false_type),
    })
}

pub fn infer(name: String, constraint: Option<TypeNode>) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Infer {
        name,
        constraint: constraint.map(Box::new),
    })
}

pub fn paren(inner: TypeNode) -> TypeNode {
    TypeNode::synthetic(TypeNodeKind::Paren(Box::new(inner)))
}

/// Same declaration with a new right-hand side.
///
/// Modifiers, name, type parameters and origin are kept, so comments above
/// the alias survive the rewrite.
pub fn update_type_alias(decl: &TypeAliasDeclaration, ty: TypeNode) -> TypeAliasDeclaration {
    TypeAliasDeclaration {
        ty,
        ..decl.clone()
    }
}

fn type_arguments(args: Vec<TypeNode>) -> Vec<TypeNode> {
    let mut args = args;
    if let Some(first) = args.first_mut() {
        let leading_generic_function = match &first.kind {
            TypeNodeKind::Function(sig) | TypeNodeKind::Constructor { signature: sig, .. } => {
                !sig.type_params.is_empty()
            }
            _ => false,
        };
        if leading_generic_function {
            let node = std::mem::replace(first, keyword(Keyword::Never));
            *first = paren(node);
        }
    }
    args
}

pub fn parenthesize_check_type(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Function(_) | TypeNodeKind::Constructor { .. } | TypeNodeKind::Conditional { .. } => {
            paren(ty)
        }
        _ => ty,
    }
}

pub fn parenthesize_extends_type(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Conditional { .. } => paren(ty),
        _ => ty,
    }
}

pub fn parenthesize_union_member(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Union(_) | TypeNodeKind::Intersection(_) => paren(ty),
        _ => parenthesize_check_type(ty),
    }
}

pub fn parenthesize_intersection_member(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Union(_) | TypeNodeKind::Intersection(_) => paren(ty),
        _ => parenthesize_check_type(ty),
    }
}

pub fn parenthesize_operator_operand(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Intersection(_) => paren(ty),
        _ => parenthesize_intersection_member(ty),
    }
}

fn parenthesize_readonly_operand(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Operator { .. } => paren(ty),
        _ => parenthesize_operator_operand(ty),
    }
}

/// Operand of `T[]` and `T[K]`.
pub fn parenthesize_postfix_operand(ty: TypeNode) -> TypeNode {
    match ty.kind {
        TypeNodeKind::Infer { .. } | TypeNodeKind::Operator { .. } | TypeNodeKind::Query { .. } => {
            paren(ty)
        }
        _ => parenthesize_operator_operand(ty),
    }
}
