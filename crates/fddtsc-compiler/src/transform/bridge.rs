//! From declaration-tree nodes back to the checker.
//!
//! Copied type nodes remember their source file and range; that is enough to
//! find the syntax node again and ask the checker for its type.

use rowan::NodeOrToken;

use crate::checker::{Checker, TypeId};
use crate::dts::{Origin, TypeNode, TypeNodeKind};
use crate::parser::ast::{self, TypeAliasDecl};
use crate::parser::SyntaxKind;
use crate::source_map::{SourceId, SourceMap};
use crate::transform::comments::leading_comments;

/// A type alias declaration in some program file.
#[derive(Debug, Clone)]
pub struct AliasDeclaration {
    pub file: SourceId,
    pub node: TypeAliasDecl,
}

impl AliasDeclaration {
    pub fn name(&self) -> String {
        self.node.name().map(|n| n.text()).unwrap_or_default()
    }

    pub fn comments(&self, sources: &SourceMap) -> Vec<String> {
        let origin = Origin::copied(self.file, self.node.as_cst());
        leading_comments(Some(&origin), self.file, sources)
    }
}

pub struct TypeResolutionBridge<'c, 'p> {
    checker: &'c Checker<'p>,
}

impl<'c, 'p> TypeResolutionBridge<'c, 'p> {
    pub fn new(checker: &'c Checker<'p>) -> Self {
        Self { checker }
    }

    /// Declarations of the alias a reference resolves through.
    ///
    /// Empty for synthesized nodes, references that resolve to nothing and
    /// types that carry no alias.
    pub fn alias_declarations(&self, node: &TypeNode) -> Vec<AliasDeclaration> {
        if !matches!(node.kind, TypeNodeKind::Reference { .. }) {
            return Vec::new();
        }
        let Some(ty) = self.type_of(node) else {
            return Vec::new();
        };
        let Some(alias) = self.checker.alias_of(ty) else {
            return Vec::new();
        };
        let symbol = self.checker.program().symbols().get(alias.symbol);
        symbol
            .declarations_of(SyntaxKind::TypeAliasDecl)
            .filter_map(|decl| {
                Some(AliasDeclaration {
                    file: decl.file,
                    node: TypeAliasDecl::cast(decl.node.clone())?,
                })
            })
            .collect()
    }

    /// Checker type of a node copied from a program file.
    pub fn type_of(&self, node: &TypeNode) -> Option<TypeId> {
        let origin = node.origin?;
        let file = origin.source?;
        let source = self.source_type(file, &origin)?;
        Some(self.checker.type_from_type_node(file, &source))
    }

    /// Innermost type node of `file` spanning exactly the origin range.
    fn source_type(&self, file: SourceId, origin: &Origin) -> Option<ast::Type> {
        let root = self.checker.program().file(file)?.syntax();
        if !root.text_range().contains_range(origin.range) {
            return None;
        }
        let start = match root.covering_element(origin.range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        };
        start
            .ancestors()
            .take_while(|n| n.text_range() == origin.range)
            .find_map(ast::Type::cast)
    }
}
