//! The marker fold over one declaration file.

use tracing::{trace, warn};

use super::bridge::TypeResolutionBridge;
use super::comments::leading_comments;
use super::markers::{Marker, MarkerSet};
use crate::checker::{Checker, NodeBuilderFlags};
use crate::dts::factory;
use crate::dts::fold::{self, Fold};
use crate::dts::tree::{Keyword, TypeAliasDeclaration, TypeNode, TypeNodeKind};
use crate::source_map::SourceId;

/// Flags for baked aliases: the whole type, written out, referable from anywhere.
const BAKE_FLAGS: NodeBuilderFlags = NodeBuilderFlags::NO_TRUNCATION
    .union(NodeBuilderFlags::IN_TYPE_ALIAS)
    .union(NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE)
    .union(NodeBuilderFlags::USE_ALIAS_DEFINED_OUTSIDE_CURRENT_SCOPE);

pub(crate) struct Rewriter<'a, 'c, 'p> {
    checker: &'c Checker<'p>,
    bridge: TypeResolutionBridge<'c, 'p>,
    markers: &'a MarkerSet,
    /// File being transformed; owner of rebuilt nodes.
    file: SourceId,
}

impl<'a, 'c, 'p> Rewriter<'a, 'c, 'p> {
    pub(crate) fn new(checker: &'c Checker<'p>, markers: &'a MarkerSet, file: SourceId) -> Self {
        Self {
            checker,
            bridge: TypeResolutionBridge::new(checker),
            markers,
            file,
        }
    }

    fn bake(&self, decl: TypeAliasDeclaration) -> TypeAliasDeclaration {
        let Some(ty) = self.bridge.type_of(&decl.ty) else {
            warn!(alias = %decl.name, "bake: alias body has no source type");
            return decl;
        };
        match self.checker.type_to_node(ty, BAKE_FLAGS, self.file) {
            Some(node) => {
                trace!(alias = %decl.name, "baked");
                factory::update_type_alias(&decl, node)
            }
            None => {
                warn!(alias = %decl.name, "bake: type cannot be written out, alias left as is");
                decl
            }
        }
    }

    /// Replacement for a reference through a marked alias, if any.
    fn rewrite_reference(&self, node: &TypeNode) -> Option<TypeNode> {
        let TypeNodeKind::Reference { name, args } = &node.kind else {
            return None;
        };
        let declarations = self.bridge.alias_declarations(node);
        if declarations.is_empty() {
            return None;
        }
        let sources = self.checker.program().sources();
        let comments: Vec<String> = declarations
            .iter()
            .flat_map(|decl| decl.comments(sources))
            .collect();

        if self.markers.is_marked(&comments, Marker::Newtype) {
            trace!(reference = %name.join("."), "newtype");
            return Some(factory::keyword(Keyword::Unknown));
        }
        if self.markers.is_marked(&comments, Marker::Unwrap) {
            trace!(reference = %name.join("."), "unwrap");
            return Some(args.first().cloned().unwrap_or_else(|| node.clone()));
        }
        None
    }
}

impl Fold for Rewriter<'_, '_, '_> {
    fn fold_type_alias(&mut self, decl: TypeAliasDeclaration) -> TypeAliasDeclaration {
        let sources = self.checker.program().sources();
        let comments = leading_comments(decl.origin.as_ref(), self.file, sources);
        if self.markers.is_marked(&comments, Marker::Bake) {
            return self.bake(decl);
        }
        fold::fold_type_alias(self, decl)
    }

    fn fold_type(&mut self, ty: TypeNode) -> TypeNode {
        match self.rewrite_reference(&ty) {
            Some(replacement) => replacement,
            None => fold::fold_type(self, ty),
        }
    }
}
