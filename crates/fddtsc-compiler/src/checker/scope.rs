//! Name resolution for type references and `typeof` queries.
//!
//! Single identifiers see, innermost first: type parameters of enclosing
//! declarations and signatures, mapped-type keys, `infer` declarations of an
//! enclosing conditional (in its `extends` clause and true branch), then the
//! file's locals, then globals. Qualified names walk namespace imports and
//! `export * as` re-exports.

use rowan::TextRange;

use super::Checker;
use crate::diagnostics::{DiagnosticKind, Span};
use crate::parser::ast::{self, ConditionalType, InferType, MappedType, TypeParamList};
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::program::{NodeKey, SymbolFlags, SymbolId};
use crate::source_map::SourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meaning {
    Type,
    Value,
    Namespace,
}

impl Meaning {
    pub(crate) fn matches(self, flags: SymbolFlags) -> bool {
        match self {
            Meaning::Type => flags.intersects(SymbolFlags::TYPE),
            Meaning::Value => flags.intersects(SymbolFlags::VALUE),
            Meaning::Namespace => flags.intersects(SymbolFlags::MODULE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Found(SymbolId),
    /// Bound to an import that does not resolve; the import itself is reported.
    Unresolved,
    Missing,
}

impl<'p> Checker<'p> {
    pub(crate) fn resolve_name(
        &self,
        file: SourceId,
        site: &SyntaxNode,
        name: &str,
        meaning: Meaning,
    ) -> Resolution {
        if meaning == Meaning::Type
            && let Some(id) = self.lexical_type_param(file, site, name)
        {
            return Resolution::Found(id);
        }
        let symbols = self.symbols();
        let local = symbols.file(file).and_then(|f| f.locals.get(name)).copied();
        let global = symbols.globals().get(name).copied();
        for candidate in [local, global].into_iter().flatten() {
            match self.with_meaning(candidate, meaning) {
                Resolution::Missing => continue,
                found => return found,
            }
        }
        Resolution::Missing
    }

    /// `id` itself or its import target, if it has `meaning`.
    fn with_meaning(&self, id: SymbolId, meaning: Meaning) -> Resolution {
        let symbols = self.symbols();
        let symbol = symbols.get(id);
        if symbol.flags.intersects(SymbolFlags::ALIAS) {
            return match symbols.resolve_alias(id) {
                Some(target) if meaning.matches(symbols.get(target).flags) => {
                    Resolution::Found(target)
                }
                Some(_) => Resolution::Missing,
                None => Resolution::Unresolved,
            };
        }
        if meaning.matches(symbol.flags) {
            Resolution::Found(id)
        } else {
            Resolution::Missing
        }
    }

    fn lexical_type_param(&self, file: SourceId, site: &SyntaxNode, name: &str) -> Option<SymbolId> {
        let symbols = self.symbols();
        for ancestor in site.ancestors() {
            match ancestor.kind() {
                SyntaxKind::TypeAliasDecl
                | SyntaxKind::InterfaceDecl
                | SyntaxKind::FunctionDecl
                | SyntaxKind::FunctionType
                | SyntaxKind::ConstructorType
                | SyntaxKind::CallSig
                | SyntaxKind::ConstructSig
                | SyntaxKind::MethodSig => {
                    let Some(list) = ancestor.children().find_map(TypeParamList::cast) else {
                        continue;
                    };
                    let found = list
                        .params()
                        .find(|p| p.name().is_some_and(|n| n.text() == name));
                    if let Some(param) = found {
                        return symbols.node_symbol(NodeKey::of(file, param.as_cst()));
                    }
                }
                SyntaxKind::MappedType => {
                    let param = MappedType::cast(ancestor.clone()).and_then(|m| m.type_param());
                    if let Some(param) = param
                        && param.name().is_some_and(|n| n.text() == name)
                    {
                        return symbols.node_symbol(NodeKey::of(file, param.as_cst()));
                    }
                }
                SyntaxKind::ConditionalType => {
                    let Some(conditional) = ConditionalType::cast(ancestor.clone()) else {
                        continue;
                    };
                    let site_range = site.text_range();
                    let visible = [conditional.extends_type(), conditional.true_type()]
                        .into_iter()
                        .flatten()
                        .any(|t| t.as_cst().text_range().contains_range(site_range));
                    if !visible {
                        continue;
                    }
                    let found = self
                        .infer_declarations(&conditional)
                        .into_iter()
                        .find(|infer| infer.name().is_some_and(|n| n.text() == name));
                    if let Some(param) = found {
                        return symbols.node_symbol(NodeKey::of(file, param.as_cst()));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Type parameters declared by `infer` in the extends clause of `conditional`,
    /// excluding those owned by a nested conditional's extends clause.
    pub(crate) fn infer_declarations(&self, conditional: &ConditionalType) -> Vec<ast::TypeParam> {
        let Some(extends) = conditional.extends_type() else {
            return Vec::new();
        };
        let extends = extends.as_cst().clone();
        extends
            .descendants()
            .filter_map(InferType::cast)
            .filter(|infer| {
                let range = infer.as_cst().text_range();
                infer
                    .as_cst()
                    .ancestors()
                    .skip(1)
                    .take_while(|a| *a != extends)
                    .all(|a| !nested_extends_contains(&a, range))
            })
            .filter_map(|infer| infer.type_param())
            .collect()
    }

    pub(crate) fn infer_params(&self, file: SourceId, conditional: &ConditionalType) -> Vec<SymbolId> {
        self.infer_declarations(conditional)
            .iter()
            .filter_map(|p| self.symbols().node_symbol(NodeKey::of(file, p.as_cst())))
            .collect()
    }

    /// Resolves a possibly qualified name. With `report`, failures become diagnostics.
    pub(crate) fn resolve_entity(
        &self,
        file: SourceId,
        name: &ast::EntityName,
        meaning: Meaning,
        report: bool,
    ) -> Option<SymbolId> {
        let segments = name.segments();
        let (first, rest) = segments.split_first()?;
        let site = name.as_cst();
        let span = |range: TextRange| Span::new(file, range);

        if rest.is_empty() {
            return match self.resolve_name(file, site, first.text(), meaning) {
                Resolution::Found(id) => Some(id),
                Resolution::Unresolved => None,
                Resolution::Missing => {
                    if report {
                        self.report_missing_name(file, site, first.text(), first.text_range(), meaning);
                    }
                    None
                }
            };
        }

        let mut current = match self.resolve_name(file, site, first.text(), Meaning::Namespace) {
            Resolution::Found(id) => id,
            Resolution::Unresolved => return None,
            Resolution::Missing => {
                if report {
                    self.report(
                        DiagnosticKind::CannotFindNamespace,
                        span(first.text_range()),
                        &[first.text()],
                    );
                }
                return None;
            }
        };
        let mut path = first.text().to_string();
        for (i, segment) in rest.iter().enumerate() {
            let wanted = if i + 1 == rest.len() { meaning } else { Meaning::Namespace };
            let symbols = self.symbols();
            let module = symbols.get(current).module?;
            let found = symbols
                .export_of(module, segment.text())
                .filter(|&id| wanted.matches(symbols.get(id).flags));
            match found {
                Some(id) => current = id,
                None => {
                    if report {
                        self.report(
                            DiagnosticKind::NamespaceNoExportedMember,
                            span(segment.text_range()),
                            &[&path, segment.text()],
                        );
                    }
                    return None;
                }
            }
            path.push('.');
            path.push_str(segment.text());
        }
        Some(current)
    }

    fn report_missing_name(
        &self,
        file: SourceId,
        site: &SyntaxNode,
        name: &str,
        range: TextRange,
        meaning: Meaning,
    ) {
        let span = Span::new(file, range);
        if meaning == Meaning::Type {
            let other = |m| matches!(self.resolve_name(file, site, name, m), Resolution::Found(_));
            if other(Meaning::Namespace) {
                self.report(DiagnosticKind::NamespaceUsedAsType, span, &[name]);
                return;
            }
            if other(Meaning::Value) {
                self.report(DiagnosticKind::ValueUsedAsType, span, &[name]);
                return;
            }
        }
        self.report(DiagnosticKind::CannotFindName, span, &[name]);
    }

    /// Type parameter symbols declared by a parameter list, in order.
    pub(crate) fn type_params_of(&self, file: SourceId, list: Option<TypeParamList>) -> Vec<SymbolId> {
        list.iter()
            .flat_map(|l| l.params())
            .filter_map(|p| self.symbols().node_symbol(NodeKey::of(file, p.as_cst())))
            .collect()
    }
}

/// Whether `node` is a conditional type whose extends clause covers `range`.
/// The conditional whose extends clause binds the `infer` declaration `infer`.
pub(crate) fn owning_conditional(infer: &SyntaxNode) -> Option<SyntaxNode> {
    let range = infer.text_range();
    infer.ancestors().skip(1).find(|a| nested_extends_contains(a, range))
}

fn nested_extends_contains(node: &SyntaxNode, range: TextRange) -> bool {
    ConditionalType::cast(node.clone())
        .and_then(|c| c.extends_type())
        .is_some_and(|e| e.as_cst().text_range().contains_range(range))
}
