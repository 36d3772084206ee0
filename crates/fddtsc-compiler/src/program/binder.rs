//! Declaration binding.
//!
//! Two passes per file: declarations first, so `export { a }` may precede the
//! declaration of `a`, then export lists. Files without imports or exports are
//! scripts and bind into the shared global table.

use std::collections::HashMap;

use super::symbols::{
    Declaration, ExportTarget, FileSymbols, ImportTarget, ImportedName, NodeKey, Symbol,
    SymbolFlags, SymbolId, SymbolTable,
};
use crate::Diagnostics;
use crate::diagnostics::{DiagnosticKind, Span};
use crate::parser::ast::{self, DeclarationKeyword, Modifiers};
use crate::parser::{Statement, SyntaxKind, SyntaxNode};
use crate::source_map::SourceId;

/// A file ready for binding: its root and the resolution of each module specifier.
pub struct BindInput<'a> {
    pub file: SourceId,
    pub root: ast::Root,
    pub modules: &'a HashMap<String, Option<SourceId>>,
}

pub fn bind<'a>(inputs: impl IntoIterator<Item = BindInput<'a>>) -> (SymbolTable, Diagnostics) {
    let mut binder = Binder::default();
    let inputs: Vec<_> = inputs.into_iter().collect();
    for input in &inputs {
        let module = binder.table.alloc(Symbol {
            name: String::new(),
            flags: SymbolFlags::MODULE,
            declarations: Vec::new(),
            import: None,
            module: Some(input.file),
        });
        binder.table.module_symbols.insert(input.file, module);
    }
    for input in &inputs {
        binder.bind_declarations(input);
    }
    for input in &inputs {
        binder.bind_export_lists(input);
    }
    (binder.table, binder.diagnostics)
}

#[derive(Default)]
struct Binder {
    table: SymbolTable,
    diagnostics: Diagnostics,
}

impl Binder {
    fn bind_declarations(&mut self, input: &BindInput<'_>) {
        let file = input.file;
        let is_module = input.root.is_module();
        self.table.files.insert(
            file,
            FileSymbols {
                is_module,
                ..FileSymbols::default()
            },
        );

        for statement in input.root.statements() {
            match &statement {
                Statement::Import(import) => self.bind_import(file, import, input.modules),
                Statement::TypeAlias(decl) => {
                    self.bind_named(file, decl.as_cst(), decl.name(), decl.modifiers(), SymbolFlags::TYPE_ALIAS)
                }
                Statement::Interface(decl) => {
                    self.bind_named(file, decl.as_cst(), decl.name(), decl.modifiers(), SymbolFlags::INTERFACE)
                }
                Statement::Function(decl) => {
                    self.bind_named(file, decl.as_cst(), decl.name(), decl.modifiers(), SymbolFlags::FUNCTION)
                }
                Statement::Variable(stmt) => {
                    let flags = match stmt.keyword() {
                        DeclarationKeyword::Var => SymbolFlags::VARIABLE,
                        DeclarationKeyword::Const | DeclarationKeyword::Let => {
                            SymbolFlags::BLOCK_SCOPED_VARIABLE
                        }
                    };
                    for decl in stmt.declarations() {
                        self.bind_named(file, decl.as_cst(), decl.name(), stmt.modifiers(), flags);
                    }
                }
                Statement::Export(_) | Statement::ExportAssignment(_) => {}
            }
        }

        for node in input.root.as_cst().descendants() {
            if matches!(node.kind(), SyntaxKind::TypeParam | SyntaxKind::MappedTypeParam) {
                self.bind_type_parameter(file, node);
            }
        }
    }

    fn bind_named(
        &mut self,
        file: SourceId,
        node: &SyntaxNode,
        name: Option<ast::Name>,
        modifiers: Modifiers,
        flags: SymbolFlags,
    ) {
        let Some(name) = name.filter(|n| !n.is_raw()) else {
            return;
        };
        let name = name.text();
        let declaration = Declaration {
            file,
            node: node.clone(),
        };
        let id = self.declare(file, &name, flags, declaration, None);
        if modifiers.export {
            let exported = if modifiers.default { "default" } else { name.as_str() };
            self.file_mut(file)
                .exports
                .insert(exported.to_string(), ExportTarget::Local(id));
        }
    }

    fn bind_import(
        &mut self,
        file: SourceId,
        import: &ast::ImportDecl,
        modules: &HashMap<String, Option<SourceId>>,
    ) {
        let Some(clause) = import.clause() else {
            return;
        };
        let specifier = import
            .module_specifier()
            .map(|s| s.value())
            .unwrap_or_default();
        let module = modules.get(&specifier).copied().flatten();
        let target = |name: ImportedName| ImportTarget {
            module,
            specifier: specifier.clone(),
            name,
        };

        if let Some(name) = clause.default_name() {
            self.bind_import_binding(file, &name, target(ImportedName::Default));
        }
        if let Some(name) = clause.namespace().and_then(|ns| ns.name()) {
            self.bind_import_binding(file, &name, target(ImportedName::Namespace));
        }
        for spec in clause.named().iter().flat_map(|n| n.specifiers()) {
            let (Some(imported), Some(local)) = (spec.property_name(), spec.name()) else {
                continue;
            };
            self.bind_import_binding(file, &local, target(ImportedName::Named(imported.text())));
        }
    }

    fn bind_import_binding(&mut self, file: SourceId, name: &ast::Name, target: ImportTarget) {
        let Some(node) = name.as_cst().parent() else {
            return;
        };
        let declaration = Declaration { file, node };
        self.declare(file, &name.text(), SymbolFlags::ALIAS, declaration, Some(target));
    }

    fn bind_type_parameter(&mut self, file: SourceId, node: SyntaxNode) {
        let Some(name) = node.children().find_map(ast::Name::cast) else {
            return;
        };
        let key = NodeKey::of(file, &node);
        let id = self.table.alloc(Symbol {
            name: name.text(),
            flags: SymbolFlags::TYPE_PARAMETER,
            declarations: vec![Declaration { file, node }],
            import: None,
            module: None,
        });
        self.table.nodes.insert(key, id);
    }

    /// Adds a declaration, merging with an existing symbol of the same name.
    fn declare(
        &mut self,
        file: SourceId,
        name: &str,
        flags: SymbolFlags,
        declaration: Declaration,
        import: Option<ImportTarget>,
    ) -> SymbolId {
        let is_module = self.table.files.get(&file).is_some_and(|f| f.is_module);
        let existing = if is_module {
            self.table.files.get(&file).and_then(|f| f.locals.get(name)).copied()
        } else {
            self.table.globals.get(name).copied()
        };

        if let Some(id) = existing {
            let symbol = self.table.get(id);
            if let Some(kind) = conflict(symbol.flags, flags) {
                let previous: Vec<_> = symbol
                    .declarations
                    .iter()
                    .map(|d| Span::new(d.file, d.name_range()))
                    .collect();
                self.report_conflict(kind, name, Span::new(file, declaration.name_range()));
                for span in previous {
                    self.report_conflict(kind, name, span);
                }
            }
            let symbol = self.table.get_mut(id);
            symbol.flags = symbol.flags | flags;
            symbol.declarations.push(declaration);
            if symbol.import.is_none() {
                symbol.import = import;
            }
            return id;
        }

        let id = self.table.alloc(Symbol {
            name: name.to_string(),
            flags,
            declarations: vec![declaration],
            import,
            module: None,
        });
        if is_module {
            self.file_mut(file).locals.insert(name.to_string(), id);
        } else {
            self.table.globals.insert(name.to_string(), id);
        }
        id
    }

    fn report_conflict(&mut self, kind: DiagnosticKind, name: &str, span: Span) {
        self.diagnostics.report(kind, span).message(name).emit();
    }

    fn bind_export_lists(&mut self, input: &BindInput<'_>) {
        let file = input.file;
        for statement in input.root.statements() {
            match statement {
                Statement::Export(export) => self.bind_export_declaration(file, &export, input.modules),
                Statement::ExportAssignment(assignment) => self.bind_export_assignment(file, &assignment),
                _ => {}
            }
        }
    }

    fn bind_export_declaration(
        &mut self,
        file: SourceId,
        export: &ast::ExportDecl,
        modules: &HashMap<String, Option<SourceId>>,
    ) {
        let from = export
            .module_specifier()
            .map(|s| modules.get(&s.value()).copied().flatten());

        if let Some(star) = export.export_star() {
            let module = from.flatten();
            match star.alias() {
                Some(alias) => {
                    self.file_mut(file)
                        .exports
                        .insert(alias.text(), ExportTarget::Namespace(module));
                }
                None => self.file_mut(file).star_exports.push(module),
            }
            return;
        }

        for spec in export.named_exports().iter().flat_map(|n| n.specifiers()) {
            let (Some(local), Some(exported)) = (spec.property_name(), spec.name()) else {
                continue;
            };
            let target = match from {
                Some(module) => ExportTarget::Reexport {
                    module,
                    name: local.text(),
                },
                None => match self.table.lookup(file, &local.text()) {
                    Some(id) => ExportTarget::Local(id),
                    None => {
                        self.diagnostics
                            .report(DiagnosticKind::CannotFindName, Span::new(file, local.as_cst().text_range()))
                            .message(local.text())
                            .emit();
                        continue;
                    }
                },
            };
            self.file_mut(file).exports.insert(exported.text(), target);
        }
    }

    /// `export default Name;` exports an existing symbol. Other expressions have no symbol.
    fn bind_export_assignment(&mut self, file: SourceId, assignment: &ast::ExportAssignment) {
        if !assignment.is_default() {
            return;
        }
        let tokens = assignment
            .expression()
            .map(|e| e.expression_tokens())
            .unwrap_or_default();
        let [token] = tokens.as_slice() else {
            return;
        };
        if token.kind() != SyntaxKind::Ident {
            return;
        }
        if let Some(id) = self.table.lookup(file, token.text()) {
            self.file_mut(file)
                .exports
                .insert("default".to_string(), ExportTarget::Local(id));
        }
    }

    fn file_mut(&mut self, file: SourceId) -> &mut FileSymbols {
        self.table.files.entry(file).or_default()
    }
}

/// Diagnostic for adding `new` to a symbol that already has `existing`.
fn conflict(existing: SymbolFlags, new: SymbolFlags) -> Option<DiagnosticKind> {
    use SymbolFlags as F;
    if existing.intersects(F::ALIAS) || new.intersects(F::ALIAS) {
        return Some(DiagnosticKind::DuplicateIdentifier);
    }
    let block_scoped = |f: SymbolFlags| f.intersects(F::BLOCK_SCOPED_VARIABLE);
    if (block_scoped(existing) && new.intersects(F::VALUE))
        || (block_scoped(new) && existing.intersects(F::VALUE))
    {
        return Some(DiagnosticKind::CannotRedeclareBlockScoped);
    }
    if (existing.intersects(F::FUNCTION) && new.intersects(F::VARIABLE))
        || (existing.intersects(F::VARIABLE) && new.intersects(F::FUNCTION))
    {
        return Some(DiagnosticKind::DuplicateIdentifier);
    }
    let type_space = F::TYPE_ALIAS | F::INTERFACE;
    if (new.intersects(F::TYPE_ALIAS) && existing.intersects(type_space))
        || (new.intersects(F::INTERFACE) && existing.intersects(F::TYPE_ALIAS))
    {
        return Some(DiagnosticKind::DuplicateIdentifier);
    }
    None
}
