//! Semantic checks that block emission.
//!
//! Every type node outside the default library is lowered once with its own
//! span as the reporting site, so evaluation problems (circular aliases,
//! runaway instantiation) land on the node that triggered them. On top of
//! lowering, references are checked for arity and constraints, indexed
//! accesses for missing properties, imports for missing modules and exports.

use tracing::debug;

use super::Checker;
use super::evaluate::AccessError;
use super::scope::Meaning;
use super::types::TypeId;
use crate::Diagnostics;
use crate::diagnostics::{DiagnosticKind, Span};
use crate::parser::ast::{self, ExportDecl, ImportDecl, Param};
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::program::{ProgramFile, SymbolFlags};
use crate::source_map::SourceId;

impl<'p> Checker<'p> {
    /// Configuration, syntax, binding and semantic diagnostics of the whole
    /// program, sorted by position.
    pub fn pre_emit_diagnostics(&self) -> Diagnostics {
        for file in self.program.files() {
            if self.program.source(file.id()).is_default_lib() {
                continue;
            }
            self.check_file(file);
        }
        self.site.set(None);

        let mut out = Diagnostics::new();
        out.extend(self.program.global_diagnostics().clone());
        out.extend(self.program.syntactic_diagnostics().clone());
        out.extend(self.program.bind_diagnostics().clone());
        out.extend(self.diagnostics.borrow().clone());
        out.sort_and_dedup();
        debug!(count = out.len(), errors = out.error_count(), "pre-emit diagnostics");
        out
    }

    fn check_file(&self, file: &ProgramFile) {
        let id = file.id();
        for reference in file.references() {
            if reference.resolved.is_none() {
                self.report(
                    DiagnosticKind::CannotFindModule,
                    Span::new(id, reference.range),
                    &[&reference.specifier],
                );
            }
        }

        let no_implicit_any = self.program.options().no_implicit_any();
        for node in file.syntax().descendants() {
            if let Some(ty) = ast::Type::cast(node.clone()) {
                self.check_type_node(id, &ty);
                continue;
            }
            match node.kind() {
                SyntaxKind::ImportDecl => self.check_import(id, &node),
                SyntaxKind::ExportDecl => self.check_reexport(id, &node),
                SyntaxKind::Param if no_implicit_any => self.check_parameter(id, &node),
                _ => {}
            }
        }
    }

    fn check_type_node(&self, file: SourceId, node: &ast::Type) {
        self.site.set(Some(Span::new(file, node.as_cst().text_range())));
        self.type_from_type_node(file, node);
        match node {
            ast::Type::Reference(reference) => self.check_type_reference(file, reference),
            ast::Type::IndexedAccess(access) => self.check_indexed_access(file, access),
            ast::Type::Query(query) => {
                if let Some(name) = query.name() {
                    self.resolve_entity(file, &name, Meaning::Value, true);
                }
            }
            _ => {}
        }
    }

    fn check_type_reference(&self, file: SourceId, reference: &ast::TypeRef) {
        let Some(name) = reference.name() else {
            return;
        };
        let Some(symbol) = self.resolve_entity(file, &name, Meaning::Type, true) else {
            return;
        };
        let arg_nodes: Vec<ast::Type> = reference
            .type_args()
            .map(|list| list.types().collect())
            .unwrap_or_default();
        let span = Span::new(file, reference.as_cst().text_range());
        let flags = self.symbols().get(symbol).flags;

        if flags.intersects(SymbolFlags::TYPE_PARAMETER) {
            if !arg_nodes.is_empty() {
                self.report(DiagnosticKind::NotGeneric, span, &[&name.text()]);
            }
            return;
        }

        let params = self.declared_type_params(symbol);
        if params.is_empty() {
            if !arg_nodes.is_empty() {
                self.report(DiagnosticKind::NotGeneric, span, &[&name.text()]);
            }
            return;
        }
        let required = params
            .iter()
            .filter(|&&p| self.param_default(p).is_none())
            .count();
        if arg_nodes.len() < required || arg_nodes.len() > params.len() {
            let param_names: Vec<&str> = params
                .iter()
                .map(|&p| self.symbols().get(p).name.as_str())
                .collect();
            let display = format!("{}<{}>", name.text(), param_names.join(", "));
            let count = if required == params.len() {
                required.to_string()
            } else {
                format!("between {} and {}", required, params.len())
            };
            self.report(DiagnosticKind::GenericArity, span, &[&display, &count]);
            return;
        }

        let args: Vec<TypeId> = arg_nodes
            .iter()
            .map(|n| self.type_from_type_node(file, n))
            .collect();
        let filled = self.fill_type_arguments(&params, args.clone());
        let mapper = self.make_mapper(params.iter().copied().zip(filled).collect());
        for ((&param, &arg), node) in params.iter().zip(&args).zip(&arg_nodes) {
            let Some(constraint) = self.param_constraint(param) else {
                continue;
            };
            if arg == TypeId::ERROR {
                continue;
            }
            let constraint = self.instantiate(constraint, mapper);
            if self.is_assignable(arg, constraint) == Some(false) {
                let arg_text = self.type_to_string(arg, file);
                let constraint_text = self.type_to_string(constraint, file);
                self.report(
                    DiagnosticKind::ConstraintNotSatisfied,
                    Span::new(file, node.as_cst().text_range()),
                    &[&arg_text, &constraint_text],
                );
            }
        }
    }

    fn check_indexed_access(&self, file: SourceId, access: &ast::IndexedAccessType) {
        let (Some(object_node), Some(index_node)) = (access.object(), access.index()) else {
            return;
        };
        let object = self.type_from_type_node(file, &object_node);
        let index = self.type_from_type_node(file, &index_node);
        if object == TypeId::ERROR || index == TypeId::ERROR {
            return;
        }
        let span = Span::new(file, index_node.as_cst().text_range());
        match self.indexed_access(object, index) {
            Ok(_) => {}
            Err(AccessError::MissingProperty(name)) => {
                let object_text = self.type_to_string(object, file);
                self.report(DiagnosticKind::PropertyDoesNotExist, span, &[&name, &object_text]);
            }
            Err(AccessError::NotIndexable) => {
                let index_text = self.type_to_string(index, file);
                let object_text = self.type_to_string(object, file);
                self.report(DiagnosticKind::CannotIndexType, span, &[&index_text, &object_text]);
            }
        }
    }

    fn check_import(&self, file: SourceId, node: &SyntaxNode) {
        let Some(import) = ImportDecl::cast(node.clone()) else {
            return;
        };
        let Some(specifier) = import.module_specifier() else {
            return;
        };
        let module_name = specifier.value();
        let Some(module) = self.resolved_module(file, &module_name) else {
            return;
        };
        let Some(clause) = import.clause() else {
            return;
        };
        if let Some(default) = clause.default_name() {
            self.check_exported(file, module, &module_name, "default", default.as_cst().text_range());
        }
        for spec in clause.named().iter().flat_map(|n| n.specifiers()) {
            if let Some(name) = spec.property_name() {
                self.check_exported(file, module, &module_name, &name.text(), name.as_cst().text_range());
            }
        }
    }

    fn check_reexport(&self, file: SourceId, node: &SyntaxNode) {
        let Some(export) = ExportDecl::cast(node.clone()) else {
            return;
        };
        let Some(specifier) = export.module_specifier() else {
            return;
        };
        let module_name = specifier.value();
        let Some(module) = self.resolved_module(file, &module_name) else {
            return;
        };
        for spec in export.named_exports().iter().flat_map(|n| n.specifiers()) {
            if let Some(name) = spec.property_name() {
                self.check_exported(file, module, &module_name, &name.text(), name.as_cst().text_range());
            }
        }
    }

    fn resolved_module(&self, file: SourceId, specifier: &str) -> Option<SourceId> {
        self.program.file(file)?.resolved_module(specifier)
    }

    fn check_exported(
        &self,
        file: SourceId,
        module: SourceId,
        module_name: &str,
        name: &str,
        range: rowan::TextRange,
    ) {
        if self.symbols().export_of(module, name).is_none() {
            self.report(
                DiagnosticKind::NoExportedMember,
                Span::new(file, range),
                &[module_name, name],
            );
        }
    }

    fn check_parameter(&self, file: SourceId, node: &SyntaxNode) {
        let Some(param) = Param::cast(node.clone()) else {
            return;
        };
        // Index signature key.
        if node.parent().is_some_and(|p| p.kind() == SyntaxKind::IndexSig) {
            return;
        }
        if param.type_annotation().is_some() || param.initializer().is_some() || param.is_this() {
            return;
        }
        let Some(name) = param.name() else {
            return;
        };
        self.report(
            DiagnosticKind::ImplicitAnyParameter,
            Span::new(file, node.text_range()),
            &[&name.text()],
        );
    }
}
