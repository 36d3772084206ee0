//! Declaration tree → text.
//!
//! Output follows the layout of hand-written declaration files: four-space
//! indentation, one member per line, `;` after every statement and member.
//! [`print_type`] renders a lone type on a single line, for messages.

use std::fmt::Write as _;

use super::tree::{
    DtsBundle, DtsFile, ExportClause, MappedModifier, Modifiers, Origin, Parameter, Signature,
    Specifier, Statement, TupleMemberKind, TypeMember, TypeNode, TypeNodeKind, TypeParameter,
};
use crate::source_map::{SourceId, SourceMap};
use crate::transform::comments::leading_comments;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy)]
pub struct PrinterOptions {
    pub new_line: &'static str,
    pub remove_comments: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            new_line: "\n",
            remove_comments: false,
        }
    }
}

/// Renders a type on one line.
pub fn print_type(ty: &TypeNode) -> String {
    let mut printer = Printer::new(
        None,
        PrinterOptions {
            new_line: "\n",
            remove_comments: true,
        },
    );
    printer.single_line = true;
    printer.ty(ty);
    printer.out
}

pub struct Printer<'s> {
    sources: Option<&'s SourceMap>,
    options: PrinterOptions,
    out: String,
    indent: usize,
    single_line: bool,
    in_ambient_module: bool,
    file: Option<SourceId>,
}

impl<'s> Printer<'s> {
    /// `sources` is needed for comments; without it none are printed.
    pub fn new(sources: Option<&'s SourceMap>, options: PrinterOptions) -> Self {
        Self {
            sources,
            options,
            out: String::new(),
            indent: 0,
            single_line: false,
            in_ambient_module: false,
            file: None,
        }
    }

    pub fn print_file(mut self, file: &DtsFile) -> String {
        self.file_statements(file);
        self.out
    }

    /// Every file as a `declare module "<name>"` block.
    pub fn print_bundle(mut self, bundle: &DtsBundle, mut module_name: impl FnMut(SourceId) -> String) -> String {
        for file in &bundle.files {
            let _ = write!(self.out, "declare module \"{}\" {{", module_name(file.source));
            self.newline();
            self.indent += 1;
            self.in_ambient_module = true;
            self.file_statements(file);
            self.in_ambient_module = false;
            self.indent -= 1;
            self.out.push('}');
            self.newline();
        }
        self.out
    }

    fn file_statements(&mut self, file: &DtsFile) {
        self.file = Some(file.source);
        for statement in &file.statements {
            self.comments(statement.origin());
            self.write_indent();
            self.statement(statement);
            self.newline();
        }
    }

    fn newline(&mut self) {
        self.out.push_str(self.options.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn comments(&mut self, origin: Option<&Origin>) {
        if self.options.remove_comments || self.single_line {
            return;
        }
        let (Some(sources), Some(file)) = (self.sources, self.file) else {
            return;
        };
        for comment in leading_comments(origin, file, sources) {
            for (i, line) in comment.lines().enumerate() {
                self.write_indent();
                if i == 0 {
                    self.out.push_str(line);
                } else {
                    let line = line.trim_start();
                    if line.starts_with('*') {
                        self.out.push(' ');
                    }
                    self.out.push_str(line.trim_end());
                }
                self.newline();
            }
        }
    }

    fn modifiers(&mut self, modifiers: Modifiers) {
        if modifiers.export {
            self.out.push_str("export ");
        }
        if modifiers.default {
            self.out.push_str("default ");
        }
        if modifiers.declare && !self.in_ambient_module {
            self.out.push_str("declare ");
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Import(import) => {
                self.out.push_str("import ");
                if import.type_only {
                    self.out.push_str("type ");
                }
                let mut parts = Vec::new();
                if let Some(default) = &import.default {
                    parts.push(default.clone());
                }
                if let Some(namespace) = &import.namespace {
                    parts.push(format!("* as {namespace}"));
                }
                if let Some(named) = &import.named {
                    parts.push(specifier_list(named));
                }
                if !parts.is_empty() {
                    self.out.push_str(&parts.join(", "));
                    self.out.push_str(" from ");
                }
                self.out.push_str(&import.module);
                self.out.push(';');
            }
            Statement::Export(export) => {
                self.out.push_str("export ");
                if export.type_only {
                    self.out.push_str("type ");
                }
                match &export.clause {
                    ExportClause::Named(specifiers) => self.out.push_str(&specifier_list(specifiers)),
                    ExportClause::Star(None) => self.out.push('*'),
                    ExportClause::Star(Some(alias)) => {
                        let _ = write!(self.out, "* as {alias}");
                    }
                }
                if let Some(module) = &export.module {
                    let _ = write!(self.out, " from {module}");
                }
                self.out.push(';');
            }
            Statement::ExportAssignment(assignment) => {
                let head = if assignment.is_default { "export default " } else { "export = " };
                let _ = write!(self.out, "{head}{};", assignment.expression);
            }
            Statement::TypeAlias(alias) => {
                self.modifiers(alias.modifiers);
                let _ = write!(self.out, "type {}", alias.name);
                self.type_params(&alias.type_params);
                self.out.push_str(" = ");
                self.ty(&alias.ty);
                self.out.push(';');
            }
            Statement::Interface(interface) => {
                self.modifiers(interface.modifiers);
                let _ = write!(self.out, "interface {}", interface.name);
                self.type_params(&interface.type_params);
                if !interface.heritage.is_empty() {
                    self.out.push_str(" extends ");
                    self.comma_list(&interface.heritage, |p, t| p.ty(t));
                }
                self.out.push(' ');
                self.members(&interface.members, true);
            }
            Statement::Function(function) => {
                self.modifiers(function.modifiers);
                let _ = write!(self.out, "function {}", function.name);
                self.signature(&function.signature, ": ");
                self.out.push(';');
            }
            Statement::Variable(variable) => {
                self.modifiers(variable.modifiers);
                self.out.push_str(variable.keyword.as_str());
                self.out.push(' ');
                for (i, decl) in variable.declarations.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&decl.name);
                    if let Some(ty) = &decl.ty {
                        self.out.push_str(": ");
                        self.ty(ty);
                    }
                    if let Some(init) = &decl.initializer {
                        let _ = write!(self.out, " = {init}");
                    }
                }
                self.out.push(';');
            }
        }
    }

    fn comma_list<T>(&mut self, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            each(self, item);
        }
    }

    fn separated(&mut self, items: &[TypeNode], separator: &str) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            self.ty(item);
        }
    }

    fn type_params(&mut self, params: &[TypeParameter]) {
        if params.is_empty() {
            return;
        }
        self.out.push('<');
        self.comma_list(params, |p, param| {
            if param.is_const {
                p.out.push_str("const ");
            }
            p.out.push_str(&param.name);
            if let Some(constraint) = &param.constraint {
                p.out.push_str(" extends ");
                p.ty(constraint);
            }
            if let Some(default) = &param.default {
                p.out.push_str(" = ");
                p.ty(default);
            }
        });
        self.out.push('>');
    }

    fn params(&mut self, params: &[Parameter]) {
        self.out.push('(');
        self.comma_list(params, |p, param| {
            if param.rest {
                p.out.push_str("...");
            }
            p.out.push_str(&param.name);
            if param.optional {
                p.out.push('?');
            }
            if let Some(ty) = &param.ty {
                p.out.push_str(": ");
                p.ty(ty);
            }
        });
        self.out.push(')');
    }

    /// Type parameters, parameters and return type; `arrow` separates the
    /// last two (`": "` in declarations, `" => "` in function types).
    fn signature(&mut self, signature: &Signature, arrow: &str) {
        self.type_params(&signature.type_params);
        self.params(&signature.params);
        self.out.push_str(arrow);
        match &signature.return_type {
            Some(ty) => self.ty(ty),
            None => self.out.push_str("any"),
        }
    }

    fn members(&mut self, members: &[TypeMember], is_declaration: bool) {
        if members.is_empty() {
            if is_declaration && !self.single_line {
                self.out.push('{');
                self.newline();
                self.write_indent();
                self.out.push('}');
            } else {
                self.out.push_str("{}");
            }
            return;
        }
        if self.single_line {
            self.out.push_str("{ ");
            for member in members {
                self.member(member);
                self.out.push(' ');
            }
            self.out.push('}');
            return;
        }
        self.out.push('{');
        self.newline();
        self.indent += 1;
        for member in members {
            self.comments(member.origin());
            self.write_indent();
            self.member(member);
            self.newline();
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }

    fn member(&mut self, member: &TypeMember) {
        match member {
            TypeMember::Property(property) => {
                if property.readonly {
                    self.out.push_str("readonly ");
                }
                self.out.push_str(&property.name);
                if property.optional {
                    self.out.push('?');
                }
                if let Some(ty) = &property.ty {
                    self.out.push_str(": ");
                    self.ty(ty);
                }
            }
            TypeMember::Method(method) => {
                self.out.push_str(&method.name);
                if method.optional {
                    self.out.push('?');
                }
                self.signature(&method.signature, ": ");
            }
            TypeMember::Call(call) => self.signature(&call.signature, ": "),
            TypeMember::Construct(construct) => {
                self.out.push_str("new ");
                self.signature(&construct.signature, ": ");
            }
            TypeMember::Index(index) => {
                if index.readonly {
                    self.out.push_str("readonly ");
                }
                let _ = write!(self.out, "[{}: ", index.parameter);
                self.ty(&index.key);
                self.out.push_str("]: ");
                self.ty(&index.ty);
            }
        }
        self.out.push(';');
    }

    fn ty(&mut self, ty: &TypeNode) {
        match &ty.kind {
            TypeNodeKind::Keyword(keyword) => self.out.push_str(keyword.as_str()),
            TypeNodeKind::Literal(text) => self.out.push_str(text),
            TypeNodeKind::TemplateLiteral { head, spans } => {
                let _ = write!(self.out, "`{head}");
                for span in spans {
                    self.out.push_str("${");
                    self.ty(&span.ty);
                    let _ = write!(self.out, "}}{}", span.text);
                }
                self.out.push('`');
            }
            TypeNodeKind::Reference { name, args } => {
                self.out.push_str(&name.join("."));
                self.type_args(args);
            }
            TypeNodeKind::Import { module, qualifier, args } => {
                let _ = write!(self.out, "import({module})");
                for segment in qualifier {
                    let _ = write!(self.out, ".{segment}");
                }
                self.type_args(args);
            }
            TypeNodeKind::Union(types) => self.separated(types, " | "),
            TypeNodeKind::Intersection(types) => self.separated(types, " & "),
            TypeNodeKind::Array(element) => {
                self.ty(element);
                self.out.push_str("[]");
            }
            TypeNodeKind::Tuple(members) => {
                self.out.push('[');
                self.comma_list(members, |p, member| {
                    if member.kind == TupleMemberKind::Rest {
                        p.out.push_str("...");
                    }
                    match &member.name {
                        Some(name) => {
                            p.out.push_str(name);
                            if member.kind == TupleMemberKind::Optional {
                                p.out.push('?');
                            }
                            p.out.push_str(": ");
                            p.ty(&member.ty);
                        }
                        None => {
                            p.ty(&member.ty);
                            if member.kind == TupleMemberKind::Optional {
                                p.out.push('?');
                            }
                        }
                    }
                });
                self.out.push(']');
            }
            TypeNodeKind::Paren(inner) => {
                self.out.push('(');
                self.ty(inner);
                self.out.push(')');
            }
            TypeNodeKind::Function(signature) => self.signature(signature, " => "),
            TypeNodeKind::Constructor { is_abstract, signature } => {
                if *is_abstract {
                    self.out.push_str("abstract ");
                }
                self.out.push_str("new ");
                self.signature(signature, " => ");
            }
            TypeNodeKind::Object(members) => self.members(members, false),
            TypeNodeKind::Mapped(mapped) => {
                let single_line = self.single_line;
                self.out.push('{');
                if single_line {
                    self.out.push(' ');
                } else {
                    self.newline();
                    self.indent += 1;
                    self.write_indent();
                }
                if let Some(modifier) = mapped.readonly {
                    self.out.push_str(modifier_sign(modifier));
                    self.out.push_str("readonly ");
                }
                let _ = write!(self.out, "[{} in ", mapped.parameter);
                self.ty(&mapped.constraint);
                if let Some(name_type) = &mapped.name_type {
                    self.out.push_str(" as ");
                    self.ty(name_type);
                }
                self.out.push(']');
                if let Some(modifier) = mapped.optional {
                    self.out.push_str(modifier_sign(modifier));
                    self.out.push('?');
                }
                if let Some(ty) = &mapped.ty {
                    self.out.push_str(": ");
                    self.ty(ty);
                }
                self.out.push(';');
                if single_line {
                    self.out.push_str(" }");
                } else {
                    self.newline();
                    self.indent -= 1;
                    self.write_indent();
                    self.out.push('}');
                }
            }
            TypeNodeKind::IndexedAccess { object, index } => {
                self.ty(object);
                self.out.push('[');
                self.ty(index);
                self.out.push(']');
            }
            TypeNodeKind::Operator { operator, ty } => {
                let _ = write!(self.out, "{} ", operator.as_str());
                self.ty(ty);
            }
            TypeNodeKind::Query { name, args } => {
                let _ = write!(self.out, "typeof {}", name.join("."));
                self.type_args(args);
            }
            TypeNodeKind::Conditional {
                check,
                extends,
                true_type,
                false_type,
            } => {
                self.ty(check);
                self.out.push_str(" extends ");
                self.ty(extends);
                self.out.push_str(" ? ");
                self.ty(true_type);
                self.out.push_str(" : ");
                self.ty(false_type);
            }
            TypeNodeKind::Infer { name, constraint } => {
                let _ = write!(self.out, "infer {name}");
                if let Some(constraint) = constraint {
                    self.out.push_str(" extends ");
                    self.ty(constraint);
                }
            }
            TypeNodeKind::Predicate { asserts, parameter, ty } => {
                if *asserts {
                    self.out.push_str("asserts ");
                }
                self.out.push_str(parameter);
                if let Some(ty) = ty {
                    self.out.push_str(" is ");
                    self.ty(ty);
                }
            }
            TypeNodeKind::This => self.out.push_str("this"),
        }
    }

    fn type_args(&mut self, args: &[TypeNode]) {
        if args.is_empty() {
            return;
        }
        self.out.push('<');
        self.separated(args, ", ");
        self.out.push('>');
    }
}

fn modifier_sign(modifier: MappedModifier) -> &'static str {
    match modifier {
        MappedModifier::Add => "+",
        MappedModifier::Remove => "-",
        MappedModifier::Plain => "",
    }
}

fn specifier_list(specifiers: &[Specifier]) -> String {
    if specifiers.is_empty() {
        return "{}".to_string();
    }
    let items: Vec<String> = specifiers
        .iter()
        .map(|spec| {
            let prefix = if spec.type_only { "type " } else { "" };
            match &spec.property_name {
                Some(property) => format!("{prefix}{property} as {}", spec.name),
                None => format!("{prefix}{}", spec.name),
            }
        })
        .collect();
    format!("{{ {} }}", items.join(", "))
}
