use indoc::indoc;

use crate::parser::ast::{DeclarationKeyword, MappedModifier, Statement, TupleElement, Type};
use crate::parser::{Parse, parse};
use crate::source_map::{SourceKind, SourceMap};

fn parse_ok(src: &str) -> Parse {
    let mut sources = SourceMap::new();
    let id = sources.add(SourceKind::Module, "test.ts", src);
    let (parse, diagnostics) = parse(src, id).unwrap();
    assert!(diagnostics.is_empty(), "unexpected syntax errors");
    parse
}

#[test]
fn import_specifiers() {
    let parse = parse_ok(r#"import D, { type A, B as C } from "./m.js";"#);
    let Some(Statement::Import(import)) = parse.root().statements().next() else {
        panic!("expected import");
    };

    assert!(!import.is_type_only());
    assert_eq!(import.module_specifier().unwrap().value(), "./m.js");

    let clause = import.clause().unwrap();
    assert_eq!(clause.default_name().unwrap().text(), "D");
    let specs: Vec<_> = clause.named().unwrap().specifiers().collect();
    assert_eq!(specs.len(), 2);
    assert!(specs[0].is_type_only());
    assert_eq!(specs[0].name().unwrap().text(), "A");
    assert_eq!(specs[1].property_name().unwrap().text(), "B");
    assert_eq!(specs[1].name().unwrap().text(), "C");
}

#[test]
fn declaration_modifiers() {
    let input = indoc! {r#"
    export declare const a: 1;
    let b = 2;
    export default function f() {}
    "#};
    let parse = parse_ok(input);
    let stmts: Vec<_> = parse.root().statements().collect();

    let Statement::Variable(a) = &stmts[0] else {
        panic!("expected variable");
    };
    assert!(a.modifiers().export);
    assert!(a.modifiers().declare);
    assert_eq!(a.keyword(), DeclarationKeyword::Const);

    let Statement::Variable(b) = &stmts[1] else {
        panic!("expected variable");
    };
    assert!(!b.modifiers().export);
    assert_eq!(b.keyword(), DeclarationKeyword::Let);
    let init = b.declarations().next().unwrap().initializer().unwrap();
    let texts: Vec<_> = init
        .expression_tokens()
        .iter()
        .map(|t| t.text().to_string())
        .collect();
    assert_eq!(texts, ["2"]);

    let Statement::Function(f) = &stmts[2] else {
        panic!("expected function");
    };
    assert!(f.modifiers().default);
    assert!(f.has_body());
    assert!(parse.root().is_module());
}

#[test]
fn scripts_are_not_modules() {
    let parse = parse_ok("type A = 1;\ndeclare function f(): void;\n");
    assert!(!parse.root().is_module());
}

#[test]
fn mapped_type_modifiers() {
    let parse = parse_ok("type M<T> = { -readonly [K in keyof T]+?: T[K] };");
    let Some(Statement::TypeAlias(alias)) = parse.root().statements().next() else {
        panic!("expected type alias");
    };
    let Some(Type::Mapped(mapped)) = alias.ty() else {
        panic!("expected mapped type");
    };
    assert_eq!(mapped.readonly_modifier(), Some(MappedModifier::Remove));
    assert_eq!(mapped.optional_modifier(), Some(MappedModifier::Add));
    let param = mapped.type_param().unwrap();
    assert_eq!(param.name().unwrap().text(), "K");
    assert!(matches!(param.constraint(), Some(Type::Operator(_))));
    assert!(param.name_type().is_none());
}

#[test]
fn tuple_elements() {
    let parse = parse_ok("type T = [string, number?, ...boolean[], last: 1];");
    let Some(Statement::TypeAlias(alias)) = parse.root().statements().next() else {
        panic!("expected type alias");
    };
    let Some(Type::Tuple(tuple)) = alias.ty() else {
        panic!("expected tuple");
    };
    let kinds: Vec<_> = tuple
        .elements()
        .map(|e| match e {
            TupleElement::Plain(_) => "plain",
            TupleElement::Optional(_) => "optional",
            TupleElement::Rest(_) => "rest",
            TupleElement::Named(_) => "named",
        })
        .collect();
    assert_eq!(kinds, ["plain", "optional", "rest", "named"]);
}

#[test]
fn string_member_names_are_unquoted() {
    let parse = parse_ok(r#"type O = { "a-b": 1; 'c': 2 };"#);
    let Some(Statement::TypeAlias(alias)) = parse.root().statements().next() else {
        panic!("expected type alias");
    };
    let Some(Type::Object(object)) = alias.ty() else {
        panic!("expected object type");
    };
    let names: Vec<_> = object
        .members()
        .filter_map(|m| match m {
            crate::parser::TypeMember::Property(p) => p.name(),
            _ => None,
        })
        .map(|n| n.text())
        .collect();
    assert_eq!(names, ["a-b", "c"]);
}
