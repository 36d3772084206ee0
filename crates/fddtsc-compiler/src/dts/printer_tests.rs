use super::factory::*;
use super::printer::{Printer, PrinterOptions, print_type};
use super::tree::{
    DtsBundle, DtsFile, Keyword, MappedModifier, MappedTypeNode, Modifiers, Parameter,
    PropertySignature, Signature, Statement, TupleMember, TupleMemberKind, TypeAliasDeclaration,
    TypeMember, TypeNode, TypeOperatorKind, VariableDeclaration, VariableStatement,
};
use crate::parser::ast::DeclarationKeyword;
use crate::source_map::SourceId;

fn property(name: &str, ty: TypeNode) -> TypeMember {
    TypeMember::Property(PropertySignature {
        origin: None,
        readonly: false,
        name: name.to_string(),
        optional: false,
        ty: Some(ty),
    })
}

fn void_function() -> TypeNode {
    function(Signature {
        type_params: Vec::new(),
        params: Vec::new(),
        return_type: Some(Box::new(keyword(Keyword::Void))),
    })
}

fn alias(name: &str, ty: TypeNode) -> Statement {
    Statement::TypeAlias(TypeAliasDeclaration {
        origin: None,
        modifiers: Modifiers {
            export: true,
            ..Modifiers::default()
        },
        name: name.to_string(),
        type_params: Vec::new(),
        ty,
    })
}

#[test]
fn unions_parenthesize_function_members() {
    let ty = union(vec![void_function(), keyword(Keyword::Null)]);
    insta::assert_snapshot!(print_type(&ty), @"(() => void) | null");
}

#[test]
fn literals_and_keywords() {
    let ty = union(vec![
        string_literal("a\"b"),
        number_literal(-1.5),
        bigint_literal("10"),
        boolean_literal(false),
        keyword(Keyword::Undefined),
    ]);
    insta::assert_snapshot!(print_type(&ty), @r#""a\"b" | -1.5 | 10n | false | undefined"#);
}

#[test]
fn objects_print_on_one_line() {
    let ty = object(vec![property("a", keyword(Keyword::String)), property("b", array(keyword(Keyword::Number)))]);
    insta::assert_snapshot!(print_type(&ty), @"{ a: string; b: number[]; }");
    insta::assert_snapshot!(print_type(&object(Vec::new())), @"{}");
}

#[test]
fn postfix_and_operator_operands() {
    let keys = type_operator(TypeOperatorKind::Keyof, reference(vec!["T".into()], Vec::new()));
    insta::assert_snapshot!(print_type(&array(keys.clone())), @"(keyof T)[]");
    insta::assert_snapshot!(
        print_type(&indexed_access(reference(vec!["T".into()], Vec::new()), keys)),
        @"T[keyof T]"
    );
    let ro = type_operator(TypeOperatorKind::Readonly, array(keyword(Keyword::String)));
    insta::assert_snapshot!(print_type(&ro), @"readonly string[]");
}

#[test]
fn mapped_and_conditional() {
    let mapped = mapped(MappedTypeNode {
        readonly: Some(MappedModifier::Remove),
        parameter: "K".into(),
        constraint: reference(vec!["Keys".into()], Vec::new()),
        name_type: None,
        optional: Some(MappedModifier::Plain),
        ty: Some(keyword(Keyword::Boolean)),
    });
    insta::assert_snapshot!(print_type(&mapped), @"{ -readonly [K in Keys]?: boolean; }");

    let conditional = conditional(
        reference(vec!["T".into()], Vec::new()),
        array(infer("U".into(), None)),
        reference(vec!["U".into()], Vec::new()),
        keyword(Keyword::Never),
    );
    insta::assert_snapshot!(print_type(&conditional), @"T extends (infer U)[] ? U : never");
}

#[test]
fn tuples_and_imports() {
    let tuple = tuple(vec![
        TupleMember {
            kind: TupleMemberKind::Required,
            name: None,
            ty: keyword(Keyword::String),
        },
        TupleMember {
            kind: TupleMemberKind::Optional,
            name: None,
            ty: keyword(Keyword::Number),
        },
        TupleMember {
            kind: TupleMemberKind::Rest,
            name: Some("rest".into()),
            ty: array(keyword(Keyword::Boolean)),
        },
    ]);
    insta::assert_snapshot!(print_type(&tuple), @"[string, number?, ...rest: boolean[]]");

    let import = import_type("\"./models\"".into(), vec!["User".into()], vec![keyword(Keyword::Any)]);
    insta::assert_snapshot!(print_type(&import), @r#"import("./models").User<any>"#);
}

#[test]
fn declarations_print_objects_across_lines() {
    let file = DtsFile {
        source: SourceId::default(),
        statements: vec![
            alias(
                "Nested",
                object(vec![property("inner", object(vec![property("x", keyword(Keyword::Number))]))]),
            ),
            Statement::Variable(VariableStatement {
                origin: None,
                modifiers: Modifiers {
                    declare: true,
                    ..Modifiers::default()
                },
                keyword: DeclarationKeyword::Let,
                declarations: vec![VariableDeclaration {
                    name: "v".into(),
                    ty: Some(function(Signature {
                        type_params: Vec::new(),
                        params: vec![Parameter {
                            rest: false,
                            name: "a".into(),
                            optional: true,
                            ty: Some(keyword(Keyword::String)),
                        }],
                        return_type: Some(Box::new(keyword(Keyword::Void))),
                    })),
                    initializer: None,
                }],
            }),
        ],
    };

    let text = Printer::new(None, PrinterOptions::default()).print_file(&file);
    insta::assert_snapshot!(text, @r"
    export type Nested = {
        inner: {
            x: number;
        };
    };
    declare let v: (a?: string) => void;
    ");
}

#[test]
fn bundles_wrap_files_in_ambient_modules() {
    let declared = Statement::Variable(VariableStatement {
        origin: None,
        modifiers: Modifiers {
            export: true,
            declare: true,
            ..Modifiers::default()
        },
        keyword: DeclarationKeyword::Const,
        declarations: vec![VariableDeclaration {
            name: "a".into(),
            ty: None,
            initializer: Some("1".into()),
        }],
    });
    let bundle = DtsBundle {
        files: vec![
            DtsFile {
                source: SourceId::default(),
                statements: vec![declared],
            },
            DtsFile {
                source: SourceId::default(),
                statements: vec![alias("B", keyword(Keyword::String))],
            },
        ],
    };

    let mut names = ["a", "lib/b"].into_iter();
    let text = Printer::new(None, PrinterOptions::default())
        .print_bundle(&bundle, |_| names.next().unwrap_or_default().to_string());
    insta::assert_snapshot!(text, @r#"
    declare module "a" {
        export const a = 1;
    }
    declare module "lib/b" {
        export type B = string;
    }
    "#);
}

#[test]
fn crlf_new_lines() {
    let file = DtsFile {
        source: SourceId::default(),
        statements: vec![alias("A", keyword(Keyword::Number)), alias("B", keyword(Keyword::Never))],
    };
    let options = PrinterOptions {
        new_line: "\r\n",
        remove_comments: false,
    };
    let text = Printer::new(None, options).print_file(&file);
    assert_eq!(text, "export type A = number;\r\nexport type B = never;\r\n");
}
