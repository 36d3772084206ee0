use indoc::indoc;

use super::NodeBuilderFlags;
use crate::dts::print_type;
use crate::test_utils::{INDEX, alias_body, expand, program_with, render_alias_with, source_id, strict};

#[test]
fn aliases_print_by_name_unless_expanded() {
    let input = indoc! {r#"
    type Id = string | number;
    type U = Id;
    type Tree = { value: Id; kids: Tree[] };
    "#};

    insta::assert_snapshot!(render_alias_with(input, "U", NodeBuilderFlags::NONE), @"Id");
    insta::assert_snapshot!(expand(input, "U"), @"string | number");
    insta::assert_snapshot!(expand(input, "Tree"), @"{ value: Id; kids: Tree[]; }");
}

#[test]
fn union_display_order() {
    let input = "type T = undefined | true | null | string | false;\n";
    insta::assert_snapshot!(expand(input, "T"), @"string | boolean | null | undefined");
}

#[test]
fn arrays_and_tuples() {
    let input = indoc! {r#"
    type A = ReadonlyArray<number>;
    type B = readonly [x: string, y?: number];
    type C = Array<string | number>;
    "#};

    insta::assert_snapshot!(expand(input, "A"), @"readonly number[]");
    insta::assert_snapshot!(expand(input, "B"), @"readonly [x: string, y?: number]");
    insta::assert_snapshot!(expand(input, "C"), @"(string | number)[]");
}

#[test]
fn function_values_print_as_queries() {
    let input = indoc! {r#"
    declare function f(a: string): number;
    type F = typeof f;
    "#};
    insta::assert_snapshot!(expand(input, "F"), @"typeof f");
}

#[test]
fn deferred_generic_types_keep_their_shape() {
    let input = indoc! {r#"
    type C<T> = T extends string ? "s" : "n";
    type M<T> = { [K in keyof T]: T[K] };
    type G<T> = (value: T) => T[];
    "#};

    insta::assert_snapshot!(expand(input, "C"), @r#"T extends string ? "s" : "n""#);
    insta::assert_snapshot!(expand(input, "M"), @"{ [K in keyof T]: T[K]; }");
    insta::assert_snapshot!(expand(input, "G"), @"(value: T) => T[]");
}

#[test]
fn long_unions_are_truncated_unless_asked_not_to() {
    let members: Vec<String> = (0..80).map(|i| format!("\"member{i}\"")).collect();
    let input = format!("type Many = {};\n", members.join(" | "));

    let truncated = render_alias_with(&input, "Many", NodeBuilderFlags::IN_TYPE_ALIAS);
    assert!(truncated.contains(" more ..."), "{truncated}");
    assert!(truncated.ends_with("\"member79\""), "{truncated}");

    let full = expand(&input, "Many");
    assert!(!full.contains("more"), "{full}");
    assert_eq!(full.matches(" | ").count(), 79);
}

#[test]
fn unreachable_named_types_need_fully_qualified_names() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import { Outer } from "./a";
            type X = Outer["inner"];
            "#},
        ),
        (
            "/p/a.ts",
            indoc! {r#"
            import { Inner } from "./models/inner";
            export type Outer = { inner: Inner };
            "#},
        ),
        ("/p/models/inner.ts", "export interface Inner { id: string }\n"),
    ];
    let (program, _) = program_with(&files, strict());
    let checker = program.checker();
    let file = source_id(&program, INDEX);
    let ty = alias_body(&checker, file, "X");

    assert!(checker.type_to_node(ty, NodeBuilderFlags::NONE, file).is_none());
    let qualified = checker
        .type_to_node(ty, NodeBuilderFlags::USE_FULLY_QUALIFIED_TYPE, file)
        .map(|node| print_type(&node));
    insta::assert_snapshot!(qualified.unwrap_or_default(), @r#"import("./models/inner").Inner"#);

    let from_a = source_id(&program, "/p/a.ts");
    insta::assert_snapshot!(checker.type_to_string(ty, from_a), @"Inner");
}

#[test]
fn namespace_imports_qualify_names() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import * as m from "./models";
            type Alias = m.User;
            type Picked = Pick<m.User, "id">;
            "#},
        ),
        ("/p/models.ts", "export interface User { id: string; name: string }\n"),
    ];
    let (program, _) = program_with(&files, strict());
    let checker = program.checker();
    let file = source_id(&program, INDEX);

    let user = alias_body(&checker, file, "Alias");
    insta::assert_snapshot!(checker.type_to_string(user, file), @"m.User");
    let picked = alias_body(&checker, file, "Picked");
    insta::assert_snapshot!(checker.type_to_string(picked, file), @r#"Pick<m.User, "id">"#);
}
