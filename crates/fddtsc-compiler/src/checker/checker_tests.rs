use indoc::indoc;

use crate::test_utils::{check, check_files, expand};

#[test]
fn clean_program_has_no_diagnostics() {
    let input = indoc! {r#"
    export interface Point { x: number; y: number }
    export type Pair<T> = [T, T];
    export type Line = Pair<Point>;
    "#};
    assert_eq!(check(input), "");
}

#[test]
fn unresolved_names() {
    let input = indoc! {r#"
    declare const v: number;
    export type A = Missing;
    export type B = v;
    "#};

    insta::assert_snapshot!(check(input), @r"
    Error /p/index.ts (2,17): Cannot find name 'Missing'.
    Error /p/index.ts (3,17): 'v' refers to a value, but is being used as a type here. Did you mean 'typeof v'?
    ");
}

#[test]
fn type_argument_counts() {
    let input = indoc! {r#"
    type Box<T> = { v: T };
    type P<A, B = 1> = [A, B];
    interface I {}
    export type X = Box;
    export type Y = P<1, 2, 3>;
    export type Z = I<string>;
    "#};

    insta::assert_snapshot!(check(input), @r"
    Error /p/index.ts (4,17): Generic type 'Box<T>' requires 1 type argument(s).
    Error /p/index.ts (5,17): Generic type 'P<A, B>' requires between 1 and 2 type argument(s).
    Error /p/index.ts (6,17): Type 'I' is not generic.
    ");
}

#[test]
fn constraints_are_checked() {
    let input = indoc! {r#"
    type Len<T extends string> = T;
    export type Ok = Len<"a">;
    export type Bad = Len<number>;
    "#};

    insta::assert_snapshot!(check(input), @"Error /p/index.ts (3,23): Type 'number' does not satisfy the constraint 'string'.");
}

#[test]
fn indexed_access_on_missing_property() {
    let input = indoc! {r#"
    interface P { x: number }
    export type X = P["x"];
    export type Y = P["y"];
    "#};

    insta::assert_snapshot!(check(input), @r#"Error /p/index.ts (3,19): Property 'y' does not exist on type 'P'."#);
}

#[test]
fn circular_alias() {
    insta::assert_snapshot!(
        check("export type Loop = Loop;\n"),
        @"Error /p/index.ts (1,13): Type alias 'Loop' circularly references itself."
    );
}

#[test]
fn implicit_any_parameters() {
    let input = "export declare function f(x, y: string): void;\n";
    insta::assert_snapshot!(check(input), @"Error /p/index.ts (1,27): Parameter 'x' implicitly has an 'any' type.");
}

#[test]
fn imports_must_resolve() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import { A, Nope } from "./a";
            import { B } from "./missing";
            export type T = A;
            "#},
        ),
        ("/p/a.ts", "export type A = 1;\n"),
    ];

    insta::assert_snapshot!(check_files(&files), @r#"
    Error /p/index.ts (1,13): Module '"./a"' has no exported member 'Nope'.
    Error /p/index.ts (2,19): Cannot find module './missing' or its corresponding type declarations.
    "#);
}

#[test]
fn distributive_conditionals() {
    let input = indoc! {r#"
    type R = Exclude<"a" | "b" | "c", "a">;
    type S = Extract<string | number | boolean, number | boolean>;
    type N = NonNullable<string | null | undefined>;
    "#};

    insta::assert_snapshot!(expand(input, "R"), @r#""b" | "c""#);
    insta::assert_snapshot!(expand(input, "S"), @"number | boolean");
    insta::assert_snapshot!(expand(input, "N"), @"string");
}

#[test]
fn infer_from_signatures() {
    let input = indoc! {r#"
    type R = ReturnType<() => number>;
    type A = ReturnType<(x: string) => Promise<string[]>>;
    type I = InstanceType<new (id: string) => { id: string }>;
    "#};

    insta::assert_snapshot!(expand(input, "R"), @"number");
    insta::assert_snapshot!(expand(input, "A"), @"Promise<string[]>");
    insta::assert_snapshot!(expand(input, "I"), @"{ id: string; }");
}

#[test]
fn infer_inside_object_and_method_types() {
    let input = indoc! {r#"
    type Field<T> = T extends { value: infer V } ? V : never;
    type F = Field<{ value: 1 }>;
    type P = Awaited<Promise<number>>;
    type N = Awaited<Promise<Promise<"x">>>;
    "#};

    insta::assert_snapshot!(expand(input, "F"), @"1");
    insta::assert_snapshot!(expand(input, "P"), @"number");
    insta::assert_snapshot!(expand(input, "N"), @r#""x""#);
}

#[test]
fn homomorphic_mapped_types() {
    let input = indoc! {r#"
    type P = Partial<{ a: string }>;
    type R = Readonly<{ a: string }>;
    type Q = Required<{ a?: string }>;
    "#};

    insta::assert_snapshot!(expand(input, "P"), @"{ a?: string | undefined; }");
    insta::assert_snapshot!(expand(input, "R"), @"{ readonly a: string; }");
    insta::assert_snapshot!(expand(input, "Q"), @"{ a: string; }");
}

#[test]
fn keys_and_indexed_access() {
    let input = indoc! {r#"
    type O = { a: 1; b: "x" };
    type K = keyof O;
    type V = O["b"];
    type All = O[keyof O];
    "#};

    insta::assert_snapshot!(expand(input, "K"), @r#""a" | "b""#);
    insta::assert_snapshot!(expand(input, "V"), @r#""x""#);
    insta::assert_snapshot!(expand(input, "All"), @r#"1 | "x""#);
}

#[test]
fn string_mappings() {
    let input = indoc! {r#"
    type U = Uppercase<"abc">;
    type C = Capitalize<"hello">;
    "#};

    insta::assert_snapshot!(expand(input, "U"), @r#""ABC""#);
    insta::assert_snapshot!(expand(input, "C"), @r#""Hello""#);
}
