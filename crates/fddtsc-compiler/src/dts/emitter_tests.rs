use indoc::indoc;

use crate::test_utils::{emit_files, emit_plain};

#[test]
fn declarations_lose_bodies_and_gain_declare() {
    let input = indoc! {r#"
    export type Id = string | number;
    export interface Point { x: number; readonly y?: string }
    export function f(a: number, b = 1): string { return "x"; }
    export const answer = 42;
    export let count = 0;
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    export type Id = string | number;
    export interface Point {
        x: number;
        readonly y?: string;
    }
    export declare function f(a: number, b?: number): string;
    export declare const answer = 42;
    export declare let count: number;
    ");
}

#[test]
fn const_literals_are_kept() {
    let input = indoc! {r#"
    export const s = 'hi';
    export const t = `x` as const;
    export const n = -1;
    export const big = 10n;
    export const yes = true;
    "#};

    insta::assert_snapshot!(emit_plain(input), @r#"
    export declare const s = "hi";
    export declare const t = "x";
    export declare const n = -1;
    export declare const big = 10n;
    export declare const yes = true;
    "#);
}

#[test]
fn unreachable_private_declarations_are_dropped() {
    let input = indoc! {r#"
    type Hidden = { a: 1 };
    type Used = { b: 2 };
    export type Shown = Used;
    function helper(): void {}
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    type Used = {
        b: 2;
    };
    export type Shown = Used;
    export {};
    ");
}

#[test]
fn computed_member_keys_keep_their_declarations() {
    let input = indoc! {r#"
    declare const brand: unique symbol;
    declare const unused: unique symbol;
    export type Tagged<N extends string> = { readonly [brand]: N };
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    declare const brand: unique symbol;
    export type Tagged<N extends string> = {
        readonly [brand]: N;
    };
    export {};
    ");
}

#[test]
fn heritage_keeps_base_interfaces() {
    let input = indoc! {r#"
    export interface Box<T extends object = {}> extends Base<T> { value: T }
    interface Base<T> { inner: T }
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    export interface Box<T extends object = {}> extends Base<T> {
        value: T;
    }
    interface Base<T> {
        inner: T;
    }
    export {};
    ");
}

#[test]
fn script_files_keep_everything() {
    let input = indoc! {r#"
    type A = 1;
    declare function f(): void;
    interface Empty {}
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    type A = 1;
    declare function f(): void;
    interface Empty {
    }
    ");
}

#[test]
fn missing_return_types_are_inferred_when_trivial() {
    let input = indoc! {r#"
    export function g() {}
    export async function h() { return; }
    export default function main(): number { return 0; }
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    export declare function g(): void;
    export declare function h(): Promise<void>;
    export default function main(): number;
    ");
}

#[test]
fn overload_implementations_are_dropped() {
    let input = indoc! {r#"
    export function p(x: string): string;
    export function p(x: number): number;
    export function p(x: any): any { return x; }
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    export declare function p(x: string): string;
    export declare function p(x: number): number;
    ");
}

#[test]
fn type_syntax_round_trips() {
    let input = indoc! {r#"
    export type M<T> = { readonly [K in keyof T]?: T[K] };
    export type C<T> = T extends (infer U)[] ? U : never;
    export type F = (a: string, ...rest: number[]) => void;
    export type Tup = [a: string, b?: number, ...c: boolean[]];
    export type Tpl = `x-${string}`;
    export type G = <T>(x: T) => x is T & {};
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    export type M<T> = {
        readonly [K in keyof T]?: T[K];
    };
    export type C<T> = T extends (infer U)[] ? U : never;
    export type F = (a: string, ...rest: number[]) => void;
    export type Tup = [a: string, b?: number, ...c: boolean[]];
    export type Tpl = `x-${string}`;
    export type G = <T>(x: T) => x is T & {};
    ");
}

#[test]
fn comments_are_preserved() {
    let input = indoc! {r#"
    /**
     * A point.
     */
    export interface P {
        /** x coordinate */
        x: number; // trailing
        y: number;
    }
    "#};

    insta::assert_snapshot!(emit_plain(input), @r"
    /**
     * A point.
     */
    export interface P {
        /** x coordinate */
        x: number;
        y: number;
    }
    ");
}

#[test]
fn unused_imports_are_elided() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import { A, B } from "./a";
            import * as ns from "./a";
            import "./side";
            export type X = A;
            "#},
        ),
        ("/p/a.ts", "export type A = 1;\nexport type B = 2;\n"),
        ("/p/side.ts", "export {};\n"),
    ];

    insta::assert_snapshot!(emit_files(&files), @r#"
    // /p/a.d.ts
    export type A = 1;
    export type B = 2;
    // /p/index.d.ts
    import { A } from "./a";
    import "./side";
    export type X = A;
    // /p/side.d.ts
    export {};
    "#);
}

#[test]
fn uninferable_declarations_are_reported() {
    let input = indoc! {r#"
    export function k() { return 1; }
    export const x = compute();
    "#};

    insta::assert_snapshot!(emit_files(&[("/p/index.ts", input)]), @r"
    Error /p/index.ts (1,17): Function must have an explicit return type annotation with --isolatedDeclarations.
    Error /p/index.ts (2,14): Variable must have an explicit type annotation with --isolatedDeclarations.
    (emit skipped)
    ");
}
