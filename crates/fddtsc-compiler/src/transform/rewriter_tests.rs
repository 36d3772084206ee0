use indoc::indoc;

use super::markers::{Marker, MarkerSet, has_marker};
use crate::test_utils::{emit_dts, emit_files, emit_plain};

#[test]
fn sentinels_match_whole_comments_only() {
    let markers = MarkerSet::default();
    let comments = |texts: &[&str]| texts.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    assert!(markers.is_marked(&comments(&["  //! fddtsc::bake "]), Marker::Bake));
    assert!(!markers.is_marked(&comments(&["//! fddtsc::baked"]), Marker::Bake));
    assert!(!markers.is_marked(&comments(&["// fddtsc::bake"]), Marker::Bake));
    assert!(!markers.is_marked(&comments(&["/* //! fddtsc::bake */"]), Marker::Bake));
    assert!(markers.is_marked(&comments(&["/** doc */", "//! fddtsc::unwrap"]), Marker::Unwrap));
    assert!(!has_marker(&[], "//! fddtsc::newtype"));

    let custom = MarkerSet::new("acme");
    assert_eq!(custom.sentinel(Marker::Newtype), "//! acme::newtype");
    assert!(!custom.is_marked(&comments(&["//! fddtsc::newtype"]), Marker::Newtype));
}

#[test]
fn bake_expands_the_alias_body() {
    let input = indoc! {r#"
    export interface Point { x: number; y: string }
    //! fddtsc::bake
    export type JustX = Pick<Point, "x">;
    export type Lazy = Pick<Point, "y">;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r#"
    export interface Point {
        x: number;
        y: string;
    }
    //! fddtsc::bake
    export type JustX = {
        x: number;
    };
    export type Lazy = Pick<Point, "y">;
    "#);
}

#[test]
fn newtype_references_become_unknown() {
    let input = indoc! {r#"
    //! fddtsc::newtype
    export type UserId = string & { readonly __brand: "UserId" };
    export interface User {
        id: UserId;
        friends: UserId[];
    }
    export declare function find(id: UserId): User | undefined;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r#"
    //! fddtsc::newtype
    export type UserId = string & {
        readonly __brand: "UserId";
    };
    export interface User {
        id: unknown;
        friends: unknown[];
    }
    export declare function find(id: unknown): User | undefined;
    "#);
}

#[test]
fn unwrap_references_become_their_first_argument() {
    let input = indoc! {r#"
    //! fddtsc::unwrap
    export type Boxed<T> = { inner: T } | T;
    export type Value = Boxed<number>;
    export type Nested = Array<Boxed<string>>;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! fddtsc::unwrap
    export type Boxed<T> = {
        inner: T;
    } | T;
    export type Value = number;
    export type Nested = Array<string>;
    ");
}

#[test]
fn unwrap_without_arguments_leaves_the_reference() {
    let input = indoc! {r#"
    //! fddtsc::unwrap
    export type Maybe<T = string> = T | null;
    export type A = Maybe;
    export type B = Maybe<boolean>;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! fddtsc::unwrap
    export type Maybe<T = string> = T | null;
    export type A = Maybe;
    export type B = boolean;
    ");
}

#[test]
fn replacements_are_not_revisited() {
    let input = indoc! {r#"
    //! fddtsc::unwrap
    export type Boxed<T> = { inner: T } | T;
    export type Twice = Boxed<Boxed<number>>;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! fddtsc::unwrap
    export type Boxed<T> = {
        inner: T;
    } | T;
    export type Twice = Boxed<number>;
    ");
}

#[test]
fn arguments_of_unmarked_references_are_visited() {
    let input = indoc! {r#"
    //! fddtsc::newtype
    export type Secret = { readonly value: string };
    export type Pair<A, B> = { first: A; second: B };
    export type Held = Pair<Secret, number>;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! fddtsc::newtype
    export type Secret = {
        readonly value: string;
    };
    export type Pair<A, B> = {
        first: A;
        second: B;
    };
    export type Held = Pair<unknown, number>;
    ");
}

#[test]
fn markers_on_imported_aliases_apply() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import { Token } from "./token";
            export type Tokens = Token[];
            export declare function issue(): Token;
            "#},
        ),
        (
            "/p/token.ts",
            indoc! {r#"
            /** Opaque session token. */
            //! fddtsc::newtype
            export type Token = { readonly raw: string };
            "#},
        ),
    ];

    insta::assert_snapshot!(emit_files(&files), @r#"
    // /p/index.d.ts
    import { Token } from "./token";
    export type Tokens = unknown[];
    export declare function issue(): unknown;
    // /p/token.d.ts
    /** Opaque session token. */
    //! fddtsc::newtype
    export type Token = {
        readonly raw: string;
    };
    "#);
}

#[test]
fn newtype_wins_over_unwrap() {
    let input = indoc! {r#"
    //! fddtsc::unwrap
    //! fddtsc::newtype
    export type Both<T> = { value: T } | T;
    export type Used = Both<number>;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! fddtsc::unwrap
    //! fddtsc::newtype
    export type Both<T> = {
        value: T;
    } | T;
    export type Used = unknown;
    ");
}

#[test]
fn other_namespaces_are_ignored() {
    let input = indoc! {r#"
    //! acme::newtype
    export type Id = { id: string };
    export type Ids = Id[];
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! acme::newtype
    export type Id = {
        id: string;
    };
    export type Ids = Id[];
    ");
}

#[test]
fn lookalike_aliases_keep_their_names() {
    let input = indoc! {r#"
    //! fddtsc::newtype
    export type Meters = { readonly unit: "m" };
    export type Metres = { readonly unit: "m" };
    export declare function convert(from: Meters): Metres;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r#"
    //! fddtsc::newtype
    export type Meters = {
        readonly unit: "m";
    };
    export type Metres = {
        readonly unit: "m";
    };
    export declare function convert(from: unknown): Metres;
    "#);
}

#[test]
fn unmarked_files_emit_unchanged() {
    let input = indoc! {r#"
    /** Shapes. */
    export interface Shape { kind: "circle" | "square"; size: number }
    export type Wrapped<T> = { value: T };
    export type Shapes = Wrapped<Shape>[];
    export declare function area(shape: Shape): number;
    export const unit = "cm";
    "#};

    assert_eq!(emit_dts(input), emit_plain(input));
}

#[test]
fn near_miss_sentinels_leave_the_output_alone() {
    let input = indoc! {r#"
    export interface Point { x: number; y: string }
    // fddtsc::bake
    export type A = Pick<Point, "x">;
    //! fddtsc::baked
    export type B = Pick<Point, "y">;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r#"
    export interface Point {
        x: number;
        y: string;
    }
    // fddtsc::bake
    export type A = Pick<Point, "x">;
    //! fddtsc::baked
    export type B = Pick<Point, "y">;
    "#);
}

#[test]
fn bake_resolves_builtin_conditionals() {
    let input = indoc! {r#"
    //! fddtsc::bake
    export type R = ReturnType<(x: string) => number>;
    "#};

    insta::assert_snapshot!(emit_dts(input), @r"
    //! fddtsc::bake
    export type R = number;
    ");
}

#[test]
fn unwritable_bake_keeps_the_alias() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import { Wrap } from "./lib";
            //! fddtsc::bake
            export type Baked = Wrap;
            "#},
        ),
        (
            "/p/lib.ts",
            indoc! {r#"
            interface Secret { v: string }
            export type Wrap = { s: Secret };
            "#},
        ),
    ];

    let out = emit_files(&files);
    let index = out
        .split("// /p/")
        .find(|part| part.starts_with("index.d.ts"))
        .unwrap_or_default();
    assert!(
        index.contains("//! fddtsc::bake\nexport type Baked = Wrap;\n"),
        "{out}"
    );
    assert!(!index.contains("Secret"), "{out}");
}
