use super::expect_errors;

#[test]
fn missing_type() {
    insta::assert_snapshot!(expect_errors("type A = ;"), @"Error test.ts (1,10): Type expected.");
}

#[test]
fn missing_member_separator() {
    insta::assert_snapshot!(
        expect_errors("interface I { a: string b: number }"),
        @"Error test.ts (1,25): ';' expected."
    );
}

#[test]
fn missing_variable_name() {
    insta::assert_snapshot!(expect_errors("const = 1;"), @"Error test.ts (1,7): Identifier expected.");
}

#[test]
fn classes_are_reported() {
    insta::assert_snapshot!(
        expect_errors("export class C { x = 1; }\ntype A = 1;"),
        @"Error test.ts (1,8): Classes are not supported in declaration sources."
    );
}

#[test]
fn unclosed_object_type() {
    insta::assert_snapshot!(
        expect_errors("type A = { a: 1;\n"),
        @"Error test.ts (2,1): '}' expected."
    );
}
