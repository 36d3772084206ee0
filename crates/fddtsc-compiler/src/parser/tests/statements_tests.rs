use indoc::indoc;

use super::expect_valid_cst;

#[test]
fn type_alias_with_type_params() {
    let input = indoc! {r#"
    export type A<T extends string = 'x'> = T | null;
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        KwExport "export"
        Ident "type"
        Name
          Ident "A"
        TypeParamList
          Lt "<"
          TypeParam
            Name
              Ident "T"
            Constraint
              KwExtends "extends"
              KeywordType
                Ident "string"
            DefaultType
              Equals "="
              LiteralType
                StringLiteral "'x'"
          Gt ">"
        Equals "="
        UnionType
          TypeRef
            EntityName
              Ident "T"
          Pipe "|"
          KeywordType
            KwNull "null"
        Semicolon ";"
    "#);
}

#[test]
fn interface_members() {
    let input = indoc! {r#"
    interface Point extends Base<number> {
        readonly x: number;
        y?: string,
        move(dx: number): void
        [key: string]: unknown;
        new (n: number): Point;
    }
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      InterfaceDecl
        Ident "interface"
        Name
          Ident "Point"
        HeritageClause
          KwExtends "extends"
          TypeRef
            EntityName
              Ident "Base"
            TypeArgList
              Lt "<"
              KeywordType
                Ident "number"
              Gt ">"
        ObjectType
          BraceOpen "{"
          PropertySig
            Ident "readonly"
            Name
              Ident "x"
            TypeAnnotation
              Colon ":"
              KeywordType
                Ident "number"
          Semicolon ";"
          PropertySig
            Name
              Ident "y"
            Question "?"
            TypeAnnotation
              Colon ":"
              KeywordType
                Ident "string"
          Comma ","
          MethodSig
            Name
              Ident "move"
            ParamList
              ParenOpen "("
              Param
                Name
                  Ident "dx"
                TypeAnnotation
                  Colon ":"
                  KeywordType
                    Ident "number"
              ParenClose ")"
            ReturnType
              Colon ":"
              KeywordType
                KwVoid "void"
          IndexSig
            BracketOpen "["
            Param
              Name
                Ident "key"
              TypeAnnotation
                Colon ":"
                KeywordType
                  Ident "string"
            BracketClose "]"
            TypeAnnotation
              Colon ":"
              KeywordType
                Ident "unknown"
          Semicolon ";"
          ConstructSig
            KwNew "new"
            ParamList
              ParenOpen "("
              Param
                Name
                  Ident "n"
                TypeAnnotation
                  Colon ":"
                  KeywordType
                    Ident "number"
              ParenClose ")"
            ReturnType
              Colon ":"
              TypeRef
                EntityName
                  Ident "Point"
          Semicolon ";"
          BraceClose "}"
    "#);
}

#[test]
fn function_overload_and_body() {
    let input = indoc! {r#"
    export function f(a: string): string;
    export function f(a: number = 1, ...rest: any[]): number {
        return { a }.a;
    }
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      FunctionDecl
        KwExport "export"
        KwFunction "function"
        Name
          Ident "f"
        ParamList
          ParenOpen "("
          Param
            Name
              Ident "a"
            TypeAnnotation
              Colon ":"
              KeywordType
                Ident "string"
          ParenClose ")"
        ReturnType
          Colon ":"
          KeywordType
            Ident "string"
        Semicolon ";"
      FunctionDecl
        KwExport "export"
        KwFunction "function"
        Name
          Ident "f"
        ParamList
          ParenOpen "("
          Param
            Name
              Ident "a"
            TypeAnnotation
              Colon ":"
              KeywordType
                Ident "number"
            Initializer
              Equals "="
              NumberLiteral "1"
          Comma ","
          Param
            DotDotDot "..."
            Name
              Ident "rest"
            TypeAnnotation
              Colon ":"
              ArrayType
                KeywordType
                  Ident "any"
                BracketOpen "["
                BracketClose "]"
          ParenClose ")"
        ReturnType
          Colon ":"
          KeywordType
            Ident "number"
        FunctionBody
          BraceOpen "{"
          KwReturn "return"
          BraceOpen "{"
          Ident "a"
          BraceClose "}"
          Dot "."
          Ident "a"
          Semicolon ";"
          BraceClose "}"
    "#);
}

#[test]
fn variable_statements_and_asi() {
    let input = indoc! {r#"
    const a = 1, b: string = "x";
    let c = -2
    var d
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      VariableStatement
        KwConst "const"
        VariableDecl
          Name
            Ident "a"
          Initializer
            Equals "="
            NumberLiteral "1"
        Comma ","
        VariableDecl
          Name
            Ident "b"
          TypeAnnotation
            Colon ":"
            KeywordType
              Ident "string"
          Initializer
            Equals "="
            StringLiteral "\"x\""
        Semicolon ";"
      VariableStatement
        Ident "let"
        VariableDecl
          Name
            Ident "c"
          Initializer
            Equals "="
            Minus "-"
            NumberLiteral "2"
      VariableStatement
        KwVar "var"
        VariableDecl
          Name
            Ident "d"
    "#);
}

#[test]
fn imports() {
    let input = indoc! {r#"
    import type { A, B as C } from "./a";
    import D, * as ns from "./b";
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      ImportDecl
        KwImport "import"
        Ident "type"
        ImportClause
          NamedImports
            BraceOpen "{"
            ImportSpecifier
              Name
                Ident "A"
            Comma ","
            ImportSpecifier
              Name
                Ident "B"
              Ident "as"
              Name
                Ident "C"
            BraceClose "}"
        Ident "from"
        ModuleSpecifier
          StringLiteral "\"./a\""
        Semicolon ";"
      ImportDecl
        KwImport "import"
        ImportClause
          Name
            Ident "D"
          Comma ","
          NamespaceImport
            Star "*"
            Ident "as"
            Name
              Ident "ns"
        Ident "from"
        ModuleSpecifier
          StringLiteral "\"./b\""
        Semicolon ";"
    "#);
}

#[test]
fn exports() {
    let input = indoc! {r#"
    export { A, C as default };
    export * as all from "./d";
    export default D;
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      ExportDecl
        KwExport "export"
        NamedExports
          BraceOpen "{"
          ExportSpecifier
            Name
              Ident "A"
          Comma ","
          ExportSpecifier
            Name
              Ident "C"
            Ident "as"
            Name
              KwDefault "default"
          BraceClose "}"
        Semicolon ";"
      ExportDecl
        KwExport "export"
        ExportStar
          Star "*"
          Ident "as"
          Name
            Ident "all"
        Ident "from"
        ModuleSpecifier
          StringLiteral "\"./d\""
        Semicolon ";"
      ExportAssignment
        KwExport "export"
        KwDefault "default"
        Initializer
          Ident "D"
        Semicolon ";"
    "#);
}

#[test]
fn expression_statements_are_kept_raw() {
    let input = indoc! {r#"
    declare const x: number;
    console.log(x)
    "#};

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      VariableStatement
        Ident "declare"
        KwConst "const"
        VariableDecl
          Name
            Ident "x"
          TypeAnnotation
            Colon ":"
            KeywordType
              Ident "number"
        Semicolon ";"
      ExpressionStmt
        Ident "console"
        Dot "."
        Ident "log"
        ParenOpen "("
        Ident "x"
        ParenClose ")"
    "#);
}

#[test]
fn trivia_stays_outside_declarations() {
    let input = indoc! {r#"
    //! fddtsc::bake
    type A = 1;
    "#};

    let mut sources = crate::source_map::SourceMap::new();
    let id = sources.add(crate::source_map::SourceKind::Module, "test.ts", input);
    let (parse, _) = crate::parser::parse(input, id).unwrap();
    insta::assert_snapshot!(parse.dump_cst(true), @r#"
    Root
      LineComment "//! fddtsc::bake"
      Newline "\n"
      TypeAliasDecl
        Ident "type"
        Whitespace " "
        Name
          Ident "A"
        Whitespace " "
        Equals "="
        Whitespace " "
        LiteralType
          NumberLiteral "1"
        Semicolon ";"
      Newline "\n"
    "#);
}
