use super::expect_valid_cst;

#[test]
fn conditional_with_infer_in_template() {
    let input = "type F<T> = T extends `${infer H}.${string}` ? H : never;";

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        Ident "type"
        Name
          Ident "F"
        TypeParamList
          Lt "<"
          TypeParam
            Name
              Ident "T"
          Gt ">"
        Equals "="
        ConditionalType
          TypeRef
            EntityName
              Ident "T"
          KwExtends "extends"
          TemplateLiteralType
            TemplateHead "`${"
            TemplateSpan
              InferType
                Ident "infer"
                TypeParam
                  Name
                    Ident "H"
              TemplateMiddle "}.${"
            TemplateSpan
              KeywordType
                Ident "string"
              TemplateTail "}`"
          Question "?"
          TypeRef
            EntityName
              Ident "H"
          Colon ":"
          KeywordType
            Ident "never"
        Semicolon ";"
    "#);
}

#[test]
fn mapped_type_with_modifiers_and_as_clause() {
    let input = "type M<T> = { readonly [K in keyof T as `get${K & string}`]-?: T[K] };";

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        Ident "type"
        Name
          Ident "M"
        TypeParamList
          Lt "<"
          TypeParam
            Name
              Ident "T"
          Gt ">"
        Equals "="
        MappedType
          BraceOpen "{"
          Ident "readonly"
          BracketOpen "["
          MappedTypeParam
            Name
              Ident "K"
            KwIn "in"
            TypeOperator
              Ident "keyof"
              TypeRef
                EntityName
                  Ident "T"
            Ident "as"
            TemplateLiteralType
              TemplateHead "`get${"
              TemplateSpan
                IntersectionType
                  TypeRef
                    EntityName
                      Ident "K"
                  Amp "&"
                  KeywordType
                    Ident "string"
                TemplateTail "}`"
          BracketClose "]"
          Minus "-"
          Question "?"
          TypeAnnotation
            Colon ":"
            IndexedAccessType
              TypeRef
                EntityName
                  Ident "T"
              BracketOpen "["
              TypeRef
                EntityName
                  Ident "K"
              BracketClose "]"
          BraceClose "}"
        Semicolon ";"
    "#);
}

#[test]
fn function_type_with_tuple_rest_and_predicate() {
    let input = "type G = (a: string, ...b: [x: number, y?: string, ...rest: boolean[]]) => a is string;";

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        Ident "type"
        Name
          Ident "G"
        Equals "="
        FunctionType
          ParamList
            ParenOpen "("
            Param
              Name
                Ident "a"
              TypeAnnotation
                Colon ":"
                KeywordType
                  Ident "string"
            Comma ","
            Param
              DotDotDot "..."
              Name
                Ident "b"
              TypeAnnotation
                Colon ":"
                TupleType
                  BracketOpen "["
                  NamedTupleMember
                    Name
                      Ident "x"
                    Colon ":"
                    KeywordType
                      Ident "number"
                  Comma ","
                  NamedTupleMember
                    Name
                      Ident "y"
                    Question "?"
                    Colon ":"
                    KeywordType
                      Ident "string"
                  Comma ","
                  NamedTupleMember
                    DotDotDot "..."
                    Name
                      Ident "rest"
                    Colon ":"
                    ArrayType
                      KeywordType
                        Ident "boolean"
                      BracketOpen "["
                      BracketClose "]"
                  BracketClose "]"
            ParenClose ")"
          ReturnType
            Arrow "=>"
            TypePredicate
              Name
                Ident "a"
              Ident "is"
              KeywordType
                Ident "string"
        Semicolon ";"
    "#);
}

#[test]
fn leading_separators_and_qualified_names() {
    let input = "type U = | F.newtype<\"uint\"> & -1 | typeof x;";

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        Ident "type"
        Name
          Ident "U"
        Equals "="
        UnionType
          Pipe "|"
          IntersectionType
            TypeRef
              EntityName
                Ident "F"
                Dot "."
                Ident "newtype"
              TypeArgList
                Lt "<"
                LiteralType
                  StringLiteral "\"uint\""
                Gt ">"
            Amp "&"
            LiteralType
              Minus "-"
              NumberLiteral "1"
          Pipe "|"
          TypeQuery
            KwTypeof "typeof"
            EntityName
              Ident "x"
        Semicolon ";"
    "#);
}

#[test]
fn line_break_ends_postfix_type() {
    let input = "type A = string\n[];";

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        Ident "type"
        Name
          Ident "A"
        Equals "="
        KeywordType
          Ident "string"
      ExpressionStmt
        BracketOpen "["
        BracketClose "]"
        Semicolon ";"
    "#);
}

#[test]
fn nested_conditional_in_false_branch() {
    let input = "type C<T> = T extends string ? 1 : T extends number ? 2 : 3;";

    insta::assert_snapshot!(expect_valid_cst(input), @r#"
    Root
      TypeAliasDecl
        Ident "type"
        Name
          Ident "C"
        TypeParamList
          Lt "<"
          TypeParam
            Name
              Ident "T"
          Gt ">"
        Equals "="
        ConditionalType
          TypeRef
            EntityName
              Ident "T"
          KwExtends "extends"
          KeywordType
            Ident "string"
          Question "?"
          LiteralType
            NumberLiteral "1"
          Colon ":"
          ConditionalType
            TypeRef
              EntityName
                Ident "T"
            KwExtends "extends"
            KeywordType
              Ident "number"
            Question "?"
            LiteralType
              NumberLiteral "2"
            Colon ":"
            LiteralType
              NumberLiteral "3"
        Semicolon ";"
    "#);
}
