use super::*;

fn kinds(s: &str) -> Vec<Kind> {
    let (tokens, errors) = lex(s, &extensions());
    assert!(errors.is_empty(), "{:?}", errors);
    tokens.iter().map(|t| t.kind).collect()
}

fn lex_errors(s: &str) -> Vec<String> {
    let (_, errors) = lex(s, &extensions());
    errors.iter().map(|e| e.to_string()).collect()
}

#[test]
fn test_keywords_ignore_case() {
    use Kind::*;
    assert_eq!(
        kinds("10 for i=1 To 3 step 2"),
        vec![Number, For, Identifier, Equal, Number, To, Number, Step, Number, Eof]
    );
    let (tokens, _) = lex("goSub 100", &extensions());
    assert_eq!(&*tokens[0].lexeme, "GOSUB");
}

#[test]
fn test_host_keywords() {
    use Kind::*;
    assert_eq!(kinds("print a$"), vec![Print, Identifier, Eof]);
    assert_eq!(kinds("input x"), vec![Statement, Identifier, Eof]);
    let (tokens, _) = lex("print a$", &Extensions::new());
    assert_eq!(tokens[0].kind, Identifier);
}

#[test]
fn test_identifier_suffix() {
    let (tokens, _) = lex("a% = b$ + c_1", &extensions());
    let lexemes: Vec<&str> = tokens.iter().map(|t| &*t.lexeme).collect();
    assert_eq!(lexemes, vec!["A%", "=", "B$", "+", "C_1", ""]);
}

#[test]
fn test_numbers() {
    let (tokens, _) = lex("12 1.5 3.", &extensions());
    assert_eq!(tokens[0].literal, Literal::Integer(12));
    assert_eq!(tokens[1].literal, Literal::Float(1.5));
    assert_eq!(tokens[2].literal, Literal::Integer(3));
    assert_eq!(tokens[3].kind, Kind::Dot);
}

#[test]
fn test_strings_keep_case() {
    let (tokens, _) = lex("print \"Hello\"", &extensions());
    assert_eq!(&*tokens[1].lexeme, "\"Hello\"");
    assert_eq!(tokens[1].literal, Literal::String("Hello".into()));
}

#[test]
fn test_operators() {
    use Kind::*;
    assert_eq!(
        kinds("<> <= >= < > = ( ) ; :"),
        vec![
            NotEqual,
            LessEqual,
            GreaterEqual,
            Less,
            Greater,
            Equal,
            LeftParen,
            RightParen,
            Semicolon,
            Colon,
            Eof
        ]
    );
}

#[test]
fn test_comments() {
    use Kind::*;
    assert_eq!(kinds("a=1 ' nothing: here"), vec![Identifier, Equal, Number, Eof]);
    let (tokens, _) = lex("10 REM  Hello: World\n20 END", &extensions());
    assert_eq!(tokens[1].kind, Rem);
    assert_eq!(tokens[2].kind, Comment);
    assert_eq!(tokens[2].literal, Literal::String("Hello: World".into()));
    assert_eq!(tokens[3].kind, NewLine);
    assert_eq!(tokens[5].line, 2);
}

#[test]
fn test_data() {
    use Kind::*;
    let (tokens, errors) = lex("DATA 1, \"Two, too\" ,three four :print", &extensions());
    assert!(errors.is_empty());
    let k: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        k,
        vec![Data, DataLiteral, Comma, DataLiteral, Comma, DataLiteral, Colon, Print, Eof]
    );
    assert_eq!(tokens[1].literal, Literal::String("1".into()));
    assert_eq!(tokens[3].literal, Literal::String("Two, too".into()));
    assert_eq!(tokens[5].literal, Literal::String("three four".into()));
}

#[test]
fn test_errors_do_not_stop_scan() {
    assert_eq!(lex_errors("a = @ + 1"), vec!["[line 1] Error: Unexpected character."]);
    assert_eq!(lex_errors("print \"abc"), vec!["[line 1] Error: Unterminated string"]);
    assert_eq!(
        lex_errors("x\n99999999999999999999"),
        vec!["[line 2] Error: Number too large."]
    );
    let (tokens, _) = lex("a = @ + 1", &extensions());
    assert_eq!(tokens.len(), 5);
}
