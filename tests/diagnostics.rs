use mal::error::{Error, SyntaxError};
use mal::runtime::Runtime;

#[test]
fn unterminated_list_reports_the_opening_paren() {
    let runtime = Runtime::new();
    let error = runtime.rep("(1 2").unwrap_err();

    assert_eq!(error.span, Some(0..1));
    match error.error {
        Error::SyntaxError(SyntaxError::UnbalancedDelimiter { delimiter, expected, .. }) => {
            assert_eq!(delimiter, '(');
            assert_eq!(expected, ')');
        }
        other => panic!("Expected unbalanced delimiter, got {:?}", other),
    }
}

#[test]
fn syntax_errors_render_with_a_caret() {
    let runtime = Runtime::new();
    let error = runtime.rep("(+ 1 \"abc").unwrap_err();

    assert!(matches!(error.error, Error::SyntaxError(SyntaxError::UnterminatedString { .. })));
    let rendered = error.format_error();
    assert!(rendered.starts_with("Error at (1:6)\n(+ 1 \"abc\n     ^^^^"), "{}", rendered);
}

#[test]
fn stray_closing_delimiter() {
    let error = Runtime::new().rep(")").unwrap_err();
    assert_eq!(error.span, Some(0..1));
    assert_eq!(
        error.error,
        Error::SyntaxError(SyntaxError::UnexpectedDelimiter { delimiter: ')' })
    );
}

#[test]
fn undefined_symbol_is_a_lookup_error() {
    let error = Runtime::new().rep("(foo)").unwrap_err();

    assert_eq!(error.error, Error::LookupError("foo".to_string()));
    assert_eq!(error.span, None);
    assert_eq!(error.format_error(), "Error: Lookup error: 'foo' not found");
}

#[test]
fn special_form_shape_errors() {
    let runtime = Runtime::new();
    for input in ["(if)", "(def! 1 2)", "(let* [a 1] a)", "(fn* (1) 1)"] {
        match runtime.rep(input).unwrap_err().error {
            Error::ShapeError(_) => {}
            other => panic!("Expected shape error for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn calling_a_non_function() {
    match Runtime::new().rep("(1 2)").unwrap_err().error {
        Error::NotCallableError(_) => {}
        other => panic!("Expected not callable, got {:?}", other),
    }
}

#[test]
fn arity_mismatch_is_a_binding_error() {
    let runtime = Runtime::new();
    runtime.rep("(def! f (fn* (a b) a))").unwrap();
    match runtime.rep("(f 1)").unwrap_err().error {
        Error::BindingError(_) => {}
        other => panic!("Expected binding error, got {:?}", other),
    }
}

#[test]
fn bad_operands_are_rejected() {
    let runtime = Runtime::new();
    for input in ["(+ 1 :a)", "(/ 1 0)", "(+ 1)", "(* 9223372036854775807 2)"] {
        match runtime.rep(input).unwrap_err().error {
            Error::OperandError(_) => {}
            other => panic!("Expected operand error for {}, got {:?}", input, other),
        }
    }
}
