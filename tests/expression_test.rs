mod common;
use common::*;

#[test]
fn test_precedence() {
    let mut r = Session::new();
    r.enter("PRINT 1 + 2 * 3");
    assert_eq!(exec(&mut r), "7\n");
    r.enter("PRINT (1 + 2) * 3");
    assert_eq!(exec(&mut r), "9\n");
    r.enter("PRINT -2 * 3; 7 - 10");
    assert_eq!(exec(&mut r), "-6-3\n");
}

#[test]
fn test_left_assoc() {
    let mut r = Session::new();
    r.enter("PRINT 1.5 / 2 * 3");
    assert_eq!(exec(&mut r), "2.25\n");
    r.enter("PRINT 1.5 / (2.0 * 3)");
    assert_eq!(exec(&mut r), "0.25\n");
    r.enter("PRINT 10 - 4 - 3");
    assert_eq!(exec(&mut r), "3\n");
}

#[test]
fn test_division() {
    let mut r = Session::new();
    r.enter("PRINT 10 / 4; \" \"; 10.0 / 4");
    assert_eq!(exec(&mut r), "2 2.5\n");
    r.enter("PRINT 1 / 0");
    assert_eq!(exec(&mut r), "Error at '/': Division by zero.\n");
    r.enter("PRINT 1.0 / 0");
    assert_eq!(exec(&mut r), "inf\n");
}

#[test]
fn test_integer_overflow() {
    let mut r = Session::new();
    r.enter("PRINT 9223372036854775807 + 1");
    assert_eq!(exec(&mut r), "Error at '+': Overflow.\n");
    r.enter("PRINT 9223372036854775807 + 1.0");
    assert_eq!(exec(&mut r), "9223372036854776000\n");
}

#[test]
fn test_comparisons() {
    let mut r = Session::new();
    r.enter("PRINT 1 = 1; 1 <> 1; 2 < 3; 2 >= 3; 2 <= 2.0");
    assert_eq!(exec(&mut r), "-10-10-1\n");
    r.enter("PRINT 1 < 2 AND 3 < 4");
    assert_eq!(exec(&mut r), "-1\n");
}

#[test]
fn test_bitwise() {
    let mut r = Session::new();
    r.enter("PRINT 6 AND 3; 6 OR 3; 6 XOR 3; NOT 0");
    assert_eq!(exec(&mut r), "275-1\n");
    r.enter("PRINT NOT 1.5");
    assert_eq!(exec(&mut r), "Error at 'NOT': Operand must be an integer.\n");
    r.enter("PRINT 1.5 AND 1");
    assert_eq!(
        exec(&mut r),
        "Error at 'AND': Operator invalid for floating point operand.\n"
    );
}

#[test]
fn test_strings() {
    let mut r = Session::new();
    r.enter(r#"A$ = "AB": PRINT A$ + "CD"; A$ = "AB"; A$ <> "AB""#);
    assert_eq!(exec(&mut r), "ABCD-10\n");
    r.enter(r#"PRINT "A" < "B""#);
    assert_eq!(exec(&mut r), "Error at '<': Operator invalid for string operand.\n");
    r.enter(r#"PRINT "A" + 1"#);
    assert_eq!(exec(&mut r), "Error at '+': Type mismatch.\n");
}

#[test]
fn test_variable_types() {
    let mut r = Session::new();
    r.enter("A% = 2.9: B% = -2.9: C = 7: PRINT A%; B%; C / 2");
    assert_eq!(exec(&mut r), "2-23.5\n");
    r.enter("A$ = 1");
    assert_eq!(exec(&mut r), "Error at 'A$': Type mismatch.\n");
    r.enter("A% = 99999999999999999999.0");
    assert_eq!(exec(&mut r), "Error at 'A%': Overflow.\n");
    r.enter("PRINT D; D%; D$; \"|\"");
    assert_eq!(exec(&mut r), "00|\n");
}

#[test]
fn test_scan_and_parse_errors() {
    let mut r = Session::new();
    r.enter("PRINT @");
    assert_eq!(exec(&mut r), "[line 1] Error: Unexpected character.\n");
    r.enter("PRINT 1 +");
    assert_eq!(exec(&mut r), "Error at end: Expected expression\n");
    r.enter("PRINT (1");
    assert_eq!(exec(&mut r), "Error at end: Expect ')' after expression\n");
}
