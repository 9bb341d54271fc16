use super::*;

#[test]
fn test_gosub_returns_after_call() {
    let mut r = Session::new();
    r.enter("10 GOSUB 100");
    r.enter(r#"20 PRINT "BACK""#);
    r.enter("30 END");
    r.enter(r#"100 PRINT "SUB""#);
    r.enter("110 RETURN");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "SUB\nBACK\n");
}

#[test]
fn test_nested_gosub() {
    let mut r = Session::new();
    r.enter(r#"10 GOSUB 100: PRINT "C""#);
    r.enter("20 END");
    r.enter(r#"100 PRINT "A";: GOSUB 200: RETURN"#);
    r.enter(r#"200 PRINT "B";: RETURN"#);
    r.enter("RUN");
    assert_eq!(exec(&mut r), "ABC\n");
}

#[test]
fn test_return_without_gosub() {
    let mut r = Session::new();
    r.enter("RETURN");
    assert_eq!(exec(&mut r), "Error at 'RETURN': RETURN without GOSUB.\n");
    r.enter("10 RETURN");
    r.enter("RUN");
    assert_eq!(
        exec(&mut r),
        "[line 10] Error at 'RETURN': RETURN without GOSUB.\n"
    );
}

#[test]
fn test_missing_label() {
    let mut r = Session::new();
    r.enter("10 GOTO 50");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "[line 10] Error at 'GOTO': Invalid label.\n");
}

#[test]
fn test_immediate_gosub_into_program() {
    let mut r = Session::new();
    r.enter("10 END");
    r.enter(r#"100 PRINT "S""#);
    r.enter("110 RETURN");
    r.enter("RUN");
    r.enter(r#"GOSUB 100: PRINT "B""#);
    assert_eq!(exec(&mut r), "S\nB\n");
}

#[test]
fn test_on_selects_target() {
    let mut r = Session::new();
    r.enter("10 FOR I = 0 TO 3");
    r.enter("20 ON I GOSUB 100, 200");
    r.enter("30 NEXT");
    r.enter("40 END");
    r.enter(r#"100 PRINT "A";: RETURN"#);
    r.enter(r#"200 PRINT "B";: RETURN"#);
    r.enter("RUN");
    assert_eq!(exec(&mut r), "AB");
}

#[test]
fn test_on_goto() {
    let mut r = Session::new();
    r.enter("10 X = 2");
    r.enter("20 ON X GOTO 100, 200");
    r.enter(r#"30 PRINT "NONE": END"#);
    r.enter(r#"100 PRINT "ONE": END"#);
    r.enter(r#"200 PRINT "TWO""#);
    r.enter("RUN");
    assert_eq!(exec(&mut r), "TWO\n");
    r.enter("10 X = 5");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "NONE\n");
}

#[test]
fn test_return_stack_limit() {
    let mut r = Session::new();
    r.enter("10 GOSUB 10");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "[line 10] Error at 'GOSUB': Out of memory.\n");
}
