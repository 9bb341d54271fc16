use super::*;

#[test]
fn test_read_by_variable_type() {
    let mut r = Session::new();
    r.enter(r#"10 DATA 1, 2.5, HELLO, "A, B""#);
    r.enter("20 READ A%, B, C$, D$");
    r.enter("30 PRINT A%; B; C$; D$");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "12.5HELLOA, B\n");
}

#[test]
fn test_data_in_line_order() {
    let mut r = Session::new();
    r.enter("10 READ A, B");
    r.enter("20 PRINT A; B");
    r.enter("40 DATA 8");
    r.enter("30 DATA 7");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "78\n");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "78\n");
}

#[test]
fn test_out_of_data() {
    let mut r = Session::new();
    r.enter("10 DATA 1");
    r.enter("20 READ A, B");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "[line 20] Error at 'B': Out of data.\n");
}

#[test]
fn test_data_type_mismatch() {
    let mut r = Session::new();
    r.enter("10 DATA X");
    r.enter("20 READ A%");
    r.enter("RUN");
    assert_eq!(
        exec(&mut r),
        "[line 20] Error at 'A%': Type mismatch reading data 'X'.\n"
    );
}
