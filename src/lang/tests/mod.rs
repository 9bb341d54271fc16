use super::token::{Extension, Kind, Literal};
use super::*;

mod lex_test;

fn extensions() -> Extensions {
    let mut ext = Extensions::new();
    ext.insert("PRINT".to_string(), Extension::Output);
    ext.insert("INPUT".to_string(), Extension::Generic);
    ext
}

fn grammar() -> Grammar {
    let mut g = Grammar::new();
    g.add_output("PRINT").unwrap();
    g.add_generic("INPUT", &["I", "O;I", "O,I"]).unwrap();
    g.add_generic("CLS", &[""]).unwrap();
    g
}
