//! Unit tests for the line scanner.

use sql_doc_loader::scanner::{
    decode_ignoring_invalid, extract_rows, is_insert_line, split_fields, values_section, DumpLines,
};
use std::io::{BufReader, Cursor};

#[test]
fn test_two_tuples_on_one_line() {
    let rows = extract_rows("INSERT INTO t VALUES (1, 'a'), (2, 'b');");
    assert_eq!(rows, vec![vec!["1", "a"], vec!["2", "b"]]);
}

#[test]
fn test_line_without_marker() {
    assert!(extract_rows("CREATE TABLE t (id INT, name VARCHAR(10));").is_empty());
    assert!(extract_rows("insert into t values (1, 'a');").is_empty());
    assert!(!is_insert_line("-- dump of (t)"));
}

#[test]
fn test_marker_without_parenthesis() {
    let line = "INSERT INTO t SELECT * FROM other;";
    assert!(!is_insert_line(line));
    assert!(extract_rows(line).is_empty());
}

#[test]
fn test_marker_without_values_keyword() {
    let line = "INSERT INTO t (id, name) SELECT id, name FROM other;";
    assert!(is_insert_line(line));
    assert_eq!(values_section(line), None);
    assert!(extract_rows(line).is_empty());
}

#[test]
fn test_quoted_comma_splits_field() {
    let rows = extract_rows("INSERT INTO branches VALUES (7, 'Addis, Ababa', 'ET');");
    assert_eq!(rows, vec![vec!["7", "Addis", "Ababa", "ET"]]);
}

#[test]
fn test_quoted_paren_ends_row_early() {
    let rows = extract_rows("INSERT INTO notes VALUES (1, 'see (a) below'), (2, 'x');");
    assert_eq!(rows[0], vec!["1", "see (a"]);
}

#[test]
fn test_column_list_before_values_is_ignored() {
    let rows = extract_rows("INSERT INTO `users` (`id`, `name`) VALUES (1,'Alice'),(2,'Bob');\n");
    assert_eq!(rows, vec![vec!["1", "Alice"], vec!["2", "Bob"]]);
}

#[test]
fn test_only_first_values_section_used() {
    let line = "INSERT INTO t VALUES (1, 'VALUES'), (2, 'z');";
    assert_eq!(values_section(line), Some("(1, '"));
    assert!(extract_rows(line).is_empty());
}

#[test]
fn test_values_stay_untyped() {
    let rows = extract_rows("INSERT INTO acct VALUES (0012, NULL, 3.50, '2022-11-06 22:50:21');");
    assert_eq!(rows, vec![vec!["0012", "NULL", "3.50", "2022-11-06 22:50:21"]]);
}

#[test]
fn test_split_fields_strips_every_outer_quote() {
    assert_eq!(split_fields("  ''x''  ,'y'"), vec!["x", "y"]);
    assert_eq!(split_fields("'it''s'"), vec!["it''s"]);
}

#[test]
fn test_empty_group_yields_one_empty_field() {
    assert_eq!(split_fields(""), vec![""]);
    let rows = extract_rows("INSERT INTO t VALUES ();");
    assert_eq!(rows, vec![vec![""]]);
}

#[test]
fn test_decode_drops_invalid_bytes() {
    let bytes = b"INSERT INTO t VALUES (1, 'Ab\xffebe');";
    let text = decode_ignoring_invalid(bytes);
    assert_eq!(text, "INSERT INTO t VALUES (1, 'Abebe');");
    assert!(!text.contains('\u{FFFD}'));
}

#[test]
fn test_decode_keeps_valid_multibyte() {
    let text = decode_ignoring_invalid("ሰላም".as_bytes());
    assert_eq!(text, "ሰላም");
}

#[test]
fn test_decode_truncated_tail() {
    let text = decode_ignoring_invalid(b"abc\xe1\x88");
    assert_eq!(text, "abc");
}

#[test]
fn test_dump_lines_keeps_terminators() {
    let input = Cursor::new(b"first\nsecond\r\nlast".to_vec());
    let lines: Vec<String> = DumpLines::new(input).map(|l| l.unwrap()).collect();
    assert_eq!(lines, vec!["first\n", "second\r\n", "last"]);
}

#[test]
fn test_crlf_line_still_parses() {
    let rows = extract_rows("INSERT INTO t VALUES (1, 'a');\r\n");
    assert_eq!(rows, vec![vec!["1", "a"]]);
}

#[test]
fn test_bare_cr_ends_a_line() {
    let input = Cursor::new(
        b"INSERT INTO t VALUES (1,'a');\rINSERT INTO t VALUES (2,'b');\r".to_vec(),
    );
    let lines: Vec<String> = DumpLines::new(input).map(|l| l.unwrap()).collect();
    assert_eq!(
        lines,
        vec![
            "INSERT INTO t VALUES (1,'a');\r",
            "INSERT INTO t VALUES (2,'b');\r",
        ]
    );

    let rows: Vec<_> = lines.iter().flat_map(|l| extract_rows(l)).collect();
    assert_eq!(rows, vec![vec!["1", "a"], vec!["2", "b"]]);
}

#[test]
fn test_mixed_terminators() {
    let input = Cursor::new(b"a\rb\r\nc\n\rd".to_vec());
    let lines: Vec<String> = DumpLines::new(input).map(|l| l.unwrap()).collect();
    assert_eq!(lines, vec!["a\r", "b\r\n", "c\n", "\r", "d"]);
}

#[test]
fn test_crlf_split_across_reads() {
    // one byte per fill_buf, so `\r` and `\n` arrive in separate chunks
    let input = BufReader::with_capacity(1, Cursor::new(b"one\r\ntwo\rthree\r\n".to_vec()));
    let lines: Vec<String> = DumpLines::new(input).map(|l| l.unwrap()).collect();
    assert_eq!(lines, vec!["one\r\n", "two\r", "three\r\n"]);
}
