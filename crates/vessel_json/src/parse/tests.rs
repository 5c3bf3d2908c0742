use super::*;
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Value {
    match from_json(input) {
        Ok(value) => value,
        Err(err) => panic!("failed to parse {input:?}: {err}"),
    }
}

fn parse_err(input: &str) -> ParseError {
    match from_json(input) {
        Ok(value) => panic!("parsed {input:?} as {value:?}"),
        Err(err) => err,
    }
}

fn kind(input: &str) -> ParseErrorKind {
    parse_err(input).kind
}

fn list_of(items: &[Value]) -> Value {
    items.iter().cloned().collect()
}

// === Keywords and whitespace ===

#[test]
fn keywords() {
    assert_eq!(parse("null"), Value::NONE);
    assert_eq!(parse("true"), Value::TRUE);
    assert_eq!(parse("false"), Value::FALSE);
}

#[test]
fn surrounding_whitespace_is_skipped() {
    assert_eq!(parse("  \t\nnull\n"), Value::NONE);
    assert_eq!(parse(" \"test1\" "), Value::string("test1"));
    assert_eq!(parse("\r\n[ 1 ,\t2 ]\r\n"), list_of(&[Value::int(1), Value::int(2)]));
}

#[test]
fn misspelled_keywords_fail() {
    assert_eq!(kind("nul"), ParseErrorKind::InvalidLiteral);
    assert_eq!(kind("ture"), ParseErrorKind::InvalidLiteral);
    assert_eq!(kind("nullx"), ParseErrorKind::TrailingCharacters);
}

#[test]
fn empty_and_unknown_input_fails() {
    assert_eq!(kind(""), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("   "), ParseErrorKind::UnexpectedEof);
    assert_eq!(parse_err("?"), ParseError::new(ParseErrorKind::UnexpectedChar('?'), 0));
    assert_eq!(kind("'a'"), ParseErrorKind::UnexpectedChar('\''));
}

// === Numbers ===

#[test]
fn integers() {
    assert_eq!(parse("105"), Value::int(105));
    assert_eq!(parse("0"), Value::int(0));
    assert_eq!(parse("-0"), Value::int(0));
    assert_eq!(parse("-42"), Value::int(-42));
    assert_eq!(parse("9223372036854775807"), Value::int(i64::MAX));
    assert_eq!(parse("-9223372036854775808"), Value::int(i64::MIN));
}

#[test]
fn integer_overflow_is_out_of_range() {
    assert_eq!(
        parse_err("9223372036854775808"),
        ParseError::new(ParseErrorKind::NumberOutOfRange, 0)
    );
    assert_eq!(kind("-9223372036854775809"), ParseErrorKind::NumberOutOfRange);
}

#[test]
fn floats() {
    assert_eq!(parse("1.75"), Value::float(1.75));
    assert_eq!(parse("1e5"), Value::float(1e5));
    assert_eq!(parse("1E5"), Value::float(1e5));
    assert_eq!(parse("1e-2"), Value::float(0.01));
    assert_eq!(parse("1e+2"), Value::float(100.0));
    assert_eq!(parse("1.5e1"), Value::float(15.0));
    assert_eq!(parse("-0.5"), Value::float(-0.5));
    assert_eq!(parse("0.1"), Value::float(0.1));
}

#[test]
fn float_conversion_is_correctly_rounded() {
    assert_eq!(parse("0.10000000000000001"), Value::float(0.1));
    assert_eq!(parse("1.7976931348623157e+308"), Value::float(f64::MAX));
    assert_eq!(parse("4.9406564584124654e-324"), Value::float(5e-324));
}

#[test]
fn float_overflow_is_out_of_range() {
    assert_eq!(kind("1e400"), ParseErrorKind::NumberOutOfRange);
    assert_eq!(kind("-1e400"), ParseErrorKind::NumberOutOfRange);
}

#[test]
fn malformed_numbers() {
    assert_eq!(parse_err("1."), ParseError::new(ParseErrorKind::MissingFraction, 2));
    assert_eq!(kind("1.e5"), ParseErrorKind::MissingFraction);
    assert_eq!(parse_err("1e"), ParseError::new(ParseErrorKind::MissingExponent, 2));
    assert_eq!(kind("1e+"), ParseErrorKind::MissingExponent);
    assert_eq!(kind("-"), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("-a"), ParseErrorKind::UnexpectedChar('a'));
    assert_eq!(kind(".5"), ParseErrorKind::UnexpectedChar('.'));
}

#[test]
fn leading_zero_stands_alone() {
    assert_eq!(parse_err("01"), ParseError::new(ParseErrorKind::TrailingCharacters, 1));
    assert_eq!(kind("[01]"), ParseErrorKind::ExpectedCommaOrClose);
    assert_eq!(parse("0.01"), Value::float(0.01));
}

// === Strings ===

#[test]
fn plain_strings() {
    assert_eq!(parse("\"test\""), Value::string("test"));
    assert_eq!(parse("\"\""), Value::string(""));
    assert_eq!(parse("\"\u{e9}t\u{e9}\""), Value::string("\u{e9}t\u{e9}"));
}

#[test]
fn simple_escapes() {
    assert_eq!(
        parse(r#""\" \\ \/ \b \f \n \r \t""#),
        Value::string("\" \\ / \u{8} \u{c} \n \r \t")
    );
}

#[test]
fn unicode_escapes() {
    assert_eq!(parse(r#""\u0041\u00e9""#), Value::string("A\u{e9}"));
    assert_eq!(parse(r#""\u20AC""#), Value::string("\u{20AC}"));
    assert_eq!(parse(r#""\ud83d\ude00""#), Value::string("\u{1F600}"));
}

#[test]
fn bad_unicode_escapes() {
    assert_eq!(parse_err(r#""a\u0000""#), ParseError::new(ParseErrorKind::NulEscape, 2));
    assert_eq!(kind(r#""\u12""#), ParseErrorKind::InvalidUnicodeEscape);
    assert_eq!(kind(r#""\u12g4""#), ParseErrorKind::InvalidUnicodeEscape);
    assert_eq!(kind(r#""\u12"#), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind(r#""\ud83d""#), ParseErrorKind::LoneSurrogate);
    assert_eq!(kind(r#""\ud83dA""#), ParseErrorKind::LoneSurrogate);
    assert_eq!(kind(r#""\ude00""#), ParseErrorKind::LoneSurrogate);
}

#[test]
fn bad_escapes() {
    assert_eq!(
        parse_err(r#""ab\q""#),
        ParseError::new(ParseErrorKind::InvalidEscape('q'), 3)
    );
    assert_eq!(kind("\"\\"), ParseErrorKind::UnexpectedEof);
}

#[test]
fn unterminated_string_fails() {
    assert_eq!(kind("\"abc"), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("[\"abc]"), ParseErrorKind::UnexpectedEof);
}

#[test]
fn raw_control_characters_are_kept() {
    assert_eq!(parse("\"a\tb\nc\""), Value::string("a\tb\nc"));
}

// === Arrays ===

#[test]
fn arrays() {
    assert_eq!(parse("[]"), Value::list());
    assert_eq!(parse("[ ]"), Value::list());
    assert_eq!(
        parse("[null, null, null]"),
        list_of(&[Value::NONE, Value::NONE, Value::NONE])
    );
    assert_eq!(
        parse("[\"test\", null, null]"),
        list_of(&[Value::string("test"), Value::NONE, Value::NONE])
    );
    assert_eq!(parse("[[]]"), list_of(&[Value::list()]));
    assert_eq!(parse("[{}]"), list_of(&[Value::map()]));
}

#[test]
fn malformed_arrays() {
    assert_eq!(kind("["), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("[1"), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("[1,"), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("[1,]"), ParseErrorKind::UnexpectedChar(']'));
    assert_eq!(kind("[1 2]"), ParseErrorKind::ExpectedCommaOrClose);
    assert_eq!(kind("[1}"), ParseErrorKind::ExpectedCommaOrClose);
    assert_eq!(kind("[1]]"), ParseErrorKind::TrailingCharacters);
}

// === Objects ===

#[test]
fn objects() {
    assert_eq!(parse("{}"), Value::map());
    let value = parse("{\"hello\":\"world\", \"something\":null}");
    assert_eq!(value.map_length(), 2);
    assert_eq!(
        value.map_get(&Value::string("hello")),
        Some(Value::string("world"))
    );
    assert_eq!(value.map_get(&Value::string("something")), Some(Value::NONE));
}

#[test]
fn nested_objects() {
    let value = parse("{\"hello\":{\"something\":\"yeah\"}, \"num\":1.1}");
    let inner = value.map_get(&Value::string("hello")).unwrap_or_default();
    assert_eq!(
        inner.map_get(&Value::string("something")),
        Some(Value::string("yeah"))
    );
    assert_eq!(value.map_get(&Value::string("num")), Some(Value::float(1.1)));
}

#[test]
fn duplicate_keys_last_write_wins() {
    let value = parse("{\"k\":1,\"k\":2}");
    assert_eq!(value.map_length(), 1);
    assert_eq!(value.map_get(&Value::string("k")), Some(Value::int(2)));
}

#[test]
fn malformed_objects() {
    assert_eq!(kind("{"), ParseErrorKind::UnexpectedEof);
    assert_eq!(kind("{1:2}"), ParseErrorKind::ExpectedKey);
    assert_eq!(kind("{\"a\" 1}"), ParseErrorKind::ExpectedColon);
    assert_eq!(kind("{\"a\":}"), ParseErrorKind::UnexpectedChar('}'));
    assert_eq!(kind("{\"a\":1,}"), ParseErrorKind::ExpectedKey);
    assert_eq!(kind("{\"a\":1 \"b\":2}"), ParseErrorKind::ExpectedCommaOrClose);
    assert_eq!(kind("{\"a\":1"), ParseErrorKind::UnexpectedEof);
}

#[test]
fn failure_deep_inside_abandons_everything() {
    let err = parse_err("[{\"a\":[1,2,{\"b\":tru}]}]");
    assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
    assert_eq!(err.pos, 16);
}

// === Depth ===

#[test]
fn deep_nesting_parses() {
    let depth = 100_000;
    let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let value = parse(&input);
    let mut current = &value;
    let mut levels = 1;
    while let Some(inner) = current.as_list().and_then(|seq| seq.get(0)) {
        current = inner;
        levels += 1;
    }
    assert_eq!(levels, depth);
}
