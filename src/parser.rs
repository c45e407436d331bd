// ABOUTME: Parser module for parsing Scheme expressions using nom combinators

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0, multispace1, one_of},
    combinator::{map, opt, value},
    IResult, Parser,
};

use crate::error::LispError;
use crate::number::bigint_to_f64;
use crate::value::Value;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use std::rc::Rc;

const SYMBOL_CHARS: &str = "!$%&|*+-/:<=>?@^_~";

fn is_symbol_char(c: char) -> bool {
    SYMBOL_CHARS.contains(c)
}

fn is_atom_start(c: char) -> bool {
    c.is_ascii_alphabetic() || is_symbol_char(c)
}

fn is_atom_cont(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_ascii_digit() || is_symbol_char(c)
}

fn not_followed_by_atom_cont(rest: &str) -> bool {
    !rest.chars().next().map(is_atom_cont).unwrap_or(false)
}

// ---------------------------------------------------------------------
// atom / string
// ---------------------------------------------------------------------

fn parse_atom(input: &str) -> IResult<&str, Value> {
    let (input, first) = nom::character::complete::satisfy(is_atom_start)(input)?;
    let (input, rest) = take_while(is_atom_cont)(input)?;
    let mut s = String::with_capacity(rest.len() + 1);
    s.push(first);
    s.push_str(rest);
    Ok((input, Value::Symbol(s)))
}

fn parse_string(input: &str) -> IResult<&str, Value> {
    let (mut rest, _) = char('"')(input)?;
    let mut result = String::new();
    loop {
        match rest.chars().next() {
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    rest,
                    nom::error::ErrorKind::Eof,
                )))
            }
            Some('"') => {
                rest = &rest[1..];
                break;
            }
            Some('\\') => {
                let after = &rest[1..];
                match after.chars().next() {
                    Some(e @ ('\\' | '"' | 'n' | 't' | 'r')) => {
                        result.push(match e {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                        rest = &after[1..];
                    }
                    _ => {
                        return Err(nom::Err::Error(nom::error::Error::new(
                            rest,
                            nom::error::ErrorKind::EscapedTransform,
                        )))
                    }
                }
            }
            Some(c) => {
                result.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Ok((rest, Value::String(result)))
}

// ---------------------------------------------------------------------
// quote / quasiquote / unquote
// ---------------------------------------------------------------------

fn parse_quote(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('\'')(input)?;
    let (input, expr) = parse_expr(input)?;
    Ok((input, Value::List(vec![Value::Symbol("quote".to_string()), expr])))
}

fn parse_quasiquote(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('`')(input)?;
    let (input, expr) = parse_expr(input)?;
    Ok((
        input,
        Value::List(vec![Value::Symbol("quasiquote".to_string()), expr]),
    ))
}

fn parse_unquote(input: &str) -> IResult<&str, Value> {
    let (input, _) = char(',')(input)?;
    let (input, expr) = parse_expr(input)?;
    Ok((input, Value::List(vec![Value::Symbol("unquote".to_string()), expr])))
}

// ---------------------------------------------------------------------
// bool / char
// ---------------------------------------------------------------------

fn parse_bool(input: &str) -> IResult<&str, Value> {
    let (rest, v) = alt((
        value(Value::Bool(true), tag("#t")),
        value(Value::Bool(false), tag("#f")),
    ))
    .parse(input)?;
    if not_followed_by_atom_cont(rest) {
        Ok((rest, v))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify)))
    }
}

fn parse_char(input: &str) -> IResult<&str, Value> {
    let (input, _) = tag("#\\")(input)?;

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("space")(input) {
        if not_followed_by_atom_cont(rest) {
            return Ok((rest, Value::Char(' ')));
        }
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("newline")(input) {
        if not_followed_by_atom_cont(rest) {
            return Ok((rest, Value::Char('\n')));
        }
    }

    let mut chars = input.chars();
    let c = chars
        .next()
        .ok_or_else(|| nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Eof)))?;
    let rest = chars.as_str();
    if not_followed_by_atom_cont(rest) {
        Ok((rest, Value::Char(c)))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char)))
    }
}

// ---------------------------------------------------------------------
// numeric tower: #b/#o/#x/#d prefixes, integer, float, ratio, complex
// ---------------------------------------------------------------------

fn bigint_radix(digits: &str, radix: u32) -> BigInt {
    BigInt::parse_bytes(digits.as_bytes(), radix).expect("digit charset pre-validated by caller")
}

fn parse_radix_integer(input: &str) -> IResult<&str, Value> {
    alt((
        map(
            nom::sequence::preceded(tag("#b"), take_while1(|c: char| c == '0' || c == '1')),
            |s: &str| Value::Integer(bigint_radix(s, 2)),
        ),
        map(
            nom::sequence::preceded(tag("#o"), take_while1(|c: char| ('0'..='7').contains(&c))),
            |s: &str| Value::Integer(bigint_radix(s, 8)),
        ),
        map(
            nom::sequence::preceded(tag("#x"), take_while1(|c: char| c.is_ascii_hexdigit())),
            |s: &str| Value::Integer(bigint_radix(s, 16)),
        ),
    ))
    .parse(input)
}

fn parse_float_str(input: &str) -> IResult<&str, f64> {
    let (input, int_part) = digit1(input)?;
    let (input, _) = char('.')(input)?;
    let (input, frac_part) = digit1(input)?;
    let f: f64 = format!("{}.{}", int_part, frac_part)
        .parse()
        .expect("digit1 guarantees a valid float literal");
    Ok((input, f))
}

fn parse_complex_suffix(input: &str) -> IResult<&str, f64> {
    let (input, sign) = one_of("+-")(input)?;
    let (input, mag) = alt((parse_float_str, map(digit1, |s: &str| s.parse::<f64>().unwrap()))).parse(input)?;
    let (input, _) = char('i')(input)?;
    Ok((input, if sign == '-' { -mag } else { mag }))
}

fn parse_ratio(input: &str) -> IResult<&str, Value> {
    let (input, n) = digit1(input)?;
    let (input, _) = char('/')(input)?;
    let (input, d) = digit1(input)?;
    let num = bigint_radix(n, 10);
    let den = bigint_radix(d, 10);
    if den.is_zero() {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify)));
    }
    Ok((input, Value::Ratio(BigRational::new(num, den))))
}

fn parse_float_or_complex(input: &str) -> IResult<&str, Value> {
    let (input, re) = parse_float_str(input)?;
    let (input, im) = opt(parse_complex_suffix).parse(input)?;
    Ok((
        input,
        match im {
            Some(im) => Value::complex(re, im),
            None => Value::Float(re),
        },
    ))
}

fn parse_int_or_complex(input: &str) -> IResult<&str, Value> {
    let (input, digits) = digit1(input)?;
    let n = bigint_radix(digits, 10);
    let (input, im) = opt(parse_complex_suffix).parse(input)?;
    Ok((
        input,
        match im {
            Some(im) => Value::complex(bigint_to_f64(&n), im),
            None => Value::Integer(n),
        },
    ))
}

fn parse_decimal_family(input: &str) -> IResult<&str, Value> {
    alt((parse_float_or_complex, parse_ratio, parse_int_or_complex)).parse(input)
}

fn parse_number_core(input: &str) -> IResult<&str, Value> {
    alt((
        parse_radix_integer,
        nom::sequence::preceded(tag("#d"), parse_decimal_family),
        parse_decimal_family,
    ))
    .parse(input)
}

fn parse_number(input: &str) -> IResult<&str, Value> {
    let (rest, v) = parse_number_core(input)?;
    if not_followed_by_atom_cont(rest) {
        Ok((rest, v))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify)))
    }
}

// ---------------------------------------------------------------------
// sequences: vector / list / dotted list
// ---------------------------------------------------------------------

/// `expr (spaces expr)*` — one or more expressions separated by required
/// whitespace.
fn parse_seq(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, first) = parse_expr(input)?;
    let mut items = vec![first];
    let mut rest = input;
    loop {
        match (multispace1, parse_expr).parse(rest) {
            Ok((r, (_, expr))) => {
                items.push(expr);
                rest = r;
            }
            Err(_) => break,
        }
    }
    Ok((rest, items))
}

fn parse_dotted_tail(input: &str) -> IResult<&str, Value> {
    let (input, _) = multispace1(input)?;
    let (input, _) = char('.')(input)?;
    let (input, _) = multispace1(input)?;
    parse_expr(input)
}

fn parse_list(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;

    if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>(')')(input) {
        return Ok((rest, Value::List(vec![])));
    }

    let (input, items) = parse_seq(input)?;
    let (input, body) = match parse_dotted_tail(input) {
        Ok((rest, tail)) => (rest, Value::dotted(items, tail)),
        Err(_) => (input, Value::List(items)),
    };

    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, body))
}

fn parse_vector(input: &str) -> IResult<&str, Value> {
    let (input, _) = tag("#(")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, items) = parse_seq(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Value::Vector(Rc::new(items))))
}

// ---------------------------------------------------------------------
// top level
// ---------------------------------------------------------------------

fn parse_expr(input: &str) -> IResult<&str, Value> {
    alt((
        parse_atom,
        parse_string,
        parse_quote,
        parse_number,
        parse_bool,
        parse_char,
        parse_quasiquote,
        parse_unquote,
        parse_vector,
        parse_list,
    ))
    .parse(input)
}

/// Parses exactly one expression, failing if anything but trailing
/// whitespace follows it.
pub fn parse(input: &str) -> Result<Value, LispError> {
    let trimmed = input.trim_start();
    match parse_expr(trimmed) {
        Ok((rest, value)) => {
            if rest.trim().is_empty() {
                Ok(value)
            } else {
                Err(LispError::Parser {
                    detail: format!("unexpected trailing input: '{}'", rest),
                })
            }
        }
        Err(e) => Err(LispError::Parser { detail: format!("{:?}", e) }),
    }
}

/// Parses a sequence of expressions separated by whitespace, consuming the
/// entire input (used by `load` and `read-all`).
pub fn parse_program(input: &str) -> Result<Vec<Value>, LispError> {
    let mut rest = input.trim_start();
    let mut exprs = Vec::new();
    while !rest.is_empty() {
        match parse_expr(rest) {
            Ok((r, v)) => {
                exprs.push(v);
                rest = r.trim_start();
            }
            Err(e) => return Err(LispError::Parser { detail: format!("{:?}", e) }),
        }
    }
    Ok(exprs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert!(matches!(parse("42"), Ok(Value::Integer(n)) if n == BigInt::from(42)));
        assert!(matches!(parse("0"), Ok(Value::Integer(n)) if n.is_zero()));
    }

    #[test]
    fn test_parse_radix_literals() {
        assert!(matches!(parse("#b1011"), Ok(Value::Integer(n)) if n == BigInt::from(11)));
        assert!(matches!(parse("#x1F"), Ok(Value::Integer(n)) if n == BigInt::from(31)));
        assert!(matches!(parse("#o17"), Ok(Value::Integer(n)) if n == BigInt::from(15)));
    }

    #[test]
    fn test_parse_float() {
        match parse("3.25") {
            Ok(Value::Float(f)) => assert!((f - 3.25).abs() < 1e-9),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ratio_literal() {
        match parse("3/4") {
            Ok(Value::Ratio(r)) => {
                assert_eq!(*r.numer(), BigInt::from(3));
                assert_eq!(*r.denom(), BigInt::from(4));
            }
            other => panic!("expected ratio, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_complex_literal() {
        match parse("3+4i") {
            Ok(Value::Complex(c)) => {
                assert!((c.re - 3.0).abs() < 1e-9);
                assert!((c.im - 4.0).abs() < 1e-9);
            }
            other => panic!("expected complex, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bool_literals() {
        assert!(matches!(parse("#t"), Ok(Value::Bool(true))));
        assert!(matches!(parse("#f"), Ok(Value::Bool(false))));
    }

    #[test]
    fn test_parse_char_literals() {
        assert!(matches!(parse("#\\a"), Ok(Value::Char('a'))));
        assert!(matches!(parse("#\\space"), Ok(Value::Char(' '))));
        assert!(matches!(parse("#\\newline"), Ok(Value::Char('\n'))));
    }

    #[test]
    fn test_parse_symbol_operators() {
        assert!(matches!(parse("+"), Ok(Value::Symbol(s)) if s == "+"));
        assert!(matches!(parse("-"), Ok(Value::Symbol(s)) if s == "-"));
        // No literal negative-number syntax: a leading '-' followed by digits
        // is a symbol, matching the grammar's atom-before-number ordering.
        assert!(matches!(parse("-5"), Ok(Value::Symbol(s)) if s == "-5"));
    }

    #[test]
    fn test_parse_string_escapes() {
        assert!(matches!(parse(r#""hello""#), Ok(Value::String(s)) if s == "hello"));
        assert!(matches!(parse(r#""a\nb""#), Ok(Value::String(s)) if s == "a\nb"));
        assert!(matches!(parse(r#""say \"hi\"""#), Ok(Value::String(s)) if s == "say \"hi\""));
    }

    #[test]
    fn test_parse_empty_and_nonempty_list() {
        assert!(matches!(parse("()"), Ok(Value::List(items)) if items.is_empty()));
        match parse("(1 2 3)") {
            Ok(Value::List(items)) => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_dotted_list() {
        match parse("(1 2 . 3)") {
            Ok(Value::DottedList(head, tail)) => {
                assert_eq!(head.len(), 2);
                assert!(matches!(*tail, Value::Integer(n) if n == BigInt::from(3)));
            }
            other => panic!("expected dotted list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_vector_literal() {
        match parse("#(1 2 3)") {
            Ok(Value::Vector(items)) => assert_eq!(items.len(), 3),
            other => panic!("expected vector, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_quote_forms() {
        match parse("'x") {
            Ok(Value::List(items)) => {
                assert!(matches!(&items[0], Value::Symbol(s) if s == "quote"));
            }
            other => panic!("expected quote form, got {:?}", other),
        }
        match parse("`x") {
            Ok(Value::List(items)) => {
                assert!(matches!(&items[0], Value::Symbol(s) if s == "quasiquote"));
            }
            other => panic!("expected quasiquote form, got {:?}", other),
        }
        match parse(",x") {
            Ok(Value::List(items)) => {
                assert!(matches!(&items[0], Value::Symbol(s) if s == "unquote"));
            }
            other => panic!("expected unquote form, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_program_multiple_top_level() {
        let prog = parse_program("(define x 1) (+ x 1)").unwrap();
        assert_eq!(prog.len(), 2);
    }

    #[test]
    fn test_parse_trailing_garbage_is_an_error() {
        assert!(parse("1 2").is_err());
        assert!(parse("(1 2").is_err());
    }
}
