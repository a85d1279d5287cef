//! Template, verb, and diagnostic coverage for the public entry points.

use vfmt::{args, format_template, format_values, Value};

#[test]
fn literal_text_passes_through() {
    assert_eq!(format_template("no verbs here", &args![]), "no verbs here");
    assert_eq!(format_template("100%%", &args![]), "100%");
}

#[test]
fn decimal_matches_display() {
    for n in [0i64, 1, 9, 10, 99, 100, 12345, -1, -99, i64::MIN, i64::MAX] {
        assert_eq!(format_template("%d", &args![n]), n.to_string(), "{n}");
    }
}

#[test]
fn integer_bases() {
    assert_eq!(format_template("%x", &args![255]), "ff");
    assert_eq!(format_template("%X", &args![255]), "FF");
    assert_eq!(format_template("%#X", &args![255]), "0XFF");
    assert_eq!(format_template("%#x", &args![255]), "0xff");
    assert_eq!(format_template("%o", &args![8]), "10");
    assert_eq!(format_template("%#o", &args![8]), "010");
    assert_eq!(format_template("%O", &args![8]), "0o10");
    assert_eq!(format_template("%b", &args![5]), "101");
    assert_eq!(format_template("%#b", &args![5]), "0b101");
    assert_eq!(format_template("%#B", &args![5]), "0B101");
}

#[test]
fn integer_sign_flags() {
    assert_eq!(format_template("%+d", &args![42]), "+42");
    assert_eq!(format_template("% d", &args![42]), " 42");
    assert_eq!(format_template("%+d", &args![-42]), "-42");
    assert_eq!(format_template("%d", &args![9u64]), "9");
}

#[test]
fn integer_width_and_precision() {
    assert_eq!(format_template("%5d", &args![42]), "   42");
    assert_eq!(format_template("%-5d|", &args![42]), "42   |");
    assert_eq!(format_template("%05d", &args![42]), "00042");
    assert_eq!(format_template("%05d", &args![-42]), "-0042");
    assert_eq!(format_template("%.4d", &args![42]), "0042");
    assert_eq!(format_template("%8.4d", &args![42]), "    0042");
    // Zero with explicit precision zero renders no digits.
    assert_eq!(format_template("[%.0d]", &args![0]), "[]");
    assert_eq!(format_template("[%3.0d]", &args![0]), "[   ]");
}

#[test]
fn float_forms() {
    assert_eq!(format_template("%f", &args![3.1415]), "3.141500");
    assert_eq!(format_template("%.2f", &args![3.14159]), "3.14");
    assert_eq!(format_template("%05.2f", &args![3.14159]), "03.14");
    assert_eq!(format_template("%08.3f", &args![3.5]), "0003.500");
    assert_eq!(format_template("%e", &args![1234.5678]), "1.234568e+03");
    assert_eq!(format_template("%E", &args![0.00012]), "1.200000E-04");
    assert_eq!(format_template("%g", &args![100000.0]), "100000");
    assert_eq!(format_template("%g", &args![0.00001]), "1e-05");
    assert_eq!(format_template("%.3g", &args![1234.5678]), "1.23e+03");
    assert_eq!(format_template("%v", &args![3.5]), "3.5");
    assert_eq!(format_template("%v", &args![0.25f32]), "0.25");
}

#[test]
fn float_specials() {
    assert_eq!(format_template("%f", &args![f64::NAN]), "NaN");
    assert_eq!(format_template("%v", &args![f64::INFINITY]), "+Inf");
    assert_eq!(format_template("%v", &args![f64::NEG_INFINITY]), "-Inf");
    assert_eq!(format_template("%06.2f", &args![f64::NAN]), "   NaN");
}

#[test]
fn complex_values() {
    assert_eq!(
        format_template("%v", &args![Value::Complex(1.0, 2.0)]),
        "(1+2i)"
    );
    assert_eq!(
        format_template("%v", &args![Value::Complex(1.0, -2.0)]),
        "(1-2i)"
    );
}

#[test]
fn string_verbs() {
    assert_eq!(format_template("%s", &args!["hi"]), "hi");
    assert_eq!(format_template("%8s", &args!["hi"]), "      hi");
    assert_eq!(format_template("%-8s|", &args!["hi"]), "hi      |");
    assert_eq!(format_template("%.3s", &args!["hello"]), "hel");
    assert_eq!(format_template("%6.2s", &args!["hello"]), "    he");
    assert_eq!(format_template("%q", &args!["hi"]), "\"hi\"");
    assert_eq!(format_template("%q", &args!["a\"b"]), "\"a\\\"b\"");
    assert_eq!(format_template("%x", &args!["abc"]), "616263");
    assert_eq!(format_template("% x", &args!["ab"]), "61 62");
    assert_eq!(format_template("%#x", &args!["ab"]), "0x6162");
    // Uppercase only affects the hex digits, not the encoded bytes.
    assert_eq!(format_template("%X", &args!["ab"]), "6162");
    assert_eq!(format_template("%X", &args!["\x0a\x0b"]), "0A0B");
}

#[test]
fn byte_sequences() {
    let b = Value::bytes(*b"hi");
    assert_eq!(format_template("%s", &args![b.clone()]), "hi");
    assert_eq!(format_template("%x", &args![b.clone()]), "6869");
    assert_eq!(format_template("%q", &args![b]), "\"hi\"");
}

#[test]
fn char_verbs() {
    assert_eq!(format_template("%c", &args![65]), "A");
    assert_eq!(format_template("%c", &args!['é']), "é");
    assert_eq!(format_template("%q", &args![65]), "'A'");
    assert_eq!(format_template("%q", &args!['\n']), "'\\n'");
    assert_eq!(format_template("%d", &args!['A']), "65");
    // Out of range code points degrade to the replacement character.
    assert_eq!(format_template("%c", &args![-1]), "\u{FFFD}");
}

#[test]
fn bool_verbs() {
    assert_eq!(format_template("%t", &args![true]), "true");
    assert_eq!(format_template("%v", &args![false]), "false");
    assert_eq!(format_template("%s", &args![true]), "%!s(bool=true)");
}

#[test]
fn type_name_verb() {
    assert_eq!(format_template("%T", &args![42]), "i64");
    assert_eq!(format_template("%T", &args![7u64]), "u64");
    assert_eq!(format_template("%T", &args!["x"]), "string");
    assert_eq!(format_template("%T", &args![Value::seq(vec![1])]), "seq");
    assert_eq!(format_template("%T", &args![Value::Null]), "<nil>");
}

#[test]
fn nil_arguments() {
    assert_eq!(format_template("%v", &args![Value::Null]), "<nil>");
    assert_eq!(format_template("%d", &args![Value::Null]), "%!d(<nil>)");
    assert_eq!(format_template("%s", &args![Value::Null]), "%!s(<nil>)");
}

#[test]
fn missing_arguments_halt_processing() {
    assert_eq!(format_template("%d", &args![]), "%!d(MISSING)");
    assert_eq!(
        format_template("%d then %d then %d", &args![1]),
        "1 then %!d(MISSING)"
    );
}

#[test]
fn unknown_verbs_consume_their_argument() {
    assert_eq!(format_template("%z", &args![1]), "%!z(BADVERB)");
    assert_eq!(format_template("%z%d", &args![1, 2]), "%!z(BADVERB)2");
}

#[test]
fn no_verb_at_end() {
    assert_eq!(format_template("x%", &args![]), "x%!(NOVERB)");
}

#[test]
fn star_width_and_precision() {
    assert_eq!(format_template("%*d", &args![6, 42]), "    42");
    assert_eq!(format_template("%.*f", &args![2, 3.14159]), "3.14");
    assert_eq!(format_template("%*d", &args![-6, 42]), "42    ");
    // Negative star precision means no precision, so %f falls back to six.
    assert_eq!(format_template("%.*f", &args![-1, 3.5]), "3.500000");
    assert_eq!(format_template("%*d", &args!["x", 42]), "%!(BADWIDTH)42");
    assert_eq!(format_template("%.*f", &args!["x", 3.5]), "%!(BADPREC)3.500000");
}

#[test]
fn oversized_width_and_precision() {
    assert_eq!(format_template("%2000000d", &args![1]), "%!(BADWIDTH)1");
    assert_eq!(format_template("%.2000000d", &args![1]), "%!(BADPREC)1");
}

#[test]
fn positional_arguments() {
    let two = args![1, 2];
    assert_eq!(format_template("%[2]d %[1]d", &two), "2 1");
    assert_eq!(format_template("%[2]d %d", &args![1, 2, 3]), "2 3");
    assert_eq!(format_template("%[5]d", &two), "%!d(BADINDEX)");
    assert_eq!(format_template("%[x]d", &two), "%!d(BADINDEX)");
}

#[test]
fn extra_arguments_are_reported() {
    assert_eq!(format_template("%d", &args![7, 8]), "7%!(EXTRA i64=8)");
    assert_eq!(
        format_template("%d", &args![7, "x", true]),
        "7%!(EXTRA string=x, bool=true)"
    );
    // Explicit indexes suppress the report.
    assert_eq!(format_template("%[1]d", &args![7, 8]), "7");
}

#[test]
fn values_concatenation() {
    assert_eq!(format_values(&args!["Hello ", "World!"]), "Hello World!");
    assert_eq!(format_values(&args![1, 2]), "1 2");
    assert_eq!(format_values(&args![1, "x", 2]), "1x2");
    assert_eq!(format_values(&args![true, false]), "true false");
    assert_eq!(format_values(&args![Value::Null]), "<nil>");
}

#[test]
fn sequential_calls_share_no_state() {
    assert_eq!(format_template("%+05d", &args![42]), "+0042");
    // A later plain call must not inherit sign, zero, or width.
    assert_eq!(format_template("%d", &args![42]), "42");

    let r = Value::reference(Value::from(1));
    assert_eq!(format_template("%v", &args![r.clone()]), "&1");
    assert_eq!(format_template("%v", &args![r]), "&1");
}
