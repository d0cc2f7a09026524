use rstest::rstest;
use sieve_grammar::sieve::emitter::{emit, emit_with_requires};
use sieve_grammar::sieve::{known_capabilities, parse, CommandBody, Script};

fn all_caps() -> Vec<&'static str> {
    let mut caps = known_capabilities();
    caps.extend(["relational", "regex", "comparator-i;ascii-numeric"]);
    caps
}

fn parse_ok(text: &str) -> Script {
    parse(text, "corpus.sieve", &all_caps()).unwrap()
}

const SPAM_FILTER: &str = r#"require ["fileinto", "imap4flags"];
# Filter: Spam
if header :contains "Subject" "[SPAM]" {
    fileinto :flags "\\Seen" "Junk";
    stop;
}
"#;

const CHAIN: &str = r#"if anyof (address :is :domain "From" "example.com", not exists "X-Ok") {
    discard;
} elsif size :over 100K {
    reject "too big";
} else {
    keep;
}
"#;

const VACATION: &str = "require \"vacation\";\r\n\
vacation :days 7 :subject \"Away\" :addresses [\"me@example.com\"] text:\r\n\
Back on Monday.\r\n\
..leading dot\r\n\
.\r\n\
;\r\n";

const VARIABLES: &str = r#"require ["variables", "imap4flags"];
set :lower "name" "Value";
if string :matches "${name}" "v*" {
    addflag "\\Flagged";
}
"#;

const EXTENSIONS: &str = r#"if body :text :contains "unsubscribe" { fileinto "Lists"; }
if date :value "ge" :originalzone "date" "hour" "09" { keep; }
deleteheader :matches "X-Spam-*";
addheader :last "X-Filtered" "yes";
notify :importance "1" :message "New mail" "mailto:me@example.com";
if environment :is "domain" "example.org" { redirect :copy "a@example.org"; }
if spamtest :percent :value "gt" :comparator "i;ascii-numeric" "50" { discard; }
include :personal :once "common";
return;
"#;

const PLACEHOLDERS: &str = r#"x_vendor_cmd :flag "arg" 42;
if x_vendor_test :is ["a", "b"] {
    stop;
}
"#;

const BLOCK_COMMENTS: &str = "/* header */\r\nif true {\r\n\t# inside\r\n\tkeep;\r\n}\r\n";

const ATTACHED_COMMENTS: &str = "if /* which */ header # subject\r\n:is \"Subject\" \"x\" {\r\n\tstop /* done */;\r\n}\r\n";

#[rstest]
#[case::spam_filter(SPAM_FILTER)]
#[case::chain(CHAIN)]
#[case::vacation(VACATION)]
#[case::variables(VARIABLES)]
#[case::extensions(EXTENSIONS)]
#[case::placeholders(PLACEHOLDERS)]
#[case::block_comments(BLOCK_COMMENTS)]
#[case::attached_comments(ATTACHED_COMMENTS)]
fn reparse_of_emitted_script_is_equal(#[case] input: &str) {
    let first = parse_ok(input);
    let second = parse_ok(&emit(&first));
    assert_eq!(first, second);
}

#[rstest]
#[case::spam_filter(SPAM_FILTER)]
#[case::chain(CHAIN)]
#[case::vacation(VACATION)]
#[case::attached_comments(ATTACHED_COMMENTS)]
fn emit_is_stable(#[case] input: &str) {
    let once = emit(&parse_ok(input));
    let twice = emit(&parse_ok(&once));
    assert_eq!(once, twice);
}

#[rstest]
#[case("} ", 1)]
#[case("if true } stop; {", 1)]
#[case("keep;\n\nstop;;", 3)]
#[case("if true {\n  fileinto \"a\" ]\n}", 2)]
#[case("if anyof (true,\n  false {\n  keep;\n}", 2)]
fn malformed_scripts_are_rejected(#[case] input: &str, #[case] line: usize) {
    let err = parse(input, "bad.sieve", &all_caps()).unwrap_err();
    assert_eq!(err.script, "bad.sieve");
    assert_eq!(err.line, line);
}

#[test]
fn missing_semicolon_at_end_is_tolerated() {
    let script = parse_ok("keep;\nstop\n");
    assert_eq!(script.commands().count(), 2);
}

#[test]
fn vacation_body_is_unstuffed() {
    let script = parse_ok(VACATION);
    let CommandBody::Vacation(v) = &script.commands().nth(1).unwrap().body else {
        panic!("Expected vacation");
    };
    assert_eq!(v.reason.value(), "Back on Monday.\r\n.leading dot\r\n");
}

#[test]
fn requires_collect_declared_and_implied() {
    let script = parse_ok(EXTENSIONS);
    for cap in ["body", "date", "relational", "editheader", "enotify", "environment", "spamtest", "include"] {
        assert!(script.requires.iter().any(|r| r == cap), "missing {cap}");
    }
    assert!(emit_with_requires(&script).starts_with("require ["));
}

#[test]
fn capability_gating_changes_node_types() {
    let text = "fileinto \"Junk\";";
    let typed = parse(text, "t", &["fileinto"]).unwrap();
    let none: [&str; 0] = [];
    let untyped = parse(text, "t", &none).unwrap();
    assert!(matches!(typed.commands().next().unwrap().body, CommandBody::FileInto(_)));
    assert!(untyped.commands().next().unwrap().is_placeholder());
    assert_eq!(emit(&typed), emit(&untyped));
}

#[test]
fn json_dump_round_trips() {
    let script = parse_ok(CHAIN);
    let json = serde_json::to_string(&script).unwrap();
    let back: Script = serde_json::from_str(&json).unwrap();
    assert_eq!(script, back);
}
