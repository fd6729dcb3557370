use std::{env, fs, path::Path};

use pretty_assertions::assert_eq;
use quill::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{evaluator::core::Context, lexer::TokenKind},
    run_with_io,
};
use walkdir::WalkDir;

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "ql"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = fs::read_to_string(path.with_extension("out"))
                           .unwrap_or_else(|e| panic!("Missing expected output for {path:?}: {e}"));
        let input = read_input(path);

        count += 1;
        let mut output = Vec::new();
        if let Err(e) = run_with_io(&source, input.as_bytes(), &mut output) {
            panic!("Script {path:?} failed:\n{source}\nError: {e}");
        }
        assert_eq!(String::from_utf8_lossy(&output), expected, "output of {path:?}");
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn read_input(script: &Path) -> String {
    fs::read_to_string(script.with_extension("in")).unwrap_or_default()
}

fn output_of(src: &str) -> String {
    output_with_input(src, "")
}

fn output_with_input(src: &str, input: &str) -> String {
    let mut output = Vec::new();
    if let Err(e) = run_with_io(src, input.as_bytes(), &mut output) {
        panic!("Script failed: {e}\n{src}");
    }
    String::from_utf8(output).expect("script output is UTF-8")
}

fn runtime_error(src: &str) -> RuntimeError {
    match run_with_io(src, &b""[..], Vec::new()) {
        Err(Error::Runtime(e)) => e,
        Err(Error::Parse(e)) => panic!("Expected a runtime error, got a parse error: {e}"),
        Ok(()) => panic!("Script succeeded but was expected to fail"),
    }
}

#[test]
fn expressions_evaluate_left_to_right() {
    assert_eq!(output_of("print(2+3*4)"), "20");
    assert_eq!(output_of("print(2*3+4)"), "10");
    assert_eq!(output_of("print 10 - 2 - 3"), "5");
    assert_eq!(output_of("print -3 + 5"), "2");
    assert_eq!(output_of("print 7 / 2"), "3");
}

#[test]
fn comparisons_and_logic_produce_numbers() {
    assert_eq!(output_of("print 3 > 2"), "1");
    assert_eq!(output_of("print 3 <= 2"), "0");
    assert_eq!(output_of("print 3 > 2 and 0"), "0");
    assert_eq!(output_of("print 0 or \"\""), "1");
    assert_eq!(output_of("print \"a\" == \"a\""), "1");
    assert_eq!(output_of("print 1 == \"1\""), "0");
    assert_eq!(output_of("print 1 != \"1\""), "1");
}

#[test]
fn strings_concatenate() {
    assert_eq!(output_of("print \"x\" + 1"), "x1");
    assert_eq!(output_of("print \"a\" + \"b\""), "ab");
    assert_eq!(output_of("print \"say \\\"hi\\\"\\n\""), "say \"hi\"\n");
    assert_eq!(output_of("print \"a\\qb\""), "a\\qb");
}

#[test]
fn print_forms_write_without_newline() {
    assert_eq!(output_of("print 1\nprint(2)\nprint \"\""), "12");
    assert_eq!(output_of("print missing"), "");
}

#[test]
fn division_by_zero_stops_the_script() {
    let mut output = Vec::new();
    let result = run_with_io("print(1/0)", &b""[..], &mut output);

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { line: 1 }))));
    assert!(output.is_empty());
}

#[test]
fn output_before_an_error_is_kept() {
    let mut output = Vec::new();
    let result = run_with_io("print \"before\"\nx = 1 / 0\nprint \"after\"",
                             &b""[..],
                             &mut output);

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { line: 2 }))));
    assert_eq!(output, b"before");
}

#[test]
fn conditionals_and_loops() {
    assert_eq!(output_of("x = 5\nif x > 3 print \"big\" else print \"small\" end"), "big");
    assert_eq!(output_of("x = 0\nif x print \"yes\" end"), "");
    assert_eq!(output_of("i = 0\nwhile i < 4\n  print i\n  i = i + 1\nend"), "0123");
}

#[test]
fn return_leaves_nested_loops() {
    let src = "def count(n)\n\
               \x20 i = 0\n\
               \x20 while 1\n\
               \x20   i = i + 1\n\
               \x20   if i == n\n\
               \x20     return i\n\
               \x20   end\n\
               \x20 end\n\
               end\n\
               print count(5)";
    assert_eq!(output_of(src), "5");
}

#[test]
fn function_without_result_is_unbound() {
    assert_eq!(output_of("def f() x = 1 end\nprint f()"), "");
    assert_eq!(output_of("def f() return missing end\nprint f()"), "");
}

#[test]
fn functions_may_be_called_before_definition() {
    assert_eq!(output_of("print twice(4)\ndef twice(x) return x * 2 end"), "8");
}

#[test]
fn last_definition_wins() {
    assert_eq!(output_of("def f() return 1 end\ndef f() return 2 end\nprint f()"), "2");
}

#[test]
fn closures_capture_their_scope() {
    assert_eq!(output_of("def make() a = 10 def() a end end\nprint(make()())"), "10");

    let src = "def adder(n) return def(x) return x + n end end\n\
               add5 = adder(5)\n\
               add7 = adder(7)\n\
               print add5(1) + add7(1)";
    assert_eq!(output_of(src), "14");
}

#[test]
fn parameters_shadow_captured_variables() {
    let src = "def outer(x) return def(x) return x end end\n\
               f = outer(1)\n\
               print f(2)";
    assert_eq!(output_of(src), "2");
}

#[test]
fn closures_share_captured_variables() {
    let src = "def counter()\n\
               \x20 n = 0\n\
               \x20 return def() n = n + 1 return n end\n\
               end\n\
               c = counter()\n\
               c()\n\
               c()\n\
               print c()";
    assert_eq!(output_of(src), "3");
}

#[test]
fn closures_do_not_inherit_this() {
    let src = "o = {}\n\
               o.m = def() return def() return this end end\n\
               g = o.m()\n\
               print g()";
    assert_eq!(output_of(src), "");

    let src = "o = {\"k\": 4}\n\
               o.m = def() n = this.k return def() return n end end\n\
               g = o.m()\n\
               print g()";
    assert_eq!(output_of(src), "4");
}

#[test]
fn global_variables_are_visible_in_functions() {
    assert_eq!(output_of("g = 3\ndef f() return g * 2 end\nprint f()"), "6");
    assert_eq!(output_of("g = 3\ndef f() g = 4 end\nf()\nprint g"), "4");
}

#[test]
fn objects_and_properties() {
    let src = "p = {\"x\": 1, \"y\": 2}\n\
               p.x = p.x + 10\n\
               print p.x + p.y";
    assert_eq!(output_of(src), "13");

    let src = "o = {\"inner\": {\"v\": 5}}\n\
               o.inner.v = o.inner.v * 2\n\
               print o.inner.v";
    assert_eq!(output_of(src), "10");
}

#[test]
fn missing_properties_are_created_on_read() {
    assert_eq!(output_of("o = {}\nprint o.b\no.b = 5\nprint o.b"), "5");

    let mut output = Vec::new();
    let mut ctx = Context::with_io(&b""[..], &mut output);
    ctx.run_source("o = {\"a\": 1}").unwrap();
    ctx.run_source("o.b").unwrap();
    let after_first_read = ctx.live_variables();
    ctx.run_source("o.b").unwrap();

    assert_eq!(ctx.live_variables(), after_first_read);
}

#[test]
fn methods_receive_this() {
    let src = "counter = {\"n\": 0}\n\
               counter.inc = def() this.n = this.n + 1 end\n\
               counter.inc()\n\
               counter.inc()\n\
               print counter.n";
    assert_eq!(output_of(src), "2");

    let src = "point = {\"x\": 3, \"y\": 4}\n\
               point.sum = def() return this.x + this.y end\n\
               print point.sum()";
    assert_eq!(output_of(src), "7");
}

#[test]
fn lists() {
    assert_eq!(output_of("xs = [1, 2, 3]\nxs[1] = 20\nprint xs\nprint len(xs)"),
               "[1, 20, 3]3");
    assert_eq!(output_of("print len([])"), "0");
    assert_eq!(output_of("a = \"s\"\nxs = [a, 2]\nprint xs[0] + xs[1]"), "s2");

    let src = "o = {\"items\": [4, 5]}\n\
               o.items[0] = 9\n\
               print o.items[0] + o.items[1]";
    assert_eq!(output_of(src), "14");
}

#[test]
fn list_index_errors() {
    assert!(matches!(runtime_error("xs = [1, 2]\nprint xs[2]"),
                     RuntimeError::IndexOutOfBounds { len: 2,
                                                      found: 2,
                                                      line: 2 }));
    assert!(matches!(runtime_error("xs = [1]\nprint xs[-1]"),
                     RuntimeError::IndexOutOfBounds { found: -1, .. }));
    assert!(matches!(runtime_error("x = 3\nprint x[0]"), RuntimeError::TypeError { line: 2, .. }));
}

#[test]
fn input_reads_lines() {
    let src = "a = input()\nb = input()\nc = input()\nprint a + \"|\" + b + \"|\" + c";
    assert_eq!(output_with_input(src, "one\r\ntwo"), "one|two|");
}

#[test]
fn getenv_reads_the_environment() {
    // SAFETY: no other test touches this variable.
    unsafe {
        env::set_var("QUILL_TEST_GREETING", "hello");
    }

    assert_eq!(output_of("print getenv(\"QUILL_TEST_GREETING\")"), "hello");
    assert_eq!(output_of("print getenv(\"QUILL_TEST_SURELY_UNSET_VARIABLE\")"), "");
    assert!(matches!(runtime_error("getenv(1)"),
                     RuntimeError::ExpectedString { function: "getenv",
                                                    line: 1 }));
}

#[test]
fn len_requires_a_list() {
    assert!(matches!(runtime_error("len(5)"),
                     RuntimeError::ExpectedList { function: "len",
                                                  line: 1 }));
    assert!(matches!(runtime_error("len(\"abc\")"), RuntimeError::ExpectedList { .. }));
}

#[test]
fn eval_runs_in_the_current_scope() {
    assert_eq!(output_of("r = eval(\"print(7)\")\nprint r"), "7print(7)");
    assert_eq!(output_of("eval(\"x = 4\")\nprint x"), "4");
    assert_eq!(output_of("def f(v) done = eval(\"v = v + 1\") return v end\nprint f(1)"),
               "2");
}

#[test]
fn bare_expression_statement_ends_a_function() {
    assert_eq!(output_of("def f(v) eval(\"v = v + 1\") return v end\nprint f(1)"),
               "v = v + 1");
    assert_eq!(output_of("def g() return 1 end\ndef f() g() print 9 end\nf()"), "");
    assert_eq!(output_of("def f() x = 1 print 9 end\nf()"), "9");
}

#[test]
fn eval_registers_functions() {
    assert_eq!(output_of("eval(\"def twice(x) return x * 2 end\")\nprint twice(21)"), "42");
}

#[test]
fn eval_reports_nested_parse_errors() {
    assert!(matches!(runtime_error("eval(\"if 1\")"),
                     RuntimeError::NestedParse { source: ParseError::UnexpectedToken { expected:
                                                                                           TokenKind::End,
                                                                                       .. },
                                                 line: 1 }));

    let error = runtime_error("x = 1\neval(\"\\n\\nif 1\")");
    assert!(matches!(error,
                     RuntimeError::NestedParse { source: ParseError::UnexpectedToken { line: 3, .. },
                                                 line: 2 }));
    assert_eq!(error.to_string(),
               "Error on line 2: eval failed to parse: Error on line 3: expected 'end', found end \
                of input.");
}

#[test]
fn call_errors() {
    assert!(matches!(runtime_error("def f(a) return a end\nf(1, 2)"),
                     RuntimeError::ArgumentCountMismatch { expected: 1,
                                                           found: 2,
                                                           line: 2,
                                                           .. }));
    assert!(matches!(runtime_error("print(1, 2)"),
                     RuntimeError::ArgumentCountMismatch { expected: 1,
                                                           found: 2,
                                                           .. }));
    assert!(matches!(runtime_error("x = 3\nx()"), RuntimeError::NotCallable { line: 2, .. }));
    assert!(matches!(runtime_error("nope()"), RuntimeError::UnknownFunction { line: 1, .. }));
}

#[test]
fn operand_errors() {
    assert!(matches!(runtime_error("print 1 + \"x\""), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_error("print missing + 1"),
                     RuntimeError::UnboundOperand { line: 1, .. }));
    assert!(matches!(runtime_error("print missing.field"),
                     RuntimeError::UnboundOperand { .. }));
    assert!(matches!(runtime_error("1 = 2"), RuntimeError::InvalidAssignment { line: 1 }));
}

#[test]
fn parse_errors_carry_the_line() {
    let result = run_with_io("x = 1\nif x\n  print x\n", &b""[..], Vec::new());
    let Err(Error::Parse(error)) = result else {
        panic!("Expected a parse error");
    };

    assert_eq!(error.to_string(), "Error on line 4: expected 'end', found end of input.");
}

#[test]
fn finished_closures_release_their_scope() {
    let mut ctx = Context::with_io(&b""[..], Vec::new());
    assert_eq!(ctx.live_scopes(), 1);

    ctx.run_source("def make() a = 10 def() a end end\nf = make()").unwrap();
    assert_eq!(ctx.live_scopes(), 2);

    ctx.run_source("f = 0").unwrap();
    assert_eq!(ctx.live_scopes(), 1);
    assert_eq!(ctx.live_objects(), 1);
}

#[test]
fn closure_stored_in_its_own_scope_is_never_freed() {
    let mut ctx = Context::with_io(&b""[..], Vec::new());
    ctx.run_source("def make() g = def() 1 end g end\nf = make()\nf = 0").unwrap();

    assert_eq!(ctx.live_scopes(), 2);
}

#[test]
fn loops_do_not_accumulate_temporaries() {
    let mut ctx = Context::with_io(&b""[..], Vec::new());
    ctx.run_source("i = 0\nwhile i < 100\n  s = \"n\" + i\n  i = i + 1\nend").unwrap();

    // `i` and `s`.
    assert_eq!(ctx.live_objects(), 2);
}

#[test]
fn return_inside_while_skips_the_rest_of_the_body() {
    assert_eq!(output_of("def f() while 1 return 5 end 99 end\nprint f()"), "5");
}

#[test]
fn integer_literals_print_in_decimal() {
    for literal in ["0", "7", "42", "9223372036854775807"] {
        assert_eq!(output_of(&format!("print({literal})")), literal);
    }
}

#[test]
fn unbound_references_are_not_errors() {
    let mut ctx = Context::with_io(&b""[..], Vec::new());
    ctx.run_source("ghost").unwrap();
    let after_first_reference = ctx.live_variables();
    ctx.run_source("ghost\nghost").unwrap();

    assert_eq!(ctx.live_variables(), after_first_reference);
}

#[test]
fn rebinding_the_owner_during_an_assignment() {
    assert_eq!(output_of("p = {\"a\": 1}\ndef reset() p = 0 end\np.a = reset()\nprint p"), "0");
    assert_eq!(output_of("p = {\"a\": 1}\np.a = eval(\"p = 0\")\nprint p"), "0");

    let src = "xs = [1, 2]\n\
               def reset() xs = 0 return 7 end\n\
               xs[0] = reset()\n\
               print xs";
    assert_eq!(output_of(src), "0");
}

#[test]
fn rebinding_the_owner_while_reading_a_property() {
    let src = "q = {\"a\": 1}\n\
               def reset() q = 0 return 5 end\n\
               print q.a + reset()";
    assert_eq!(output_of(src), "6");
}
