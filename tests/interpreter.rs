use mal::reader;
use mal::runtime::Runtime;
use mal::value::Value;

fn eval(input: &str) -> Value {
    Runtime::new().rep(input).unwrap()
}

fn eval_str(input: &str) -> String {
    Runtime::new().rep_to_string(input).unwrap()
}

#[test]
fn arithmetic_renders_readably() {
    assert_eq!(eval_str("(+ 1 2)"), "3");
    assert_eq!(eval_str("(- 1 (* 2 (/ 9 3)))"), "-5");
}

#[test]
fn def_binds_in_global_env() {
    let runtime = Runtime::new();
    assert_eq!(runtime.rep("(def! x 10)").unwrap(), Value::Number(10));
    assert_eq!(runtime.rep("(* x x)").unwrap(), Value::Number(100));
    assert_eq!(runtime.rep("x").unwrap(), Value::Number(10));
}

#[test]
fn let_binds_sequentially_and_does_not_leak() {
    let runtime = Runtime::new();
    assert_eq!(runtime.rep("(let* (a 5 b (+ a 1)) (+ a b))").unwrap(), Value::Number(11));
    assert!(runtime.rep("a").is_err());

    runtime.rep("(def! a 1)").unwrap();
    assert_eq!(runtime.rep("(let* (a 2) a)").unwrap(), Value::Number(2));
    assert_eq!(runtime.rep("a").unwrap(), Value::Number(1));
}

#[test]
fn only_nil_and_false_are_falsy() {
    assert_eq!(eval("(if nil 1 2)"), Value::Number(2));
    assert_eq!(eval("(if false 1 2)"), Value::Number(2));
    assert_eq!(eval("(if 0 1 2)"), Value::Number(1));
    assert_eq!(eval("(if \"\" 1 2)"), Value::Number(1));
    assert_eq!(eval("(if () 1 2)"), Value::Number(1));
    assert_eq!(eval("(if false 1)"), Value::NIL);
}

#[test]
fn anonymous_closure_application() {
    assert_eq!(eval("((fn* (a b) (+ a b)) 3 4)"), Value::Number(7));
}

#[test]
fn closures_see_later_global_definitions() {
    let runtime = Runtime::new();
    runtime.rep("(def! f (fn* () y))").unwrap();
    runtime.rep("(def! y 42)").unwrap();
    assert_eq!(runtime.rep("(f)").unwrap(), Value::Number(42));
}

#[test]
fn variadic_parameters_collect_a_list() {
    let runtime = Runtime::new();
    runtime.rep("(def! rest (fn* (a & more) more))").unwrap();
    assert_eq!(runtime.rep_to_string("(rest 1 2 3)").unwrap(), "(2 3)");
    assert_eq!(runtime.rep_to_string("(rest 1)").unwrap(), "()");
    assert!(runtime.rep("(rest)").is_err());
}

#[test]
fn deep_tail_recursion_does_not_overflow() {
    let runtime = Runtime::new();
    runtime
        .rep("(def! count-down (fn* (n) (if (= n 0) :done (count-down (- n 1)))))")
        .unwrap();
    assert_eq!(runtime.rep_to_string("(count-down 100000)").unwrap(), ":done");

    runtime
        .rep("(def! sum (fn* (n acc) (if (= n 0) acc (let* (m (- n 1)) (sum m (+ acc n))))))")
        .unwrap();
    assert_eq!(runtime.rep("(sum 100000 0)").unwrap(), Value::Number(5000050000));
}

#[test]
fn collections_evaluate_their_elements() {
    assert_eq!(eval_str("[1 (+ 1 1) (* 3 1)]"), "[1 2 3]");
    assert_eq!(eval_str("{:a (+ 1 2)}"), "{:a 3}");
    assert_eq!(eval_str("()"), "()");
}

#[test]
fn literal_values_round_trip_through_the_printer() {
    let sources = [
        "42",
        "-7",
        "\"line\\nbreak \\\"quoted\\\" back\\\\slash\"",
        ":kw",
        "sym",
        "nil",
        "true",
        "(1 [2 3] (\"a\" :b) ())",
        "{:a [1 2] \"k\" nil}",
    ];
    for source in sources {
        let value = reader::read(source).unwrap();
        let printed = mal::printer::pr_str(&value, true);
        assert_eq!(reader::read(&printed).unwrap(), value, "round trip of {}", source);
    }
}

#[test]
fn unreadable_output_keeps_raw_strings() {
    let value = eval("\"a\\nb\"");
    assert_eq!(mal::printer::pr_str(&value, false), "a\nb");
    assert_eq!(mal::printer::pr_str(&value, true), "\"a\\nb\"");
}

#[test]
fn whole_programs_evaluate_in_order() {
    let program = r#"
        ; factorial, accumulator style
        (def! fact (fn* (n acc) (if (<= n 1) acc (fact (- n 1) (* n acc)))))
        (def! result (fact 10 1))
        result
    "#;
    assert_eq!(Runtime::new().rep_all(program).unwrap(), Value::Number(3628800));
}
