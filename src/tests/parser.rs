use super::*;
use crate::atom::Atom;
use crate::object::Object;
use crate::test_utils::setup;

const PICK: &str = r#"
(define (stream pick)
  ; grasps are sampled per object
  (:stream sample-grasp
    :inputs (?o)
    :domain (Graspable ?o)
    :outputs (?g)
    :certified (Grasp ?o ?g))
  (:stream plan-motion
    :inputs (?r ?q1 ?q2)
    :domain (and (Conf ?r ?q1) (Conf ?r ?q2))
    :outputs (?t)
    :certified (Motion ?r ?q1 ?t ?q2))
)
"#;

// ========================================================================
// STREAM FILES
// ========================================================================

#[test]
fn parse_stream_file() {
    let (symbols, objects) = setup();
    let decls = parse_streams(PICK, &symbols, &objects).unwrap();

    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].label, "sample-grasp");
    assert_eq!(decls[1].label, "plan-motion");

    let grasp = &decls[0];
    assert_eq!(grasp.inputs, vec![Param(0)]);
    assert_eq!(grasp.outputs, vec![Param(1)]);
    assert_eq!(grasp.params, vec!["o".to_string(), "g".to_string()]);
    assert_eq!(grasp.domain.len(), 1);
    assert_eq!(
        grasp.certified,
        vec![Fact::new(
            symbols.intern("Grasp"),
            [Arg::Param(Param(0)), Arg::Param(Param(1))]
        )]
    );
    assert!(grasp.validate().is_ok());
}

#[test]
fn conjunction_domain_shares_params() {
    let (symbols, objects) = setup();
    let decls = parse_streams(PICK, &symbols, &objects).unwrap();
    let motion = &decls[1];

    assert_eq!(motion.domain.len(), 2);
    assert_eq!(motion.domain[0].args[0], Arg::Param(Param(0)));
    assert_eq!(motion.domain[1].args[0], Arg::Param(Param(0)));
    assert_eq!(motion.domain[0].args[1], Arg::Param(Param(1)));
    assert_eq!(motion.domain[1].args[1], Arg::Param(Param(2)));
    assert_eq!(motion.outputs, vec![Param(3)]);
}

#[test]
fn bare_stream_forms_are_accepted() {
    let (symbols, objects) = setup();
    let input = "(:stream a :inputs (?x) :domain (P ?x)) (:stream b :inputs (?y) :domain (Q ?y))";
    let decls = parse_streams(input, &symbols, &objects).unwrap();
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[1].label, "b");
}

#[test]
fn keys_are_optional_and_unordered() {
    let (symbols, objects) = setup();
    let decls = parse_streams(
        "(:stream gen :certified (Item ?x) :outputs (?x))",
        &symbols,
        &objects,
    )
    .unwrap();
    let decl = &decls[0];

    assert!(decl.is_zero_input());
    assert!(decl.domain.is_empty());
    assert_eq!(decl.outputs, vec![Param(0)]);
    assert_eq!(decl.certified.len(), 1);
}

#[test]
fn empty_domain() {
    let (symbols, objects) = setup();
    let decls = parse_streams("(:stream s :inputs () :domain ())", &symbols, &objects).unwrap();
    assert!(decls[0].domain.is_empty());
    assert!(decls[0].inputs.is_empty());
}

#[test]
fn constants_in_domain() {
    let (symbols, objects) = setup();
    let decls = parse_streams(
        "(:stream s :inputs (?x) :domain (At ?x table 3))",
        &symbols,
        &objects,
    )
    .unwrap();
    let fact = &decls[0].domain[0];

    let table = objects.named(symbols.intern("table"));
    assert_eq!(fact.args[1], Arg::Const(table));
    assert_eq!(fact.args[2], Arg::Const(objects.int(3)));
}

// ========================================================================
// STREAM FILE ERRORS
// ========================================================================

#[test]
fn unknown_key_is_rejected() {
    let (symbols, objects) = setup();
    let err = parse_streams("(:stream s :fluents (?x))", &symbols, &objects).unwrap_err();
    assert!(err.message.contains(":fluents"), "got: {}", err);
}

#[test]
fn duplicate_key_is_rejected() {
    let (symbols, objects) = setup();
    let err = parse_streams("(:stream s :inputs (?x) :inputs (?y))", &symbols, &objects)
        .unwrap_err();
    assert!(err.message.contains("Duplicate"));
}

#[test]
fn missing_key_value() {
    let (symbols, objects) = setup();
    assert!(parse_streams("(:stream s :inputs)", &symbols, &objects).is_err());
}

#[test]
fn missing_stream_name() {
    let (symbols, objects) = setup();
    assert!(parse_streams("(:stream :inputs (?x))", &symbols, &objects).is_err());
}

#[test]
fn unsupported_section_in_define() {
    let (symbols, objects) = setup();
    let input = "(define (stream d) (:function (Cost ?x) (P ?x)))";
    let err = parse_streams(input, &symbols, &objects).unwrap_err();
    assert!(err.message.contains(":function"));
}

#[test]
fn define_requires_stream_header() {
    let (symbols, objects) = setup();
    assert!(parse_streams("(define (domain d))", &symbols, &objects).is_err());
}

#[test]
fn inputs_must_be_params() {
    let (symbols, objects) = setup();
    let err = parse_streams("(:stream s :inputs (x))", &symbols, &objects).unwrap_err();
    assert_eq!(err.position, 20);
}

#[test]
fn nested_argument_is_rejected() {
    let (symbols, objects) = setup();
    assert!(parse_streams("(:stream s :domain (P (f ?x)))", &symbols, &objects).is_err());
}

#[test]
fn unclosed_parenthesis_reports_open_position() {
    let (symbols, objects) = setup();
    let err = parse_streams("  (:stream s", &symbols, &objects).unwrap_err();
    assert_eq!(err.position, 2);
    assert!(err.message.contains("Unclosed"));
}

#[test]
fn stray_close_paren() {
    let (symbols, objects) = setup();
    let err = parse_streams(")", &symbols, &objects).unwrap_err();
    assert_eq!(err.position, 0);
}

// ========================================================================
// FACT FILES
// ========================================================================

#[test]
fn parse_init_block() {
    let (symbols, objects) = setup();
    let input = "(:init (Robot iiwa) ; the arm\n (Conf iiwa q0) (Weight block 12))";
    let facts = parse_facts(input, &symbols, &objects).unwrap();

    assert_eq!(facts.len(), 3);
    let atoms: Vec<Atom> = facts.iter().filter_map(Fact::ground).collect();
    assert_eq!(atoms.len(), 3);

    let iiwa = objects.named(symbols.intern("iiwa"));
    assert_eq!(atoms[0], Atom::new(symbols.intern("Robot"), [iiwa]));
    assert_eq!(objects.resolve(atoms[2].args[1]), Some(Object::Int(12)));
}

#[test]
fn bare_facts() {
    let (symbols, objects) = setup();
    let facts = parse_facts("(P a) (Q a b)", &symbols, &objects).unwrap();
    assert_eq!(facts.len(), 2);
    assert_eq!(facts[1].arity(), 2);
}

#[test]
fn non_ground_fact_parses() {
    let (symbols, objects) = setup();
    let facts = parse_facts("(P ?x a ?x)", &symbols, &objects).unwrap();

    assert!(!facts[0].is_ground());
    assert_eq!(facts[0].args[0], Arg::Param(Param(0)));
    assert_eq!(facts[0].args[2], Arg::Param(Param(0)));
}

#[test]
fn nullary_fact() {
    let (symbols, objects) = setup();
    let facts = parse_facts("(HandEmpty)", &symbols, &objects).unwrap();
    assert_eq!(facts[0].arity(), 0);
}

#[test]
fn empty_input_has_no_facts() {
    let (symbols, objects) = setup();
    assert!(parse_facts("  ; nothing\n", &symbols, &objects)
        .unwrap()
        .is_empty());
}

#[test]
fn fact_errors() {
    let (symbols, objects) = setup();
    assert!(parse_facts("()", &symbols, &objects).is_err());
    assert!(parse_facts("(?p a)", &symbols, &objects).is_err());
    assert!(parse_facts("atom", &symbols, &objects).is_err());
    assert!(parse_facts("(P ?)", &symbols, &objects).is_err());
}

#[test]
fn error_display() {
    let err = ParseError::new("Unexpected ')'", 4);
    assert_eq!(err.to_string(), "Parse error at position 4: Unexpected ')'");
}
