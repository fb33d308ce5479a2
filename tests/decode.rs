//! Whole-document scenarios from spec.md §8, plus the braceless-root and
//! scalar-fallback equivalence properties. Scenario-driven unit tests for
//! individual readers live alongside their module instead (e.g. multiline
//! string de-indentation in `src/literal.rs`).

use hjson::{unmarshal_str, DecoderOptions, Kind};

fn decode(input: &str) -> hjson::Value {
    unmarshal_str(input, DecoderOptions::default()).unwrap()
}

fn decode_with(input: &str, options: DecoderOptions) -> hjson::Value {
    unmarshal_str(input, options).unwrap()
}

fn with_comments() -> DecoderOptions {
    DecoderOptions {
        comments: true,
        ..DecoderOptions::default()
    }
}

// a. `{a:1}` -> Map{ "a" -> Int64(1) }, no non-empty comments.
#[test]
fn scenario_a_simple_braced_map() {
    let v = decode("{a:1}");
    let map = v.as_map().unwrap();
    assert_eq!(map.get("a").unwrap().try_int64().unwrap(), 1);
    assert!(v.comment_before.is_empty());
    assert!(map.get("a").unwrap().comment_before.is_empty());
}

// b. leading/inline/trailing comment attribution.
#[test]
fn scenario_b_comment_attribution() {
    let input = "# top\n{\n  // k\n  x: y\n}\n";
    let v = decode_with(input, with_comments());
    let map = v.as_map().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("x").unwrap().try_str().unwrap(), "y");
    assert_eq!(v.comment_before, "# top\n");
    assert!(map.get("x").unwrap().comment_before.contains("// k\n"));
    assert!(v.comment_after.contains('\n'));
}

// c. trailing comma is legal.
#[test]
fn scenario_c_trailing_comma_in_array() {
    let v = decode("[1,2,3,]");
    let vec = v.as_vector().unwrap();
    assert_eq!(vec.len(), 3);
    for (i, expected) in [1, 2, 3].into_iter().enumerate() {
        assert_eq!(vec[i].try_int64().unwrap(), expected);
    }
}

// d. multi-line string de-indentation and trailing-newline trim.
#[test]
fn scenario_d_multiline_string_indent() {
    let v = decode("{a: '''\n  hello\n  world\n  '''}");
    let map = v.as_map().unwrap();
    assert_eq!(map.get("a").unwrap().try_str().unwrap(), "hello\nworld");
}

// e. quoteless-string interior whitespace and trailing comment.
#[test]
fn scenario_e_quoteless_string_with_trailing_comment() {
    let input = "{a: b c # tail\n}";
    let v = decode_with(input, with_comments());
    let map = v.as_map().unwrap();
    let a = map.get("a").unwrap();
    assert_eq!(a.try_str().unwrap(), "b c");
    assert!(a.comment_after.contains("# tail"));
}

// f. duplicate keys raise a syntax error when configured to.
#[test]
fn scenario_f_duplicate_key_exception() {
    let options = DecoderOptions {
        duplicate_key_exception: true,
        ..DecoderOptions::default()
    };
    let err = unmarshal_str("{a:1, a:2}", options).unwrap_err();
    match err {
        hjson::Error::Syntax { message, .. } => assert!(message.contains("duplicate of key 'a'")),
        other => panic!("wrong error variant: {other:?}"),
    }
}

// g. a braceless-root scalar parses via the scalar-fallback retry.
#[test]
fn scenario_g_braceless_root_scalar() {
    let v = decode("42");
    assert_eq!(v.kind, Kind::Int64(42));
}

// h. an unterminated quoted string reports "Bad string".
#[test]
fn scenario_h_unterminated_string_error() {
    let err = unmarshal_str("{ a: \"unterminated", DecoderOptions::default()).unwrap_err();
    match err {
        hjson::Error::Syntax { message, .. } => assert!(message.contains("Bad string")),
        other => panic!("wrong error variant: {other:?}"),
    }
}

// Property 3: braceless-root equivalence.
#[test]
fn braceless_root_equivalence() {
    let braced = decode("{a: 1, b: [2, 3]}");
    let braceless = decode("a: 1\nb: [2, 3]\n");
    let braced_map = braced.as_map().unwrap();
    let braceless_map = braceless.as_map().unwrap();
    assert_eq!(braced_map.get("a").unwrap().kind, braceless_map.get("a").unwrap().kind);
    assert_eq!(braced_map.get("b").unwrap().kind, braceless_map.get("b").unwrap().kind);
}

// Property 4: scalar-fallback equivalence for each scalar flavor.
#[test]
fn scalar_fallback_equivalence() {
    assert_eq!(decode("42").kind, Kind::Int64(42));
    assert_eq!(decode("-3.5").kind, Kind::Double(-3.5));
    assert_eq!(decode("true").kind, Kind::Bool(true));
    assert_eq!(decode("false").kind, Kind::Bool(false));
    assert_eq!(decode("null").kind, Kind::Null);
    assert_eq!(decode("\"hi\"").kind, Kind::String("hi".to_string()));
}

// Property 5: number disambiguation in a quoteless-value document.
#[test]
fn number_disambiguation_in_bare_document() {
    assert_eq!(decode("1.2.3").kind, Kind::String("1.2.3".to_string()));
    assert_eq!(decode("007").kind, Kind::String("007".to_string()));
    assert_eq!(decode("5").kind, Kind::Int64(5));
}

// Property 2: position monotonicity across sibling map entries and array
// elements.
#[test]
fn position_monotonicity() {
    let v = decode("{a: 1, b: 2, c: 3}");
    let map = v.as_map().unwrap();
    let a = map.get("a").unwrap();
    let b = map.get("b").unwrap();
    let c = map.get("c").unwrap();
    assert!(a.pos_key < b.pos_key);
    assert!(b.pos_key < c.pos_key);
    assert!(a.pos_item < b.pos_item);
    assert!(b.pos_item < c.pos_item);

    let arr = decode("[10, 20, 30]");
    let elems = arr.as_vector().unwrap();
    assert!(elems[0].pos_item < elems[1].pos_item);
    assert!(elems[1].pos_item < elems[2].pos_item);
}

#[test]
fn duplicate_key_handler_can_rewrite_the_key() {
    // The handler runs before the key is inserted, so it can consult the
    // map-so-far to tell a genuine duplicate from a first occurrence.
    let options = DecoderOptions {
        duplicate_key_handler: Some(Box::new(|key: &mut String, map| {
            if map.contains_key(key.as_str()) {
                *key = format!("{key}_dup");
            }
        })),
        ..DecoderOptions::default()
    };
    let v = unmarshal_str("{a: 1, a: 2}", options).unwrap();
    let map = v.as_map().unwrap();
    assert_eq!(map.get("a").unwrap().try_int64().unwrap(), 1);
    assert_eq!(map.get("a_dup").unwrap().try_int64().unwrap(), 2);
}

#[test]
fn nested_containers_decode_regardless_of_depth() {
    let mut input = String::new();
    for _ in 0..200 {
        input.push('[');
    }
    input.push('1');
    for _ in 0..200 {
        input.push(']');
    }
    let v = decode(&input);
    let mut cur = &v;
    for _ in 0..200 {
        cur = &cur.as_vector().unwrap()[0];
    }
    assert_eq!(cur.try_int64().unwrap(), 1);
}

// Regression: a bare value followed by a sibling on the same line must not
// have the container's own separator/closer swallowed into its string.
#[test]
fn quoteless_array_elements_split_on_comma() {
    let v = decode("[a,b]");
    let vec = v.as_vector().unwrap();
    assert_eq!(vec.len(), 2);
    assert_eq!(vec[0].try_str().unwrap(), "a");
    assert_eq!(vec[1].try_str().unwrap(), "b");
}

#[test]
fn quoteless_map_values_split_on_comma() {
    let v = decode("{a: b, c: d}");
    let map = v.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a").unwrap().try_str().unwrap(), "b");
    assert_eq!(map.get("c").unwrap().try_str().unwrap(), "d");
}

#[test]
fn empty_containers_set_comment_inside_only_when_empty() {
    let v = decode_with("{a: {}, b: []}", with_comments());
    let map = v.as_map().unwrap();
    assert!(map.get("a").unwrap().as_map().unwrap().is_empty());
    assert!(map.get("b").unwrap().as_vector().unwrap().is_empty());
}
