use super::*;

#[test]
fn from_option_normalizes_none_to_null() {
    assert_eq!(Element::from(Option::<&str>::None), Element::Null);
    assert_eq!(Element::from(Some("x")), Element::from("x"));
    assert_eq!(Element::from(f64::NAN), Element::Null);
}

#[test]
fn numbers_keep_literal_kind() {
    let int = Element::from(3);
    let float = Element::from(3.0);
    assert_ne!(int, float);
    assert_eq!(int.to_string(), "3");
    assert_eq!(float.to_string(), "3.0");
}

#[test]
fn coercions_follow_lenient_rules() {
    assert_eq!(Element::from(12).to_string_value().as_deref(), Some("12"));
    assert_eq!(Element::from(false).to_string_value().as_deref(), Some("false"));
    assert_eq!(Element::from(" 7 ").to_i64(), Some(7));
    assert_eq!(Element::from("7.5").to_i64(), None);
    assert_eq!(Element::from("7.5").to_f64(), Some(7.5));
    assert_eq!(Element::from(-2.9).to_i64(), Some(-2));
    assert_eq!(Element::from("TRUE").to_bool(), Some(true));
    assert_eq!(Element::from("yes").to_bool(), Some(false));
    assert_eq!(Element::Null.to_string_value(), None);
    assert_eq!(Element::Object(Object::new()).to_i64(), None);
}

#[test]
fn single_element_array_reads_as_its_element() {
    let one: Array = [Element::from("only")].into_iter().collect();
    assert_eq!(
        Element::Array(one).to_string_value().as_deref(),
        Some("only")
    );

    let two: Array = [Element::from(1), Element::from(2)].into_iter().collect();
    assert_eq!(Element::Array(two).to_i64(), None);
}

#[test]
fn kind_names() {
    assert_eq!(Element::Null.kind_name(), "null");
    assert_eq!(Element::from(1).kind_name(), "number");
    assert_eq!(Element::from("s").kind_name(), "string");
    assert_eq!(Element::from(true).kind_name(), "boolean");
    assert_eq!(Element::Array(Array::new()).kind_name(), "array");
    assert_eq!(Element::Object(Object::new()).kind_name(), "object");
}

#[test]
fn json_value_conversion_both_ways() {
    let value = serde_json::json!({ "n": 1, "f": 0.5, "s": "x", "b": true, "z": null, "a": [1] });
    let element = Element::from(value.clone());
    assert_eq!(serde_json::Value::from(&element), value);
}

#[test]
fn serde_roundtrip_preserves_key_order() {
    let element: Element =
        serde_json::from_str(r#"{"zeta": 1, "alpha": {"b": 2, "a": [true, null]}}"#).unwrap();
    let object = element.as_object().unwrap();
    assert_eq!(object.keys(), vec!["zeta", "alpha"]);
    assert_eq!(
        object.get(&["alpha"]).unwrap().as_object().unwrap().keys(),
        vec!["b", "a"]
    );

    let text = serde_json::to_string(&element).unwrap();
    assert_eq!(text, r#"{"zeta":1,"alpha":{"b":2,"a":[true,null]}}"#);
}

#[test]
fn display_and_from_str_agree() {
    let element: Element = r#"{"a": [1, 2.5, "x"]}"#.parse().unwrap();
    assert_eq!(element.to_string(), r#"{"a":[1,2.5,"x"]}"#);
}
