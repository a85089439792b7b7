use serde_deepdiff::{value, DeepDiff, DiffOptions, EquivalencePolicy, Error, TypeTag, Value};

#[test]
fn test_full_config_mapping() {
    let options = DiffOptions::from_value(&value!({
        "ignore_order": true,
        "verbose_level": 2,
        "significant_digits": 4,
        "math_epsilon": null,
        "atol": 0.5,
        "rtol": 0.01,
        "ignore_numeric_type_changes": true,
        "ignore_type_in_groups": [["int", "float"], ["bool", "str"]],
        "include_paths": ["root['a']", "root['b']"],
        "exclude_paths": "root['a']['secret']"
    }))
    .unwrap();

    assert!(options.ignore_order);
    assert!(options.ignore_numeric_type_changes);
    assert_eq!(options.verbose_level, 2);
    assert_eq!(options.significant_digits, Some(4));
    assert_eq!(options.math_epsilon, None);
    assert_eq!(options.atol, Some(0.5));
    assert_eq!(options.rtol, Some(0.01));
    assert_eq!(
        options.ignore_type_in_groups,
        vec![
            vec![TypeTag::INT, TypeTag::FLOAT],
            vec![TypeTag::BOOL, TypeTag::STR]
        ]
    );
    assert_eq!(options.include_paths.len(), 2);
    assert_eq!(options.exclude_paths, vec!["root['a']['secret']".to_string()]);
    assert!(EquivalencePolicy::new(&options).is_ok());
}

#[test]
fn test_empty_config_is_default() {
    assert_eq!(
        DiffOptions::from_value(&value!({})).unwrap(),
        DiffOptions::default()
    );
}

#[test]
fn test_flat_group_list_is_one_group() {
    let options =
        DiffOptions::from_value(&value!({"ignore_type_in_groups": ["int", "float"]})).unwrap();
    assert_eq!(
        options.ignore_type_in_groups,
        vec![vec![TypeTag::INT, TypeTag::FLOAT]]
    );
}

#[test]
fn test_unknown_option() {
    let err = DiffOptions::from_value(&value!({"ignore_order": true, "wrong_param": 1})).unwrap_err();
    assert_eq!(err, Error::UnknownOption("wrong_param".to_string()));
    assert_eq!(err.to_string(), "Unsupported option: wrong_param");
}

#[test]
fn test_integer_key_is_unknown() {
    let err = DiffOptions::from_value(&value!({1: true})).unwrap_err();
    assert!(matches!(err, Error::UnknownOption(_)));
}

#[test]
fn test_wrong_value_shapes() {
    let cases = [
        (value!({"ignore_order": 1}), "ignore_order"),
        (value!({"verbose_level": "high"}), "verbose_level"),
        (value!({"verbose_level": 300}), "verbose_level"),
        (value!({"significant_digits": 2.5}), "significant_digits"),
        (value!({"atol": "small"}), "atol"),
        (value!({"include_paths": 3}), "include_paths"),
        (value!({"exclude_paths": [1]}), "exclude_paths"),
        (value!({"ignore_type_in_groups": "int"}), "ignore_type_in_groups"),
    ];
    for (config, expected) in cases {
        match DiffOptions::from_value(&config) {
            Err(Error::InvalidOption { option, .. }) => assert_eq!(option, expected),
            other => panic!("Expected invalid `{}`, got {:?}", expected, other),
        }
    }
}

#[test]
fn test_config_must_be_mapping() {
    let err = DiffOptions::from_value(&value!([1, 2])).unwrap_err();
    assert!(matches!(err, Error::InvalidOption { ref option, .. } if option == "config"));
}

#[test]
fn test_validation_happens_before_comparison() {
    let cases = [
        (value!({"verbose_level": 3}), "verbose_level"),
        (value!({"significant_digits": 18}), "significant_digits"),
        (value!({"rtol": (-0.5)}), "rtol"),
        (value!({"ignore_type_in_groups": [[]]}), "ignore_type_in_groups"),
        (value!({"exclude_paths": "foo['bar']"}), "exclude_paths"),
    ];
    for (config, expected) in cases {
        match DeepDiff::from_config(value!(1), value!(1), &config) {
            Err(Error::InvalidOption { option, .. }) => assert_eq!(option, expected),
            other => panic!("Expected invalid `{}`, got {:?}", expected, other.map(|d| d.to_dict())),
        }
    }
}

#[test]
fn test_path_patterns_are_normalized() {
    let result = DeepDiff::with_options(
        value!({"a": 1, "b": 1}),
        value!({"a": 2, "b": 2}),
        DiffOptions::new().exclude_paths(["root[\"a\"]"]),
    )
    .unwrap();
    let paths: Vec<&str> = result.report().iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["root['b']"]);
}

#[test]
fn test_config_drives_comparison() {
    let config = value!({"ignore_order": true, "verbose_level": 0});
    let result = DeepDiff::from_config(value!([1, 2, 3]), value!([3, 2, 4]), &config).unwrap();
    assert_eq!(
        result.to_dict(),
        value!({
            "iterable_item_added": ["root[1]"],
            "iterable_item_removed": ["root[0]"]
        })
    );
}

#[test]
fn test_config_accepts_shared_mapping() {
    let config = Value::shared(value!({"atol": 1}));
    let result = DeepDiff::from_config(value!(1.0), value!(1.5), &config).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_config_loaded_from_json() {
    let config: Value = serde_json::from_str(
        r#"{
            "ignore_order": true,
            "atol": 0.5,
            "exclude_paths": ["root['meta']"],
            "ignore_type_in_groups": [["int", "float"]]
        }"#,
    )
    .unwrap();
    let options = DiffOptions::from_value(&config).unwrap();
    assert!(options.ignore_order);
    assert_eq!(options.atol, Some(0.5));
    assert_eq!(options.ignore_type_in_groups, vec![vec![TypeTag::INT, TypeTag::FLOAT]]);

    let result = DeepDiff::from_config(
        value!({"items": [1, 2], "meta": 1}),
        value!({"items": [2.2, 1], "meta": 2}),
        &config,
    )
    .unwrap();
    assert!(result.is_empty());

    let unknown: Value = serde_json::from_str(r#"{"colour": "red"}"#).unwrap();
    assert_eq!(
        DeepDiff::from_config(value!(1), value!(1), &unknown).unwrap_err(),
        Error::unknown_option("colour")
    );
}
