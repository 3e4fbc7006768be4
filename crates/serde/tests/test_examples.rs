use clinwire_fhir::datatypes::ExtensionValue;
use clinwire_fhir::{
    Binary, DecodeContext, DecodeOptions, EmptyChoicePolicy, Media, ResourceRegistry,
};
use clinwire_serde::{
    SerdeError, from_json_str, from_json_str_with, resource_from_json_str, to_json_string_pretty,
    to_json_value,
};
use rust_decimal_macros::dec;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[test]
fn test_json_examples() {
    let dir = tests_data_root();
    let mut checked = 0;
    let mut failed = Vec::new();

    for path in json_files(&dir) {
        let text = fs::read_to_string(&path).unwrap();
        let original: Value = serde_json::from_str(&text).unwrap();

        let resource = match resource_from_json_str(&text) {
            Ok(resource) => resource,
            Err(err) => {
                failed.push(format!("{}: decode failed: {err}", path.display()));
                continue;
            }
        };
        let reserialized = to_json_value(&resource).unwrap();

        let differences = find_json_differences(&original, &reserialized);
        if !differences.is_empty() {
            for (diff_path, orig, reser) in &differences {
                println!("{}: {diff_path}: {orig} != {reser}", path.display());
            }
            failed.push(format!("{}: {} differences", path.display(), differences.len()));
        }
        checked += 1;
    }

    assert!(failed.is_empty(), "example round trips failed:\n{}", failed.join("\n"));
    assert!(checked >= 4, "expected at least 4 examples, found {checked}");
}

#[test]
fn test_typed_decode_matches_polymorphic_decode() {
    let text = fs::read_to_string(tests_data_root().join("media-contained.json")).unwrap();
    let typed: Media = from_json_str(&text).unwrap();
    let any = resource_from_json_str(&text).unwrap();
    assert_eq!(any.downcast_ref::<Media>(), Some(&typed));
}

#[test]
fn test_decimal_precision_is_kept() {
    let text = fs::read_to_string(tests_data_root().join("media-contained.json")).unwrap();
    let media: Media = from_json_str(&text).unwrap();

    let acquisition = &media.domain.extension[0];
    let Some(ExtensionValue::Decimal(kvp)) = &acquisition.extension[0].value else {
        panic!("expected decimal extension value");
    };
    assert_eq!(kvp.value().map(|d| d.0), Some(dec!(120.50)));

    let pretty = to_json_string_pretty(&media).unwrap();
    assert!(pretty.contains("120.50"), "{pretty}");
}

#[test]
fn test_key_order_follows_resource_layout() {
    let text = fs::read_to_string(tests_data_root().join("binary-example.json")).unwrap();
    let binary: Binary = from_json_str(&text).unwrap();
    let value = to_json_value(&binary).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["resourceType", "id", "meta", "contentType", "securityContext", "content"]
    );
}

#[test]
fn test_empty_choice_policy_through_context() {
    let text = r#"{
        "resourceType": "Media",
        "type": {"text": "photo"},
        "content": {},
        "_occurrenceDateTime": {}
    }"#;

    let lenient: Media = from_json_str(text).unwrap();
    assert_eq!(lenient.occurrence, None);

    let cx = DecodeContext::new(
        ResourceRegistry::global(),
        DecodeOptions::new().with_empty_choice(EmptyChoicePolicy::Reject),
    );
    let err = from_json_str_with::<Media>(text, &cx).unwrap_err();
    assert!(matches!(err, SerdeError::Codec(_)), "{err}");
}

fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

// Function to find differences between two JSON values
fn find_json_differences(original: &Value, reserialized: &Value) -> Vec<(String, Value, Value)> {
    let mut differences = Vec::new();
    compare_json_values(original, reserialized, String::new(), &mut differences);
    differences
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

// Recursively compare JSON values and collect differences
fn compare_json_values(
    original: &Value,
    reserialized: &Value,
    path: String,
    differences: &mut Vec<(String, Value, Value)>,
) {
    match (original, reserialized) {
        (Value::Object(orig_obj), Value::Object(reser_obj)) => {
            for (key, orig_val) in orig_obj {
                match reser_obj.get(key) {
                    Some(reser_val) => compare_json_values(
                        orig_val,
                        reser_val,
                        child_path(&path, key),
                        differences,
                    ),
                    None => {
                        differences.push((child_path(&path, key), orig_val.clone(), Value::Null))
                    }
                }
            }
            for (key, reser_val) in reser_obj {
                if !orig_obj.contains_key(key) {
                    differences.push((child_path(&path, key), Value::Null, reser_val.clone()));
                }
            }
        }
        (Value::Array(orig_arr), Value::Array(reser_arr)) if orig_arr.len() == reser_arr.len() => {
            for (i, (orig_val, reser_val)) in orig_arr.iter().zip(reser_arr.iter()).enumerate() {
                compare_json_values(orig_val, reser_val, format!("{path}[{i}]"), differences);
            }
        }
        _ => {
            if original != reserialized {
                differences.push((path, original.clone(), reserialized.clone()));
            }
        }
    }
}

fn tests_data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}
