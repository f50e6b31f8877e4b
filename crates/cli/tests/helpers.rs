use table_compare::{parse_dataset, split_names};
use tablecmp_core::model::Dataset;

#[test]
fn parse_dataset_accepts_supported_tags() {
    assert_eq!(parse_dataset("setA"), Ok(Dataset::SetA));
    assert_eq!(parse_dataset("setC"), Ok(Dataset::SetC));
}

#[test]
fn parse_dataset_rejects_other_tags() {
    let err = parse_dataset("setB").unwrap_err();
    assert!(err.contains("Please choose one from setA or setC"), "unexpected error: {err}");
}

#[test]
fn split_names_accepts_commas_and_repeats() {
    let values = vec!["objdump,readelf".to_string(), " nm ".to_string(), ",".to_string()];
    assert_eq!(split_names(&values), vec!["objdump", "readelf", "nm"]);
}
