use airdrop_kit::{
    output::{write_address_json, write_allocation_csv, write_line_json, write_parameter_batches},
    types::Allocation,
};
use ethers_core::types::U256;
use std::fs;
use test_log::test;

fn allocations(n: usize) -> Vec<Allocation> {
    (0..n)
        .map(|i| Allocation {
            address: format!("0x{:040x}", i),
            amount: U256::from(i as u64 * 8),
        })
        .collect()
}

#[test]
fn test_parameter_files_are_chunked_by_batch_size() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("parameters");
    let allocations = allocations(1201);

    let files = write_parameter_batches(&out, &allocations, 500).unwrap();
    assert_eq!(files.len(), 3);
    assert!(files[2].ends_with("parameter2.txt"));

    let last = fs::read_to_string(&files[2]).unwrap();
    let (addresses, amounts) = last.split_once("\n\n").unwrap();
    let addresses: Vec<String> = serde_json::from_str(addresses).unwrap();
    let amounts: Vec<String> = serde_json::from_str(amounts).unwrap();
    assert_eq!(addresses.len(), 201);
    assert_eq!(amounts.len(), 201);
    assert_eq!(addresses[0], format!("0x{:040x}", 1000));
    assert_eq!(amounts[0], "8000");
}

#[test]
fn test_no_allocations_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_parameter_batches(dir.path(), &[], 500).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_address_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("addresses.txt");
    let list = vec!["0xa".to_string(), "0xb".to_string()];

    write_address_json(&path, &list).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), r#"["0xa","0xb"]"#);

    let line_path = dir.path().join("targets.json");
    write_line_json(&line_path, &list).unwrap();
    let text = fs::read_to_string(&line_path).unwrap();
    assert_eq!(text.lines().count(), 2);
    let parsed: Vec<String> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, list);
}

#[test]
fn test_allocation_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("allocations.csv");
    write_allocation_csv(&path, &allocations(2)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("address,amount"));
    assert_eq!(lines.next(), Some(format!("0x{:040x},0", 0).as_str()));
    assert_eq!(lines.next(), Some(format!("0x{:040x},8", 1).as_str()));
}
