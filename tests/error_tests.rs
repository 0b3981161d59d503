// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use querygate::error::{baseline_write_error, config_error, document_parse_error, file_read_error};

#[test]
fn test_file_read_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error = file_read_error("/path/to/results.json", io_error);
    let _msg = error.to_string();
}

#[test]
fn test_document_parse_error() {
    let json_error = serde_json::from_str::<Vec<String>>("[1").unwrap_err();
    let error = document_parse_error("queries.json", json_error);
    let _msg = error.to_string();
}

#[test]
fn test_baseline_write_error() {
    let error = baseline_write_error(".querygate.json", "permission denied");
    let _msg = error.to_string();
}

#[test]
fn test_config_error() {
    let error = config_error("Invalid configuration value");
    let _msg = error.to_string();
}

#[test]
fn test_error_types_are_different() {
    let io_error = std::io::Error::other("boom");
    let read_err = file_read_error("a.json", io_error);
    let parse_err =
        document_parse_error("a.json", serde_json::from_str::<u64>("x").unwrap_err());
    let write_err = baseline_write_error("a.json", "boom");
    let config_err = config_error("test");
    assert!(!read_err.to_string().is_empty());
    assert!(!parse_err.to_string().is_empty());
    assert!(!write_err.to_string().is_empty());
    assert!(!config_err.to_string().is_empty());
}
