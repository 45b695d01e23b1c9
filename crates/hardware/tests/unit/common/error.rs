//! Error Type Tests.
//!
//! Verifies the messages and conversions of `VuError`.

use vusim_core::VuError;
use vusim_core::config::UnitKind;

#[test]
fn test_snapshot_mismatch_message() {
    let err = VuError::SnapshotMismatch {
        what: "data memory",
        expected: 16384,
        found: 4096,
    };
    assert_eq!(err.to_string(), "snapshot data memory is 4096 bytes, unit expects 16384");
}

#[test]
fn test_unit_mismatch_message() {
    let err = VuError::UnitMismatch {
        expected: UnitKind::Vu1,
        found: UnitKind::Vu0,
    };
    assert_eq!(err.to_string(), "snapshot belongs to Vu0, unit is Vu1");
}

#[test]
fn test_program_too_large_message() {
    let err = VuError::ProgramTooLarge {
        size: 5000,
        capacity: 4096,
    };
    assert!(err.to_string().contains("5000"));
    assert!(err.to_string().contains("4096"));
}

#[test]
fn test_json_errors_convert() {
    let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
    let err: VuError = json_err.into();
    assert!(matches!(err, VuError::Serialization(_)));
}

#[test]
fn test_io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: VuError = io.into();
    assert!(matches!(err, VuError::Io(_)));
    assert!(err.to_string().contains("missing"));
}
