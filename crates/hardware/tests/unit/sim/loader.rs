//! Program Loading Tests.
//!
//! Verifies that images read from disk land in micro memory unchanged and that
//! I/O and sizing failures surface as errors.

use std::io::Write;

use crate::common::builder::micro;
use crate::common::builder::program::Program;
use crate::common::harness::TestContext;
use vusim_core::VuError;
use vusim_core::core::StepOutcome;
use vusim_core::sim::loader::load_binary;

#[test]
fn test_load_binary_reads_bytes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(load_binary(file.path()).unwrap(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_binary(dir.path().join("absent.bin")).unwrap_err();
    assert!(matches!(err, VuError::Io(_)));
}

#[test]
fn test_program_file_runs() {
    let program = Program::new().lower(micro::iaddiu(3, 0, 42)).end();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&program.bytes()).unwrap();

    let mut ctx = TestContext::new();
    ctx.vu.load_program_file(file.path()).unwrap();
    assert_eq!(&ctx.vu.micro_mem()[..program.bytes().len()], program.bytes().as_slice());
    ctx.vu.start(0);
    let summary = ctx.run();
    assert_eq!(summary.outcome, StepOutcome::Completed);
    assert_eq!(ctx.vi(3), 42);
}

#[test]
fn test_oversized_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![0u8; 16 * 1024 + 8]).unwrap();
    let mut ctx = TestContext::new();
    let err = ctx.vu.load_program_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        VuError::ProgramTooLarge {
            size: 16392,
            capacity: 16384
        }
    ));
}

#[test]
fn test_load_program_at_offset() {
    let mut ctx = TestContext::new();
    ctx.vu.load_program(0x100, &[0xAA; 8]).unwrap();
    assert_eq!(ctx.vu.micro_mem()[0x100], 0xAA);
    assert_eq!(ctx.vu.micro_mem()[0xFF], 0);
    assert!(ctx.vu.load_program(16 * 1024 - 4, &[0; 8]).is_err());
}
