// SPDX-License-Identifier: Apache-2.0

use aiact_core::{ExitCode, MachineError, ResultExt};

#[test]
fn result_ext_attaches_static_context_without_allocation() {
    let r: Result<(), &str> = Err("bad");
    let err = r.with_context("parse policy").expect_err("must error");
    assert_eq!(err.context, "parse policy");
    assert_eq!(err.source, "bad");
    assert_eq!(err.to_string(), "parse policy: bad");
}

#[test]
fn machine_error_details_are_sorted_and_serializable() {
    let err = MachineError::new("usage_error", "missing input")
        .with_detail("z", "1")
        .with_detail("a", "2");
    let text = serde_json::to_string(&err).expect("encode");
    assert_eq!(
        text,
        r#"{"code":"usage_error","message":"missing input","details":{"a":"2","z":"1"}}"#
    );
    assert_eq!(err.to_string(), "[usage_error] missing input");
    assert_eq!(ExitCode::Validation.code(), 3);
    assert_eq!(ExitCode::DependencyFailure.class(), "dependency_failure");
}
