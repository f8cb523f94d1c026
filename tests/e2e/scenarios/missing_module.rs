use crate::harness::{init_tracing, RecordingTerraform};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tfh_core::{
    run_with_teardown, DestroyGuard, Options, Teardown, Terraform, TerraformCli, TfError,
};

#[test]
fn test_missing_module_fails_and_still_tears_down() {
    init_tracing();
    let tf = RecordingTerraform::new(TerraformCli::new());
    let options = Options::new("../demos/does-not-exist");

    let err = run_with_teardown(&tf, &options, Teardown::Always).unwrap_err();

    assert!(matches!(err, TfError::ModuleDirNotFound(_)));
    assert_eq!(tf.commands(), vec!["init", "destroy"]);
    assert_eq!(tf.count("destroy"), 1);
}

#[test]
fn test_missing_module_guard_destroys_once_while_failing() {
    init_tracing();
    let tf = RecordingTerraform::new(TerraformCli::new());
    let options = Options::new("../demos/does-not-exist");

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _teardown = DestroyGuard::new(&tf, &options);
        tf.init_and_apply(&options)
            .expect("init and apply should fail for a missing module");
    }));

    assert!(result.is_err());
    assert_eq!(tf.commands(), vec!["init", "destroy"]);
}

#[test]
fn test_destroy_gets_the_same_options() {
    init_tracing();
    let tf = RecordingTerraform::new(TerraformCli::new());
    let options = Options::new("../demos/does-not-exist")
        .with_var("name", "e2e")
        .with_lock(false);

    let _ = run_with_teardown(&tf, &options, Teardown::Always);

    let seen = tf.options();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|o| *o == options));
}
