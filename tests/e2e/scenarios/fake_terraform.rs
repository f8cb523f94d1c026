use crate::harness::{
    init_tracing, process_lock, FakeTerraform, RecordingTerraform, TestWorkspace,
};
use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tfh_core::{
    run_with_teardown, DestroyGuard, Options, Teardown, Terraform, TerraformCli, TfError,
};

fn setup(fail_on: Option<&str>) -> (TestWorkspace, FakeTerraform, Options) {
    init_tracing();
    let workspace = TestWorkspace::from_demo("complete").unwrap();
    let fake = FakeTerraform::install_failing(workspace.path(), fail_on).unwrap();
    let options = Options::new(workspace.module_dir()).with_binary(fake.binary());
    (workspace, fake, options)
}

#[test]
fn test_success_runs_init_apply_destroy_in_module_dir() {
    let _lock = process_lock();
    let (workspace, fake, options) = setup(None);

    let report = run_with_teardown(&TerraformCli::new(), &options, Teardown::Always).unwrap();

    assert_eq!(fake.commands().unwrap(), vec!["init", "apply", "destroy"]);
    assert_eq!(report.apply.stdout.trim(), "apply complete");
    assert_eq!(report.destroy.unwrap().stdout.trim(), "destroy complete");

    let module_dir = fs::canonicalize(workspace.module_dir()).unwrap();
    for invocation in fake.invocations().unwrap() {
        assert_eq!(fs::canonicalize(&invocation.dir).unwrap(), module_dir);
    }
}

#[test]
fn test_arguments_passed_to_terraform() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(None);
    let options = options
        .with_var("name", "e2e")
        .with_backend_config("path", "e2e.tfstate")
        .with_no_color(true);

    run_with_teardown(&TerraformCli::new(), &options, Teardown::Always).unwrap();

    let args: Vec<String> = fake
        .invocations()
        .unwrap()
        .into_iter()
        .map(|i| i.args)
        .collect();
    assert_eq!(
        args,
        vec![
            "init -input=false -upgrade=false -backend-config=path=e2e.tfstate -no-color",
            "apply -input=false -auto-approve -var name=e2e -no-color",
            "destroy -input=false -auto-approve -var name=e2e -no-color",
        ]
    );
}

#[test]
fn test_apply_failure_still_destroys_exactly_once() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(Some("apply"));

    let err = run_with_teardown(&TerraformCli::new(), &options, Teardown::Always).unwrap_err();

    match err {
        TfError::CommandFailed {
            command,
            code,
            stderr,
        } => {
            assert_eq!(command, "apply");
            assert_eq!(code, Some(1));
            assert!(stderr.contains("simulated apply failure"));
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
    assert_eq!(fake.commands().unwrap(), vec!["init", "apply", "destroy"]);
}

#[test]
fn test_init_failure_skips_apply_but_destroys() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(Some("init"));

    assert!(run_with_teardown(&TerraformCli::new(), &options, Teardown::Always).is_err());
    assert_eq!(fake.commands().unwrap(), vec!["init", "destroy"]);
}

#[test]
fn test_destroy_failure_fails_the_run() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(Some("destroy"));

    let err = run_with_teardown(&TerraformCli::new(), &options, Teardown::Always).unwrap_err();

    assert!(matches!(err, TfError::CommandFailed { ref command, .. } if command == "destroy"));
    assert!(err.recovery_suggestion().is_some());
    assert_eq!(fake.commands().unwrap(), vec!["init", "apply", "destroy"]);
}

#[test]
fn test_guard_destroys_when_test_body_panics() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(Some("apply"));
    let tf = TerraformCli::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _teardown = DestroyGuard::new(&tf, &options);
        tf.init_and_apply(&options).expect("apply is rigged to fail");
    }));

    assert!(result.is_err());
    assert_eq!(fake.commands().unwrap(), vec!["init", "apply", "destroy"]);
}

#[test]
fn test_guard_destroy_failure_fails_the_test() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(Some("destroy"));
    let tf = TerraformCli::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _teardown = DestroyGuard::new(&tf, &options);
        tf.init_and_apply(&options).unwrap();
    }));

    assert!(result.is_err());
    assert_eq!(fake.commands().unwrap(), vec!["init", "apply", "destroy"]);
}

#[test]
fn test_skip_teardown_leaves_resources() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(None);

    let report = run_with_teardown(&TerraformCli::new(), &options, Teardown::Skip).unwrap();

    assert!(report.destroy.is_none());
    assert_eq!(fake.commands().unwrap(), vec!["init", "apply"]);
}

#[test]
fn test_outputs_and_version() {
    let _lock = process_lock();
    let (_workspace, fake, options) = setup(None);
    let tf = TerraformCli::new();

    let outputs = tf.output_json(&options).unwrap();
    assert_eq!(outputs["name"], "complete");

    assert!(TerraformCli::is_available(fake.binary()));
    assert_eq!(
        TerraformCli::version(fake.binary()).unwrap(),
        "Terraform v1.9.5-fake"
    );
}

#[test]
fn test_recorded_options_match_executed_dir() {
    let _lock = process_lock();
    let (workspace, fake, options) = setup(None);
    let tf = RecordingTerraform::new(TerraformCli::new());

    run_with_teardown(&tf, &options, Teardown::Always).unwrap();

    assert_eq!(tf.count("destroy"), 1);
    assert!(tf
        .options()
        .iter()
        .all(|o| o.terraform_dir == workspace.module_dir()));
    assert_eq!(fake.invocations().unwrap().len(), 3);
}
