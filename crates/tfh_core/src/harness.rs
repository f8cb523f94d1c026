//! Init, apply, and guaranteed destroy of one module.

use crate::config::skip_destroy_from_env;
use crate::error::Result;
use crate::guard::DestroyGuard;
use crate::options::Options;
use crate::terraform::{CommandOutput, Terraform};
use tracing::{info, warn};

/// What happens to the resources after apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    /// Destroy on every exit path.
    Always,
    /// Leave everything provisioned.
    Skip,
}

impl Teardown {
    /// [`Teardown::Skip`] when `TFH_SKIP_DESTROY` is set, otherwise [`Teardown::Always`].
    pub fn from_env() -> Self {
        if skip_destroy_from_env() {
            Teardown::Skip
        } else {
            Teardown::Always
        }
    }
}

/// Outputs of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Output of the apply step.
    pub apply: CommandOutput,
    /// Output of destroy, `None` when teardown was skipped.
    pub destroy: Option<CommandOutput>,
}

/// Init and apply the module, then destroy it, honouring `TFH_SKIP_DESTROY`.
pub fn run_init_apply_destroy<T: Terraform + ?Sized>(
    tf: &T,
    options: &Options,
) -> Result<RunReport> {
    run_with_teardown(tf, options, Teardown::from_env())
}

/// Init and apply the module with teardown registered before anything runs.
///
/// If apply fails, destroy is still attempted and the apply error is returned;
/// a destroy error in that case is only logged. If apply succeeds, a destroy
/// error is returned.
pub fn run_with_teardown<T: Terraform + ?Sized>(
    tf: &T,
    options: &Options,
    teardown: Teardown,
) -> Result<RunReport> {
    let guard = DestroyGuard::new(tf, options);

    info!(dir = %options.dir().display(), "init and apply");
    let apply = match tf.init_and_apply(options) {
        Ok(output) => output,
        Err(apply_err) => {
            match teardown {
                Teardown::Always => {
                    if let Err(destroy_err) = guard.finish() {
                        warn!(
                            dir = %options.dir().display(),
                            "destroy after failed apply also failed: {}", destroy_err
                        );
                    }
                }
                Teardown::Skip => guard.disarm(),
            }
            return Err(apply_err);
        }
    };

    let destroy = match teardown {
        Teardown::Always => {
            info!(dir = %options.dir().display(), "destroy");
            Some(guard.finish()?)
        }
        Teardown::Skip => {
            guard.disarm();
            None
        }
    };

    Ok(RunReport { apply, destroy })
}
