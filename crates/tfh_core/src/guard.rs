//! Scoped teardown for provisioned modules.

use crate::error::Result;
use crate::options::Options;
use crate::terraform::{CommandOutput, Terraform};
use tracing::{error, warn};

/// Runs `terraform destroy` when it goes out of scope.
///
/// Create it right after the [`Options`] and before any fallible operation.
/// Destroy runs at most once: either through [`DestroyGuard::finish`], or on
/// drop (including while unwinding from a panic). The same borrowed
/// `Options` is used for destroy as for everything else in the run.
///
/// A destroy failure on drop panics, unless the thread is already
/// panicking, in which case it is logged so the original failure is kept.
#[must_use = "dropping the guard immediately destroys the module"]
pub struct DestroyGuard<'a, T: Terraform + ?Sized> {
    tf: &'a T,
    options: &'a Options,
    armed: bool,
}

impl<'a, T: Terraform + ?Sized> DestroyGuard<'a, T> {
    /// Register teardown of `options` through `tf`.
    pub fn new(tf: &'a T, options: &'a Options) -> Self {
        Self {
            tf,
            options,
            armed: true,
        }
    }

    /// Destroy now and return the result instead of panicking on failure.
    pub fn finish(mut self) -> Result<CommandOutput> {
        self.armed = false;
        self.tf.destroy(self.options)
    }

    /// Leave the resources in place.
    pub fn disarm(mut self) {
        warn!(
            dir = %self.options.dir().display(),
            "teardown skipped; resources are left provisioned"
        );
        self.armed = false;
    }
}

impl<T: Terraform + ?Sized> Drop for DestroyGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;

        if let Err(e) = self.tf.destroy(self.options) {
            if std::thread::panicking() {
                error!(
                    dir = %self.options.dir().display(),
                    "destroy failed during unwinding: {}", e
                );
            } else {
                panic!(
                    "terraform destroy failed for {}: {}",
                    self.options.dir().display(),
                    e
                );
            }
        }
    }
}
