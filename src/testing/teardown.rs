//! Scope-bound teardown of disposable instances

/// Something a test scope must terminate when it ends
pub trait DisposableInstance: Send {
    /// Stop and remove the instance
    fn terminate(self);
}

/// Terminates a [`DisposableInstance`] exactly once.
///
/// Runs on drop, so termination also happens when the owning test panics
/// part-way through. Calling [`Teardown::run`] early is allowed; later runs
/// and the final drop are then no-ops.
pub struct Teardown<I: DisposableInstance> {
    instance: Option<I>,
}

impl<I: DisposableInstance> Teardown<I> {
    /// Take ownership of `instance` and tie its termination to this guard
    pub fn register(instance: I) -> Self {
        Self {
            instance: Some(instance),
        }
    }

    /// The instance, until it has been terminated
    pub fn instance(&self) -> Option<&I> {
        self.instance.as_ref()
    }

    /// Terminate now, if not done already
    pub fn run(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.terminate();
        }
    }

    /// Whether the instance has been terminated
    pub fn is_done(&self) -> bool {
        self.instance.is_none()
    }
}

impl<I: DisposableInstance> Drop for Teardown<I> {
    fn drop(&mut self) {
        self.run();
    }
}

impl<I: DisposableInstance> std::fmt::Debug for Teardown<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Teardown")
            .field("done", &self.is_done())
            .finish()
    }
}
