/// Release actions for handles created during initialization, run in reverse
/// order of registration when the stack is dropped.
#[derive(Default)]
pub struct ReleaseStack {
    actions: Vec<(&'static str, Box<dyn FnOnce()>)>,
}

impl ReleaseStack {
    /// Registers the release of a handle that was just created.
    pub fn push(&mut self, name: &'static str, release: impl FnOnce() + 'static) {
        self.actions.push((name, Box::new(release)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn release_all(&mut self) {
        while let Some((name, release)) = self.actions.pop() {
            tracing::debug!("Releasing {}.", name);
            release();
        }
    }
}

impl Drop for ReleaseStack {
    fn drop(&mut self) {
        self.release_all();
    }
}
