//! Scoped changes to render state shared between pipeline stages.

/// Disables depth writes on a frame buffer for the lifetime of the guard.
///
/// The previous value is restored on drop, so early returns and `?` inside
/// a pass cannot leak the change to sibling passes.
pub struct DepthWriteScope<'a> {
    flag: &'a mut bool,
    previous: bool,
}

impl<'a> DepthWriteScope<'a> {
    /// Capture the current flag and clear it.
    pub fn disable(flag: &'a mut bool) -> Self {
        let previous = *flag;
        *flag = false;
        Self { flag, previous }
    }

    /// The value that will be restored.
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl Drop for DepthWriteScope<'_> {
    fn drop(&mut self) {
        *self.flag = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_enabled_flag() {
        let mut depth_write = true;
        {
            let scope = DepthWriteScope::disable(&mut depth_write);
            assert!(scope.previous());
        }
        assert!(depth_write);
    }

    #[test]
    fn keeps_disabled_flag_disabled() {
        let mut depth_write = false;
        drop(DepthWriteScope::disable(&mut depth_write));
        assert!(!depth_write);
    }

    #[test]
    fn restores_on_error_path() {
        fn failing(flag: &mut bool) -> Result<(), &'static str> {
            let _scope = DepthWriteScope::disable(flag);
            Err("draw failed")
        }
        let mut depth_write = true;
        assert!(failing(&mut depth_write).is_err());
        assert!(depth_write);
    }
}
