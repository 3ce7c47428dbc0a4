//! Store open/create options.

/// Options for creating or opening a store.
#[derive(Debug, Clone)]
pub struct Options {
    /// Whether to error if the file already exists on create.
    pub error_if_exists: bool,

    /// Whether to fsync after every mutating call (safer but slower).
    pub sync_on_write: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            error_if_exists: false,
            sync_on_write: false,
        }
    }
}

impl Options {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether create fails when the file already exists.
    #[must_use]
    pub const fn error_if_exists(mut self, value: bool) -> Self {
        self.error_if_exists = value;
        self
    }

    /// Sets whether to fsync after every mutating call.
    #[must_use]
    pub const fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = Options::default();
        assert!(!options.error_if_exists);
        assert!(!options.sync_on_write);
    }

    #[test]
    fn builder_pattern() {
        let options = Options::new().error_if_exists(true).sync_on_write(true);

        assert!(options.error_if_exists);
        assert!(options.sync_on_write);
    }
}
