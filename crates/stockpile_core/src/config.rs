//! Store configuration.

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to create the store directory if it doesn't exist.
    pub create_if_missing: bool,

    /// File name of the durable snapshot inside the store directory.
    pub durable_file_name: String,

    /// Directory name for backups inside the store directory.
    pub backup_dir_name: String,

    /// Default threshold for low-stock queries and reports.
    pub low_stock_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            durable_file_name: "inventory.json".to_string(),
            backup_dir_name: "backups".to_string(),
            low_stock_threshold: 5,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the store directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets the durable snapshot file name.
    #[must_use]
    pub fn durable_file_name(mut self, name: impl Into<String>) -> Self {
        self.durable_file_name = name.into();
        self
    }

    /// Sets the backup directory name.
    #[must_use]
    pub fn backup_dir_name(mut self, name: impl Into<String>) -> Self {
        self.backup_dir_name = name.into();
        self
    }

    /// Sets the default low-stock threshold.
    #[must_use]
    pub const fn low_stock_threshold(mut self, threshold: u64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }
}
