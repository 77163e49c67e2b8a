#[cfg(test)]
pub mod test_utils {
    use crate::config::{initialize_app_state, Settings};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use tempfile::TempDir;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Writes the fixture CSV files into a fresh temporary directory.
    ///
    /// The directory is removed when the returned guard is dropped, so callers
    /// keep it alive for as long as the state is used.
    pub fn setup_test_data_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        compute::testing::write_fixture_files(dir.path()).expect("Failed to write fixture files");
        dir
    }

    /// Create AppState for testing
    pub fn setup_test_app_state() -> (AppState, TempDir) {
        let dir = setup_test_data_dir();
        let settings = Settings::default().with_overrides(Some(dir.path().to_path_buf()), None);
        let state = initialize_app_state(settings).expect("Failed to load fixture data");
        (state, dir)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set. The subscriber is installed once per
    /// test binary; later calls keep the first one.
    fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        if FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .try_init()
            .is_err()
        {
            tracing::trace!("Test tracing already initialized");
        }
    }

    /// Create axum app for testing
    pub fn setup_test_app() -> (Router, TempDir) {
        init_test_tracing();

        let (state, dir) = setup_test_app_state();
        (create_router(state), dir)
    }
}
