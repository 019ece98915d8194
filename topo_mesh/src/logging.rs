//! Log sink setup for the add-on.

use std::fs::File;

/// Environment variable naming a file that receives the log output.
pub const LOG_FILE_VAR: &str = "TOPO_MESH_LOG";

/// Installs the global logger. Output goes to the file named by
/// `TOPO_MESH_LOG` when set, otherwise to stderr; filtering follows
/// `RUST_LOG`. Calling this more than once is harmless.
pub fn init() {
    let mut builder = env_logger::Builder::from_default_env();
    if let Ok(path) = std::env::var(LOG_FILE_VAR) {
        match File::create(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Failed to create log file {}: {}", path, e),
        }
    }
    let _ = builder.try_init();
}

/// Logger for unit and integration tests.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
