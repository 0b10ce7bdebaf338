pub mod cycles;
pub mod filter;
pub mod order;

use std::path::Path;

use cisrank_core::ComponentSet;
use cisrank_core::error::ErrorCode;
use cisrank_core::model::component::{ComponentIoError, load_components};

use crate::output::{CliError, OutputMode, render_error};

/// Load the scanner's component JSON, rendering a coded error on failure.
pub fn load_input(path: &Path, output: OutputMode) -> anyhow::Result<ComponentSet> {
    match load_components(path) {
        Ok(components) => Ok(components),
        Err(err) => {
            render_error(output, &io_error(&err))?;
            Err(err.into())
        }
    }
}

/// Map a component I/O failure to its CLI error.
pub fn io_error(err: &ComponentIoError) -> CliError {
    let code = match err {
        ComponentIoError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            ErrorCode::InputNotFound
        }
        ComponentIoError::Read { .. } => ErrorCode::InternalUnexpected,
        ComponentIoError::Parse { .. } => ErrorCode::InputParseError,
        ComponentIoError::Write { .. } => ErrorCode::OutputWriteFailed,
    };
    CliError::from_code(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_file_maps_to_input_not_found() {
        let err = ComponentIoError::Read {
            path: PathBuf::from("nope.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let cli = io_error(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E1001"));
        assert!(cli.message.contains("nope.json"));
    }

    #[test]
    fn parse_failure_maps_to_input_parse_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid");
        let err = ComponentIoError::Parse {
            path: PathBuf::from("bad.json"),
            source,
        };
        assert_eq!(io_error(&err).error_code.as_deref(), Some("E1002"));
    }
}
