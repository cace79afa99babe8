//! Exit code constants for the repo-stages CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown project or workflow)
//! - 2: Configuration failure (malformed or invalid atlantis.yaml)
//! - 3: I/O failure (config file exists but cannot be read)
//! - 4: Step failure (the tool executor reported an error)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or a project/workflow the config does not declare.
pub const USER_ERROR: i32 = 1;

/// Configuration failure: schema or validation error in atlantis.yaml.
pub const CONFIG_FAILURE: i32 = 2;

/// I/O failure: the config file could not be read.
pub const IO_FAILURE: i32 = 3;

/// Step failure: the tool executor returned an error.
pub const STEP_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, CONFIG_FAILURE, IO_FAILURE, STEP_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
