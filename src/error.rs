//! Boot-time error codes.
//!
//! Traps never produce a `KernelError`: a non-timer trap is fatal and halts
//! the hart (see `trap`).

/// Kernel error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// The stack top is too low to carve out the stack of task `task`.
    StackUnderflow { task: usize },
    /// A logger was already installed.
    LoggerInstalled,
}

impl From<log::SetLoggerError> for KernelError {
    fn from(_value: log::SetLoggerError) -> Self {
        Self::LoggerInstalled
    }
}

impl KernelError {
    pub fn as_str(&self) -> &'static str {
        match self {
            KernelError::StackUnderflow { .. } => "task stack underflows the stack top",
            KernelError::LoggerInstalled => "logger already installed",
        }
    }
}

impl core::fmt::Display for KernelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KernelError::StackUnderflow { task } => write!(f, "{} (task {})", self.as_str(), task),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_task() {
        let err = KernelError::StackUnderflow { task: 1 };
        assert_eq!(err.to_string(), "task stack underflows the stack top (task 1)");
        assert_eq!(KernelError::LoggerInstalled.to_string(), "logger already installed");
    }
}
