//! Direct or elevated invocation of privileged control commands.
//!
//! The privilege decision is made in one place: [`invocation_strategy`] turns
//! "are we root?" plus the configured wrapper into an [`InvocationStrategy`],
//! which then builds the concrete argv.

#![allow(missing_docs)]

/// How a privileged command is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationStrategy {
    /// Already privileged: run the command as-is.
    Direct,
    /// Run through a wrapper such as `sudo`.
    Elevated { wrapper: Vec<String> },
}

impl InvocationStrategy {
    /// Full argv (program first) for `command` under this strategy.
    #[must_use]
    pub fn argv(&self, command: &[String]) -> Vec<String> {
        match self {
            Self::Direct => command.to_vec(),
            Self::Elevated { wrapper } => wrapper.iter().chain(command).cloned().collect(),
        }
    }
}

/// Pick the invocation strategy for the current process.
#[must_use]
pub fn invocation_strategy(elevation_command: &[String]) -> InvocationStrategy {
    strategy_for(is_running_as_root(), elevation_command)
}

/// Pure form of [`invocation_strategy`] with the privilege check supplied.
#[must_use]
pub fn strategy_for(privileged: bool, elevation_command: &[String]) -> InvocationStrategy {
    if privileged {
        InvocationStrategy::Direct
    } else {
        InvocationStrategy::Elevated {
            wrapper: elevation_command.to_vec(),
        }
    }
}

/// Check whether the current process is running as root.
///
/// Uses `nix::unistd::geteuid()` on Unix; always returns `false` on other
/// platforms, so commands there always go through the wrapper.
#[must_use]
pub fn is_running_as_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}
