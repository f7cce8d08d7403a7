/*!
 # Fire targets

 An action is an opaque side effect executed when the schedule fires.
 Actions are configured once at construction time and run synchronously, in
 order, within the tick that fired them. A failing action is the action's
 own problem: the scheduler logs it and moves on without retrying.
*/

use crate::{Error, Result};
use std::process::Command;
use tracing::{debug, info};

/// A side effect fired by the scheduler
pub trait Action: Send + Sync {
    /// Name used when logging execution and failures
    fn name(&self) -> &str;

    /// Runs the side effect to completion
    fn execute(&self) -> Result<()>;
}

/// Action wrapping a closure
pub struct FnAction<F> {
    name: String,
    func: F,
}

impl<F> FnAction<F>
where
    F: Fn() -> Result<()> + Send + Sync,
{
    /// Creates an action that runs `func` when fired
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn() -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self) -> Result<()> {
        (self.func)()
    }
}

/// Action that emits a log message when fired
pub struct LogAction {
    message: String,
}

impl LogAction {
    /// Creates an action logging `message` on every firing
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Action for LogAction {
    fn name(&self) -> &str {
        "log"
    }

    fn execute(&self) -> Result<()> {
        info!("{}", self.message);
        Ok(())
    }
}

/// Action that runs an external command when fired
pub struct CommandAction {
    program: String,
    args: Vec<String>,
}

impl CommandAction {
    /// Creates an action running `program` with `args` on every firing
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Creates an action from a whitespace-separated command line
    ///
    /// # Arguments
    ///
    /// * `line` - Program followed by its arguments, e.g. `systemctl start lights`
    pub fn from_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::General("empty command line".to_string()))?;
        Ok(Self::new(program, parts.map(str::to_string).collect()))
    }
}

impl Action for CommandAction {
    fn name(&self) -> &str {
        &self.program
    }

    fn execute(&self) -> Result<()> {
        debug!(program = %self.program, args = ?self.args, "Running command");
        let status = Command::new(&self.program).args(&self.args).status()?;
        if !status.success() {
            return Err(Error::ActionFailed {
                name: self.program.clone(),
                reason: format!("exit status {status}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fn_action_runs_the_closure() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let action = FnAction::new("counter", || {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        action.execute().unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(action.name(), "counter");
    }

    #[test]
    fn command_action_parses_a_command_line() {
        let action = CommandAction::from_line("echo hello world").unwrap();
        assert_eq!(action.name(), "echo");
        assert_eq!(action.args, vec!["hello", "world"]);
    }

    #[test]
    fn command_action_rejects_an_empty_line() {
        assert!(CommandAction::from_line("   ").is_err());
    }
}
