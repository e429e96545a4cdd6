//! Command trait for the intray CLI
//!
//! Every subcommand implements [`Command`] so they share one way of
//! receiving the loaded configuration and the hook engine.

use crate::common::RuntimeContext;
use anyhow::Result;

/// Trait for all intray commands
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     pub point: String,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> anyhow::Result<()> {
///         context.engine.run(&self.point, Vec::<String>::new())?;
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
