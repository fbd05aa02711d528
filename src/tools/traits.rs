/// Common interface for the external programs wrapped by this crate
use crate::tools::runner::{execute, RunResult};
use crate::Result;

pub trait ExternalTool {
    /// Display name of the tool
    fn name(&self) -> &str;

    /// Executable name or path
    fn binary(&self) -> &str;

    /// Argument that makes the tool print its version and exit
    fn version_flag(&self) -> &str {
        "-h"
    }

    /// Run the tool with `args`, failing with `ToolFailed` on a non-zero exit
    fn run(&self, args: &[String], stdin: Option<&str>) -> Result<RunResult> {
        let mut command = Vec::with_capacity(args.len() + 1);
        command.push(self.binary().to_string());
        command.extend(args.iter().cloned());
        execute(&command, stdin)?.check()
    }

    /// Verify that the tool is properly installed
    fn verify_installation(&self) -> Result<()> {
        // Some tools exit non-zero on their help flag; spawning is what matters
        execute(&[self.binary(), self.version_flag()], None)?;
        tracing::debug!("{} found at '{}'", self.name(), self.binary());
        Ok(())
    }
}
