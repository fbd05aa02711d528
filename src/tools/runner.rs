/// Child process execution with captured output
use crate::{Result, TerpenomeError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Captured result of one external command
#[derive(Debug, Clone)]
pub struct RunResult {
    pub command: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl RunResult {
    pub fn successful(&self) -> bool {
        self.code == Some(0)
    }

    pub fn command_string(&self) -> String {
        self.command.join(" ")
    }

    /// Convert a failed run into `ToolFailed` with the most descriptive error line
    pub fn check(self) -> Result<Self> {
        if self.successful() {
            return Ok(self);
        }
        let output = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = output.lines().collect();
        Err(TerpenomeError::ToolFailed {
            command: self.command.first().cloned().unwrap_or_default(),
            code: self.code,
            message: find_error(&lines),
        })
    }
}

/// Run `args[0]` with the remaining arguments, optionally feeding `stdin`
pub fn execute<S: AsRef<str>>(args: &[S], stdin: Option<&str>) -> Result<RunResult> {
    let command: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
    let Some((program, rest)) = command.split_first() else {
        return Err(TerpenomeError::InvalidInput("Empty command".to_string()));
    };

    tracing::debug!("Running {}", command.join(" "));

    let mut child = Command::new(program)
        .args(rest)
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TerpenomeError::ToolFailed {
                command: program.clone(),
                code: None,
                message: format!("'{}' not found in PATH", program),
            },
            _ => TerpenomeError::Io(e),
        })?;

    // Feed stdin from a separate thread so a full stdout pipe cannot block us
    let writer = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let input = input.to_string();
            Some(std::thread::spawn(move || pipe.write_all(input.as_bytes())))
        }
        _ => None,
    };

    let output = child.wait_with_output()?;
    if let Some(handle) = writer {
        match handle.join() {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e.into()),
            Err(_) => {
                return Err(TerpenomeError::Other(format!(
                    "stdin writer for {} panicked",
                    program
                )))
            }
            _ => {}
        }
    }

    Ok(RunResult {
        command: command.clone(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code(),
    })
}

/// Most descriptive line of a tool's error output: an `Error:` line joined with
/// the line after it, else the first non-empty line, else `unknown error`
pub fn find_error(lines: &[&str]) -> String {
    if let Some(i) = lines.iter().position(|line| line.starts_with("Error:")) {
        return match lines.get(i + 1) {
            Some(next) => format!("{} {}", lines[i].trim(), next.trim()),
            None => lines[i].trim().to_string(),
        };
    }
    lines
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_error_prefers_error_line() {
        let lines = [
            "",
            "Reading input",
            "Error: Failed to open sequence file",
            "  seqs.fa",
            "more",
        ];
        assert_eq!(find_error(&lines), "Error: Failed to open sequence file seqs.fa");
    }

    #[test]
    fn test_find_error_last_line() {
        assert_eq!(find_error(&["Error: bad"]), "Error: bad");
    }

    #[test]
    fn test_find_error_fallbacks() {
        assert_eq!(find_error(&["", "  something odd  ", "x"]), "something odd");
        assert_eq!(find_error(&["", "  "]), "unknown error");
        assert_eq!(find_error(&[]), "unknown error");
    }

    #[test]
    fn test_check_failed_run() {
        let result = RunResult {
            command: vec!["hmmscan".to_string(), "db.hmm".to_string()],
            stdout: String::new(),
            stderr: "Error: File format problem\nin db.hmm\n".to_string(),
            code: Some(1),
        };
        assert_eq!(result.command_string(), "hmmscan db.hmm");
        let err = result.check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "hmmscan returned 1: 'Error: File format problem in db.hmm'"
        );
    }

    #[test]
    fn test_missing_binary() {
        let err = execute(&["terpenome-no-such-tool"], None).unwrap_err();
        assert!(matches!(err, TerpenomeError::ToolFailed { code: None, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_with_stdin() {
        let result = execute(&["cat"], Some(">a\nMKV\n")).unwrap();
        assert!(result.successful());
        assert_eq!(result.stdout, ">a\nMKV\n");
    }
}
