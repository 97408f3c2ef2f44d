use std::fmt::Debug;
use std::io::ErrorKind;
use std::process::Command;

use crate::slurm::error::CollectError;

/// Source of raw `sinfo --json` payloads.
pub(crate) trait InventoryFetcher: Debug + Send + Sync {
    fn fetch(&self, args: &[&str]) -> Result<Vec<u8>, CollectError>;
}

/// Runs the node inventory command and hands back its standard output.
/// There is no timeout: a hung command blocks the caller.
#[derive(Debug, Clone)]
pub(crate) struct SinfoCommand {
    command: String,
}

impl SinfoCommand {
    pub(crate) fn new(command: String) -> Self {
        SinfoCommand { command }
    }
}

impl InventoryFetcher for SinfoCommand {
    fn fetch(&self, args: &[&str]) -> Result<Vec<u8>, CollectError> {
        let command_line = if args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, args.join(" "))
        };
        debug!("Execute {}", command_line);

        let output = match Command::new(&self.command).args(args).output() {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(CollectError::CommandNotFound(self.command.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut message = format!("{}: {}", command_line, output.status);

            if !stderr.trim().is_empty() {
                message = format!("{} {}", message, stderr.trim());
            }

            return Err(CollectError::CommandExited(message));
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_captures_stdout() {
        let fetcher = SinfoCommand::new("echo".to_string());
        let output = fetcher.fetch(&["--json"]).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "--json\n");
    }

    #[test]
    fn test_fetch_missing_command() {
        let fetcher = SinfoCommand::new("slurm-exporter-no-such-binary".to_string());
        let result = fetcher.fetch(&["--json"]);

        assert!(matches!(result, Err(CollectError::CommandNotFound(_))));
    }

    #[test]
    fn test_fetch_failing_command() {
        let fetcher = SinfoCommand::new("false".to_string());
        let result = fetcher.fetch(&[]);

        assert!(matches!(result, Err(CollectError::CommandExited(_))));
    }

    #[test]
    fn test_fetch_failure_message() {
        let fetcher = SinfoCommand::new("sh".to_string());

        match fetcher.fetch(&["-c", "exit 3"]) {
            Err(CollectError::CommandExited(message)) => {
                assert_eq!(message, "sh -c exit 3: exit status: 3");
            }
            other => panic!("unexpected result {:?}", other),
        }

        match fetcher.fetch(&["-c", "echo 'Unable to contact slurm controller' >&2; exit 1"]) {
            Err(CollectError::CommandExited(message)) => {
                assert!(message.ends_with("exit status: 1 Unable to contact slurm controller"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_fetch_failure_without_args() {
        let fetcher = SinfoCommand::new("false".to_string());

        match fetcher.fetch(&[]) {
            Err(CollectError::CommandExited(message)) => assert_eq!(message, "false: exit status: 1"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
