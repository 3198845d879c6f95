//! mysqlsh Dump Adapter
//!
//! Implements DumpRunner by rendering the two-line connect/dump script,
//! invoking MySQL Shell as a subprocess and classifying its combined output.

use crate::domain::entities::Node;
use crate::domain::errors::DumpError;
use crate::domain::ports::DumpRunner;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Output markers that mean "cannot connect to the database server".
///
/// MySQL client error 2003 carries the OS errno in parentheses; 111 is
/// ECONNREFUSED. This list is a compatibility contract: operators depend on
/// the exact transient/fatal boundary, so extend it deliberately, never
/// rewrite it.
const CONNECTION_REFUSED_MARKERS: &[&str] = &["(111)"];

/// True when the captured output indicates the server refused the
/// connection, i.e. the failure is transient and another node may succeed.
pub fn is_connection_refused(output: &str) -> bool {
    CONNECTION_REFUSED_MARKERS
        .iter()
        .any(|marker| output.contains(marker))
}

/// Runs `<tool> --file <script>` against one node per attempt.
pub struct MysqlshRunner {
    program: String,
    user: String,
    password: String,
    dump_dir: PathBuf,
    script_path: PathBuf,
}

impl MysqlshRunner {
    pub fn new(
        program: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        dump_dir: impl Into<PathBuf>,
        script_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            user: user.into(),
            password: password.into(),
            dump_dir: dump_dir.into(),
            script_path: script_path.into(),
        }
    }

    /// Connection script handed to the shell. Contains the password; it is
    /// written to the scratch path and never logged.
    fn render_script(&self, node: &Node) -> String {
        format!(
            "shell.connect(\"{}@{}\", \"{}\")\nutil.dump_instance('{}')\n",
            self.user,
            node,
            self.password,
            self.dump_dir.display()
        )
    }
}

#[async_trait]
impl DumpRunner for MysqlshRunner {
    async fn dump(&self, node: &Node) -> Result<(), DumpError> {
        // Scratch script is overwritten on every attempt; no concurrent
        // writers exist.
        tokio::fs::write(&self.script_path, self.render_script(node)).await?;

        tracing::info!("running {} against {}", self.program, node);
        let output = Command::new(&self.program)
            .arg("--file")
            .arg(&self.script_path)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        // Fresh buffer per attempt. Ordering between the two streams is not
        // guaranteed and nothing relies on it.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let text = combined.trim().to_string();

        if is_connection_refused(&text) {
            Err(DumpError::ConnectionRefused {
                node: node.to_string(),
                output: text,
            })
        } else {
            Err(DumpError::Failed { output: text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn node() -> Node {
        Node {
            address: "db-1".to_string(),
            port: 3306,
        }
    }

    /// Writes an executable stand-in for mysqlsh and returns its path.
    fn fake_tool(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-mysqlsh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn runner(program: impl Into<String>, dir: &TempDir) -> MysqlshRunner {
        MysqlshRunner::new(
            program,
            "backup",
            "hunter2",
            dir.path().join("dump"),
            dir.path().join("backup.py"),
        )
    }

    #[test]
    fn test_classification_marker_is_transient() {
        assert!(is_connection_refused(
            "ERROR 2003 (HY000): Can't connect to MySQL server on 'db-1:3306' (111)"
        ));
    }

    #[test]
    fn test_other_errors_are_not_transient() {
        assert!(!is_connection_refused(
            "ERROR 1045 (28000): Access denied for user 'backup'@'%'"
        ));
        assert!(!is_connection_refused("util.dump_instance: target dir exists"));
        assert!(!is_connection_refused(""));
    }

    #[test]
    fn test_render_script_shape() {
        let dir = TempDir::new().unwrap();
        let runner = runner("mysqlsh", &dir);
        let script = runner.render_script(&node());
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "shell.connect(\"backup@db-1:3306\", \"hunter2\")"
        );
        assert!(lines[1].starts_with("util.dump_instance('"));
        assert!(lines[1].contains("dump"));
    }

    #[tokio::test]
    async fn test_successful_tool_run() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(&dir, "exit 0");
        let runner = runner(tool.to_string_lossy(), &dir);

        runner.dump(&node()).await.unwrap();
        // The script was written for the attempt.
        assert!(dir.path().join("backup.py").is_file());
    }

    #[tokio::test]
    async fn test_connection_refused_classified_transient() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(
            &dir,
            "echo \"ERROR 2003 (HY000): Can't connect to MySQL server on 'db-1:3306' (111)\"\nexit 1",
        );
        let runner = runner(tool.to_string_lossy(), &dir);

        match runner.dump(&node()).await.unwrap_err() {
            DumpError::ConnectionRefused { node, output } => {
                assert_eq!(node, "db-1:3306");
                assert!(output.contains("(111)"));
            }
            other => panic!("expected ConnectionRefused, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_failure_classified_fatal_with_raw_output() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(
            &dir,
            "echo \"ERROR 1045 (28000): Access denied\" >&2\nexit 1",
        );
        let runner = runner(tool.to_string_lossy(), &dir);

        match runner.dump(&node()).await.unwrap_err() {
            DumpError::Failed { output } => {
                assert_eq!(output, "ERROR 1045 (28000): Access denied");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_both_captured() {
        let dir = TempDir::new().unwrap();
        let tool = fake_tool(&dir, "echo out-line\necho err-line >&2\nexit 1");
        let runner = runner(tool.to_string_lossy(), &dir);

        match runner.dump(&node()).await.unwrap_err() {
            DumpError::Failed { output } => {
                assert!(output.contains("out-line"));
                assert!(output.contains("err-line"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_tool_is_io_error() {
        let dir = TempDir::new().unwrap();
        let runner = runner("/nonexistent/mysqlsh", &dir);
        assert!(matches!(
            runner.dump(&node()).await.unwrap_err(),
            DumpError::Io(_)
        ));
    }
}
