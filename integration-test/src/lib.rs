//! Process driver for end-to-end parser tests.
//!
//! A [`TestSession`] runs a binary with piped stdout/stderr. Each pipe is
//! read to EOF on its own thread so a chatty child never blocks on a full
//! pipe buffer while the test waits for it.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Bytes read from one pipe by a background thread.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    reader: JoinHandle<()>,
}

impl Capture {
    fn start<R: Read + Send + 'static>(mut pipe: R, label: &'static str) -> Capture {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let reader = thread::spawn(move || {
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) => return,
                    Ok(n) => sink.lock().unwrap().extend_from_slice(&chunk[..n]),
                    Err(e) => {
                        eprintln!("reading child {label}: {e}");
                        return;
                    }
                }
            }
        });
        Capture { buf, reader }
    }

    /// Join the reader and return what it collected as text.
    fn finish(self) -> String {
        let _ = self.reader.join();
        let bytes = self.buf.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// A spawned binary whose output is being collected.
pub struct TestSession {
    child: Child,
    stdout: Capture,
    stderr: Capture,
}

impl TestSession {
    /// Run `binary` with `args`, adding `env` to the inherited environment.
    pub fn spawn(
        binary: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> std::io::Result<TestSession> {
        let mut child = Command::new(binary)
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = Capture::start(child.stdout.take().expect("stdout is piped"), "stdout");
        let stderr = Capture::start(child.stderr.take().expect("stderr is piped"), "stderr");
        Ok(TestSession {
            child,
            stdout,
            stderr,
        })
    }

    /// Block until the child exits, then assert its exit code.
    ///
    /// A child killed by a signal reports -1.
    pub fn wait_exit(mut self, expected_code: i32) -> SessionOutput {
        let code = match self.child.wait() {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => panic!("waiting for child: {e}"),
        };
        let out = SessionOutput {
            stdout: self.stdout.finish(),
            stderr: self.stderr.finish(),
        };
        assert_eq!(
            code, expected_code,
            "exit code mismatch\n--- stdout ---\n{}\n--- stderr ---\n{}",
            out.stdout, out.stderr
        );
        out
    }
}

/// Everything a finished session wrote.
pub struct SessionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl SessionOutput {
    /// Stdout split into lines, for `key=value` style assertions.
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}
