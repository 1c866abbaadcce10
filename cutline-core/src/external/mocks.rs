// cutline-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::{EncoderProcess, EncoderSpawner, MediaProber};
use crate::error::{CoreError, CoreResult};
use crate::media::MediaInfo;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Mock implementation of EncoderProcess.
#[derive(Clone, Debug)]
pub struct MockEncoderProcess {
    /// Lines to emit when handle_lines is called.
    pub lines: Vec<String>,
    /// Exit code to return when wait is called.
    pub exit_code: Option<i32>,
}

impl EncoderProcess for MockEncoderProcess {
    fn handle_lines<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(&str) -> CoreResult<()>,
    {
        for line in &self.lines {
            handler(line)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<Option<i32>> {
        Ok(self.exit_code)
    }
}

/// Represents an expected encoder call and its mock result.
pub struct MockEncoderExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockEncoderProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of EncoderSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern is contained in
/// any argument. Received argument vectors are recorded in call order.
#[derive(Clone, Default)]
pub struct MockEncoderSpawner {
    expectations: Rc<RefCell<Vec<MockEncoderExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| (*s).to_string()).collect()
}

impl MockEncoderSpawner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockEncoderProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockEncoderExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, output: &[&str], create_dummy_output: bool) {
        let process = MockEncoderProcess {
            lines: lines(output),
            exit_code: Some(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_exit_error_expectation(&self, arg_pattern: &str, output: &[&str], exit_code: i32) {
        let process = MockEncoderProcess {
            lines: lines(output),
            exit_code: Some(exit_code),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    #[must_use]
    pub fn received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl EncoderSpawner for MockEncoderSpawner {
    type Process = MockEncoderProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        self.received_calls.borrow_mut().push(args.to_vec());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockEncoderSpawner: No expectation found for command args: {args:?}");
            panic!("MockEncoderSpawner: No expectation found for command args: {args:?}");
        };

        let expectation = expectations.remove(index);
        log::debug!(
            "MockEncoderSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        if expectation.result.is_ok() && expectation.create_dummy_output {
            match args.last() {
                Some(output) => {
                    if let Err(e) = std::fs::write(output, b"mock output") {
                        log::error!("MockEncoderSpawner failed to create dummy output {output}: {e}");
                    }
                }
                None => log::warn!("MockEncoderSpawner couldn't find output path in args."),
            }
        }
        expectation.result
    }
}

/// Mock implementation of MediaProber keyed by input path.
#[derive(Clone, Default)]
pub struct MockMediaProber {
    results: Rc<RefCell<HashMap<PathBuf, MediaInfo>>>,
    probed: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockMediaProber {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the MediaInfo returned for `input`.
    pub fn expect_media_info(&self, input: &Path, info: MediaInfo) {
        self.results.borrow_mut().insert(input.to_path_buf(), info);
    }

    #[must_use]
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }
}

impl MediaProber for MockMediaProber {
    fn probe(&self, input: &Path) -> CoreResult<MediaInfo> {
        self.probed.borrow_mut().push(input.to_path_buf());
        self.results.borrow().get(input).cloned().ok_or_else(|| {
            CoreError::ProbeFailure(format!(
                "MockMediaProber: no expectation set for {}",
                input.display()
            ))
        })
    }
}
