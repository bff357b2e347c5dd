use std::fmt;

use crate::error::Failure;

/// Assertion sink supplied by the surrounding test framework
pub trait Reporter {
    fn pass(&mut self);

    fn fail(&mut self, failure: Failure);

    fn equal<T: PartialEq + fmt::Debug + ?Sized>(&mut self, actual: &T, expected: &T) {
        if actual == expected {
            self.pass();
        } else {
            self.fail(Failure::NotEqual {
                actual: format!("{actual:?}"),
                expected: format!("{expected:?}"),
            });
        }
    }
}

/// Collects assertion outcomes for later inspection
#[derive(Debug, Default, Clone)]
pub struct Report {
    passed: usize,
    failures: Vec<Failure>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Panics with every recorded failure, one per line
    pub fn assert_ok(&self) {
        if !self.is_ok() {
            let lines: Vec<String> = self.failures.iter().map(ToString::to_string).collect();
            panic!("{} assertion(s) failed:\n{}", lines.len(), lines.join("\n"));
        }
    }
}

impl Reporter for Report {
    fn pass(&mut self) {
        self.passed += 1;
    }

    fn fail(&mut self, failure: Failure) {
        log::debug!("assertion failed: {failure}");
        self.failures.push(failure);
    }
}
