use std::fmt;

/// Outcome of checking generated text against the logic it was compiled from.
///
/// Produced by a [`RuleValidator`](crate::RuleValidator). `passed` is false
/// whenever there is at least one violation; warnings never fail a check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ValidationReport {
    violations: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new(violations: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            violations,
            warnings,
        }
    }

    pub fn passing() -> Self {
        Self::default()
    }

    pub fn violation(mut self, message: impl Into<String>) -> Self {
        self.violations.push(message.into());
        self
    }

    pub fn warning(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "passed")?;
        } else {
            write!(f, "failed: [{}]", self.violations.join("; "))?;
        }
        if !self.warnings.is_empty() {
            write!(f, ", warnings: [{}]", self.warnings.join("; "))?;
        }
        Ok(())
    }
}
