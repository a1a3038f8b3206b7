//! Seams for the checks a host runs on model output.
//!
//! Neither check is implemented here. Hosts plug in their own, and closures
//! with the right shape work directly.

use tracing::debug;

use crate::{CombinedLogic, ValidationReport};

/// Checks generated text against the logic its prompt was compiled from.
pub trait RuleValidator {
    fn validate(&self, output: &str, findings: &str, logic: &CombinedLogic) -> ValidationReport;
}

/// Rewrites generated text, e.g. to strip excluded findings that slipped
/// through.
pub trait PostProcessor {
    fn post_process(&self, output: &str, logic: &CombinedLogic) -> String;
}

impl<F> RuleValidator for F
where
    F: Fn(&str, &str, &CombinedLogic) -> ValidationReport,
{
    fn validate(&self, output: &str, findings: &str, logic: &CombinedLogic) -> ValidationReport {
        self(output, findings, logic)
    }
}

impl<F> PostProcessor for F
where
    F: Fn(&str, &CombinedLogic) -> String,
{
    fn post_process(&self, output: &str, logic: &CombinedLogic) -> String {
        self(output, logic)
    }
}

/// Post-process `output`, then validate the processed text.
pub fn review<P, V>(
    output: &str,
    findings: &str,
    logic: &CombinedLogic,
    post: &P,
    validator: &V,
) -> (String, ValidationReport)
where
    P: PostProcessor + ?Sized,
    V: RuleValidator + ?Sized,
{
    let processed = post.post_process(output, logic);
    let report = validator.validate(&processed, findings, logic);
    debug!(
        changed = processed != output,
        violations = report.violations().len(),
        warnings = report.warnings().len(),
        "reviewed output"
    );
    (processed, report)
}
