//! Onboarding wizard step model, step configs, and progress rules.
//!
//! The onboarding wizard is a fixed sequence of seven steps. Step N is
//! accessible only once steps 1..N-1 are all completed (strictly sequential
//! gating, no skipping). Step 7 (payment) completes implicitly when the
//! payment gateway confirms capture, and is retracted if the payment fails.
//!
//! Everything here is pure validation and set arithmetic; persistence of the
//! per-user progress row lives in the repository layer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: i32 = 7;

/// Minimum step number (1-based).
pub const MIN_STEP: i32 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: i32 = 7;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The seven steps of the onboarding wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    IncomeTypes,
    Documents,
    IncomeDetails,
    CapitalGains,
    OtherIncomes,
    Summary,
    Payment,
}

impl OnboardingStep {
    /// Convert a 1-based step number to an `OnboardingStep`.
    pub fn from_number(n: i32) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::IncomeTypes),
            2 => Ok(Self::Documents),
            3 => Ok(Self::IncomeDetails),
            4 => Ok(Self::CapitalGains),
            5 => Ok(Self::OtherIncomes),
            6 => Ok(Self::Summary),
            7 => Ok(Self::Payment),
            _ => Err(CoreError::validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> i32 {
        match self {
            Self::IncomeTypes => 1,
            Self::Documents => 2,
            Self::IncomeDetails => 3,
            Self::CapitalGains => 4,
            Self::OtherIncomes => 5,
            Self::Summary => 6,
            Self::Payment => 7,
        }
    }

    /// Canonical step name, as stored in `onboarding_steps.step_name`.
    pub fn name(self) -> &'static str {
        match self {
            Self::IncomeTypes => "income-types",
            Self::Documents => "documents",
            Self::IncomeDetails => "income-details",
            Self::CapitalGains => "capital-gains",
            Self::OtherIncomes => "other-incomes",
            Self::Summary => "summary",
            Self::Payment => "payment",
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::IncomeTypes => "Income Types",
            Self::Documents => "Documents",
            Self::IncomeDetails => "Income Details",
            Self::CapitalGains => "Capital Gains",
            Self::OtherIncomes => "Other Incomes",
            Self::Summary => "Summary",
            Self::Payment => "Payment",
        }
    }

    /// All steps in wizard order.
    pub fn all() -> [OnboardingStep; 7] {
        [
            Self::IncomeTypes,
            Self::Documents,
            Self::IncomeDetails,
            Self::CapitalGains,
            Self::OtherIncomes,
            Self::Summary,
            Self::Payment,
        ]
    }
}

/// Validate that `name` is the canonical name for `step`.
pub fn validate_step_name(step: OnboardingStep, name: &str) -> Result<(), CoreError> {
    if name == step.name() {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Step name '{name}' does not match step {}; expected '{}'",
            step.to_number(),
            step.name()
        )))
    }
}

// ---------------------------------------------------------------------------
// Payment status
// ---------------------------------------------------------------------------

/// Payment status tracked on the progress row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::validation(format!(
                "Invalid payment status '{s}'. Must be one of: pending, completed, failed"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Progress actions
// ---------------------------------------------------------------------------

/// Actions accepted by `PUT /onboarding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressAction {
    /// Move `current_step` to a target step; gated by [`can_access_step`].
    Navigate,
    /// Payment captured: mark payment completed and step 7 complete.
    CompletePayment,
    /// Payment failed: mark payment failed and retract step 7.
    FailPayment,
    /// Soft reset: restore the progress row to defaults. Step data and file
    /// records are untouched; only the hard reset (`DELETE /onboarding`
    /// without a step) removes those.
    Reset,
}

// ---------------------------------------------------------------------------
// Step configs
// ---------------------------------------------------------------------------

/// File upload policy for a step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadPolicy {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    pub max_files: usize,
    /// Maximum size of a single file, in bytes.
    pub max_file_size: i64,
    pub allowed_types: &'static [&'static str],
}

/// Validation policy for one step: field lists plus file upload limits.
/// Static, immutable, never persisted per-user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
    pub file_uploads: FileUploadPolicy,
}

const MB: i64 = 1024 * 1024;

const DOCUMENT_MIME_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

const NO_UPLOADS: FileUploadPolicy = FileUploadPolicy {
    required: &[],
    optional: &[],
    max_files: 0,
    max_file_size: 0,
    allowed_types: &[],
};

static STEP_CONFIGS: [StepConfig; 7] = [
    // 1: income-types
    StepConfig {
        required_fields: &["selectedIncomeTypes"],
        optional_fields: &["notes"],
        file_uploads: NO_UPLOADS,
    },
    // 2: documents
    StepConfig {
        required_fields: &[],
        optional_fields: &["remarks"],
        file_uploads: FileUploadPolicy {
            required: &["form16"],
            optional: &["bank-statement", "investment-proof", "rent-receipts"],
            max_files: 10,
            max_file_size: 10 * MB,
            allowed_types: DOCUMENT_MIME_TYPES,
        },
    },
    // 3: income-details
    StepConfig {
        required_fields: &["salaryIncome"],
        optional_fields: &["rentalIncome", "interestIncome"],
        file_uploads: NO_UPLOADS,
    },
    // 4: capital-gains
    StepConfig {
        required_fields: &["hasCapitalGains"],
        optional_fields: &["equitySales", "propertySales"],
        file_uploads: FileUploadPolicy {
            required: &[],
            optional: &["broker-statement"],
            max_files: 5,
            max_file_size: 10 * MB,
            allowed_types: DOCUMENT_MIME_TYPES,
        },
    },
    // 5: other-incomes
    StepConfig {
        required_fields: &["hasOtherIncomes"],
        optional_fields: &["otherIncomes"],
        file_uploads: NO_UPLOADS,
    },
    // 6: summary
    StepConfig {
        required_fields: &["confirmed"],
        optional_fields: &[],
        file_uploads: NO_UPLOADS,
    },
    // 7: payment
    StepConfig {
        required_fields: &["selectedPackageId", "amount"],
        optional_fields: &["couponCode"],
        file_uploads: NO_UPLOADS,
    },
];

/// Look up the static validation config for a step.
pub fn step_config(step: OnboardingStep) -> &'static StepConfig {
    &STEP_CONFIGS[(step.to_number() - 1) as usize]
}

// ---------------------------------------------------------------------------
// Payload validation
// ---------------------------------------------------------------------------

/// Validate a step's data payload against its [`StepConfig`].
///
/// Collects every failing field before returning, so the caller receives the
/// complete list of problems in a single `Validation` error rather than the
/// first one encountered.
pub fn validate_step_payload(step: OnboardingStep, data: &Value) -> Result<(), CoreError> {
    let obj = data
        .as_object()
        .ok_or_else(|| CoreError::validation("Step data must be a JSON object"))?;

    let config = step_config(step);
    let mut problems = Vec::new();

    for field in config.required_fields {
        match obj.get(*field) {
            None | Some(Value::Null) => {
                problems.push(format!("Missing required field '{field}'"));
            }
            Some(Value::Array(items)) if items.is_empty() => {
                problems.push(format!("Field '{field}' must not be empty"));
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                problems.push(format!("Field '{field}' must not be empty"));
            }
            _ => {}
        }
    }

    match step {
        OnboardingStep::IncomeTypes => {
            if let Some(v) = obj.get("selectedIncomeTypes") {
                if !v.is_null() && !v.is_array() {
                    problems.push(
                        "Field 'selectedIncomeTypes' must be a list of income types".to_string(),
                    );
                }
            }
        }
        OnboardingStep::Payment => {
            if let Some(v) = obj.get("amount") {
                if !v.as_f64().is_some_and(|a| a > 0.0) {
                    problems.push("Field 'amount' must be a positive number".to_string());
                }
            }
        }
        _ => {}
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(problems))
    }
}

/// Validate recorded file metadata against the step's upload policy.
///
/// `existing_files` is how many files are already recorded for this step.
pub fn validate_file_upload(
    step: OnboardingStep,
    file_type: &str,
    file_size: i64,
    mime_type: &str,
    existing_files: usize,
) -> Result<(), CoreError> {
    let policy = &step_config(step).file_uploads;
    let mut problems = Vec::new();

    if policy.max_files == 0 {
        return Err(CoreError::validation(format!(
            "Step {} ({}) does not accept file uploads",
            step.to_number(),
            step.name()
        )));
    }

    if existing_files >= policy.max_files {
        problems.push(format!(
            "Step allows at most {} files; {existing_files} already uploaded",
            policy.max_files
        ));
    }
    if !policy.required.contains(&file_type) && !policy.optional.contains(&file_type) {
        problems.push(format!("File type '{file_type}' is not accepted for this step"));
    }
    if file_size <= 0 {
        problems.push("File size must be positive".to_string());
    } else if file_size > policy.max_file_size {
        problems.push(format!(
            "File exceeds the maximum size of {} bytes",
            policy.max_file_size
        ));
    }
    if !policy.allowed_types.contains(&mime_type) {
        problems.push(format!("MIME type '{mime_type}' is not allowed for this step"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(problems))
    }
}

// ---------------------------------------------------------------------------
// Progress rules
// ---------------------------------------------------------------------------

/// True iff `step` is reachable given the completed set: step 1 is always
/// reachable, and step N requires every step in 1..N to be completed.
pub fn can_access_step(completed: &[i32], step: i32) -> bool {
    if !(MIN_STEP..=MAX_STEP).contains(&step) {
        return false;
    }
    (MIN_STEP..step).all(|s| completed.contains(&s))
}

/// Distinct in-range steps in the completed set.
fn distinct_completed(completed: &[i32]) -> BTreeSet<i32> {
    completed
        .iter()
        .copied()
        .filter(|s| (MIN_STEP..=MAX_STEP).contains(s))
        .collect()
}

/// Completion percentage: `100 * |completed| / 7`, rounded to two decimals.
pub fn completion_percentage(completed: &[i32]) -> f64 {
    let n = distinct_completed(completed).len();
    let pct = n as f64 / TOTAL_STEPS as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// True iff all seven steps are completed.
pub fn is_complete(completed: &[i32]) -> bool {
    distinct_completed(completed).len() == TOTAL_STEPS as usize
}

/// The first step not yet completed, or `None` once everything is done.
pub fn next_incomplete_step(completed: &[i32]) -> Option<OnboardingStep> {
    let done = distinct_completed(completed);
    (MIN_STEP..=MAX_STEP)
        .find(|s| !done.contains(s))
        .map(|s| OnboardingStep::from_number(s).expect("step in range"))
}

/// The completed set with `step` inserted. Idempotent; result is sorted and
/// deduplicated.
pub fn with_step_added(completed: &[i32], step: i32) -> Vec<i32> {
    let mut set = distinct_completed(completed);
    if (MIN_STEP..=MAX_STEP).contains(&step) {
        set.insert(step);
    }
    set.into_iter().collect()
}

/// The completed set with `step` removed.
pub fn with_step_removed(completed: &[i32], step: i32) -> Vec<i32> {
    let mut set = distinct_completed(completed);
    set.remove(&step);
    set.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
