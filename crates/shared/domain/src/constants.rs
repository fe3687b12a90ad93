// Calculator
pub const TOTAL_STEPS: usize = 6;
pub const STORAGE_KEY: &str = "abect-calculator-state";
pub const CALCULATOR_SOURCE: &str = "/calculator";

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const CALCULATOR_TAG: &str = "Calculator";
pub const LEADS_TAG: &str = "Leads";
