use rust_decimal::Decimal;

/// Default caller-imposed timeout for a single collaborator call.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Allowed deviation of the allocation ratio sum from 100 (0.5 percentage points).
pub const RATIO_SUM_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Number of digits in an account PIN.
pub const PIN_LENGTH: usize = 6;
