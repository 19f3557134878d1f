/// Seconds in the non-leap year the annualized stability fee is quoted over.
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;
