//! Built-in governance predicates.

mod cost;
mod keyword;
mod pii;
mod role;

pub use cost::CostLimitRule;
pub use keyword::KeywordBlockRule;
pub use pii::{PiiCategory, PiiCheckRule};
pub use role::RoleCheckRule;
