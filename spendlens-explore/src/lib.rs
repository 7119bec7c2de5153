//! spendlens-explore: category rules, row-to-category resolvers, the
//! group/rank/label engine, and the session state machine.

pub mod engine;
pub mod resolver;
pub mod rules;
pub mod session;

pub use engine::{
    CATEGORY_TOP_N, CategorySummary, ExcludedSpend, MERCHANT_TOP_N, MerchantSummary,
    SecondaryStat, SecondaryValue, excluded_spend, summarize_categories, top_merchants,
};
pub use resolver::{CategoryResolver, CommittedResolver, EnrichmentResolver};
pub use rules::SpendRules;
pub use session::{Session, SpendView};
