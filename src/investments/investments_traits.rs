use super::investments_model::*;
use super::investments_errors::Result;

/// Trait defining the contract for investment repository operations.
pub trait InvestmentRepositoryTrait: Send + Sync {
    fn get_by_id(&self, investment_id: &str) -> Result<Investment>;
    fn list(&self) -> Result<Vec<Investment>>;
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Investment>>;
    fn list_by_source(&self, portfolio_id: &str, source: &str) -> Result<Vec<Investment>>;
    fn find_position(
        &self,
        portfolio_id: &str,
        ticker: Option<&str>,
        asset_name: &str,
    ) -> Result<Option<Investment>>;
    fn insert(&self, investment_db: &InvestmentDB) -> Result<Investment>;
    fn update(&self, investment_db: &InvestmentDB) -> Result<Investment>;
    fn delete(&self, investment_id: &str) -> Result<usize>;
    fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;
    fn delete_by_source(&self, portfolio_id: &str, source: &str) -> Result<usize>;
}

/// Trait defining the contract for investment service operations.
pub trait InvestmentServiceTrait: Send + Sync {
    fn get_investment(&self, investment_id: &str) -> Result<Investment>;
    fn get_investments(&self, portfolio_id: &str) -> Result<Vec<Investment>>;
    fn apply(&self, application: NewApplication) -> Result<Investment>;
    fn redeem(&self, redemption: NewRedemption) -> Result<RedemptionOutcome>;
    fn transfer(&self, transfer: NewTransfer) -> Result<Investment>;
    fn update_prices(&self, quotes: &[(String, f64)]) -> Result<usize>;
    fn delete_investment(&self, investment_id: &str) -> Result<()>;
    fn delete_all(&self, portfolio_id: &str) -> Result<usize>;
}
