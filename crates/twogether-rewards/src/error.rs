use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("not enough coins: balance {balance}, cost {cost}")]
    InsufficientCoins { balance: i64, cost: i64 },

    #[error("coin amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("milestone '{0}' already exists")]
    DuplicateMilestone(String),

    #[error("milestone type '{0}' is derived from records and cannot be added by hand")]
    ReservedMilestone(&'static str),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
