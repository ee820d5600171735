mod backfill;
mod rollback;

pub use backfill::BackfillArgs;
pub use rollback::RollbackArgs;
