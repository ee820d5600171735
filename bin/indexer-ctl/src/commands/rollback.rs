//! The `rollback` subcommand: manual recovery from a bad commit window,
//! independent of the daemon's own re-org rollback.

use clap::Args;
use indexer_persistence::{PersistenceConfig, PersistenceLayer, PostgresPersistence};
use indexer_types::Checkpoint;

use crate::error::PreconditionError;

/// Roll the store back to just before `target`.
#[derive(Debug, Args)]
pub struct RollbackArgs {
    /// The first block to delete; the checkpoint is left at `target - 1`.
    target: u64,
}

impl RollbackArgs {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = PersistenceConfig::from_env()?;
        let store = PostgresPersistence::connect(&config).await?;

        let checkpoint = store.current_checkpoint().await?;
        check_preconditions(self.target, checkpoint.as_ref())?;
        let current_head = checkpoint.expect("checked above").block_number;

        tracing::info!(target = self.target, current_head, "rolling back");
        store.rollback_to(self.target, None).await?;
        tracing::info!(new_head = self.target.saturating_sub(1), "rollback complete");
        Ok(())
    }
}

/// Checks the `rollback` preconditions against the current checkpoint,
/// without touching the store: a checkpoint must exist, and `target` must
/// not be ahead of it.
fn check_preconditions(
    target: u64,
    checkpoint: Option<&Checkpoint>,
) -> Result<(), PreconditionError> {
    let checkpoint = checkpoint.ok_or(PreconditionError::NoCheckpoint)?;
    if target > checkpoint.block_number {
        return Err(PreconditionError::TargetAheadOfHead {
            target,
            current_head: checkpoint.block_number,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use rstest::rstest;

    use super::*;

    fn checkpoint_at(block_number: u64) -> Checkpoint {
        Checkpoint::new(block_number, B256::ZERO)
    }

    #[test]
    fn rejects_when_no_checkpoint_exists() {
        let error = check_preconditions(10, None).unwrap_err();
        assert!(matches!(error, PreconditionError::NoCheckpoint));
    }

    #[rstest]
    #[case::well_behind_head(50, 100)]
    #[case::one_behind_head(99, 100)]
    #[case::equal_to_head(100, 100)]
    fn accepts_target_at_or_behind_head(#[case] target: u64, #[case] head: u64) {
        assert!(check_preconditions(target, Some(&checkpoint_at(head))).is_ok());
    }

    #[rstest]
    #[case::one_ahead_of_head(101, 100)]
    #[case::far_ahead_of_head(1_000, 100)]
    fn rejects_target_ahead_of_head(#[case] target: u64, #[case] head: u64) {
        let error = check_preconditions(target, Some(&checkpoint_at(head))).unwrap_err();
        assert!(matches!(
            error,
            PreconditionError::TargetAheadOfHead { target: t, current_head: h }
                if t == target && h == head
        ));
    }
}
