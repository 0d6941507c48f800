use anyhow::Context;
use fs2::FileExt;
use std::fs::File;

/// Takes the per-user lock held by commands that change NetworkManager state.
///
/// The lock is released when the returned file is dropped.
pub fn acquire_app_lock() -> anyhow::Result<File> {
    let mut lock_path = dirs::data_local_dir().unwrap_or(std::env::temp_dir());
    lock_path.push("netlab.lock");

    let file = File::create(&lock_path)
        .with_context(|| format!("failed to create lock file {}", lock_path.display()))?;

    // Exclusive lock; fails if another netlab command holds it
    file.try_lock_exclusive()
        .context("another netlab command is already changing network state")?;

    Ok(file)
}
