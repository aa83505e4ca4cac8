use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Schema scripts in order; entry `n` upgrades `user_version` `n` to `n + 1`.
const MIGRATIONS: &[&str] = &[include_str!("schemas/schema_v1.sql")];

fn target_version() -> i32 {
    MIGRATIONS.len() as i32
}

/// Apply every pending script in one transaction and record the new
/// `user_version`. Refuses databases written by a newer build.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let current: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version")?;
    let target = target_version();

    if current > target {
        bail!("briefing database is at schema {current}, this build only knows {target}");
    }
    if current == target {
        return Ok(());
    }

    let tx = conn.transaction().context("failed to begin migration")?;
    for (index, script) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        tx.execute_batch(script)
            .with_context(|| format!("schema v{} failed to apply", index + 1))?;
    }
    tx.pragma_update(None, "user_version", target)
        .context("failed to record user_version")?;
    tx.commit().context("failed to commit migration")
}
