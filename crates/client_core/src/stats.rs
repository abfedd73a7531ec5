//! Usage counters for the statistics screen.

use chrono::{DateTime, SecondsFormat, Utc};
use shared::error::StoreResult;
use table_store::{Filter, TableStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub last_week: u64,
    pub last_month: u64,
}

/// Three counts over one table: everything, the trailing 7 days, and the
/// trailing 30 days. `now` is injected so the windows are reproducible.
pub async fn load_stats(
    store: &dyn TableStore,
    table: &str,
    now: DateTime<Utc>,
) -> StoreResult<StatsSnapshot> {
    let week_ago = now - chrono::Duration::days(7);
    let month_ago = now - chrono::Duration::days(30);

    let total = store.count(table, &[]).await?;
    let last_week = store
        .count(table, &[Filter::gte("created_at", stamp(week_ago))])
        .await?;
    let last_month = store
        .count(table, &[Filter::gte("created_at", stamp(month_ago))])
        .await?;

    Ok(StatsSnapshot {
        total,
        last_week,
        last_month,
    })
}

fn stamp(moment: DateTime<Utc>) -> String {
    moment.to_rfc3339_opts(SecondsFormat::Micros, true)
}
