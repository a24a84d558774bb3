//! Library aggregation
//!
//! Fetches a player's owned titles, scans per-title achievement data
//! through a bounded worker pool, and reduces everything into a
//! `LibrarySummary` plus a per-title `AchievementBreakdown` list.
//!
//! Identity and ownership failures abort the whole aggregation; absent
//! achievement data skips the title. Running totals are computed only
//! after the pool joins, from completed slots, so a cancelled or failed
//! lookup never corrupts them.

use crate::config::AggregatorConfig;
use crate::error::RemoteServiceError;
use crate::gateway::StatsProvider;
use crate::types::{round1, round2, AchievementBreakdown, LibrarySummary, TitleRecord};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Aggregation engine over any `StatsProvider`.
pub struct Aggregator {
    provider: Arc<dyn StatsProvider>,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Build an aggregator with the default worker pool settings.
    pub fn new(provider: Arc<dyn StatsProvider>) -> Self {
        Self::with_config(provider, AggregatorConfig::default())
    }

    /// Build an aggregator with explicit pool width and pacing.
    pub fn with_config(provider: Arc<dyn StatsProvider>, config: AggregatorConfig) -> Self {
        Self { provider, config }
    }

    /// Compute the full library summary and achievement breakdown for one
    /// player. Fails with `RemoteServiceError` when the identity or
    /// ownership lookups fail; achievement lookups degrade per title.
    pub async fn aggregate(
        &self,
        player_id: &str,
    ) -> Result<(LibrarySummary, Vec<AchievementBreakdown>), RemoteServiceError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, player_id, "starting aggregation");

        let titles = self.provider.owned_titles(player_id).await?;
        info!(%request_id, titles = titles.len(), "owned titles fetched");

        let total_minutes: u64 = titles.iter().map(|t| t.playtime_minutes).sum();
        let total_hours = round1(total_minutes as f64 / 60.0);
        let titles_played = titles.iter().filter(|t| t.playtime_minutes > 0).count() as u32;

        let breakdown = self.scan_achievements(player_id, &titles).await;

        let unlocked_total: u64 = breakdown.iter().map(|b| u64::from(b.unlocked)).sum();
        let achievements_total: u64 = breakdown
            .iter()
            .map(|b| u64::from(b.total_achievements))
            .sum();
        let overall_completion_percent = if achievements_total > 0 {
            Some(round2(
                unlocked_total as f64 / achievements_total as f64 * 100.0,
            ))
        } else {
            None
        };

        let player_name = self.provider.player_name(player_id).await?;
        let player_level = self.provider.player_level(player_id).await?;

        info!(
            %request_id,
            contributing = breakdown.len(),
            "aggregation complete"
        );

        Ok((
            LibrarySummary {
                player_name,
                player_level,
                total_hours,
                titles_played,
                overall_completion_percent,
            },
            breakdown,
        ))
    }

    /// Scan every owned title for achievement data through a worker pool
    /// of fixed width. Worker `w` takes titles `w, w+W, ...` and sleeps
    /// `per_call_delay` between titles, so the steady-state request rate
    /// is bounded by the pool width. Output is sorted by app id.
    async fn scan_achievements(
        &self,
        player_id: &str,
        titles: &[TitleRecord],
    ) -> Vec<AchievementBreakdown> {
        if titles.is_empty() {
            return Vec::new();
        }

        let width = self.config.workers.max(1).min(titles.len());
        let mut handles = Vec::with_capacity(width);

        for worker in 0..width {
            let provider = Arc::clone(&self.provider);
            let player_id = player_id.to_string();
            let delay = self.config.per_call_delay;
            let assigned: Vec<TitleRecord> = titles
                .iter()
                .skip(worker)
                .step_by(width)
                .cloned()
                .collect();

            handles.push(tokio::spawn(async move {
                let mut completed = Vec::new();
                for title in assigned {
                    if let Some(entry) = scan_title(provider.as_ref(), &player_id, &title).await {
                        completed.push(entry);
                    }
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                completed
            }));
        }

        let mut breakdown = Vec::new();
        for handle in handles {
            // A panicked worker forfeits its slots; the rest still count
            if let Ok(completed) = handle.await {
                breakdown.extend(completed);
            }
        }

        breakdown.sort_by_key(|entry| entry.app_id);
        breakdown
    }
}

/// Fetch schema and unlock state for one title and fold them into a
/// breakdown entry. Absence of either, a provider failure, or counts
/// violating `unlocked <= total` all skip the title.
async fn scan_title(
    provider: &dyn StatsProvider,
    player_id: &str,
    title: &TitleRecord,
) -> Option<AchievementBreakdown> {
    debug!(app_id = title.app_id, name = %title.name, "scanning achievements");

    let schema = provider.achievement_schema(title.app_id).await.ok().flatten()?;
    let unlocks = provider
        .player_unlocks(title.app_id, player_id)
        .await
        .ok()
        .flatten()?;

    let total = schema.definitions.len() as u32;
    let unlocked = unlocks.values().filter(|&&achieved| achieved).count() as u32;

    AchievementBreakdown::from_counts(title.app_id, title.name.clone(), total, unlocked)
}
