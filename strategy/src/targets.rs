use chrono::Utc;
use dashmap::DashMap;
use sim_core::SnipeTarget;

/// Launch-sniping watchlist. Targets are tracked, their momentum drifted by
/// a background tick, and removed exactly once when claimed.
#[derive(Default)]
pub struct TargetTracker {
    targets: DashMap<String, SnipeTarget>,
}

impl TargetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let tracker = Self::new();
        for (mint, symbol, momentum, volatility) in [
            ("8g4x1Luj3XDmFi8VYYhVJkyaHmQwz5p2fDmLhQWpump", "PONKE", 72.0, 55.0),
            ("C3dTZQx6nS9QZvM1yV7kKfWpRb4hTmA2uJgE5rXWpump", "MYRO", 64.0, 48.0),
            ("F7aHqL2cW9jVtKxN8pRuY4bZsQmE6dTgP3kMvAJWpump", "POPCAT", 81.0, 62.0),
            ("H2mWnP5vX8qJcL4tB7yKfRdZaU9gS3eQxNkDpTVWpump", "SLERF", 47.0, 70.0),
        ] {
            tracker.track(SnipeTarget {
                mint: mint.to_string(),
                symbol: symbol.to_string(),
                momentum,
                volatility,
                added_at: Utc::now(),
            });
        }
        tracker
    }

    pub fn track(&self, target: SnipeTarget) {
        tracing::debug!("🎯 Tracking launch target {} ({})", target.symbol, target.mint);
        self.targets.insert(target.mint.clone(), target);
    }

    /// Remove and return a target once it has been sniped. The only
    /// deletion path in the system.
    pub fn claim(&self, mint: &str) -> Option<SnipeTarget> {
        let claimed = self.targets.remove(mint).map(|(_, t)| t);
        if let Some(ref target) = claimed {
            tracing::info!("🔫 Target claimed: {} ({})", target.symbol, target.mint);
        }
        claimed
    }

    pub fn get(&self, mint: &str) -> Option<SnipeTarget> {
        self.targets.get(mint).map(|t| t.value().clone())
    }

    pub fn active(&self) -> Vec<SnipeTarget> {
        self.targets.iter().map(|t| t.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Highest-momentum targets first.
    pub fn top_momentum(&self, n: usize) -> Vec<SnipeTarget> {
        let mut all = self.active();
        all.sort_by(|a, b| {
            b.momentum
                .partial_cmp(&a.momentum)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all.truncate(n);
        all
    }

    /// In-place mutation hook for the momentum drift tick.
    pub fn apply_drift<F: FnMut(&mut SnipeTarget)>(&self, mut mutate: F) {
        for mut entry in self.targets.iter_mut() {
            mutate(entry.value_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(mint: &str, momentum: f64) -> SnipeTarget {
        SnipeTarget {
            mint: mint.to_string(),
            symbol: mint.to_uppercase(),
            momentum,
            volatility: 50.0,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn claim_removes_exactly_once() {
        let tracker = TargetTracker::new();
        tracker.track(target("bonk", 60.0));

        assert_eq!(tracker.claim("bonk").unwrap().mint, "bonk");
        assert!(tracker.claim("bonk").is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn top_momentum_ranks_descending() {
        let tracker = TargetTracker::new();
        tracker.track(target("a", 40.0));
        tracker.track(target("b", 90.0));
        tracker.track(target("c", 65.0));

        let top: Vec<f64> = tracker.top_momentum(2).iter().map(|t| t.momentum).collect();
        assert_eq!(top, vec![90.0, 65.0]);
    }

    #[test]
    fn drift_hook_mutates_all_targets() {
        let tracker = TargetTracker::new();
        tracker.track(target("a", 40.0));
        tracker.track(target("b", 90.0));

        tracker.apply_drift(|t| t.momentum += 1.0);
        let mut momenta: Vec<f64> = tracker.active().iter().map(|t| t.momentum).collect();
        momenta.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(momenta, vec![41.0, 91.0]);
    }

    #[test]
    fn seeded_watchlist_is_nonempty() {
        let tracker = TargetTracker::seeded();
        assert!(tracker.len() >= 3);
    }
}
