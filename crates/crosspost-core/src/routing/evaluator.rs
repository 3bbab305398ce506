//! Pure health classification and scoring.
//!
//! No I/O and no clocks in here: callers pass `now` in, which keeps every
//! rule deterministic and directly testable.

use super::types::{EndpointHealth, EndpointStatus, RouterConfig};

/// Classify a health record as selectable or not.
///
/// Rules, in order:
/// - no record → healthy (optimistic default for endpoints never seen)
/// - demoted record → healthy only once its recovery window has elapsed
/// - recent unresolved failure (below the threshold) → short cooldown
/// - otherwise healthy
///
/// The cooldown only applies while `failure_count > 0`: a success report
/// resets the streak and thereby lifts the cooldown immediately.
pub fn is_healthy(record: Option<&EndpointHealth>, now: i64, config: &RouterConfig) -> bool {
    let Some(record) = record else {
        return true;
    };

    if record.status == EndpointStatus::Unhealthy {
        return match record.unhealthy_since {
            Some(since) => now - since > config.recovery_secs,
            // Demoted without a timestamp (hand-edited state): stay demoted
            // until a success report or probe resets the record.
            None => false,
        };
    }

    if record.failure_count > 0 {
        if let Some(last_failure) = record.last_failure {
            if now - last_failure < config.failure_cooldown_secs {
                return false;
            }
        }
    }

    true
}

/// Rank an endpoint already judged healthy.
///
/// Base 100, minus 10 per recorded failure, plus 2 per recorded success
/// (capped at +20), minus 20 when the last success has gone stale. Clamped
/// to zero so no combination of penalties produces a negative score.
pub fn score(record: &EndpointHealth, now: i64, config: &RouterConfig) -> i64 {
    let mut score = 100i64;

    score -= i64::from(record.failure_count) * 10;
    score += (i64::from(record.success_count) * 2).min(20);

    if let Some(last_success) = record.last_success {
        if now - last_success > config.stale_success_secs {
            score -= 20;
        }
    }

    score.max(0)
}
