//! Volume series builder

use tracing::debug;

use super::{CumulativeVolumeSeries, IntervalVolumeSeries, VolumeReading};
use crate::domain::market::PairVolumeSource;
use crate::domain::timeline::BlockTimeline;
use crate::shared::errors::{SeriesError, SourceError};
use crate::shared::types::BlockHeight;
use crate::shared::utils::Throttle;

/// Fetch the cumulative USD volume of `pair` at every block, in order.
///
/// All-or-nothing: if the pair is unknown at any height the whole fetch
/// fails, no partial series is returned.
pub async fn fetch_cumulative<S>(
    source: &S,
    pair: &str,
    blocks: &[BlockHeight],
    throttle: &Throttle,
) -> Result<CumulativeVolumeSeries, SeriesError>
where
    S: PairVolumeSource + ?Sized,
{
    let mut readings = Vec::with_capacity(blocks.len());

    for (i, &block) in blocks.iter().enumerate() {
        if i > 0 {
            throttle.pause().await;
        }

        let volume = source
            .cumulative_volume_at(pair, block)
            .await?
            .ok_or_else(|| SeriesError::PairMissing {
                pair: pair.to_string(),
                block,
            })?;

        if !volume.is_finite() {
            return Err(SourceError::Decode(format!(
                "volumeUSD for {} at block {} is not a number",
                pair, block
            ))
            .into());
        }

        // Fractional dollars are dropped
        readings.push(VolumeReading {
            block,
            total_usd: volume.trunc() as i64,
        });
    }

    Ok(CumulativeVolumeSeries::new(readings))
}

/// Interval volumes for the last `lookback_days` days of `pair`.
///
/// Expects `timeline` to hold `lookback_days + 1` blocks; a shorter series is
/// reported as insufficient history.
pub async fn build_interval_series<S>(
    source: &S,
    pair: &str,
    timeline: &BlockTimeline,
    lookback_days: u32,
    throttle: &Throttle,
) -> Result<IntervalVolumeSeries, SeriesError>
where
    S: PairVolumeSource + ?Sized,
{
    let expected = lookback_days as usize + 1;
    let cumulative = fetch_cumulative(source, pair, &timeline.blocks, throttle).await?;

    if cumulative.len() != expected {
        return Err(SeriesError::InsufficientHistory {
            expected,
            got: cumulative.len(),
        });
    }

    let intervals = cumulative.intervals();
    debug!("Pair {} interval volumes: {:?}", pair, intervals.values());
    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::testing::FakeMarket;

    fn timeline(blocks: Vec<BlockHeight>) -> BlockTimeline {
        BlockTimeline {
            timestamps: (0..blocks.len() as i64).collect(),
            blocks,
        }
    }

    #[tokio::test]
    async fn test_builds_intervals_from_cumulative() {
        let mut market = FakeMarket::default();
        for (block, total) in [(10, 100.9), (11, 150.2), (12, 150.7), (13, 400.0)] {
            market.set_volume("0xpair", block, total);
        }

        let series = build_interval_series(
            &market,
            "0xpair",
            &timeline(vec![10, 11, 12, 13]),
            3,
            &Throttle::default(),
        )
        .await
        .unwrap();

        assert_eq!(series.values(), &[50, 0, 250]);
    }

    #[tokio::test]
    async fn test_pair_missing_at_early_block_fails_whole_fetch() {
        let mut market = FakeMarket::default();
        market.set_volume("0xnew", 12, 10.0);
        market.set_volume("0xnew", 13, 20.0);

        let err = fetch_cumulative(&market, "0xnew", &[11, 12, 13], &Throttle::default())
            .await
            .unwrap_err();

        assert!(err.is_insufficient_history());
        assert!(matches!(err, SeriesError::PairMissing { block: 11, .. }));
    }

    #[tokio::test]
    async fn test_short_series_is_insufficient_history() {
        let mut market = FakeMarket::default();
        market.set_volume("0xpair", 1, 1.0);
        market.set_volume("0xpair", 2, 2.0);

        let err = build_interval_series(
            &market,
            "0xpair",
            &timeline(vec![1, 2]),
            5,
            &Throttle::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            SeriesError::InsufficientHistory { expected: 6, got: 2 }
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_insufficient_history() {
        let mut market = FakeMarket::default();
        market.failing_pairs.insert("0xdown".to_string());

        let err = fetch_cumulative(&market, "0xdown", &[1], &Throttle::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SeriesError::Fetch(_)));
        assert!(!err.is_insufficient_history());
    }
}
