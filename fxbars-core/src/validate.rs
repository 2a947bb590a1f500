//! Request parameter validation.
//!
//! Every check runs before any store access. Raw parameters arrive as text,
//! the way a transport extracts them from headers.

use fxbars_types::{FixTime, FxError, Granularity, LimitBounds, PairId, RawCandle};

/// Validate a pair identifier: exactly six uppercase ASCII letters.
///
/// # Errors
/// Returns `InvalidPairIdentifier` otherwise.
pub fn pair(raw: &str) -> Result<PairId, FxError> {
    PairId::new(raw)
}

/// Validate a granularity name (case-sensitive canonical names only).
///
/// # Errors
/// Returns `InvalidGranularity` for empty or unmatched names.
pub fn granularity(raw: &str) -> Result<Granularity, FxError> {
    match Granularity::lookup(raw) {
        Granularity::Unknown => Err(FxError::invalid_granularity(raw)),
        g => Ok(g),
    }
}

/// Validate an anchor fix time of the form `yyyy-MM-dd HH:mm:ss`.
///
/// # Errors
/// Returns `InvalidFixTime` otherwise.
pub fn fix_time(raw: &str) -> Result<FixTime, FxError> {
    FixTime::parse(raw)
}

/// Validate a row limit against `bounds`.
///
/// # Errors
/// Returns `InvalidLimit` if `raw` is not a decimal integer inside `bounds`.
pub fn limit(raw: &str, bounds: LimitBounds) -> Result<usize, FxError> {
    let err = || FxError::invalid_limit(raw, bounds.min, bounds.max);
    let value: u32 = raw.trim().parse().map_err(|_| err())?;
    if !bounds.contains(value) {
        return Err(err());
    }
    usize::try_from(value).map_err(|_| err())
}

/// Raw read-path parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<'a> {
    /// Pair identifier.
    pub pair: &'a str,
    /// Granularity of the stored bars that build the in-progress bar.
    pub lower: &'a str,
    /// Granularity of the requested view.
    pub upper: &'a str,
    /// Anchor fix time.
    pub fix_time: &'a str,
    /// Maximum number of closed upper bars.
    pub limit: &'a str,
}

/// A validated read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleQuery {
    /// Pair identifier.
    pub pair: PairId,
    /// Granularity of the contributing bars.
    pub lower: Granularity,
    /// Granularity of the requested view.
    pub upper: Granularity,
    /// Anchor fix time.
    pub anchor: FixTime,
    /// Maximum number of closed upper bars.
    pub limit: usize,
}

impl CandleQuery {
    /// Check a query built in code against `bounds` and the granularity ordering.
    ///
    /// # Errors
    /// Returns `InvalidGranularity` or `InvalidLimit`.
    pub fn check(&self, bounds: LimitBounds) -> Result<(), FxError> {
        check_order(self.lower, self.upper)?;
        let within = u32::try_from(self.limit).is_ok_and(|l| bounds.contains(l));
        if !within {
            return Err(FxError::invalid_limit(
                self.limit.to_string(),
                bounds.min,
                bounds.max,
            ));
        }
        Ok(())
    }
}

fn check_order(lower: Granularity, upper: Granularity) -> Result<(), FxError> {
    if !lower.is_known() {
        return Err(FxError::invalid_granularity(lower.as_str()));
    }
    if !upper.is_known() || lower >= upper {
        return Err(FxError::invalid_granularity(upper.as_str()));
    }
    Ok(())
}

/// Validate read-path parameters in order: pair, lower, upper, fix time, limit.
///
/// The upper granularity must be strictly coarser than the lower one.
///
/// # Errors
/// The first failing check's error.
pub fn query(params: QueryParams<'_>, bounds: LimitBounds) -> Result<CandleQuery, FxError> {
    let pair = pair(params.pair)?;
    let lower = granularity(params.lower)?;
    let upper = granularity(params.upper)?;
    if lower >= upper {
        return Err(FxError::invalid_granularity(params.upper));
    }
    let anchor = fix_time(params.fix_time)?;
    let limit = limit(params.limit, bounds)?;
    Ok(CandleQuery {
        pair,
        lower,
        upper,
        anchor,
        limit,
    })
}

/// Validate write-path parameters: granularity, pair, then a non-empty payload.
///
/// # Errors
/// `InvalidGranularity`, `InvalidPairIdentifier` or `EmptyInput`.
pub fn upload(
    pair_raw: &str,
    granularity_raw: &str,
    candles: &[RawCandle],
) -> Result<(PairId, Granularity), FxError> {
    let g = granularity(granularity_raw)?;
    let p = pair(pair_raw)?;
    if candles.is_empty() {
        return Err(FxError::EmptyInput);
    }
    Ok((p, g))
}

/// Validate delete-path parameters and collapse duplicate granularities.
///
/// The result is sorted by granularity ordinal.
///
/// # Errors
/// `InvalidPairIdentifier`, or `InvalidGranularity` for an unknown name or an
/// empty list.
pub fn delete<S: AsRef<str>>(
    pair_raw: &str,
    granularities: &[S],
) -> Result<(PairId, Vec<Granularity>), FxError> {
    let p = pair(pair_raw)?;
    let mut out = granularities
        .iter()
        .map(|g| granularity(g.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    distinct(&mut out)?;
    Ok((p, out))
}

/// Sort and deduplicate a granularity set, rejecting an empty or unknown one.
///
/// # Errors
/// `InvalidGranularity`.
pub fn distinct(granularities: &mut Vec<Granularity>) -> Result<(), FxError> {
    if let Some(bad) = granularities.iter().find(|g| !g.is_known()) {
        return Err(FxError::invalid_granularity(bad.as_str()));
    }
    if granularities.is_empty() {
        return Err(FxError::invalid_granularity(""));
    }
    granularities.sort_unstable();
    granularities.dedup();
    Ok(())
}
