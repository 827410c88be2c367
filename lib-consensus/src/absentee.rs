//! The absenteeism formula (spec §4.6): pure, round-free arithmetic shared
//! identically by the block generator and the block validator in
//! `lib-blockchain`. Keeping it here, rather than duplicated in both call
//! sites, is what makes "generator and validator agree" a property of the
//! type system instead of a code-review convention.

/// Multiplier applied to `totalWeight / acctWeight` to get the allowable
/// gap between proposals before an account is marked offline.
pub const ABSENTEEISM_MULTIPLIER: u64 = 20;

/// Decide whether an online account with `acct_weight` (out of
/// `total_weight`) that last proposed at `last_seen` should be marked
/// absent at `current`.
///
/// `last_seen == 0` means "never proposed" and is always exempt — such an
/// account is noticed on its first keyreg or proposal, not knocked offline
/// before it ever had a chance to appear.
pub fn is_absent(acct_weight: u64, total_weight: u64, last_seen: u64, current: u64) -> bool {
    if last_seen == 0 || acct_weight == 0 {
        return false;
    }

    let allowable_lag = match ABSENTEEISM_MULTIPLIER
        .checked_mul(total_weight)
        .and_then(|n| n.checked_div(acct_weight))
    {
        Some(lag) => lag,
        None => return false,
    };

    if allowable_lag > u32::MAX as u64 {
        return false;
    }

    match last_seen.checked_add(allowable_lag) {
        Some(deadline) => deadline < current,
        None => false,
    }
}
