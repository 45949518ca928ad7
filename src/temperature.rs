//! Temperature sentinels and resolution.

/// The caller did not specify a temperature; fall back to the calling
/// synapse's own default. Distinct from [`ZERO`] so "use the default" and
/// "use exactly zero" are never confused.
pub const UNSET: f32 = -1.0;

/// A caller-requested temperature of exactly `0.0`. Most providers treat a
/// literal `0.0` as "maximally deterministic", but some reject it outright
/// or treat it as unset; this sentinel is nudged just above zero so it
/// survives both kinds of provider unchanged in intent.
pub const ZERO: f32 = 0.0001;

/// Resolve a caller-requested temperature against a synapse's default.
///
/// - `requested == UNSET` -> `default`
/// - `requested == 0.0` -> [`ZERO`]
/// - otherwise -> `requested`, unchanged
pub fn resolve(requested: f32, default: f32) -> f32 {
    if requested == UNSET {
        default
    } else if requested == 0.0 {
        ZERO
    } else {
        requested
    }
}
