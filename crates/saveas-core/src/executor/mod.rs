//! Strategy executors. All share one contract: consume a `SaveRequest`,
//! use only the primitives the strategy may assume, never fail outward.

mod click;
pub(crate) mod legacy;
pub(crate) mod native_link;
pub(crate) mod noop;
pub(crate) mod popup_fallback;
