//! Probabilistic forecasting of a hockey league's remaining season. Fits time-decayed
//! attack/defence strength ratings over completed games via gradient-based MCMC, then simulates
//! every remaining fixture under each posterior draw to produce a full distribution of
//! end-of-season standings points per team.

#![allow(clippy::too_many_arguments)]

pub mod codec;
pub mod data;
pub mod forecast;
pub mod linear;
pub mod model;
pub mod predict;
pub mod print;
pub mod random;
pub mod sampler;
pub mod standings;
pub mod summary;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
