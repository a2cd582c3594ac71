//! Draw generation for debating tournaments.
//!
//! Given a snapshot of the teams and judges, [`generate_pairings`] decides
//! who debates whom, allocates judges to each debate, and annotates every
//! debate with its conflicts and a quality score. The same checks are
//! available on their own through [`validate_pairing`], for re-checking a
//! debate after it has been edited by hand.

pub mod config;
pub mod drafts;
pub mod tournaments;


pub use tournaments::rounds::draws::manage::{
    RoundDraw, generate_pairings, validate::validate_pairing,
};
