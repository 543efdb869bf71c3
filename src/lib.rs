//! # psweed
//!
//! Spatial **weeding** of persistent-scatterer (PS) candidates for InSAR
//! time-series processing.
//!
//! Given the candidates that survived PS selection for one patch, each with a
//! radar grid position, a projected ground coordinate and a coherence score,
//! `psweed` removes points that are spatially redundant: of every cluster of
//! neighbouring pixels only the most coherent point is kept, and of every set
//! of points sharing an identical projected coordinate only the most coherent
//! one survives. Optionally points at sea level are dropped as well.
//!
//! ## Example
//!
//! ```no_run
//! use psweed::{CandidateSet, WeedConfig, WeedProduct, WeedStage};
//!
//! let candidates = CandidateSet::new(
//!     vec![[10, 10], [10, 11], [10, 10], [50, 50]],
//!     vec![[0.0, 0.0], [4.0, 0.0], [8.0, 0.0], [160.0, 160.0]],
//!     vec![0.9, 0.8, 0.95, 0.99],
//!     vec![12.0, 11.5, 12.3, 40.1],
//! );
//!
//! let stage = WeedStage::new(WeedConfig::default());
//! let result = stage.run_for_patch("PATCH_1", &candidates).unwrap();
//! println!("Kept {} of {}", result.num_kept, result.num_candidates);
//!
//! let product = WeedProduct::new(&candidates, &result).unwrap();
//! product.save_to_file("PATCH_1/weed.rkyv").unwrap();
//! ```
//!
//! ## Algorithm overview
//!
//! 1. **Grid index** — shift grid positions so the minimum lands at (2, 2) and
//!    let every candidate, in index order, claim the free cells of a 3×3
//!    look-back window around its position (first claim wins)
//! 2. **Neighbour lists** — a candidate whose window centre was claimed by an
//!    earlier candidate becomes that candidate's neighbour
//! 3. **Cluster resolution** — union-find over neighbour edges; each connected
//!    cluster keeps its highest-coherence member
//! 4. **Coordinate dedup** — among survivors, identical projected coordinates
//!    keep their highest-coherence member
//!
//! The processing is single-threaded and scoped to one call. Patches share no
//! state, so separate patches may be weeded concurrently by the caller.

mod candidate;
pub mod edgefile;
mod error;
pub mod weed;

pub use candidate::*;
pub use edgefile::{EdgeFile, EDGE_FILE_NAME};
pub use error::WeedError;
pub use weed::{NoiseFilterPolicy, PhaseRows, WeedConfig, WeedProduct, WeedResult, WeedStage};
