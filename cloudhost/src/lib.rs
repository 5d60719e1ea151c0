//! The cloud-storage helper (spec.md §4.3): resolves an external
//! password-capable file host's share URL into a flat file tree,
//! downloads each file sequentially with `.part`-resumable ranged
//! requests, and aggregates progress across the whole share.

pub mod cancel;
pub mod download;
pub mod error;
pub mod model;
pub mod progress;
pub mod resolver;
pub mod share;
pub mod token;

pub use cancel::CancelFlag;
pub use error::CloudHostError;
pub use model::FileRecord;
pub use share::download_share;
