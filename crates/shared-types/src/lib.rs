pub mod error;
pub mod feature_flags;

pub mod case;
pub mod common;
pub mod dispute;
pub mod document;
pub mod identity;
pub mod principal;
pub mod reminder;
pub mod report;

pub use error::*;
pub use feature_flags::*;

pub use case::*;
pub use common::*;
pub use dispute::*;
pub use document::*;
pub use identity::*;
pub use principal::*;
pub use reminder::*;
pub use report::*;
