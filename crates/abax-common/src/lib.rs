pub mod error;
pub mod kind;
pub mod types;

pub use error::{CalcError, CalcErrorKind, CalcResult};
pub use kind::Kind;
pub use types::Type;
