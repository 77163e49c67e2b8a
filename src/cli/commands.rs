pub mod check;
pub mod export;
pub mod lookup;
pub mod serve;

pub use check::check;
pub use export::export;
pub use lookup::lookup;
pub use serve::serve;
