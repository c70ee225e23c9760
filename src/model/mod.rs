pub mod outline;
pub mod sermon;
pub mod sync;
pub mod tags;
pub mod thought;

pub use outline::*;
pub use sermon::*;
pub use sync::*;
pub use tags::*;
pub use thought::*;
