pub mod rate;
pub mod currency;
pub mod response;

pub use rate::*;
pub use currency::*;
pub use response::*;
