pub mod arena;
pub mod contestant;
pub mod wondev;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{Context, Error, anyhow};
        pub type Result<T, E = Error> = anyhow::Result<T, E>;

        pub use std::{
            ops::{Add, Sub},
            time::{Duration, Instant},
        };
    }
}

pub mod prelude {
    pub use super::arena::*;
    pub use super::contestant::*;
    pub use super::utils::prelude::*;
    pub use super::wondev::prelude::*;
}
