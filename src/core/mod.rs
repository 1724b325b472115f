// Domain-layer modules and shared errors/models
pub mod monthly_distance {
    pub use crate::monthly_distance::*;
}

pub mod distance {
    pub use crate::distance::*;
}

pub mod dataset {
    pub use crate::dataset::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
