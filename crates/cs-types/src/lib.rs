pub mod bounds;
pub mod errors;
pub mod mapping;
pub mod record;
pub mod settings;
pub mod status;

pub use bounds::*;
pub use errors::*;
pub use mapping::*;
pub use record::*;
pub use settings::*;
pub use status::*;
