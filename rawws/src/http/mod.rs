pub(crate) mod header;
pub(crate) mod protocol;
pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod status;

pub use header::*;
pub use request::*;
pub use response::*;
pub use status::*;
