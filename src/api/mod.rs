pub mod error;
pub mod response;
pub mod route;

pub use route::create_router;
