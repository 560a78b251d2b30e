pub mod application;
pub mod profile;
pub mod review;
pub mod session;
pub mod step;
