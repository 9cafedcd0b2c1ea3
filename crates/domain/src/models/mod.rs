//! Domain models for GearGuard.

pub mod auth;
pub mod category;
pub mod company;
pub mod dashboard;
pub mod department;
pub mod equipment;
pub mod otp;
pub mod request;
pub mod team;
pub mod user;
pub mod work_center;

pub use request::{AllocationStatus, DeadlineStatus, RequestItem, Stage, WorkerResponse};
pub use user::{Role, UserItem};
