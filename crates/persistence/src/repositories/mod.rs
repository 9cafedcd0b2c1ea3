//! Repository implementations for database operations.

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

pub use category::CategoryRepository;
pub use company::{CompanyReferences, CompanyRepository};
pub use dashboard::{AdminCounters, DashboardRepository, WorkerCounters};
pub use department::DepartmentRepository;
pub use equipment::EquipmentRepository;
pub use otp::OtpRepository;
pub use request::{RequestInsert, RequestRepository, RequestUpdate};
pub use team::TeamRepository;
pub use user::{UserInsert, UserRepository, UserUpdate};
pub use work_center::WorkCenterRepository;
