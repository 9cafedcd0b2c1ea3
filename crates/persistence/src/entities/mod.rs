//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod category;
pub mod company;
pub mod department;
pub mod equipment;
pub mod otp;
pub mod request;
pub mod team;
pub mod user;
pub mod work_center;

pub use category::{CategoryEntity, CategoryWithCountsEntity};
pub use company::CompanyEntity;
pub use department::{DepartmentEntity, DepartmentWithCountsEntity};
pub use equipment::EquipmentEntity;
pub use otp::{OtpEntity, OtpPurposeDb};
pub use request::{
    AllocationStatusDb, DeadlineStatusDb, RequestEntity, RequestTypeDb, StageDb, WorkerResponseDb,
};
pub use team::{TeamEntity, TeamWithCountsEntity};
pub use user::{UserEntity, UserWithLoadEntity};
pub use work_center::WorkCenterEntity;
