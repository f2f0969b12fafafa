pub mod fee_schedule_repository;
pub mod partner_repository;

pub use fee_schedule_repository::FeeScheduleRepository;
pub use partner_repository::PartnerRepository;
