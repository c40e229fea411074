pub mod pallet;
pub mod report;
pub mod task;
pub mod work_session;
pub mod worker;
