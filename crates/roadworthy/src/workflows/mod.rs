pub mod checklist;
pub mod inspection;
pub mod scheduling;
pub mod users;
pub mod vehicles;
