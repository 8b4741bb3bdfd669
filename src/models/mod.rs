pub mod agenda_item;
pub mod checkin;
pub mod slot;
