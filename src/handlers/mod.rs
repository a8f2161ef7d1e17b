pub mod account;
pub mod categories;
pub mod items;
