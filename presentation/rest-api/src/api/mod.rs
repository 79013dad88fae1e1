pub mod error;
pub mod health;
pub mod menu;
pub mod tags;
