//! HTTP request handlers
//!
//! Author: hephaex@gmail.com

pub mod health;
pub mod items;
pub mod stores;
pub mod tags;
pub mod users;
