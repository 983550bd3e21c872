// Chatnet common library
// Keys, addresses, chat transactions and the JSON types exchanged with mock nodes

pub mod api;
pub mod config;
pub mod crypto;
pub mod time;
pub mod transaction;
