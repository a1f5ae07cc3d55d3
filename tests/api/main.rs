mod gate;
mod health;
mod import;
mod registration;
