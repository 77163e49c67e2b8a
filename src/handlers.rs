pub mod forecast;
pub mod health;
pub mod profile;
pub mod residuals;
pub mod unavailable;
pub mod variables;
pub mod views;
