pub mod client;
pub mod document;
pub mod filing;
pub mod notification;
pub mod onboarding;
pub mod payment;
pub mod session;
pub mod settings;
pub mod user;
