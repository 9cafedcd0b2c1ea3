pub mod email;
pub mod notifier;
