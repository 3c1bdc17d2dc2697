pub mod avatar;
pub mod editing;
pub mod error;
pub mod fields;
pub mod inflight;
pub mod ports;
pub mod preferences;
pub mod repo;
pub mod service;
pub mod toast;
pub mod validation;

#[cfg(test)]
mod editing_test;
#[cfg(test)]
mod preferences_test;
#[cfg(test)]
mod service_test;
#[cfg(test)]
mod validation_test;
